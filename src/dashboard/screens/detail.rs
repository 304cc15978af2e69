//! Single record view opened from a list row

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::warn;

use crate::admin;
use crate::api::ApiClient;
use crate::dashboard::traits::ScreenAction;
use crate::dashboard::ui::{wrap_text, Styles};
use crate::resources::Resource;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded,
    /// The server has no such record
    Empty,
    Failed(String),
}

pub struct DetailScreen {
    pub title: String,
    pub id: String,
    pub fields: Vec<(String, String)>,
    pub raw: String,
    pub state: DetailState,
    pub scroll_offset: u16,
}

impl DetailScreen {
    /// Placeholder shown while the record is on its way
    pub fn pending<R: Resource>(resource: &R, id: &str) -> Self {
        Self {
            title: format!("{} · {}", resource.title(), id),
            id: id.to_string(),
            fields: Vec::new(),
            raw: String::new(),
            state: DetailState::Loading,
            scroll_offset: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == DetailState::Loading
    }

    pub async fn load<R: Resource>(client: &ApiClient, resource: &R, id: &str) -> Self {
        let mut screen = Self::pending(resource, id);
        screen.state = DetailState::Empty;

        match admin::fetch_detail(client, resource, id).await {
            Ok(Some(detail)) => {
                screen.fields = resource
                    .columns()
                    .iter()
                    .map(|column| (column.label.to_string(), column.value(&detail.row)))
                    .collect();
                screen.raw = serde_json::to_string_pretty(&detail.raw).unwrap_or_default();
                screen.state = DetailState::Loaded;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to load {} {}: {}", resource.name(), id, e);
                screen.state = DetailState::Failed(e.user_message());
            }
        }
        screen
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_add(10),
            KeyCode::Home => self.scroll_offset = 0,
            KeyCode::Esc => return ScreenAction::NavigateBack,
            _ => {}
        }
        ScreenAction::None
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(self.title.as_str(), Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let message = match &self.state {
            DetailState::Loaded => None,
            DetailState::Loading => Some(Line::from(Span::styled("Loading…", Styles::inactive()))),
            DetailState::Empty => Some(Line::from(Span::styled(
                format!("No record found with id {}", self.id),
                Styles::inactive(),
            ))),
            DetailState::Failed(reason) => {
                Some(Line::from(Span::styled(format!("✗ {}", reason), Styles::error())))
            }
        };
        if let Some(line) = message {
            f.render_widget(Paragraph::new(line).block(block), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = (chunks[0].width as usize).saturating_sub(label_width + 5);

        let mut lines = Vec::new();
        for (label, value) in &self.fields {
            for (index, part) in wrap_text(value, value_width).into_iter().enumerate() {
                let head = if index == 0 {
                    format!("{:<width$}  ", label, width = label_width)
                } else {
                    " ".repeat(label_width + 2)
                };
                lines.push(Line::from(vec![
                    Span::styled(head, Styles::info()),
                    Span::raw(part),
                ]));
            }
        }

        f.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll_offset, 0)),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(self.raw.as_str())
                .style(Styles::inactive())
                .block(Block::default().title("Record").borders(Borders::ALL))
                .scroll((self.scroll_offset, 0)),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use crate::error::ApiError;
    use crate::resources::Queries;
    use serde_json::json;
    use std::sync::Arc;

    fn client_with(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[tokio::test]
    async fn test_loads_fields_from_columns() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            200,
            json!({"data": {
                "_id": "q1",
                "name": "Ravi",
                "email": "ravi@example.com",
                "subject": "Refund",
                "source": "footer-form"
            }}),
        );
        let screen = DetailScreen::load(&client_with(&transport), &Queries, "q1").await;

        assert_eq!(screen.state, DetailState::Loaded);
        assert!(screen
            .fields
            .iter()
            .any(|(label, value)| label == "Email" && value == "ravi@example.com"));
        assert!(screen.raw.contains("Refund"));
        assert!(screen.raw.contains("footer-form"));
    }

    #[test]
    fn test_pending_screen_is_loading() {
        let screen = DetailScreen::pending(&Queries, "q1");
        assert!(screen.is_loading());
        assert_eq!(screen.id, "q1");
    }

    #[tokio::test]
    async fn test_failure_and_missing_record() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(ApiError::NotFound("/queries/q9".to_string()));
        let screen = DetailScreen::load(&client_with(&transport), &Queries, "q9").await;
        assert_eq!(screen.state, DetailState::Empty);

        transport.fail(ApiError::Network("connection refused".to_string()));
        let screen = DetailScreen::load(&client_with(&transport), &Queries, "q9").await;
        assert!(matches!(screen.state, DetailState::Failed(_)));
    }
}
