//! Paginated list screen for any resource

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, ListState, Paragraph},
    Frame,
};
use tracing::debug;

use crate::dashboard::components::{pagination_bar, resource_table, status_display, TableView};
use crate::dashboard::traits::{ListScreen, ScreenAction};
use crate::dashboard::ui::{InputField, Styles};
use crate::list::{Dispatch, ListEvent, PagedResourceList};
use crate::models::{ActionKind, RowAction};
use crate::resources::{Column, Record, Resource, ResourceKind, SearchMode};

const KEY_HINTS: &str =
    "←/→ page · / search · f filter · r refresh · Enter view · d delete · a/x approve/reject · p paid";

/// Listing opened by `b` from a row of `kind`
pub fn child_listing(kind: &ResourceKind, id: &str) -> Option<ResourceKind> {
    match kind {
        ResourceKind::Clients => Some(ResourceKind::ClientProjects(id.to_string())),
        ResourceKind::Projects | ResourceKind::ClientProjects(_) => {
            Some(ResourceKind::ProjectBids(id.to_string()))
        }
        _ => None,
    }
}

pub struct ResourceListScreen<R: Resource> {
    kind: ResourceKind,
    list: PagedResourceList<R>,
    columns: Vec<Column<R::Row>>,
    selection: ListState,
    search: InputField,
    searching: bool,
    pending_delete: Option<String>,
}

impl<R: Resource> ResourceListScreen<R> {
    /// Mounts the list; the first page arrives through `next_update`
    pub fn new(kind: ResourceKind, mut list: PagedResourceList<R>) -> Self {
        let columns = list.resource().columns();
        let mut search = InputField::new("Search").with_placeholder("press / to search");
        search.set_value(&list.query().search);
        list.mount();

        Self {
            kind,
            list,
            columns,
            selection: ListState::default(),
            search,
            searching: false,
            pending_delete: None,
        }
    }

    pub fn list(&self) -> &PagedResourceList<R> {
        &self.list
    }

    fn selected_id(&self) -> Option<String> {
        let rows = self.list.visible_rows();
        self.selection
            .selected()
            .and_then(|index| rows.get(index))
            .map(|row| row.id().to_string())
    }

    fn clamp_selection(&mut self) {
        let count = self.list.visible_rows().len();
        let selected = match self.selection.selected() {
            _ if count == 0 => None,
            Some(index) => Some(index.min(count - 1)),
            None => Some(0),
        };
        self.selection.select(selected);
    }

    fn move_selection(&mut self, forward: bool) {
        let count = self.list.visible_rows().len();
        if count == 0 {
            return;
        }
        let current = self.selection.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % count
        } else if current == 0 {
            count - 1
        } else {
            current - 1
        };
        self.selection.select(Some(next));
    }

    fn after_page_change(&mut self, changed: bool) {
        if changed {
            self.selection.select(Some(0));
        }
    }

    fn cycle_filter(&mut self) -> ScreenAction {
        let filters = self.list.resource().filters();
        let Some(spec) = filters.first() else {
            return ScreenAction::SetError(format!(
                "{} has no filters",
                self.list.resource().title()
            ));
        };
        let current = self.list.query().filter(spec.key).unwrap_or("");
        let position = spec.options.iter().position(|option| *option == current);
        let next = match position {
            None => spec.options.first().copied().unwrap_or(""),
            Some(index) => spec.options.get(index + 1).copied().unwrap_or(""),
        };
        let key = spec.key;
        self.list.set_filter(key, next);
        ScreenAction::None
    }

    fn act(&mut self, kind: ActionKind) -> ScreenAction {
        let Some(id) = self.selected_id() else {
            return ScreenAction::SetError("No row selected".to_string());
        };
        match self.list.perform_action(RowAction::new(&id, kind)) {
            Dispatch::Pending | Dispatch::Rejected => ScreenAction::None,
            Dispatch::Navigate(route) => match kind {
                ActionKind::ViewDetail if self.list.resource().detail_path(&id).is_some() => {
                    ScreenAction::OpenDetail(self.kind.clone(), id)
                }
                ActionKind::Edit => {
                    ScreenAction::SetStatus(format!("Edit form lives at {}", route))
                }
                _ => ScreenAction::SetStatus(format!("Open {}", route)),
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter => {
                self.searching = false;
                self.search.is_focused = false;
                let term = self.search.value.trim().to_string();
                self.list.set_search(&term);
                self.selection.select(Some(0));
            }
            KeyCode::Esc => {
                self.searching = false;
                self.search.is_focused = false;
                let term = self.list.query().search.clone();
                self.search.set_value(&term);
            }
            KeyCode::Backspace => self.search.delete_char(),
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Char(c) => self.search.insert_char(c),
            _ => {}
        }
        ScreenAction::None
    }

    fn footer_text(&self) -> String {
        match &self.pending_delete {
            Some(id) => format!("Delete {}? Press y to confirm, any other key to cancel", id),
            None => KEY_HINTS.to_string(),
        }
    }

    fn filter_summary(&self) -> String {
        let filters = self.list.resource().filters();
        if filters.is_empty() {
            return "No filters".to_string();
        }
        filters
            .iter()
            .map(|spec| {
                format!(
                    "{}: {}",
                    spec.label,
                    self.list.query().filter(spec.key).unwrap_or("all")
                )
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

#[async_trait(?Send)]
impl<R: Resource> ListScreen for ResourceListScreen<R> {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);
        self.search.render(f, top[0]);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(self.filter_summary(), Styles::info())))
                .block(Block::default().title("Filters (f)").borders(Borders::ALL)),
            top[1],
        );

        let rows = self.list.visible_rows();
        let view = TableView {
            title: self.list.resource().title().to_string(),
            columns: &self.columns,
            rows: &rows,
            first_number: self.list.row_number(0),
            load_state: self.list.load_state(),
        };
        resource_table::render(f, chunks[1], &view, &mut self.selection);

        pagination_bar::render(f, chunks[2], &self.list.window(), self.list.total_count());

        let footer = self.footer_text();
        let notice = if self.pending_delete.is_some() {
            None
        } else {
            self.list.notice()
        };
        status_display::render(f, chunks[3], notice, &footer);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if self.searching {
            return self.handle_search_key(key);
        }

        if let Some(id) = self.pending_delete.take() {
            if key.code == KeyCode::Char('y') {
                debug!("Confirmed delete of {}", id);
                self.list.perform_action(RowAction::new(&id, ActionKind::Delete));
                return ScreenAction::None;
            }
            return ScreenAction::SetStatus("Delete cancelled".to_string());
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Left | KeyCode::PageUp => {
                let changed = self.list.previous_page();
                self.after_page_change(changed);
            }
            KeyCode::Right | KeyCode::PageDown => {
                let changed = self.list.next_page();
                self.after_page_change(changed);
            }
            KeyCode::Home => {
                let changed = self.list.first_page();
                self.after_page_change(changed);
            }
            KeyCode::End => {
                let changed = self.list.last_page();
                self.after_page_change(changed);
            }
            KeyCode::Char('/') => {
                if self.list.resource().search_mode() == SearchMode::Unsupported {
                    return ScreenAction::SetError(format!(
                        "{} cannot be searched",
                        self.list.resource().title()
                    ));
                }
                self.searching = true;
                self.search.is_focused = true;
            }
            KeyCode::Char('f') => return self.cycle_filter(),
            KeyCode::Char('r') => self.list.refresh(),
            KeyCode::Char('d') => {
                if !self.list.resource().supports(ActionKind::Delete) {
                    return self.act(ActionKind::Delete);
                }
                match self.selected_id() {
                    Some(id) => self.pending_delete = Some(id),
                    None => return ScreenAction::SetError("No row selected".to_string()),
                }
            }
            KeyCode::Char('a') => return self.act(ActionKind::Approve),
            KeyCode::Char('x') => return self.act(ActionKind::Reject),
            KeyCode::Char('p') => return self.act(ActionKind::MarkPaid),
            KeyCode::Char('e') => return self.act(ActionKind::Edit),
            KeyCode::Enter | KeyCode::Char('v') => return self.act(ActionKind::ViewDetail),
            KeyCode::Char('b') => {
                let child = self
                    .selected_id()
                    .and_then(|id| child_listing(&self.kind, &id));
                return match child {
                    Some(kind) => ScreenAction::OpenList(kind),
                    None => ScreenAction::SetError(format!(
                        "{} rows have no nested listing",
                        self.kind.label()
                    )),
                };
            }
            KeyCode::Esc => return ScreenAction::NavigateBack,
            _ => {}
        }
        ScreenAction::None
    }

    fn captures_input(&self) -> bool {
        self.searching || self.pending_delete.is_some()
    }

    fn is_busy(&self) -> bool {
        self.list.is_busy()
    }

    async fn next_update(&mut self) -> Option<ListEvent> {
        let event = self.list.next_update().await?;
        self.clamp_selection();
        Some(event)
    }

    fn tick(&mut self) -> bool {
        self.list.prune_notice()
    }

    fn dispose(&mut self) {
        self.list.dispose();
    }
}
