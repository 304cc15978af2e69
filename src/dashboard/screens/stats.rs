//! Analytics overview screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::admin::stats::CountRow;
use crate::admin::StatsReport;
use crate::dashboard::traits::ScreenAction;
use crate::error::ApiError;
use crate::dashboard::ui::Styles;
use crate::resources::common::NA;

#[derive(Default)]
pub struct StatsScreen {
    pub report: Option<StatsReport>,
    pub error: Option<String>,
}

impl StatsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fetched report; any failed section fails the whole overview
    pub fn apply(&mut self, result: Result<StatsReport, ApiError>) -> Result<(), String> {
        match result {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let message = e.user_message();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc => ScreenAction::NavigateBack,
            _ => ScreenAction::None,
        }
    }

    /// Cards for the overview counters
    pub fn overview_lines(report: &StatsReport) -> Vec<(String, u64)> {
        let overview = &report.overview;
        vec![
            ("Influencers".to_string(), overview.influencer_count),
            ("Clients".to_string(), overview.client_count),
            ("Projects".to_string(), overview.total_projects),
            ("Bids".to_string(), overview.total_bids),
            ("Collab requests".to_string(), overview.total_requests),
        ]
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(report) = &self.report else {
            let text = match &self.error {
                Some(error) => Line::from(Span::styled(format!("✗ {}", error), Styles::error())),
                None => Line::from(Span::styled("Loading…", Styles::inactive())),
            };
            f.render_widget(
                Paragraph::new(text).block(Block::default().title("Analytics").borders(Borders::ALL)),
                area,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let cards = Self::overview_lines(report);
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
            .split(rows[0]);
        for ((label, value), card) in cards.iter().zip(card_areas.iter()) {
            f.render_widget(
                Paragraph::new(Span::styled(value.to_string(), Styles::title()))
                    .block(Block::default().title(label.as_str()).borders(Borders::ALL)),
                *card,
            );
        }

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(rows[1]);

        let top: Vec<ListItem> = report
            .top_projects
            .iter()
            .map(|row| ListItem::new(format!("{:>4}  {}", row.bid_count, row.label())))
            .collect();
        f.render_widget(
            List::new(top).block(Block::default().title("Top projects by bids").borders(Borders::ALL)),
            panels[0],
        );

        f.render_widget(
            List::new(count_items(&report.client_project_counts))
                .block(Block::default().title("Projects per client").borders(Borders::ALL)),
            panels[1],
        );
        f.render_widget(
            List::new(count_items(&report.requests_per_influencer))
                .block(Block::default().title("Requests per influencer").borders(Borders::ALL)),
            panels[2],
        );

        let assigned: Vec<ListItem> = report
            .assigned_projects
            .iter()
            .map(|project| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        project.title.clone().unwrap_or_else(|| project.id.clone()),
                        Styles::info(),
                    )),
                    Line::from(format!(
                        "  {} → {}",
                        project.client_name(),
                        project.influencer_name()
                    )),
                ])
            })
            .collect();
        f.render_widget(
            List::new(assigned).block(Block::default().title("Assigned projects").borders(Borders::ALL)),
            panels[3],
        );
    }
}

fn count_items(rows: &[CountRow]) -> Vec<ListItem<'static>> {
    rows.iter()
        .map(|row| {
            ListItem::new(format!(
                "{:>4}  {}",
                row.count,
                row.id.clone().unwrap_or_else(|| NA.to_string())
            ))
        })
        .collect()
}
