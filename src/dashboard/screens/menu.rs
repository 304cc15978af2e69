//! Main menu: every listing plus analytics and settings

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::dashboard::traits::{Screen, ScreenAction};
use crate::dashboard::ui::{SelectableList, Styles};
use crate::resources::ResourceKind;

#[derive(Debug, Clone, PartialEq)]
pub enum MenuTarget {
    Listing(ResourceKind),
    Stats,
    Settings,
}

#[derive(Debug, Clone)]
pub struct MenuEntry {
    pub title: String,
    pub shortcut: char,
    pub target: MenuTarget,
}

pub struct MenuScreen {
    pub entries: SelectableList<MenuEntry>,
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuScreen {
    pub fn new() -> Self {
        let mut entries: Vec<MenuEntry> = ResourceKind::menu()
            .into_iter()
            .enumerate()
            .map(|(index, kind)| MenuEntry {
                title: kind.label().to_string(),
                shortcut: char::from_digit(index as u32 + 1, 10).unwrap_or(' '),
                target: MenuTarget::Listing(kind),
            })
            .collect();
        entries.push(MenuEntry {
            title: "Analytics".to_string(),
            shortcut: 's',
            target: MenuTarget::Stats,
        });
        entries.push(MenuEntry {
            title: "Settings".to_string(),
            shortcut: 'g',
            target: MenuTarget::Settings,
        });

        Self {
            entries: SelectableList::new(entries),
        }
    }

    fn open(target: &MenuTarget) -> ScreenAction {
        match target {
            MenuTarget::Listing(kind) => ScreenAction::OpenList(kind.clone()),
            MenuTarget::Stats => ScreenAction::NavigateTo(Screen::Stats),
            MenuTarget::Settings => ScreenAction::NavigateTo(Screen::Settings),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.entries.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.entries.next(),
            KeyCode::Enter => {
                if let Some(entry) = self.entries.selected() {
                    return Self::open(&entry.target);
                }
            }
            KeyCode::Char(c) => {
                if let Some(entry) = self.entries.items.iter().find(|e| e.shortcut == c) {
                    return Self::open(&entry.target);
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, signed_in: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let session = if signed_in {
            Span::styled("Signed in", Styles::success())
        } else {
            Span::styled("Not signed in: run `infludash login` first", Styles::error())
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Influencer marketplace admin  ", Styles::title()),
                session,
            ]))
            .block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );

        let items: Vec<ListItem> = self
            .entries
            .items
            .iter()
            .map(|entry| ListItem::new(format!("[{}] {}", entry.shortcut, entry.title)))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Menu").borders(Borders::ALL))
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut self.entries.state);
    }
}
