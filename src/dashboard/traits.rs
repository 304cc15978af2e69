//! Screen-level contracts of the dashboard

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::list::ListEvent;
use crate::resources::ResourceKind;

/// Top-level screens
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Menu,
    List,
    Detail,
    Stats,
    Settings,
}

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    NavigateTo(Screen),
    NavigateBack,
    /// Push a list screen for this listing
    OpenList(ResourceKind),
    /// Load and show one record
    OpenDetail(ResourceKind, String),
    Quit,
    SetStatus(String),
    SetError(String),
    None,
}

/// A mounted list, with the resource type erased
///
/// The app keeps a stack of these; only the top one is drawn and polled.
#[async_trait(?Send)]
pub trait ListScreen {
    fn kind(&self) -> &ResourceKind;

    fn draw(&mut self, f: &mut Frame, area: Rect);

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// True while a text prompt owns the keyboard
    fn captures_input(&self) -> bool {
        false
    }

    fn is_busy(&self) -> bool;

    /// Wait for the next finished request and apply it
    async fn next_update(&mut self) -> Option<ListEvent>;

    /// Periodic housekeeping; returns true when a redraw is needed
    fn tick(&mut self) -> bool;

    fn dispose(&mut self);
}
