//! Main dashboard state and event loop

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::screens::settings::{self as settings_screen, SaveRequest, SettingsInput};
use super::screens::*;
use super::traits::{ListScreen, Screen, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::admin::{self, StatsReport};
use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::forms::{RegistrationConfig, Settings};
use crate::list::{ListEvent, PagedResourceList};
use crate::resources::{Resource, ResourceKind};
use crate::source::{RemoteSource, ResourceSource};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Finished background request for a screen other than a listing
pub enum Loaded {
    Detail(DetailScreen),
    Stats(Result<StatsReport, ApiError>),
    Settings(Result<(Settings, RegistrationConfig), ApiError>),
    Saved(ScreenAction),
}

pub struct App {
    pub current_screen: Screen,
    pub config: Config,
    pub client: ApiClient,

    pub menu: MenuScreen,
    /// Open listings; the last one is on screen
    pub lists: Vec<Box<dyn ListScreen>>,
    pub detail: Option<DetailScreen>,
    pub stats: StatsScreen,
    pub settings: SettingsScreen,
    /// Detail, analytics and settings requests; polled by the event loop
    pub loads: FuturesUnordered<LocalBoxFuture<'static, Loaded>>,

    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

async fn next_list_update(lists: &mut [Box<dyn ListScreen>]) -> Option<ListEvent> {
    match lists.last_mut() {
        Some(list) => list.next_update().await,
        None => None,
    }
}

impl App {
    pub fn new(config: Config, client: ApiClient) -> Self {
        Self {
            current_screen: Screen::Menu,
            config,
            client,

            menu: MenuScreen::new(),
            lists: Vec::new(),
            detail: None,
            stats: StatsScreen::new(),
            settings: SettingsScreen::new(),
            loads: FuturesUnordered::new(),

            should_quit: false,
            show_help_popup: false,
            status_message: None,
            error_message: None,
        }
    }

    /// Run until the user quits; list requests progress between key presses
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if !self.client.is_authenticated() {
            self.set_error("No stored token. Run `infludash login` first".to_string());
        }

        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK_RATE);

        loop {
            terminal.draw(|f| self.draw(f))?;

            let busy = self.lists.last().map_or(false, |list| list.is_busy());
            let loading = !self.loads.is_empty();
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                update = next_list_update(&mut self.lists), if busy => {
                    if let Some(event) = update {
                        self.on_list_event(event);
                    }
                }
                loaded = self.loads.next(), if loading => {
                    if let Some(loaded) = loaded {
                        self.on_loaded(loaded);
                    }
                }
                _ = tick.tick() => self.on_tick(),
            }

            if self.should_quit {
                break;
            }
        }

        for list in self.lists.iter_mut() {
            list.dispose();
        }
        Ok(())
    }

    fn on_list_event(&mut self, event: ListEvent) {
        debug!("List update: {:?}", event);
        if let ListEvent::ActionSucceeded(_) | ListEvent::ActionFailed(..) = event {
            // The list's own banner reports the outcome
            self.clear_messages();
        }
    }

    /// Apply a finished load unless the user has already moved on
    pub fn on_loaded(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Detail(screen) => {
                let waiting = self
                    .detail
                    .as_ref()
                    .map_or(false, |d| d.is_loading() && d.id == screen.id);
                if waiting {
                    self.detail = Some(screen);
                } else {
                    debug!("Dropping detail for {}; screen closed", screen.id);
                }
            }
            Loaded::Stats(result) => {
                if self.current_screen != Screen::Stats {
                    return;
                }
                match self.stats.apply(result) {
                    Ok(()) => self.set_status("Analytics loaded".to_string()),
                    Err(message) => self.set_error(message),
                }
            }
            Loaded::Settings(result) => {
                if let Err(message) = self.settings.apply_loaded(result) {
                    if self.current_screen == Screen::Settings {
                        self.set_error(message);
                    }
                }
            }
            Loaded::Saved(action) => {
                self.settings.finish_save();
                self.apply_action(action);
            }
        }
    }

    fn on_tick(&mut self) {
        if let Some(list) = self.lists.last_mut() {
            list.tick();
        }
    }

    fn captures_input(&self) -> bool {
        match self.current_screen {
            Screen::List => self.lists.last().map_or(false, |list| list.captures_input()),
            Screen::Settings => true,
            _ => false,
        }
    }

    /// Handle keyboard input events; network work is queued, never awaited here
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts; text prompts keep everything but F1
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            KeyCode::Char('?') if !self.captures_input() => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Char('q') if !self.captures_input() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        let action = match self.current_screen {
            Screen::Menu => self.menu.handle_key_event(key),
            Screen::List => match self.lists.last_mut() {
                Some(list) => list.handle_key_event(key),
                None => ScreenAction::NavigateTo(Screen::Menu),
            },
            Screen::Detail => match self.detail.as_mut() {
                Some(detail) => detail.handle_key_event(key),
                None => ScreenAction::NavigateBack,
            },
            Screen::Stats => {
                if key.code == KeyCode::Char('r') {
                    self.load_stats();
                    ScreenAction::None
                } else {
                    self.stats.handle_key_event(key)
                }
            }
            Screen::Settings => match self.settings.handle_key_event(key) {
                SettingsInput::Action(action) => action,
                SettingsInput::Save(request) => {
                    self.save_settings(request);
                    ScreenAction::None
                }
            },
        };

        self.apply_action(action);
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(Screen::Stats) => {
                self.navigate_to_screen(Screen::Stats);
                self.load_stats();
            }
            ScreenAction::NavigateTo(Screen::Settings) => {
                self.navigate_to_screen(Screen::Settings);
                self.load_settings();
            }
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::NavigateBack => self.navigate_back(),
            ScreenAction::OpenList(kind) => self.open_list(kind),
            ScreenAction::OpenDetail(kind, id) => self.open_detail(kind, id),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.set_status(message),
            ScreenAction::SetError(message) => self.set_error(message),
            ScreenAction::None => {}
        }
    }

    fn list_screen<R: Resource>(&self, kind: ResourceKind, resource: R) -> Box<dyn ListScreen> {
        let resource = Arc::new(resource);
        let source: Arc<dyn ResourceSource<R::Row>> =
            Arc::new(RemoteSource::new(Arc::clone(&resource), self.client.clone()));
        let list = PagedResourceList::new(
            resource,
            source,
            self.config.list.page_size,
            self.config.notice_ttl(),
        );
        Box::new(ResourceListScreen::new(kind, list))
    }

    /// Mount a listing on top of the stack
    pub fn open_list(&mut self, kind: ResourceKind) {
        info!("Opening {}", kind.label());
        let screen = crate::with_resource!(kind.clone(), r => self.list_screen(kind.clone(), r));
        self.lists.push(screen);
        self.navigate_to_screen(Screen::List);
    }

    /// Show the detail screen in its loading state and queue the fetch
    fn open_detail(&mut self, kind: ResourceKind, id: String) {
        info!("Loading {} detail for {}", kind.label(), id);
        let client = self.client.clone();
        let (screen, load) = crate::with_resource!(kind, r => {
            let screen = DetailScreen::pending(&r, &id);
            let id = id.clone();
            let load = async move { Loaded::Detail(DetailScreen::load(&client, &r, &id).await) }
                .boxed_local();
            (screen, load)
        });
        self.detail = Some(screen);
        self.loads.push(load);
        self.navigate_to_screen(Screen::Detail);
    }

    fn load_stats(&mut self) {
        self.stats = StatsScreen::new();
        let client = self.client.clone();
        self.loads
            .push(async move { Loaded::Stats(admin::fetch_stats(&client).await) }.boxed_local());
    }

    fn load_settings(&mut self) {
        self.settings.loading = true;
        let client = self.client.clone();
        self.loads.push(
            async move { Loaded::Settings(settings_screen::fetch_sections(&client).await) }
                .boxed_local(),
        );
    }

    fn save_settings(&mut self, request: SaveRequest) {
        self.set_status("Saving…".to_string());
        let client = self.client.clone();
        self.loads.push(
            async move { Loaded::Saved(settings_screen::save_section(&client, request).await) }
                .boxed_local(),
        );
    }

    /// Detail returns to its list; a list unmounts and reveals the one below
    pub fn navigate_back(&mut self) {
        match self.current_screen {
            Screen::Detail => {
                self.detail = None;
                if self.lists.is_empty() {
                    self.navigate_to_screen(Screen::Menu);
                } else {
                    self.navigate_to_screen(Screen::List);
                }
            }
            Screen::List => {
                if let Some(mut list) = self.lists.pop() {
                    info!("Closing {}", list.kind().label());
                    list.dispose();
                }
                if self.lists.is_empty() {
                    self.navigate_to_screen(Screen::Menu);
                } else {
                    self.clear_messages();
                }
            }
            _ => self.navigate_to_screen(Screen::Menu),
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.current_screen {
            Screen::Menu => {
                let signed_in = self.client.is_authenticated();
                self.menu.draw(f, chunks[0], signed_in);
            }
            Screen::List => {
                if let Some(list) = self.lists.last_mut() {
                    list.draw(f, chunks[0]);
                }
            }
            Screen::Detail => {
                if let Some(detail) = &self.detail {
                    detail.draw(f, chunks[0]);
                }
            }
            Screen::Stats => self.stats.draw(f, chunks[0]),
            Screen::Settings => self.settings.draw(f, chunks[0]),
        }

        self.draw_status_bar(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn screen_title(&self) -> String {
        match self.current_screen {
            Screen::Menu => "Menu".to_string(),
            Screen::List => self
                .lists
                .last()
                .map(|list| list.kind().label().to_string())
                .unwrap_or_default(),
            Screen::Detail => "Record".to_string(),
            Screen::Stats => "Analytics".to_string(),
            Screen::Settings => "Settings".to_string(),
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, style) = if let Some(err) = &self.error_message {
            (format!("Error: {}", err), Styles::error())
        } else if let Some(msg) = &self.status_message {
            (format!("Status: {}", msg), Styles::success())
        } else {
            (
                format!(
                    "infludash - {} | ESC: Back | Q: Quit | F1/?: Help",
                    self.screen_title()
                ),
                Styles::inactive(),
            )
        };

        f.render_widget(
            Paragraph::new(text)
                .style(style)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);
        f.render_widget(
            Paragraph::new(self.context_help())
                .block(
                    Block::default()
                        .title("Help - Context Shortcuts")
                        .borders(Borders::ALL)
                        .style(Styles::title()),
                )
                .style(Styles::default()),
            popup_area,
        );
    }

    fn context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            ESC - Go back\n\
            Q - Quit\n\
            F1 / ? - Toggle this help\n\n";

        let screen_help = match self.current_screen {
            Screen::Menu => {
                "Menu:\n\
                ↑/↓ - Navigate\n\
                Enter - Open\n\
                1-8 - Open a listing\n\
                s - Analytics\n\
                g - Settings"
            }
            Screen::List => {
                "Listing:\n\
                ↑/↓ - Select row\n\
                ←/→ or PgUp/PgDn - Previous / next page\n\
                Home/End - First / last page\n\
                / - Search, Enter to apply\n\
                f - Cycle status filter\n\
                r - Refresh\n\
                Enter - View record\n\
                e - Edit route\n\
                d - Delete (asks for confirmation)\n\
                a / x - Approve / reject\n\
                p - Mark paid\n\
                b - Nested listing (client projects, project bids)"
            }
            Screen::Detail => {
                "Record:\n\
                ↑/↓ - Scroll\n\
                PgUp/PgDn - Page scroll"
            }
            Screen::Stats => {
                "Analytics:\n\
                r - Reload"
            }
            Screen::Settings => {
                "Settings:\n\
                Tab / Shift+Tab - Next / previous field\n\
                Space - Toggle paid registration\n\
                Enter - Save the focused section"
            }
        };

        format!("{}{}", global_help, screen_help)
    }

    pub fn navigate_to_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.clear_messages();
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.status_message = None;
    }

    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn app() -> App {
        let client = ApiClient::new(
            Arc::new(ScriptedTransport::new()),
            Arc::new(MemoryCredentialStore::with_token("tok")),
        );
        App::new(Config::default(), client)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_open_and_close_listing() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('1')));
        assert_eq!(app.current_screen, Screen::List);
        assert_eq!(app.lists.len(), 1);
        assert_eq!(app.lists[0].kind(), &ResourceKind::Influencers);
        assert!(app.lists[0].is_busy());

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::Menu);
        assert!(app.lists.is_empty());
    }

    #[tokio::test]
    async fn test_nested_listing_returns_to_parent() {
        let mut app = app();
        app.open_list(ResourceKind::Projects);
        app.open_list(ResourceKind::ProjectBids("p1".to_string()));
        assert_eq!(app.lists.len(), 2);

        app.navigate_back();
        assert_eq!(app.current_screen, Screen::List);
        assert_eq!(app.lists.last().unwrap().kind(), &ResourceKind::Projects);
    }

    #[tokio::test]
    async fn test_q_is_typed_into_search_prompt() {
        let mut app = app();
        app.open_list(ResourceKind::Influencers);
        app.handle_key_event(key(KeyCode::Char('/')));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit);

        app.handle_key_event(key(KeyCode::Esc));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_detail_loads_without_blocking_keys() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"data": {"_id": "q1", "name": "Ravi"}}));
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::with_token("tok")),
        );
        let mut app = App::new(Config::default(), client);
        app.open_list(ResourceKind::Queries);

        app.apply_action(ScreenAction::OpenDetail(ResourceKind::Queries, "q1".to_string()));
        assert_eq!(app.current_screen, Screen::Detail);
        assert!(app.detail.as_ref().unwrap().is_loading());
        assert!(transport.requests().is_empty());

        let loaded = app.loads.next().await.unwrap();
        app.on_loaded(loaded);
        let detail = app.detail.as_ref().unwrap();
        assert!(!detail.is_loading());
        assert_eq!(transport.requests()[0].path, "/queries/q1");
    }

    #[tokio::test]
    async fn test_late_detail_is_dropped_after_leaving() {
        let mut app = app();
        app.open_list(ResourceKind::Queries);
        app.apply_action(ScreenAction::OpenDetail(ResourceKind::Queries, "q1".to_string()));

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::List);
        assert!(app.detail.is_none());

        let loaded = app.loads.next().await.unwrap();
        app.on_loaded(loaded);
        assert!(app.detail.is_none());
    }

    #[tokio::test]
    async fn test_stats_show_loading_until_applied() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(ApiError::Network("connection refused".to_string()));
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::with_token("tok")),
        );
        let mut app = App::new(Config::default(), client);

        app.handle_key_event(key(KeyCode::Char('s')));
        assert_eq!(app.current_screen, Screen::Stats);
        assert!(app.stats.report.is_none() && app.stats.error.is_none());
        assert_eq!(app.loads.len(), 1);

        let loaded = app.loads.next().await.unwrap();
        app.on_loaded(loaded);
        assert!(app.stats.error.is_some());
        assert!(app.error_message.is_some());
    }

    #[tokio::test]
    async fn test_help_popup_swallows_keys() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        app.handle_key_event(key(KeyCode::Char('1')));
        assert_eq!(app.current_screen, Screen::Menu);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.show_help_popup);
    }
}
