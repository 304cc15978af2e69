//! Platform fee and paid registration settings form

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
use crate::dashboard::ui::{InputField, Styles};
use crate::error::ApiError;
use crate::forms::{is_numeric_input, RegistrationConfig, RegistrationForm, Settings, SettingsForm};

/// Focus positions: four fee inputs, the toggle, then the registration fee
const FIELD_COUNT: usize = 6;
const TOGGLE: usize = 4;
const REGISTRATION_AMOUNT: usize = 5;

/// A validated section waiting to be sent
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Fees(SettingsForm),
    Registration(RegistrationForm),
}

impl SaveRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        match self {
            SaveRequest::Fees(form) => form.validate().map(|_| ()),
            SaveRequest::Registration(form) => form.validate().map(|_| ()),
        }
    }
}

/// Outcome of a key press on the settings screen
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsInput {
    Action(ScreenAction),
    /// The caller sends the request and reports the result
    Save(SaveRequest),
}

/// Both settings sections, fetched together
pub async fn fetch_sections(
    client: &ApiClient,
) -> Result<(Settings, RegistrationConfig), ApiError> {
    let settings = admin::load_settings(client).await?;
    let registration = admin::load_registration_config(client).await?;
    Ok((settings, registration))
}

/// Send one section and turn the outcome into a status line
pub async fn save_section(client: &ApiClient, request: SaveRequest) -> ScreenAction {
    match request {
        SaveRequest::Fees(form) => match admin::save_settings(client, &form).await {
            Ok(_) => ScreenAction::SetStatus("Settings saved".to_string()),
            Err(e) => {
                warn!("Saving settings failed: {}", e);
                ScreenAction::SetError(e.user_message())
            }
        },
        SaveRequest::Registration(form) => {
            match admin::save_registration_config(client, &form).await {
                Ok(_) => ScreenAction::SetStatus("Registration configuration saved".to_string()),
                Err(e) => {
                    warn!("Saving registration config failed: {}", e);
                    ScreenAction::SetError(e.user_message())
                }
            }
        }
    }
}

pub struct SettingsScreen {
    /// Vendor commission, platform fee, GST, delivery fee, registration fee
    pub inputs: Vec<InputField>,
    pub registration_enabled: bool,
    pub focus: usize,
    pub loading: bool,
    pub saving: bool,
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsScreen {
    pub fn new() -> Self {
        let mut screen = Self {
            inputs: vec![
                InputField::new("Vendor commission (%)"),
                InputField::new("Platform fee (%)"),
                InputField::new("GST (%)"),
                InputField::new("Delivery fee (₹)"),
                InputField::new("Registration fee (₹)"),
            ],
            registration_enabled: false,
            focus: 0,
            loading: false,
            saving: false,
        };
        screen.update_focus();
        screen
    }

    fn input_index(focus: usize) -> Option<usize> {
        match focus {
            0..=3 => Some(focus),
            REGISTRATION_AMOUNT => Some(4),
            _ => None,
        }
    }

    fn update_focus(&mut self) {
        let active = Self::input_index(self.focus);
        for (index, input) in self.inputs.iter_mut().enumerate() {
            input.is_focused = Some(index) == active;
        }
    }

    pub fn fill(&mut self, settings: &Settings, registration: &RegistrationConfig) {
        let form = SettingsForm::from_settings(settings);
        self.inputs[0].set_value(&form.vendor_commission);
        self.inputs[1].set_value(&form.platform_fee);
        self.inputs[2].set_value(&form.gst);
        self.inputs[3].set_value(&form.delivery_fee);
        self.inputs[4].set_value(&registration.amount_inr.to_string());
        self.registration_enabled = registration.enabled;
    }

    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm {
            vendor_commission: self.inputs[0].value.clone(),
            platform_fee: self.inputs[1].value.clone(),
            gst: self.inputs[2].value.clone(),
            delivery_fee: self.inputs[3].value.clone(),
        }
    }

    pub fn registration_form(&self) -> RegistrationForm {
        RegistrationForm {
            enabled: self.registration_enabled,
            amount_inr: self.inputs[4].value.clone(),
        }
    }

    /// Fill the form from a finished load
    pub fn apply_loaded(
        &mut self,
        result: Result<(Settings, RegistrationConfig), ApiError>,
    ) -> Result<(), String> {
        self.loading = false;
        match result {
            Ok((settings, registration)) => {
                self.fill(&settings, &registration);
                Ok(())
            }
            Err(e) => {
                warn!("Loading settings failed: {}", e);
                Err(e.user_message())
            }
        }
    }

    pub fn finish_save(&mut self) {
        self.saving = false;
    }

    /// The section holding the focused field
    fn save_request(&self) -> SaveRequest {
        if self.focus < TOGGLE {
            SaveRequest::Fees(self.settings_form())
        } else {
            SaveRequest::Registration(self.registration_form())
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> SettingsInput {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                self.update_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                self.update_focus();
            }
            KeyCode::Enter => {
                if self.saving {
                    return SettingsInput::Action(ScreenAction::SetStatus(
                        "Still saving…".to_string(),
                    ));
                }
                let request = self.save_request();
                if let Err(e) = request.validate() {
                    return SettingsInput::Action(ScreenAction::SetError(e.user_message()));
                }
                self.saving = true;
                return SettingsInput::Save(request);
            }
            KeyCode::Esc => return SettingsInput::Action(ScreenAction::NavigateBack),
            KeyCode::Char(' ') if self.focus == TOGGLE => {
                self.registration_enabled = !self.registration_enabled;
            }
            KeyCode::Char(c) => {
                if let Some(index) = Self::input_index(self.focus) {
                    let mut candidate = self.inputs[index].value.clone();
                    candidate.push(c);
                    if is_numeric_input(&candidate) {
                        self.inputs[index].insert_char(c);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(index) = Self::input_index(self.focus) {
                    self.inputs[index].delete_char();
                }
            }
            _ => {}
        }
        SettingsInput::Action(ScreenAction::None)
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let fee_title = if self.loading {
            "Platform settings (loading…)"
        } else {
            "Platform settings"
        };
        let fees = Block::default()
            .title(Span::styled(fee_title, Styles::title()))
            .borders(Borders::ALL);
        let fee_area = fees.inner(columns[0]);
        f.render_widget(fees, columns[0]);
        let fee_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(fee_area);
        for (input, row) in self.inputs[..4].iter().zip(fee_rows.iter()) {
            input.render(f, *row);
        }

        let registration = Block::default()
            .title(Span::styled("Paid registration", Styles::title()))
            .borders(Borders::ALL);
        let registration_area = registration.inner(columns[1]);
        f.render_widget(registration, columns[1]);
        let registration_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
            .split(registration_area);

        let toggle_style = if self.focus == TOGGLE {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };
        let toggle = Line::from(vec![
            Span::raw(if self.registration_enabled { "[x] " } else { "[ ] " }),
            Span::raw("Charge a registration fee (space to toggle)"),
        ]);
        f.render_widget(
            Paragraph::new(toggle).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(toggle_style),
            ),
            registration_rows[0],
        );
        self.inputs[4].render(f, registration_rows[1]);
        let hint = if self.saving {
            "Saving…"
        } else {
            "Tab: next field · Enter: save section · Esc: back"
        };
        f.render_widget(
            Paragraph::new(hint).style(Styles::inactive()),
            registration_rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn client_with(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[test]
    fn test_only_numeric_keys_are_accepted() {
        let mut screen = SettingsScreen::new();
        for c in "1a2.5.".chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
        assert_eq!(screen.inputs[0].value, "12.5");
    }

    #[test]
    fn test_invalid_commission_is_not_sent() {
        let mut screen = SettingsScreen::new();
        screen.inputs[0].set_value("150");

        let input = screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(
            input,
            SettingsInput::Action(ScreenAction::SetError(
                "Vendor commission cannot exceed 100%".to_string()
            ))
        );
        assert!(!screen.saving);
    }

    #[tokio::test]
    async fn test_save_registration_section() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": true}));
        let client = client_with(&transport);
        let mut screen = SettingsScreen::new();

        for _ in 0..TOGGLE {
            screen.handle_key_event(key(KeyCode::Tab));
        }
        screen.handle_key_event(key(KeyCode::Char(' ')));
        screen.handle_key_event(key(KeyCode::Tab));
        for c in "499".chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
        let SettingsInput::Save(request) = screen.handle_key_event(key(KeyCode::Enter)) else {
            panic!("expected a save request");
        };
        assert!(screen.saving);
        assert!(transport.requests().is_empty());

        let action = save_section(&client, request).await;
        assert_eq!(
            action,
            ScreenAction::SetStatus("Registration configuration saved".to_string())
        );
        let request = &transport.requests()[0];
        assert_eq!(request.path, "/registration/config");
        assert_eq!(request.body, Some(json!({"enabled": true, "amountINR": 499})));
    }

    #[tokio::test]
    async fn test_loaded_sections_fill_the_form() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(200, json!({"settings": {"vendorCommission": 12, "gst": 18}}))
            .respond(200, json!({"config": {"enabled": true, "amountINR": 299}}));
        let client = client_with(&transport);

        let mut screen = SettingsScreen::new();
        screen.loading = true;
        let result = fetch_sections(&client).await;
        assert_eq!(screen.apply_loaded(result), Ok(()));

        assert!(!screen.loading);
        assert_eq!(screen.inputs[0].value, "12");
        assert_eq!(screen.inputs[4].value, "299");
        assert!(screen.registration_enabled);
    }
}
