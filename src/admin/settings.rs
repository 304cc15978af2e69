use reqwest::Method;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::{RegistrationConfig, RegistrationForm, Settings, SettingsForm};

/// Current fee settings; a server without stored settings yields defaults
pub async fn load_settings(client: &ApiClient) -> Result<Settings, ApiError> {
    if !client.is_authenticated() {
        return Err(ApiError::MissingToken);
    }
    let settings = client
        .get_record::<Settings>("/admin/get-settings", "settings")
        .await?;
    Ok(settings.unwrap_or_default())
}

pub async fn save_settings(client: &ApiClient, form: &SettingsForm) -> Result<Settings, ApiError> {
    let settings = form.validate()?;
    client
        .send_authorized(
            Method::POST,
            "/admin/set-settings",
            Vec::new(),
            Some(serde_json::to_value(&settings)?),
        )
        .await?;
    info!("Updated platform settings");
    Ok(settings)
}

pub async fn load_registration_config(client: &ApiClient) -> Result<RegistrationConfig, ApiError> {
    let config = client
        .get_record::<RegistrationConfig>("/registration/config", "config")
        .await?;
    Ok(config.unwrap_or_default())
}

pub async fn save_registration_config(
    client: &ApiClient,
    form: &RegistrationForm,
) -> Result<RegistrationConfig, ApiError> {
    let config = form.validate()?;
    client
        .send_authorized(
            Method::POST,
            "/registration/config",
            Vec::new(),
            Some(serde_json::to_value(&config)?),
        )
        .await?;
    info!(
        "Registration fee {} ({} INR)",
        if config.enabled { "enabled" } else { "disabled" },
        config.amount_inr
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use serde_json::json;
    use std::sync::Arc;

    fn authorized(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[tokio::test]
    async fn test_missing_settings_fall_back_to_defaults() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(ApiError::NotFound("/admin/get-settings".to_string()));
        let settings = load_settings(&authorized(&transport)).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_settings_reads_data() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            200,
            json!({"success": true, "data": {"vendorCommission": 10, "plateformfee": 2.5, "gst": 18}}),
        );
        let settings = load_settings(&authorized(&transport)).await.unwrap();
        assert_eq!(settings.vendor_commission, 10.0);
        assert_eq!(settings.platform_fee, 2.5);
        assert_eq!(settings.delivery_fee, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_settings_never_sent() {
        let transport = Arc::new(ScriptedTransport::new());
        let form = SettingsForm {
            gst: "140".to_string(),
            ..Default::default()
        };
        let err = save_settings(&authorized(&transport), &form).await.unwrap_err();
        assert_eq!(err.user_message(), "GST cannot exceed 100%");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_save_registration_config() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": true}));
        let form = RegistrationForm {
            enabled: true,
            amount_inr: "499".to_string(),
        };
        save_registration_config(&authorized(&transport), &form)
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"enabled": true, "amountINR": 499}))
        );
    }
}
