use reqwest::Method;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::PasswordForm;

/// Set a new password for a user account
pub async fn reset_password(client: &ApiClient, form: &PasswordForm) -> Result<(), ApiError> {
    let reset = form.validate()?;
    client
        .send_authorized(
            Method::PUT,
            "/admin/update-user-password",
            Vec::new(),
            Some(serde_json::to_value(&reset)?),
        )
        .await?;
    info!("Password updated for user {}", reset.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reset_password_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": true}));
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::with_token("tok")),
        );
        let form = PasswordForm {
            user_id: "u1".to_string(),
            password: "n3w".to_string(),
            confirm: "n3w".to_string(),
        };

        reset_password(&client, &form).await.unwrap();
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.body, Some(json!({"id": "u1", "password": "n3w"})));
    }

    #[tokio::test]
    async fn test_mismatch_blocks_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::with_token("tok")),
        );
        let form = PasswordForm {
            user_id: "u1".to_string(),
            password: "a".to_string(),
            confirm: "b".to_string(),
        };
        assert!(reset_password(&client, &form).await.is_err());
        assert!(transport.requests().is_empty());
    }
}
