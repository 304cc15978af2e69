use serde_json::{json, Value};
use tracing::info;

use crate::api::ApiClient;
use crate::credentials::CredentialStore;
use crate::error::ApiError;

/// Exchange admin credentials for a bearer token and store it
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
    expiry_days: u32,
) -> Result<(), ApiError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Both email and password are required".to_string(),
        ));
    }

    let data = client
        .post(
            "/admin/login",
            json!({ "email": email.trim(), "password": password }),
        )
        .await?;

    let token = data
        .get("token")
        .or_else(|| data.pointer("/data/token"))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))?;

    client.credentials().set_token(token, expiry_days)?;
    info!("Logged in as {}", email.trim());
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<(), ApiError> {
    client.credentials().clear()?;
    info!("Cleared stored token");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_stores_token() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": true, "token": "jwt-123"}));
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::new()));

        login(&client, " admin@example.com ", "pw", 7).await.unwrap();
        assert_eq!(client.credentials().token().as_deref(), Some("jwt-123"));

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/admin/login");
        assert_eq!(
            request.body,
            Some(json!({"email": "admin@example.com", "password": "pw"}))
        );

        logout(&client).unwrap();
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_store_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": false, "message": "Invalid credentials"}));
        let client = ApiClient::new(transport, Arc::new(MemoryCredentialStore::new()));

        let err = login(&client, "a@b.c", "wrong", 7).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::new()));
        assert!(matches!(
            login(&client, "", "pw", 7).await,
            Err(ApiError::Validation(_))
        ));
        assert!(transport.requests().is_empty());
    }
}
