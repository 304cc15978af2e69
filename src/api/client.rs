//! Authenticated request context handed to every screen

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::api::envelope;
use crate::api::transport::{ApiRequest, ApiResponse, RestTransport, Transport};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::ApiError;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Client over reqwest using the configured base URL and timeout
    pub fn from_config(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let transport = RestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), credentials))
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.token().is_some()
    }

    /// Send a request; the token is read from the store at call time
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = ApiRequest::new(method, path)
            .with_query(query)
            .with_token(self.credentials.token());
        if let Some(body) = body {
            request = request.with_body(body);
        }

        let response = self.transport.request(request).await?;
        envelope::ensure_success(response.status, &response.data)?;
        debug!("{} -> {}", path, response.status);
        Ok(response)
    }

    /// Like `send`, but fails early when no token is stored
    pub async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        if !self.is_authenticated() {
            return Err(ApiError::MissingToken);
        }
        self.send(method, path, query, body).await
    }

    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value, ApiError> {
        Ok(self.send(Method::GET, path, query, None).await?.data)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        Ok(self.send(Method::POST, path, Vec::new(), Some(body)).await?.data)
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        Ok(self.send(Method::PUT, path, Vec::new(), Some(body)).await?.data)
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        Ok(self.send(Method::DELETE, path, Vec::new(), None).await?.data)
    }

    /// Fetch one record; a 404 is an empty state rather than an error
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
    ) -> Result<Option<T>, ApiError> {
        match self.get(path, Vec::new()).await {
            Ok(data) => envelope::record(&data, key),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process transport used by tests across the crate

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request it sees
    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, status: u16, data: Value) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse { status, data }));
            self
        }

        pub fn fail(&self, err: ApiError) -> &Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        subject: String,
    }

    #[tokio::test]
    async fn test_token_read_per_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({})).respond(200, json!({}));
        let store = Arc::new(MemoryCredentialStore::new());
        let client = ApiClient::new(transport.clone(), store.clone());

        client.get("/brands", Vec::new()).await.unwrap();
        store.set_token("fresh", 7).unwrap();
        client.get("/brands", Vec::new()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].auth_token, None);
        assert_eq!(requests[1].auth_token.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_send_authorized_requires_token() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::new()));
        let err = client
            .send_authorized(Method::POST, "/admin/set-settings", Vec::new(), Some(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::MissingToken);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_success_false_body_is_server_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": false, "message": "Nope"}));
        let client = ApiClient::new(transport, Arc::new(MemoryCredentialStore::new()));
        let err = client.post("/brands", json!({})).await.unwrap_err();
        assert_eq!(err.user_message(), "Nope");
    }

    #[tokio::test]
    async fn test_get_record_treats_404_as_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .fail(ApiError::NotFound("/queries/x".to_string()))
            .respond(200, json!({"data": {"subject": "Hello"}}));
        let client = ApiClient::new(transport, Arc::new(MemoryCredentialStore::new()));

        let missing: Option<Query> = client.get_record("/queries/x", "query").await.unwrap();
        assert_eq!(missing, None);

        let found: Option<Query> = client.get_record("/queries/y", "query").await.unwrap();
        assert_eq!(found, Some(Query { subject: "Hello".to_string() }));
    }
}
