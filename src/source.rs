//! Data sources feeding the list controller

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::api::{envelope, ApiClient};
use crate::error::ApiError;
use crate::models::{ResourcePage, ResourceQuery};
use crate::resources::{ActionRequest, Record, Resource, SearchMode};

/// Fetches pages of rows and performs row mutations for one listing
#[async_trait]
pub trait ResourceSource<T: Record>: Send + Sync + 'static {
    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ResourcePage<T>, ApiError>;

    async fn execute(&self, request: &ActionRequest) -> Result<(), ApiError>;
}

/// Source backed by the remote API, shaped by a resource descriptor
pub struct RemoteSource<R: Resource> {
    resource: Arc<R>,
    client: ApiClient,
}

impl<R: Resource> RemoteSource<R> {
    pub fn new(resource: Arc<R>, client: ApiClient) -> Self {
        Self { resource, client }
    }

    fn params(&self, query: &ResourceQuery) -> Vec<(String, String)> {
        if self.resource.search_mode() == SearchMode::Server {
            return query.to_params();
        }
        let mut server_query = query.clone();
        server_query.search.clear();
        server_query.to_params()
    }
}

#[async_trait]
impl<R: Resource> ResourceSource<R::Row> for RemoteSource<R> {
    async fn fetch_page(&self, query: &ResourceQuery) -> Result<ResourcePage<R::Row>, ApiError> {
        let path = self.resource.collection_path();
        let data = self.client.get(&path, self.params(query)).await?;

        let rows: Vec<R::Row> = envelope::rows(&data, self.resource.name())?;
        let total_count = envelope::total(&data).unwrap_or_else(|| {
            (query.page.saturating_sub(1) as u64) * query.page_size as u64 + rows.len() as u64
        });
        debug!(
            "Fetched {} {} rows (page {}, total {})",
            rows.len(),
            self.resource.name(),
            query.page,
            total_count
        );

        Ok(ResourcePage {
            rows,
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }

    async fn execute(&self, request: &ActionRequest) -> Result<(), ApiError> {
        self.client
            .send(
                request.method.clone(),
                &request.path,
                Vec::new(),
                request.body.clone(),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use crate::models::{ActionKind, RowAction};
    use crate::resources::{ActionPlan, Influencers, KycList, Queries};
    use reqwest::Method;
    use serde_json::json;

    fn client_with(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport, Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[tokio::test]
    async fn test_fetch_reads_envelope_key_and_total() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            200,
            json!({
                "success": true,
                "influencers": [{"_id": "i1", "name": "Asha"}, {"_id": "i2", "name": "Ravi"}],
                "pagination": {"total": 42}
            }),
        );
        let source = RemoteSource::new(Arc::new(Influencers), client_with(transport.clone()));

        let query = ResourceQuery::new(10).with_search("as");
        let page = source.fetch_page(&query).await.unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total_count, 42);
        assert_eq!(page.total_pages(), 5);

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/influencers");
        assert!(request.query.contains(&("q".to_string(), "as".to_string())));
        assert_eq!(request.auth_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_missing_total_is_estimated_from_rows() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"data": [{"_id": "k1", "status": "pending"}]}));
        let source = RemoteSource::new(Arc::new(KycList), client_with(transport));

        let mut query = ResourceQuery::new(20);
        query.page = 3;
        let page = source.fetch_page(&query).await.unwrap();
        assert_eq!(page.total_count, 41);
    }

    #[tokio::test]
    async fn test_local_search_not_sent_to_server() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"queries": []}));
        let source = RemoteSource::new(Arc::new(Queries), client_with(transport.clone()));

        source
            .fetch_page(&ResourceQuery::new(10).with_search("refund"))
            .await
            .unwrap();
        let request = &transport.requests()[0];
        assert!(request.query.iter().all(|(k, _)| k != "q"));
    }

    #[tokio::test]
    async fn test_execute_sends_planned_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, json!({"success": true}));
        let source = RemoteSource::new(Arc::new(KycList), client_with(transport.clone()));

        let plan = KycList.plan(&RowAction::new("k9", ActionKind::Approve));
        let Some(ActionPlan::Mutate(request)) = plan else {
            panic!("approve should mutate");
        };
        source.execute(&request).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path, "/kyc/k9/review");
        assert_eq!(sent.body, Some(json!({"action": "accept"})));
    }
}
