use serde_json::Value;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::resources::Resource;

/// One record: the typed row plus the JSON exactly as the server sent it
#[derive(Debug, Clone)]
pub struct RecordDetail<T> {
    pub row: T,
    pub raw: Value,
}

/// Fetch one record of a resource; `Ok(None)` when the server has no such record
pub async fn fetch_detail<R: Resource>(
    client: &ApiClient,
    resource: &R,
    id: &str,
) -> Result<Option<RecordDetail<R::Row>>, ApiError> {
    let path = resource.detail_path(id).ok_or_else(|| {
        ApiError::Validation(format!("{} has no detail view", resource.title()))
    })?;
    debug!("Loading {} detail from {}", resource.name(), path);

    let Some(raw) = client
        .get_record::<Value>(&path, resource.record_key())
        .await?
    else {
        return Ok(None);
    };
    let row = serde_json::from_value(raw.clone())
        .map_err(|e| ApiError::Decode(format!("{}: {}", resource.record_key(), e)))?;
    Ok(Some(RecordDetail { row, raw }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use crate::resources::{Brands, Influencers, Queries};
    use serde_json::json;
    use std::sync::Arc;

    fn client_with(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[tokio::test]
    async fn test_influencer_detail_uses_named_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            200,
            json!({"influencer": {"_id": "i1", "name": "Asha", "platforms": ["instagram"]}}),
        );
        let detail = fetch_detail(&client_with(&transport), &Influencers, "i1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.row.name.as_deref(), Some("Asha"));
        assert_eq!(transport.requests()[0].path, "/influencers/id/i1");
    }

    #[tokio::test]
    async fn test_detail_keeps_unmodelled_fields() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            200,
            json!({"data": {"_id": "q1", "name": "Ravi", "attachments": ["invoice.pdf"]}}),
        );
        let detail = fetch_detail(&client_with(&transport), &Queries, "q1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.row.id, "q1");
        assert_eq!(detail.raw["attachments"], json!(["invoice.pdf"]));
    }

    #[tokio::test]
    async fn test_missing_record_is_empty_state() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(ApiError::NotFound("/queries/q9".to_string()));
        let detail = fetch_detail(&client_with(&transport), &Queries, "q9")
            .await
            .unwrap();
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_resource_without_detail_view() {
        let transport = Arc::new(ScriptedTransport::new());
        let err = fetch_detail(&client_with(&transport), &Brands, "b1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }
}
