//! Analytics overview assembled from the `/admin/stats/*` endpoints

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api::{envelope, ApiClient};
use crate::error::ApiError;
use crate::resources::common::{party_or_na, PartyRef};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    #[serde(default)]
    pub influencer_count: u64,
    #[serde(default)]
    pub client_count: u64,
    #[serde(default)]
    pub total_projects: u64,
    #[serde(default)]
    pub total_bids: u64,
    #[serde(default)]
    pub total_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProject {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub project: Option<PartyRef>,
    #[serde(default)]
    pub bid_count: u64,
}

impl TopProject {
    pub fn label(&self) -> String {
        match (&self.project, &self.id) {
            (Some(project), _) => project.display_name(),
            (None, Some(id)) => id.clone(),
            (None, None) => "N/A".to_string(),
        }
    }
}

/// Grouped count keyed by an entity id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountRow {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedProject {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub client: Option<PartyRef>,
    #[serde(default)]
    pub assigned_influencer: Option<PartyRef>,
}

impl AssignedProject {
    pub fn client_name(&self) -> String {
        party_or_na(self.client.as_ref())
    }

    pub fn influencer_name(&self) -> String {
        party_or_na(self.assigned_influencer.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    pub overview: StatsOverview,
    pub top_projects: Vec<TopProject>,
    pub client_project_counts: Vec<CountRow>,
    pub requests_per_influencer: Vec<CountRow>,
    pub assigned_projects: Vec<AssignedProject>,
}

async fn stats_rows<T: DeserializeOwned>(client: &ApiClient, path: &str) -> Result<Vec<T>, ApiError> {
    let data = client.get(path, Vec::new()).await?;
    envelope::rows(&data, "data")
}

async fn overview(client: &ApiClient) -> Result<StatsOverview, ApiError> {
    let data = client.get("/admin/stats/overview", Vec::new()).await?;
    Ok(envelope::record(&data, "overview")?.unwrap_or_default())
}

/// Fetch all five sections concurrently; any failure fails the report
pub async fn fetch_stats(client: &ApiClient) -> Result<StatsReport, ApiError> {
    let (overview, top_projects, client_project_counts, requests_per_influencer, assigned_projects) =
        futures::try_join!(
            overview(client),
            stats_rows(client, "/admin/stats/top-projects"),
            stats_rows(client, "/admin/stats/client-project-counts"),
            stats_rows(client, "/admin/stats/requests-per-influencer"),
            stats_rows(client, "/admin/stats/assigned-projects"),
        )?;
    debug!(
        "Loaded stats: {} top projects, {} assigned",
        top_projects.len(),
        assigned_projects.len()
    );

    Ok(StatsReport {
        overview,
        top_projects,
        client_project_counts,
        requests_per_influencer,
        assigned_projects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::ScriptedTransport;
    use crate::credentials::MemoryCredentialStore;
    use serde_json::json;
    use std::sync::Arc;

    fn client_with(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::new(transport.clone(), Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    #[tokio::test]
    async fn test_fetch_stats_assembles_sections() {
        let transport = Arc::new(ScriptedTransport::new());
        // try_join! polls its futures in argument order, so requests go out in this order
        transport
            .respond(200, json!({"influencerCount": 12, "clientCount": 4, "totalBids": 30}))
            .respond(200, json!({"data": [{"_id": "p1", "project": {"title": "Launch"}, "bidCount": 9}]}))
            .respond(200, json!({"data": [{"_id": "c1", "count": 3}]}))
            .respond(200, json!({"data": []}))
            .respond(
                200,
                json!({"data": [{"_id": "p2", "title": "Reel", "client": "c1", "assignedInfluencer": {"name": "Asha"}}]}),
            );

        let report = fetch_stats(&client_with(&transport)).await.unwrap();
        assert_eq!(report.overview.influencer_count, 12);
        assert_eq!(report.overview.total_projects, 0);
        assert_eq!(report.top_projects[0].label(), "Launch");
        assert_eq!(report.top_projects[0].bid_count, 9);
        assert_eq!(report.client_project_counts[0].count, 3);
        assert!(report.requests_per_influencer.is_empty());
        assert_eq!(report.assigned_projects[0].client_name(), "c1");
        assert_eq!(report.assigned_projects[0].influencer_name(), "Asha");
    }

    #[tokio::test]
    async fn test_any_section_failure_fails_report() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(200, json!({}))
            .fail(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            })
            .respond(200, json!({"data": []}))
            .respond(200, json!({"data": []}))
            .respond(200, json!({"data": []}));

        assert!(fetch_stats(&client_with(&transport)).await.is_err());
    }
}
