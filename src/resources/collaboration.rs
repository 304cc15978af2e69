use serde::{Deserialize, Serialize};

use super::common::{date_only, or_na, party_or_na, PartyRef};
use super::{ActionPlan, Column, Record, Resource, SearchMode};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
}

/// Inbound request from a brand to an influencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub influencer: Option<PartyRef>,
    #[serde(default)]
    pub project: Option<PartyRef>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub meta: Option<RequestMeta>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl CollaborationRequest {
    pub fn sender(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.sender_name.as_deref())
    }
}

impl Record for CollaborationRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct CollaborationRequests;

impl Resource for CollaborationRequests {
    type Row = CollaborationRequest;

    fn name(&self) -> &'static str {
        "requests"
    }

    fn title(&self) -> &'static str {
        "Collaboration Requests"
    }

    fn collection_path(&self) -> String {
        "/collaboration-requests".to_string()
    }

    fn columns(&self) -> Vec<Column<CollaborationRequest>> {
        vec![
            Column::new("sender", "Sender", 18, |r: &CollaborationRequest| or_na(r.sender())),
            Column::new("influencer", "Recipient", 18, |r: &CollaborationRequest| {
                party_or_na(r.influencer.as_ref())
            }),
            Column::new("project", "Project", 20, |r: &CollaborationRequest| {
                party_or_na(r.project.as_ref())
            }),
            Column::new("message", "Message", 32, |r: &CollaborationRequest| {
                or_na(r.message.as_deref())
            }),
            Column::new("createdAt", "Created", 12, |r: &CollaborationRequest| {
                date_only(r.created_at.as_deref())
            }),
        ]
    }

    fn search_mode(&self) -> SearchMode {
        SearchMode::Unsupported
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!(
                "/collaboration-requests/{}",
                action.id
            ))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/collaboration-requests/{}", id))
    }
}
