use serde::{Deserialize, Serialize};

use super::common::{any_contains, date_only, or_na};
use super::{ActionPlan, Column, Record, Resource, SearchMode};
use crate::models::{ActionKind, RowAction};

/// Message submitted through the public contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Record for ContactQuery {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn matches_search(&self, term: &str) -> bool {
        any_contains(
            &[
                self.name.as_deref(),
                self.email.as_deref(),
                self.subject.as_deref(),
                self.message.as_deref(),
            ],
            term,
        )
    }
}

pub struct Queries;

impl Resource for Queries {
    type Row = ContactQuery;

    fn name(&self) -> &'static str {
        "queries"
    }

    fn title(&self) -> &'static str {
        "Contact Queries"
    }

    fn collection_path(&self) -> String {
        "/queries".to_string()
    }

    fn columns(&self) -> Vec<Column<ContactQuery>> {
        vec![
            Column::new("name", "Name", 18, |r: &ContactQuery| or_na(r.name.as_deref())),
            Column::new("email", "Email", 24, |r: &ContactQuery| or_na(r.email.as_deref())),
            Column::new("subject", "Subject", 24, |r: &ContactQuery| or_na(r.subject.as_deref())),
            Column::new("status", "Status", 8, |r: &ContactQuery| {
                r.status.clone().unwrap_or_else(|| "new".to_string())
            }),
            Column::new("createdAt", "Received", 12, |r: &ContactQuery| {
                date_only(r.created_at.as_deref())
            }),
        ]
    }

    // The endpoint ignores `q`; search runs over the loaded rows
    fn search_mode(&self) -> SearchMode {
        SearchMode::Local
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!(
                "/dashboard/query/{}",
                action.id
            ))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/queries/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_local_search_covers_all_text_fields() {
        let row: ContactQuery = serde_json::from_value(json!({
            "_id": "q1",
            "name": "Meera",
            "email": "meera@example.com",
            "subject": "Payout delay",
            "message": "My payout for June is late"
        }))
        .unwrap();

        assert!(row.matches_search("PAYOUT"));
        assert!(row.matches_search("meera@"));
        assert!(row.matches_search("june"));
        assert!(!row.matches_search("refund"));
        assert_eq!(Queries.search_mode(), SearchMode::Local);
    }
}
