use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::{date_only, or_na};
use super::{ActionEffect, ActionPlan, ActionRequest, Column, Record, Resource};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phone")]
    pub mobile: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Brand-side accounts ("subscribers")
pub struct Clients;

impl Resource for Clients {
    type Row = Client;

    fn name(&self) -> &'static str {
        "clients"
    }

    fn title(&self) -> &'static str {
        "Client List"
    }

    fn collection_path(&self) -> String {
        "/admin/clients".to_string()
    }

    fn columns(&self) -> Vec<Column<Client>> {
        vec![
            Column::new("name", "Name", 22, |r: &Client| or_na(r.name.as_deref())),
            Column::new("email", "Email", 28, |r: &Client| or_na(r.email.as_deref())),
            Column::new("mobile", "Mobile", 14, |r: &Client| or_na(r.mobile.as_deref())),
            Column::new("subscription", "Subscription", 14, |r: &Client| {
                or_na(r.subscription.as_deref())
            }),
            Column::new("createdAt", "Start Date", 12, |r: &Client| date_only(r.created_at.as_deref())),
            Column::new("updatedAt", "End Date", 12, |r: &Client| date_only(r.updated_at.as_deref())),
        ]
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::Edit => Some(ActionPlan::Navigate(format!("/edituser/{}", action.id))),
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!("/client/{}", action.id))),
            ActionKind::Delete => Some(ActionPlan::Mutate(ActionRequest::new(
                Method::DELETE,
                format!("/admin/clients/{}", action.id),
                ActionEffect::Remove,
            ))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/admin/clients/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_accepts_either_id_field() {
        let a: Client = serde_json::from_value(json!({"id": "c1", "name": "Acme"})).unwrap();
        let b: Client = serde_json::from_value(json!({"_id": "c2", "phone": "98765"})).unwrap();
        assert_eq!(a.id(), "c1");
        assert_eq!(b.id(), "c2");
        assert_eq!(b.mobile.as_deref(), Some("98765"));
    }

    #[test]
    fn test_client_delete_endpoint() {
        match Clients.plan(&RowAction::new("c9", ActionKind::Delete)) {
            Some(ActionPlan::Mutate(request)) => {
                assert_eq!(request.path, "/admin/clients/c9");
                assert_eq!(request.effect, ActionEffect::Remove);
            }
            other => panic!("unexpected plan: {:?}", other),
        }
        assert_eq!(Clients.detail_path("c9").as_deref(), Some("/admin/clients/c9"));
    }
}
