use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::{amount, any_contains, date_only, join_or_na, or_na, party_or_na, PartyRef};
use super::{ActionEffect, ActionPlan, ActionRequest, Column, Record, Resource, SearchMode};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub client: Option<PartyRef>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub niches: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Project {
    pub fn budget(&self) -> String {
        if self.budget_min.is_none() && self.budget_max.is_none() {
            return "N/A".to_string();
        }
        format!("{} - {}", amount(self.budget_min), amount(self.budget_max))
    }
}

impl Record for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_string());
    }

    fn matches_search(&self, term: &str) -> bool {
        any_contains(&[self.title.as_deref(), self.status.as_deref()], term)
    }
}

fn project_columns() -> Vec<Column<Project>> {
    vec![
        Column::new("title", "Title", 28, |r: &Project| or_na(r.title.as_deref())),
        Column::new("client", "Client", 18, |r: &Project| party_or_na(r.client.as_ref())),
        Column::new("createdAt", "Created", 12, |r: &Project| date_only(r.created_at.as_deref())),
        Column::new("budget", "Budget", 16, |r: &Project| r.budget()),
        Column::new("niches", "Niches", 18, |r: &Project| join_or_na(&r.niches)),
        Column::new("platforms", "Platforms", 18, |r: &Project| join_or_na(&r.platforms)),
        Column::new("status", "Status", 8, |r: &Project| {
            r.status.as_deref().map(str::to_uppercase).unwrap_or_else(|| "N/A".to_string())
        }),
    ]
}

/// All client projects ("orders")
pub struct Projects;

impl Resource for Projects {
    type Row = Project;

    fn name(&self) -> &'static str {
        "projects"
    }

    fn title(&self) -> &'static str {
        "Projects"
    }

    fn collection_path(&self) -> String {
        "/clients/projects".to_string()
    }

    fn columns(&self) -> Vec<Column<Project>> {
        project_columns()
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::Edit => Some(ActionPlan::Navigate(format!("/order/edit/{}", action.id))),
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!("/order/{}", action.id))),
            ActionKind::Delete => Some(ActionPlan::Mutate(ActionRequest::new(
                Method::DELETE,
                format!("/clients/projects/{}", action.id),
                ActionEffect::Remove,
            ))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/clients/projects/id/{}", id))
    }

    fn record_key(&self) -> &'static str {
        "project"
    }
}

/// Projects owned by one client
pub struct ClientProjects {
    pub client_id: String,
}

impl Resource for ClientProjects {
    type Row = Project;

    fn name(&self) -> &'static str {
        "projects"
    }

    fn title(&self) -> &'static str {
        "Client Projects"
    }

    fn collection_path(&self) -> String {
        format!("/admin/clients/{}/projects", self.client_id)
    }

    fn columns(&self) -> Vec<Column<Project>> {
        project_columns()
    }

    fn search_mode(&self) -> SearchMode {
        SearchMode::Local
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!("/project/{}/bids", action.id))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/clients/projects/id/{}", id))
    }

    fn record_key(&self) -> &'static str {
        "project"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub influencer: Option<PartyRef>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Record for Bid {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Bids placed on one project
pub struct ProjectBids {
    pub project_id: String,
}

impl Resource for ProjectBids {
    type Row = Bid;

    fn name(&self) -> &'static str {
        "bids"
    }

    fn title(&self) -> &'static str {
        "Project Bids"
    }

    fn collection_path(&self) -> String {
        format!("/admin/projects/{}/bids", self.project_id)
    }

    fn columns(&self) -> Vec<Column<Bid>> {
        vec![
            Column::new("influencer", "Influencer", 20, |r: &Bid| party_or_na(r.influencer.as_ref())),
            Column::new("email", "Email", 24, |r: &Bid| {
                or_na(r.influencer.as_ref().and_then(PartyRef::email))
            }),
            Column::new("amount", "Amount", 10, |r: &Bid| amount(r.amount)),
            Column::new("message", "Message", 30, |r: &Bid| or_na(r.message.as_deref())),
            Column::new("status", "Status", 10, |r: &Bid| or_na(r.status.as_deref())),
            Column::new("createdAt", "Created", 12, |r: &Bid| date_only(r.created_at.as_deref())),
        ]
    }

    fn search_mode(&self) -> SearchMode {
        SearchMode::Unsupported
    }

    fn plan(&self, _action: &RowAction) -> Option<ActionPlan> {
        None
    }
}
