//! Resource descriptors
//!
//! Each listing in the dashboard is described once: where its rows live,
//! how the response envelope names them, which columns to show, which
//! filters the server understands, and what every row action does on the
//! wire. The generic list controller is driven entirely by these.

pub mod common;
pub mod influencers;
pub mod clients;
pub mod brands;
pub mod projects;
pub mod payments;
pub mod kyc;
pub mod queries;
pub mod collaboration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{ActionKind, RowAction};

pub use brands::{Brand, Brands};
pub use clients::{Client, Clients};
pub use collaboration::{CollaborationRequest, CollaborationRequests};
pub use common::PartyRef;
pub use influencers::{Influencer, Influencers};
pub use kyc::{KycList, KycSubmission};
pub use payments::{Payment, Payments};
pub use projects::{Bid, ClientProjects, Project, ProjectBids, Projects};
pub use queries::{ContactQuery, Queries};

/// A row returned by a list endpoint
pub trait Record: Clone + Send + Sync + DeserializeOwned + Serialize + 'static {
    fn id(&self) -> &str;

    fn status(&self) -> Option<&str> {
        None
    }

    /// Overwrite the status field after a confirmed status change
    fn set_status(&mut self, _status: &str) {}

    /// Local search predicate for resources the server cannot search
    fn matches_search(&self, _term: &str) -> bool {
        true
    }
}

/// Column descriptor: header label, width hint and cell renderer
pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub width: u16,
    pub render: fn(&T) -> String,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, label: &'static str, width: u16, render: fn(&T) -> String) -> Self {
        Self {
            key,
            label,
            width,
            render,
        }
    }

    pub fn value(&self, row: &T) -> String {
        (self.render)(row)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label,
            width: self.width,
            render: self.render,
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Sent to the server as `q`
    Server,
    /// Applied to the loaded rows
    Local,
    Unsupported,
}

/// A server-side filter with its allowed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

/// How local rows change once a mutation is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    Remove,
    SetStatus(&'static str),
    Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub effect: ActionEffect,
}

impl ActionRequest {
    pub fn new(method: Method, path: String, effect: ActionEffect) -> Self {
        Self {
            method,
            path,
            body: None,
            effect,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// What a row action resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPlan {
    /// Call the API, then apply the effect
    Mutate(ActionRequest),
    /// Hand a route to the presentation layer
    Navigate(String),
}

pub trait Resource: Send + Sync + 'static {
    type Row: Record;

    /// Envelope key and machine name, e.g. `influencers`
    fn name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn collection_path(&self) -> String;

    fn columns(&self) -> Vec<Column<Self::Row>>;

    fn filters(&self) -> Vec<FilterSpec> {
        Vec::new()
    }

    fn search_mode(&self) -> SearchMode {
        SearchMode::Server
    }

    /// Rows failing this stay counted in the total but are not displayed
    fn is_visible(&self, _row: &Self::Row) -> bool {
        true
    }

    /// `None` when the resource does not support the action
    fn plan(&self, action: &RowAction) -> Option<ActionPlan>;

    /// Endpoint for a single record
    fn detail_path(&self, _id: &str) -> Option<String> {
        None
    }

    /// Envelope key of a single record when it is not under `data`
    fn record_key(&self) -> &'static str {
        self.name()
    }

    fn page_size(&self) -> Option<u32> {
        None
    }

    fn supports(&self, kind: ActionKind) -> bool {
        self.plan(&RowAction::new("_", kind)).is_some()
    }
}

/// Listings selectable from the command line and the dashboard menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Influencers,
    Clients,
    Brands,
    Projects,
    ClientProjects(String),
    ProjectBids(String),
    Payments,
    Kyc,
    Queries,
    CollaborationRequests,
}

impl ResourceKind {
    /// Top-level listings, in menu order
    pub fn menu() -> Vec<ResourceKind> {
        vec![
            ResourceKind::Influencers,
            ResourceKind::Clients,
            ResourceKind::Brands,
            ResourceKind::Projects,
            ResourceKind::Payments,
            ResourceKind::Kyc,
            ResourceKind::Queries,
            ResourceKind::CollaborationRequests,
        ]
    }

    /// Parse a listing name; scoped listings take the parent id
    pub fn parse(name: &str, parent_id: Option<&str>) -> Result<Self, String> {
        let kind = match name.to_lowercase().as_str() {
            "influencers" | "users" => ResourceKind::Influencers,
            "clients" | "subscribers" => ResourceKind::Clients,
            "brands" => ResourceKind::Brands,
            "projects" | "orders" => ResourceKind::Projects,
            "payments" => ResourceKind::Payments,
            "kyc" => ResourceKind::Kyc,
            "queries" => ResourceKind::Queries,
            "requests" | "collaboration-requests" => ResourceKind::CollaborationRequests,
            "client-projects" => match parent_id {
                Some(id) => ResourceKind::ClientProjects(id.to_string()),
                None => return Err("client-projects requires --parent <client id>".to_string()),
            },
            "bids" | "project-bids" => match parent_id {
                Some(id) => ResourceKind::ProjectBids(id.to_string()),
                None => return Err("bids requires --parent <project id>".to_string()),
            },
            other => {
                return Err(format!(
                    "Unknown resource: {}. Supported: influencers, clients, brands, projects, \
                     client-projects, bids, payments, kyc, queries, requests",
                    other
                ))
            }
        };
        Ok(kind)
    }

    pub fn label(&self) -> &str {
        match self {
            ResourceKind::Influencers => "Influencers",
            ResourceKind::Clients => "Clients",
            ResourceKind::Brands => "Brands",
            ResourceKind::Projects => "Projects",
            ResourceKind::ClientProjects(_) => "Client Projects",
            ResourceKind::ProjectBids(_) => "Project Bids",
            ResourceKind::Payments => "Payments",
            ResourceKind::Kyc => "KYC Submissions",
            ResourceKind::Queries => "Contact Queries",
            ResourceKind::CollaborationRequests => "Collaboration Requests",
        }
    }
}

/// Bind the descriptor for a `ResourceKind` to `$resource` and evaluate `$body`
///
/// Each arm has its own concrete descriptor type, so `$body` is usually a call
/// into generic code.
#[macro_export]
macro_rules! with_resource {
    ($kind:expr, $resource:ident => $body:expr) => {
        match $kind {
            $crate::resources::ResourceKind::Influencers => {
                let $resource = $crate::resources::Influencers;
                $body
            }
            $crate::resources::ResourceKind::Clients => {
                let $resource = $crate::resources::Clients;
                $body
            }
            $crate::resources::ResourceKind::Brands => {
                let $resource = $crate::resources::Brands;
                $body
            }
            $crate::resources::ResourceKind::Projects => {
                let $resource = $crate::resources::Projects;
                $body
            }
            $crate::resources::ResourceKind::ClientProjects(id) => {
                let $resource = $crate::resources::ClientProjects {
                    client_id: id.to_string(),
                };
                $body
            }
            $crate::resources::ResourceKind::ProjectBids(id) => {
                let $resource = $crate::resources::ProjectBids {
                    project_id: id.to_string(),
                };
                $body
            }
            $crate::resources::ResourceKind::Payments => {
                let $resource = $crate::resources::Payments;
                $body
            }
            $crate::resources::ResourceKind::Kyc => {
                let $resource = $crate::resources::KycList;
                $body
            }
            $crate::resources::ResourceKind::Queries => {
                let $resource = $crate::resources::Queries;
                $body
            }
            $crate::resources::ResourceKind::CollaborationRequests => {
                let $resource = $crate::resources::CollaborationRequests;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_kind() {
        assert_eq!(ResourceKind::parse("users", None), Ok(ResourceKind::Influencers));
        assert_eq!(
            ResourceKind::parse("bids", Some("p1")),
            Ok(ResourceKind::ProjectBids("p1".to_string()))
        );
        assert!(ResourceKind::parse("bids", None).is_err());
        assert!(ResourceKind::parse("invoices", None).is_err());
    }

    #[test]
    fn test_with_resource_binds_descriptor() {
        let kind = ResourceKind::ProjectBids("p1".to_string());
        let path = crate::with_resource!(&kind, resource => resource.collection_path());
        assert_eq!(path, "/admin/projects/p1/bids");

        let names: Vec<&str> = ResourceKind::menu()
            .iter()
            .map(|kind| crate::with_resource!(kind, resource => resource.name()))
            .collect();
        assert_eq!(names[0], "influencers");
        assert_eq!(names[7], "requests");
    }

    #[test]
    fn test_menu_has_every_top_level_listing() {
        let menu = ResourceKind::menu();
        assert_eq!(menu.len(), 8);
        assert!(menu.contains(&ResourceKind::Kyc));
    }
}
