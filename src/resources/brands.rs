use serde::{Deserialize, Serialize};

use super::common::or_na;
use super::{ActionPlan, Column, Record, Resource};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Record for Brand {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct Brands;

impl Resource for Brands {
    type Row = Brand;

    fn name(&self) -> &'static str {
        "brands"
    }

    fn title(&self) -> &'static str {
        "Brands"
    }

    fn collection_path(&self) -> String {
        "/brands".to_string()
    }

    fn columns(&self) -> Vec<Column<Brand>> {
        vec![
            Column::new("name", "Name", 20, |r: &Brand| or_na(r.name.as_deref())),
            Column::new("description", "Description", 36, |r: &Brand| {
                or_na(r.description.as_deref())
            }),
            Column::new("website", "Website", 28, |r: &Brand| or_na(r.website.as_deref())),
        ]
    }

    // Brands are edited through the brand form, there is no delete endpoint
    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::Edit => Some(ActionPlan::Navigate(format!("/brands/{}", action.id))),
            _ => None,
        }
    }
}
