use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::{join_or_na, or_na};
use super::{ActionEffect, ActionPlan, ActionRequest, Column, Record, Resource};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub niches: Vec<String>,
    #[serde(default)]
    pub stats: Option<InfluencerStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerStats {
    #[serde(default)]
    pub followers: Option<u64>,
}

impl Influencer {
    pub fn followers(&self) -> u64 {
        self.stats.as_ref().and_then(|s| s.followers).unwrap_or(0)
    }
}

impl Record for Influencer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Marketplace users on the creator side
pub struct Influencers;

impl Resource for Influencers {
    type Row = Influencer;

    fn name(&self) -> &'static str {
        "influencers"
    }

    fn title(&self) -> &'static str {
        "User List"
    }

    fn collection_path(&self) -> String {
        "/influencers".to_string()
    }

    fn columns(&self) -> Vec<Column<Influencer>> {
        vec![
            Column::new("name", "Name", 24, |r: &Influencer| or_na(r.name.as_deref())),
            Column::new("platforms", "Platforms", 24, |r: &Influencer| join_or_na(&r.platforms)),
            Column::new("niches", "Niches", 24, |r: &Influencer| join_or_na(&r.niches)),
            Column::new("followers", "Followers", 12, |r: &Influencer| r.followers().to_string()),
        ]
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::Edit => Some(ActionPlan::Navigate(format!("/user-detail/{}", action.id))),
            ActionKind::ViewDetail => Some(ActionPlan::Navigate(format!("/user-order/{}", action.id))),
            ActionKind::Delete => Some(ActionPlan::Mutate(ActionRequest::new(
                Method::DELETE,
                format!("/influencers/{}", action.id),
                ActionEffect::Remove,
            ))),
            _ => None,
        }
    }

    fn detail_path(&self, id: &str) -> Option<String> {
        Some(format!("/influencers/id/{}", id))
    }

    fn record_key(&self) -> &'static str {
        "influencer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_influencer_row_from_api() {
        let row: Influencer = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Riya",
            "platforms": ["instagram", "youtube"],
            "stats": {"followers": 12000}
        }))
        .unwrap();

        let columns = Influencers.columns();
        let cells: Vec<String> = columns.iter().map(|c| c.value(&row)).collect();
        assert_eq!(cells, vec!["Riya", "instagram, youtube", "N/A", "12000"]);
    }

    #[test]
    fn test_influencer_actions() {
        assert_eq!(
            Influencers.plan(&RowAction::new("u1", ActionKind::Delete)),
            Some(ActionPlan::Mutate(ActionRequest::new(
                Method::DELETE,
                "/influencers/u1".to_string(),
                ActionEffect::Remove
            )))
        );
        assert_eq!(
            Influencers.plan(&RowAction::new("u1", ActionKind::Edit)),
            Some(ActionPlan::Navigate("/user-detail/u1".to_string()))
        );
        assert!(!Influencers.supports(ActionKind::Approve));
    }
}
