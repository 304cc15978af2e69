use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{or_na, party_or_na, PartyRef};
use super::{ActionEffect, ActionPlan, ActionRequest, Column, FilterSpec, Record, Resource};
use crate::models::{ActionKind, RowAction};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmission {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<PartyRef>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    pub bank_holder_name: Option<String>,
    #[serde(default)]
    pub bank_ifsc: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl KycSubmission {
    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some(STATUS_PENDING)
    }
}

impl Record for KycSubmission {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_string());
    }
}

/// KYC submissions awaiting review
pub struct KycList;

impl Resource for KycList {
    type Row = KycSubmission;

    fn name(&self) -> &'static str {
        "kyc"
    }

    fn title(&self) -> &'static str {
        "KYC Submissions"
    }

    fn collection_path(&self) -> String {
        "/kyc".to_string()
    }

    fn columns(&self) -> Vec<Column<KycSubmission>> {
        vec![
            Column::new("user", "User", 20, |r: &KycSubmission| party_or_na(r.user.as_ref())),
            Column::new("email", "Email", 24, |r: &KycSubmission| {
                or_na(r.user.as_ref().and_then(PartyRef::email))
            }),
            Column::new("panNumber", "PAN", 12, |r: &KycSubmission| or_na(r.pan_number.as_deref())),
            Column::new("aadharNumber", "Aadhar", 14, |r: &KycSubmission| {
                or_na(r.aadhar_number.as_deref())
            }),
            Column::new("bank", "Bank", 24, |r: &KycSubmission| {
                format!(
                    "{} • {}",
                    or_na(r.bank_holder_name.as_deref()),
                    or_na(r.bank_ifsc.as_deref())
                )
            }),
            Column::new("status", "Status", 10, |r: &KycSubmission| or_na(r.status.as_deref())),
        ]
    }

    fn filters(&self) -> Vec<FilterSpec> {
        vec![FilterSpec {
            key: "status",
            label: "Status",
            options: &[STATUS_PENDING, STATUS_ACCEPTED, STATUS_REJECTED],
        }]
    }

    fn is_visible(&self, row: &KycSubmission) -> bool {
        row.status.as_deref() != Some(STATUS_REJECTED)
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        let (verb, status) = match action.kind {
            ActionKind::Approve => ("accept", STATUS_ACCEPTED),
            ActionKind::Reject => ("reject", STATUS_REJECTED),
            _ => return None,
        };
        Some(ActionPlan::Mutate(
            ActionRequest::new(
                Method::POST,
                format!("/kyc/{}/review", action.id),
                ActionEffect::SetStatus(status),
            )
            .with_body(json!({ "action": verb })),
        ))
    }

    fn page_size(&self) -> Option<u32> {
        Some(20)
    }
}
