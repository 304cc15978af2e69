use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{amount, or_na, party_or_na, PartyRef};
use super::{ActionEffect, ActionPlan, ActionRequest, Column, FilterSpec, Record, Resource};
use crate::models::{ActionKind, RowAction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub influencer: Option<PartyRef>,
    #[serde(default)]
    pub client: Option<PartyRef>,
    #[serde(default)]
    pub project: Option<PartyRef>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Payment {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid")
    }

    /// Outstanding amount, never negative
    pub fn due(&self) -> f64 {
        (self.total_amount.unwrap_or(0.0) - self.amount_paid.unwrap_or(0.0)).max(0.0)
    }
}

impl Record for Payment {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_string());
        if status == "paid" {
            self.amount_paid = self.total_amount.or(self.amount_paid);
        }
    }
}

/// Deal payments between clients and influencers
pub struct Payments;

impl Resource for Payments {
    type Row = Payment;

    fn name(&self) -> &'static str {
        "payments"
    }

    fn title(&self) -> &'static str {
        "Deal Payments"
    }

    fn collection_path(&self) -> String {
        "/admin/payments".to_string()
    }

    fn columns(&self) -> Vec<Column<Payment>> {
        vec![
            Column::new("paymentId", "Payment", 12, |r: &Payment| {
                or_na(r.payment_id.as_deref().or(Some(r.id.as_str())))
            }),
            Column::new("influencer", "Influencer", 18, |r: &Payment| {
                party_or_na(r.influencer.as_ref())
            }),
            Column::new("client", "Client", 18, |r: &Payment| party_or_na(r.client.as_ref())),
            Column::new("project", "Project", 20, |r: &Payment| party_or_na(r.project.as_ref())),
            Column::new("totalAmount", "Total", 10, |r: &Payment| amount(r.total_amount)),
            Column::new("amountPaid", "Paid", 10, |r: &Payment| amount(r.amount_paid)),
            Column::new("due", "Due", 10, |r: &Payment| amount(Some(r.due()))),
            Column::new("currency", "Cur", 5, |r: &Payment| {
                r.currency.clone().unwrap_or_else(|| "INR".to_string())
            }),
            Column::new("status", "Status", 10, |r: &Payment| or_na(r.status.as_deref())),
        ]
    }

    fn filters(&self) -> Vec<FilterSpec> {
        vec![FilterSpec {
            key: "status",
            label: "Status",
            options: &["pending", "partial", "paid"],
        }]
    }

    fn plan(&self, action: &RowAction) -> Option<ActionPlan> {
        match action.kind {
            ActionKind::MarkPaid => Some(ActionPlan::Mutate(
                ActionRequest::new(
                    Method::POST,
                    format!("/admin/payments/{}/mark-paid", action.id),
                    ActionEffect::SetStatus("paid"),
                )
                .with_body(json!({})),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_paid_plan() {
        let plan = Payments.plan(&RowAction::new("pay1", ActionKind::MarkPaid)).unwrap();
        match plan {
            ActionPlan::Mutate(request) => {
                assert_eq!(request.method, Method::POST);
                assert_eq!(request.path, "/admin/payments/pay1/mark-paid");
                assert_eq!(request.effect, ActionEffect::SetStatus("paid"));
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn test_set_status_paid_fills_amount() {
        let mut payment: Payment = serde_json::from_value(json!({
            "_id": "pay1",
            "totalAmount": 150,
            "amountPaid": 50,
            "status": "partial"
        }))
        .unwrap();
        assert!(!payment.is_paid());
        assert_eq!(payment.due(), 100.0);
        payment.set_status("paid");
        assert!(payment.is_paid());
        assert_eq!(payment.amount_paid, Some(150.0));
        assert_eq!(payment.due(), 0.0);
    }
}
