//! Payment creation, transactions and party lookups

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::api::{envelope, ApiClient};
use crate::error::ApiError;
use crate::forms::{PaymentForm, TransactionForm};

/// Which party a lookup searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Influencer,
    Client,
    Project,
}

impl LookupKind {
    fn path(&self) -> &'static str {
        match self {
            LookupKind::Influencer => "/influencers",
            LookupKind::Client => "/clients/filter",
            LookupKind::Project => "/projects",
        }
    }

    fn envelope_key(&self) -> &'static str {
        match self {
            LookupKind::Influencer => "influencers",
            LookupKind::Client => "clients",
            LookupKind::Project => "projects",
        }
    }
}

/// Id and display name of a lookup match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOption {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct RawOption {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

pub async fn lookup(
    client: &ApiClient,
    kind: LookupKind,
    term: &str,
) -> Result<Vec<LookupOption>, ApiError> {
    let data = client
        .get(kind.path(), vec![("q".to_string(), term.trim().to_string())])
        .await?;
    let raw: Vec<RawOption> = envelope::rows(&data, kind.envelope_key())?;
    Ok(raw
        .into_iter()
        .map(|option| LookupOption {
            name: option
                .name
                .or(option.title)
                .unwrap_or_else(|| option.id.clone()),
            id: option.id,
        })
        .collect())
}

pub async fn create_payment(client: &ApiClient, form: &PaymentForm) -> Result<Value, ApiError> {
    let payment = form.validate()?;
    let response = client
        .send_authorized(
            Method::POST,
            "/admin/payments",
            Vec::new(),
            Some(serde_json::to_value(&payment)?),
        )
        .await?;
    info!(
        "Created payment of {} {} for project {}",
        payment.total_amount, payment.currency, payment.project
    );
    Ok(response.data)
}

pub async fn add_transaction(client: &ApiClient, form: &TransactionForm) -> Result<Value, ApiError> {
    let (payment_id, transaction) = form.validate()?;
    let path = format!("/admin/payments/{}/transactions", payment_id);
    let response = client
        .send_authorized(
            Method::POST,
            &path,
            Vec::new(),
            Some(serde_json::to_value(&transaction)?),
        )
        .await?;
    info!("Recorded {} against payment {}", transaction.amount, payment_id);
    Ok(response.data)
}
