//! Form input validation for the admin operations
//!
//! Forms hold raw text the way it was typed. `validate` turns them into the
//! typed payload sent to the API, or a `Validation` error naming the first
//! offending field. Nothing here touches the network.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ApiError;

/// Keystroke guard for numeric inputs: digits with at most one decimal point
pub fn is_numeric_input(text: &str) -> bool {
    let mut seen_dot = false;
    text.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

/// Parse a non-negative amount; empty input counts as zero
pub fn amount_or_zero(field: &str, raw: &str) -> Result<f64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    parse_amount(field, raw)
}

/// Parse a required non-negative amount
pub fn required_amount(field: &str, raw: &str) -> Result<f64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    parse_amount(field, raw)
}

fn parse_amount(field: &str, raw: &str) -> Result<f64, ApiError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| ApiError::Validation(format!("{} must be a number", field)))?;
    if !value.is_finite() {
        return Err(ApiError::Validation(format!("{} must be a number", field)));
    }
    if value < 0.0 {
        return Err(ApiError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

fn required_text(field: &str, raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Whole amounts go out as JSON integers, so "150" is sent as `150`
pub fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Platform fee settings as stored by the server
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "vendorCommission", default, serialize_with = "serialize_amount")]
    pub vendor_commission: f64,
    #[serde(rename = "plateformfee", default, serialize_with = "serialize_amount")]
    pub platform_fee: f64,
    #[serde(default, serialize_with = "serialize_amount")]
    pub gst: f64,
    #[serde(rename = "deliveryFee", default, serialize_with = "serialize_amount")]
    pub delivery_fee: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub vendor_commission: String,
    pub platform_fee: String,
    pub gst: String,
    pub delivery_fee: String,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            vendor_commission: settings.vendor_commission.to_string(),
            platform_fee: settings.platform_fee.to_string(),
            gst: settings.gst.to_string(),
            delivery_fee: settings.delivery_fee.to_string(),
        }
    }

    pub fn validate(&self) -> Result<Settings, ApiError> {
        let settings = Settings {
            vendor_commission: amount_or_zero("Vendor commission", &self.vendor_commission)?,
            platform_fee: amount_or_zero("Platform fee", &self.platform_fee)?,
            gst: amount_or_zero("GST", &self.gst)?,
            delivery_fee: amount_or_zero("Delivery fee", &self.delivery_fee)?,
        };
        if settings.vendor_commission > 100.0 {
            return Err(ApiError::Validation(
                "Vendor commission cannot exceed 100%".to_string(),
            ));
        }
        if settings.gst > 100.0 {
            return Err(ApiError::Validation("GST cannot exceed 100%".to_string()));
        }
        Ok(settings)
    }
}

/// Paid registration toggle and fee
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "amountINR", default, serialize_with = "serialize_amount")]
    pub amount_inr: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub enabled: bool,
    pub amount_inr: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegistrationConfig, ApiError> {
        Ok(RegistrationConfig {
            enabled: self.enabled,
            amount_inr: amount_or_zero("Registration fee", &self.amount_inr)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub influencer: String,
    pub client: String,
    pub project: String,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount: f64,
    pub currency: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    pub influencer: String,
    pub client: String,
    pub project: String,
    pub total_amount: String,
    pub currency: String,
    pub notes: String,
}

impl Default for PaymentForm {
    fn default() -> Self {
        Self {
            influencer: String::new(),
            client: String::new(),
            project: String::new(),
            total_amount: String::new(),
            currency: "INR".to_string(),
            notes: String::new(),
        }
    }
}

impl PaymentForm {
    pub fn validate(&self) -> Result<NewPayment, ApiError> {
        let currency = self.currency.trim();
        Ok(NewPayment {
            influencer: required_text("Influencer", &self.influencer)?,
            client: required_text("Client", &self.client)?,
            project: required_text("Project", &self.project)?,
            total_amount: required_amount("Total amount", &self.total_amount)?,
            currency: if currency.is_empty() {
                "INR".to_string()
            } else {
                currency.to_uppercase()
            },
            notes: self.notes.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
    pub note: String,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub payment_id: String,
    pub amount: String,
    pub note: String,
    pub reference: String,
}

impl TransactionForm {
    /// Returns the payment id together with the transaction body
    pub fn validate(&self) -> Result<(String, NewTransaction), ApiError> {
        let payment_id = required_text("Payment", &self.payment_id)?;
        let amount = required_amount("Amount", &self.amount)?;
        if amount == 0.0 {
            return Err(ApiError::Validation("Amount must be greater than zero".to_string()));
        }
        Ok((
            payment_id,
            NewTransaction {
                amount,
                note: self.note.trim().to_string(),
                reference: self.reference.trim().to_string(),
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPayload {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub website: String,
}

/// Create form when `id` is empty, edit form otherwise
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub website: String,
}

impl BrandForm {
    pub fn editing(&self) -> Option<&str> {
        Some(self.id.trim()).filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> Result<BrandPayload, ApiError> {
        Ok(BrandPayload {
            name: required_text("Name", &self.name)?,
            description: self.description.trim().to_string(),
            logo_url: self.logo_url.trim().to_string(),
            website: self.website.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordReset {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordForm {
    pub user_id: String,
    pub password: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn validate(&self) -> Result<PasswordReset, ApiError> {
        let id = required_text("User", &self.user_id)?;
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }
        if self.password != self.confirm {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        Ok(PasswordReset {
            id,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_input_guard() {
        assert!(is_numeric_input(""));
        assert!(is_numeric_input("12.5"));
        assert!(!is_numeric_input("1.2.3"));
        assert!(!is_numeric_input("-4"));
        assert!(!is_numeric_input("1e3"));
    }

    #[test]
    fn test_settings_empty_fields_become_zero() {
        let form = SettingsForm {
            vendor_commission: "12.5".to_string(),
            gst: "18".to_string(),
            ..Default::default()
        };
        let settings = form.validate().unwrap();
        assert_eq!(settings.platform_fee, 0.0);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"vendorCommission": 12.5, "plateformfee": 0, "gst": 18, "deliveryFee": 0})
        );
    }

    #[test]
    fn test_settings_percentages_capped() {
        let form = SettingsForm {
            vendor_commission: "101".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            ApiError::Validation("Vendor commission cannot exceed 100%".to_string())
        );

        let form = SettingsForm {
            gst: "100.5".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_err());

        let form = SettingsForm {
            delivery_fee: "abc".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_payment_total_amount_sent_as_number() {
        let form = PaymentForm {
            influencer: "inf1".to_string(),
            client: "cl1".to_string(),
            project: "pr1".to_string(),
            total_amount: "150".to_string(),
            currency: String::new(),
            notes: " first milestone ".to_string(),
        };
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(body["totalAmount"], json!(150));
        assert_eq!(body["currency"], json!("INR"));
        assert_eq!(body["notes"], json!("first milestone"));
    }

    #[test]
    fn test_payment_rejects_bad_amounts() {
        let mut form = PaymentForm {
            influencer: "inf1".to_string(),
            client: "cl1".to_string(),
            project: "pr1".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
        form.total_amount = "-5".to_string();
        assert!(form.validate().is_err());
        form.total_amount = "ten".to_string();
        assert!(form.validate().is_err());
        form.total_amount = "99.99".to_string();
        assert_eq!(form.validate().unwrap().total_amount, 99.99);
    }

    #[test]
    fn test_non_finite_amounts_are_not_numbers() {
        for raw in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                required_amount("Amount", raw),
                Err(ApiError::Validation("Amount must be a number".to_string()))
            );
        }
        assert_eq!(
            amount_or_zero("GST", "-1"),
            Err(ApiError::Validation("GST cannot be negative".to_string()))
        );
    }

    #[test]
    fn test_transaction_requires_positive_amount() {
        let form = TransactionForm {
            payment_id: "pay1".to_string(),
            amount: "0".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_err());

        let form = TransactionForm {
            amount: "40".to_string(),
            ..form
        };
        let (id, tx) = form.validate().unwrap();
        assert_eq!(id, "pay1");
        assert_eq!(serde_json::to_value(tx).unwrap()["amount"], json!(40));
    }

    #[test]
    fn test_brand_name_required() {
        let mut form = BrandForm::default();
        assert!(form.validate().is_err());
        assert_eq!(form.editing(), None);

        form.name = "Acme".to_string();
        form.id = "b1".to_string();
        form.logo_url = "https://cdn.example.com/acme.png".to_string();
        assert_eq!(form.editing(), Some("b1"));
        let body = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert_eq!(body["logoUrl"], json!("https://cdn.example.com/acme.png"));
    }

    #[test]
    fn test_password_must_match() {
        let form = PasswordForm {
            user_id: "u1".to_string(),
            password: "secret1".to_string(),
            confirm: "secret2".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "Passwords do not match"
        );

        let form = PasswordForm {
            confirm: "secret1".to_string(),
            ..form
        };
        assert_eq!(
            form.validate().unwrap(),
            PasswordReset {
                id: "u1".to_string(),
                password: "secret1".to_string()
            }
        );
    }
}
