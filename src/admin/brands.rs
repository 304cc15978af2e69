use reqwest::Method;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::BrandForm;

/// Create a brand, or update it when the form carries an id
pub async fn save_brand(client: &ApiClient, form: &BrandForm) -> Result<(), ApiError> {
    let payload = serde_json::to_value(form.validate()?)?;
    match form.editing() {
        Some(id) => {
            client
                .send_authorized(Method::PUT, &format!("/brands/{}", id), Vec::new(), Some(payload))
                .await?;
            info!("Updated brand {}", id);
        }
        None => {
            client
                .send_authorized(Method::POST, "/brands", Vec::new(), Some(payload))
                .await?;
            info!("Created brand {}", form.name.trim());
        }
    }
    Ok(())
}
