use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::database::models::{Funder, FundingMethod};
use crate::error::ApiError;
use crate::middleware::OwnedBusiness;
use crate::validation::{self, Violations};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunderRequest {
    pub name: Option<String>,
    pub method: Option<String>,
    pub amount: Option<f64>,
    pub date_received: Option<DateTime<Utc>>,
}

/// POST /api/business/:id/funders - append a funding entry.
///
/// Entries are append-only and never deduplicated; a funder that backs
/// the business twice appears twice.
pub async fn funders_post(
    OwnedBusiness(mut business): OwnedBusiness,
    Json(payload): Json<FunderRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    validation::funder_name(&mut v, payload.name.as_deref());
    validation::funding_method(&mut v, payload.method.as_deref());
    validation::amount(&mut v, "amount", payload.amount, false);
    v.into_result()?;

    let name = payload.name.as_deref().map(str::trim).ok_or_else(|| ApiError::bad_request("Funder name is required"))?;
    let method = payload
        .method
        .and_then(|raw| FundingMethod::try_from(raw.trim().to_string()).ok())
        .ok_or_else(|| ApiError::bad_request("Funding method is required"))?;

    business.push_funder(Funder {
        name: name.to_string(),
        method,
        amount: payload.amount,
        date_received: payload.date_received.unwrap_or_else(Utc::now),
    });

    let store = BusinessStore::new().await?;
    let updated = store
        .save_collections(&business)
        .await?
        .ok_or_else(|| ApiError::conflict("Business profile was modified concurrently, please retry"))?;

    Ok(Json(json!({
        "success": true,
        "data": { "business": updated.to_api_json() }
    })))
}
