use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::error::ApiError;
use crate::middleware::OwnedBusiness;
use crate::validation::{self, Violations};

#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    pub year: Option<i64>,
    pub amount: Option<f64>,
}

/// POST /api/business/:id/income - record income for a year.
///
/// One record per year: posting an existing year replaces its amount.
/// The write is guarded by the row version so two overlapping requests
/// cannot silently drop each other's records.
pub async fn income_post(
    OwnedBusiness(mut business): OwnedBusiness,
    Json(payload): Json<IncomeRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    validation::year(&mut v, "year", payload.year, true);
    validation::amount(&mut v, "amount", payload.amount, true);
    v.into_result()?;

    let year = payload.year.ok_or_else(|| ApiError::bad_request("Year is required"))? as i32;
    let amount = payload.amount.ok_or_else(|| ApiError::bad_request("Amount is required"))?;

    business.apply_income_record(year, amount);

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
