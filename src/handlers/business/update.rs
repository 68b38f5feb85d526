use axum::response::Json;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::database::models::{BusinessField, BusinessStatus};
use crate::error::ApiError;
use crate::middleware::OwnedBusiness;

use super::BusinessPayload;

/// PUT /api/business/:id - partial update of the caller's profile.
///
/// Only fields present in the payload change; the allow-list is the
/// payload shape itself, so collections and ownership cannot be touched
/// from here.
pub async fn business_put(
    OwnedBusiness(mut business): OwnedBusiness,
    Json(payload): Json<BusinessPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate(false)?;

    if let Some(name) = payload.business_name {
        business.business_name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        business.description = description.trim().to_string();
    }
    if let Some(started_at) = payload.started_at {
        business.started_at = started_at as i32;
    }
    if let Some(raw) = payload.business_field.as_deref() {
        business.business_field = BusinessField::try_from(raw.trim().to_string())
            .map_err(|_| ApiError::bad_request("Please select a valid business field"))?;
    }
    if let Some(is_public) = payload.is_public {
        business.is_public = is_public;
    }
    if let Some(logo) = payload.business_logo {
        business.business_logo = Some(logo);
    }
    if let Some(location) = payload.location {
        if location.city.is_some() {
            business.city = location.city;
        }
        if location.country.is_some() {
            business.country = location.country;
        }
    }
    if let Some(website) = payload.website {
        business.website = Some(website);
    }
    if let Some(phone) = payload.phone_number {
        business.phone_number = Some(phone);
    }
    if let Some(social) = payload.social_media {
        business.social_media.0 = social;
    }
    if let Some(tags) = payload.tags {
        business.tags = tags;
    }
    if let Some(raw) = payload.status.as_deref() {
        business.status = BusinessStatus::try_from(raw.trim().to_string())
            .map_err(|_| ApiError::bad_request("Please select a valid status"))?;
    }

    let store = BusinessStore::new().await?;
    let updated = store.save_profile(&business).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "business": updated.to_api_json() }
    })))
}
