use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::businesses::{BusinessStore, NewBusiness};
use crate::database::manager::is_unique_violation;
use crate::database::models::{BusinessField, BusinessStatus};
use crate::error::ApiError;
use crate::middleware::CurrentUser;

use super::BusinessPayload;

/// POST /api/business - create the caller's business profile.
///
/// One profile per user: a second create attempt conflicts regardless
/// of the submitted content.
pub async fn business_post(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BusinessPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    payload.validate(true)?;

    // Validation already proved these parse; the fallbacks are unreachable
    let business_field = payload
        .business_field
        .as_deref()
        .and_then(|raw| BusinessField::try_from(raw.trim().to_string()).ok())
        .ok_or_else(|| ApiError::bad_request("Business field is required"))?;
    let status = match payload.status.as_deref() {
        Some(raw) => BusinessStatus::try_from(raw.trim().to_string())
            .map_err(|_| ApiError::bad_request("Please select a valid status"))?,
        None => BusinessStatus::Active,
    };

    let store = BusinessStore::new().await?;

    if store.exists_for_user(user.id).await? {
        return Err(ApiError::conflict("You already have a business profile"));
    }

    let location = payload.location.unwrap_or_default();
    let new = NewBusiness {
        user_id: user.id,
        business_name: payload.business_name.map(|s| s.trim().to_string()).unwrap_or_default(),
        description: payload.description.map(|s| s.trim().to_string()).unwrap_or_default(),
        started_at: payload.started_at.unwrap_or_default() as i32,
        business_field,
        is_public: payload.is_public.unwrap_or(false),
        business_logo: payload.business_logo,
        city: location.city,
        country: location.country.or_else(|| Some("Kenya".to_string())),
        website: payload.website,
        phone_number: payload.phone_number,
        social_media: payload.social_media.unwrap_or_default(),
        tags: payload.tags.unwrap_or_default(),
        status,
    };

    let business = match store.create(new).await {
        Ok(business) => business,
        // Two concurrent creates can both pass the pre-check; the unique
        // index on user_id is the actual enforcement point.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("You already have a business profile"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("User {} created business profile {}", user.id, business.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "business": business.to_api_json() }
        })),
    ))
}
