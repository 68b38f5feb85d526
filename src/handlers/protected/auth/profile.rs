use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::BusinessField;
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::validation::{self, Violations};

/// GET /api/auth/me - the authenticated account, sans credentials
pub async fn me_get(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "user": user.to_api_json() }
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub business_field: Option<String>,
    pub profile_picture: Option<String>,
}

/// PUT /api/auth/me - update the allow-listed profile fields.
///
/// Email, password and activation state have their own paths; fields
/// outside the allow-list are ignored by the request shape itself.
pub async fn me_put(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    validation::user_name(&mut v, payload.name.as_deref(), false);
    validation::business_field(&mut v, payload.business_field.as_deref(), false);
    v.into_result()?;

    let business_field = payload
        .business_field
        .and_then(|raw| BusinessField::try_from(raw.trim().to_string()).ok());

    let users = UserStore::new().await?;
    let updated = users
        .update_profile(
            user.id,
            payload.name.as_deref().map(str::trim),
            business_field,
            payload.profile_picture.as_deref(),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "user": updated.to_api_json() }
    })))
}
