use axum::response::Json;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

/// GET /api/business/me - the caller's own profile, public or not
pub async fn me_get(CurrentUser(user): CurrentUser) -> Result<Json<Value>, ApiError> {
    let store = BusinessStore::new().await?;
    let business = store
        .find_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Business profile not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": { "business": business.to_api_json() }
    })))
}
