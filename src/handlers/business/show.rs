use axum::extract::Path;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::businesses::BusinessStore;
use crate::error::ApiError;
use crate::middleware::MaybeUser;

/// GET /api/business/:id - one profile, honoring visibility.
///
/// Private profiles are visible only to their owner; everyone else gets
/// a 403 rather than a 404 so the profile's existence is not hidden,
/// matching the listing which never includes it.
pub async fn show_get(
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid business id"))?;

    let store = BusinessStore::new().await?;
    let business = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Business profile not found"))?;

    let is_owner = viewer.as_ref().map_or(false, |u| u.id == business.user_id);
    if !business.is_public && !is_owner {
        return Err(ApiError::forbidden("This business profile is private"));
    }

    Ok(Json(json!({
        "success": true,
        "data": { "business": business.to_api_json() }
    })))
}
