use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, verify_password};
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::validation::{self, Violations};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/auth/change-password - rotate the account password.
///
/// Requires the current password even with a valid token, so a stolen
/// token alone cannot lock the owner out.
pub async fn change_password_post(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    if payload.current_password.as_deref().map_or(true, |p| p.is_empty()) {
        v.add("currentPassword", "Current password is required");
    }
    validation::password(&mut v, "newPassword", payload.new_password.as_deref());
    v.into_result()?;

    let current = payload.current_password.as_deref().unwrap_or_default();
    let next = payload.new_password.as_deref().unwrap_or_default();

    if !verify_password(current, &user.password_hash)? {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let users = UserStore::new().await?;
    users.update_password(user.id, &hash_password(next)?).await?;

    tracing::info!("User {} changed their password", user.id);

    Ok(Json(json!({
        "success": true,
        "data": { "message": "Password updated successfully" }
    })))
}
