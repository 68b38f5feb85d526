use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password};
use crate::config;
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::validation::{self, Violations};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - exchange credentials for a token
pub async fn login_post(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    validation::email(&mut v, payload.email.as_deref());
    if payload.password.as_deref().map_or(true, |p| p.is_empty()) {
        v.add("password", "Password is required");
    }
    v.into_result()?;

    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    let plaintext = payload.password.as_deref().unwrap_or_default();

    let users = UserStore::new().await?;

    // Unknown email and wrong password produce the same response so the
    // endpoint cannot be used to discover which accounts exist.
    let mut user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !password::verify_password(plaintext, &user.password_hash)? {
        tracing::warn!("Failed login attempt for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    if !user.is_active {
        return Err(ApiError::unauthorized("Account deactivated"));
    }

    let token = auth::generate_jwt(user.id)?;

    let now = chrono::Utc::now();
    users.touch_last_login(user.id, now).await?;
    user.last_login_at = Some(now);

    tracing::info!("User {} logged in", user.id);

    Ok(Json(json!({
        "success": true,
        "data": {
            "user": user.to_api_json(),
            "token": token,
            "expiresIn": config::config().security.jwt_expiry_hours * 3600,
        }
    })))
}
