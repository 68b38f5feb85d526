use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password};
use crate::config;
use crate::database::models::BusinessField;
use crate::database::manager::is_unique_violation;
use crate::database::users::UserStore;
use crate::error::ApiError;
use crate::validation::{self, Violations};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub business_field: Option<String>,
}

/// POST /api/auth/register - create a new account and issue a token
pub async fn register_post(Json(payload): Json<RegisterRequest>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut v = Violations::new();
    validation::user_name(&mut v, payload.name.as_deref(), true);
    validation::email(&mut v, payload.email.as_deref());
    validation::password(&mut v, "password", payload.password.as_deref());
    validation::business_field(&mut v, payload.business_field.as_deref(), true);
    v.into_result()?;

    // Validation guarantees presence; these guards keep the types honest
    let name = payload.name.as_deref().map(str::trim).ok_or_else(|| ApiError::bad_request("Name is required"))?;
    let email = payload.email.as_deref().map(str::trim).ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let plaintext = payload.password.as_deref().ok_or_else(|| ApiError::bad_request("Password is required"))?;
    let business_field = payload
        .business_field
        .and_then(|raw| BusinessField::try_from(raw.trim().to_string()).ok())
        .ok_or_else(|| ApiError::bad_request("Business field is required"))?;

    let users = UserStore::new().await?;

    if users.find_by_email(email).await?.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    let password_hash = password::hash_password(plaintext)?;

    let mut user = match users.create(name, email, &password_hash, business_field).await {
        Ok(user) => user,
        // Two concurrent registrations can pass the pre-check; the
        // unique index is the actual enforcement point.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("User with this email already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = auth::generate_jwt(user.id)?;

    let now = chrono::Utc::now();
    users.touch_last_login(user.id, now).await?;
    user.last_login_at = Some(now);

    tracing::info!("Registered new user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "user": user.to_api_json(),
                "token": token,
                "expiresIn": config::config().security.jwt_expiry_hours * 3600,
            }
        })),
    ))
}
