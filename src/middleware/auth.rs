use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth;
use crate::database::models::User;
use crate::database::users::UserStore;
use crate::error::ApiError;

/// The resolved account for an authenticated request.
///
/// Mandatory authentication: extracting this rejects with 401 when the
/// bearer token is absent, malformed, expired, carries a bad signature,
/// names an unknown user, or the account is deactivated. Idempotent and
/// side-effect-free on the store.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Optional authentication for routes that render differently for
/// authenticated callers (private-profile visibility). Same
/// decode/verify/load path as [`CurrentUser`], but every failure is
/// swallowed and the request proceeds anonymously.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(&parts.headers).await.map(CurrentUser)
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(&parts.headers).await.ok()))
    }
}

async fn resolve_user(headers: &HeaderMap) -> Result<User, ApiError> {
    let token = extract_bearer(headers)?;

    // Distinguishing reason strings come from the TokenError mapping
    let claims = auth::validate_jwt(&token)?;

    let users = UserStore::new().await?;
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid token: user not found"))?;

    // Tokens are never revoked within their window; this live check is
    // the compensating layer for deactivated accounts.
    if !user.is_active {
        tracing::warn!("Rejected request for deactivated account {}", user.id);
        return Err(ApiError::unauthorized("Account deactivated"));
    }

    Ok(user)
}

/// Extract the bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("Access token required"));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_bearer(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        assert!(extract_bearer(&headers_with("Bearer ")).is_err());
        assert!(extract_bearer(&headers_with("Bearer    ")).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer(&headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.x.y")).unwrap();
        assert_eq!(token, "eyJhbGciOiJIUzI1NiJ9.x.y");
    }
}
