use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::database::businesses::BusinessStore;
use crate::database::models::Business;
use crate::error::ApiError;
use crate::middleware::auth::CurrentUser;

/// Resource-ownership guard for mutating business routes.
///
/// Extraction runs mandatory authentication first, then loads the `:id`
/// business: 404 if it does not exist, 403 if the caller is not its
/// owner. The loaded row is handed to the handler so it can mutate
/// without a second load. Purely equality-based - no roles, no
/// delegation, no admin override.
#[derive(Clone, Debug)]
pub struct OwnedBusiness(pub Business);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OwnedBusiness {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Anonymous callers fail here with 401 before any ownership check
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid business id"))?;

        let store = BusinessStore::new().await?;
        let business = store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Business profile not found"))?;

        if business.user_id != user.id {
            tracing::warn!(
                "User {} denied access to business {} owned by {}",
                user.id,
                business.id,
                business.user_id
            );
            return Err(ApiError::forbidden("You can only access your own resources"));
        }

        Ok(OwnedBusiness(business))
    }
}
