use axum::response::Json;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::error::ApiError;
use crate::middleware::OwnedBusiness;

/// DELETE /api/business/:id - remove the caller's profile outright.
///
/// Deletion is unconditional once ownership is established; there is no
/// soft-delete or archive state.
pub async fn business_delete(OwnedBusiness(business): OwnedBusiness) -> Result<Json<Value>, ApiError> {
    let store = BusinessStore::new().await?;
    store.delete(business.id).await?;

    tracing::info!("Business profile {} deleted by owner {}", business.id, business.user_id);

    Ok(Json(json!({
        "success": true,
        "data": { "message": "Business profile deleted successfully" }
    })))
}
