use axum::response::Json;
use serde_json::{json, Value};

use crate::middleware::CurrentUser;

/// POST /api/auth/logout - acknowledge the end of a session.
///
/// Tokens are stateless and expire on their own; this endpoint exists
/// so clients have a definite point at which to discard the token.
pub async fn logout_post(CurrentUser(user): CurrentUser) -> Json<Value> {
    tracing::info!("User {} logged out", user.id);
    Json(json!({
        "success": true,
        "data": { "message": "Logged out successfully" }
    }))
}
