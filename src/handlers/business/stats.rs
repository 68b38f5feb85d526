use axum::response::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::businesses::BusinessStore;
use crate::error::ApiError;

/// GET /api/business/stats/overview - platform-wide counts.
///
/// Anonymous endpoint over public profiles only, so it never leaks the
/// existence of private businesses.
pub async fn stats_get() -> Result<Json<Value>, ApiError> {
    let store = BusinessStore::new().await?;
    let (total, active, by_field) = store.public_stats().await?;

    let breakdown: Vec<Value> = by_field
        .into_iter()
        .map(|(field, count)| json!({ "field": field, "count": count }))
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "totalBusinesses": total,
            "activeBusinesses": active,
            "businessesByField": breakdown,
            "lastUpdated": Utc::now(),
        }
    })))
}
