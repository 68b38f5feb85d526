use axum::extract::Query;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::businesses::{BusinessStore, PublicFilter};
use crate::database::models::{BusinessField, BusinessStatus};
use crate::error::ApiError;
use crate::validation::Violations;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub field: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Offset-pagination facts for the listing response. Derived entirely
/// from the total count and the requested window.
#[derive(Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageWindow {
    /// Clamp the requested page/limit into a usable window. Page floors
    /// at 1; limit floors at 1 and caps at the configured maximum.
    pub fn new(page: Option<i64>, limit: Option<i64>, total: i64) -> Self {
        let api = &config::config().api;
        let limit = limit.unwrap_or(api.default_page_size).clamp(1, api.max_page_size);
        let page = page.unwrap_or(1).max(1);
        let total_pages = (total + limit - 1) / limit;
        Self { page, limit, total, total_pages }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn to_json(&self) -> Value {
        json!({
            "currentPage": self.page,
            "totalPages": self.total_pages,
            "totalBusinesses": self.total,
            "hasNext": self.has_next(),
            "hasPrev": self.has_prev(),
        })
    }
}

/// GET /api/business - public directory with filters and pagination.
///
/// Anonymous endpoint: only public profiles ever appear, and the total
/// counts the full filtered set, not just the returned page.
pub async fn list_get(Query(query): Query<ListQuery>) -> Result<Json<Value>, ApiError> {
    let mut v = Violations::new();
    let field = match query.field.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match BusinessField::try_from(raw.to_string()) {
            Ok(field) => Some(field),
            Err(_) => {
                v.add("field", "Please select a valid business field");
                None
            }
        },
        None => None,
    };
    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match BusinessStatus::try_from(raw.to_string()) {
            Ok(status) => Some(status),
            Err(_) => {
                v.add("status", "Please select a valid status");
                None
            }
        },
        None => None,
    };
    v.into_result()?;

    let filter = PublicFilter {
        field,
        city: query.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        status,
    };

    let store = BusinessStore::new().await?;
    let total = store.count_public(&filter).await?;
    let window = PageWindow::new(query.page, query.limit, total);
    let businesses = store.list_public(&filter, window.skip(), window.limit).await?;

    let docs: Vec<Value> = businesses.iter().map(|b| b.to_api_json()).collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "businesses": docs,
            "pagination": window.to_json(),
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_requested() {
        let window = PageWindow::new(None, None, 25);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 10);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.skip(), 0);
        assert!(window.has_next());
        assert!(!window.has_prev());
    }

    #[test]
    fn limit_is_capped_at_fifty() {
        let window = PageWindow::new(Some(1), Some(500), 200);
        assert_eq!(window.limit, 50);
        assert_eq!(window.total_pages, 4);
    }

    #[test]
    fn nonsense_page_and_limit_are_floored() {
        let window = PageWindow::new(Some(0), Some(-3), 25);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 1);
    }

    #[test]
    fn middle_page_has_both_neighbors() {
        let window = PageWindow::new(Some(2), Some(10), 25);
        assert_eq!(window.skip(), 10);
        assert!(window.has_next());
        assert!(window.has_prev());
    }

    #[test]
    fn last_page_has_no_next() {
        let window = PageWindow::new(Some(3), Some(10), 25);
        assert!(!window.has_next());
        assert!(window.has_prev());
    }

    #[test]
    fn empty_result_set_has_zero_pages() {
        let window = PageWindow::new(None, None, 0);
        assert_eq!(window.total_pages, 0);
        assert!(!window.has_next());
        assert!(!window.has_prev());
    }

    #[test]
    fn pagination_json_uses_wire_names() {
        let value = PageWindow::new(Some(2), Some(10), 45).to_json();
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["totalPages"], 5);
        assert_eq!(value["totalBusinesses"], 45);
        assert_eq!(value["hasNext"], true);
        assert_eq!(value["hasPrev"], true);
    }
}
