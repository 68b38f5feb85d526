//! Business profile endpoints.
//!
//! Each route gets its own module; the shared request shape and its
//! validation live here so create and update cannot drift apart.

pub mod create;
pub mod delete;
pub mod funders;
pub mod income;
pub mod list;
pub mod me;
pub mod show;
pub mod stats;
pub mod update;

use serde::Deserialize;

use crate::database::models::SocialMedia;
use crate::error::ApiError;
use crate::validation::{self, Violations};

#[derive(Debug, Default, Deserialize)]
pub struct LocationPayload {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// The writable fields of a business profile, as submitted by clients.
///
/// This is the entire update allow-list: income records, funders, the
/// version counter and ownership are absent on purpose and can only be
/// changed through their dedicated endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPayload {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub started_at: Option<i64>,
    pub business_field: Option<String>,
    pub is_public: Option<bool>,
    pub business_logo: Option<String>,
    pub location: Option<LocationPayload>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

impl BusinessPayload {
    /// Check every submitted field; `required` toggles between the
    /// create contract (core fields mandatory) and the update contract
    /// (everything optional).
    pub fn validate(&self, required: bool) -> Result<(), ApiError> {
        let mut v = Violations::new();
        validation::business_name(&mut v, self.business_name.as_deref(), required);
        validation::description(&mut v, self.description.as_deref(), required);
        validation::year(&mut v, "startedAt", self.started_at, required);
        validation::business_field(&mut v, self.business_field.as_deref(), required);
        validation::status(&mut v, self.status.as_deref());
        validation::website(&mut v, self.website.as_deref());
        validation::phone_number(&mut v, self.phone_number.as_deref());
        if let Some(location) = &self.location {
            validation::city(&mut v, "city", location.city.as_deref());
            validation::country(&mut v, location.country.as_deref());
        }
        validation::tags(&mut v, self.tags.as_deref());
        v.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_contract_requires_core_fields() {
        let payload = BusinessPayload::default();
        let err = payload.validate(true).unwrap_err();
        let fields = err.to_json()["field_errors"].as_object().unwrap().clone();
        assert!(fields.contains_key("businessName"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("startedAt"));
        assert!(fields.contains_key("businessField"));
    }

    #[test]
    fn update_contract_accepts_empty_payload() {
        let payload = BusinessPayload::default();
        assert!(payload.validate(false).is_ok());
    }

    #[test]
    fn submitted_fields_are_checked_even_when_optional() {
        let payload = BusinessPayload {
            status: Some("Dormant".to_string()),
            website: Some("not-a-url".to_string()),
            ..Default::default()
        };
        let err = payload.validate(false).unwrap_err();
        let fields = err.to_json()["field_errors"].as_object().unwrap().clone();
        assert!(fields.contains_key("status"));
        assert!(fields.contains_key("website"));
    }

    #[test]
    fn unknown_fields_are_simply_ignored() {
        let payload: BusinessPayload = serde_json::from_value(serde_json::json!({
            "businessName": "Green Farm Solutions",
            "userId": "11111111-1111-1111-1111-111111111111",
            "incomeRecords": [{"year": 2019, "amount": 1.0}],
            "version": 99
        }))
        .unwrap();
        assert_eq!(payload.business_name.as_deref(), Some("Green Farm Solutions"));
        assert!(payload.validate(false).is_ok());
    }
}
