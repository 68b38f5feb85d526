use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use super::business::BusinessField;

/// A registered account. Email uniqueness is case-insensitive and
/// enforced at the store (stored lowercased, unique index). Accounts are
/// soft-disabled via `is_active`; there is no hard delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized outward - see `to_api_json`.
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub business_field: BusinessField,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Sanitized wire form. The password hash stays behind.
    pub fn to_api_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "businessField": self.business_field,
            "isActive": self.is_active,
            "lastLogin": self.last_login_at,
            "profilePicture": self.profile_picture,
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            business_field: BusinessField::Technology,
            is_active: true,
            last_login_at: None,
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn api_document_never_contains_password_material() {
        let user = sample_user();

        let doc = user.to_api_json();
        assert!(doc.get("password").is_none());
        assert!(doc.get("passwordHash").is_none());
        assert_eq!(doc["businessField"], "Technology");

        // The serde form skips the hash as well
        let serialized = serde_json::to_value(&user).unwrap();
        assert!(serialized.get("password_hash").is_none());
    }

    #[test]
    fn api_document_reflects_a_freshly_stamped_login() {
        // Login and registration stamp last_login_at on the loaded struct
        // before serializing, so the response carries this login rather
        // than the previous one.
        let mut user = sample_user();
        assert!(user.to_api_json()["lastLogin"].is_null());

        let now = Utc::now();
        user.last_login_at = Some(now);
        assert_eq!(user.to_api_json()["lastLogin"], serde_json::to_value(now).unwrap());
    }
}
