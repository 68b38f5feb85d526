use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{BusinessField, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, business_field, is_active, last_login_at, profile_picture, created_at, updated_at";

/// Store-level access to user records.
///
/// Emails are normalized to lowercase on the way in so the unique index
/// enforces case-insensitive uniqueness.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        business_field: BusinessField,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, business_field)
             VALUES ($1, LOWER($2), $3, $4)
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(business_field.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(user)
    }

    /// Secondary lookup by email, case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)");

        let user = sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(&self.pool).await?;
        Ok(user)
    }

    /// Stamp the last-login timestamp. The only store write the login and
    /// registration paths perform after credential checks; callers mirror
    /// the same instant onto their loaded struct so the response reflects
    /// this login, not the previous one.
    pub async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE users SET last_login_at = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply the profile allow-list: name, businessField, profilePicture.
    /// Anything else submitted by the caller never reaches this method.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        business_field: Option<BusinessField>,
        profile_picture: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                business_field = COALESCE($3, business_field),
                profile_picture = COALESCE($4, profile_picture),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(name)
            .bind(business_field.map(|f| f.as_str()))
            .bind(profile_picture)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
