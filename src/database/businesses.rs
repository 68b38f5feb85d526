use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Business, BusinessField, BusinessStatus, SocialMedia};

const BUSINESS_COLUMNS: &str = "id, user_id, business_name, description, started_at, business_field, \
     income_records, funders, is_public, business_logo, city, country, website, phone_number, \
     social_media, tags, status, version, created_at, updated_at";

/// Validated fields for a new business profile.
#[derive(Debug)]
pub struct NewBusiness {
    pub user_id: Uuid,
    pub business_name: String,
    pub description: String,
    pub started_at: i32,
    pub business_field: BusinessField,
    pub is_public: bool,
    pub business_logo: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub social_media: SocialMedia,
    pub tags: Vec<String>,
    pub status: BusinessStatus,
}

/// Filters for the public listing. All optional, combined with AND.
#[derive(Debug, Default)]
pub struct PublicFilter {
    pub field: Option<BusinessField>,
    pub city: Option<String>,
    pub status: Option<BusinessStatus>,
}

/// Store-level access to business profiles.
///
/// A business is one row; the income and funder collections live in JSONB
/// columns so every mutation is a single-row atomic write.
pub struct BusinessStore {
    pool: PgPool,
}

impl BusinessStore {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewBusiness) -> Result<Business, DatabaseError> {
        let sql = format!(
            "INSERT INTO businesses (
                user_id, business_name, description, started_at, business_field,
                is_public, business_logo, city, country, website, phone_number,
                social_media, tags, status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {BUSINESS_COLUMNS}"
        );

        let business = sqlx::query_as::<_, Business>(&sql)
            .bind(new.user_id)
            .bind(&new.business_name)
            .bind(&new.description)
            .bind(new.started_at)
            .bind(new.business_field.as_str())
            .bind(new.is_public)
            .bind(&new.business_logo)
            .bind(&new.city)
            .bind(&new.country)
            .bind(&new.website)
            .bind(&new.phone_number)
            .bind(Json(&new.social_media))
            .bind(&new.tags)
            .bind(new.status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(business)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Business>, DatabaseError> {
        let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = $1");

        let business = sqlx::query_as::<_, Business>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(business)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Business>, DatabaseError> {
        let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE user_id = $1");

        let business = sqlx::query_as::<_, Business>(&sql).bind(user_id).fetch_optional(&self.pool).await?;
        Ok(business)
    }

    /// Single enforcement point for the one-business-per-user rule.
    pub async fn exists_for_user(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM businesses WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// Persist the mutable profile fields of an already-loaded business.
    /// Callers apply the update allow-list onto the struct first.
    pub async fn save_profile(&self, business: &Business) -> Result<Business, DatabaseError> {
        let sql = format!(
            "UPDATE businesses SET
                business_name = $2,
                description = $3,
                started_at = $4,
                business_field = $5,
                is_public = $6,
                business_logo = $7,
                city = $8,
                country = $9,
                website = $10,
                phone_number = $11,
                social_media = $12,
                tags = $13,
                status = $14,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {BUSINESS_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Business>(&sql)
            .bind(business.id)
            .bind(&business.business_name)
            .bind(&business.description)
            .bind(business.started_at)
            .bind(business.business_field.as_str())
            .bind(business.is_public)
            .bind(&business.business_logo)
            .bind(&business.city)
            .bind(&business.country)
            .bind(&business.website)
            .bind(&business.phone_number)
            .bind(Json(&business.social_media.0))
            .bind(&business.tags)
            .bind(business.status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Business profile not found".to_string()))?;

        Ok(updated)
    }

    /// Persist the income/funder collections, guarded by the version
    /// counter. Returns `None` when the row moved underneath us (another
    /// request wrote first); the caller surfaces that as a conflict
    /// rather than losing the earlier write.
    pub async fn save_collections(&self, business: &Business) -> Result<Option<Business>, DatabaseError> {
        let sql = format!(
            "UPDATE businesses SET
                income_records = $3,
                funders = $4,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {BUSINESS_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Business>(&sql)
            .bind(business.id)
            .bind(business.version)
            .bind(Json(&business.income_records.0))
            .bind(Json(&business.funders.0))
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1").bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Business profile not found".to_string()));
        }
        Ok(())
    }

    /// Public profiles matching the filter, newest first, with offset
    /// pagination.
    pub async fn list_public(&self, filter: &PublicFilter, skip: i64, limit: i64) -> Result<Vec<Business>, DatabaseError> {
        let mut builder = self.public_query_base("SELECT ");
        builder.push(BUSINESS_COLUMNS);
        Self::push_public_conditions(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        builder.push(" OFFSET ").push_bind(skip);
        builder.push(" LIMIT ").push_bind(limit);

        let businesses = builder.build_query_as::<Business>().fetch_all(&self.pool).await?;
        Ok(businesses)
    }

    /// Full matching count for the same filter, independent of paging.
    pub async fn count_public(&self, filter: &PublicFilter) -> Result<i64, DatabaseError> {
        let mut builder = self.public_query_base("SELECT COUNT(*)");
        Self::push_public_conditions(&mut builder, filter);

        let count: (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.0)
    }

    fn public_query_base(&self, select: &str) -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(select.to_string())
    }

    fn push_public_conditions(builder: &mut QueryBuilder<'static, Postgres>, filter: &PublicFilter) {
        builder.push(" FROM businesses WHERE is_public = TRUE");
        if let Some(field) = filter.field {
            builder.push(" AND business_field = ").push_bind(field.as_str());
        }
        if let Some(city) = &filter.city {
            // Case-insensitive substring match on city
            builder.push(" AND city ILIKE ").push_bind(format!("%{}%", city));
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
    }

    /// Platform overview: counts over public profiles only.
    pub async fn public_stats(&self) -> Result<(i64, i64, Vec<(String, i64)>), DatabaseError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM businesses WHERE is_public = TRUE")
            .fetch_one(&self.pool)
            .await?;

        let active: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM businesses WHERE is_public = TRUE AND status = 'Active'")
            .fetch_one(&self.pool)
            .await?;

        let by_field: Vec<(String, i64)> = sqlx::query_as(
            "SELECT business_field, COUNT(*) FROM businesses
             WHERE is_public = TRUE
             GROUP BY business_field
             ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok((total.0, active.0, by_field))
    }
}
