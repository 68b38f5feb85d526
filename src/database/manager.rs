use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// True when a sqlx error is a unique-constraint violation (SQLSTATE
/// 23505). Duplicate-email and duplicate-business-profile races both pass
/// their handler pre-checks and land here; callers map this to 409
/// instead of the generic 500.
pub fn is_unique_violation(err: &DatabaseError) -> bool {
    match err {
        DatabaseError::Sqlx(sqlx::Error::Database(db_err)) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Connection pool manager for the application database.
///
/// The store is the sole shared mutable resource; every request borrows a
/// connection from this pool and relies on per-row atomicity for
/// consistency.
pub struct DatabaseManager;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

impl DatabaseManager {
    /// Get the application database pool, creating it lazily on first use.
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = POOL
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    return Err(DatabaseError::InvalidDatabaseUrl);
                }

                let db_config = &config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(db_config.max_connections)
                    .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
                    .connect(&url)
                    .await?;

                info!("Connected to database (max_connections={})", db_config.max_connections);
                Ok::<PgPool, DatabaseError>(pool)
            })
            .await?;

        Ok(pool.clone())
    }

    /// Run embedded migrations against the application database.
    pub async fn migrate() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))
    }

    /// Basic liveness probe used by the /health endpoint.
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeDbError(&'static str);

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violated ({})", self.0)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.0.into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn database_error(code: &'static str) -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::Database(Box::new(FakeDbError(code))))
    }

    #[test]
    fn unique_violation_is_detected_by_sqlstate() {
        assert!(is_unique_violation(&database_error("23505")));
    }

    #[test]
    fn other_errors_are_not_unique_violations() {
        // Foreign-key violation
        assert!(!is_unique_violation(&database_error("23503")));
        assert!(!is_unique_violation(&DatabaseError::NotFound("x".to_string())));
        assert!(!is_unique_violation(&DatabaseError::InvalidDatabaseUrl));
    }

    #[test]
    fn unique_violation_maps_to_conflict_not_500() {
        use crate::error::ApiError;

        // Both duplicate races (email, business profile) surface as 409
        let err = database_error("23505");
        let api: ApiError = if is_unique_violation(&err) {
            ApiError::conflict("You already have a business profile")
        } else {
            err.into()
        };
        assert_eq!(api.status_code(), axum::http::StatusCode::CONFLICT);
    }
}
