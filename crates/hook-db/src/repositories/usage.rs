//! PostgreSQL implementation of UsageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hook_core::traits::{RepoResult, UsageRepository};
use hook_core::value_objects::UserId;

use super::error::map_db_error;

/// PostgreSQL implementation of UsageRepository
#[derive(Clone)]
pub struct PgUsageRepository {
    pool: PgPool,
}

impl PgUsageRepository {
    /// Create a new PgUsageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PgUsageRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, user_id: UserId) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO usage_records (user_id, messages_sent, created_at, updated_at)
            VALUES ($1, 0, NOW(), NOW())
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
