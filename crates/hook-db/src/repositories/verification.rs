//! PostgreSQL implementation of VerificationTokenRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use hook_core::entities::EmailVerificationToken;
use hook_core::traits::{RepoResult, VerificationTokenRepository};
use hook_core::value_objects::VerificationTokenId;

use crate::models::VerificationTokenModel;

use super::error::map_db_error;

const TOKEN_COLUMNS: &str = "id, email, password_hash, display_name, username, code, \
                             expires_at, used, created_at, updated_at";

/// How long used tokens are kept before the sweep removes them
const USED_RETENTION_DAYS: i32 = 7;

/// PostgreSQL implementation of VerificationTokenRepository
#[derive(Clone)]
pub struct PgVerificationTokenRepository {
    pool: PgPool,
}

impl PgVerificationTokenRepository {
    /// Create a new PgVerificationTokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationTokenRepository for PgVerificationTokenRepository {
    #[instrument(skip(self))]
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> RepoResult<Option<EmailVerificationToken>> {
        let result = sqlx::query_as::<_, VerificationTokenModel>(&format!(
            r"
            SELECT {TOKEN_COLUMNS}
            FROM verification_tokens
            WHERE email = $1 AND used = FALSE AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(EmailVerificationToken::from))
    }

    #[instrument(skip(self, code))]
    async fn find_by_code(&self, code: &str) -> RepoResult<Option<EmailVerificationToken>> {
        let result = sqlx::query_as::<_, VerificationTokenModel>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM verification_tokens WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(EmailVerificationToken::from))
    }

    #[instrument(skip(self, token), fields(email = %token.email))]
    async fn create(&self, token: &EmailVerificationToken) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO verification_tokens (id, email, password_hash, display_name, username,
                                             code, expires_at, used, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(token.id.into_inner())
        .bind(&token.email)
        .bind(&token.password_hash)
        .bind(&token.display_name)
        .bind(&token.username)
        .bind(&token.code)
        .bind(token.expires_at)
        .bind(token.used)
        .bind(token.created_at)
        .bind(token.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_used(&self, id: VerificationTokenId) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE verification_tokens
            SET used = TRUE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM verification_tokens
            WHERE expires_at < NOW()
               OR (used = TRUE AND updated_at < NOW() - make_interval(days => $1))
            ",
        )
        .bind(USED_RETENTION_DAYS)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
