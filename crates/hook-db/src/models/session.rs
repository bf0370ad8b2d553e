//! Session (refresh token) database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionModel {
    /// Check if the session is expired
    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the session is still redeemable (unused and unexpired)
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.used && !self.is_expired()
    }
}
