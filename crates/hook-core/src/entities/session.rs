//! Session entity - one outstanding, rotatable refresh token

use chrono::{DateTime, Utc};

use crate::value_objects::{SessionId, UserId};

/// Refresh-token record
///
/// One row per issued refresh token, keyed by the token identifier (jti)
/// embedded in the signed token. `used` transitions false→true exactly once,
/// on rotation or logout; the row is deleted outright when the whole family
/// is revoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// Token identifier (jti) mirrored in the signed refresh token
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    /// Requesting client's user-agent at issuance; must match on every refresh
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new unused Session
    pub fn new(
        user_id: UserId,
        token_id: String,
        expires_at: DateTime<Utc>,
        user_agent: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            user_id,
            token_id,
            expires_at,
            used: false,
            user_agent,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the session has passed its expiry
    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the session is still redeemable
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.used && !self.is_expired()
    }
}
