//! Usage record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for usage_records table
///
/// The counters themselves are maintained by the quota module; the auth core
/// only guarantees the row exists.
#[derive(Debug, Clone, FromRow)]
pub struct UsageModel {
    pub user_id: Uuid,
    pub messages_sent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
