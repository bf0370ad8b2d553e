//! Session entity <-> model mapper

use hook_core::entities::Session;
use hook_core::value_objects::{SessionId, UserId};

use crate::models::SessionModel;

/// Convert SessionModel to Session entity
impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: SessionId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            token_id: model.token_id,
            expires_at: model.expires_at,
            used: model.used,
            user_agent: model.user_agent,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
