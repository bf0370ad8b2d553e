//! Email verification token entity <-> model mapper

use hook_core::entities::EmailVerificationToken;
use hook_core::value_objects::VerificationTokenId;

use crate::models::VerificationTokenModel;

/// Convert VerificationTokenModel to EmailVerificationToken entity
impl From<VerificationTokenModel> for EmailVerificationToken {
    fn from(model: VerificationTokenModel) -> Self {
        EmailVerificationToken {
            id: VerificationTokenId::from_uuid(model.id),
            email: model.email,
            password_hash: model.password_hash,
            display_name: model.display_name,
            username: model.username,
            code: model.code,
            expires_at: model.expires_at,
            used: model.used,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
