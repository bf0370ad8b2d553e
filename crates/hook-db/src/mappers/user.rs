//! User entity <-> model mapper

use hook_core::entities::User;
use hook_core::value_objects::{AccountPlan, UserId};

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::from_uuid(model.id),
            display_name: model.display_name,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            discord_id: model.discord_id,
            google_id: model.google_id,
            avatar: model.avatar,
            plan: AccountPlan::from_str_lossy(&model.plan),
            guild_ids: model.guild_ids,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
