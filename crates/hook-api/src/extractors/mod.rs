//! Request extractors

mod agent;
mod auth;
mod validated;

pub use agent::ClientAgent;
pub use auth::AuthUser;
pub use validated::ValidatedJson;
