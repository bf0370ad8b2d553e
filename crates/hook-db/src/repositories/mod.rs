//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in hook-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod session;
mod usage;
mod user;
mod verification;

pub use session::PgSessionRepository;
pub use usage::PgUsageRepository;
pub use user::PgUserRepository;
pub use verification::PgVerificationTokenRepository;
