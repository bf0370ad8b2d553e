//! Application services
//!
//! Each service takes a reference to the [`ServiceContext`] dependency
//! container and implements one slice of the produced auth operations.

mod context;
mod error;
mod identity;
mod session;
mod signup;
mod username;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use identity::IdentityService;
pub use session::SessionService;
pub use signup::SignupService;
pub use username::generate_unique_username;
