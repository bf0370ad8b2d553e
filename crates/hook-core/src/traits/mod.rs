//! Ports - abstract contracts the core depends on

mod clients;
mod repositories;

pub use clients::{MailSender, OAuthClient};
pub use repositories::{
    RepoResult, SessionRepository, UsageRepository, UserRepository, VerificationTokenRepository,
};
