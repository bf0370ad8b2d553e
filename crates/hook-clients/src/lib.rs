//! # hook-clients
//!
//! Outbound HTTP infrastructure: OAuth provider clients (Discord, Google)
//! and the transactional mail sender. Implements the client traits defined
//! in `hook-core`.
//!
//! Every request carries an explicit timeout; timeouts and non-2xx responses
//! surface as external-API errors and never block a login indefinitely.

pub mod mail;
pub mod oauth;

pub use mail::{HttpMailSender, NoopMailSender};
pub use oauth::{DiscordOAuthClient, GoogleOAuthClient};
