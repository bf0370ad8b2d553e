//! Service context - dependency container for services
//!
//! Holds all repositories, outbound clients, and auth primitives needed by
//! services. Session and user state live exclusively behind the repository
//! ports; nothing here caches them in process.

use std::collections::HashMap;
use std::sync::Arc;

use hook_common::auth::{JwtService, PasswordService};
use hook_core::traits::{
    MailSender, OAuthClient, SessionRepository, UsageRepository, UserRepository,
    VerificationTokenRepository,
};
use hook_core::value_objects::Provider;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - OAuth provider clients and the mail sender
/// - JWT and password services
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    verification_repo: Arc<dyn VerificationTokenRepository>,
    usage_repo: Arc<dyn UsageRepository>,

    // Outbound clients
    oauth_clients: HashMap<Provider, Arc<dyn OAuthClient>>,
    mail_sender: Arc<dyn MailSender>,

    // Auth primitives
    jwt_service: Arc<JwtService>,
    password_service: Arc<PasswordService>,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the session repository
    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    /// Get the verification token repository
    pub fn verification_repo(&self) -> &dyn VerificationTokenRepository {
        self.verification_repo.as_ref()
    }

    /// Get the usage repository
    pub fn usage_repo(&self) -> &dyn UsageRepository {
        self.usage_repo.as_ref()
    }

    // === Outbound clients ===

    /// Get the OAuth client for a provider, if one is configured
    pub fn oauth_client(&self, provider: Provider) -> Option<&dyn OAuthClient> {
        self.oauth_clients.get(&provider).map(Arc::as_ref)
    }

    /// Get the mail sender
    pub fn mail_sender(&self) -> &dyn MailSender {
        self.mail_sender.as_ref()
    }

    // === Auth primitives ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        self.password_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("oauth_providers", &self.oauth_clients.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    verification_repo: Option<Arc<dyn VerificationTokenRepository>>,
    usage_repo: Option<Arc<dyn UsageRepository>>,
    oauth_clients: HashMap<Provider, Arc<dyn OAuthClient>>,
    mail_sender: Option<Arc<dyn MailSender>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: Option<Arc<PasswordService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            session_repo: None,
            verification_repo: None,
            usage_repo: None,
            oauth_clients: HashMap::new(),
            mail_sender: None,
            jwt_service: None,
            password_service: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn verification_repo(mut self, repo: Arc<dyn VerificationTokenRepository>) -> Self {
        self.verification_repo = Some(repo);
        self
    }

    pub fn usage_repo(mut self, repo: Arc<dyn UsageRepository>) -> Self {
        self.usage_repo = Some(repo);
        self
    }

    /// Register an OAuth client; its provider tag is taken from the client
    pub fn oauth_client(mut self, client: Arc<dyn OAuthClient>) -> Self {
        self.oauth_clients.insert(client.provider(), client);
        self
    }

    pub fn mail_sender(mut self, sender: Arc<dyn MailSender>) -> Self {
        self.mail_sender = Some(sender);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn password_service(mut self, service: Arc<PasswordService>) -> Self {
        self.password_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            session_repo: self
                .session_repo
                .ok_or_else(|| ServiceError::validation("session_repo is required"))?,
            verification_repo: self
                .verification_repo
                .ok_or_else(|| ServiceError::validation("verification_repo is required"))?,
            usage_repo: self
                .usage_repo
                .ok_or_else(|| ServiceError::validation("usage_repo is required"))?,
            oauth_clients: self.oauth_clients,
            mail_sender: self
                .mail_sender
                .ok_or_else(|| ServiceError::validation("mail_sender is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            password_service: self
                .password_service
                .ok_or_else(|| ServiceError::validation("password_service is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
