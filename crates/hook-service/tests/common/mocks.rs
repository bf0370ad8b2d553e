//! In-memory mocks for the repository and client ports

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hook_common::auth::{JwtService, PasswordService};
use hook_core::entities::{EmailVerificationToken, Session, User};
use hook_core::error::DomainError;
use hook_core::traits::{
    MailSender, OAuthClient, RepoResult, SessionRepository, UsageRepository, UserRepository,
    VerificationTokenRepository,
};
use hook_core::value_objects::{Provider, ProviderProfile, UserId, VerificationTokenId};
use hook_service::{ServiceContext, ServiceContextBuilder};

/// In-memory user repository
#[derive(Default)]
pub struct MockUserRepository {
    users: DashMap<UserId, User>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user directly, bypassing uniqueness checks
    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Fetch a user regardless of soft deletion
    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|r| r.value().clone())
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// Synchronous username check for test assertions
    pub fn username_taken(&self, username: &str) -> bool {
        self.users
            .iter()
            .any(|r| r.value().username == username && r.value().deleted_at.is_none())
    }

    fn live<'a>(user: &'a User) -> Option<&'a User> {
        user.deleted_at.is_none().then_some(user)
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .and_then(|r| Self::live(r.value()).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|r| r.value().email == email && r.value().deleted_at.is_none())
            .map(|r| r.value().clone()))
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_id: &str,
    ) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|r| {
                r.value().deleted_at.is_none()
                    && r.value().provider_id(provider) == Some(provider_id)
            })
            .map(|r| r.value().clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self
            .users
            .iter()
            .any(|r| r.value().username == username && r.value().deleted_at.is_none()))
    }

    async fn find_usernames_in(&self, candidates: &[String]) -> RepoResult<Vec<String>> {
        Ok(self
            .users
            .iter()
            .filter(|r| {
                r.value().deleted_at.is_none() && candidates.contains(&r.value().username)
            })
            .map(|r| r.value().username.clone())
            .collect())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists);
        }
        if self.username_exists(&user.username).await? {
            return Err(DomainError::UsernameTaken);
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *stored = user.clone();
        Ok(())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let mut stored = self.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        stored.password_hash = Some(password_hash.to_string());
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut stored = self.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        stored.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// In-memory session repository
///
/// `fail_create` simulates a persistence outage to exercise the rule that
/// token issuance fails when the session row cannot be written.
#[derive(Default)]
pub struct MockSessionRepository {
    sessions: DashMap<String, Session>,
    fail_create: AtomicBool,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// All sessions currently stored for a user
    pub fn sessions_for(&self, user_id: UserId) -> Vec<Session> {
        self.sessions
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn create(&self, session: &Session) -> RepoResult<()> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        self.sessions.insert(session.token_id.clone(), session.clone());
        Ok(())
    }

    async fn find_by_token_id(&self, token_id: &str) -> RepoResult<Option<Session>> {
        Ok(self.sessions.get(token_id).map(|r| r.value().clone()))
    }

    async fn mark_used(&self, token_id: &str) -> RepoResult<bool> {
        // get_mut holds the shard lock, making check-and-set atomic
        match self.sessions.get_mut(token_id) {
            Some(mut session) if !session.used => {
                session.used = true;
                session.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> RepoResult<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - self.sessions.len()) as u64)
    }

    async fn delete_expired(&self) -> RepoResult<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        Ok((before - self.sessions.len()) as u64)
    }
}

/// In-memory verification token repository
#[derive(Default)]
pub struct MockVerificationTokenRepository {
    tokens: DashMap<VerificationTokenId, EmailVerificationToken>,
}

impl MockVerificationTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token directly (e.g. a pre-expired one)
    pub fn insert(&self, token: EmailVerificationToken) {
        self.tokens.insert(token.id, token);
    }

    pub fn get(&self, id: VerificationTokenId) -> Option<EmailVerificationToken> {
        self.tokens.get(&id).map(|r| r.value().clone())
    }

    /// Synchronous code lookup for test assertions
    pub fn find_by_code_sync(&self, code: &str) -> Option<EmailVerificationToken> {
        self.tokens
            .iter()
            .find(|r| r.value().code == code)
            .map(|r| r.value().clone())
    }

    pub fn count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl VerificationTokenRepository for MockVerificationTokenRepository {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> RepoResult<Option<EmailVerificationToken>> {
        Ok(self
            .tokens
            .iter()
            .filter(|r| r.value().email == email && r.value().is_active())
            .max_by_key(|r| r.value().created_at)
            .map(|r| r.value().clone()))
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<EmailVerificationToken>> {
        Ok(self
            .tokens
            .iter()
            .find(|r| r.value().code == code)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, token: &EmailVerificationToken) -> RepoResult<()> {
        self.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn mark_used(&self, id: VerificationTokenId) -> RepoResult<()> {
        if let Some(mut token) = self.tokens.get_mut(&id) {
            token.used = true;
            token.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_expired(&self) -> RepoResult<u64> {
        let before = self.tokens.len();
        self.tokens.retain(|_, t| !t.is_expired());
        Ok((before - self.tokens.len()) as u64)
    }
}

/// In-memory usage repository recording which users have a record
#[derive(Default)]
pub struct MockUsageRepository {
    records: DashMap<UserId, ()>,
}

impl MockUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_record(&self, user_id: UserId) -> bool {
        self.records.contains_key(&user_id)
    }
}

#[async_trait]
impl UsageRepository for MockUsageRepository {
    async fn get_or_create(&self, user_id: UserId) -> RepoResult<()> {
        self.records.insert(user_id, ());
        Ok(())
    }
}

/// OAuth client returning a canned profile
pub struct MockOAuthClient {
    provider: Provider,
    profile: ProviderProfile,
}

impl MockOAuthClient {
    pub fn new(provider: Provider, profile: ProviderProfile) -> Self {
        Self { provider, profile }
    }
}

#[async_trait]
impl OAuthClient for MockOAuthClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn exchange_code(&self, code: &str) -> Result<String, DomainError> {
        if code == "invalid-code" {
            return Err(DomainError::ExternalApi("provider rejected the code".to_string()));
        }
        Ok(format!("provider-token-{code}"))
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<ProviderProfile, DomainError> {
        Ok(self.profile.clone())
    }
}

/// Mail sender recording every delivery
#[derive(Default)]
pub struct MockMailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All (email, code) pairs sent so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }
}

#[async_trait]
impl MailSender for MockMailSender {
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .expect("mail mutex poisoned")
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Everything a service test needs: the context plus handles to the mocks
pub struct TestHarness {
    pub users: Arc<MockUserRepository>,
    pub sessions: Arc<MockSessionRepository>,
    pub verifications: Arc<MockVerificationTokenRepository>,
    pub usage: Arc<MockUsageRepository>,
    pub mail: Arc<MockMailSender>,
    pub password_service: Arc<PasswordService>,
    pub ctx: ServiceContext,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_oauth(Vec::new())
    }

    pub fn with_oauth(oauth_clients: Vec<Arc<dyn OAuthClient>>) -> Self {
        let users = Arc::new(MockUserRepository::new());
        let sessions = Arc::new(MockSessionRepository::new());
        let verifications = Arc::new(MockVerificationTokenRepository::new());
        let usage = Arc::new(MockUsageRepository::new());
        let mail = Arc::new(MockMailSender::new());
        // Cheapest work factor keeps the suite fast
        let password_service =
            Arc::new(PasswordService::new(i64::from(PasswordService::MIN_WORK_FACTOR)));

        let mut builder = ServiceContextBuilder::new()
            .user_repo(users.clone())
            .session_repo(sessions.clone())
            .verification_repo(verifications.clone())
            .usage_repo(usage.clone())
            .mail_sender(mail.clone())
            .jwt_service(Arc::new(JwtService::new(
                "test-secret-key-that-is-long-enough",
                900,
                604800,
            )))
            .password_service(password_service.clone());

        for client in oauth_clients {
            builder = builder.oauth_client(client);
        }

        let ctx = builder.build().expect("all test dependencies provided");

        Self {
            users,
            sessions,
            verifications,
            usage,
            mail,
            password_service,
            ctx,
        }
    }

    /// Create a password-credentialed user directly in the store
    pub fn seed_password_user(&self, email: &str, username: &str, password: &str) -> User {
        let hash = self.password_service.hash(password).expect("hashing succeeds");
        let user = User::new(
            UserId::new(),
            username.to_string(),
            username.to_string(),
            email.to_string(),
        )
        .with_password_hash(hash);
        self.users.insert(user.clone());
        user
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
