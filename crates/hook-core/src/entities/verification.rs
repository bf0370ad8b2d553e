//! Email verification token - pending-signup data held until confirmed

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::VerificationTokenId;

/// Pending signup awaiting email confirmation
///
/// Holds everything needed to create the User once the code comes back.
/// The password is stored hashed; the plaintext never outlives the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerificationToken {
    pub id: VerificationTokenId,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub username: String,
    /// Opaque random code delivered out-of-band
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    /// Verification codes expire after this many hours
    pub const TTL_HOURS: i64 = 24;

    /// Create a new pending token with a fresh code and 24-hour expiry
    pub fn new(
        email: String,
        password_hash: String,
        display_name: String,
        username: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VerificationTokenId::new(),
            email,
            password_hash,
            display_name,
            username,
            code: generate_verification_code(),
            expires_at: now + Duration::hours(Self::TTL_HOURS),
            used: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the token has passed its expiry
    #[inline]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the token is eligible for resend or confirmation
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.used && !self.is_expired()
    }
}

/// Generate a random verification code
pub fn generate_verification_code() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const CODE_LEN: usize = 32;

    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_token() -> EmailVerificationToken {
        EmailVerificationToken::new(
            "new@example.com".to_string(),
            "$argon2id$fake".to_string(),
            "New User".to_string(),
            "newuser".to_string(),
        )
    }

    #[test]
    fn test_new_token_is_active() {
        let token = test_token();
        assert!(token.is_active());
        assert!(!token.is_expired());
        assert!(!token.used);
    }

    #[test]
    fn test_expiry_window() {
        let token = test_token();
        let ttl = token.expires_at - token.created_at;
        assert_eq!(ttl, Duration::hours(EmailVerificationToken::TTL_HOURS));
    }

    #[test]
    fn test_used_token_is_not_active() {
        let mut token = test_token();
        token.used = true;
        assert!(!token.is_active());
    }

    #[test]
    fn test_generate_verification_code() {
        let code1 = generate_verification_code();
        let code2 = generate_verification_code();

        assert_eq!(code1.len(), 32);
        assert_ne!(code1, code2);
        assert!(code1.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
