//! Password hashing and verification utilities
//!
//! Uses Argon2id for secure password hashing (OWASP recommended). The work
//! factor is passed in at construction instead of read from ambient state;
//! it is interpreted as a memory-cost exponent (2^factor KiB).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::warn;

use crate::error::AppError;

/// Password service for hashing and verification
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    work_factor: u32,
}

impl PasswordService {
    /// Lowest accepted work factor (2^10 KiB = 1 MiB memory cost)
    pub const MIN_WORK_FACTOR: u32 = 10;
    /// Highest accepted work factor (2^15 KiB = 32 MiB memory cost)
    pub const MAX_WORK_FACTOR: u32 = 15;
    /// Default work factor when configuration is missing or out of range
    pub const DEFAULT_WORK_FACTOR: u32 = 12;

    const T_COST: u32 = 3;
    const P_COST: u32 = 1;

    /// Create a password service with the configured work factor
    ///
    /// Values outside `MIN_WORK_FACTOR..=MAX_WORK_FACTOR` (including
    /// negative values from a misparsed configuration) fall back to
    /// `DEFAULT_WORK_FACTOR` with a logged warning.
    #[must_use]
    pub fn new(configured_work_factor: i64) -> Self {
        let work_factor = match u32::try_from(configured_work_factor) {
            Ok(f) if (Self::MIN_WORK_FACTOR..=Self::MAX_WORK_FACTOR).contains(&f) => f,
            _ => {
                warn!(
                    configured = configured_work_factor,
                    fallback = Self::DEFAULT_WORK_FACTOR,
                    "Password work factor out of range, using default"
                );
                Self::DEFAULT_WORK_FACTOR
            }
        };

        let params = Params::new(1 << work_factor, Self::T_COST, Self::P_COST, None)
            .expect("clamped work factor always yields valid Argon2 params");

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            work_factor,
        }
    }

    /// The effective (clamped) work factor
    #[must_use]
    pub fn work_factor(&self) -> u32 {
        self.work_factor
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
    }

    /// Verify a password against a hash
    ///
    /// Returns `Ok(false)` on mismatch; errors only on malformed hash input.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password and return an error if invalid
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if self.verify(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(i64::from(Self::DEFAULT_WORK_FACTOR))
    }
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService")
            .field("work_factor", &self.work_factor)
            .finish_non_exhaustive()
    }
}

/// Validate password strength
///
/// Returns `Ok(())` if the password meets requirements:
/// - At least 8 characters
/// - Contains at least one uppercase letter
/// - Contains at least one lowercase letter
/// - Contains at least one digit
///
/// # Errors
/// Returns a validation error if the password doesn't meet requirements
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if !password.chars().any(char::is_uppercase) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !password.chars().any(char::is_lowercase) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Use the cheapest params in tests to keep them fast
    fn test_service() -> PasswordService {
        PasswordService::new(i64::from(PasswordService::MIN_WORK_FACTOR))
    }

    #[test]
    fn test_hash_password() {
        let service = test_service();
        let password = "SecurePassword123!";
        let hash = service.hash(password).unwrap();

        // Hash should start with argon2 identifier
        assert!(hash.starts_with("$argon2"));
        // Hash should be different each time (different salt)
        let hash2 = service.hash(password).unwrap();
        assert_ne!(hash, hash2);
    }

    #[test]
    fn test_verify_password_success() {
        let service = test_service();
        let password = "SecurePassword123!";
        let hash = service.hash(password).unwrap();

        assert!(service.verify(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_failure() {
        let service = test_service();
        let hash = service.hash("SecurePassword123!").unwrap();

        assert!(!service.verify("WrongPassword123!", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_errors() {
        let service = test_service();
        let result = service.verify("whatever", "not-a-valid-hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_work_factor_clamping() {
        assert_eq!(
            PasswordService::new(9).work_factor(),
            PasswordService::DEFAULT_WORK_FACTOR
        );
        assert_eq!(
            PasswordService::new(99).work_factor(),
            PasswordService::DEFAULT_WORK_FACTOR
        );
        assert_eq!(
            PasswordService::new(-3).work_factor(),
            PasswordService::DEFAULT_WORK_FACTOR
        );
        assert_eq!(PasswordService::new(10).work_factor(), 10);
        assert_eq!(PasswordService::new(15).work_factor(), 15);
    }

    #[test]
    fn test_verify_or_error_failure() {
        let service = test_service();
        let hash = service.hash("SecurePassword123!").unwrap();

        let result = service.verify_or_error("wrong", &hash);
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_validate_password_strength_valid() {
        assert!(validate_password_strength("SecurePass1").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());
        assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
    }

    #[test]
    fn test_validate_password_strength_too_short() {
        let result = validate_password_strength("Short1");
        assert!(result.is_err());
        if let Err(AppError::Validation(msg)) = result {
            assert!(msg.contains("8 characters"));
        }
    }

    #[test]
    fn test_validate_password_strength_no_uppercase() {
        assert!(validate_password_strength("lowercase123").is_err());
    }

    #[test]
    fn test_validate_password_strength_no_lowercase() {
        assert!(validate_password_strength("UPPERCASE123").is_err());
    }

    #[test]
    fn test_validate_password_strength_no_digit() {
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }
}
