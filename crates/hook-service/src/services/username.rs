//! Unique-username synthesis
//!
//! OAuth signups arrive without a chosen username, so one is derived from
//! the provider profile: sanitize the base, try it bare, then resolve a
//! bounded batch of numbered candidates with a single query, and finally
//! fall back to a timestamp-suffixed name that needs no further querying.

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use hook_core::traits::UserRepository;

use super::error::{ServiceError, ServiceResult};

/// Minimum length of a sanitized username base
const MIN_BASE_LEN: usize = 3;

/// Maximum length of the base, leaving room for a numbered suffix within
/// the 32-character username limit
const MAX_BASE_LEN: usize = 28;

/// How many numbered candidates to try before the timestamp fallback
const CANDIDATE_BATCH: usize = 50;

/// Sanitize a raw base string into username-safe form
///
/// Lowercases, strips everything outside `[a-z0-9_]`, and truncates.
/// Returns `None` if the remainder is too short to be a username.
pub(crate) fn sanitize_base(raw: &str) -> Option<String> {
    let sanitized: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .take(MAX_BASE_LEN)
        .collect();

    (sanitized.len() >= MIN_BASE_LEN).then_some(sanitized)
}

/// Render a timestamp in base36 for the collision-resistant fallback suffix
pub(crate) fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

/// Generate a unique username from a raw base string
///
/// # Errors
/// Returns a validation error if the base sanitizes to fewer than three
/// characters, or a repository error from the availability checks.
pub async fn generate_unique_username(
    repo: &dyn UserRepository,
    raw_base: &str,
) -> ServiceResult<String> {
    let base = sanitize_base(raw_base).ok_or_else(|| {
        ServiceError::validation("Username base must contain at least 3 usable characters")
    })?;

    // The bare name is the common case; one existence check
    if !repo.username_exists(&base).await? {
        return Ok(base);
    }

    // Numbered candidates resolved with a single batched query
    let candidates: Vec<String> = (1..=CANDIDATE_BATCH)
        .map(|i| format!("{base}_{i}"))
        .collect();
    let taken: HashSet<String> = repo.find_usernames_in(&candidates).await?.into_iter().collect();

    if let Some(free) = candidates.iter().find(|c| !taken.contains(*c)) {
        return Ok(free.clone());
    }

    // Whole batch exhausted; a millisecond timestamp plus three random
    // digits will not collide in practice, so skip further queries
    let timestamp = to_base36(Utc::now().timestamp_millis().unsigned_abs());
    let salt: u16 = rand::thread_rng().gen_range(0..1000);
    let fallback = format!("{base}_{timestamp}{salt:03}");

    debug!(base = %base, fallback = %fallback, "Username candidate batch exhausted");
    Ok(fallback)
}
