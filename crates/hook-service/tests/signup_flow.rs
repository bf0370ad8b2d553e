//! Email-verification ledger behavior: pending tokens, idempotent resend,
//! expiry, and confirmation races.

mod common;

use chrono::{Duration, Utc};
use common::mocks::TestHarness;
use hook_core::entities::EmailVerificationToken;
use hook_core::value_objects::Provider;
use hook_service::{ServiceError, SignupRequest, SignupService};

const AGENT: &str = "Mozilla/5.0 (test)";

fn signup_request(email: &str, username: &str, password: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: password.to_string(),
        display_name: "New User".to_string(),
        username: username.to_string(),
    }
}

#[tokio::test]
async fn test_request_signup_creates_pending_token_and_mails_code() {
    let harness = TestHarness::new();

    let response = SignupService::new(&harness.ctx)
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .expect("signup request succeeds");

    assert_eq!(response.email, "new@example.com");

    // No user yet, one pending token, one mail carrying its code
    assert_eq!(harness.users.count(), 0);
    assert_eq!(harness.verifications.count(), 1);

    let sent = harness.mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "new@example.com");
    assert_eq!(sent[0].1.len(), 32);
}

#[tokio::test]
async fn test_identical_retry_resends_same_code() {
    let harness = TestHarness::new();
    let service = SignupService::new(&harness.ctx);

    service
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .unwrap();
    service
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .unwrap();

    // Still a single pending record; both mails carried the same code
    assert_eq!(harness.verifications.count(), 1);
    let sent = harness.mail.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, sent[1].1);
}

#[tokio::test]
async fn test_changed_password_supersedes_pending_token() {
    let harness = TestHarness::new();
    let service = SignupService::new(&harness.ctx);

    service
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .unwrap();
    service
        .request_signup(signup_request("new@example.com", "newuser", "DifferentPass1"))
        .await
        .unwrap();

    let sent = harness.mail.sent();
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].1, sent[1].1, "changed details mint a fresh code");

    // The superseded code no longer confirms
    let result = service.confirm_signup(&sent[0].1, AGENT).await;
    match result {
        Err(ServiceError::Domain(e)) => assert_eq!(e.code(), "VERIFICATION_CODE_INVALID"),
        other => panic!("expected superseded code to be rejected, got {other:?}"),
    }

    // The fresh one does
    service
        .confirm_signup(&sent[1].1, AGENT)
        .await
        .expect("fresh code confirms");
}

#[tokio::test]
async fn test_signup_rejected_when_email_taken() {
    let harness = TestHarness::new();
    harness.seed_password_user("taken@example.com", "taken", "SecurePass1");

    let result = SignupService::new(&harness.ctx)
        .request_signup(signup_request("taken@example.com", "newuser", "SecurePass1"))
        .await;

    match result {
        Err(ServiceError::Domain(e)) => assert_eq!(e.code(), "EMAIL_ALREADY_EXISTS"),
        other => panic!("expected duplicate-email rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_signup_rejection_names_linked_provider() {
    use hook_core::entities::User;
    use hook_core::value_objects::UserId;

    let harness = TestHarness::new();
    let mut owner = User::new(
        UserId::new(),
        "Owner".to_string(),
        "owner".to_string(),
        "taken@example.com".to_string(),
    );
    owner.set_provider_id(Provider::Discord, "d-1".to_string());
    harness.users.insert(owner);

    let result = SignupService::new(&harness.ctx)
        .request_signup(signup_request("taken@example.com", "newuser", "SecurePass1"))
        .await;

    // The message distinguishes provider-linked ownership so the user is
    // pointed at the right login path
    match result {
        Err(ServiceError::Domain(e)) => {
            assert_eq!(e.code(), "EMAIL_LINKED_TO_PROVIDER");
            assert!(e.to_string().contains("discord"));
        }
        other => panic!("expected provider-linked rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_signup_rejected_when_username_taken() {
    let harness = TestHarness::new();
    harness.seed_password_user("other@example.com", "newuser", "SecurePass1");

    let result = SignupService::new(&harness.ctx)
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await;

    match result {
        Err(ServiceError::Domain(e)) => assert_eq!(e.code(), "USERNAME_TAKEN"),
        other => panic!("expected duplicate-username rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_weak_password_rejected_before_any_writes() {
    let harness = TestHarness::new();

    let result = SignupService::new(&harness.ctx)
        .request_signup(signup_request("new@example.com", "newuser", "weak"))
        .await;

    assert!(result.is_err());
    assert_eq!(harness.verifications.count(), 0);
    assert!(harness.mail.sent().is_empty());
}

#[tokio::test]
async fn test_confirm_creates_user_and_issues_tokens() {
    let harness = TestHarness::new();
    let service = SignupService::new(&harness.ctx);

    service
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .unwrap();
    let code = harness.mail.sent()[0].1.clone();

    let response = service.confirm_signup(&code, AGENT).await.expect("confirm succeeds");

    assert_eq!(response.user.email, "new@example.com");
    assert_eq!(response.user.username, "newuser");
    assert!(response.user.has_password);
    assert!(!response.refresh_token.is_empty());

    // Exactly one user; the token is burned; usage record exists
    assert_eq!(harness.users.count(), 1);
    let user_id = hook_core::value_objects::UserId::parse(&response.user.id).unwrap();
    assert!(harness.usage.has_record(user_id));
    assert_eq!(harness.sessions.sessions_for(user_id).len(), 1);

    // Replaying the code fails and creates nothing
    let replay = service.confirm_signup(&code, AGENT).await;
    assert!(replay.is_err());
    assert_eq!(harness.users.count(), 1);
}

#[tokio::test]
async fn test_confirm_unknown_code_rejected() {
    let harness = TestHarness::new();

    let result = SignupService::new(&harness.ctx)
        .confirm_signup("no-such-code", AGENT)
        .await;

    match result {
        Err(ServiceError::Domain(e)) => assert_eq!(e.code(), "VERIFICATION_CODE_INVALID"),
        other => panic!("expected unknown-code rejection, got {other:?}"),
    }
    assert_eq!(harness.users.count(), 0);
}

#[tokio::test]
async fn test_confirm_expired_code_rejected_without_creating_user() {
    let harness = TestHarness::new();

    let mut token = EmailVerificationToken::new(
        "new@example.com".to_string(),
        "$argon2id$fake".to_string(),
        "New User".to_string(),
        "newuser".to_string(),
    );
    token.expires_at = Utc::now() - Duration::hours(1);
    let code = token.code.clone();
    harness.verifications.insert(token);

    let result = SignupService::new(&harness.ctx).confirm_signup(&code, AGENT).await;

    match result {
        Err(ServiceError::Domain(e)) => {
            assert_eq!(e.code(), "VERIFICATION_CODE_EXPIRED");
            assert!(e.is_validation());
        }
        other => panic!("expected expired-code rejection, got {other:?}"),
    }
    assert_eq!(harness.users.count(), 0);
}

#[tokio::test]
async fn test_confirm_race_with_existing_user_burns_token() {
    let harness = TestHarness::new();
    let service = SignupService::new(&harness.ctx);

    service
        .request_signup(signup_request("new@example.com", "newuser", "SecurePass1"))
        .await
        .unwrap();
    let code = harness.mail.sent()[0].1.clone();

    // Another flow creates the user before the code comes back
    harness.seed_password_user("new@example.com", "someone_else", "OtherPass1");

    let result = service.confirm_signup(&code, AGENT).await;
    match result {
        Err(ServiceError::Domain(e)) => assert_eq!(e.code(), "EMAIL_ALREADY_EXISTS"),
        other => panic!("expected race rejection, got {other:?}"),
    }

    // The token is marked used so the code cannot be retried
    let pending = harness
        .verifications
        .find_by_code_sync(&code)
        .expect("token still stored");
    assert!(pending.used);
}

#[tokio::test]
async fn test_purge_removes_expired_tokens() {
    let harness = TestHarness::new();

    let mut expired = EmailVerificationToken::new(
        "old@example.com".to_string(),
        "$argon2id$fake".to_string(),
        "Old".to_string(),
        "olduser".to_string(),
    );
    expired.expires_at = Utc::now() - Duration::hours(1);
    harness.verifications.insert(expired);

    let fresh = EmailVerificationToken::new(
        "fresh@example.com".to_string(),
        "$argon2id$fake".to_string(),
        "Fresh".to_string(),
        "freshuser".to_string(),
    );
    harness.verifications.insert(fresh);

    let removed = SignupService::new(&harness.ctx).purge_expired().await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(harness.verifications.count(), 1);
}
