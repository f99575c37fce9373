//! Auth scenarios across the session manager, CSRF guard and use cases

use std::sync::Arc;

use platform::clock::ManualClock;
use platform::token::{self, TokenKeys};

use crate::application::{
    CsrfGuard, LoginConfig, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    SessionManager, SessionStatus,
};
use crate::domain::entity::claims::{Identity, SESSION_AUDIENCE, SessionClaims};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{csrf_secret::CsrfSecret, user_name::UserName};
use crate::error::{AuthError, AuthResult};
use crate::infra::InMemoryUserRepository;

const NOW: i64 = 1_700_000_000;
const SECRET: &str = "0123456789abcdef0123456789abcdef";

struct Fixture {
    clock: Arc<ManualClock>,
    keys: Arc<TokenKeys>,
    repo: Arc<InMemoryUserRepository>,
    sessions: Arc<SessionManager>,
    csrf: CsrfGuard,
}

impl Fixture {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(NOW));
        let config = Arc::new(LoginConfig::with_secret(SECRET));
        let keys = Arc::new(TokenKeys::from_secret(SECRET.as_bytes()));

        Self {
            sessions: Arc::new(SessionManager::new(keys.clone(), clock.clone(), config)),
            csrf: CsrfGuard::new(keys.clone(), clock.clone()),
            repo: Arc::new(InMemoryUserRepository::new()),
            keys,
            clock,
        }
    }

    async fn register(&self, name: &str, password: &str) -> AuthResult<User> {
        let use_case = RegisterUseCase::new(self.repo.clone(), self.sessions.clone());
        let output = use_case
            .execute(RegisterInput {
                user_name: name.to_string(),
                display_name: None,
                password: password.to_string(),
            })
            .await?;
        Ok(output.user)
    }

    async fn login(&self, name: &str, password: &str) -> AuthResult<String> {
        let use_case = LoginUseCase::new(self.repo.clone(), self.sessions.clone());
        let output = use_case
            .execute(LoginInput {
                user_name: name.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(output.session.token)
    }
}

fn name(s: &str) -> UserName {
    UserName::new(s).unwrap()
}

fn bound(user: &str, secret: &CsrfSecret) -> Identity {
    Identity::Authenticated {
        user_name: name(user),
        csrf_secret: secret.clone(),
    }
}

// ============================================================================
// Session lifetime
// ============================================================================

#[tokio::test]
async fn session_is_valid_until_ttl_elapses() {
    let fx = Fixture::new();
    fx.register("alice", "hunter2").await.unwrap();

    let issued = fx.sessions.issue_with_ttl(&name("alice"), 3600).unwrap();

    let status = fx
        .sessions
        .verify(fx.repo.as_ref(), Some(&issued.token))
        .await
        .unwrap();
    match status {
        SessionStatus::Authenticated { user, csrf_secret } => {
            assert_eq!(user.user_name, name("alice"));
            assert_eq!(csrf_secret, issued.csrf_secret);
        }
        SessionStatus::Unauthenticated => panic!("fresh session rejected"),
    }

    // exp == now is still inside the window
    fx.clock.advance(3600);
    let status = fx.sessions.verify(fx.repo.as_ref(), Some(&issued.token)).await;
    assert!(matches!(status, Ok(SessionStatus::Authenticated { .. })));

    fx.clock.advance(1);
    let status = fx.sessions.verify(fx.repo.as_ref(), Some(&issued.token)).await;
    assert!(matches!(status, Ok(SessionStatus::Unauthenticated)));
}

#[tokio::test]
async fn session_for_unknown_user_is_unauthenticated() {
    let fx = Fixture::new();
    let issued = fx.sessions.issue(&name("ghost")).unwrap();

    let status = fx.sessions.verify(fx.repo.as_ref(), Some(&issued.token)).await;
    assert!(matches!(status, Ok(SessionStatus::Unauthenticated)));
}

#[tokio::test]
async fn missing_cookie_is_unauthenticated() {
    let fx = Fixture::new();
    let status = fx.sessions.verify(fx.repo.as_ref(), None).await;
    assert!(matches!(status, Ok(SessionStatus::Unauthenticated)));
}

#[tokio::test]
async fn session_signed_with_other_secret_is_unauthenticated() {
    let fx = Fixture::new();
    fx.register("alice", "hunter2").await.unwrap();

    let other_keys = TokenKeys::from_secret(b"ffffffffffffffffffffffffffffffff");
    let forged = token::encode(
        &SessionClaims {
            sub: "alice".to_string(),
            exp: NOW + 3600,
            nbf: NOW,
            aud: SESSION_AUDIENCE.to_string(),
            csrf_secret: CsrfSecret::generate(),
        },
        &other_keys,
    )
    .unwrap();

    let status = fx.sessions.verify(fx.repo.as_ref(), Some(&forged)).await;
    assert!(matches!(status, Ok(SessionStatus::Unauthenticated)));
}

struct BrokenRepository;

impl UserRepository for BrokenRepository {
    async fn find_by_user_name(&self, _user_name: &UserName) -> AuthResult<Option<User>> {
        Err(AuthError::Database(sqlx::Error::PoolClosed))
    }

    async fn exists_by_user_name(&self, _user_name: &UserName) -> AuthResult<bool> {
        Err(AuthError::Database(sqlx::Error::PoolClosed))
    }

    async fn create(&self, _user: NewUser) -> AuthResult<User> {
        Err(AuthError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn repository_failure_is_an_error_not_a_logout() {
    let fx = Fixture::new();
    let issued = fx.sessions.issue(&name("alice")).unwrap();

    let status = fx.sessions.verify(&BrokenRepository, Some(&issued.token)).await;
    assert!(matches!(status, Err(AuthError::Database(_))));
}

// ============================================================================
// CSRF binding
// ============================================================================

#[test]
fn csrf_token_is_bound_to_user_and_secret() {
    let fx = Fixture::new();
    let secret = CsrfSecret::generate();
    let token = fx.csrf.issue(&bound("alice", &secret)).unwrap();

    assert!(fx.csrf.verify(&token, &bound("alice", &secret)).is_ok());
    assert!(fx.csrf.verify(&token, &bound("bob", &secret)).is_err());
    assert!(
        fx.csrf
            .verify(&token, &bound("alice", &CsrfSecret::generate()))
            .is_err()
    );
}

#[test]
fn csrf_token_follows_the_session_it_was_issued_under() {
    let fx = Fixture::new();
    let first = fx.sessions.issue(&name("alice")).unwrap();
    let second = fx.sessions.issue(&name("alice")).unwrap();

    let identity = fx.sessions.identity(Some(&first.token));
    let token = fx.csrf.issue(&identity).unwrap();

    assert!(fx.csrf.verify(&token, &identity).is_ok());
    // a new login rotates the secret
    let rotated = fx.sessions.identity(Some(&second.token));
    assert!(matches!(
        fx.csrf.verify(&token, &rotated),
        Err(AuthError::CsrfInvalid)
    ));
}

#[test]
fn tokens_are_not_interchangeable() {
    let fx = Fixture::new();
    let session = fx.sessions.issue(&name("alice")).unwrap();
    let csrf = fx.csrf.issue(&Identity::Anonymous).unwrap();

    // session token submitted as a CSRF token
    assert!(matches!(
        fx.csrf.verify(&session.token, &Identity::Anonymous),
        Err(AuthError::CsrfInvalid)
    ));
    // CSRF token presented as a session cookie
    assert_eq!(fx.sessions.identity(Some(&csrf)), Identity::Anonymous);
}

#[test]
fn shared_keys_sign_both_kinds() {
    let fx = Fixture::new();
    let session = fx.sessions.issue(&name("alice")).unwrap();
    let other = SessionManager::new(
        fx.keys.clone(),
        fx.clock.clone(),
        Arc::new(LoginConfig::with_secret(SECRET)),
    );
    assert!(other.identity(Some(&session.token)).is_authenticated());
}

// ============================================================================
// Login / Register
// ============================================================================

#[tokio::test]
async fn register_then_login() {
    let fx = Fixture::new();
    let user = fx.register("alice", "correct horse").await.unwrap();
    assert_eq!(user.display_name.as_str(), "alice");
    assert!(!user.is_moderator());

    let token = fx.login("alice", "correct horse").await.unwrap();
    assert!(fx.sessions.identity(Some(&token)).is_authenticated());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let fx = Fixture::new();
    fx.register("alice", "correct horse").await.unwrap();

    for (user, password) in [
        ("alice", "wrong horse"),
        ("bob", "correct horse"),
        ("not valid!", "correct horse"),
        ("alice", ""),
    ] {
        let result = fx.login(user, password).await;
        assert!(
            matches!(result, Err(AuthError::InvalidCredentials)),
            "{user}/{password}"
        );
    }
}

#[tokio::test]
async fn register_rejects_taken_and_invalid_names() {
    let fx = Fixture::new();
    fx.register("alice", "hunter2").await.unwrap();

    assert!(matches!(
        fx.register("alice", "hunter3").await,
        Err(AuthError::UserNameTaken)
    ));
    assert!(matches!(
        fx.register("al ice", "hunter2").await,
        Err(AuthError::Validation(_))
    ));
    assert!(matches!(
        fx.register("bob", &"x".repeat(73)).await,
        Err(AuthError::Validation(_))
    ));
    assert_eq!(fx.repo.len(), 1);
}

#[tokio::test]
async fn register_keeps_explicit_display_name() {
    let fx = Fixture::new();
    let use_case = RegisterUseCase::new(fx.repo.clone(), fx.sessions.clone());
    let output = use_case
        .execute(RegisterInput {
            user_name: "alice".to_string(),
            display_name: Some("Alice Liddell".to_string()),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.display_name.as_str(), "Alice Liddell");
    assert_eq!(output.session.expires_at.timestamp(), NOW + 604800);
}
