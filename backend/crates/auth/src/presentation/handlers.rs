//! HTTP Handlers

use axum::Json;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::clock::Clock;
use platform::cookie::{CookieDirective, extract_cookie};
use platform::token::TokenKeys;
use std::sync::Arc;

use crate::application::config::LoginConfig;
use crate::application::{
    CsrfGuard, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, SessionManager,
    SessionStatus,
};
use crate::domain::entity::claims::Identity;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CsrfTokenResponse, FormPageResponse, LoginForm, LogoutForm, PageQuery, RegisterForm,
    WhoAmIResponse,
};
use crate::presentation::extract::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<LoginConfig>,
    pub sessions: Arc<SessionManager>,
    pub csrf: Arc<CsrfGuard>,
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            sessions: self.sessions.clone(),
            csrf: self.csrf.clone(),
        }
    }
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    /// Derive the token keys once and wire up both token services
    pub fn new(repo: R, config: LoginConfig, clock: Arc<dyn Clock>) -> Self {
        let config = Arc::new(config);
        let keys = Arc::new(TokenKeys::from_secret(config.secret_bytes()));

        Self {
            repo: Arc::new(repo),
            sessions: Arc::new(SessionManager::new(keys.clone(), clock.clone(), config.clone())),
            csrf: Arc::new(CsrfGuard::new(keys, clock)),
            config,
        }
    }

    pub(crate) fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.cookie_name)
    }

    pub(crate) fn identity(&self, headers: &HeaderMap) -> Identity {
        self.sessions.identity(self.session_cookie(headers).as_deref())
    }

    pub(crate) async fn session_status(&self, headers: &HeaderMap) -> AuthResult<SessionStatus> {
        let cookie = self.session_cookie(headers);
        self.sessions.verify(self.repo.as_ref(), cookie.as_deref()).await
    }
}

// ============================================================================
// Redirect helpers
// ============================================================================

pub(crate) const LOGIN_FAILED: &str = "invalid username and/or password";
pub(crate) const AUTH_REQUIRED: &str =
    "this route requires authentication. Please sign in to continue";

/// `path?error=<message>` with the message form-encoded
pub(crate) fn with_error(path: &str, message: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("error", message)
        .finish();
    format!("{path}?{query}")
}

/// 303 See Other, never cached, optionally setting a cookie
pub(crate) fn see_other(location: &str, cookie: Option<&CookieDirective>) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(header::LOCATION, value);
        }
        Err(e) => {
            tracing::error!(error = %e, "Redirect location is not a valid header value");
            headers.insert(header::LOCATION, HeaderValue::from_static("/"));
        }
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Some(value) = cookie.and_then(CookieDirective::to_header_value) {
        headers.insert(header::SET_COOKIE, value);
    }

    (StatusCode::SEE_OTHER, headers).into_response()
}

/// Capitalize and end with punctuation for display
pub fn format_error(message: &str) -> String {
    let mut chars = message.trim().chars();
    let mut formatted: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };
    if !formatted.ends_with(['.', '?', '!']) {
        formatted.push('.');
    }
    formatted
}

// ============================================================================
// Pages
// ============================================================================

/// GET /login
pub async fn login_page<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    form_page(&state, &headers, query).await
}

/// GET /register
pub async fn register_page<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    form_page(&state, &headers, query).await
}

/// Logged-in visitors are sent home; everyone else gets a fresh form token
async fn form_page<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    query: PageQuery,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    if let SessionStatus::Authenticated { .. } = state.session_status(headers).await? {
        return Ok(see_other("/", None));
    }

    let csrf_token = state.csrf.issue(&state.identity(headers))?;
    let error = query
        .error
        .filter(|e| !e.trim().is_empty())
        .map(|e| format_error(&e));

    Ok(Json(FormPageResponse { csrf_token, error }).into_response())
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /auth/csrf
pub async fn csrf_token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<CsrfTokenResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let csrf_token = state.csrf.issue(&state.identity(&headers))?;
    Ok(Json(CsrfTokenResponse { csrf_token }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    state.csrf.verify(&form.csrf_token, &state.identity(&headers))?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.sessions.clone());
    let input = LoginInput {
        user_name: form.username,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = state
                .config
                .session_cookie(output.session.token, output.session.expires_at);
            Ok(see_other("/", Some(&cookie)))
        }
        Err(AuthError::InvalidCredentials) => {
            AuthError::InvalidCredentials.log();
            Ok(see_other(&with_error("/login", LOGIN_FAILED), None))
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    state.csrf.verify(&form.csrf_token, &state.identity(&headers))?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.sessions.clone());
    let input = RegisterInput {
        user_name: form.username,
        display_name: form.display_name,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = state
                .config
                .session_cookie(output.session.token, output.session.expires_at);
            Ok(see_other("/", Some(&cookie)))
        }
        Err(e @ (AuthError::Validation(_) | AuthError::UserNameTaken)) => {
            tracing::debug!(error = %e, "Registration rejected");
            Ok(see_other(&with_error("/register", &e.to_string()), None))
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Form(form): Form<LogoutForm>,
) -> AuthResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
{
    let identity = state.identity(&headers);
    state.csrf.verify(&form.csrf_token, &identity)?;

    if let Some(user_name) = identity.user_name() {
        tracing::info!(user_name = %user_name, "User logged out");
    }

    Ok(see_other(
        "/login",
        Some(&state.config.clear_session_cookie()),
    ))
}

// ============================================================================
// Who am I
// ============================================================================

/// GET /auth/whoami
pub async fn whoami(CurrentUser { user, .. }: CurrentUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from(&user))
}
