//! Credential handling and the session lifecycle.
//!
//! Two authentication schemes are supported: per-request HTTP basic
//! authentication, and cookie-based sessions established lazily against
//! `rest/auth/1/session`. Session state lives behind an async mutex so a
//! shared client observes one consistent lifecycle:
//! pending, then active, then terminated.

use std::fmt;

use reqwest::header::COOKIE;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::AUTH_PATH;
use crate::rest::{RestClient, RestError};

/// Cookie name assumed when a session token is supplied directly.
const DEFAULT_COOKIE_NAME: &str = "JSESSIONID";

/// Error type for credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login exchange failed; the credential stays pending and the next
    /// request will retry it.
    #[error("Failed to login")]
    LoginFailed(#[source] Box<RestError>),

    /// The login response did not carry the expected session cookie fields.
    #[error("Malformed session payload from the server")]
    MalformedSessionPayload,

    /// The logout exchange failed; the session token is left in place.
    #[error("Failed to logout")]
    LogoutFailed(#[source] Box<RestError>),
}

/// Credentials attached to every request a [`RestClient`] sends.
///
/// # Example
///
/// ```rust
/// use jira_api::Credentials;
///
/// let basic = Credentials::basic("bob", "secret");
/// let session = Credentials::session("bob", "secret");
/// let resumed = Credentials::from_token("0123456789abcdef");
/// ```
pub enum Credentials {
    /// HTTP basic authentication, attached to every request.
    Basic {
        /// Account user name.
        username: String,
        /// Account password.
        password: String,
    },
    /// A cookie-based session with a lazily established token.
    Session(SessionCredentials),
}

impl Credentials {
    /// Creates basic-authentication credentials.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates session credentials that will log in on first use.
    #[must_use]
    pub fn session(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Session(SessionCredentials::pending(username.into(), password.into()))
    }

    /// Resumes an existing session from a known token.
    ///
    /// No login is performed; the token is sent as a `JSESSIONID` cookie
    /// as-is.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::Session(SessionCredentials::active(
            DEFAULT_COOKIE_NAME.to_string(),
            token.into(),
        ))
    }

    /// Attaches this credential to an outgoing request.
    ///
    /// A pending or terminated session attaches nothing.
    pub(crate) async fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Session(session) => session.authenticate(request).await,
        }
    }

    /// Ensures this credential is ready to authenticate requests, logging in
    /// if the session has not been established yet.
    ///
    /// Idempotent: once the session is active (or was terminated by logout)
    /// this is a no-op, and basic credentials never need initialization.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LoginFailed`] when the login exchange is
    /// rejected; the credential stays pending so a later call retries.
    pub(crate) async fn initialize(&self, client: &RestClient) -> Result<(), AuthError> {
        match self {
            Self::Basic { .. } => Ok(()),
            Self::Session(session) => session.initialize(client).await,
        }
    }

    /// Tears down an active session on the server.
    ///
    /// A no-op for basic credentials and for sessions that were never
    /// established or are already terminated. After a successful logout the
    /// credential is terminated for good; it never logs in again.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LogoutFailed`] when the server rejects the
    /// logout; the session token is left untouched so requests keep working.
    pub async fn logout(&self, client: &RestClient) -> Result<(), AuthError> {
        match self {
            Self::Basic { .. } => Ok(()),
            Self::Session(session) => session.logout(client).await,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"*****")
                .finish(),
            Self::Session(_) => f.write_str("Session(..)"),
        }
    }
}

/// Lifecycle of a session credential.
enum SessionState {
    /// Not logged in yet; holds the login inputs.
    Pending { username: String, password: String },
    /// Logged in; holds the cookie to attach to every request.
    Active { cookie_name: String, token: String },
    /// Logged out; terminal.
    Terminated,
}

/// A cookie-based session credential.
///
/// The session token is obtained by a `POST` to `rest/auth/1/session` the
/// first time the owning client sends a request, and discarded by a `DELETE`
/// to the same resource on logout.
pub struct SessionCredentials {
    state: Mutex<SessionState>,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never render the password or the session token
        match self.state.try_lock().as_deref() {
            Ok(SessionState::Pending { username, .. }) => f
                .debug_struct("SessionCredentials")
                .field("state", &format_args!("Pending({username})"))
                .finish(),
            Ok(SessionState::Active { cookie_name, .. }) => f
                .debug_struct("SessionCredentials")
                .field("state", &format_args!("Active({cookie_name}=*****)"))
                .finish(),
            Ok(SessionState::Terminated) => f
                .debug_struct("SessionCredentials")
                .field("state", &"Terminated")
                .finish(),
            Err(_) => f.write_str("SessionCredentials(<locked>)"),
        }
    }
}

/// Shape of the login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    session: SessionCookie,
}

#[derive(Debug, Deserialize)]
struct SessionCookie {
    name: String,
    value: String,
}

impl SessionCredentials {
    fn pending(username: String, password: String) -> Self {
        Self {
            state: Mutex::new(SessionState::Pending { username, password }),
        }
    }

    fn active(cookie_name: String, token: String) -> Self {
        Self {
            state: Mutex::new(SessionState::Active { cookie_name, token }),
        }
    }

    /// Returns the current session token, if the session is active.
    pub async fn token(&self) -> Option<String> {
        match &*self.state.lock().await {
            SessionState::Active { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    async fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &*self.state.lock().await {
            SessionState::Active { cookie_name, token } => {
                request.header(COOKIE, format!("{cookie_name}={token};"))
            }
            _ => request,
        }
    }

    async fn initialize(&self, client: &RestClient) -> Result<(), AuthError> {
        // Take the login inputs without holding the lock across the HTTP
        // exchange; the request sent below authenticates with this same
        // credential (attaching nothing while pending).
        let (username, password) = match &*self.state.lock().await {
            SessionState::Pending { username, password } => {
                (username.clone(), password.clone())
            }
            _ => return Ok(()),
        };

        let payload = json!({ "username": username, "password": password });
        let body = client
            .raw_post(&format!("{AUTH_PATH}session"), &payload)
            .await
            .map_err(|e| AuthError::LoginFailed(Box::new(e)))?
            .ok_or(AuthError::MalformedSessionPayload)?;

        let login: LoginResponse =
            serde_json::from_value(body).map_err(|_| AuthError::MalformedSessionPayload)?;

        tracing::debug!(cookie = %login.session.name, "session established");

        let mut state = self.state.lock().await;
        if matches!(*state, SessionState::Pending { .. }) {
            *state = SessionState::Active {
                cookie_name: login.session.name,
                token: login.session.value,
            };
        }
        Ok(())
    }

    async fn logout(&self, client: &RestClient) -> Result<(), AuthError> {
        if matches!(*self.state.lock().await, SessionState::Active { .. }) {
            // The DELETE below carries the session cookie of the session it
            // is tearing down.
            client
                .raw_delete(&format!("{AUTH_PATH}session"))
                .await
                .map_err(|e| AuthError::LogoutFailed(Box::new(e)))?;

            *self.state.lock().await = SessionState::Terminated;
            tracing::debug!("session terminated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(request: RequestBuilder) -> reqwest::Request {
        request.build().unwrap()
    }

    fn request() -> RequestBuilder {
        reqwest::Client::new().get("http://localhost/")
    }

    #[tokio::test]
    async fn test_basic_credentials_attach_authorization_header() {
        let credentials = Credentials::basic("bob", "secret");
        let built = build(credentials.authenticate(request()).await);
        let auth = built.headers().get("authorization").unwrap();
        assert!(auth.to_str().unwrap().starts_with("Basic "));
    }

    #[tokio::test]
    async fn test_pending_session_attaches_nothing() {
        let credentials = Credentials::session("bob", "secret");
        let built = build(credentials.authenticate(request()).await);
        assert!(built.headers().get("cookie").is_none());
        assert!(built.headers().get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_token_session_attaches_cookie() {
        let credentials = Credentials::from_token("0123456789abcdef");
        let built = build(credentials.authenticate(request()).await);
        let cookie = built.headers().get("cookie").unwrap();
        assert_eq!(cookie.to_str().unwrap(), "JSESSIONID=0123456789abcdef;");
    }

    #[tokio::test]
    async fn test_token_session_starts_active() {
        let Credentials::Session(session) = Credentials::from_token("tok") else {
            panic!("expected a session credential");
        };
        assert_eq!(session.token().await.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_pending_session_has_no_token() {
        let Credentials::Session(session) = Credentials::session("bob", "secret") else {
            panic!("expected a session credential");
        };
        assert!(session.token().await.is_none());
    }

    #[test]
    fn test_login_response_parses_session_cookie() {
        let body = serde_json::json!({
            "session": { "name": "JSESSIONID", "value": "abc123" },
            "loginInfo": { "loginCount": 1 }
        });
        let login: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(login.session.name, "JSESSIONID");
        assert_eq!(login.session.value, "abc123");
    }

    #[test]
    fn test_login_response_rejects_missing_session() {
        let body = serde_json::json!({ "loginInfo": {} });
        assert!(serde_json::from_value::<LoginResponse>(body).is_err());
    }

    #[test]
    fn test_debug_never_renders_secrets() {
        let basic = Credentials::basic("bob", "hunter2");
        let rendered = format!("{basic:?}");
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("hunter2"));

        let Credentials::Session(session) = Credentials::from_token("topsecret") else {
            panic!("expected a session credential");
        };
        assert!(!format!("{session:?}").contains("topsecret"));
    }

    #[test]
    fn test_credentials_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Credentials>();
    }
}
