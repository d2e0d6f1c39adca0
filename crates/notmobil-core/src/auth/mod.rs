//! Bearer credentials and the session-backed auth client.

pub mod jwt;

use std::fmt;
use std::sync::{Arc, Mutex};

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::parse_api_error;
use crate::util::{normalize_base_url, unix_timestamp_now};

/// Bearer token attached to every remote call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Credential")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Session storage error: {0}")]
    Storage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Pre-flight step that produces the credential for one sync pass.
#[allow(async_fn_in_trait)]
pub trait CredentialProvider {
    async fn resolve(&self) -> AuthResult<Credential>;
}

/// Always hands out the same token
#[derive(Debug, Clone)]
pub struct StaticCredential(Credential);

impl StaticCredential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Credential::new(token))
    }
}

impl CredentialProvider for StaticCredential {
    async fn resolve(&self) -> AuthResult<Credential> {
        if self.0.token().trim().is_empty() {
            return Err(AuthError::NotLoggedIn);
        }
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

impl AuthSession {
    /// Access token `exp` in Unix seconds
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        jwt::expires_at(&self.access_token)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        jwt::is_expired(&self.access_token, unix_timestamp_now())
    }

    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential::new(self.access_token.clone())
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Process-local session storage
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl SessionPersistence for MemorySessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let guard = self
            .session
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> AuthResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Client for the `/auth` endpoints of the note API.
#[derive(Debug, Clone)]
pub struct AuthClient<S: SessionPersistence> {
    base_url: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> AuthClient<S> {
    pub fn new(base_url: &str, timeout: std::time::Duration, store: S) -> AuthResult<Self> {
        let base_url = normalize_base_url(base_url).ok_or_else(|| {
            AuthError::InvalidConfiguration(
                "API URL must include http:// or https://".to_string(),
            )
        })?;

        Ok(Self {
            base_url,
            client: Client::builder().timeout(timeout).build()?,
            store,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn current_session(&self) -> AuthResult<Option<AuthSession>> {
        self.store.load_session()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Api("Email and password required".to_string()));
        }

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let request = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&payload);
        let response: LoginResponse = self.send(request).await?;

        let session = AuthSession {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
        };
        self.store.save_session(&session)?;
        tracing::info!(user = %session.user.email, "Logged in");
        Ok(session)
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh(&self) -> AuthResult<AuthSession> {
        let mut session = self.store.load_session()?.ok_or(AuthError::NotLoggedIn)?;
        if session.refresh_token.trim().is_empty() {
            return Err(AuthError::NotLoggedIn);
        }

        let payload = serde_json::json!({
            "refreshToken": session.refresh_token,
        });
        let request = self
            .client
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&payload);
        let response: RefreshResponse = self.send(request).await?;

        session.access_token = response.access_token;
        self.store.save_session(&session)?;
        tracing::debug!("Refreshed access token");
        Ok(session)
    }

    pub fn logout(&self) -> AuthResult<()> {
        self.store.clear_session()
    }

    /// Whether a stored access token exists and has not expired
    pub fn is_logged_in(&self) -> AuthResult<bool> {
        Ok(self
            .store
            .load_session()?
            .is_some_and(|session| !session.is_expired()))
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> AuthResult<T> {
        let response = request.header("Accept", "application/json").send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }
}

/// Credentials backed by the persisted login session.
///
/// An expired access token is refreshed once; anything else is an error.
#[derive(Debug, Clone)]
pub struct SessionCredentials<S: SessionPersistence> {
    client: AuthClient<S>,
}

impl<S: SessionPersistence> SessionCredentials<S> {
    #[must_use]
    pub const fn new(client: AuthClient<S>) -> Self {
        Self { client }
    }
}

impl<S: SessionPersistence> CredentialProvider for SessionCredentials<S> {
    async fn resolve(&self) -> AuthResult<Credential> {
        let session = self
            .client
            .current_session()?
            .ok_or(AuthError::NotLoggedIn)?;
        if !session.is_expired() {
            return Ok(session.credential());
        }

        tracing::debug!("Access token expired, refreshing");
        let refreshed = self.client.refresh().await?;
        if refreshed.is_expired() {
            return Err(AuthError::Api(
                "Refresh returned an expired access token".to_string(),
            ));
        }
        Ok(refreshed.credential())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}
