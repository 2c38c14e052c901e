//! Authentication service.
//!
//! Checks a username and password against the static users resource:
//!
//! ```json
//! { "users": [{ "Username": "...", "Password": "...", "DisplayName": "...", "EmailAddress": "..." }] }
//! ```
//!
//! The resource is re-read on every login attempt, so edits to it apply
//! without a restart. Matching is an exact, case-sensitive comparison of both
//! fields; the first match wins.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use pocketbook_core::SessionUser;

use crate::config::UsersSource;

/// One entry of the users resource.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Deserialize)]
#[serde(from = "RawUserRecord")]
pub struct UserRecord {
    pub username: String,
    pub password: SecretString,
    pub display_name: String,
    pub email_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawUserRecord {
    username: String,
    password: String,
    display_name: String,
    email_address: String,
}

impl From<RawUserRecord> for UserRecord {
    fn from(raw: RawUserRecord) -> Self {
        Self {
            username: raw.username,
            password: SecretString::from(raw.password),
            display_name: raw.display_name,
            email_address: raw.email_address,
        }
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .field("email_address", &self.email_address)
            .finish()
    }
}

impl UserRecord {
    /// Whether this record matches the submitted credentials.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username
            && constant_time_eq(self.password.expose_secret().as_bytes(), password.as_bytes())
    }

    /// The identity stored in the session after login. Never includes the password.
    #[must_use]
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            display_name: self.display_name.clone(),
            email_address: self.email_address.clone(),
            username: self.username.clone(),
        }
    }
}

/// The users resource document.
#[derive(Debug, Deserialize)]
pub struct UsersDocument {
    pub users: Vec<UserRecord>,
}

impl UsersDocument {
    /// Parse a users document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or `users` is missing or not an array.
    pub fn parse(json: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Linear scan for the first user matching both fields.
    #[must_use]
    pub fn find(&self, username: &str, password: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.matches(username, password))
    }
}

/// Loads the users resource and checks credentials.
#[derive(Debug, Clone)]
pub struct AuthService {
    source: UsersSource,
    client: reqwest::Client,
}

impl AuthService {
    /// Create an authentication service reading from `source`.
    #[must_use]
    pub fn new(source: UsersSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch and parse the users resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be read or parsed.
    pub async fn load(&self) -> Result<UsersDocument, AuthError> {
        let json = match &self.source {
            UsersSource::File(path) => tokio::fs::read_to_string(path).await?,
            UsersSource::Url(url) => {
                self.client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
        };

        UsersDocument::parse(&json)
    }

    /// Check credentials and return the session identity on success.
    ///
    /// Both fields are trimmed before comparison.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when no user matches, or a
    /// resource error if the users resource cannot be loaded.
    #[instrument(skip(self, password), fields(source = %self.source))]
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let document = self.load().await?;

        let user = document
            .find(username.trim(), password.trim())
            .ok_or(AuthError::InvalidCredentials)?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(user.session_user())
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
