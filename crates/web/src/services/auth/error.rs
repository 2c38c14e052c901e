//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user matched the username and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The users file could not be read.
    #[error("failed to read users resource: {0}")]
    Io(#[from] std::io::Error),

    /// The users URL could not be fetched.
    #[error("failed to fetch users resource: {0}")]
    Http(#[from] reqwest::Error),

    /// The users resource is not a valid users document.
    #[error("invalid users resource: {0}")]
    Parse(#[from] serde_json::Error),
}
