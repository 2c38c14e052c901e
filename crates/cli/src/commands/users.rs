//! Users resource commands.
//!
//! # Usage
//!
//! ```bash
//! # Check the configured users resource
//! pocketbook users check
//!
//! # Check a specific file or URL
//! pocketbook users check crates/web/data/users.json
//! ```
//!
//! # Environment Variables
//!
//! - `POCKETBOOK_USERS` - Users resource used when no path is given

use std::collections::HashSet;

use pocketbook_web::config::{DEFAULT_USERS_PATH, UsersSource};
use pocketbook_web::services::{AuthError, AuthService, UsersDocument};
use thiserror::Error;

/// Errors that can occur while checking a users resource.
#[derive(Debug, Error)]
pub enum UsersError {
    /// The URL given for the resource does not parse.
    #[error("Invalid users URL: {0}")]
    InvalidUrl(String),

    /// The resource could not be loaded or parsed.
    #[error("Users resource error: {0}")]
    Load(#[from] AuthError),

    /// A field that login relies on is empty.
    #[error("User #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
}

/// Load a users resource and report what login will see.
///
/// Duplicate usernames are reported as warnings; only the first match is
/// ever used at login.
///
/// # Errors
///
/// Returns an error if the resource cannot be loaded or a user has an empty
/// username or display name.
pub async fn check(location: Option<String>) -> Result<UsersDocument, UsersError> {
    dotenvy::dotenv().ok();

    let location = location
        .or_else(|| std::env::var("POCKETBOOK_USERS").ok())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_USERS_PATH.to_string());
    let source =
        UsersSource::parse(&location).map_err(|e| UsersError::InvalidUrl(e.to_string()))?;

    tracing::info!("Loading users from {}", source);
    let document = AuthService::new(source).load().await?;

    let mut seen: HashSet<String> = HashSet::new();
    for (index, user) in document.users.iter().enumerate() {
        let index = index + 1;
        if user.username.trim().is_empty() {
            return Err(UsersError::EmptyField {
                index,
                field: "Username",
            });
        }
        if user.display_name.trim().is_empty() {
            return Err(UsersError::EmptyField {
                index,
                field: "DisplayName",
            });
        }
        if !seen.insert(user.username.clone()) {
            tracing::warn!("Duplicate username {}, only the first entry can log in", user.username);
        }
        tracing::info!("{}. {} <{}> as {}", index, user.display_name, user.email_address, user.username);
    }

    tracing::info!("{} user(s) OK", document.users.len());
    Ok(document)
}
