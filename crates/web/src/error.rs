//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::contacts::ContactStoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contact store operation failed.
    #[error("Contact store error: {0}")]
    Contacts(#[from] ContactStoreError),

    /// Reading or writing the visitor session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Contacts(ContactStoreError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Contacts(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Contacts(ContactStoreError::Invalid(_)) => "Contact failed validation",
            Self::Contacts(_) | Self::Session(_) => "Internal server error",
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(username: &str, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use pocketbook_core::ContactError;

    use super::*;
    use crate::storage::StorageError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Contacts(ContactStoreError::Storage(StorageError::Poisoned));
        assert_eq!(
            err.to_string(),
            "Contact store error: storage error: storage lock poisoned"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Contacts(ContactStoreError::Storage(
                StorageError::Poisoned
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Contacts(ContactStoreError::Contact(
                ContactError::EmptyField("fullName")
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
