//! Session user extractor and helpers.
//!
//! Whether a page needs a signed-in user is decided by the page controller,
//! so handlers only need to know who (if anyone) is signed in.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use pocketbook_core::SessionUser;

/// Session key holding the signed-in user.
pub const USER_KEY: &str = "user";

/// Extractor for the signed-in user, if any.
///
/// Never rejects. A missing session layer or an unreadable session record
/// counts as signed out.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<SessionUser>(USER_KEY)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Unreadable session user");
                    None
                }),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the signed-in user in the session.
///
/// Rotates the session id first so a session id issued before login cannot
/// be reused afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await
}

/// Remove the signed-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<SessionUser>(USER_KEY).await?;
    Ok(())
}
