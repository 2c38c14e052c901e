//! Authentication route handlers.

use axum::{Form, extract::State, response::Response};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use crate::controller::{Command, PageController};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::state::AppState;

use super::respond;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let command = Command::Login {
        username: form.username,
        password: SecretString::from(form.password),
    };
    let outcome = PageController::new(&state)
        .dispatch(command, user.as_ref())
        .await?;

    respond(&session, outcome).await
}

/// Handle logout.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    let outcome = PageController::new(&state)
        .dispatch(Command::Logout, user.as_ref())
        .await?;

    respond(&session, outcome).await
}
