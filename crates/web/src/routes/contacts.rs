//! Contact form route handlers.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;
use tower_sessions::Session;

use pocketbook_core::ContactForm;

use crate::controller::{Command, PageController};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::state::AppState;

use super::respond;

/// Feedback form on the contact page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email_address: String,
    /// Present only when the checkbox is ticked.
    #[serde(default)]
    pub subscribe: Option<String>,
}

/// Submit the feedback form.
pub async fn feedback(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Form(form): Form<FeedbackForm>,
) -> Result<Response> {
    let command = Command::SubmitFeedback {
        subscribe: form.subscribe.is_some(),
        form: ContactForm {
            full_name: form.full_name,
            contact_number: form.contact_number,
            email_address: form.email_address,
        },
    };
    let outcome = PageController::new(&state)
        .dispatch(command, user.as_ref())
        .await?;

    respond(&session, outcome).await
}

/// Add or save a contact.
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(target): Path<String>,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let outcome = PageController::new(&state)
        .dispatch(Command::SaveContact { target, form }, user.as_ref())
        .await?;

    respond(&session, outcome).await
}

/// Delete a contact.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(key): Path<String>,
) -> Result<Response> {
    let outcome = PageController::new(&state)
        .dispatch(Command::DeleteContact { key }, user.as_ref())
        .await?;

    respond(&session, outcome).await
}
