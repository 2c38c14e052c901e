//! Page route handlers.
//!
//! Every GET goes through the page controller, which picks the view and
//! applies the auth guard.

use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};

use pocketbook_core::SessionUser;

use crate::controller::{CONTACT_PATH, EDIT_PATH, LOGIN_PATH, PageController};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::router::Location;
use crate::state::AppState;

use super::reply_response;

async fn load(state: &AppState, location: Location, user: Option<&SessionUser>) -> Result<Response> {
    let reply = PageController::new(state)
        .handle_route(location, user)
        .await?;
    Ok(reply_response(reply))
}

/// Home page.
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    load(&state, Location::new("/"), user.as_ref()).await
}

/// Any single-segment page.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(page): Path<String>,
) -> Result<Response> {
    load(&state, Location::new(page), user.as_ref()).await
}

/// Login page.
pub async fn login(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    load(&state, Location::new(LOGIN_PATH), user.as_ref()).await
}

/// Contact page.
pub async fn contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response> {
    load(&state, Location::new(CONTACT_PATH), user.as_ref()).await
}

/// Edit page with a sub-parameter.
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(target): Path<String>,
) -> Result<Response> {
    load(&state, Location::new(EDIT_PATH).with_param(target), user.as_ref()).await
}

/// Paths with no route render the 404 page.
pub async fn fallback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Result<Response> {
    load(&state, Location::new(uri.path()), user.as_ref()).await
}
