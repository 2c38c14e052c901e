//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//!
//! # Pages (rendered through the page controller)
//! GET  /                             - Home page
//! GET  /{page}                       - Any page in the route table, else 404
//! GET  /edit/{target}                - Edit page; `add` or a contact key
//!
//! # Auth
//! POST /login                        - Login action
//! POST /logout                       - Logout action
//!
//! # Contacts
//! POST /contact                      - Feedback form
//! POST /edit/{target}                - Add (`add`) or save a contact
//! POST /contact-list/{key}/delete    - Delete a contact
//! ```
//!
//! Every other path renders the 404 page.

pub mod auth;
pub mod contacts;
pub mod pages;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::Session;
use tracing::Span;

use crate::controller::{Outcome, Reply, SessionUpdate};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    clear_session_user, create_session_layer, request_id_middleware, set_session_user,
};
use crate::render::render_page;
use crate::router::View;
use crate::state::AppState;

/// Create all page and form routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/{page}", get(pages::show))
        .route("/edit/{target}", get(pages::edit).post(contacts::save))
        .route("/login", get(pages::login).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/contact", get(pages::contact).post(contacts::feedback))
        .route("/contact-list/{key}/delete", post(contacts::delete))
        .fallback(pages::fallback)
}

/// Build the application with its middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Apply a command outcome to the session and build the response.
async fn respond(session: &Session, outcome: Outcome) -> Result<Response> {
    match outcome.session {
        Some(SessionUpdate::SignIn(user)) => {
            set_session_user(session, &user).await?;
            set_sentry_user(&user.username, &user.email_address);
        }
        Some(SessionUpdate::SignOut) => {
            clear_session_user(session).await?;
            clear_sentry_user();
        }
        None => {}
    }

    Ok(reply_response(outcome.reply))
}

/// Turn a controller reply into a response.
///
/// A page that fails to render answers `204 No Content`, which leaves the
/// browser on the page it is showing.
fn reply_response(reply: Reply) -> Response {
    match reply {
        Reply::Redirect(to) => Redirect::to(&to.href()).into_response(),
        Reply::Page(page) => match render_page(&page) {
            Ok(html) => {
                let status = if page.view() == View::NotFound {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                };
                (status, Html(html)).into_response()
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    template = page.view().template(),
                    "Failed to render template"
                );
                StatusCode::NO_CONTENT.into_response()
            }
        },
    }
}
