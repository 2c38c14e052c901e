//! Integration tests for Pocketbook.
//!
//! The tests drive the full axum application in process with
//! `tower::ServiceExt::oneshot`, so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocketbook-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pages` - Routing, titles and the 404 page
//! - `auth_flow` - Login, logout and protected pages
//! - `contacts_flow` - Adding, editing and deleting contacts over HTTP

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use pocketbook_web::config::{AppConfig, UsersSource};
use pocketbook_web::state::AppState;
use pocketbook_web::storage::MemoryStorage;
use tower::ServiceExt;

/// Users resource shared by the tests.
pub const USERS_JSON: &str = r#"{
    "users": [
        { "Username": "jdoe", "Password": "hunter2", "DisplayName": "Jane Doe", "EmailAddress": "jane@example.com" }
    ]
}"#;

/// The application under test plus the handles tests need to inspect it.
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    users_path: PathBuf,
}

/// A response with its body read into a string.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl TestContext {
    /// Build the application over an in-memory store and a temporary users file.
    pub fn new() -> Self {
        let users_path = std::env::temp_dir().join(format!(
            "pocketbook-it-users-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&users_path, USERS_JSON).unwrap();

        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            users: UsersSource::File(users_path.clone()),
            store_path: None,
            weather: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        let app = pocketbook_web::routes::app(state.clone());

        Self {
            app,
            state,
            users_path,
        }
    }

    /// Send a GET, with the session cookie when given.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::get(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    /// Send a url-encoded form POST, with the session cookie when given.
    pub async fn post_form(&self, path: &str, form: &str, cookie: Option<&str>) -> TestResponse {
        let mut request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_owned())).unwrap())
            .await
    }

    /// Log in as `jdoe` and return the session cookie.
    pub async fn login(&self) -> String {
        let response = self
            .post_form("/login", "username=jdoe&password=hunter2", None)
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location.as_deref(), Some("/contact-list"));
        response.cookie.unwrap()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        read(response).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.users_path);
    }
}

async fn read(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let header_str = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let location = header_str(header::LOCATION);
    // Keep only `name=value`, as a browser would send it back
    let cookie = header_str(header::SET_COOKIE)
        .and_then(|value| value.split(';').next().map(str::to_owned));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        location,
        cookie,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
