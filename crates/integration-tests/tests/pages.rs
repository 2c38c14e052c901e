//! Integration tests for routing and page titles.

use axum::http::StatusCode;
use pocketbook_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let response = ctx.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_public_pages_render_with_titles() {
    let ctx = TestContext::new();

    for (path, title) in [
        ("/", "Home Page"),
        ("/home", "Home Page"),
        ("/about", "About Page"),
        ("/products", "Our Products"),
        ("/services", "Our Services"),
        ("/contact", "Contact"),
        ("/login", "Login Page"),
        ("/register", "Register"),
    ] {
        let response = ctx.get(path, None).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(
            response.body.contains(&format!("<title>{title}</title>")),
            "{path} should be titled {title}"
        );
    }
}

#[tokio::test]
async fn test_unmapped_paths_render_not_found() {
    let ctx = TestContext::new();

    for path in ["/nowhere", "/contact-list/extra/segments"] {
        let response = ctx.get(path, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
        assert!(response.body.contains("<title>Page Not Found</title>"));
    }
}

#[tokio::test]
async fn test_home_without_weather_key() {
    let ctx = TestContext::new();
    let response = ctx.get("/", None).await;

    assert!(response.body.contains("About Us"));
    assert!(response.body.contains("Unable to fetch weather data at this time"));
}

#[tokio::test]
async fn test_request_id_header() {
    let ctx = TestContext::new();
    let request = axum::http::Request::get("/health")
        .header("x-request-id", "it-1")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "it-1");
}
