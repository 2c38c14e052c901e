//! Integration tests for login, logout and protected pages.

use axum::http::StatusCode;
use pocketbook_integration_tests::TestContext;

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let ctx = TestContext::new();

    for path in ["/contact-list", "/edit", "/edit/add", "/edit/contact_1"] {
        let response = ctx.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location.as_deref(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn test_login_failure_shows_error() {
    let ctx = TestContext::new();
    let response = ctx
        .post_form("/login", "username=jdoe&password=wrong", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .body
            .contains("Invalid username or password. Please try again")
    );
    assert!(response.body.contains(r#"value="jdoe""#));

    let response = ctx.get("/contact-list", response.cookie.as_deref()).await;
    assert_eq!(response.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_login_opens_contact_list() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;
    assert!(cookie.starts_with("pocketbook_session="));

    let response = ctx.get("/contact-list", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<title>Contact List</title>"));
    assert!(response.body.contains("Jane Doe"));
}

#[tokio::test]
async fn test_login_page_redirects_when_signed_in() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let response = ctx.get("/login", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/contact-list"));
}

#[tokio::test]
async fn test_logout_ends_access() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let response = ctx.post_form("/logout", "", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let response = ctx.get("/contact-list", Some(&cookie)).await;
    assert_eq!(response.location.as_deref(), Some("/login"));
}
