//! Integration tests for adding, editing and deleting contacts.

use axum::http::StatusCode;
use pocketbook_integration_tests::TestContext;
use pocketbook_web::storage::KeyValueStore;

const ADA: &str = "fullName=Ada+Lovelace&contactNumber=905-555-0199&emailAddress=ada%40example.com";

#[tokio::test]
async fn test_add_list_edit_delete() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let response = ctx.post_form("/edit/add", ADA, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/contact-list"));

    let keys = ctx.state.storage().keys().unwrap();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    assert!(key.starts_with("contact_"));

    let response = ctx.get("/contact-list", Some(&cookie)).await;
    assert!(response.body.contains("Ada Lovelace"));
    assert!(response.body.contains(&format!("/edit/{key}")));

    let response = ctx.get(&format!("/edit/{key}"), Some(&cookie)).await;
    assert!(response.body.contains("<title>Edit Contact</title>"));
    assert!(response.body.contains("905-555-0199"));

    let edited = "fullName=Ada+King&contactNumber=905-555-0199&emailAddress=ada%40example.com";
    let response = ctx
        .post_form(&format!("/edit/{key}"), edited, Some(&cookie))
        .await;
    assert_eq!(response.location.as_deref(), Some("/contact-list"));
    assert_eq!(
        ctx.state.storage().get(key).unwrap().as_deref(),
        Some("Ada King,905-555-0199,ada@example.com")
    );

    let response = ctx
        .post_form(&format!("/contact-list/{key}/delete"), "", Some(&cookie))
        .await;
    assert_eq!(response.location.as_deref(), Some("/contact-list"));
    assert!(ctx.state.storage().keys().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_invalid_contact_shows_errors() {
    let ctx = TestContext::new();
    let cookie = ctx.login().await;

    let response = ctx
        .post_form(
            "/edit/add",
            "fullName=R2D2&contactNumber=&emailAddress=nobody",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<title>Add Contact</title>"));
    assert!(response.body.contains("Full name must only contain letters and spaces."));
    assert!(response.body.contains("The field is required"));
    assert!(response.body.contains("Email address must be a valid email address"));
    assert!(ctx.state.storage().keys().unwrap().is_empty());
}

#[tokio::test]
async fn test_mutations_require_login() {
    let ctx = TestContext::new();
    ctx.state
        .storage()
        .set("contact_1", "Ada Lovelace,905-555-0199,ada@example.com")
        .unwrap();

    let response = ctx.post_form("/edit/add", ADA, None).await;
    assert_eq!(response.location.as_deref(), Some("/login"));

    let response = ctx.post_form("/contact-list/contact_1/delete", "", None).await;
    assert_eq!(response.location.as_deref(), Some("/login"));

    assert_eq!(ctx.state.storage().keys().unwrap(), vec!["contact_1".to_string()]);
}

#[tokio::test]
async fn test_delete_leaves_other_contacts() {
    let ctx = TestContext::new();
    let storage = ctx.state.storage();
    storage
        .set("contact_1", "Ada Lovelace,905-555-0199,ada@example.com")
        .unwrap();
    storage
        .set("contact_2", "Alan Turing,905-555-0100,alan@example.com")
        .unwrap();
    storage.set("theme", "dark").unwrap();
    let cookie = ctx.login().await;

    for key in ["contact_1", "theme"] {
        let response = ctx
            .post_form(&format!("/contact-list/{key}/delete"), "", Some(&cookie))
            .await;
        assert_eq!(response.location.as_deref(), Some("/contact-list"));
    }

    let response = ctx.get("/contact-list", Some(&cookie)).await;
    assert!(!response.body.contains("Ada Lovelace"));
    assert!(response.body.contains("Alan Turing"));
    assert_eq!(
        storage.keys().unwrap(),
        vec!["contact_2".to_string(), "theme".to_string()]
    );
}

#[tokio::test]
async fn test_feedback_form_subscribe() {
    let ctx = TestContext::new();

    let response = ctx.post_form("/contact", ADA, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Form successfully submitted"));
    assert!(ctx.state.storage().keys().unwrap().is_empty());

    let response = ctx
        .post_form("/contact", &format!("{ADA}&subscribe=on"), None)
        .await;
    assert!(response.body.contains("Form successfully submitted"));
    assert_eq!(ctx.state.storage().keys().unwrap().len(), 1);

    let response = ctx
        .post_form("/contact", "fullName=&contactNumber=1&emailAddress=x", None)
        .await;
    assert!(response.body.contains("Please fix errors before submitting."));
}
