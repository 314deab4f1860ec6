use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn register_returns_public_profile() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "nome": "Alice Example",
            "email": &email,
            "senha": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(body.get("id").is_some());
    assert_eq!(body["nome"], "Alice Example");
    assert_eq!(body["email"], email);
    assert!(body["remuneracao"].is_null());
    assert!(body["fotoPerfil"].is_null());

    // The hash stays server-side.
    assert!(body.get("senha").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn register_with_taken_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "nome": "Second User",
            "email": &email,
            "senha": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn register_with_empty_fields_returns_required_fields() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({ "nome": "", "email": "", "senha": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "REQUIRED_FIELDS");
}

#[tokio::test]
async fn register_with_missing_field_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({ "email": test_email(), "senha": test_password() }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_with_malformed_email_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "nome": "Alice Example",
            "email": "not-an-email",
            "senha": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// Only reset-password enforces the 6-character floor; registration accepts
// shorter passwords. Pinned here so the asymmetry is a decision, not an
// accident.
#[tokio::test]
async fn register_does_not_enforce_minimum_password_length() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "nome": "Short Password",
            "email": test_email(),
            "senha": "abc"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
}
