use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn change_password_with_wrong_current_password_fails() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .post("/security/password")
        .authorization_bearer(&token)
        .json(&json!({
            "senhaAtual": "WrongPassword123!",
            "novaSenha": "replacement-1"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_PASSWORD");
}

#[tokio::test]
async fn change_password_swaps_the_credential() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .post("/security/password")
        .authorization_bearer(&token)
        .json(&json!({
            "senhaAtual": test_password(),
            "novaSenha": "replacement-1"
        }))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);

    let stale = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": &email, "senha": test_password() }))
        .await;
    stale.assert_status(StatusCode::UNAUTHORIZED);

    let fresh = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": &email, "senha": "replacement-1" }))
        .await;
    fresh.assert_status(StatusCode::OK);
}

// Change-password keeps existing sessions alive; only reset-password
// forces the global logout. Pinned so the asymmetry stays deliberate.
#[tokio::test]
async fn change_password_keeps_other_sessions_active() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let token_a = ctx.login(&email, test_password()).await;
    let token_b = ctx.login(&email, test_password()).await;

    let response = ctx
        .server
        .post("/security/password")
        .authorization_bearer(&token_a)
        .json(&json!({
            "senhaAtual": test_password(),
            "novaSenha": "replacement-1"
        }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    for token in [&token_a, &token_b] {
        let check = ctx
            .server
            .get("/security/status")
            .authorization_bearer(token)
            .await;
        check.assert_status(StatusCode::OK);
    }
}

// The 6-character floor applies to reset-password only.
#[tokio::test]
async fn change_password_does_not_enforce_minimum_length() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .post("/security/password")
        .authorization_bearer(&token)
        .json(&json!({
            "senhaAtual": test_password(),
            "novaSenha": "abc"
        }))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
}
