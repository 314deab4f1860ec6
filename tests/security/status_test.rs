use axum::http::StatusCode;

use crate::common::{test_email, TestContext};

#[tokio::test]
async fn status_requires_a_bearer_token() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/security/status").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fresh_account_has_two_factor_off() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .get("/security/status")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["twoFactorEnabled"], false);
    assert_eq!(body["twoFactorEmail"], false);
}

#[tokio::test]
async fn status_reflects_enabled_two_factor() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;
    ctx.enable_two_factor(&email, &token).await;

    let response = ctx
        .server
        .get("/security/status")
        .authorization_bearer(&token)
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["twoFactorEnabled"], true);
    assert_eq!(body["twoFactorEmail"], true);
}
