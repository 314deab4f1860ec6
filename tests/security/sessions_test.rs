use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn list_shows_the_current_session() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], body["currentSessionId"]);
}

#[tokio::test]
async fn list_orders_by_most_recent_use() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let _token_phone = ctx.login(&email, test_password()).await;
    let token_tablet = ctx.login(&email, test_password()).await;

    // The listing request itself touches the calling session, so it leads.
    let body: serde_json::Value = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token_tablet)
        .await
        .json();

    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["id"], body["currentSessionId"]);
}

#[tokio::test]
async fn revoke_kills_the_target_session_only() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let token_a = ctx.login(&email, test_password()).await;
    let token_b = ctx.login(&email, test_password()).await;

    // Find B's id from A's viewpoint: the session that is not current.
    let body: serde_json::Value = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token_a)
        .await
        .json();
    let current = body["currentSessionId"].as_str().unwrap();
    let other_id = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .find(|id| *id != current)
        .unwrap()
        .to_string();

    let response = ctx
        .server
        .post(&format!("/security/sessions/revoke/{}", other_id))
        .authorization_bearer(&token_a)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let revoked = ctx
        .server
        .get("/security/status")
        .authorization_bearer(&token_b)
        .await;
    revoked.assert_status(StatusCode::UNAUTHORIZED);

    let survivor = ctx
        .server
        .get("/security/status")
        .authorization_bearer(&token_a)
        .await;
    survivor.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn revoke_unknown_session_returns_not_found() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register_and_login(&email).await;

    let response = ctx
        .server
        .post("/security/sessions/revoke/no-such-session")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

// Another user's session id must be indistinguishable from a nonexistent
// one.
#[tokio::test]
async fn revoke_cannot_touch_another_users_session() {
    let ctx = TestContext::new().await;

    let email_a = test_email();
    let token_a = ctx.register_and_login(&email_a).await;

    let email_b = test_email();
    let token_b = ctx.register_and_login(&email_b).await;

    let body: serde_json::Value = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token_b)
        .await
        .json();
    let b_session = body["currentSessionId"].as_str().unwrap();

    let response = ctx
        .server
        .post(&format!("/security/sessions/revoke/{}", b_session))
        .authorization_bearer(&token_a)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let payload: serde_json::Value = response.json();
    assert_eq!(payload["code"], "SESSION_NOT_FOUND");

    // B is untouched.
    let check = ctx
        .server
        .get("/security/status")
        .authorization_bearer(&token_b)
        .await;
    check.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn revoking_twice_returns_not_found_the_second_time() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let token_a = ctx.login(&email, test_password()).await;
    let token_b = ctx.login(&email, test_password()).await;

    let body: serde_json::Value = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token_a)
        .await
        .json();
    let current = body["currentSessionId"].as_str().unwrap();
    let other_id = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .find(|id| *id != current)
        .unwrap()
        .to_string();

    let first = ctx
        .server
        .post(&format!("/security/sessions/revoke/{}", other_id))
        .authorization_bearer(&token_a)
        .await;
    first.assert_status(StatusCode::NO_CONTENT);

    let second = ctx
        .server
        .post(&format!("/security/sessions/revoke/{}", other_id))
        .authorization_bearer(&token_a)
        .await;
    second.assert_status(StatusCode::NOT_FOUND);

    drop(token_b);
}

#[tokio::test]
async fn revoke_others_leaves_only_the_calling_session() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await;

    let token_a = ctx.login(&email, test_password()).await;
    let token_b = ctx.login(&email, test_password()).await;
    let token_c = ctx.login(&email, test_password()).await;

    let response = ctx
        .server
        .post("/security/sessions/revoke-others")
        .authorization_bearer(&token_a)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let body: serde_json::Value = ctx
        .server
        .get("/security/sessions")
        .authorization_bearer(&token_a)
        .await
        .json();
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], body["currentSessionId"]);

    for stale in [&token_b, &token_c] {
        let check = ctx
            .server
            .get("/security/status")
            .authorization_bearer(stale)
            .await;
        check.assert_status(StatusCode::UNAUTHORIZED);
        let payload: serde_json::Value = check.json();
        assert_eq!(payload["code"], "SESSION_EXPIRED");
    }
}
