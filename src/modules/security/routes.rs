use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::services::auth_middleware::require_auth;
use crate::AppState;

pub fn security_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(controller::status))
        .route("/password", post(controller::update_password))
        .route("/2fa/request", post(controller::request_two_factor))
        .route("/2fa/confirm", post(controller::confirm_two_factor))
        .route("/2fa/disable", post(controller::disable_two_factor))
        .route("/sessions", get(controller::sessions))
        .route("/sessions/revoke/{id}", post(controller::revoke_session))
        .route(
            "/sessions/revoke-others",
            post(controller::revoke_other_sessions),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
