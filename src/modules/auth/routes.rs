use axum::{middleware, routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::services::auth_middleware::require_auth;
use crate::AppState;

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Logout acts on the session inside the verified bearer token, so it
    // sits behind the gate even though it lives under /auth.
    let protected = Router::new()
        .route("/logout", post(controller::logout))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/verify-2fa", post(controller::verify_two_factor))
        .route("/forgot-password", post(controller::forgot_password))
        .route("/reset-password", post(controller::reset_password))
        .merge(protected)
}
