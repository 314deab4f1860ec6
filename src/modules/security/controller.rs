use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::modules::auth::interface::AuthError;
use crate::modules::security::schema::{
    ChangePasswordRequest, SecurityStatusResponse, SessionsResponse, TwoFactorConfirmRequest,
    TwoFactorDisableRequest, TwoFactorRequestResponse,
};
use crate::modules::security::service;
use crate::services::auth_middleware::AuthContext;
use crate::AppState;

pub async fn status(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SecurityStatusResponse>, AuthError> {
    let response = service::security_status(&state, &auth.user_id).await?;
    Ok(Json(response))
}

pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    service::change_password(&state, &auth.user_id, &req.current_password, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn request_two_factor(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TwoFactorRequestResponse>, AuthError> {
    let response = service::request_two_factor_enable(&state, &auth.user_id).await?;
    Ok(Json(response))
}

pub async fn confirm_two_factor(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TwoFactorConfirmRequest>,
) -> Result<StatusCode, AuthError> {
    service::confirm_two_factor_enable(&state, &auth.user_id, &req.token_id, &req.code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn disable_two_factor(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TwoFactorDisableRequest>,
) -> Result<StatusCode, AuthError> {
    service::disable_two_factor(&state, &auth.user_id, &req.current_password).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SessionsResponse>, AuthError> {
    let response = service::list_sessions(&state, &auth.user_id, &auth.session_id).await?;
    Ok(Json(response))
}

pub async fn revoke_session(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AuthError> {
    service::revoke_session(&state, &auth.user_id, &session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_other_sessions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AuthError> {
    service::revoke_other_sessions(&state, &auth.user_id, &auth.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
