use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::modules::auth::interface::AuthError;
use crate::modules::auth::schema::{
    AuthenticatedResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    LoginResponse, RegisterRequest, ResetPasswordRequest, UserResponse, VerifyTwoFactorRequest,
};
use crate::modules::auth::service::{self, SessionMeta};
use crate::services::auth_middleware::AuthContext;
use crate::AppState;

/// Device label preference: explicit `deviceName` from the client, else the
/// User-Agent header. IP comes from the proxy header when present.
fn session_meta(headers: &HeaderMap, device_name: Option<&str>) -> SessionMeta {
    let user_agent = device_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            headers
                .get(header::USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        });

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    SessionMeta { user_agent, ip }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    if req.validate().is_err() {
        return Err(AuthError::RequiredFields);
    }

    let user = service::register(&state, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let meta = session_meta(&headers, req.device_name.as_deref());
    let response = service::login(&state, req, meta).await?;
    Ok(Json(response))
}

pub async fn verify_two_factor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<VerifyTwoFactorRequest>,
) -> Result<Json<AuthenticatedResponse>, AuthError> {
    let meta = session_meta(&headers, req.device_name.as_deref());
    let response = service::verify_two_factor_login(&state, req, meta).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AuthError> {
    service::logout(&state, &auth.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AuthError> {
    let response = service::forgot_password(&state, &req.email).await?;
    Ok(Json(response))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AuthError> {
    service::reset_password(&state, req).await?;
    Ok(StatusCode::NO_CONTENT)
}
