use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::modules::auth::interface::AuthError;
use crate::AppState;

/// Identity established by the request gate; downstream handlers trust it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub session_id: String,
}

/// Two independent checks gate every authenticated route: the token
/// signature proves issuance, the session row proves the login is still
/// live. A revoked session rejects the request even while the signature
/// stays valid for the rest of its 7-day window.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::TokenMissing)?;

    let token = header_value.strip_prefix("Bearer ").unwrap_or("").trim();
    if token.is_empty() {
        return Err(AuthError::TokenMissing);
    }

    let claims = state.jwt.verify(token).map_err(|_| AuthError::TokenInvalid)?;

    let session = state
        .sessions
        .find_by_id(&claims.sid)
        .await?
        .filter(|session| session.is_active())
        .ok_or(AuthError::SessionExpired)?;

    // Best effort: a failed last-access write must not reject the request.
    if let Err(err) = state.sessions.touch(&session.id).await {
        tracing::warn!(session_id = %session.id, error = %err, "failed to touch session");
    }

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        session_id: claims.sid,
    });

    Ok(next.run(request).await)
}
