use crate::modules::auth::interface::{AuthError, Result};
use crate::modules::auth::model::{TwoFactorPurpose, User};
use crate::modules::auth::service::send_code;
use crate::modules::security::schema::{
    SecurityStatusResponse, SessionResponse, SessionsResponse, TwoFactorRequestResponse,
};
use crate::services::{hashing, two_factor};
use crate::AppState;

async fn require_user(state: &AppState, user_id: &str) -> Result<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)
}

fn check_password(user: &User, password: &str) -> Result<()> {
    let valid =
        hashing::verify_password(password, &user.password_hash).map_err(AuthError::hashing)?;
    if !valid {
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

pub async fn security_status(state: &AppState, user_id: &str) -> Result<SecurityStatusResponse> {
    let user = require_user(state, user_id).await?;
    Ok(SecurityStatusResponse {
        two_factor_enabled: user.two_factor_enabled,
        two_factor_email: user.two_factor_email,
    })
}

/// Swaps the password after re-checking the current one. Existing sessions
/// stay live; only reset-password forces the global logout.
pub async fn change_password(
    state: &AppState,
    user_id: &str,
    current_password: &str,
    new_password: &str,
) -> Result<()> {
    let user = require_user(state, user_id).await?;
    check_password(&user, current_password)?;

    let password_hash = hashing::hash_password(new_password).map_err(AuthError::hashing)?;
    state.users.update_password(user_id, &password_hash).await
}

pub async fn request_two_factor_enable(
    state: &AppState,
    user_id: &str,
) -> Result<TwoFactorRequestResponse> {
    let user = require_user(state, user_id).await?;

    if user.two_factor_enabled {
        return Err(AuthError::TwoFactorAlreadyEnabled);
    }

    let challenge = two_factor::issue(
        state.two_factor_tokens.as_ref(),
        user_id,
        TwoFactorPurpose::Enable,
    )
    .await?;
    send_code(state, &user.email, TwoFactorPurpose::Enable, &challenge.code).await;

    Ok(TwoFactorRequestResponse {
        token_id: challenge.token_id,
        email: user.email,
    })
}

pub async fn confirm_two_factor_enable(
    state: &AppState,
    user_id: &str,
    token_id: &str,
    code: &str,
) -> Result<()> {
    let token = two_factor::verify(
        state.two_factor_tokens.as_ref(),
        token_id,
        code,
        TwoFactorPurpose::Enable,
    )
    .await?;

    // A guessed token id belonging to someone else must read as a bad code.
    if token.user_id != user_id {
        return Err(AuthError::InvalidTwoFactorCode);
    }

    two_factor::consume(state.two_factor_tokens.as_ref(), &token.id).await?;

    state.users.set_two_factor(user_id, true).await
}

pub async fn disable_two_factor(state: &AppState, user_id: &str, password: &str) -> Result<()> {
    let user = require_user(state, user_id).await?;
    check_password(&user, password)?;

    state.users.set_two_factor(user_id, false).await?;

    // Stale challenges from any flow would otherwise survive a disable and
    // re-enable cycle.
    state.two_factor_tokens.delete_all_for_user(user_id).await?;

    Ok(())
}

pub async fn list_sessions(
    state: &AppState,
    user_id: &str,
    current_session_id: &str,
) -> Result<SessionsResponse> {
    let sessions = state.sessions.list_active_for_user(user_id).await?;

    Ok(SessionsResponse {
        current_session_id: current_session_id.to_string(),
        sessions: sessions.iter().map(SessionResponse::from).collect(),
    })
}

/// Revokes one owned, still-active session. Unknown ids, revoked ids and
/// other users' ids all answer `SessionNotFound`.
pub async fn revoke_session(state: &AppState, user_id: &str, session_id: &str) -> Result<()> {
    state
        .sessions
        .find_active_owned(user_id, session_id)
        .await?
        .ok_or(AuthError::SessionNotFound)?;

    state.sessions.revoke(session_id).await
}

pub async fn revoke_other_sessions(
    state: &AppState,
    user_id: &str,
    current_session_id: &str,
) -> Result<()> {
    state
        .sessions
        .revoke_others(user_id, current_session_id)
        .await
}
