use chrono::Utc;
use uuid::Uuid;

use crate::modules::auth::interface::{AuthError, Result};
use crate::modules::auth::model::{Session, TwoFactorPurpose, User};
use crate::modules::auth::schema::{
    AuthenticatedResponse, ForgotPasswordResponse, LoginRequest, LoginResponse,
    RegisterRequest, ResetPasswordRequest, TwoFactorChallengeResponse, UserResponse,
    VerifyTwoFactorRequest,
};
use crate::services::{hashing, two_factor};
use crate::AppState;

/// Device details recorded on the session at login time.
pub struct SessionMeta {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// `jo***@example.com`: enough for the caller to recognize the inbox the
/// code went to, not enough to harvest the address.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((name, domain)) => {
            let visible: String = name.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => email.to_string(),
    }
}

async fn create_session(state: &AppState, user_id: &str, meta: &SessionMeta) -> Result<Session> {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        user_agent: meta.user_agent.clone(),
        ip: meta.ip.clone(),
        created_at: now,
        last_access_at: now,
        revoked_at: None,
    };
    state.sessions.create(&session).await?;
    Ok(session)
}

fn sign_token(state: &AppState, user_id: &str, session_id: &str) -> Result<String> {
    state
        .jwt
        .sign(user_id, session_id)
        .map_err(|err| AuthError::Token(err.to_string()))
}

/// Fire-and-forget delivery: the challenge stands whether or not the email
/// goes out.
pub(crate) async fn send_code(state: &AppState, email: &str, purpose: TwoFactorPurpose, code: &str) {
    if let Err(err) = state.mailer.send_two_factor_code(email, purpose, code).await {
        tracing::warn!(
            recipient = email,
            purpose = purpose.as_str(),
            error = %err,
            "failed to deliver two-factor code"
        );
    }
}

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<UserResponse> {
    let display_name = req.display_name.trim();
    let email = req.email.trim();

    if display_name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AuthError::RequiredFields);
    }

    if state.users.find_by_email(email).await?.is_some() {
        return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = hashing::hash_password(&req.password).map_err(AuthError::hashing)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        display_name: display_name.to_string(),
        email: email.to_string(),
        password_hash,
        monthly_income: None,
        photo_url: None,
        two_factor_enabled: false,
        two_factor_email: false,
        push_token: None,
        created_at: now,
        updated_at: now,
    };
    state.users.create(&user).await?;

    Ok(UserResponse::from(&user))
}

pub async fn login(state: &AppState, req: LoginRequest, meta: SessionMeta) -> Result<LoginResponse> {
    // Unknown email and wrong password answer identically so the endpoint
    // cannot be used to enumerate accounts.
    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid =
        hashing::verify_password(&req.password, &user.password_hash).map_err(AuthError::hashing)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    if user.two_factor_enabled {
        let challenge = two_factor::issue(
            state.two_factor_tokens.as_ref(),
            &user.id,
            TwoFactorPurpose::Login,
        )
        .await?;
        send_code(state, &user.email, TwoFactorPurpose::Login, &challenge.code).await;

        return Ok(LoginResponse::TwoFactorChallenge(TwoFactorChallengeResponse {
            requires_two_factor: true,
            two_factor_token_id: challenge.token_id,
            email: mask_email(&user.email),
        }));
    }

    let session = create_session(state, &user.id, &meta).await?;
    let token = sign_token(state, &user.id, &session.id)?;

    Ok(LoginResponse::Authenticated(AuthenticatedResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

pub async fn verify_two_factor_login(
    state: &AppState,
    req: VerifyTwoFactorRequest,
    meta: SessionMeta,
) -> Result<AuthenticatedResponse> {
    let token = two_factor::verify(
        state.two_factor_tokens.as_ref(),
        &req.token_id,
        &req.code,
        TwoFactorPurpose::Login,
    )
    .await?;

    let user = state
        .users
        .find_by_id(&token.user_id)
        .await?
        .ok_or(AuthError::InvalidTwoFactorCode)?;

    // 2FA may have been switched off between password check and code entry.
    if !user.two_factor_enabled {
        return Err(AuthError::TwoFactorDisabled);
    }

    two_factor::consume(state.two_factor_tokens.as_ref(), &token.id).await?;

    let session = create_session(state, &user.id, &meta).await?;
    let jwt_token = sign_token(state, &user.id, &session.id)?;

    Ok(AuthenticatedResponse {
        token: jwt_token,
        user: UserResponse::from(&user),
    })
}

/// Revokes only the session named by the verified bearer token.
pub async fn logout(state: &AppState, session_id: &str) -> Result<()> {
    state.sessions.revoke(session_id).await
}

pub async fn forgot_password(state: &AppState, email: &str) -> Result<ForgotPasswordResponse> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::EmailRequired);
    }

    let user = match state.users.find_by_email(email).await? {
        Some(user) => user,
        // Success-shaped answer with a null token: whether the address is
        // registered stays private.
        None => {
            return Ok(ForgotPasswordResponse {
                token_id: None,
                email: mask_email(email),
            })
        }
    };

    let challenge = two_factor::issue(
        state.two_factor_tokens.as_ref(),
        &user.id,
        TwoFactorPurpose::Reset,
    )
    .await?;
    send_code(state, &user.email, TwoFactorPurpose::Reset, &challenge.code).await;

    Ok(ForgotPasswordResponse {
        token_id: Some(challenge.token_id),
        email: mask_email(&user.email),
    })
}

pub async fn reset_password(state: &AppState, req: ResetPasswordRequest) -> Result<()> {
    if req.token_id.is_empty() || req.code.is_empty() || req.new_password.is_empty() {
        return Err(AuthError::ResetFieldsRequired);
    }

    if req.new_password.chars().count() < 6 {
        return Err(AuthError::PasswordTooShort);
    }

    let token = two_factor::verify(
        state.two_factor_tokens.as_ref(),
        &req.token_id,
        &req.code,
        TwoFactorPurpose::Reset,
    )
    .await?;

    let password_hash = hashing::hash_password(&req.new_password).map_err(AuthError::hashing)?;
    state
        .users
        .update_password(&token.user_id, &password_hash)
        .await?;

    state
        .two_factor_tokens
        .delete_for_user_purpose(&token.user_id, TwoFactorPurpose::Reset)
        .await?;

    // Credential changed: force a fresh login everywhere, including on the
    // device that performed the reset.
    state.sessions.revoke_all_for_user(&token.user_id).await?;

    Ok(())
}
