use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};

use super::model::{Session, TwoFactorPurpose, TwoFactorToken, User};
use super::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, AuthError>;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()>;
    /// Flips both `two_factor_enabled` and `two_factor_email`; email codes
    /// are the only supported second factor.
    async fn set_two_factor(&self, user_id: &str, enabled: bool) -> Result<()>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Session>>;
    /// Active session scoped to its owner; used by the single-revoke path so
    /// other users' session ids are indistinguishable from unknown ids.
    async fn find_active_owned(&self, user_id: &str, session_id: &str) -> Result<Option<Session>>;
    async fn touch(&self, session_id: &str) -> Result<()>;
    async fn revoke(&self, session_id: &str) -> Result<()>;
    async fn revoke_all_for_user(&self, user_id: &str) -> Result<()>;
    async fn revoke_others(&self, user_id: &str, keep_session_id: &str) -> Result<()>;
    /// Active sessions only, most recently used first.
    async fn list_active_for_user(&self, user_id: &str) -> Result<Vec<Session>>;
}

#[async_trait]
pub trait TwoFactorTokenRepository: Send + Sync {
    async fn create(&self, token: &TwoFactorToken) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<TwoFactorToken>>;
    /// Conditional delete: returns whether this call removed the row. Exactly
    /// one concurrent verifier can observe `true`, which makes consumption
    /// at-most-once.
    async fn delete_by_id(&self, id: &str) -> Result<bool>;
    async fn delete_for_user_purpose(&self, user_id: &str, purpose: TwoFactorPurpose)
        -> Result<u64>;
    async fn delete_all_for_user(&self, user_id: &str) -> Result<u64>;
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Fill in all required fields.")]
    RequiredFields,

    #[error("Email is required.")]
    EmailRequired,

    #[error("Email is already registered.")]
    EmailAlreadyExists,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Invalid code.")]
    InvalidTwoFactorCode,

    #[error("Expired code.")]
    ExpiredTwoFactorCode,

    #[error("Two-factor authentication is disabled.")]
    TwoFactorDisabled,

    #[error("Two-factor authentication is already enabled.")]
    TwoFactorAlreadyEnabled,

    #[error("Provide the token, code and new password.")]
    ResetFieldsRequired,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Current password is incorrect.")]
    InvalidPassword,

    #[error("User not found.")]
    UserNotFound,

    #[error("Session not found.")]
    SessionNotFound,

    #[error("Missing token.")]
    TokenMissing,

    #[error("Invalid token. Log in again.")]
    TokenInvalid,

    #[error("Your session has expired. Log in again.")]
    SessionExpired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequiredFields => StatusCode::BAD_REQUEST,
            Self::EmailRequired => StatusCode::BAD_REQUEST,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidTwoFactorCode => StatusCode::BAD_REQUEST,
            Self::ExpiredTwoFactorCode => StatusCode::BAD_REQUEST,
            Self::TwoFactorDisabled => StatusCode::BAD_REQUEST,
            Self::TwoFactorAlreadyEnabled => StatusCode::BAD_REQUEST,
            Self::ResetFieldsRequired => StatusCode::BAD_REQUEST,
            Self::PasswordTooShort => StatusCode::BAD_REQUEST,
            Self::InvalidPassword => StatusCode::BAD_REQUEST,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::TokenMissing => StatusCode::UNAUTHORIZED,
            Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::SessionExpired => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code; the client maps these to localized
    /// messages on its side.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequiredFields => "REQUIRED_FIELDS",
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidTwoFactorCode => "INVALID_2FA_CODE",
            Self::ExpiredTwoFactorCode => "EXPIRED_2FA_CODE",
            Self::TwoFactorDisabled => "TWO_FACTOR_DISABLED",
            Self::TwoFactorAlreadyEnabled => "TWO_FACTOR_ALREADY_ENABLED",
            Self::ResetFieldsRequired => "RESET_PASSWORD_REQUIRED_FIELDS",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::TokenMissing => "TOKEN_MISSING",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to put on the wire. Store/hash/signer failures are
    /// normalized so internals never leak.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) => {
                "An unexpected error occurred. Try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn hashing(err: argon2::password_hash::Error) -> Self {
        Self::Hashing(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
        }
        let body = ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
