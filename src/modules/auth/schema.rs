use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::User;

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub display_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

// =============================================================================
// PUBLIC PROFILE
// =============================================================================

/// Profile fields the mobile client renders; the password hash never
/// leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(rename = "nome")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "remuneracao")]
    pub monthly_income: Option<Decimal>,
    #[serde(rename = "fotoPerfil")]
    pub photo_url: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            monthly_income: user.monthly_income,
            photo_url: user.photo_url.clone(),
        }
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Authenticated(AuthenticatedResponse),
    TwoFactorChallenge(TwoFactorChallengeResponse),
}

#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Password was accepted but a code is pending; `email` is masked so the
/// response confirms where the code went without exposing the address.
#[derive(Debug, Serialize)]
pub struct TwoFactorChallengeResponse {
    #[serde(rename = "requiresTwoFactor")]
    pub requires_two_factor: bool,
    #[serde(rename = "twoFactorTokenId")]
    pub two_factor_token_id: String,
    pub email: String,
}

// =============================================================================
// 2FA LOGIN COMPLETION
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VerifyTwoFactorRequest {
    #[serde(rename = "tokenId")]
    pub token_id: String,
    pub code: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: Option<String>,
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    /// `null` when the email is not registered; the response shape is
    /// otherwise identical so callers cannot probe for accounts.
    #[serde(rename = "tokenId")]
    pub token_id: Option<String>,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "tokenId", default)]
    pub token_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "novaSenha", default)]
    pub new_password: String,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
