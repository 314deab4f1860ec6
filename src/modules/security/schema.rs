use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::auth::model::Session;

#[derive(Debug, Serialize)]
pub struct SecurityStatusResponse {
    #[serde(rename = "twoFactorEnabled")]
    pub two_factor_enabled: bool,
    #[serde(rename = "twoFactorEmail")]
    pub two_factor_email: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "senhaAtual", default)]
    pub current_password: String,
    #[serde(rename = "novaSenha", default)]
    pub new_password: String,
}

/// Enable flow hands the code id back to the caller; the caller is already
/// authenticated here, so the address is returned unmasked.
#[derive(Debug, Serialize)]
pub struct TwoFactorRequestResponse {
    #[serde(rename = "tokenId")]
    pub token_id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorConfirmRequest {
    #[serde(rename = "tokenId", default)]
    pub token_id: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorDisableRequest {
    #[serde(rename = "senhaAtual", default)]
    pub current_password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lastAccessAt")]
    pub last_access_at: DateTime<Utc>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            user_agent: session.user_agent.clone(),
            ip: session.ip.clone(),
            created_at: session.created_at,
            last_access_at: session.last_access_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    #[serde(rename = "currentSessionId")]
    pub current_session_id: String,
    pub sessions: Vec<SessionResponse>,
}
