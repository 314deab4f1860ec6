use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub monthly_income: Option<Decimal>,
    pub photo_url: Option<String>,
    pub two_factor_enabled: bool,
    pub two_factor_email: bool,
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One logged-in device. Revoked sessions are kept for listing/audit,
/// never deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}

/// Single-use emailed code challenge. At most one live token per
/// (user, purpose), enforced by delete-before-insert on issue.
#[derive(Debug, Clone, FromRow)]
pub struct TwoFactorToken {
    pub id: String,
    pub user_id: String,
    pub code_hash: String,
    pub purpose: TwoFactorPurpose,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TwoFactorPurpose {
    Login,
    Enable,
    Reset,
}

impl TwoFactorPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TwoFactorPurpose::Login => "login",
            TwoFactorPurpose::Enable => "enable",
            TwoFactorPurpose::Reset => "reset",
        }
    }
}
