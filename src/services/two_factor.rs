use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::modules::auth::interface::{AuthError, Result, TwoFactorTokenRepository};
use crate::modules::auth::model::{TwoFactorPurpose, TwoFactorToken};
use crate::services::hashing;

const CODE_TTL_MINUTES: i64 = 10;

/// Freshly issued challenge. `code` is the plaintext handed to the mailer;
/// only its hash is stored.
pub struct IssuedChallenge {
    pub token_id: String,
    pub code: String,
}

fn generate_code() -> String {
    // Uniform over 000000..=999999, leading zeros preserved.
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:06}", n)
}

/// Issues a new challenge for `(user, purpose)`, replacing any live one so
/// a single challenge per purpose is outstanding at a time.
pub async fn issue(
    repo: &dyn TwoFactorTokenRepository,
    user_id: &str,
    purpose: TwoFactorPurpose,
) -> Result<IssuedChallenge> {
    let code = generate_code();
    let code_hash = hashing::hash_password(&code).map_err(AuthError::hashing)?;

    repo.delete_for_user_purpose(user_id, purpose).await?;

    let token = TwoFactorToken {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        code_hash,
        purpose,
        expires_at: Utc::now() + Duration::minutes(CODE_TTL_MINUTES),
        created_at: Utc::now(),
    };
    repo.create(&token).await?;

    Ok(IssuedChallenge {
        token_id: token.id,
        code,
    })
}

/// Checks a presented code against a stored challenge. Succeeding here has
/// no side effect; callers consume the token explicitly once the dependent
/// state change is underway. An expired token is deleted on sight.
pub async fn verify(
    repo: &dyn TwoFactorTokenRepository,
    token_id: &str,
    code: &str,
    expected_purpose: TwoFactorPurpose,
) -> Result<TwoFactorToken> {
    let token = match repo.find_by_id(token_id).await? {
        Some(token) if token.purpose == expected_purpose => token,
        // A purpose mismatch is reported exactly like a missing token.
        _ => return Err(AuthError::InvalidTwoFactorCode),
    };

    if token.expires_at < Utc::now() {
        repo.delete_by_id(token_id).await?;
        return Err(AuthError::ExpiredTwoFactorCode);
    }

    let valid = hashing::verify_password(code, &token.code_hash).map_err(AuthError::hashing)?;
    if !valid {
        return Err(AuthError::InvalidTwoFactorCode);
    }

    Ok(token)
}

/// Burns a verified token. The conditional delete means that of two racing
/// verifiers only one proceeds; the loser sees the token as already spent.
pub async fn consume(repo: &dyn TwoFactorTokenRepository, token_id: &str) -> Result<()> {
    if !repo.delete_by_id(token_id).await? {
        return Err(AuthError::InvalidTwoFactorCode);
    }
    Ok(())
}
