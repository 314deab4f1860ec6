//! In-memory storage backend. Backs the integration test suites and keeps
//! the repository ports honest about what the MySQL backend must provide.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::modules::auth::interface::{
    Result, SessionRepository, TwoFactorTokenRepository, UserRepository,
};
use crate::modules::auth::model::{Session, TwoFactorPurpose, TwoFactorToken, User};

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn create(&self, user: &User) -> Result<()> {
        self.users
            .write()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        if let Some(user) = self.users.write().unwrap().get_mut(user_id) {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_two_factor(&self, user_id: &str, enabled: bool) -> Result<()> {
        if let Some(user) = self.users.write().unwrap().get_mut(user_id) {
            user.two_factor_enabled = enabled;
            user.two_factor_email = enabled;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionRepo {
    sessions: RwLock<HashMap<String, Session>>,
}

#[async_trait]
impl SessionRepository for MemorySessionRepo {
    async fn create(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn find_active_owned(&self, user_id: &str, session_id: &str) -> Result<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .unwrap()
            .get(session_id)
            .filter(|session| session.user_id == user_id && session.is_active())
            .cloned())
    }

    async fn touch(&self, session_id: &str) -> Result<()> {
        if let Some(session) = self.sessions.write().unwrap().get_mut(session_id) {
            session.last_access_at = Utc::now();
        }
        Ok(())
    }

    async fn revoke(&self, session_id: &str) -> Result<()> {
        if let Some(session) = self.sessions.write().unwrap().get_mut(session_id) {
            if session.is_active() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> Result<()> {
        for session in self.sessions.write().unwrap().values_mut() {
            if session.user_id == user_id && session.is_active() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn revoke_others(&self, user_id: &str, keep_session_id: &str) -> Result<()> {
        for session in self.sessions.write().unwrap().values_mut() {
            if session.user_id == user_id && session.id != keep_session_id && session.is_active() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn list_active_for_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .unwrap()
            .values()
            .filter(|session| session.user_id == user_id && session.is_active())
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_access_at.cmp(&a.last_access_at));
        Ok(sessions)
    }
}

#[derive(Default)]
pub struct MemoryTwoFactorTokenRepo {
    tokens: RwLock<HashMap<String, TwoFactorToken>>,
}

impl MemoryTwoFactorTokenRepo {
    /// Test hook: rewrites a token's deadline so expiry paths can be
    /// exercised without waiting out the TTL.
    pub fn set_expires_at(&self, token_id: &str, expires_at: DateTime<Utc>) {
        if let Some(token) = self.tokens.write().unwrap().get_mut(token_id) {
            token.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl TwoFactorTokenRepository for MemoryTwoFactorTokenRepo {
    async fn create(&self, token: &TwoFactorToken) -> Result<()> {
        self.tokens
            .write()
            .unwrap()
            .insert(token.id.clone(), token.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TwoFactorToken>> {
        Ok(self.tokens.read().unwrap().get(id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.tokens.write().unwrap().remove(id).is_some())
    }

    async fn delete_for_user_purpose(
        &self,
        user_id: &str,
        purpose: TwoFactorPurpose,
    ) -> Result<u64> {
        let mut tokens = self.tokens.write().unwrap();
        let before = tokens.len();
        tokens.retain(|_, token| !(token.user_id == user_id && token.purpose == purpose));
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_all_for_user(&self, user_id: &str) -> Result<u64> {
        let mut tokens = self.tokens.write().unwrap();
        let before = tokens.len();
        tokens.retain(|_, token| token.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }
}
