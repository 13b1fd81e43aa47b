//! In-Memory OTP Store
//!
//! Process-local store for pending verification codes. State is lost on
//! restart; codes are cheap to reissue, so nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::entity::otp_session::OtpSession;
use crate::domain::repository::OtpStore;
use crate::error::AuthResult;

#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    sessions: Arc<Mutex<HashMap<String, OtpSession>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OtpStore for InMemoryOtpStore {
    async fn put(&self, key: &str, session: OtpSession) -> AuthResult<()> {
        self.sessions.lock().await.insert(key.to_string(), session);
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<OtpSession>> {
        Ok(self.sessions.lock().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        self.sessions.lock().await.remove(key);
        Ok(())
    }
}
