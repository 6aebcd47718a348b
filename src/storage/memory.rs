//! In-memory session storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    error::Result,
    models::Session,
    storage::{session_error, SessionStorage},
};

/// In-process session store.
///
/// Tokens live only as long as the process does; restarting the server means
/// logging in again, which is fine for a personal app.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    session: RwLock<Option<Session>>,
}

impl MemoryStorage {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a session is currently stored.
    pub fn has_session(&self) -> bool {
        self.session.read().is_some()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().clone())
    }

    async fn save_session(&self, session: Session) -> Result<()> {
        *self.session.write() = Some(session);
        Ok(())
    }

    async fn update_access_token(
        &self,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut slot = self.session.write();
        let session = slot
            .as_mut()
            .ok_or_else(|| session_error("no active session to update"))?;
        session.access_token = access_token.to_string();
        session.expires_at = expires_at;
        Ok(())
    }

    async fn update_refresh_token(&self, refresh_token: &str) -> Result<()> {
        let mut slot = self.session.write();
        let session = slot
            .as_mut()
            .ok_or_else(|| session_error("no active session to update"))?;
        session.refresh_token = refresh_token.to_string();
        Ok(())
    }

    async fn clear_session(&self) -> Result<()> {
        *self.session.write() = None;
        Ok(())
    }
}
