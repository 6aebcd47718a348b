//! Session storage abstraction.
//!
//! The app serves a single user, so the store holds at most one session. The
//! trait keeps the storage behind dynamic dispatch so tests can substitute
//! their own backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Result, SessionError};
use crate::models::Session;

mod memory;
pub use memory::MemoryStorage;

/// Storage trait for the user's OAuth session.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Get the current session, if the user has logged in.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// Store a session, replacing any previous one.
    async fn save_session(&self, session: Session) -> Result<()>;

    /// Replace the access token after a refresh, keeping the refresh token.
    async fn update_access_token(
        &self,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Replace the refresh token when Spotify rotates it.
    async fn update_refresh_token(&self, refresh_token: &str) -> Result<()>;

    /// Drop the session (logout).
    async fn clear_session(&self) -> Result<()>;
}

/// Helper function to create a session error from a string.
pub fn session_error(msg: impl Into<String>) -> SessionError {
    SessionError::Other(msg.into())
}
