//! nowplaying
//!
//! A small personal web app that controls a Spotify playback session:
//! `OAuth2` login, a player page with the current track and queue, and
//! playback commands proxied to the Spotify Web API.
//!
//! # Example
//!
//! ```rust,ignore
//! use nowplaying::{AppState, Config, MemoryStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     dotenvy::dotenv().ok();
//!     let config = Config::from_env()?;
//!     let templates = tera::Tera::new("templates/**/*.html")?;
//!
//!     let state = Arc::new(AppState::new(config, MemoryStorage::new(), templates));
//!     let app = nowplaying::router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod spotify;
pub mod storage;

// Re-exports for convenience
use std::sync::Arc;

use axum::Router;
use parking_lot::Mutex;
use tera::Tera;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use config::{Config, ConfigError, ServerConfig, SpotifyConfig};
pub use error::{Error, Result, SessionError};
pub use models::Session;
pub use storage::{MemoryStorage, SessionStorage};

/// Application state containing configuration, session storage, and templates.
///
/// This is designed to be wrapped in `Arc` and used with Axum's state extractor.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Storage backend for the user's OAuth session.
    pub sessions: Box<dyn SessionStorage>,
    /// HTTP client for Spotify API requests.
    pub http_client: reqwest::Client,
    /// Compiled HTML templates.
    pub templates: Tera,
    /// The `state` parameter of an in-flight authorization request.
    pub pending_oauth_state: Mutex<Option<String>>,
}

impl AppState {
    /// Create a new AppState with the given configuration, storage, and templates.
    pub fn new(config: Config, sessions: impl SessionStorage + 'static, templates: Tera) -> Self {
        Self {
            config,
            sessions: Box::new(sessions),
            http_client: reqwest::Client::new(),
            templates,
            pending_oauth_state: Mutex::new(None),
        }
    }

    /// Create a new AppState with a custom HTTP client.
    pub fn with_http_client(
        config: Config,
        sessions: impl SessionStorage + 'static,
        templates: Tera,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            sessions: Box::new(sessions),
            http_client,
            templates,
            pending_oauth_state: Mutex::new(None),
        }
    }
}

/// Type alias for Arc-wrapped AppState, commonly used with Axum.
pub type SharedState = Arc<AppState>;

/// Assemble the full application router: pages and playback commands at the
/// root, auth under `/auth`, static assets from `public/`.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .merge(routes::player_router())
        .nest("/auth", routes::auth_router())
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
