//! Configuration types for the playback controller.

use serde::Deserialize;

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Spotify `OAuth2` configuration.
    pub spotify: SpotifyConfig,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Spotify `OAuth2` and API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyConfig {
    /// Spotify application client ID.
    pub client_id: String,
    /// Spotify application client secret.
    pub client_secret: String,
    /// `OAuth2` redirect URI (must match the app settings on the Spotify dashboard).
    pub redirect_uri: String,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - `SPOTIFY_CLIENT_ID`
    /// - `SPOTIFY_CLIENT_SECRET`
    /// - `SPOTIFY_REDIRECT_URI`
    /// - `HOST` (optional, defaults to "0.0.0.0")
    /// - `PORT` (optional, defaults to 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let spotify = SpotifyConfig {
            client_id: std::env::var("SPOTIFY_CLIENT_ID")
                .map_err(|_| ConfigError::MissingEnv("SPOTIFY_CLIENT_ID"))?,
            client_secret: std::env::var("SPOTIFY_CLIENT_SECRET")
                .map_err(|_| ConfigError::MissingEnv("SPOTIFY_CLIENT_SECRET"))?,
            redirect_uri: std::env::var("SPOTIFY_REDIRECT_URI")
                .map_err(|_| ConfigError::MissingEnv("SPOTIFY_REDIRECT_URI"))?,
        };

        let server = ServerConfig {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_port),
        };

        Ok(Self { spotify, server })
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnv("SPOTIFY_CLIENT_ID");
        assert_eq!(
            err.to_string(),
            "missing required environment variable: SPOTIFY_CLIENT_ID"
        );
    }
}
