//! Error types for the playback controller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Result type alias using the application's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for playback controller operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Spotify access token has expired; the request must be replayed
    /// after a refresh.
    #[error("access token expired on {route}")]
    TokenExpired {
        /// The route that hit the expired token, so the refresh flow can
        /// redirect back to it.
        route: String,
    },

    /// No session exists yet; the user has to log in first.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Spotify API request failed.
    #[error("spotify API error: {0}")]
    SpotifyApi(String),

    /// Outbound HTTP request failed before reaching the API.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session store operation failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Session-store-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Generic session store error.
    #[error("session error: {0}")]
    Other(String),
}

impl Error {
    /// Attach the originating route to a `TokenExpired` error so the refresh
    /// redirect can replay it. Leaves every other variant untouched.
    pub fn on_route(self, route: &str) -> Self {
        match self {
            Error::TokenExpired { .. } => Error::TokenExpired {
                route: route.to_string(),
            },
            other => other,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::TokenExpired { route } => {
                let query = serde_urlencoded::to_string([("routeTokenExpiredOn", route)])
                    .unwrap_or_default();
                Redirect::to(&format!("/auth/refreshToken?{query}")).into_response()
            }
            Error::NotAuthenticated => Redirect::to("/auth/login").into_response(),
            Error::SpotifyApi(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
            Error::Session(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            Error::Template(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "template error".to_string(),
            )
                .into_response(),
            Error::AuthFailed(_) => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            Error::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
        }
    }
}
