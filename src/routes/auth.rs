//! Spotify `OAuth2` authentication routes.
//!
//! This module provides HTTP handlers for:
//! - Login (redirect to the Spotify consent page)
//! - The authorization-code callback
//! - Token refresh, which replays the route that hit the expired token

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::{
    config::SpotifyConfig,
    error::{Error, Result},
    models::Session,
    spotify, SharedState,
};

/// Create an Axum router with all auth routes.
///
/// Routes:
/// - `GET /login` - Redirect to the Spotify authorization page
/// - `GET /callback` - Exchange the authorization code for tokens
/// - `GET /refreshToken` - Refresh the access token, then replay the failed route
pub fn auth_router() -> Router<SharedState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/refreshToken", get(refresh_token))
}

/// Query parameters Spotify sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the refresh route. `routeTokenExpiredOn` names the
/// route that failed on the expired token so it can be re-run afterwards.
#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    #[serde(rename = "routeTokenExpiredOn")]
    pub route_token_expired_on: Option<String>,
}

/// Start the authorization-code flow by redirecting to Spotify's consent page.
pub async fn login(State(state): State<SharedState>) -> Result<Redirect> {
    let oauth_state = generate_oauth_state();
    *state.pending_oauth_state.lock() = Some(oauth_state.clone());

    let url = build_authorize_url(&state.config.spotify, &oauth_state)?;
    tracing::info!("Redirecting to Spotify authorization page");
    Ok(Redirect::to(&url))
}

/// Handle the authorization-code callback: verify state, exchange the code
/// for tokens, store the session, and kick off playback.
pub async fn callback(
    State(state): State<SharedState>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!("Spotify authorization was denied: {}", error);
        return Err(Error::AuthFailed(error));
    }

    let expected = state.pending_oauth_state.lock().take();
    if expected.is_none() || params.state != expected {
        tracing::warn!("OAuth state mismatch on callback");
        return Err(Error::AuthFailed("state mismatch".to_string()));
    }

    let code = params
        .code
        .ok_or_else(|| Error::InvalidRequest("missing authorization code".to_string()))?;

    let token = spotify::exchange_code(&state, &code).await?;
    let session = Session::from_token_response(&token)
        .ok_or_else(|| Error::AuthFailed("token response had no refresh token".to_string()))?;

    state.sessions.save_session(session).await?;

    tracing::info!("Successfully authenticated with Spotify");
    Ok(Redirect::to("/initialPlay"))
}

/// Refresh the access token, then redirect back to the route that hit the
/// expired token (defaults to `/player`).
pub async fn refresh_token(
    State(state): State<SharedState>,
    Query(params): Query<RefreshParams>,
) -> Result<Redirect> {
    let session = state
        .sessions
        .get_session()
        .await?
        .ok_or(Error::NotAuthenticated)?;

    tracing::info!("Refreshing expired Spotify access token");
    let token = spotify::refresh_access_token(&state, &session.refresh_token).await?;

    let expires_at = Utc::now() + Duration::seconds(token.expires_in);
    state
        .sessions
        .update_access_token(&token.access_token, expires_at)
        .await?;

    // Spotify rotates the refresh token only occasionally
    if let Some(new_refresh_token) = token.refresh_token.as_deref() {
        state
            .sessions
            .update_refresh_token(new_refresh_token)
            .await?;
    }

    let target = safe_return_route(params.route_token_expired_on.as_deref());
    tracing::info!("Token refreshed, replaying {}", target);
    Ok(Redirect::to(target))
}

/// Random `state` parameter for the authorization request.
fn generate_oauth_state() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the full Spotify authorization URL.
fn build_authorize_url(config: &SpotifyConfig, oauth_state: &str) -> Result<String> {
    let query = serde_urlencoded::to_string([
        ("response_type", "code"),
        ("client_id", config.client_id.as_str()),
        ("scope", spotify::SCOPES),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("state", oauth_state),
    ])
    .map_err(|e| Error::InvalidRequest(e.to_string()))?;

    Ok(format!("{}?{}", spotify::AUTHORIZE_URL, query))
}

/// Sanitize the replay target: only same-site absolute paths are allowed,
/// anything else falls back to `/player`.
fn safe_return_route(route: Option<&str>) -> &str {
    match route {
        Some(r) if r.starts_with('/') && !r.starts_with("//") => r,
        _ => "/player",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_spotify_config() -> SpotifyConfig {
        SpotifyConfig {
            client_id: "client123".to_string(),
            client_secret: "secret456".to_string(),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
        }
    }

    #[test]
    fn test_authorize_url_contains_required_params() {
        let config = make_spotify_config();
        let url = build_authorize_url(&config, "xyzzy").unwrap();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client123"));
        assert!(url.contains("state=xyzzy"));
        assert!(url.contains("user-modify-playback-state"));
        // The redirect URI must be percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback"));
    }

    #[test]
    fn test_oauth_state_is_unique() {
        let a = generate_oauth_state();
        let b = generate_oauth_state();
        assert_ne!(a, b);
        assert!(a.len() >= 32);
    }

    #[test]
    fn test_safe_return_route_accepts_local_paths() {
        assert_eq!(safe_return_route(Some("/togglePlayback")), "/togglePlayback");
        assert_eq!(safe_return_route(Some("/next")), "/next");
    }

    #[test]
    fn test_safe_return_route_rejects_external_targets() {
        assert_eq!(safe_return_route(Some("https://evil.example")), "/player");
        assert_eq!(safe_return_route(Some("//evil.example")), "/player");
        assert_eq!(safe_return_route(None), "/player");
    }

    #[test]
    fn test_refresh_params_deserialization() {
        let params: RefreshParams =
            serde_urlencoded::from_str("routeTokenExpiredOn=%2Fplayer").unwrap();
        assert_eq!(params.route_token_expired_on.as_deref(), Some("/player"));

        let params: RefreshParams = serde_urlencoded::from_str("").unwrap();
        assert!(params.route_token_expired_on.is_none());
    }

    #[test]
    fn test_callback_params_deserialization() {
        let params: CallbackParams =
            serde_urlencoded::from_str("code=abc&state=xyz").unwrap();
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.state.as_deref(), Some("xyz"));
        assert!(params.error.is_none());
    }
}
