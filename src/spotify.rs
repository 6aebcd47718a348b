//! Outbound Spotify API helpers.
//!
//! Player calls go to `https://api.spotify.com/v1/me/player`; the token dance
//! goes to the accounts service. All helpers take the shared [`AppState`] for
//! the HTTP client, the session store, and the client credentials.

use reqwest::{Method, StatusCode};

use crate::{
    error::{Error, Result},
    models::{ApiErrorBody, CurrentlyPlaying, DeviceList, PlaybackState, Queue, TokenResponse},
    AppState,
};

/// Base endpoint for all player API calls.
pub const API_BASE: &str = "https://api.spotify.com/v1/me/player";

/// Spotify accounts-service token endpoint.
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Spotify accounts-service authorization endpoint.
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Scopes the app needs: read playback state, control it, and see the current track.
pub const SCOPES: &str =
    "user-read-playback-state user-modify-playback-state user-read-currently-playing";

/// List the user's available playback devices.
pub async fn get_devices(state: &AppState) -> Result<DeviceList> {
    let token = access_token(state).await?;
    let response = state
        .http_client
        .get(format!("{API_BASE}/devices"))
        .bearer_auth(token)
        .send()
        .await?;

    let response = check(response).await?;
    Ok(response.json::<DeviceList>().await?)
}

/// Transfer playback to the given device and start playing.
pub async fn transfer_playback(state: &AppState, device_id: &str) -> Result<()> {
    let token = access_token(state).await?;
    let body = serde_json::json!({ "device_ids": [device_id], "play": true });

    let response = state
        .http_client
        .put(API_BASE)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    check(response).await?;
    Ok(())
}

/// Fetch the currently playing track. `None` when nothing is playing
/// (the API answers 204 with no body).
pub async fn get_currently_playing(state: &AppState) -> Result<Option<CurrentlyPlaying>> {
    let token = access_token(state).await?;
    let response = state
        .http_client
        .get(format!("{API_BASE}/currently-playing"))
        .bearer_auth(token)
        .send()
        .await?;

    let response = check(response).await?;
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    Ok(Some(response.json::<CurrentlyPlaying>().await?))
}

/// Fetch the full playback state. `None` when no device is active.
pub async fn get_playback_state(state: &AppState) -> Result<Option<PlaybackState>> {
    let token = access_token(state).await?;
    let response = state
        .http_client
        .get(API_BASE)
        .bearer_auth(token)
        .send()
        .await?;

    let response = check(response).await?;
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    Ok(Some(response.json::<PlaybackState>().await?))
}

/// Fetch the upcoming queue.
pub async fn get_queue(state: &AppState) -> Result<Queue> {
    let token = access_token(state).await?;
    let response = state
        .http_client
        .get(format!("{API_BASE}/queue"))
        .bearer_auth(token)
        .send()
        .await?;

    let response = check(response).await?;
    Ok(response.json::<Queue>().await?)
}

/// Pause playback.
pub async fn pause(state: &AppState) -> Result<()> {
    send_command(state, Method::PUT, "/pause").await
}

/// Resume playback.
pub async fn play(state: &AppState) -> Result<()> {
    send_command(state, Method::PUT, "/play").await
}

/// Skip to the next track.
pub async fn next_track(state: &AppState) -> Result<()> {
    send_command(state, Method::POST, "/next").await
}

/// Skip to the previous track.
pub async fn previous_track(state: &AppState) -> Result<()> {
    send_command(state, Method::POST, "/previous").await
}

/// Exchange an authorization code for a token pair.
pub async fn exchange_code(state: &AppState, code: &str) -> Result<TokenResponse> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", state.config.spotify.redirect_uri.as_str()),
    ];

    let response = state
        .http_client
        .post(TOKEN_URL)
        .basic_auth(
            &state.config.spotify.client_id,
            Some(&state.config.spotify.client_secret),
        )
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        tracing::error!("Spotify token exchange failed: {} - {}", status, error_text);
        return Err(Error::AuthFailed(format!(
            "token exchange failed with status {status}"
        )));
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Obtain a fresh access token using the stored refresh token.
pub async fn refresh_access_token(state: &AppState, refresh_token: &str) -> Result<TokenResponse> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];

    let response = state
        .http_client
        .post(TOKEN_URL)
        .basic_auth(
            &state.config.spotify.client_id,
            Some(&state.config.spotify.client_secret),
        )
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await?;
        tracing::error!("Spotify token refresh failed: {} - {}", status, error_text);
        return Err(Error::AuthFailed(format!(
            "token refresh failed with status {status}"
        )));
    }

    Ok(response.json::<TokenResponse>().await?)
}

/// Send a bodyless player command (pause/play/next/previous).
async fn send_command(state: &AppState, method: Method, path: &str) -> Result<()> {
    let token = access_token(state).await?;
    let response = state
        .http_client
        .request(method, format!("{API_BASE}{path}"))
        .bearer_auth(token)
        // The API rejects bodyless PUTs without an explicit length
        .header(reqwest::header::CONTENT_LENGTH, 0)
        .send()
        .await?;

    check(response).await?;
    Ok(())
}

/// Pull the current access token out of the session store.
async fn access_token(state: &AppState) -> Result<String> {
    let session = state
        .sessions
        .get_session()
        .await?
        .ok_or(Error::NotAuthenticated)?;
    Ok(session.access_token)
}

/// Check an API response, turning failures into [`Error`] values.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await?;
    tracing::error!("Spotify API request failed: {} - {}", status, body);
    Err(classify_api_error(status, &body))
}

/// Map an API error body to an [`Error`].
///
/// A 401 with the message "The access token expired" becomes
/// [`Error::TokenExpired`] so the handler can bounce through the refresh flow;
/// the route is filled in by the handler via [`Error::on_route`].
fn classify_api_error(status: StatusCode, body: &str) -> Error {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if parsed.error.status == 401 && parsed.error.message == "The access token expired" {
            return Error::TokenExpired {
                route: "/player".to_string(),
            };
        }
        return Error::SpotifyApi(parsed.error.message);
    }
    Error::SpotifyApi(format!("request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_expired_token() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let err = classify_api_error(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, Error::TokenExpired { .. }));
    }

    #[test]
    fn test_classify_other_401_is_not_expiry() {
        let body = r#"{"error": {"status": 401, "message": "Invalid access token"}}"#;
        let err = classify_api_error(StatusCode::UNAUTHORIZED, body);
        match err {
            Error::SpotifyApi(message) => assert_eq!(message, "Invalid access token"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_classify_api_error_message() {
        let body = r#"{"error": {"status": 404, "message": "Device not found"}}"#;
        let err = classify_api_error(StatusCode::NOT_FOUND, body);
        match err {
            Error::SpotifyApi(message) => assert_eq!(message, "Device not found"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_classify_non_json_body_falls_back_to_status() {
        let err = classify_api_error(StatusCode::BAD_GATEWAY, "<html>upstream broke</html>");
        match err {
            Error::SpotifyApi(message) => {
                assert!(message.contains("502"), "message was: {message}");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_scopes_cover_playback_control() {
        assert!(SCOPES.contains("user-modify-playback-state"));
        assert!(SCOPES.contains("user-read-currently-playing"));
        assert!(SCOPES.contains("user-read-playback-state"));
    }
}
