//! Spotify Web API payload types.
//!
//! Only the fields the app actually reads are modelled; everything else in the
//! (very large) player payloads is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Response from `GET /v1/me/player/currently-playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    /// The playing track. Absent for podcast episodes and private sessions.
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
}

/// Response from `GET /v1/me/player` (the full playback state).
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub is_playing: bool,
    pub device: Option<Device>,
}

/// A track object as returned by the player endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
}

impl Track {
    /// Comma-separated artist names for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// URL of the largest album image, if any. Spotify orders images by
    /// descending size, so the first one is the largest.
    pub fn image_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Response from `GET /v1/me/player/queue`.
#[derive(Debug, Clone, Deserialize)]
pub struct Queue {
    #[serde(default)]
    pub queue: Vec<Track>,
}

/// Response from `GET /v1/me/player/devices`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// A playback device. The id can be null for restricted devices.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Spotify `OAuth2` token response from the accounts service.
///
/// Refresh responses usually omit `refresh_token`; Spotify only rotates it
/// occasionally and the caller keeps the previous one otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Error envelope the Spotify Web API wraps failures in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

/// The inner error object: `{"error": {"status": 401, "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currently_playing_deserialization() {
        let json = r#"{
            "is_playing": true,
            "item": {
                "name": "Paranoid Android",
                "artists": [{"name": "Radiohead"}],
                "album": {
                    "images": [
                        {"url": "https://i.scdn.co/image/large"},
                        {"url": "https://i.scdn.co/image/small"}
                    ]
                }
            }
        }"#;

        let playing: CurrentlyPlaying = serde_json::from_str(json).unwrap();
        assert!(playing.is_playing);
        let track = playing.item.unwrap();
        assert_eq!(track.name, "Paranoid Android");
        assert_eq!(track.artist_names(), "Radiohead");
        assert_eq!(track.image_url(), Some("https://i.scdn.co/image/large"));
    }

    #[test]
    fn test_currently_playing_with_null_item() {
        let json = r#"{"is_playing": false, "item": null}"#;
        let playing: CurrentlyPlaying = serde_json::from_str(json).unwrap();
        assert!(!playing.is_playing);
        assert!(playing.item.is_none());
    }

    #[test]
    fn test_track_with_multiple_artists() {
        let json = r#"{
            "name": "Sun Models",
            "artists": [{"name": "ODESZA"}, {"name": "Madelyn Grant"}],
            "album": {"images": []}
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.artist_names(), "ODESZA, Madelyn Grant");
        assert!(track.image_url().is_none());
    }

    #[test]
    fn test_queue_item_without_artists() {
        // Podcast episodes in the queue carry no artists or album.
        let json = r#"{"queue": [{"name": "Some Episode"}]}"#;
        let queue: Queue = serde_json::from_str(json).unwrap();
        assert_eq!(queue.queue.len(), 1);
        assert_eq!(queue.queue[0].artist_names(), "");
    }

    #[test]
    fn test_device_list_with_null_id() {
        let json = r#"{
            "devices": [
                {"id": null, "name": "Restricted Speaker", "is_active": false},
                {"id": "abc123", "name": "Desktop", "is_active": true}
            ]
        }"#;

        let list: DeviceList = serde_json::from_str(json).unwrap();
        assert!(list.devices[0].id.is_none());
        assert_eq!(list.devices[1].id.as_deref(), Some("abc123"));
        assert!(list.devices[1].is_active);
    }

    #[test]
    fn test_token_response_without_refresh_token() {
        let json = r#"{
            "access_token": "NgA6ZcYI...",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-read-playback-state"
        }"#;

        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.expires_in, 3600);
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn test_api_error_body_deserialization() {
        let json = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.status, 401);
        assert_eq!(body.error.message, "The access token expired");
    }
}
