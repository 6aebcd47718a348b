//! The single-user OAuth session.

use chrono::{DateTime, Duration, Utc};

use super::playback::TokenResponse;

/// The authenticated user's Spotify token pair.
///
/// This app serves exactly one user, so the whole session is this one struct.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for Web API requests.
    pub access_token: String,
    /// Token used to obtain a fresh access token when it expires.
    pub refresh_token: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a token-endpoint response.
    ///
    /// Returns `None` when the response carries no refresh token, which only
    /// happens outside the authorization-code grant.
    pub fn from_token_response(token: &TokenResponse) -> Option<Self> {
        let refresh_token = token.refresh_token.clone()?;
        Some(Self {
            access_token: token.access_token.clone(),
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    /// Returns true once the access token's lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token_response(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "access123".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            refresh_token: refresh_token.map(String::from),
            scope: None,
        }
    }

    #[test]
    fn test_session_from_token_response() {
        let session = Session::from_token_response(&make_token_response(Some("refresh456")))
            .expect("response with refresh token builds a session");
        assert_eq!(session.access_token, "access123");
        assert_eq!(session.refresh_token, "refresh456");
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_requires_refresh_token() {
        assert!(Session::from_token_response(&make_token_response(None)).is_none());
    }

    #[test]
    fn test_session_is_expired() {
        let session = Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        };
        assert!(session.is_expired());
    }
}
