//! Player pages and playback-command routes.
//!
//! `GET /player` is the main page: the current track plus the next ten queued
//! tracks. The POST routes are plain form posts from that page, each one a
//! single Spotify API call followed by a redirect back to `/player`.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    models::Queue,
    spotify, SharedState,
};

/// Create an Axum router with the page and playback routes.
///
/// Routes:
/// - `GET /` - Landing page
/// - `GET /initialPlay` - Activate the first available device and start playback
/// - `GET /player` - Current track and queue
/// - `POST /togglePlayback` - Play/pause
/// - `POST /previous` - Skip to the previous track
/// - `POST /next` - Skip to the next track
pub fn player_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(landing))
        .route("/initialPlay", get(initial_play))
        .route("/player", get(player))
        .route("/togglePlayback", post(toggle_playback))
        .route("/previous", post(previous))
        .route("/next", post(next))
}

/// Serve up the landing page.
pub async fn landing(State(state): State<SharedState>) -> Result<Html<String>> {
    let html = state
        .templates
        .render("landing.html", &tera::Context::new())?;
    Ok(Html(html))
}

/// Get something playing: pick the first available device, transfer playback
/// to it, and head to the player. With no device anywhere, render the player
/// in its "open Spotify somewhere" state.
pub async fn initial_play(State(state): State<SharedState>) -> Result<Response> {
    let devices = spotify::get_devices(&state)
        .await
        .map_err(|e| route_error(e, "/initialPlay"))?;

    // Restricted devices report a null id and can't receive a transfer
    let device_id = devices.devices.iter().find_map(|d| d.id.as_deref());

    if let Some(device_id) = device_id {
        spotify::transfer_playback(&state, device_id)
            .await
            .map_err(|e| route_error(e, "/initialPlay"))?;
        return Ok(Redirect::to("/player").into_response());
    }

    tracing::info!("No playback devices available");
    let html = state
        .templates
        .render("player.html", &tera::Context::new())?;
    Ok(Html(html).into_response())
}

/// The main "homepage", if you will: current track plus the upcoming queue.
pub async fn player(State(state): State<SharedState>) -> Result<Html<String>> {
    let playing = spotify::get_currently_playing(&state)
        .await
        .map_err(|e| route_error(e, "/player"))?;

    let mut context = tera::Context::new();

    // Nothing playing (204) or a non-track item renders the "no device" state
    if let Some(track) = playing.and_then(|p| p.item) {
        let queue = spotify::get_queue(&state)
            .await
            .map_err(|e| route_error(e, "/player"))?;

        context.insert("track_name", &track.name);
        context.insert("artist_names", &track.artist_names());
        context.insert("image_url", &track.image_url());
        context.insert("queue", &queue_preview(&queue));
    }

    let html = state.templates.render("player.html", &context)?;
    Ok(Html(html))
}

/// Pause when something is playing, resume otherwise.
pub async fn toggle_playback(State(state): State<SharedState>) -> Result<Redirect> {
    let playback = spotify::get_playback_state(&state)
        .await
        .map_err(|e| route_error(e, "/togglePlayback"))?;

    let is_playing = playback.is_some_and(|p| p.is_playing);
    if is_playing {
        spotify::pause(&state)
            .await
            .map_err(|e| route_error(e, "/togglePlayback"))?;
    } else {
        spotify::play(&state)
            .await
            .map_err(|e| route_error(e, "/togglePlayback"))?;
    }

    Ok(Redirect::to("/player"))
}

/// Skip back to the previous track.
pub async fn previous(State(state): State<SharedState>) -> Result<Redirect> {
    spotify::previous_track(&state)
        .await
        .map_err(|e| route_error(e, "/previous"))?;
    Ok(Redirect::to("/player"))
}

/// Skip to the next track.
pub async fn next(State(state): State<SharedState>) -> Result<Redirect> {
    spotify::next_track(&state)
        .await
        .map_err(|e| route_error(e, "/next"))?;
    Ok(Redirect::to("/player"))
}

/// A queue row as the template sees it.
#[derive(Debug, Serialize)]
pub struct QueueEntry {
    pub name: String,
    pub artists: String,
}

/// The first ten queued tracks, flattened for display.
fn queue_preview(queue: &Queue) -> Vec<QueueEntry> {
    queue
        .queue
        .iter()
        .take(10)
        .map(|track| QueueEntry {
            name: track.name.clone(),
            artists: track.artist_names(),
        })
        .collect()
}

/// Log the route-specific failure message, then tag the error with the route
/// so an expired token redirects back here after the refresh.
fn route_error(err: Error, route: &str) -> Error {
    tracing::error!("{}: {}", internal_error_message(route), err);
    err.on_route(route)
}

fn internal_error_message(route: &str) -> &'static str {
    match route {
        "/initialPlay" => "Error playing initial playlist",
        "/player" => "Error starting the music player",
        "/togglePlayback" => "Error playing/pausing the music",
        "/previous" => "Error skipping to previous song",
        "/next" => "Error skipping to next song",
        _ => "Error handling request",
    }
}
