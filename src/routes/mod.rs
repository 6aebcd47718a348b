//! HTTP route handlers.

pub mod auth;
pub mod player;

pub use auth::auth_router;
pub use player::player_router;
