//! Data models for the playback controller.

mod playback;
mod session;

pub use playback::{
    Album, ApiError, ApiErrorBody, Artist, CurrentlyPlaying, Device, DeviceList, Image,
    PlaybackState, Queue, TokenResponse, Track,
};
pub use session::Session;
