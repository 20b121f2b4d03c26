//! # Playback Error Types

use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The audio engine failed to load a preview stream.
    #[error("Failed to load audio source: {0}")]
    LoadFailed(String),

    /// The audio engine rejected a pause/resume/release call.
    #[error("Audio engine error: {0}")]
    EngineError(String),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
