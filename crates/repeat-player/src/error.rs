//! Audio output errors

use thiserror::Error;

/// Errors that can occur while opening the output stream
#[derive(Error, Debug)]
pub enum AudioError {
    /// Failed to get default device
    #[error("Failed to get default audio device: {0}")]
    NoDefaultDevice(String),

    /// Failed to query device configurations
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Device has no f32 output config at the track's rate
    #[error("Audio device does not support {0} Hz output")]
    UnsupportedSampleRate(u32),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start the stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
