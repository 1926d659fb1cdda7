//! Error types for the editor core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a decoded stream into an editor
#[derive(Error, Debug)]
pub enum EditorError {
    /// Raw PCM is not a whole number of 16-bit samples
    #[error("PCM buffer is not 16-bit aligned: {0} bytes")]
    OddPcmLength(usize),

    /// Only mono and stereo streams are supported
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    /// Stream decoded to zero frames
    #[error("Track contains no audio frames")]
    EmptyTrack,

    /// Decoder reported a zero sample rate
    #[error("Track reports a sample rate of 0 Hz")]
    ZeroSampleRate,

    /// The decode stage failed
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors from the symphonia decode stage
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Could not open the source file
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Container or codec not recognized
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File has no decodable audio track
    #[error("No audio track found")]
    NoAudioTrack,

    /// Track did not declare its sample rate
    #[error("Unknown sample rate")]
    UnknownSampleRate,
}

/// Errors reported by a playback transport
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The transport rejected or could not complete a seek
    #[error("Seek failed: {0}")]
    SeekFailed(String),

    /// The audio thread is gone (stream dropped or command queue full)
    #[error("Transport disconnected")]
    Disconnected,
}

/// Result type for editor construction
pub type EditorResult<T> = Result<T, EditorError>;

/// Result type for decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for transport calls
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::OddPcmLength(1001);
        assert_eq!(err.to_string(), "PCM buffer is not 16-bit aligned: 1001 bytes");

        let err = EditorError::UnsupportedChannels(6);
        assert_eq!(
            err.to_string(),
            "Unsupported channel count: 6 (expected 1 or 2)"
        );

        let err = TransportError::SeekFailed("device busy".to_string());
        assert_eq!(err.to_string(), "Seek failed: device busy");
    }

    #[test]
    fn test_decode_error_converts() {
        let err: EditorError = DecodeError::NoAudioTrack.into();
        assert_eq!(err.to_string(), "Decode failed: No audio track found");
    }
}
