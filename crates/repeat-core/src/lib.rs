//! re-peat core - waveform editor state for a single track
//!
//! Decoding, the multi-resolution peak cache, zoom/pan, time markers, the
//! playhead and the pointer state machine. Playback sits behind the
//! [`transport::Transport`] trait; drawing is left to the caller.

pub mod config;
pub mod decode;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod markers;
pub mod peaks;
pub mod playhead;
pub mod renamer;
pub mod ruler;
pub mod samples;
pub mod transport;
pub mod types;
pub mod viewport;

pub use editor::Editor;
pub use error::{DecodeError, EditorError, TransportError};
pub use interaction::{Cursor, HitTarget, Mode, PointerEvent, PointerKind};
pub use markers::{Marker, MarkerId};
pub use transport::Transport;
pub use types::*;
