//! Playback transport seam
//!
//! The editor never touches an audio device. It drives whatever implements
//! [`Transport`]: the cpal player in `repeat-player`, or a scripted fake in
//! tests. Positions are PCM byte offsets.

use crate::error::TransportResult;

pub trait Transport {
    fn play(&mut self);

    fn pause(&mut self);

    /// Output gain in [0, 1]
    fn set_volume(&mut self, volume: f32);

    fn is_playing(&self) -> bool;

    /// Seek by time; returns the byte offset actually reached
    fn seek_to_seconds(&mut self, seconds: f32) -> TransportResult<i64>;

    /// Seek by byte offset; returns the offset actually reached
    fn seek_to_byte_offset(&mut self, offset: i64) -> TransportResult<i64>;

    /// Bytes handed to the device but not yet audible
    fn buffered_bytes(&self) -> i64;

    /// Audible position in bytes
    fn bytes_read(&self) -> i64;

    /// Block until the output has started consuming after `play()`
    fn wait_until_ready(&mut self) -> bool;

    /// End-of-stream notification. True once per exhaustion, then false
    /// until the stream runs out again.
    fn take_exhausted(&mut self) -> bool;
}
