//! Displayed playback position
//!
//! Tracks the playhead in PCM bytes, keeps a snapshot of the last explicit
//! position so pausing can snap back to it, and owns the redraw cadence while
//! playing.

use std::time::Duration;

/// Redraw interval at full zoom-out
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// Shortest redraw interval, however deep the zoom
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct PlayheadTracker {
    current_bytes: i64,
    previous_bytes: i64,
    pcm_len: i64,
    base_interval: Duration,
    min_interval: Duration,
    interval: Duration,
}

impl PlayheadTracker {
    pub fn new(pcm_len: i64, base_interval: Duration, min_interval: Duration) -> Self {
        let min_interval = min_interval.min(base_interval);
        Self {
            current_bytes: 0,
            previous_bytes: 0,
            pcm_len,
            base_interval,
            min_interval,
            interval: base_interval,
        }
    }

    /// Move the playhead and remember the position for [`reset_to_snapshot`](Self::reset_to_snapshot)
    pub fn set(&mut self, bytes: i64) {
        self.current_bytes = bytes;
        self.previous_bytes = bytes;
    }

    pub fn reset_to_snapshot(&mut self) {
        self.current_bytes = self.previous_bytes;
    }

    /// Follow the transport. Returns true when the stream just ran out and
    /// the transport must be paused.
    pub fn refresh(&mut self, bytes_read: i64, exhausted: bool) -> bool {
        if exhausted {
            self.current_bytes = self.pcm_len;
            return true;
        }
        self.current_bytes = bytes_read;
        false
    }

    /// Shorten the redraw interval as the zoom deepens
    pub fn scale_refresh_interval(&mut self, zoom_factor: f32) {
        let scaled = if zoom_factor > 0.0 {
            self.base_interval.div_f64(zoom_factor as f64)
        } else {
            self.base_interval
        };
        self.interval = scaled.clamp(self.min_interval, self.base_interval);
    }

    pub fn current_bytes(&self) -> i64 {
        self.current_bytes
    }

    pub fn previous_bytes(&self) -> i64 {
        self.previous_bytes
    }

    pub fn refresh_interval(&self) -> Duration {
        self.interval
    }

    /// True once the playhead sits at or past the end of the stream
    pub fn at_end(&self) -> bool {
        self.current_bytes >= self.pcm_len
    }
}
