//! Zoom and pan over the mono sample buffer
//!
//! The viewport owns the visible window `[left_b, right_b)` in mono samples
//! and the current zoom in samples per pixel. `left_b` is clamped at every
//! mutation so the window never leaves the track.

use crate::peaks::{PeakCache, ZoomBounds};
use crate::types::TrackInfo;

/// Default zoom speed per unit of vertical scroll
pub const DEFAULT_ZOOM_RATE: f32 = 0.0008;

/// Default pan speed, in pixels per unit of horizontal scroll
pub const DEFAULT_PAN_RATE: f32 = 0.2;

/// Result of [`Viewport::visible_window`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWindow {
    pub left_b: usize,
    pub right_b: usize,
    /// Cache level to render from (`None` before the cache is built)
    pub level: Option<usize>,
    /// False when the window is identical to the previous call's
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    track: TrackInfo,
    width_px: u32,
    samples_per_px: f32,
    bounds: ZoomBounds,
    left_b: usize,
    right_b: usize,
    published: Option<(usize, usize)>,
    zoom_rate: f32,
    pan_rate: f32,
    max_levels: u32,
}

/// Non-panicking clamp (f32::clamp asserts min <= max)
fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

impl Viewport {
    pub fn new(track: TrackInfo, zoom_rate: f32, pan_rate: f32, max_levels: u32) -> Self {
        Self {
            track,
            width_px: 0,
            samples_per_px: 0.0,
            bounds: ZoomBounds { max_spp: 0.0, min_spp: 0.0 },
            left_b: 0,
            right_b: 0,
            published: None,
            zoom_rate,
            pan_rate,
            max_levels,
        }
    }

    /// Apply a new width. Returns true when it changed, in which case the
    /// zoom resets to the full track and the peak cache must be rebuilt.
    pub fn resize(&mut self, width_px: u32) -> bool {
        if width_px == self.width_px {
            return false;
        }
        self.width_px = width_px;
        self.bounds = ZoomBounds::compute(
            width_px,
            self.track.seconds,
            self.track.sample_rate,
            self.max_levels,
        );
        self.samples_per_px = self.bounds.max_spp;
        self.left_b = self.left_b.min(self.max_left());
        self.published = None;
        log::debug!(
            "Viewport: width {}px, spp range [{:.2}, {:.2}]",
            width_px,
            self.bounds.min_spp,
            self.bounds.max_spp
        );
        true
    }

    /// Clamp the window, report whether it moved and which level to draw
    pub fn visible_window(&mut self, cache: &PeakCache) -> VisibleWindow {
        let left_b = self.left_b.min(self.max_left());
        let right_b = left_b + self.visible_samples();
        let changed = self.published != Some((left_b, right_b));
        self.left_b = left_b;
        self.right_b = right_b;
        self.published = Some((left_b, right_b));
        VisibleWindow {
            left_b,
            right_b,
            level: cache.get_level(self.samples_per_px),
            changed,
        }
    }

    /// Zoom around `pointer_x`, keeping the sample under it in place
    ///
    /// Returns the new samples-per-pixel.
    pub fn zoom(&mut self, scroll_dy: f32, pointer_x: f32) -> f32 {
        let old = self.samples_per_px;
        let new = clamp_f32(
            old * (-scroll_dy * self.zoom_rate).exp(),
            self.bounds.min_spp,
            self.bounds.max_spp,
        );
        self.samples_per_px = new;
        self.shift_left((pointer_x * (old - new)) as i64);
        new
    }

    /// Pan by a scroll delta; speed follows the zoom so gestures move a fixed visual distance
    pub fn pan(&mut self, scroll_dx: f32) {
        self.shift_left((scroll_dx * self.pan_rate * self.samples_per_px) as i64);
    }

    fn shift_left(&mut self, delta: i64) {
        let moved = (self.left_b as i64 + delta).max(0) as usize;
        self.left_b = moved.min(self.max_left());
    }

    pub fn px_to_samples(&self, px: f32) -> usize {
        let offset = (px as f64 * self.samples_per_px as f64).round();
        (self.left_b as f64 + offset).max(0.0) as usize
    }

    /// Horizontal position of a sample; negative or past the width when off-screen
    pub fn samples_to_px(&self, sample: usize) -> f32 {
        if self.samples_per_px <= 0.0 {
            return 0.0;
        }
        ((sample as f64 - self.left_b as f64) / self.samples_per_px as f64) as f32
    }

    pub fn visible_samples(&self) -> usize {
        (self.samples_per_px * self.width_px as f32) as usize
    }

    fn max_left(&self) -> usize {
        self.track.pcm_mono_len.saturating_sub(self.visible_samples())
    }

    /// How far in from the full-track view, 1.0 when fully zoomed out
    pub fn zoom_factor(&self) -> f32 {
        if self.samples_per_px <= 0.0 {
            return 1.0;
        }
        self.bounds.max_spp / self.samples_per_px
    }

    pub fn pixels_per_second(&self) -> f32 {
        if self.samples_per_px <= 0.0 {
            return 0.0;
        }
        self.track.sample_rate as f32 / self.samples_per_px
    }

    pub fn samples_per_px(&self) -> f32 {
        self.samples_per_px
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn left_b(&self) -> usize {
        self.left_b
    }

    pub fn right_b(&self) -> usize {
        self.right_b
    }
}
