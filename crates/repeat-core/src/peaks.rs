//! Multi-resolution peak cache
//!
//! Stores min/max envelopes of the mono buffer at a ladder of resolutions
//! (samples per pixel), from one pixel per full-track-width column down to
//! `2^max_levels` times finer. Any zoom level renders by picking the tightest
//! cached level at or above it and slicing, so drawing cost is independent of
//! track length.
//!
//! All levels are filled in a single traversal of the sample buffer: every
//! sample updates one running accumulator per level.

use std::time::Instant;

use crate::samples::SampleStore;

/// A `(min, max)` amplitude envelope
pub type PeakPair = (f32, f32);

/// Default number of halvings below the full-track zoom
pub const DEFAULT_MAX_LEVELS: u32 = 5;

// =============================================================================
// Zoom bounds
// =============================================================================

/// Zoom range for a given viewport width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    /// One pixel's worth of samples with the whole track visible
    pub max_spp: f32,
    /// Deepest zoom-in
    pub min_spp: f32,
}

impl ZoomBounds {
    pub fn compute(width_px: u32, duration_seconds: f32, sample_rate: u32, max_levels: u32) -> Self {
        let px_per_sec = width_px.max(1) as f32 / duration_seconds;
        let max_spp = sample_rate as f32 / px_per_sec;
        let min_spp = max_spp / 2f32.powi(max_levels as i32);
        Self { max_spp, min_spp }
    }

    /// Cached resolutions, coarsest first
    ///
    /// Halves from `max_spp` while the level stays at or above the integer
    /// floor of `min_spp`. Never empty and never contains 0.
    pub fn level_ladder(&self) -> Vec<usize> {
        let floor = (self.min_spp as usize).max(1);
        let mut spp = (self.max_spp as usize).max(1);
        let mut levels = Vec::new();
        while spp >= floor {
            levels.push(spp);
            if spp == 1 {
                break;
            }
            spp /= 2;
        }
        if levels.is_empty() {
            levels.push(floor);
        }
        levels
    }
}

// =============================================================================
// Cache
// =============================================================================

/// One cached resolution
#[derive(Debug, Clone)]
struct PeakLevel {
    samples_per_px: usize,
    peaks: Vec<PeakPair>,
}

/// Running min/max for one level during the build pass
struct LevelAccumulator {
    min: f32,
    max: f32,
    countdown: usize,
}

impl LevelAccumulator {
    fn new(samples_per_px: usize) -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            countdown: samples_per_px,
        }
    }
}

/// Range of the level currently handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
struct CurrentSlice {
    level: usize,
    start: usize,
    end: usize,
}

/// Peak envelopes at every cached resolution
#[derive(Debug, Default)]
pub struct PeakCache {
    levels: Vec<PeakLevel>,
    is_populated: bool,
    build_passes: u64,
    current: Option<CurrentSlice>,
}

impl PeakCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every level in one pass over the samples
    ///
    /// Always runs to completion. Callers gate on [`is_populated`](Self::is_populated).
    pub fn build(&mut self, store: &SampleStore, bounds: ZoomBounds) {
        let started = Instant::now();
        let samples = store.samples();

        let mut levels: Vec<PeakLevel> = bounds
            .level_ladder()
            .into_iter()
            .map(|spp| PeakLevel {
                samples_per_px: spp,
                peaks: Vec::with_capacity(samples.len() / spp),
            })
            .collect();
        let mut accumulators: Vec<LevelAccumulator> = levels
            .iter()
            .map(|l| LevelAccumulator::new(l.samples_per_px))
            .collect();

        for &sample in samples {
            for (acc, level) in accumulators.iter_mut().zip(levels.iter_mut()) {
                acc.min = acc.min.min(sample);
                acc.max = acc.max.max(sample);
                acc.countdown -= 1;
                if acc.countdown == 0 {
                    level.peaks.push((acc.min, acc.max));
                    *acc = LevelAccumulator::new(level.samples_per_px);
                }
            }
        }

        self.levels = levels;
        self.is_populated = true;
        self.build_passes += 1;
        self.current = None;

        log::debug!(
            "PeakCache: built levels {:?} over {} samples in {:?}",
            self.levels(),
            samples.len(),
            started.elapsed()
        );
    }

    /// Mark the cache stale (viewport width changed)
    pub fn invalidate(&mut self) {
        self.is_populated = false;
        self.current = None;
    }

    pub fn is_populated(&self) -> bool {
        self.is_populated
    }

    /// Number of completed build passes since construction
    pub fn build_passes(&self) -> u64 {
        self.build_passes
    }

    /// Cached resolutions, coarsest first
    pub fn levels(&self) -> Vec<usize> {
        self.levels.iter().map(|l| l.samples_per_px).collect()
    }

    pub fn peaks(&self, samples_per_px: usize) -> Option<&[PeakPair]> {
        self.levels
            .iter()
            .find(|l| l.samples_per_px == samples_per_px)
            .map(|l| l.peaks.as_slice())
    }

    /// Tightest cached level that is still `>= requested_spp`
    ///
    /// Scans from the finest level upwards. A request above the coarsest
    /// level gets the coarsest. `None` only when the cache is empty.
    pub fn get_level(&self, requested_spp: f32) -> Option<usize> {
        self.levels
            .iter()
            .rev()
            .map(|l| l.samples_per_px)
            .find(|&spp| spp as f32 >= requested_spp)
            .or_else(|| self.levels.first().map(|l| l.samples_per_px))
    }

    /// Point the renderer at `[start, end)` of a level, clamped to its length
    pub fn select(&mut self, level: usize, start: usize, end: usize) -> &[PeakPair] {
        let len = self.peaks(level).map_or(0, <[PeakPair]>::len);
        let end = end.min(len);
        let start = start.min(end);
        self.current = Some(CurrentSlice { level, start, end });
        self.current_slice()
    }

    /// The slice chosen by the last [`select`](Self::select)
    pub fn current_slice(&self) -> &[PeakPair] {
        match self.current {
            Some(cur) => self
                .peaks(cur.level)
                .map_or(&[][..], |p| &p[cur.start..cur.end]),
            None => &[],
        }
    }

    /// Level and first pair index of the current slice
    pub fn current_origin(&self) -> Option<(usize, usize)> {
        self.current.map(|c| (c.level, c.start))
    }
}

/// Fold a run of pairs into one envelope; `(0, 0)` when empty
pub fn reduce_peaks(pairs: &[PeakPair]) -> PeakPair {
    if pairs.is_empty() {
        return (0.0, 0.0);
    }
    pairs
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &(min, max)| {
            (lo.min(min), hi.max(max))
        })
}
