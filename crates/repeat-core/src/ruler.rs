//! Seconds ruler and label helpers for the presentation layer

use crate::types::TrackInfo;

/// Candidate label spacings in seconds, densest first
pub const LABEL_INTERVALS_SECS: [u64; 5] = [1, 5, 10, 30, 60];

/// Default minimum on-screen distance between two labels
pub const DEFAULT_MIN_TICK_SPACING_PX: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Second,
    FiveSeconds,
    TenSeconds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerTick {
    pub second: u64,
    pub x_px: f32,
    pub kind: TickKind,
    /// Draw the second's number above this tick
    pub labeled: bool,
}

/// First label spacing whose width on screen reaches `min_spacing_px`
pub fn label_interval(px_per_sec: f32, min_spacing_px: f32) -> u64 {
    LABEL_INTERVALS_SECS
        .iter()
        .copied()
        .find(|&secs| secs as f32 * px_per_sec >= min_spacing_px)
        .unwrap_or(LABEL_INTERVALS_SECS[LABEL_INTERVALS_SECS.len() - 1])
}

/// One tick per whole second inside `[left_b, right_b)`
pub fn ruler_ticks(
    track: &TrackInfo,
    left_b: usize,
    right_b: usize,
    samples_per_px: f32,
    min_spacing_px: f32,
) -> Vec<RulerTick> {
    if samples_per_px <= 0.0 || track.sample_rate == 0 {
        return Vec::new();
    }
    let px_per_sec = track.sample_rate as f32 / samples_per_px;
    let every = label_interval(px_per_sec, min_spacing_px);

    let (first_second, mut sample) = track.next_second(track.samples_to_seconds(left_b));
    let mut second = first_second as u64;
    let mut ticks = Vec::new();
    while sample < right_b {
        let kind = if second % 10 == 0 {
            TickKind::TenSeconds
        } else if second % 5 == 0 {
            TickKind::FiveSeconds
        } else {
            TickKind::Second
        };
        ticks.push(RulerTick {
            second,
            x_px: ((sample - left_b) as f64 / samples_per_px as f64) as f32,
            kind,
            labeled: second % every == 0,
        });
        sample += track.sample_rate as usize;
        second += 1;
    }
    ticks
}

/// Shorten a name for display: `limit` chars or more become `limit - 3`
/// chars plus `...`. A limit of 0 disables truncation.
pub fn truncate_name(name: &str, limit: usize) -> String {
    if limit == 0 || name.chars().count() < limit {
        return name.to_string();
    }
    let mut short: String = name.chars().take(limit.saturating_sub(3)).collect();
    short.push_str("...");
    short
}
