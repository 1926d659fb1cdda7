//! Normalized mono sample buffer
//!
//! Built once from the raw PCM handed over by the decode stage and never
//! mutated afterwards. Everything visual (peaks, viewport math) indexes into
//! this buffer.

use crate::error::{EditorError, EditorResult};
use crate::types::I16_SCALE;

/// Immutable mono samples in [-1, 1]
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<f32>,
}

impl SampleStore {
    /// Build the store from interleaved little-endian 16-bit PCM
    ///
    /// Odd-length buffers and channel counts other than 1 or 2 are load-time
    /// failures.
    pub fn from_pcm16(pcm: &[u8], channels: u16) -> EditorResult<Self> {
        if !matches!(channels, 1 | 2) {
            return Err(EditorError::UnsupportedChannels(channels));
        }
        let normalized = normalize_pcm16(pcm)?;
        let samples = downmix_to_mono(normalized, channels);
        log::debug!(
            "SampleStore: {} mono samples from {} PCM bytes ({} ch)",
            samples.len(),
            pcm.len(),
            channels
        );
        Ok(Self { samples })
    }

    /// Wrap already-normalized mono samples
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Scale signed 16-bit little-endian samples into [-1, 1]
pub fn normalize_pcm16(pcm: &[u8]) -> EditorResult<Vec<f32>> {
    if pcm.len() % 2 != 0 {
        return Err(EditorError::OddPcmLength(pcm.len()));
    }
    Ok(pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / I16_SCALE)
        .collect())
}

/// Average stereo pairs into one channel
///
/// Mono passes through. More than two channels yields an empty buffer.
pub fn downmix_to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    match channels {
        1 => samples,
        2 => samples
            .chunks_exact(2)
            .map(|pair| (pair[0] + pair[1]) * 0.5)
            .collect(),
        n => {
            log::warn!("downmix_to_mono: {} channels not supported", n);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_normalize_scales_full_range() {
        let out = normalize_pcm16(&pcm(&[0, 32767, -32767])).unwrap();
        assert_eq!(out, vec![0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_odd_length_is_rejected() {
        let err = SampleStore::from_pcm16(&[0, 1, 2], 1).unwrap_err();
        assert!(matches!(err, EditorError::OddPcmLength(3)));
    }

    #[test]
    fn test_stereo_pairs_are_averaged() {
        let store = SampleStore::from_pcm16(&pcm(&[32767, 0, -32767, -32767]), 2).unwrap();
        assert_eq!(store.samples(), &[0.5, -1.0]);
    }

    #[test]
    fn test_more_than_two_channels() {
        assert!(downmix_to_mono(vec![0.1; 6], 3).is_empty());
        let err = SampleStore::from_pcm16(&pcm(&[0; 6]), 3).unwrap_err();
        assert!(matches!(err, EditorError::UnsupportedChannels(3)));
    }
}
