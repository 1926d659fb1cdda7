//! Track format description and unit conversions
//!
//! Three coordinate systems meet in the editor:
//! - **PCM bytes**: offsets into the interleaved 16-bit little-endian stream the
//!   transport plays. Markers and the playhead live here.
//! - **Mono samples**: indices into the downmixed buffer the peak cache and
//!   viewport work on.
//! - **Seconds**: what the ruler and the transport's seek-by-time use.

/// Bytes per sample of a single channel (signed 16-bit PCM)
pub const BYTES_PER_SAMPLE: i64 = 2;

/// Scale applied to raw i16 samples to map them into [-1, 1]
pub const I16_SCALE: f32 = 32767.0;

/// Static description of the loaded track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (1 or 2)
    pub channels: u16,
    /// Length of the interleaved PCM stream in bytes
    pub pcm_len: i64,
    /// Number of mono samples after downmixing
    pub pcm_mono_len: usize,
    /// Track duration
    pub seconds: f32,
}

impl TrackInfo {
    /// Build a track description from the decode stage's output
    pub fn new(sample_rate: u32, channels: u16, pcm_len: usize) -> Self {
        let block = channels.max(1) as usize * BYTES_PER_SAMPLE as usize;
        let frames = pcm_len / block;
        let seconds = if sample_rate == 0 {
            0.0
        } else {
            frames as f32 / sample_rate as f32
        };
        Self {
            sample_rate,
            channels,
            pcm_len: pcm_len as i64,
            pcm_mono_len: frames,
            seconds,
        }
    }

    /// Size of one interleaved frame in bytes
    pub fn block_align(&self) -> i64 {
        self.channels.max(1) as i64 * BYTES_PER_SAMPLE
    }

    pub fn samples_to_seconds(&self, samples: usize) -> f64 {
        samples as f64 / self.sample_rate as f64
    }

    /// PCM byte offset to mono sample index (negative offsets map to 0)
    pub fn pcm_to_samples(&self, bytes: i64) -> usize {
        (bytes.max(0) / self.block_align()) as usize
    }

    pub fn samples_to_pcm(&self, samples: usize) -> i64 {
        samples as i64 * self.block_align()
    }

    /// Clamp a byte offset into the stream and align it to a frame boundary
    pub fn align_pcm(&self, bytes: i64) -> i64 {
        let clamped = bytes.clamp(0, self.pcm_len);
        clamped - clamped % self.block_align()
    }

    /// Seconds to a frame-aligned byte offset inside the stream
    pub fn seconds_to_pcm_byte_offset(&self, seconds: f64) -> i64 {
        let raw = seconds * self.sample_rate as f64 * self.block_align() as f64;
        self.align_pcm(raw.round() as i64)
    }

    /// First whole second at or after `seconds`, with its mono sample index
    pub fn next_second(&self, seconds: f64) -> (f64, usize) {
        let next = seconds.ceil();
        (next, (next * self.sample_rate as f64) as usize)
    }
}
