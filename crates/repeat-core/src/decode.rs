//! Decode stage: audio file to interleaved 16-bit PCM
//!
//! The editor and the transport both work on little-endian signed 16-bit
//! PCM, so whatever symphonia produces is converted once here.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{DecodeError, DecodeResult};
use crate::types::{BYTES_PER_SAMPLE, I16_SCALE};

/// Decoded audio, ready for the editor and the transport
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved little-endian i16
    pub pcm: Vec<u8>,
    /// Frames (samples per channel)
    pub frames: usize,
}

impl DecodedTrack {
    pub fn from_pcm(sample_rate: u32, channels: u16, pcm: Vec<u8>) -> Self {
        let block = channels.max(1) as usize * BYTES_PER_SAMPLE as usize;
        let frames = pcm.len() / block;
        Self {
            sample_rate,
            channels,
            pcm,
            frames,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f32 / self.sample_rate as f32
    }
}

/// Convert interleaved f32 samples to little-endian i16 bytes
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * I16_SCALE).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

/// Decode an audio file with symphonia
pub fn decode_file(path: &Path) -> DecodeResult<DecodedTrack> {
    let file = File::open(path).map_err(|e| DecodeError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::UnknownSampleRate)?;
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                log::warn!("decode_file: Error reading packet: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("decode_file: Error decoding packet: {}", e);
                continue;
            }
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count() as u16;
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    let track = DecodedTrack::from_pcm(sample_rate, channels, f32_to_pcm16(&samples));
    log::info!(
        "decode_file: {:?} -> {} frames, {} Hz, {} ch ({:.1}s)",
        path,
        track.frames,
        track.sample_rate,
        track.channels,
        track.duration_seconds()
    );
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_to_pcm16_clamps_and_scales() {
        let pcm = f32_to_pcm16(&[0.0, 1.0, -1.0, 2.0]);
        let values: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(values, vec![0, 32767, -32767, 32767]);
    }

    #[test]
    fn test_frames_from_pcm_length() {
        let track = DecodedTrack::from_pcm(44100, 2, vec![0; 44100 * 4]);
        assert_eq!(track.frames, 44100);
        assert!((track.duration_seconds() - 1.0).abs() < 1e-6);
    }

    /// Minimal 16-bit PCM WAV file around `data`
    fn wav_bytes(sample_rate: u32, channels: u16, data: &[u8]) -> Vec<u8> {
        let block_align = channels * 2;
        let mut wav = Vec::with_capacity(44 + data.len());
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&channels.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
        wav.extend_from_slice(data);
        wav
    }

    #[test]
    fn test_decode_wav_roundtrip() {
        // Amplitudes stay under half scale so the f32 detour is lossless
        let mut data = Vec::new();
        for i in 0..1000i32 {
            let left = ((i * 37) % 20_000 - 10_000) as i16;
            data.extend_from_slice(&left.to_le_bytes());
            data.extend_from_slice(&(-left).to_le_bytes());
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        std::fs::write(&path, wav_bytes(8000, 2, &data)).unwrap();

        let track = decode_file(&path).unwrap();
        assert_eq!(track.sample_rate, 8000);
        assert_eq!(track.channels, 2);
        assert_eq!(track.frames, 1000);
        assert_eq!(track.frames, track.pcm.len() / 4);
        assert!(track.pcm == data, "interleaved i16 LE survives decoding");
        assert!((track.duration_seconds() - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_decode_missing_file() {
        let err = decode_file(Path::new("/nonexistent/track.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Open { .. }));
    }

    #[test]
    fn test_decode_garbage_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.bin");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }
}
