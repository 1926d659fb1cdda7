//! cpal playback for the editor
//!
//! Lock-free split between the UI and the output callback:
//! - Commands sent via `rtrb` SPSC ringbuffer (UI → Audio)
//! - State read via atomics (Audio → UI)
//! - The callback owns the playback cursor; the PCM buffer is shared read-only
//!
//! ```text
//! ┌──────────────────┐   push()    ┌──────────────────┐   pop()   ┌──────────────────┐
//! │  CpalTransport   │────────────►│  Command Queue   │──────────►│  PlaybackState   │
//! │   (UI thread)    │             │ (SPSC, 64 slots) │           │ (cpal callback)  │
//! └──────────────────┘             └──────────────────┘           └────────┬─────────┘
//!          ▲                                                               │
//!          │            Relaxed atomics (position, playing, exhausted)     │
//!          └───────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use crossbeam::channel::{bounded, Receiver, Sender};

use repeat_core::decode::DecodedTrack;
use repeat_core::error::{TransportError, TransportResult};
use repeat_core::transport::Transport;
use repeat_core::types::{TrackInfo, I16_SCALE};

use crate::error::{AudioError, AudioResult};

/// Commands sent from UI to audio thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Jump to a frame; `generation` lets the UI tell when it has landed
    Seek { frame: u64, generation: u64 },
    /// Output gain in [0, 1]
    SetVolume(f32),
}

/// Create a player command channel
///
/// Returns (sender, receiver) pair with 64-command capacity
pub fn player_command_channel() -> (rtrb::Producer<PlayerCommand>, rtrb::Consumer<PlayerCommand>) {
    rtrb::RingBuffer::new(64)
}

/// Command sender for UI thread
pub struct CommandSender {
    producer: rtrb::Producer<PlayerCommand>,
}

impl CommandSender {
    /// Send a command to the audio thread
    ///
    /// Returns Err if the queue is full (command dropped)
    pub fn send(&mut self, cmd: PlayerCommand) -> Result<(), PlayerCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }
}

/// Lock-free atomics for UI to read playback state
pub struct PlaybackAtomics {
    /// Bytes handed to the device so far
    pub position: AtomicU64,
    /// Bytes in the most recent device buffer
    pub buffered: AtomicU64,
    /// Whether the callback is producing audio
    pub playing: AtomicBool,
    /// Raised when the callback runs off the end of the track
    pub exhausted: AtomicBool,
    /// Last seek generation the callback applied
    pub applied_seek: AtomicU64,
}

impl PlaybackAtomics {
    fn new() -> Self {
        Self {
            position: AtomicU64::new(0),
            buffered: AtomicU64::new(0),
            playing: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
            applied_seek: AtomicU64::new(0),
        }
    }

    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    pub fn buffered(&self) -> u64 {
        self.buffered.load(Ordering::Relaxed)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Audio thread
// =============================================================================

/// Playback cursor owned by the output callback
pub struct PlaybackState {
    pcm: Arc<[i16]>,
    channels: usize,
    frames: usize,
    block_align: u64,
    frame: usize,
    playing: bool,
    volume: f32,
    announce_ready: bool,
    command_rx: rtrb::Consumer<PlayerCommand>,
    atomics: Arc<PlaybackAtomics>,
    ready_tx: Sender<()>,
}

impl PlaybackState {
    /// Fill one interleaved device buffer of `out_channels` channels
    pub fn process(&mut self, data: &mut [f32], out_channels: usize) {
        self.apply_commands();

        let out_channels = out_channels.max(1);
        let mut written = 0u64;
        for out in data.chunks_mut(out_channels) {
            if !self.playing {
                out.fill(0.0);
                continue;
            }
            if self.frame >= self.frames {
                self.playing = false;
                self.atomics.playing.store(false, Ordering::Relaxed);
                self.atomics.exhausted.store(true, Ordering::Relaxed);
                out.fill(0.0);
                continue;
            }
            self.write_frame(out);
            self.frame += 1;
            written += 1;
        }

        self.atomics
            .position
            .store(self.frame as u64 * self.block_align, Ordering::Relaxed);
        self.atomics
            .buffered
            .store(written * self.block_align, Ordering::Relaxed);

        if self.announce_ready && written > 0 {
            self.announce_ready = false;
            let _ = self.ready_tx.try_send(());
        }
    }

    fn apply_commands(&mut self) {
        while let Ok(cmd) = self.command_rx.pop() {
            match cmd {
                PlayerCommand::Play => {
                    self.playing = self.frame < self.frames;
                    self.announce_ready = self.playing;
                }
                PlayerCommand::Pause => self.playing = false,
                PlayerCommand::Seek { frame, generation } => {
                    self.frame = (frame as usize).min(self.frames);
                    self.atomics
                        .position
                        .store(self.frame as u64 * self.block_align, Ordering::Relaxed);
                    self.atomics.applied_seek.store(generation, Ordering::Release);
                }
                PlayerCommand::SetVolume(volume) => self.volume = volume,
            }
        }
        self.atomics.playing.store(self.playing, Ordering::Relaxed);
    }

    fn write_frame(&self, out: &mut [f32]) {
        let base = self.frame * self.channels;
        let sample = |i: usize| self.pcm[base + i] as f32 / I16_SCALE * self.volume;
        match (self.channels, out.len()) {
            (1, _) => out.fill(sample(0)),
            (_, 1) => out[0] = (sample(0) + sample(1)) * 0.5,
            _ => {
                out[0] = sample(0);
                out[1] = sample(1);
                for ch in out.iter_mut().skip(2) {
                    *ch = 0.0;
                }
            }
        }
    }
}

// =============================================================================
// UI side
// =============================================================================

/// [`Transport`] backed by a cpal output stream
///
/// Drop this to stop audio.
pub struct CpalTransport {
    _stream: Option<Stream>,
    command_sender: Option<CommandSender>,
    atomics: Arc<PlaybackAtomics>,
    ready_rx: Option<Receiver<()>>,
    track: TrackInfo,
    ready_timeout: Duration,
    /// Last position requested by a seek, until the callback applies it
    position_mirror: i64,
    seek_generation: u64,
    playing: bool,
}

impl CpalTransport {
    /// Open the default output device at the track's sample rate
    pub fn open(decoded: &DecodedTrack, ready_timeout: Duration) -> AudioResult<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| AudioError::NoDefaultDevice("No default output device".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        log::info!("Using audio device: {}", device_name);

        let stream_config = get_output_config(&device, decoded.sample_rate)?;
        let out_channels = stream_config.channels as usize;
        log::info!(
            "Audio config: {} channels, {}Hz",
            stream_config.channels,
            stream_config.sample_rate.0
        );

        let (mut transport, mut state) = Self::connected(decoded, ready_timeout);
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    state.process(data, out_channels);
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::StreamBuildError(e.to_string()))?;
        stream
            .play()
            .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;
        log::info!("Audio stream started");

        transport._stream = Some(stream);
        Ok(transport)
    }

    /// Transport with a live command channel but no device attached
    fn connected(decoded: &DecodedTrack, ready_timeout: Duration) -> (Self, PlaybackState) {
        let track = TrackInfo::new(decoded.sample_rate, decoded.channels, decoded.pcm.len());
        let pcm: Arc<[i16]> = decoded
            .pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        let channels = decoded.channels.max(1) as usize;
        let frames = pcm.len() / channels;

        let (producer, consumer) = player_command_channel();
        let (ready_tx, ready_rx) = bounded(1);
        let atomics = Arc::new(PlaybackAtomics::new());

        let state = PlaybackState {
            pcm,
            channels,
            frames,
            block_align: track.block_align() as u64,
            frame: 0,
            playing: false,
            volume: 1.0,
            announce_ready: false,
            command_rx: consumer,
            atomics: Arc::clone(&atomics),
            ready_tx,
        };
        let transport = Self {
            _stream: None,
            command_sender: Some(CommandSender { producer }),
            atomics,
            ready_rx: Some(ready_rx),
            track,
            ready_timeout,
            position_mirror: 0,
            seek_generation: 0,
            playing: false,
        };
        (transport, state)
    }

    /// Create a transport with no audio thread (`--no-play`, or no device)
    pub fn disconnected(decoded: &DecodedTrack) -> Self {
        Self {
            _stream: None,
            command_sender: None,
            atomics: Arc::new(PlaybackAtomics::new()),
            ready_rx: None,
            track: TrackInfo::new(decoded.sample_rate, decoded.channels, decoded.pcm.len()),
            ready_timeout: Duration::ZERO,
            position_mirror: 0,
            seek_generation: 0,
            playing: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.command_sender.is_some()
    }

    fn send(&mut self, cmd: PlayerCommand) -> TransportResult<()> {
        let sender = self.command_sender.as_mut().ok_or(TransportError::Disconnected)?;
        sender.send(cmd).map_err(|cmd| {
            log::warn!("CpalTransport: command queue full, dropped {:?}", cmd);
            TransportError::SeekFailed("command queue full".to_string())
        })
    }

    fn seek_aligned(&mut self, offset: i64) -> TransportResult<i64> {
        let reached = self.track.align_pcm(offset);
        let frame = (reached / self.track.block_align()) as u64;
        let generation = self.seek_generation + 1;
        self.send(PlayerCommand::Seek { frame, generation })?;
        self.seek_generation = generation;
        self.position_mirror = reached;
        Ok(reached)
    }
}

impl Transport for CpalTransport {
    fn play(&mut self) {
        if let Some(rx) = &self.ready_rx {
            while rx.try_recv().is_ok() {}
        }
        match self.send(PlayerCommand::Play) {
            Ok(()) => self.playing = true,
            Err(e) => log::debug!("CpalTransport: play ignored: {}", e),
        }
    }

    fn pause(&mut self) {
        self.playing = false;
        if let Err(e) = self.send(PlayerCommand::Pause) {
            log::debug!("CpalTransport: pause ignored: {}", e);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let Err(e) = self.send(PlayerCommand::SetVolume(volume.clamp(0.0, 1.0))) {
            log::debug!("CpalTransport: volume ignored: {}", e);
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek_to_seconds(&mut self, seconds: f32) -> TransportResult<i64> {
        if self.track.seconds <= 0.0 {
            return self.seek_aligned(0);
        }
        let offset = seconds as f64 * self.track.pcm_len as f64 / self.track.seconds as f64;
        self.seek_aligned(offset as i64)
    }

    fn seek_to_byte_offset(&mut self, offset: i64) -> TransportResult<i64> {
        self.seek_aligned(offset)
    }

    fn buffered_bytes(&self) -> i64 {
        self.atomics.buffered() as i64
    }

    fn bytes_read(&self) -> i64 {
        if self.atomics.applied_seek.load(Ordering::Acquire) != self.seek_generation {
            return self.position_mirror;
        }
        (self.atomics.position() as i64 - self.buffered_bytes()).max(0)
    }

    fn wait_until_ready(&mut self) -> bool {
        match &self.ready_rx {
            Some(rx) => rx.recv_timeout(self.ready_timeout).is_ok(),
            None => false,
        }
    }

    fn take_exhausted(&mut self) -> bool {
        let exhausted = self.atomics.exhausted.swap(false, Ordering::Relaxed);
        if exhausted {
            self.playing = false;
        }
        exhausted
    }
}

/// Pick an f32 output config that runs at `sample_rate`
fn get_output_config(device: &cpal::Device, sample_rate: u32) -> AudioResult<StreamConfig> {
    let supported_configs: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .collect();

    if supported_configs.is_empty() {
        return Err(AudioError::ConfigError(
            "No supported output configurations".to_string(),
        ));
    }

    let in_range = |c: &&cpal::SupportedStreamConfigRange| {
        c.sample_format() == SampleFormat::F32
            && sample_rate >= c.min_sample_rate().0
            && sample_rate <= c.max_sample_rate().0
    };
    let best = supported_configs
        .iter()
        .filter(in_range)
        .find(|c| c.channels() >= 2)
        .or_else(|| supported_configs.iter().find(in_range))
        .ok_or(AudioError::UnsupportedSampleRate(sample_rate))?;

    let config = best.clone().with_sample_rate(cpal::SampleRate(sample_rate));
    Ok(StreamConfig {
        channels: config.channels(),
        sample_rate: config.sample_rate(),
        buffer_size: cpal::BufferSize::Default,
    })
}
