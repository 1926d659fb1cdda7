//! re-peat player - headless front-end for the waveform editor
//!
//! Decodes a track, prints a waveform overview with a seconds ruler, then
//! plays it through the default output device while following the playhead.
//!
//! ## Usage
//!
//! `repeat-player <audio-file> [--config <path>] [--width <px>] [--no-play]`
//!
//! - `--config`: editor config YAML (default `~/.config/re-peat/config.yaml`)
//! - `--width`: overview width in columns (default 100)
//! - `--no-play`: print the overview and exit

mod audio;
mod error;

use std::path::PathBuf;

use anyhow::{bail, Context};

use audio::CpalTransport;
use repeat_core::config::{default_config_path, load_config, EditorConfig};
use repeat_core::decode::decode_file;
use repeat_core::peaks::PeakPair;
use repeat_core::ruler::RulerTick;
use repeat_core::Editor;

/// Overview width when `--width` is not given
const DEFAULT_WIDTH: u32 = 100;

/// Text rows in the overview
const OVERVIEW_ROWS: u32 = 9;

#[derive(Debug, PartialEq)]
struct Args {
    path: PathBuf,
    config: Option<PathBuf>,
    width: u32,
    no_play: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut path = None;
    let mut config = None;
    let mut width = DEFAULT_WIDTH;
    let mut no_play = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(value));
            }
            "--width" => {
                let value = args.next().context("--width needs a value")?;
                width = value
                    .parse()
                    .with_context(|| format!("invalid --width: {}", value))?;
                if width == 0 {
                    bail!("--width must be at least 1");
                }
            }
            "--no-play" => no_play = true,
            flag if flag.starts_with("--") => bail!("unknown flag: {}", flag),
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument: {}", arg),
        }
    }

    Ok(Args {
        path: path.context("usage: repeat-player <audio-file> [--config <path>] [--width <px>] [--no-play]")?,
        config,
        width,
        no_play,
    })
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("repeat-player starting up");

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config: EditorConfig = load_config(&config_path);

    let decoded = decode_file(&args.path).with_context(|| format!("decoding {:?}", args.path))?;

    let transport = if args.no_play {
        CpalTransport::disconnected(&decoded)
    } else {
        match CpalTransport::open(&decoded, config.ready_timeout()) {
            Ok(transport) => transport,
            Err(e) => {
                log::warn!("Audio output unavailable, continuing without playback: {}", e);
                CpalTransport::disconnected(&decoded)
            }
        }
    };

    let mut editor = Editor::new(&decoded, transport, &config).context("loading track into editor")?;
    editor.resize(args.width, OVERVIEW_ROWS);
    editor.rebuild_peaks_if_needed();

    println!("{}  ({:.1}s)", args.path.display(), editor.track().seconds);
    for line in render_overview(&editor.pixel_envelopes(), OVERVIEW_ROWS as usize) {
        println!("{}", line);
    }
    println!("{}", render_ruler(&editor.ruler_ticks(), args.width as usize));

    if args.no_play || !editor.transport().is_connected() {
        return Ok(());
    }

    let play_key = config
        .keybindings
        .play_pause
        .first()
        .map(String::as_str)
        .unwrap_or("Space");
    editor.handle_key_event(play_key);

    let mut last_second = None;
    loop {
        let running = editor.end_frame();
        let second = editor.playhead_seconds().floor() as u64;
        if last_second != Some(second) {
            log::info!("Playhead {:>4}s  (x = {:.0})", second, editor.playhead_position_px());
            last_second = Some(second);
        }
        if !running {
            break;
        }
        std::thread::sleep(editor.refresh_interval());
    }

    log::info!("Playback finished");
    Ok(())
}

/// Text rows for per-column `(min, max)` envelopes, top row first
fn render_overview(envelopes: &[PeakPair], rows: usize) -> Vec<String> {
    (0..rows)
        .map(|row| {
            let level = 1.0 - (row as f32 + 0.5) * 2.0 / rows as f32;
            envelopes
                .iter()
                .map(|&(min, max)| if level >= min && level <= max { '#' } else { ' ' })
                .collect()
        })
        .collect()
}

/// Tick marks with second labels on one line
fn render_ruler(ticks: &[RulerTick], width: usize) -> String {
    let mut line = vec![' '; width];
    for tick in ticks.iter().filter(|t| t.labeled) {
        let x = tick.x_px.round() as usize;
        if x >= width {
            continue;
        }
        line[x] = '|';
        for (i, c) in format!("{}s", tick.second).chars().enumerate() {
            if let Some(slot) = line.get_mut(x + 1 + i) {
                *slot = c;
            }
        }
    }
    line.into_iter().collect()
}
