//! Configuration for the editor
//!
//! - Generic YAML config loading/saving
//! - Editor tuning (zoom/pan rates, marker limits, playhead cadence)
//! - Keybindings matched by key name
//! - Default config location
//!
//! # Usage
//!
//! ```ignore
//! use repeat_core::config::{default_config_path, load_config, EditorConfig};
//!
//! let config: EditorConfig = load_config(&default_config_path());
//! ```

mod editor;
mod io;
mod keybindings;
mod paths;

pub use editor::EditorConfig;
pub use io::{load_config, save_config};
pub use keybindings::{EditorKeybindings, KeyAction};
pub use paths::{default_config_dir, default_config_path};
