//! Keyboard bindings, matched by key name
//!
//! Key names follow the "Shift+Ctrl+Alt+KeyName" convention, e.g. `"Space"`,
//! `"Left"`, `"Shift+Right"`. The presentation layer turns its native key
//! events into these strings and passes them to the editor.

use serde::{Deserialize, Serialize};

/// Editor actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    PlayPause,
    NudgeForward,
    NudgeBackward,
    CancelEdit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorKeybindings {
    /// Play/pause toggle
    pub play_pause: Vec<String>,
    /// Move the playhead later
    pub nudge_forward: Vec<String>,
    /// Move the playhead earlier
    pub nudge_backward: Vec<String>,
    /// Abandon the marker rename in progress
    pub cancel_edit: Vec<String>,
}

impl Default for EditorKeybindings {
    fn default() -> Self {
        Self {
            play_pause: vec!["Space".into()],
            nudge_forward: vec!["Right".into()],
            nudge_backward: vec!["Left".into()],
            cancel_edit: vec!["Escape".into()],
        }
    }
}

impl EditorKeybindings {
    /// Resolve a key name to its action
    pub fn match_action(&self, key: &str) -> Option<KeyAction> {
        let bindings = [
            (&self.play_pause, KeyAction::PlayPause),
            (&self.nudge_forward, KeyAction::NudgeForward),
            (&self.nudge_backward, KeyAction::NudgeBackward),
            (&self.cancel_edit, KeyAction::CancelEdit),
        ];
        bindings
            .iter()
            .find(|(keys, _)| keys.iter().any(|k| k == key))
            .map(|(_, action)| *action)
    }
}
