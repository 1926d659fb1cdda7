//! Interaction modes and the pure transition table
//!
//! The presentation layer hit-tests every pointer event and hands the editor
//! a `(PointerEvent, HitTarget)` pair. [`transition`] maps the current mode
//! and that pair to the next mode; side effects live in the editor's
//! per-mode handlers.
//!
//! Two modes lock out region-based transitions:
//! - `MarkerDrag`: only `Release` leaves it.
//! - `MarkerEdit`: only a press on the backdrop leaves it (submit and
//!   Escape are handled outside the pointer path).

use crate::markers::MarkerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    HitWave,
    MarkerLifeArea,
    MarkerCreateIntent,
    MarkerDeleteIntent,
    MarkerHit,
    MarkerEditIntent,
    MarkerEdit,
    MarkerDrag,
}

impl Mode {
    /// Modes in which the marker strip's affordances are shown
    pub fn is_marker_adjacent(self) -> bool {
        matches!(
            self,
            Mode::MarkerLifeArea | Mode::MarkerCreateIntent | Mode::MarkerDeleteIntent
        )
    }

    /// Modes that ignore hit-region changes
    pub fn is_locked(self) -> bool {
        matches!(self, Mode::MarkerDrag | Mode::MarkerEdit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Pointer,
    Grab,
    Grabbing,
    Text,
}

/// Region under the pointer, as classified by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    None,
    Wave,
    /// Strip above the wave where marker poles stand
    MarkerLifeArea,
    MarkerCreateAffordance,
    MarkerPole(MarkerId),
    /// Delete affordance on a marker's flag
    MarkerFlag(MarkerId),
    MarkerLabel(MarkerId),
    /// Overlay that catches clicks outside the rename input
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Move,
    Press,
    Release,
    Drag,
    Scroll,
}

/// Pointer event in wave-area coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub scroll_dx: f32,
    pub scroll_dy: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            scroll_dx: 0.0,
            scroll_dy: 0.0,
        }
    }

    pub fn press(x: f32) -> Self {
        Self::new(PointerKind::Press, x, 0.0)
    }

    pub fn release(x: f32) -> Self {
        Self::new(PointerKind::Release, x, 0.0)
    }

    pub fn drag(x: f32) -> Self {
        Self::new(PointerKind::Drag, x, 0.0)
    }

    pub fn moved(x: f32) -> Self {
        Self::new(PointerKind::Move, x, 0.0)
    }

    pub fn scroll(x: f32, scroll_dx: f32, scroll_dy: f32) -> Self {
        Self {
            scroll_dx,
            scroll_dy,
            ..Self::new(PointerKind::Scroll, x, 0.0)
        }
    }
}

/// Which parts of a marker are interactive this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerInteraction {
    /// Delete flag shown
    pub flag: bool,
    /// Pole accepts hover/drag
    pub pole: bool,
    /// Label shown and clickable
    pub label: bool,
    /// This marker holds the hover
    pub hovered: bool,
}

/// Next mode for an event, before handler side effects
pub fn transition(mode: Mode, kind: PointerKind, target: HitTarget) -> Mode {
    match mode {
        Mode::MarkerDrag => match kind {
            PointerKind::Release => Mode::HitWave,
            _ => Mode::MarkerDrag,
        },
        Mode::MarkerEdit => match (kind, target) {
            (PointerKind::Press, HitTarget::Backdrop) => Mode::Idle,
            _ => Mode::MarkerEdit,
        },
        _ => match target {
            HitTarget::None | HitTarget::Backdrop => Mode::Idle,
            HitTarget::Wave => Mode::HitWave,
            HitTarget::MarkerLifeArea => Mode::MarkerLifeArea,
            HitTarget::MarkerCreateAffordance if kind == PointerKind::Press => Mode::MarkerEdit,
            HitTarget::MarkerCreateAffordance => Mode::MarkerCreateIntent,
            HitTarget::MarkerFlag(_) => Mode::MarkerDeleteIntent,
            HitTarget::MarkerPole(_) if kind == PointerKind::Drag => Mode::MarkerDrag,
            HitTarget::MarkerPole(_) => Mode::MarkerHit,
            HitTarget::MarkerLabel(_) if kind == PointerKind::Press => Mode::MarkerEdit,
            HitTarget::MarkerLabel(_) => Mode::MarkerEditIntent,
        },
    }
}

pub fn cursor_for(mode: Mode) -> Cursor {
    match mode {
        Mode::Idle | Mode::MarkerLifeArea => Cursor::Default,
        Mode::HitWave => Cursor::Crosshair,
        Mode::MarkerCreateIntent | Mode::MarkerDeleteIntent => Cursor::Pointer,
        Mode::MarkerHit => Cursor::Grab,
        Mode::MarkerDrag => Cursor::Grabbing,
        Mode::MarkerEditIntent | Mode::MarkerEdit => Cursor::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [PointerKind; 6] = [
        PointerKind::Enter,
        PointerKind::Move,
        PointerKind::Press,
        PointerKind::Release,
        PointerKind::Drag,
        PointerKind::Scroll,
    ];

    fn all_targets() -> Vec<HitTarget> {
        let id = crate::markers::MarkerStore::new(100, 1).create(0).unwrap();
        vec![
            HitTarget::None,
            HitTarget::Wave,
            HitTarget::MarkerLifeArea,
            HitTarget::MarkerCreateAffordance,
            HitTarget::MarkerPole(id),
            HitTarget::MarkerFlag(id),
            HitTarget::MarkerLabel(id),
            HitTarget::Backdrop,
        ]
    }

    #[test]
    fn test_region_transitions() {
        let id = crate::markers::MarkerStore::new(100, 1).create(0).unwrap();
        let mv = PointerKind::Move;
        assert_eq!(transition(Mode::Idle, mv, HitTarget::Wave), Mode::HitWave);
        assert_eq!(transition(Mode::HitWave, mv, HitTarget::None), Mode::Idle);
        assert_eq!(transition(Mode::HitWave, mv, HitTarget::MarkerLifeArea), Mode::MarkerLifeArea);
        assert_eq!(
            transition(Mode::MarkerLifeArea, mv, HitTarget::MarkerCreateAffordance),
            Mode::MarkerCreateIntent
        );
        assert_eq!(transition(Mode::Idle, mv, HitTarget::MarkerFlag(id)), Mode::MarkerDeleteIntent);
        assert_eq!(transition(Mode::Idle, mv, HitTarget::MarkerPole(id)), Mode::MarkerHit);
        assert_eq!(transition(Mode::MarkerHit, PointerKind::Drag, HitTarget::MarkerPole(id)), Mode::MarkerDrag);
        assert_eq!(transition(Mode::Idle, mv, HitTarget::MarkerLabel(id)), Mode::MarkerEditIntent);
        assert_eq!(
            transition(Mode::MarkerEditIntent, PointerKind::Press, HitTarget::MarkerLabel(id)),
            Mode::MarkerEdit
        );
    }

    #[test]
    fn test_drag_lock_holds_for_everything_but_release() {
        for target in all_targets() {
            for kind in ALL_KINDS {
                let next = transition(Mode::MarkerDrag, kind, target);
                let expected = if kind == PointerKind::Release {
                    Mode::HitWave
                } else {
                    Mode::MarkerDrag
                };
                assert_eq!(next, expected, "{:?} on {:?}", kind, target);
            }
        }
    }

    #[test]
    fn test_edit_lock_only_yields_to_backdrop_press() {
        for target in all_targets() {
            for kind in ALL_KINDS {
                let next = transition(Mode::MarkerEdit, kind, target);
                if kind == PointerKind::Press && target == HitTarget::Backdrop {
                    assert_eq!(next, Mode::Idle);
                } else {
                    assert_eq!(next, Mode::MarkerEdit, "{:?} on {:?}", kind, target);
                }
            }
        }
    }

    #[test]
    fn test_cursors() {
        assert_eq!(cursor_for(Mode::HitWave), Cursor::Crosshair);
        assert_eq!(cursor_for(Mode::MarkerHit), Cursor::Grab);
        assert_eq!(cursor_for(Mode::MarkerDrag), Cursor::Grabbing);
        assert_eq!(cursor_for(Mode::MarkerEditIntent), Cursor::Text);
        assert_eq!(cursor_for(Mode::Idle), Cursor::Default);
    }
}
