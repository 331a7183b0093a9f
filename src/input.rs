//! Keyboard state and per-frame input snapshots
//!
//! The host records which keys are held, keyed by lowercased key name
//! (`"w"`, `"arrowup"`, `" "` for space). Once per frame the game takes an
//! immutable [`InputSnapshot`] of that state; nothing in the simulation reads
//! key state directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::HashMap;

/// Held-key bookkeeping for one keyboard
///
/// Terminals that do not report key releases can still drive the car: a press
/// is held for a fixed number of frames and extended by auto-repeat.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    /// Key name -> frames left (`None` = held until released)
    held: HashMap<String, Option<u32>>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key held until [`KeyState::release`]
    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase(), None);
    }

    /// Mark a key held for `frames` frames unless it is already latched
    pub fn press_for(&mut self, key: &str, frames: u32) {
        let entry = self.held.entry(key.to_lowercase()).or_insert(Some(0));
        if let Some(left) = entry {
            *left = (*left).max(frames);
        }
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains_key(key)
    }

    /// Count down timed presses; call once at the end of every frame
    pub fn end_frame(&mut self) {
        self.held.retain(|_, left| match left {
            None => true,
            Some(frames) => {
                *frames = frames.saturating_sub(1);
                *frames > 0
            }
        });
    }

    /// Apply a terminal key event
    ///
    /// With `reports_release` the press/release pairs are trusted; otherwise
    /// every press or repeat holds the key for `hold_frames` frames.
    pub fn apply_event(&mut self, event: &KeyEvent, reports_release: bool, hold_frames: u32) {
        let Some(name) = key_name(event.code) else {
            return;
        };

        match (event.kind, reports_release) {
            (KeyEventKind::Release, _) => self.release(&name),
            (_, true) => self.press(&name),
            (_, false) => self.press_for(&name, hold_frames),
        }
    }

    /// Freeze the current key state for this frame
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            forward: self.is_held("w") || self.is_held("arrowup"),
            reverse: self.is_held("s") || self.is_held("arrowdown"),
            left: self.is_held("a") || self.is_held("arrowleft"),
            right: self.is_held("d") || self.is_held("arrowright"),
            brake: self.is_held(" "),
            reset: self.is_held("r"),
        }
    }
}

/// Lowercased key name for a terminal key code
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_lowercase().collect()),
        KeyCode::Up => "arrowup",
        KeyCode::Down => "arrowdown",
        KeyCode::Left => "arrowleft",
        KeyCode::Right => "arrowright",
        KeyCode::Esc => "escape",
        KeyCode::Enter => "enter",
        _ => return None,
    };
    Some(name.to_string())
}

/// Driving controls held during one frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub reset: bool,
}

impl InputSnapshot {
    /// Snapshot with only the forward key held
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Build a snapshot from key names, e.g. `["w", "a"]`
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut state = KeyState::new();
        for key in keys {
            state.press(key);
        }
        state.snapshot()
    }
}
