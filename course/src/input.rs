//! Keyboard-to-action mapping and the shared input snapshot.
//!
//! Key events arrive from whatever surface owns the keyboard and are folded
//! into a single [`InputSnapshot`] behind a mutex. The frame loop takes one
//! copy per frame through [`InputSampler::sample`], so a frame never sees a
//! half-applied key event.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Logical driving actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Brake,
    Reset,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Brake,
        Action::Reset,
    ];

    /// Resolve a key event to an action. `key` is the logical key (matched
    /// case-insensitively), `code` the physical key code. Either may match.
    pub fn from_key(key: &str, code: &str) -> Option<Action> {
        let key = key.to_ascii_lowercase();
        match (key.as_str(), code) {
            ("w" | "arrowup", _) | (_, "KeyW" | "ArrowUp") => Some(Action::Forward),
            ("s" | "arrowdown", _) | (_, "KeyS" | "ArrowDown") => Some(Action::Backward),
            ("a" | "arrowleft", _) | (_, "KeyA" | "ArrowLeft") => Some(Action::Left),
            ("d" | "arrowright", _) | (_, "KeyD" | "ArrowRight") => Some(Action::Right),
            (" ", _) | (_, "Space") => Some(Action::Brake),
            ("r", _) | (_, "KeyR") => Some(Action::Reset),
            _ => None,
        }
    }
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTarget {
    #[default]
    World,
    /// A text field or other editable element; driving keys are ignored.
    TextEntry,
}

/// Boolean state of every action at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub reset: bool,
}

impl InputSnapshot {
    pub fn pressed(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Brake => self.brake,
            Action::Reset => self.reset,
        }
    }

    pub fn set(&mut self, action: Action, down: bool) {
        let slot = match action {
            Action::Forward => &mut self.forward,
            Action::Backward => &mut self.backward,
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Brake => &mut self.brake,
            Action::Reset => &mut self.reset,
        };
        *slot = down;
    }

    /// Builder-style variant of [`InputSnapshot::set`].
    pub fn with(mut self, action: Action, down: bool) -> Self {
        self.set(action, down);
        self
    }
}

/// Frame-side reader of the shared input state.
#[derive(Debug, Default)]
pub struct InputSampler {
    shared: Arc<Mutex<InputSnapshot>>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A producer handle feeding this sampler.
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Copy of the current state; one call per frame.
    pub fn sample(&self) -> InputSnapshot {
        *self.shared.lock()
    }
}

/// Producer side: key handlers and scripted drivers write through this.
#[derive(Debug, Clone)]
pub struct InputHandle {
    shared: Arc<Mutex<InputSnapshot>>,
}

impl InputHandle {
    pub fn set(&self, action: Action, down: bool) {
        self.shared.lock().set(action, down);
    }

    pub fn key_down(&self, key: &str, code: &str, target: KeyTarget) -> Option<Action> {
        self.key_event(key, code, true, target)
    }

    pub fn key_up(&self, key: &str, code: &str, target: KeyTarget) -> Option<Action> {
        self.key_event(key, code, false, target)
    }

    /// Apply a raw key event. Returns the action it mapped to, or `None` when
    /// the key is unmapped or focus sits in a text entry.
    pub fn key_event(&self, key: &str, code: &str, pressed: bool, target: KeyTarget) -> Option<Action> {
        if target == KeyTarget::TextEntry {
            trace!(key, code, "key ignored while typing");
            return None;
        }
        let action = Action::from_key(key, code)?;
        self.set(action, pressed);
        Some(action)
    }

    pub fn release_all(&self) {
        *self.shared.lock() = InputSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_codes_map_to_actions() {
        assert_eq!(Action::from_key("W", ""), Some(Action::Forward));
        assert_eq!(Action::from_key("", "ArrowUp"), Some(Action::Forward));
        assert_eq!(Action::from_key("x", "KeyS"), Some(Action::Backward));
        assert_eq!(Action::from_key("ArrowLeft", ""), Some(Action::Left));
        assert_eq!(Action::from_key("d", "KeyD"), Some(Action::Right));
        assert_eq!(Action::from_key(" ", ""), Some(Action::Brake));
        assert_eq!(Action::from_key("R", ""), Some(Action::Reset));
        assert_eq!(Action::from_key("q", "KeyQ"), None);
    }

    #[test]
    fn typing_target_leaves_state_untouched() {
        let sampler = InputSampler::new();
        let handle = sampler.handle();
        assert_eq!(handle.key_event("w", "KeyW", true, KeyTarget::TextEntry), None);
        assert_eq!(sampler.sample(), InputSnapshot::default());

        assert_eq!(handle.key_down("w", "KeyW", KeyTarget::World), Some(Action::Forward));
        assert!(sampler.sample().forward);
        handle.key_up("w", "KeyW", KeyTarget::World);
        assert!(!sampler.sample().forward);
    }

    #[test]
    fn sample_is_a_copy() {
        let sampler = InputSampler::new();
        let handle = sampler.handle();
        handle.set(Action::Left, true);
        let frame = sampler.sample();
        handle.release_all();
        assert!(frame.left, "earlier sample must not change after release");
        assert!(!sampler.sample().left);
    }
}
