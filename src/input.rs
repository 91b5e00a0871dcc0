//! Keyboard state to player intents
//!
//! Moving is level-triggered: it repeats every frame the key is held.
//! Dropping is edge-triggered: one press drops one fruit, however long the
//! key stays down. The edge is kept until a tick consumes it, so a press
//! that lands on a frame with no simulation tick is not lost.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
}

impl Key {
    /// Map a browser `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "KeyA" => Some(Key::A),
            "KeyD" => Some(Key::D),
            "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

/// What the player wants this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    /// -1 left, 0 none, +1 right
    pub direction: i8,
    pub drop: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left_arrow: bool,
    left_a: bool,
    right_arrow: bool,
    right_d: bool,
    drop_held: bool,
    drop_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left_arrow = true,
            Key::A => self.left_a = true,
            Key::Right => self.right_arrow = true,
            Key::D => self.right_d = true,
            Key::Space => {
                // Key repeat sends more downs while held
                if !self.drop_held {
                    self.drop_pressed = true;
                }
                self.drop_held = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left_arrow = false,
            Key::A => self.left_a = false,
            Key::Right => self.right_arrow = false,
            Key::D => self.right_d = false,
            Key::Space => self.drop_held = false,
        }
    }

    /// Read the intent for one tick, consuming the drop edge
    pub fn take_intent(&mut self) -> Intent {
        let left = self.left_arrow || self.left_a;
        let right = self.right_arrow || self.right_d;
        let direction = i8::from(right) - i8::from(left);

        let drop = std::mem::take(&mut self.drop_pressed);
        Intent { direction, drop }
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
