//! Gamepad snapshot handed to the controllers once per step.
//!
//! Buttons live in a fixed table indexed by [`ButtonId`]; sticks and
//! triggers are addressed by their own ids. Bindings are resolved when the
//! craft is configured, never through lookups at tick time.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonId {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
    LeftStickPress,
    RightStickPress,
    Start,
    Select,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl ButtonId {
    pub const COUNT: usize = 14;

    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::South,
        ButtonId::East,
        ButtonId::West,
        ButtonId::North,
        ButtonId::LeftShoulder,
        ButtonId::RightShoulder,
        ButtonId::LeftStickPress,
        ButtonId::RightStickPress,
        ButtonId::Start,
        ButtonId::Select,
        ButtonId::DpadUp,
        ButtonId::DpadDown,
        ButtonId::DpadLeft,
        ButtonId::DpadRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerId {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickId {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamepadInput {
    pub left_stick: Vector2<f64>,
    pub right_stick: Vector2<f64>,
    pub left_trigger: f64,
    pub right_trigger: f64,
    pub buttons: [bool; ButtonId::COUNT],
}

impl Default for GamepadInput {
    fn default() -> Self {
        Self {
            left_stick: Vector2::zeros(),
            right_stick: Vector2::zeros(),
            left_trigger: 0.0,
            right_trigger: 0.0,
            buttons: [false; ButtonId::COUNT],
        }
    }
}

impl GamepadInput {
    /// Trigger pull, clamped to [0, 1].
    pub fn trigger(&self, id: TriggerId) -> f64 {
        let raw = match id {
            TriggerId::Left => self.left_trigger,
            TriggerId::Right => self.right_trigger,
        };
        if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Stick deflection, each component clamped to [-1, 1].
    pub fn stick(&self, id: StickId) -> Vector2<f64> {
        let raw = match id {
            StickId::Left => self.left_stick,
            StickId::Right => self.right_stick,
        };
        raw.map(|v| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 })
    }

    pub fn pressed(&self, id: ButtonId) -> bool {
        self.buttons[id.index()]
    }

    pub fn press(&mut self, id: ButtonId) {
        self.buttons[id.index()] = true;
    }

    pub fn with_trigger(mut self, id: TriggerId, value: f64) -> Self {
        match id {
            TriggerId::Left => self.left_trigger = value,
            TriggerId::Right => self.right_trigger = value,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_table_covers_every_id() {
        for (i, b) in ButtonId::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }

    #[test]
    fn press_sets_only_that_button() {
        let mut input = GamepadInput::default();
        input.press(ButtonId::North);
        assert!(input.pressed(ButtonId::North));
        assert!(!input.pressed(ButtonId::South));
    }

    #[test]
    fn trigger_is_clamped() {
        let input = GamepadInput::default()
            .with_trigger(TriggerId::Right, 1.7)
            .with_trigger(TriggerId::Left, f64::NAN);
        assert_eq!(input.trigger(TriggerId::Right), 1.0);
        assert_eq!(input.trigger(TriggerId::Left), 0.0);
    }
}
