//! Player input handling.
//!
//! Raw device state is sampled once per tick as a [`RawInput`]. The
//! [`InputTracker`] remembers the previous sample so button presses can be
//! reported as edges in the [`InputFrame`] handed to the controller.

use droid_physics::InputFrame;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raw player input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Movement keys held.
    pub movement: MovementKeys,

    /// Mouse delta this tick, in pixels. Screen `y` grows downward.
    pub mouse_delta: (f32, f32),

    /// Action keys held.
    pub actions: ActionKeys,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionKeys {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
    pub interact: bool,
}

impl RawInput {
    /// Movement axis from the held keys: `x` strafes right, `y` moves forward.
    ///
    /// Diagonals are normalized so they aren't faster than straight movement.
    pub fn move_axis(&self) -> Vec2 {
        let keys = &self.movement;
        let mut axis = Vec2::ZERO;

        if keys.forward {
            axis.y += 1.0;
        }
        if keys.backward {
            axis.y -= 1.0;
        }
        if keys.right {
            axis.x += 1.0;
        }
        if keys.left {
            axis.x -= 1.0;
        }

        if axis.length_squared() > 1.0 {
            axis = axis.normalize();
        }
        axis
    }
}

/// Converts consecutive [`RawInput`] samples into controller input.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: ActionKeys,
    look_sensitivity: f32,
}

impl InputTracker {
    /// `look_sensitivity` is look units per pixel of mouse movement.
    pub fn new(look_sensitivity: f32) -> Self {
        Self {
            previous: ActionKeys::default(),
            look_sensitivity,
        }
    }

    pub fn look_sensitivity(&self) -> f32 {
        self.look_sensitivity
    }

    /// Build this tick's [`InputFrame`] and remember `raw` for the next one.
    pub fn frame(&mut self, raw: &RawInput) -> InputFrame {
        let now = raw.actions;
        let before = std::mem::replace(&mut self.previous, now);

        // Mouse moving up the screen looks up
        let look_axis = Vec2::new(raw.mouse_delta.0, -raw.mouse_delta.1) * self.look_sensitivity;

        InputFrame {
            move_axis: raw.move_axis(),
            look_axis,
            jump_held: now.jump,
            jump_pressed: now.jump && !before.jump,
            sprint_held: now.sprint,
            crouch_pressed: now.crouch && !before.crouch,
            interact_pressed: now.interact && !before.interact,
        }
    }

    /// Forget held buttons, e.g. after focus loss, so the next press is an edge.
    pub fn reset(&mut self) {
        self.previous = ActionKeys::default();
    }
}
