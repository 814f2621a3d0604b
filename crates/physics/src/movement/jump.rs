//! Jump and gravity constants.
//!
//! Gravity and launch speeds are derived from a designer-facing description of
//! the jump (how high, how long to the apex) instead of being tuned directly.

use serde::{Deserialize, Serialize};

use super::config::ControllerConfig;

/// Constants derived once from the jump configuration.
///
/// With `h` the max jump height and `t` the apex time:
///
/// - `gravity = -2h / t²`
/// - `max_jump_velocity = |gravity| · t`
/// - `min_jump_velocity = sqrt(2 · |gravity| · min_height)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpPhysics {
    /// Vertical acceleration (negative, meters/second²).
    pub gravity: f32,
    /// Launch speed reaching the max jump height.
    pub max_jump_velocity: f32,
    /// Ascent speed cap once jump is released, reaching the min jump height.
    pub min_jump_velocity: f32,
}

impl JumpPhysics {
    /// Derive the constants from jump heights and apex time.
    ///
    /// `apex_time` must be positive; callers validate this through
    /// [`ControllerConfig::validate`].
    pub fn new(max_jump_height: f32, min_jump_height: f32, apex_time: f32) -> Self {
        let gravity = -(2.0 * max_jump_height) / (apex_time * apex_time);
        let max_jump_velocity = gravity.abs() * apex_time;
        let min_jump_velocity = (2.0 * gravity.abs() * min_jump_height).sqrt();

        Self {
            gravity,
            max_jump_velocity,
            min_jump_velocity,
        }
    }

    /// Derive the constants from a controller configuration.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            config.max_jump_height,
            config.min_jump_height,
            config.jump_apex_time,
        )
    }

    /// Allowed range for airborne vertical velocity.
    ///
    /// Falling is capped at three times the launch speed. Rising is capped at
    /// the launch speed while jump is held and at the min jump speed otherwise,
    /// which is what cuts a jump short when the button is released.
    pub fn vertical_bounds(&self, jump_held: bool) -> (f32, f32) {
        let ceiling = if jump_held {
            self.max_jump_velocity
        } else {
            self.min_jump_velocity
        };
        (-3.0 * self.max_jump_velocity, ceiling)
    }

    /// Height reached from launch speed `velocity` under this gravity.
    pub fn apex_height(&self, velocity: f32) -> f32 {
        velocity * velocity / (2.0 * self.gravity.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        let jump = JumpPhysics::new(4.0, 1.0, 1.0);
        assert_eq!(jump.gravity, -8.0);
        assert_eq!(jump.max_jump_velocity, 8.0);
        assert_eq!(jump.min_jump_velocity, 4.0);
    }

    #[test]
    fn test_apex_heights_match_config() {
        let config = ControllerConfig::arcade();
        let jump = JumpPhysics::from_config(&config);

        let max = jump.apex_height(jump.max_jump_velocity);
        let min = jump.apex_height(jump.min_jump_velocity);
        assert!((max - config.max_jump_height).abs() < 1e-4, "max apex={}", max);
        assert!((min - config.min_jump_height).abs() < 1e-4, "min apex={}", min);
    }

    #[test]
    fn test_vertical_bounds() {
        let jump = JumpPhysics::new(4.0, 1.0, 1.0);
        assert_eq!(jump.vertical_bounds(true), (-24.0, 8.0));
        assert_eq!(jump.vertical_bounds(false), (-24.0, 4.0));
    }
}
