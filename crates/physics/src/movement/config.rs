//! Controller configuration.
//!
//! All tunables are grouped here for easy tuning. Distances are in meters,
//! times in seconds, angles in degrees.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::LayerMask;

/// Errors produced when validating or loading a [`ControllerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("jump apex time must be finite and positive, got {0}")]
    NonPositiveApexTime(f32),

    #[error("jump heights must not be negative, got {0}")]
    NegativeJumpHeight(f32),

    #[error("minimum jump height {min} exceeds maximum jump height {max}")]
    InvertedJumpHeights { min: f32, max: f32 },

    #[error("crouching height {crouching} must be positive and no taller than standing height {standing}")]
    InvalidHeights { standing: f32, crouching: f32 },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidRatio { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the character controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // ========================================================================
    // Ground Check
    // ========================================================================
    /// Layers considered when probing for ground.
    pub ground_check_layers: LayerMask,

    /// Probe distance beyond the skin width while grounded.
    pub ground_check_distance: f32,

    /// Probe distance while airborne. Kept small so landing doesn't snap early.
    pub ground_check_distance_in_air: f32,

    /// Step offset handed to the substrate while grounded.
    pub grounded_step_offset: f32,

    // ========================================================================
    // Movement
    // ========================================================================
    /// Maximum speed on the ground (meters/second).
    pub max_speed_on_ground: f32,

    /// How quickly ground velocity converges on the target (1/second).
    pub movement_sharpness_on_ground: f32,

    /// Fraction of ground speed kept while crouched.
    pub crouch_speed_ratio: f32,

    /// Speed multiplier while sprinting. 1.0 leaves sprint as a no-op.
    pub sprint_speed_ratio: f32,

    /// Maximum horizontal speed while airborne. Capped at the ground speed.
    pub max_speed_in_air: f32,

    /// Horizontal acceleration from input while airborne (meters/second²).
    pub acceleration_in_air: f32,

    /// Layers the post-move obstruction sweep collides with.
    pub collision_layers: LayerMask,

    // ========================================================================
    // Looking Around
    // ========================================================================
    /// Degrees of rotation per unit of look input.
    pub rotation_speed: f32,

    // ========================================================================
    // Jump
    // ========================================================================
    /// Apex height when jump is held for the whole ascent.
    pub max_jump_height: f32,

    /// Apex height when jump is released immediately.
    pub min_jump_height: f32,

    /// Time to reach the apex of a full jump.
    pub jump_apex_time: f32,

    // ========================================================================
    // Stance
    // ========================================================================
    /// Camera pivot height as a fraction of the capsule height.
    pub camera_height_ratio: f32,

    /// Capsule height when standing.
    pub standing_height: f32,

    /// Capsule height when crouching.
    pub crouching_height: f32,

    /// How quickly the capsule height converges on the target (1/second).
    pub crouching_sharpness: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Ground check
            ground_check_layers: LayerMask::MASK_SOLID,
            ground_check_distance: 0.05,
            ground_check_distance_in_air: 0.07,
            grounded_step_offset: 0.3,

            // Movement
            max_speed_on_ground: 10.0,
            movement_sharpness_on_ground: 15.0,
            crouch_speed_ratio: 0.5,
            sprint_speed_ratio: 1.0,
            max_speed_in_air: 10.0,
            acceleration_in_air: 25.0,
            collision_layers: LayerMask::MASK_SOLID,

            // Looking around
            rotation_speed: 1.0,

            // Jump
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            jump_apex_time: 1.0,

            // Stance
            camera_height_ratio: 0.9,
            standing_height: 1.8,
            crouching_height: 1.0,
            crouching_sharpness: 10.0,
        }
    }
}

impl ControllerConfig {
    /// A quick, low-gravity platformer feel.
    pub fn arcade() -> Self {
        Self {
            max_speed_on_ground: 12.0,
            movement_sharpness_on_ground: 20.0,
            sprint_speed_ratio: 1.5,
            max_speed_in_air: 12.0,
            acceleration_in_air: 40.0,
            max_jump_height: 3.0,
            min_jump_height: 0.8,
            jump_apex_time: 0.45,
            ..Default::default()
        }
    }

    /// A slow, weighty feel with short jumps and little air control.
    pub fn heavy() -> Self {
        Self {
            max_speed_on_ground: 5.0,
            movement_sharpness_on_ground: 8.0,
            crouch_speed_ratio: 0.4,
            max_speed_in_air: 4.0,
            acceleration_in_air: 6.0,
            max_jump_height: 1.2,
            min_jump_height: 0.5,
            jump_apex_time: 0.35,
            crouching_sharpness: 6.0,
            ..Default::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this config as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the config describes a physically meaningful controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jump_apex_time.is_finite() || self.jump_apex_time <= 0.0 {
            return Err(ConfigError::NonPositiveApexTime(self.jump_apex_time));
        }
        for height in [self.min_jump_height, self.max_jump_height] {
            if !(height >= 0.0) {
                return Err(ConfigError::NegativeJumpHeight(height));
            }
        }
        if self.min_jump_height > self.max_jump_height {
            return Err(ConfigError::InvertedJumpHeights {
                min: self.min_jump_height,
                max: self.max_jump_height,
            });
        }
        if !(self.crouching_height > 0.0 && self.crouching_height <= self.standing_height) {
            return Err(ConfigError::InvalidHeights {
                standing: self.standing_height,
                crouching: self.crouching_height,
            });
        }

        for (name, value) in [
            ("crouch_speed_ratio", self.crouch_speed_ratio),
            ("camera_height_ratio", self.camera_height_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRatio { name, value });
            }
        }

        for (name, value) in [
            ("ground_check_distance", self.ground_check_distance),
            ("ground_check_distance_in_air", self.ground_check_distance_in_air),
            ("max_speed_on_ground", self.max_speed_on_ground),
            ("movement_sharpness_on_ground", self.movement_sharpness_on_ground),
            ("sprint_speed_ratio", self.sprint_speed_ratio),
            ("max_speed_in_air", self.max_speed_in_air),
            ("crouching_sharpness", self.crouching_sharpness),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        Ok(())
    }

    /// Capsule height for the given stance.
    pub fn height(&self, crouching: bool) -> f32 {
        if crouching {
            self.crouching_height
        } else {
            self.standing_height
        }
    }

    /// Speed multiplier for the given stance and sprint state.
    pub fn speed_modifier(&self, crouching: bool, sprinting: bool) -> f32 {
        if crouching {
            self.crouch_speed_ratio
        } else if sprinting {
            self.sprint_speed_ratio
        } else {
            1.0
        }
    }

    /// Air speed cap, never faster than ground movement.
    pub fn effective_max_speed_in_air(&self) -> f32 {
        self.max_speed_in_air.min(self.max_speed_on_ground)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        config.validate().unwrap();
        ControllerConfig::arcade().validate().unwrap();
        ControllerConfig::heavy().validate().unwrap();
    }

    #[test]
    fn test_speed_modifier() {
        let config = ControllerConfig {
            sprint_speed_ratio: 1.5,
            ..Default::default()
        };

        assert_eq!(config.speed_modifier(false, false), 1.0);
        assert_eq!(config.speed_modifier(false, true), 1.5);
        assert_eq!(config.speed_modifier(true, false), config.crouch_speed_ratio);
        // Crouching overrides sprinting
        assert_eq!(config.speed_modifier(true, true), config.crouch_speed_ratio);
    }

    #[test]
    fn test_air_speed_capped_by_ground_speed() {
        let config = ControllerConfig {
            max_speed_on_ground: 6.0,
            max_speed_in_air: 9.0,
            ..Default::default()
        };
        assert_eq!(config.effective_max_speed_in_air(), 6.0);
    }

    #[test]
    fn test_rejects_zero_apex_time() {
        let config = ControllerConfig {
            jump_apex_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveApexTime(_))));
    }

    #[test]
    fn test_rejects_inverted_jump_heights() {
        let config = ControllerConfig {
            min_jump_height: 5.0,
            max_jump_height: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedJumpHeights { .. })
        ));
    }

    #[test]
    fn test_rejects_crouch_taller_than_standing() {
        let config = ControllerConfig {
            crouching_height: 2.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHeights { .. })));
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let config = ControllerConfig {
            camera_height_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio { name: "camera_height_ratio", .. })
        ));
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = ControllerConfig::from_json_str(r#"{ "max_jump_height": 2.5 }"#).unwrap();
        assert_eq!(config.max_jump_height, 2.5);
        assert_eq!(config.jump_apex_time, ControllerConfig::default().jump_apex_time);
    }

    #[test]
    fn test_json_round_trip_preserves_preset() {
        let preset = ControllerConfig::arcade();
        let json = preset.to_json_string().unwrap();
        assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), preset);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let result = ControllerConfig::from_json_str(r#"{ "min_jump_height": 9.0 }"#);
        assert!(matches!(result, Err(ConfigError::InvertedJumpHeights { .. })));

        let result = ControllerConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
