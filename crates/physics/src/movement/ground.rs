//! Ground detection.
//!
//! Each frame the capsule is swept a short distance downward. A hit counts as
//! ground when its surface faces up and is no steeper than the body's slope
//! limit. While grounded the probe is longer so the character sticks to
//! downhill slopes and small drops; while airborne it is kept short so landing
//! doesn't snap early.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{ColliderId, LayerMask, ShapeCastProvider};

use super::config::ControllerConfig;
use super::host::MovementSubstrate;
use super::state::{CharacterState, FrameTime};

/// Seconds after a jump during which ground detection is skipped, so the
/// launch frame can't immediately re-ground the character.
pub const JUMP_GROUNDING_GRACE: f32 = 0.2;

/// Outcome of one ground check.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundReport {
    /// Whether the character was grounded before the check.
    pub was_grounded: bool,
    /// Whether walkable ground was found.
    pub is_grounded: bool,
    /// Normal of the ground, or up when airborne.
    pub normal: Vec3,
    /// The ground collider, if one was found.
    pub collider: Option<ColliderId>,
    /// Distance the body was pulled down onto the ground.
    pub snapped_distance: f32,
    /// The check was skipped because a jump just happened.
    pub skipped: bool,
}

impl GroundReport {
    /// The character touched down during this check.
    pub fn landed(&self) -> bool {
        !self.was_grounded && self.is_grounded
    }

    /// The character lost support during this check.
    pub fn left_ground(&self) -> bool {
        self.was_grounded && !self.is_grounded
    }
}

/// Probes for walkable ground under the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundDetector {
    layers: LayerMask,
    distance: f32,
    distance_in_air: f32,
    grounded_step_offset: f32,
}

impl GroundDetector {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            layers: config.ground_check_layers,
            distance: config.ground_check_distance,
            distance_in_air: config.ground_check_distance_in_air,
            grounded_step_offset: config.grounded_step_offset,
        }
    }

    /// Probe length for the current grounded state.
    pub fn probe_distance(&self, grounded: bool, skin_width: f32) -> f32 {
        if grounded {
            skin_width + self.distance
        } else {
            self.distance_in_air
        }
    }

    /// Whether a surface with `normal` can be stood on.
    pub fn is_walkable(normal: Vec3, up: Vec3, slope_limit: f32) -> bool {
        normal.dot(up) > 0.0 && normal.angle_between(up).to_degrees() <= slope_limit
    }

    /// Reclassify the character as grounded or airborne.
    ///
    /// Updates `is_grounded` and `ground_normal`, snaps the body down onto
    /// ground found further than the skin width, and sets the body's step
    /// offset for the new state.
    pub fn detect(
        &self,
        state: &mut CharacterState,
        physics: &dyn ShapeCastProvider,
        body: &mut dyn MovementSubstrate,
        time: FrameTime,
    ) -> GroundReport {
        let up = body.up();
        let was_grounded = state.is_grounded;
        let probe = self.probe_distance(was_grounded, body.skin_width());

        state.is_grounded = false;
        state.ground_normal = up;

        let mut report = GroundReport {
            was_grounded,
            is_grounded: false,
            normal: up,
            collider: None,
            snapped_distance: 0.0,
            skipped: false,
        };

        if state.within_jump_grace(time.elapsed, JUMP_GROUNDING_GRACE) {
            report.skipped = true;
        } else if let Some(hit) = physics.capsule_cast(&body.capsule(), -up, probe, self.layers) {
            if Self::is_walkable(hit.normal, up, body.slope_limit()) {
                state.is_grounded = true;
                state.ground_normal = hit.normal;
                report.is_grounded = true;
                report.normal = hit.normal;
                report.collider = Some(hit.collider);

                if hit.distance > body.skin_width() {
                    let before = body.position();
                    body.move_by(-up * hit.distance);
                    report.snapped_distance = (before - body.position()).dot(up).max(0.0);
                }
            } else {
                log::trace!("rejected ground with normal {:?}", hit.normal);
            }
        }

        body.set_step_offset(if state.is_grounded {
            self.grounded_step_offset
        } else {
            0.0
        });

        report
    }
}
