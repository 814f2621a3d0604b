//! Crouching and standing.
//!
//! Crouching is always allowed. Standing up is refused while anything solid
//! overlaps the standing-height capsule. The capsule height and camera pivot
//! then ease toward the stance's target height.

use glam::Vec3;

use crate::collision::{LayerMask, ShapeCastProvider};

use super::config::ControllerConfig;
use super::host::{CameraHost, MovementSubstrate, StanceObserver};
use super::state::CharacterState;

/// Heights closer than this to the target snap onto it.
const HEIGHT_SNAP_EPSILON: f32 = 1.0e-4;

/// Drives stance changes and capsule height smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StanceController {
    standing_height: f32,
    crouching_height: f32,
    sharpness: f32,
    camera_height_ratio: f32,
    obstruction_layers: LayerMask,
}

impl StanceController {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            standing_height: config.height(false),
            crouching_height: config.height(true),
            sharpness: config.crouching_sharpness,
            camera_height_ratio: config.camera_height_ratio,
            obstruction_layers: config.collision_layers,
        }
    }

    /// Whether the standing capsule fits where the body is now.
    pub fn can_stand(&self, physics: &dyn ShapeCastProvider, body: &dyn MovementSubstrate) -> bool {
        let own = body.collider();
        let standing = body.capsule_at_height(self.standing_height);
        physics
            .capsule_overlap(&standing, self.obstruction_layers)
            .into_iter()
            .all(|collider| Some(collider) == own)
    }

    /// Request a stance. Returns whether it was accepted.
    ///
    /// Crouching always succeeds. Standing fails when obstructed unless
    /// `ignore_obstructions` is set; a refused request leaves the state
    /// untouched and doesn't notify the observer.
    pub fn set_stance(
        &self,
        state: &mut CharacterState,
        physics: &dyn ShapeCastProvider,
        body: &dyn MovementSubstrate,
        observer: &mut dyn StanceObserver,
        crouched: bool,
        ignore_obstructions: bool,
    ) -> bool {
        if crouched {
            state.stance.target_height = self.crouching_height;
        } else {
            if !ignore_obstructions && !self.can_stand(physics, body) {
                return false;
            }
            state.stance.target_height = self.standing_height;
        }

        observer.on_stance_changed(crouched);
        state.stance.is_crouching = crouched;
        true
    }

    /// Ease the capsule height and camera pivot toward the target height.
    ///
    /// With `force` the target is applied immediately.
    pub fn update_height(
        &self,
        state: &mut CharacterState,
        body: &mut dyn MovementSubstrate,
        camera: &mut dyn CameraHost,
        dt: f32,
        force: bool,
    ) {
        let target = state.stance.target_height;
        let camera_target = Vec3::Y * target * self.camera_height_ratio;

        if force {
            state.stance.current_height = target;
            body.set_height(target);
            camera.set_local_position(camera_target);
            return;
        }

        if state.stance.current_height == target {
            return;
        }

        let t = (self.sharpness * dt).clamp(0.0, 1.0);
        let mut height = state.stance.current_height + (target - state.stance.current_height) * t;
        if (height - target).abs() < HEIGHT_SNAP_EPSILON {
            height = target;
        }

        state.stance.current_height = height;
        body.set_height(height);
        camera.set_local_position(camera.local_position().lerp(camera_target, t));
    }
}
