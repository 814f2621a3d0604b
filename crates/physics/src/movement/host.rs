//! Interfaces to the engine-side objects the controller drives.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{Capsule, ColliderId};

/// The body being moved: position, orientation and capsule dimensions.
///
/// The feet sit at [`position`](Self::position); the capsule grows upward
/// from there along [`up`](Self::up).
pub trait MovementSubstrate {
    /// Feet position in world space.
    fn position(&self) -> Vec3;

    /// Body orientation. Only ever a yaw around world up.
    fn rotation(&self) -> Quat;

    fn set_rotation(&mut self, rotation: Quat);

    /// Apply a positional delta, respecting static geometry.
    fn move_by(&mut self, displacement: Vec3);

    /// Current capsule height.
    fn height(&self) -> f32;

    fn set_height(&mut self, height: f32);

    /// Capsule radius.
    fn radius(&self) -> f32;

    /// Contact tolerance around the capsule.
    fn skin_width(&self) -> f32;

    /// Tallest ledge `move_by` may climb.
    fn step_offset(&self) -> f32;

    fn set_step_offset(&mut self, offset: f32);

    /// Steepest walkable slope, in degrees from up.
    fn slope_limit(&self) -> f32;

    /// The body's own collider, excluded from overlap checks.
    fn collider(&self) -> Option<ColliderId> {
        None
    }

    /// The body's up axis.
    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// The body's capsule at its current height.
    fn capsule(&self) -> Capsule {
        self.capsule_at_height(self.height())
    }

    /// The body's capsule as it would be at `height`.
    fn capsule_at_height(&self, height: f32) -> Capsule {
        Capsule::upright(self.position(), self.up(), height, self.radius())
    }
}

/// The camera's local transform relative to the body.
pub trait CameraHost {
    fn local_position(&self) -> Vec3;

    fn set_local_position(&mut self, position: Vec3);

    fn set_local_rotation(&mut self, rotation: Quat);
}

/// Notified synchronously whenever a stance change is accepted.
pub trait StanceObserver {
    fn on_stance_changed(&mut self, crouching: bool);
}

impl StanceObserver for () {
    fn on_stance_changed(&mut self, _crouching: bool) {}
}

impl<F: FnMut(bool)> StanceObserver for F {
    fn on_stance_changed(&mut self, crouching: bool) {
        self(crouching)
    }
}

/// A plain camera pivot: the eye's transform in body space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPivot {
    /// Offset from the body's feet.
    pub local_position: Vec3,
    /// Pitch-only rotation relative to the body.
    pub local_rotation: Quat,
}

impl Default for CameraPivot {
    fn default() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPivot {
    /// Eye position in world space for a body at `body_position` facing `body_rotation`.
    pub fn eye_position(&self, body_position: Vec3, body_rotation: Quat) -> Vec3 {
        body_position + body_rotation * self.local_position
    }

    /// World-space look direction for a body facing `body_rotation`.
    pub fn look_direction(&self, body_rotation: Quat) -> Vec3 {
        (body_rotation * self.local_rotation) * Vec3::NEG_Z
    }
}

impl CameraHost for CameraPivot {
    fn local_position(&self) -> Vec3 {
        self.local_position
    }

    fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    fn set_local_rotation(&mut self, rotation: Quat) {
        self.local_rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |crouching: bool| seen.push(crouching);
            observer.on_stance_changed(true);
            observer.on_stance_changed(false);
        }
        assert_eq!(seen, vec![true, false]);
    }

    #[test]
    fn test_camera_pivot_eye_and_look() {
        let mut pivot = CameraPivot::default();
        pivot.set_local_position(Vec3::new(0.0, 1.6, 0.0));
        pivot.set_local_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2));

        let eye = pivot.eye_position(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        assert!((eye - Vec3::new(1.0, 1.6, 0.0)).length() < 1e-5);

        // Pitched fully up
        let look = pivot.look_direction(Quat::IDENTITY);
        assert!(look.dot(Vec3::Y) > 0.999, "look={:?}", look);
    }
}
