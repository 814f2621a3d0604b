//! Mouse/stick look: yaw turns the body, pitch tilts the camera.

use glam::{Quat, Vec2};

use super::host::{CameraHost, MovementSubstrate};
use super::state::CharacterState;

/// Camera pitch is clamped to this many degrees above and below the horizon.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookController {
    /// Degrees per unit of look input.
    pub rotation_speed: f32,
}

impl LookController {
    pub fn new(rotation_speed: f32) -> Self {
        Self { rotation_speed }
    }

    /// Apply one frame of look input.
    ///
    /// Positive `look.x` turns right, positive `look.y` looks up.
    pub fn apply(
        &self,
        state: &mut CharacterState,
        body: &mut dyn MovementSubstrate,
        camera: &mut dyn CameraHost,
        look: Vec2,
    ) {
        let yaw = (look.x * self.rotation_speed).to_radians();
        if yaw != 0.0 {
            let rotation = (body.rotation() * Quat::from_rotation_y(-yaw)).normalize();
            body.set_rotation(rotation);
        }

        state.camera_pitch = (state.camera_pitch + look.y * self.rotation_speed)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        camera.set_local_rotation(Quat::from_rotation_x(state.camera_pitch.to_radians()));
    }
}
