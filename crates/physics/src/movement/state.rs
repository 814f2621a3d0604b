//! Character state, per-frame input and per-frame output.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Standing/crouching state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceState {
    /// Whether the character is crouched.
    pub is_crouching: bool,
    /// Capsule height the character is converging toward.
    pub target_height: f32,
    /// Capsule height right now.
    pub current_height: f32,
}

impl StanceState {
    /// A standing stance already at `height`.
    pub fn standing(height: f32) -> Self {
        Self {
            is_crouching: false,
            target_height: height,
            current_height: height,
        }
    }
}

/// Complete movement state for one character.
///
/// Owned exclusively by the caller and mutated once per frame by
/// [`CharacterController::update`](super::CharacterController::update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Whether the character is supported by walkable ground.
    pub is_grounded: bool,

    /// Ground surface normal. World up whenever `is_grounded` is false.
    pub ground_normal: Vec3,

    /// Simulation time of the most recent jump, `None` before the first one.
    pub last_jump_time: Option<f32>,

    /// Velocity at the most recent collision this frame, zero if none.
    pub latest_impact_speed: Vec3,

    /// Stance and capsule height.
    pub stance: StanceState,

    /// Accumulated camera pitch in degrees, positive looking up.
    pub camera_pitch: f32,
}

impl CharacterState {
    /// Create a resting, airborne, standing state.
    pub fn new(standing_height: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            is_grounded: false,
            ground_normal: Vec3::Y,
            last_jump_time: None,
            latest_impact_speed: Vec3::ZERO,
            stance: StanceState::standing(standing_height),
            camera_pitch: 0.0,
        }
    }

    /// Whether `now` falls inside the post-jump window of length `grace`.
    pub fn within_jump_grace(&self, now: f32, grace: f32) -> bool {
        self.last_jump_time
            .map_or(false, |jumped| now >= jumped && now < jumped + grace)
    }

    /// Velocity with the vertical component removed.
    pub fn horizontal_velocity(&self, up: Vec3) -> Vec3 {
        self.velocity - up * self.velocity.dot(up)
    }
}

/// Explicit frame timing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameTime {
    /// Seconds elapsed since the previous frame.
    pub dt: f32,
    /// Simulation clock at this frame (seconds).
    pub elapsed: f32,
}

impl FrameTime {
    pub fn new(dt: f32, elapsed: f32) -> Self {
        Self { dt, elapsed }
    }

    /// Timing for frame number `frame` of a fixed-step loop.
    pub fn fixed(frame: u64, dt: f32) -> Self {
        Self {
            dt,
            elapsed: (frame as f64 * dt as f64) as f32,
        }
    }
}

/// Input snapshot for a single frame.
///
/// Edge flags (`*_pressed`) are true only on the frame the button went down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    /// Local movement: `x` strafes right, `y` moves forward.
    pub move_axis: Vec2,
    /// Look delta: `x` turns right, `y` looks up.
    pub look_axis: Vec2,
    /// Jump button is held.
    pub jump_held: bool,
    /// Jump button went down this frame.
    pub jump_pressed: bool,
    /// Sprint button is held.
    pub sprint_held: bool,
    /// Crouch button went down this frame.
    pub crouch_pressed: bool,
    /// Interact button went down this frame.
    pub interact_pressed: bool,
}

impl InputFrame {
    /// Input that presses and holds jump this frame.
    pub fn jump() -> Self {
        Self {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        }
    }
}

/// What happened during one frame, for effect and gameplay consumers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameEvents {
    /// A jump launched this frame.
    pub jumped: bool,
    /// The character touched down this frame.
    pub landed: bool,
    /// The character lost ground support this frame without jumping.
    pub left_ground: bool,
    /// Stance change accepted this frame, carrying the new crouched flag.
    pub stance_changed: Option<bool>,
    /// A request to stand up was refused because of an obstruction.
    pub stance_denied: bool,
    /// Velocity at the moment the move ran into something.
    pub impact: Option<Vec3>,
    /// Distance the ground check pulled the character down onto the ground.
    pub snapped_down: f32,
    /// Interact was pressed this frame.
    pub interacted: bool,
}
