//! Character movement controller.
//!
//! This is the main entry point for character movement. It takes an input
//! frame and updates the character state through the injected collaborators.

use glam::{Quat, Vec3};

use crate::collision::ShapeCastProvider;

use super::config::{ConfigError, ControllerConfig};
use super::ground::GroundDetector;
use super::host::{CameraHost, MovementSubstrate, StanceObserver};
use super::jump::JumpPhysics;
use super::look::LookController;
use super::resolve::{reorient_on_slope, resolve_collision};
use super::stance::StanceController;
use super::state::{CharacterState, FrameEvents, FrameTime, InputFrame};

/// Everything a frame needs from the engine side.
pub struct FrameContext<'a> {
    /// World queries.
    pub physics: &'a dyn ShapeCastProvider,
    /// The body being moved.
    pub body: &'a mut dyn MovementSubstrate,
    /// The camera pivot.
    pub camera: &'a mut dyn CameraHost,
    /// Receives accepted stance changes.
    pub observer: &'a mut dyn StanceObserver,
}

/// First-person character controller.
///
/// Holds only configuration and constants derived from it; all mutable
/// movement data lives in the caller's [`CharacterState`].
///
/// # Example
///
/// ```ignore
/// let controller = CharacterController::new(ControllerConfig::default())?;
/// let mut state = CharacterState::new(controller.config().standing_height);
/// controller.spawn(&mut state, &mut ctx);
///
/// // Each frame:
/// let events = controller.update(&mut state, &input, time, &mut ctx);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: ControllerConfig,
    jump: JumpPhysics,
    max_speed_in_air: f32,
    ground: GroundDetector,
    stance: StanceController,
    look: LookController,
}

impl CharacterController {
    /// Validate `config` and derive the jump constants from it.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let jump = JumpPhysics::from_config(&config);
        log::debug!(
            "controller ready: gravity={:.3} jump velocity={:.3}..{:.3}",
            jump.gravity,
            jump.min_jump_velocity,
            jump.max_jump_velocity
        );

        Ok(Self {
            jump,
            max_speed_in_air: config.effective_max_speed_in_air(),
            ground: GroundDetector::new(&config),
            stance: StanceController::new(&config),
            look: LookController::new(config.rotation_speed),
            config,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn jump_physics(&self) -> &JumpPhysics {
        &self.jump
    }

    /// Horizontal speed cap while airborne, before stance modifiers.
    pub fn max_speed_in_air(&self) -> f32 {
        self.max_speed_in_air
    }

    /// Reset `state` for a freshly placed body.
    ///
    /// Forces the standing stance regardless of obstructions, applies its
    /// height instantly and levels the camera.
    pub fn spawn(&self, state: &mut CharacterState, ctx: &mut FrameContext<'_>) {
        *state = CharacterState::new(self.config.standing_height);
        state.ground_normal = ctx.body.up();

        self.stance
            .set_stance(state, ctx.physics, &*ctx.body, &mut *ctx.observer, false, true);
        self.stance
            .update_height(state, &mut *ctx.body, &mut *ctx.camera, 0.0, true);

        ctx.body.set_step_offset(0.0);
        ctx.camera.set_local_rotation(Quat::IDENTITY);
    }

    /// Request a stance change. Returns whether it was accepted.
    ///
    /// Standing up is refused while the standing capsule would overlap
    /// something, unless `ignore_obstructions` is set.
    pub fn set_stance(
        &self,
        state: &mut CharacterState,
        ctx: &mut FrameContext<'_>,
        crouched: bool,
        ignore_obstructions: bool,
    ) -> bool {
        self.stance.set_stance(
            state,
            ctx.physics,
            &*ctx.body,
            &mut *ctx.observer,
            crouched,
            ignore_obstructions,
        )
    }

    /// Advance the character by one frame.
    pub fn update(
        &self,
        state: &mut CharacterState,
        input: &InputFrame,
        time: FrameTime,
        ctx: &mut FrameContext<'_>,
    ) -> FrameEvents {
        let mut events = FrameEvents {
            interacted: input.interact_pressed,
            ..Default::default()
        };
        let dt = time.dt.max(0.0);

        // Button actions use last frame's ground state
        if input.jump_pressed && state.is_grounded {
            self.try_jump(state, time, ctx, &mut events);
        }
        if input.crouch_pressed && state.is_grounded {
            let crouch = !state.stance.is_crouching;
            self.request_stance(state, ctx, crouch, &mut events);
        }

        let report = self.ground.detect(state, ctx.physics, &mut *ctx.body, time);
        events.landed = report.landed();
        events.left_ground = report.left_ground();
        events.snapped_down = report.snapped_distance;
        if events.landed {
            log::debug!("landed at {:?} with velocity {:?}", ctx.body.position(), state.velocity);
        } else if events.left_ground {
            log::debug!("left ground at {:?}", ctx.body.position());
        }

        self.stance
            .update_height(state, &mut *ctx.body, &mut *ctx.camera, dt, false);

        self.look
            .apply(state, &mut *ctx.body, &mut *ctx.camera, input.look_axis);

        self.integrate_velocity(state, input, dt, ctx, &mut events);

        let capsule_before = ctx.body.capsule();
        ctx.body.move_by(state.velocity * dt);

        events.impact = resolve_collision(
            state,
            ctx.physics,
            &capsule_before,
            dt,
            self.config.collision_layers,
        );
        if let Some(impact) = events.impact {
            log::trace!("impact at {:?} -> {:?}", impact, state.velocity);
        }

        events
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn try_jump(
        &self,
        state: &mut CharacterState,
        time: FrameTime,
        ctx: &mut FrameContext<'_>,
        events: &mut FrameEvents,
    ) {
        if !self.request_stance(state, ctx, false, events) {
            log::debug!("jump blocked: no room to stand");
            return;
        }

        let up = ctx.body.up();
        state.velocity = state.horizontal_velocity(up) + up * self.jump.max_jump_velocity;
        state.last_jump_time = Some(time.elapsed);
        state.is_grounded = false;
        state.ground_normal = up;
        events.jumped = true;

        log::debug!("jumped at t={:.3} from {:?}", time.elapsed, ctx.body.position());
    }

    /// Ask the stance controller for a change and record the outcome.
    fn request_stance(
        &self,
        state: &mut CharacterState,
        ctx: &mut FrameContext<'_>,
        crouched: bool,
        events: &mut FrameEvents,
    ) -> bool {
        let was_crouching = state.stance.is_crouching;
        let accepted = self.set_stance(state, ctx, crouched, false);

        if !accepted {
            events.stance_denied = true;
            log::debug!("stand up denied: standing capsule is obstructed");
        } else if was_crouching != crouched {
            events.stance_changed = Some(crouched);
            log::debug!("stance changed: crouching={}", crouched);
        }

        accepted
    }

    // ========================================================================
    // Velocity
    // ========================================================================

    fn integrate_velocity(
        &self,
        state: &mut CharacterState,
        input: &InputFrame,
        dt: f32,
        ctx: &mut FrameContext<'_>,
        events: &mut FrameEvents,
    ) {
        // Sprinting stands the character up first, if there's room
        let sprinting = input.sprint_held
            && (!state.stance.is_crouching || self.request_stance(state, ctx, false, events));
        let modifier = self
            .config
            .speed_modifier(state.stance.is_crouching, sprinting);

        let up = ctx.body.up();
        let local = Vec3::new(input.move_axis.x, 0.0, -input.move_axis.y).clamp_length_max(1.0);
        let world_input = ctx.body.rotation() * local;

        if state.is_grounded {
            let target = world_input * self.config.max_speed_on_ground * modifier;
            let target = reorient_on_slope(target, state.ground_normal, up);

            let t = (self.config.movement_sharpness_on_ground * dt).min(1.0);
            state.velocity = state.velocity.lerp(target, t);
        } else {
            state.velocity += world_input * self.config.acceleration_in_air * dt;

            let vertical = state.velocity.dot(up);
            let horizontal = (state.velocity - up * vertical)
                .clamp_length_max(self.max_speed_in_air * modifier);

            let (min_vertical, max_vertical) = self.jump.vertical_bounds(input.jump_held);
            let vertical = vertical.clamp(min_vertical, max_vertical);

            state.velocity = horizontal + up * (vertical + self.jump.gravity * dt);
        }
    }
}
