//! Droid Physics
//!
//! A kinematic first-person character controller. Each simulation frame it takes
//! a snapshot of player input, queries the world with swept capsules, and
//! produces a new velocity, a grounded/airborne classification, and a smoothed
//! standing/crouching capsule height.
//!
//! # Architecture
//!
//! The crate is split into two main systems:
//!
//! - **Collision**: Sweeps and overlaps capsules against world geometry
//!   ([`ShapeCastProvider`], implemented by [`CollisionWorld`])
//! - **Movement**: Uses those queries to drive a [`MovementSubstrate`] through
//!   the per-frame pipeline owned by [`CharacterController`]
//!
//! Per frame the controller runs, in order: jump/crouch input actions, ground
//! detection, stance height smoothing, look rotation, velocity integration,
//! the positional move, and collision response on the resulting velocity.
//!
//! # Design Principles
//!
//! 1. **Explicit time**: every per-frame call takes a [`FrameTime`], never a global clock
//! 2. **Injected engine state**: position, rotation and capsule size live behind
//!    [`MovementSubstrate`]; the camera pivot behind [`CameraHost`]
//! 3. **Values over callbacks**: what happened in a frame is returned as [`FrameEvents`]

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{Capsule, CastHit, ColliderId, CollisionWorld, LayerMask, ShapeCastProvider};
pub use movement::{
    BodyConfig, BodyState, CameraHost, CameraPivot, CharacterController, CharacterState,
    ConfigError, ControllerConfig, FrameContext, FrameEvents, FrameTime, InputFrame, JumpPhysics,
    KinematicBody, MovementSubstrate, StanceObserver,
};
