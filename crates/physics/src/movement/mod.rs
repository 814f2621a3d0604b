//! Character movement.
//!
//! This module implements a kinematic first-person controller with:
//!
//! - Grounded/airborne classification from a downward capsule sweep
//! - Slope-following ground movement with exponential smoothing
//! - Accelerated, speed-capped air movement under constant gravity
//! - Variable jump height derived from a jump apex height and time
//! - Crouching with obstruction-checked stand-up and smoothed capsule height
//! - Velocity projection onto whatever the move ran into
//!
//! # Design
//!
//! Movement is driven by the [`CharacterController`], which takes an
//! [`InputFrame`] and a [`FrameTime`] and updates a [`CharacterState`] through
//! the injected collaborators: a [`ShapeCastProvider`](crate::ShapeCastProvider)
//! for queries, a [`MovementSubstrate`] that owns the body, a [`CameraHost`] for
//! the view pivot, and a [`StanceObserver`].
//!
//! The controller itself holds only configuration and derived constants, so a
//! frame is a function of (state, input, time) plus the collaborators.

mod body;
mod config;
mod controller;
mod ground;
mod host;
mod jump;
mod look;
mod resolve;
mod stance;
mod state;

pub use body::{BodyConfig, BodyState, KinematicBody};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{CharacterController, FrameContext};
pub use ground::{GroundDetector, GroundReport, JUMP_GROUNDING_GRACE};
pub use host::{CameraHost, CameraPivot, MovementSubstrate, StanceObserver};
pub use jump::JumpPhysics;
pub use look::{LookController, PITCH_LIMIT_DEGREES};
pub use resolve::{project_on_plane, reorient_on_slope, resolve_collision};
pub use stance::StanceController;
pub use state::{CharacterState, FrameEvents, FrameTime, InputFrame, StanceState};
