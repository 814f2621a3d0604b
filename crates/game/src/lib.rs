//! Droid Game
//!
//! Thin game-side wiring around the character controller:
//!
//! - Raw device input sampling and press-edge tracking
//! - Levels with collision geometry and named spawn points
//! - Player state and per-player statistics
//! - A fixed-rate simulation stepping every player
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Simulation                          │
//! │  ┌──────────┐    ┌─────────────────┐    ┌───────────────┐  │
//! │  │ RawInput │───►│ Character       │───►│ Player        │  │
//! │  │ tracker  │    │ controller      │    │ (body, camera │  │
//! │  └──────────┘    │ (droid_physics) │    │  stats)       │  │
//! │                  └─────────────────┘    └───────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

// Re-export main types
pub use input::{InputTracker, RawInput};
pub use level::{Level, SpawnPoint};
pub use player::{Player, PlayerId, PlayerStats};
pub use simulation::{Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use droid_physics::{
    BodyConfig, CharacterController, CharacterState, ConfigError, ControllerConfig, FrameEvents,
    InputFrame,
};
