//! Player entity and state.

use droid_physics::{BodyConfig, BodyState, CameraPivot, CharacterState, FrameEvents};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::InputTracker;
use crate::level::SpawnPoint;

/// Unique identifier for players.
pub type PlayerId = u32;

/// Running totals of what a player's character has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub jumps: u32,
    pub landings: u32,
    pub stance_changes: u32,
    pub stance_denials: u32,
    pub interactions: u32,
    /// Fastest speed the character has run into something at.
    pub hardest_impact: f32,
}

impl PlayerStats {
    /// Fold one frame's events into the totals.
    pub fn record(&mut self, events: &FrameEvents) {
        self.jumps += events.jumped as u32;
        self.landings += events.landed as u32;
        self.stance_changes += events.stance_changed.is_some() as u32;
        self.stance_denials += events.stance_denied as u32;
        self.interactions += events.interacted as u32;

        if let Some(impact) = events.impact {
            self.hardest_impact = self.hardest_impact.max(impact.length());
        }
    }
}

/// A player in the game.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: PlayerId,

    /// Player name/handle.
    pub name: String,

    /// Position, facing and capsule of the character.
    pub body: BodyState,

    /// First-person camera mounted on the body.
    pub camera: CameraPivot,

    /// Controller state carried between ticks.
    pub state: CharacterState,

    /// Turns raw device samples into per-tick input.
    pub input: InputTracker,

    pub stats: PlayerStats,
}

impl Player {
    /// Create a player standing at `spawn`.
    ///
    /// The controller still has to [`spawn`](droid_physics::CharacterController::spawn)
    /// the character before its first tick.
    pub fn new(
        id: PlayerId,
        name: &str,
        spawn: &SpawnPoint,
        standing_height: f32,
        body_config: BodyConfig,
        look_sensitivity: f32,
    ) -> Self {
        let mut body = BodyState::new(spawn.position, standing_height, body_config);
        body.rotation = spawn.rotation();

        Self {
            id,
            name: name.to_string(),
            body,
            camera: CameraPivot::default(),
            state: CharacterState::new(standing_height),
            input: InputTracker::new(look_sensitivity),
            stats: PlayerStats::default(),
        }
    }

    /// Move the player back to `spawn`, keeping their stats.
    pub fn place_at(&mut self, spawn: &SpawnPoint) {
        self.body.position = spawn.position;
        self.body.rotation = spawn.rotation();
        self.input.reset();
    }

    /// Get the player's feet position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Get the player's eye position (for camera).
    pub fn eye_position(&self) -> Vec3 {
        self.camera.eye_position(self.body.position, self.body.rotation)
    }

    /// Get the direction the player is looking.
    pub fn look_direction(&self) -> Vec3 {
        self.camera.look_direction(self.body.rotation)
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.state.is_grounded
    }

    /// Check if the player is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.state.stance.is_crouching
    }

    /// Horizontal speed in m/s.
    pub fn ground_speed(&self) -> f32 {
        self.state.horizontal_velocity(Vec3::Y).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> SpawnPoint {
        SpawnPoint::new("test", Vec3::new(1.0, 0.0, 2.0), 90.0)
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, "Test", &spawn(), 1.8, BodyConfig::default(), 1.0);
        assert_eq!(player.position(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(player.body.height, 1.8);
        assert!(!player.on_ground());
        assert!(!player.is_crouching());
        assert!(player.look_direction().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_stats_record_events() {
        let mut stats = PlayerStats::default();
        stats.record(&FrameEvents {
            jumped: true,
            stance_changed: Some(true),
            impact: Some(Vec3::new(0.0, -3.0, 4.0)),
            ..Default::default()
        });
        stats.record(&FrameEvents {
            landed: true,
            stance_denied: true,
            interacted: true,
            impact: Some(Vec3::new(0.0, -1.0, 0.0)),
            ..Default::default()
        });

        assert_eq!(stats.jumps, 1);
        assert_eq!(stats.landings, 1);
        assert_eq!(stats.stance_changes, 1);
        assert_eq!(stats.stance_denials, 1);
        assert_eq!(stats.interactions, 1);
        assert_eq!(stats.hardest_impact, 5.0);
    }

    #[test]
    fn test_place_at_keeps_stats() {
        let mut player = Player::new(1, "Test", &spawn(), 1.8, BodyConfig::default(), 1.0);
        player.stats.jumps = 3;

        player.place_at(&SpawnPoint::new("other", Vec3::new(10.0, 0.0, 10.0), 0.0));
        assert_eq!(player.position(), Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(player.stats.jumps, 3);
    }
}
