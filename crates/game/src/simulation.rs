//! Game simulation - the fixed-rate tick loop.
//!
//! The simulation owns the level and every player, and advances them all with
//! the same timestep so identical input streams give identical results.

use droid_physics::{
    BodyConfig, CharacterController, ConfigError, ControllerConfig, FrameContext, FrameEvents,
    FrameTime, KinematicBody,
};
use serde::{Deserialize, Serialize};

use crate::input::RawInput;
use crate::level::{Level, SpawnPoint};
use crate::player::{Player, PlayerId};

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Character controller tuning.
    pub controller: ControllerConfig,

    /// Capsule and collision settings for player bodies.
    pub body: BodyConfig,

    /// Look units per pixel of mouse movement.
    pub look_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            controller: ControllerConfig::default(),
            body: BodyConfig::default(),
            look_sensitivity: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    controller: CharacterController,

    next_player_id: PlayerId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, ConfigError> {
        let controller = CharacterController::new(config.controller.clone())?;
        log::info!(
            "simulation ready: level '{}', {} Hz",
            level.name,
            config.tick_rate
        );

        Ok(Self {
            frame: 0,
            config,
            level,
            players: Vec::new(),
            controller,
            next_player_id: 1,
        })
    }

    /// Create a simulation on the test course with default configuration.
    pub fn test_course() -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::default(), Level::test_course())
    }

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    /// Add a player at the next spawn point in rotation.
    ///
    /// Returns the player's ID, or `None` if the level has no spawn points.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        let spawn = self.level.spawn_for(self.players.len())?.clone();
        Some(self.insert_player(name, &spawn))
    }

    /// Add a player at the named spawn point.
    pub fn add_player_at(&mut self, name: &str, spawn: &str) -> Option<PlayerId> {
        let spawn = self.level.spawn(spawn)?.clone();
        Some(self.insert_player(name, &spawn))
    }

    fn insert_player(&mut self, name: &str, spawn: &SpawnPoint) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let mut player = Player::new(
            id,
            name,
            spawn,
            self.controller.config().standing_height,
            self.config.body,
            self.config.look_sensitivity,
        );
        Self::spawn_character(&self.controller, &self.level, &mut player);

        log::info!("player {} '{}' joined at spawn '{}'", id, name, spawn.name);
        self.players.push(player);
        id
    }

    /// Put a player back at a spawn point with a freshly reset character.
    pub fn respawn(&mut self, player_id: PlayerId, spawn: &str) -> bool {
        let Some(spawn) = self.level.spawn(spawn) else {
            return false;
        };
        let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
            return false;
        };

        player.place_at(spawn);
        Self::spawn_character(&self.controller, &self.level, player);
        log::debug!("player {} respawned at '{}'", player_id, spawn.name);
        true
    }

    fn spawn_character(controller: &CharacterController, level: &Level, player: &mut Player) {
        let mut body = KinematicBody::new(&level.collision, &mut player.body);
        let mut ctx = FrameContext {
            physics: &level.collision,
            body: &mut body,
            camera: &mut player.camera,
            observer: &mut (),
        };
        controller.spawn(&mut player.state, &mut ctx);
    }

    /// Remove a player from the simulation.
    pub fn remove_player(&mut self, player_id: PlayerId) {
        self.players.retain(|p| p.id != player_id);
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Advance the simulation by one tick.
    ///
    /// `inputs` is indexed by position in `players`; missing entries count as
    /// no input. Returns each player's frame events in the same order.
    pub fn tick(&mut self, inputs: &[RawInput]) -> Vec<FrameEvents> {
        let time = FrameTime::fixed(self.frame, self.config.delta_time());
        let mut all_events = Vec::with_capacity(self.players.len());

        for (i, player) in self.players.iter_mut().enumerate() {
            let raw = inputs.get(i).copied().unwrap_or_default();
            let input = player.input.frame(&raw);

            let id = player.id;
            let mut observer =
                |crouching: bool| log::trace!("player {} stance -> crouching={}", id, crouching);
            let mut body = KinematicBody::new(&self.level.collision, &mut player.body);
            let mut ctx = FrameContext {
                physics: &self.level.collision,
                body: &mut body,
                camera: &mut player.camera,
                observer: &mut observer,
            };
            let events = self.controller.update(&mut player.state, &input, time, &mut ctx);

            log_transitions(player, &events);
            player.stats.record(&events);
            all_events.push(events);
        }

        self.frame += 1;
        all_events
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

fn log_transitions(player: &Player, events: &FrameEvents) {
    if events.jumped {
        log::debug!("player {} jumped", player.id);
    }
    if events.landed {
        log::debug!("player {} landed at {:?}", player.id, player.position());
    }
    if events.left_ground {
        log::debug!("player {} left the ground", player.id);
    }
    match events.stance_changed {
        Some(true) => log::debug!("player {} crouched", player.id),
        Some(false) => log::debug!("player {} stood up", player.id),
        None => {}
    }
    if events.stance_denied {
        log::debug!("player {} can't stand up here", player.id);
    }
    if events.interacted {
        log::info!("player {} interacted", player.id);
    }
}

// ============================================================================
// Tests
// ============================================================================
