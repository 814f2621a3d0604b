//! Droid - headless demo runner
//!
//! Runs one player around the test course with a scripted input timeline and
//! logs what the character controller reports. Set `RUST_LOG=debug` to see
//! every transition.
//!
//! Usage: `droid [controller-config.json]`

use std::error::Error;

use droid_game::input::{ActionKeys, MovementKeys};
use droid_game::{ControllerConfig, Level, RawInput, Simulation, SimulationConfig};

/// One stretch of the script: a name, how many ticks it lasts, and the input held.
struct Segment {
    name: &'static str,
    ticks: u32,
    input: RawInput,
}

impl Segment {
    fn new(name: &'static str, seconds: f32, tick_rate: u32, input: RawInput) -> Self {
        Self {
            name,
            ticks: (seconds * tick_rate as f32).round() as u32,
            input,
        }
    }
}

fn keys(forward: bool, left: bool, right: bool) -> MovementKeys {
    MovementKeys {
        forward,
        left,
        right,
        ..Default::default()
    }
}

fn script(tick_rate: u32) -> Vec<Segment> {
    let idle = RawInput::default();
    let walk = RawInput {
        movement: keys(true, false, false),
        ..Default::default()
    };
    let jump = RawInput {
        actions: ActionKeys {
            jump: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let crouch = RawInput {
        actions: ActionKeys {
            crouch: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let sprint_turning = RawInput {
        movement: keys(true, false, true),
        mouse_delta: (20.0, 0.0),
        actions: ActionKeys {
            sprint: true,
            ..Default::default()
        },
    };
    let look_around = RawInput {
        mouse_delta: (-15.0, -8.0),
        actions: ActionKeys {
            interact: true,
            ..Default::default()
        },
        ..Default::default()
    };

    vec![
        Segment::new("settle", 0.5, tick_rate, idle),
        Segment::new("walk to the ledge", 1.2, tick_rate, walk),
        Segment::new("held jump", 2.5, tick_rate, jump),
        Segment::new("crouch", 0.1, tick_rate, crouch),
        Segment::new("crouch walk", 1.0, tick_rate, RawInput { actions: crouch.actions, ..walk }),
        Segment::new("sprint and turn", 1.5, tick_rate, sprint_turning),
        Segment::new("look around", 0.5, tick_rate, look_around),
        Segment::new("rest", 1.0, tick_rate, idle),
    ]
}

fn load_config() -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = SimulationConfig::default();

    if let Some(path) = std::env::args().nth(1) {
        let json = std::fs::read_to_string(&path)?;
        config.controller = ControllerConfig::from_json_str(&json)?;
        log::info!("loaded controller config from {}", path);
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    let tick_rate = config.tick_rate;
    let mut simulation = Simulation::new(config, Level::test_course())?;
    let jump = simulation.controller().jump_physics();
    log::info!(
        "gravity {:.2} m/s², launch {:.2} m/s (min {:.2} m/s)",
        jump.gravity,
        jump.max_jump_velocity,
        jump.min_jump_velocity
    );

    let Some(player_id) = simulation.add_player("Droid") else {
        return Err("level has no spawn points".into());
    };

    for segment in script(tick_rate) {
        log::info!("== {} ({} ticks)", segment.name, segment.ticks);
        for _ in 0..segment.ticks {
            simulation.tick(&[segment.input]);
        }

        if let Some(player) = simulation.get_player(player_id) {
            log::info!(
                "   at {:.2?}, speed {:.2} m/s, grounded={} crouching={} height={:.2}",
                player.position(),
                player.ground_speed(),
                player.on_ground(),
                player.is_crouching(),
                player.body.height
            );
        }
    }

    if let Some(player) = simulation.get_player(player_id) {
        let stats = player.stats;
        println!(
            "{} ticks: {} jumps, {} landings, {} stance changes ({} denied), {} interactions, hardest impact {:.2} m/s",
            simulation.frame,
            stats.jumps,
            stats.landings,
            stats.stance_changes,
            stats.stance_denials,
            stats.interactions,
            stats.hardest_impact
        );
    }

    Ok(())
}
