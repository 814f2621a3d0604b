//! End-to-end movement scenarios.
//!
//! Each test drives the full controller against the reference collision world
//! for many fixed-rate frames and checks the resulting trajectory.

use droid_physics::{
    BodyConfig, BodyState, CameraPivot, CharacterController, CharacterState, CollisionWorld,
    ControllerConfig, FrameContext, FrameEvents, FrameTime, InputFrame, KinematicBody, LayerMask,
};
use glam::{Quat, Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;

/// A single character in a world, stepped at a fixed rate.
struct Harness {
    world: CollisionWorld,
    body: BodyState,
    camera: CameraPivot,
    state: CharacterState,
    controller: CharacterController,
    stance_log: Vec<bool>,
    frame: u64,
}

impl Harness {
    fn new(world: CollisionWorld, config: ControllerConfig, feet: Vec3) -> Self {
        let controller = CharacterController::new(config).unwrap();
        let standing = controller.config().standing_height;
        let mut harness = Self {
            world,
            body: BodyState::new(feet, standing, BodyConfig::default()),
            camera: CameraPivot::default(),
            state: CharacterState::new(standing),
            controller,
            stance_log: Vec::new(),
            frame: 0,
        };

        let log = &mut harness.stance_log;
        let mut body = KinematicBody::new(&harness.world, &mut harness.body);
        let mut observer = |crouching: bool| log.push(crouching);
        let mut ctx = FrameContext {
            physics: &harness.world,
            body: &mut body,
            camera: &mut harness.camera,
            observer: &mut observer,
        };
        harness.controller.spawn(&mut harness.state, &mut ctx);
        harness
    }

    fn step(&mut self, input: InputFrame) -> FrameEvents {
        let time = FrameTime::fixed(self.frame, DT);
        self.frame += 1;

        let log = &mut self.stance_log;
        let mut body = KinematicBody::new(&self.world, &mut self.body);
        let mut observer = |crouching: bool| log.push(crouching);
        let mut ctx = FrameContext {
            physics: &self.world,
            body: &mut body,
            camera: &mut self.camera,
            observer: &mut observer,
        };
        self.controller.update(&mut self.state, &input, time, &mut ctx)
    }

    /// Step with no input until grounded and at rest.
    fn settle(&mut self) {
        for _ in 0..90 {
            self.step(InputFrame::default());
        }
        assert!(self.state.is_grounded, "never landed: {:?}", self.body.position);
    }

    fn height(&self) -> f32 {
        self.body.position.y
    }
}

fn flat_floor() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(50.0, 0.5, 50.0),
        LayerMask::TERRAIN,
    );
    world
}

/// Jump heights 4 and 1 with a one second apex: gravity -8, launch speeds 8 and 4.
fn reference_config() -> ControllerConfig {
    ControllerConfig {
        max_jump_height: 4.0,
        min_jump_height: 1.0,
        jump_apex_time: 1.0,
        ..Default::default()
    }
}

fn held_jump() -> InputFrame {
    InputFrame {
        jump_held: true,
        ..Default::default()
    }
}

fn forward() -> InputFrame {
    InputFrame {
        move_axis: Vec2::new(0.0, 1.0),
        ..Default::default()
    }
}

#[test]
fn held_jump_peaks_at_max_height() {
    let mut harness = Harness::new(flat_floor(), reference_config(), Vec3::new(0.0, 0.5, 0.0));
    harness.settle();
    let start = harness.height();

    assert!(harness.step(InputFrame::jump()).jumped);

    let mut peak = harness.height();
    let mut peak_velocity = harness.state.velocity.y;
    for _ in 0..90 {
        harness.step(held_jump());
        if harness.height() > peak {
            peak = harness.height();
            peak_velocity = harness.state.velocity.y;
        }
    }

    let apex = peak - start;
    assert!(apex > 3.8 && apex <= 4.0 + 1e-3, "apex={}", apex);
    assert!(peak_velocity.abs() < 0.2, "velocity at apex={}", peak_velocity);
}

#[test]
fn released_jump_peaks_near_min_height() {
    let mut harness = Harness::new(flat_floor(), reference_config(), Vec3::new(0.0, 0.5, 0.0));
    harness.settle();
    let start = harness.height();

    harness.step(InputFrame::jump());

    let mut peak = harness.height();
    for _ in 0..90 {
        harness.step(InputFrame::default());
        assert!(harness.state.velocity.y <= 4.0, "v={:?}", harness.state.velocity);
        peak = peak.max(harness.height());
    }

    let apex = peak - start;
    assert!(apex > 0.9 && apex < 1.3, "apex={}", apex);
}

#[test]
fn releasing_mid_ascent_lands_between_bounds() {
    let mut harness = Harness::new(flat_floor(), reference_config(), Vec3::new(0.0, 0.5, 0.0));
    harness.settle();
    let start = harness.height();

    harness.step(InputFrame::jump());
    for _ in 0..20 {
        harness.step(held_jump());
    }

    let mut peak = harness.height();
    for _ in 0..90 {
        harness.step(InputFrame::default());
        peak = peak.max(harness.height());
    }

    let apex = peak - start;
    assert!(apex > 1.0 && apex < 3.8, "apex={}", apex);
}

#[test]
fn jump_lands_back_on_the_floor() {
    let mut harness = Harness::new(flat_floor(), reference_config(), Vec3::new(0.0, 0.5, 0.0));
    harness.settle();

    harness.step(InputFrame::jump());

    let mut landings = 0;
    let mut impact = None;
    for _ in 0..240 {
        let events = harness.step(held_jump());
        if events.landed {
            landings += 1;
        }
        if events.impact.is_some() && impact.is_none() {
            impact = events.impact;
        }
    }

    assert_eq!(landings, 1);
    assert!(harness.state.is_grounded);
    assert!(harness.height().abs() < 0.02, "y={}", harness.height());
    let impact = impact.expect("landing should register an impact");
    assert!(impact.y < -4.0, "impact={:?}", impact);
}

#[test]
fn walking_into_wall_clears_normal_velocity() {
    let mut world = flat_floor();
    // Wall with its face at z=-5
    world.add_box(
        Vec3::new(0.0, 2.0, -5.5),
        Vec3::new(10.0, 2.0, 0.5),
        LayerMask::DEFAULT,
    );

    let mut harness = Harness::new(world, ControllerConfig::default(), Vec3::new(0.0, 0.5, 0.0));
    harness.settle();

    let mut impacts = 0;
    for _ in 0..120 {
        let events = harness.step(forward());
        if let Some(impact) = events.impact {
            impacts += 1;
            assert!(impact.z < 0.0, "impact={:?}", impact);
            assert!(harness.state.velocity.z.abs() < 1e-3, "v={:?}", harness.state.velocity);
        }
    }

    assert!(impacts > 0);
    assert!(harness.body.position.z > -4.61, "z={}", harness.body.position.z);
    assert!(harness.body.position.z < -4.5, "z={}", harness.body.position.z);
    assert_ne!(harness.state.latest_impact_speed, Vec3::ZERO);
}

#[test]
fn walks_up_a_gentle_ramp() {
    let mut world = CollisionWorld::new();
    // 20 degree ramp rising toward -Z
    world.add_oriented_box(
        Vec3::ZERO,
        Vec3::new(3.0, 0.5, 8.0),
        Quat::from_rotation_x(20.0_f32.to_radians()),
        LayerMask::TERRAIN,
    );

    let mut harness = Harness::new(world, ControllerConfig::default(), Vec3::new(0.0, 2.0, 0.0));
    harness.settle();
    let start = harness.height();

    for _ in 0..30 {
        harness.step(forward());
        assert!(harness.state.is_grounded, "slipped off at {:?}", harness.body.position);
    }

    let climbed = harness.height() - start;
    assert!(climbed > 1.0, "climbed={}", climbed);
    let slope = harness.state.ground_normal.angle_between(Vec3::Y).to_degrees();
    assert!((slope - 20.0).abs() < 1.0, "slope={}", slope);
}

#[test]
fn walking_off_a_ledge_leaves_ground_then_lands() {
    let mut world = flat_floor();
    // Platform one meter high over z in [-2, 2]
    world.add_box(
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(3.0, 0.5, 2.0),
        LayerMask::TERRAIN,
    );

    let mut harness = Harness::new(world, ControllerConfig::default(), Vec3::new(0.0, 1.5, 0.0));
    harness.settle();
    assert!((harness.height() - 1.0).abs() < 0.02);

    let mut left = 0;
    let mut landed = 0;
    for _ in 0..90 {
        let events = harness.step(forward());
        left += events.left_ground as u32;
        landed += events.landed as u32;
        assert!(!events.jumped);
    }

    assert_eq!(left, 1);
    assert_eq!(landed, 1);
    assert!(harness.state.is_grounded);
    assert!(harness.height() < 0.02, "y={}", harness.height());
}

#[test]
fn crouch_under_ceiling_blocks_standing_until_clear() {
    let mut world = flat_floor();
    // Ceiling underside at 1.5 over x in [-2, 2]
    world.add_box(
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(2.0, 0.5, 6.0),
        LayerMask::DEFAULT,
    );

    let mut harness = Harness::new(world, ControllerConfig::default(), Vec3::new(5.0, 0.5, 0.0));
    harness.settle();

    let crouch = InputFrame {
        crouch_pressed: true,
        ..Default::default()
    };
    assert_eq!(harness.step(crouch).stance_changed, Some(true));
    for _ in 0..60 {
        harness.step(InputFrame::default());
    }

    // Strafe left under the ceiling and stop
    let strafe = |x: f32| InputFrame {
        move_axis: Vec2::new(x, 0.0),
        ..Default::default()
    };
    for _ in 0..60 {
        harness.step(strafe(-1.0));
    }
    for _ in 0..60 {
        harness.step(InputFrame::default());
    }
    assert!(harness.body.position.x.abs() < 1.6, "x={}", harness.body.position.x);

    // Every way of standing up is refused
    for input in [crouch, InputFrame::jump(), InputFrame { sprint_held: true, ..Default::default() }] {
        let events = harness.step(input);
        assert!(events.stance_denied, "input {:?} should be denied", input);
        assert!(!events.jumped);
        assert!(harness.state.stance.is_crouching);
        assert_eq!(harness.state.stance.target_height, 1.0);
    }
    assert!(harness.body.height <= 1.0 + 1e-4);

    // Back out into the open and stand
    for _ in 0..60 {
        harness.step(strafe(1.0));
    }
    for _ in 0..60 {
        harness.step(InputFrame::default());
    }
    assert!(harness.body.position.x > 2.5, "x={}", harness.body.position.x);

    assert_eq!(harness.step(crouch).stance_changed, Some(false));
    for _ in 0..60 {
        harness.step(InputFrame::default());
    }
    assert_eq!(harness.body.height, 1.8);

    // Spawn, crouch and stand were all reported to the observer
    assert_eq!(harness.stance_log.first(), Some(&false));
    assert!(harness.stance_log.contains(&true));
    assert_eq!(harness.stance_log.last(), Some(&false));
}
