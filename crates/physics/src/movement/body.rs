//! Reference movement substrate backed by a [`CollisionWorld`].
//!
//! [`KinematicBody`] borrows the world and a [`BodyState`] for the duration of
//! a frame and implements [`MovementSubstrate`] with collide-and-slide movement,
//! stair stepping and depenetration.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{Capsule, ColliderId, CollisionWorld, LayerMask, ShapeCastProvider};

use super::host::MovementSubstrate;
use super::resolve::project_on_plane;

/// Moves shorter than this are dropped.
const MIN_MOVE_DISTANCE: f32 = 1.0e-5;

/// A slide direction may point into an earlier plane by at most this much.
const PLANE_TOLERANCE: f32 = 1.0e-4;

/// Static description of a body's capsule and movement limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Capsule radius.
    pub radius: f32,
    /// Contact tolerance reported to the controller.
    pub skin_width: f32,
    /// Gap left between the capsule and whatever it moved into.
    pub contact_offset: f32,
    /// Steepest walkable slope, in degrees.
    pub slope_limit: f32,
    /// Initial step offset, until the controller overrides it.
    pub step_offset: f32,
    /// Layers the body cannot pass through.
    pub collision_layers: LayerMask,
    /// Maximum number of surfaces slid along in one move.
    pub max_slide_iterations: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            skin_width: 0.08,
            contact_offset: 0.01,
            slope_limit: 45.0,
            step_offset: 0.3,
            collision_layers: LayerMask::MASK_SOLID,
            max_slide_iterations: 4,
        }
    }
}

/// Persistent body data owned by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Feet position in world space.
    pub position: Vec3,
    /// Yaw-only orientation.
    pub rotation: Quat,
    /// Current capsule height.
    pub height: f32,
    /// Step offset currently in effect.
    pub step_offset: f32,
    /// The body's own collider, if it is registered in the world.
    pub collider: Option<ColliderId>,
    pub config: BodyConfig,
}

impl BodyState {
    /// Create a body standing at `position` facing -Z.
    pub fn new(position: Vec3, height: f32, config: BodyConfig) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            height,
            step_offset: config.step_offset,
            collider: None,
            config,
        }
    }

    /// The body's capsule with its feet at `position`.
    pub fn capsule_at(&self, position: Vec3) -> Capsule {
        Capsule::upright(
            position,
            self.rotation * Vec3::Y,
            self.height,
            self.config.radius,
        )
    }
}

/// A [`BodyState`] bound to the world it moves through.
pub struct KinematicBody<'w> {
    world: &'w CollisionWorld,
    body: &'w mut BodyState,
}

impl<'w> KinematicBody<'w> {
    pub fn new(world: &'w CollisionWorld, body: &'w mut BodyState) -> Self {
        Self { world, body }
    }

    /// Push the body out of anything it has sunk into.
    ///
    /// Returns the correction applied.
    pub fn depenetrate(&mut self) -> Vec3 {
        let capsule = self.body.capsule_at(self.body.position);
        let push = self
            .world
            .penetration(&capsule, self.body.config.collision_layers);
        if push != Vec3::ZERO {
            log::trace!("depenetrating body by {:?}", push);
            self.body.position += push;
        }
        push
    }

    /// Sweep the capsule from `start` and return how far it can travel.
    fn cast(&self, start: Vec3, direction: Vec3, distance: f32) -> (f32, Option<Vec3>) {
        let capsule = self.body.capsule_at(start);
        let offset = self.body.config.contact_offset;
        match self.world.capsule_cast(
            &capsule,
            direction,
            distance + offset,
            self.body.config.collision_layers,
        ) {
            Some(hit) => ((hit.distance - offset).clamp(0.0, distance), Some(hit.normal)),
            None => (distance, None),
        }
    }

    /// Collide-and-slide from `start` along `displacement`.
    ///
    /// Returns the final position and whether anything blocked the move.
    fn slide(&self, start: Vec3, displacement: Vec3) -> (Vec3, bool) {
        let mut position = start;
        let mut remaining = displacement;
        let mut planes: Vec<Vec3> = Vec::with_capacity(self.body.config.max_slide_iterations);
        let mut blocked = false;

        for _ in 0..self.body.config.max_slide_iterations {
            let distance = remaining.length();
            if distance < MIN_MOVE_DISTANCE {
                break;
            }
            let direction = remaining / distance;

            let (travel, normal) = self.cast(position, direction, distance);
            position += direction * travel;

            let Some(normal) = normal else {
                return (position, blocked);
            };
            if travel >= distance {
                return (position, blocked);
            }
            blocked = true;

            // Slide the leftover along the new plane, or along the crease it
            // makes with an earlier one.
            remaining = project_on_plane(direction * (distance - travel), normal);
            for previous in &planes {
                if remaining.dot(*previous) < -PLANE_TOLERANCE {
                    let crease = previous.cross(normal).normalize_or_zero();
                    remaining = crease * remaining.dot(crease);
                    break;
                }
            }
            planes.push(normal);
        }

        (position, blocked)
    }

    /// Try to climb over whatever blocked a horizontal move.
    ///
    /// Rises by the step offset, slides horizontally, then drops back down.
    /// Returns `None` unless the drop lands on walkable ground.
    fn step_up(&self, start: Vec3, horizontal: Vec3) -> Option<Vec3> {
        let up = self.up();
        let step_offset = self.body.step_offset;
        if step_offset <= 0.0 || horizontal.length_squared() < MIN_MOVE_DISTANCE {
            return None;
        }

        let (rise, _) = self.cast(start, up, step_offset);
        if rise < MIN_MOVE_DISTANCE {
            return None;
        }

        let (raised, _) = self.slide(start + up * rise, horizontal);

        let (drop, normal) = self.cast(raised, -up, rise);
        let normal = normal?;
        if normal.angle_between(up).to_degrees() > self.body.config.slope_limit {
            return None;
        }

        Some(raised - up * drop)
    }
}

impl MovementSubstrate for KinematicBody<'_> {
    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn rotation(&self) -> Quat {
        self.body.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.body.rotation = rotation;
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.depenetrate();
        if displacement.length_squared() < MIN_MOVE_DISTANCE * MIN_MOVE_DISTANCE {
            return;
        }

        let start = self.body.position;
        let (slid, blocked) = self.slide(start, displacement);
        self.body.position = slid;
        if !blocked {
            return;
        }

        let up = self.up();
        let horizontal = project_on_plane(displacement, up);
        let Some(stepped) = self.step_up(start, horizontal) else {
            return;
        };

        // Keep the step only if it got further than sliding did
        let slid_progress = project_on_plane(slid - start, up).length_squared();
        let stepped_progress = project_on_plane(stepped - start, up).length_squared();
        if stepped_progress > slid_progress + MIN_MOVE_DISTANCE {
            log::trace!("stepped up by {:.3}", (stepped - start).dot(up));
            self.body.position = stepped;
        }
    }

    fn height(&self) -> f32 {
        self.body.height
    }

    fn set_height(&mut self, height: f32) {
        self.body.height = height;
    }

    fn radius(&self) -> f32 {
        self.body.config.radius
    }

    fn skin_width(&self) -> f32 {
        self.body.config.skin_width
    }

    fn step_offset(&self) -> f32 {
        self.body.step_offset
    }

    fn set_step_offset(&mut self, offset: f32) {
        self.body.step_offset = offset;
    }

    fn slope_limit(&self) -> f32 {
        self.body.config.slope_limit
    }

    fn collider(&self) -> Option<ColliderId> {
        self.body.collider
    }
}
