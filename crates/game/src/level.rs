//! Level geometry and spawn points.

use droid_physics::{Capsule, CollisionWorld, LayerMask};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A level: collision geometry plus named places to put characters.
#[derive(Debug)]
pub struct Level {
    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A named spawn point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Identifier used to look the spawn up.
    pub name: String,

    /// Feet position in world space.
    pub position: Vec3,

    /// Initial facing, in degrees clockwise from -Z when seen from above.
    pub yaw_degrees: f32,
}

impl SpawnPoint {
    pub fn new(name: &str, position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            name: name.to_string(),
            position,
            yaw_degrees,
        }
    }

    /// Body rotation for this spawn's facing.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw_degrees.to_radians())
    }
}

impl Level {
    /// Wall height for the course boundary.
    const WALL_HEIGHT: f32 = 5.0;
    const WALL_THICKNESS: f32 = 0.5;
    const COURSE_SIZE: f32 = 40.0;

    /// Create an empty level.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// A course exercising every movement feature.
    ///
    /// ```text
    ///          -Z
    ///   ramp   ledge   steep
    ///  (20°)  (0.2 m)  (60°)
    ///
    ///          start
    ///
    ///       low ceiling
    ///         ceiling
    ///          +Z
    /// ```
    pub fn test_course() -> Self {
        let mut level = Self::new("Test Course");
        let size = Self::COURSE_SIZE;
        let half_wall = Self::WALL_HEIGHT / 2.0;
        let thickness = Self::WALL_THICKNESS;

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(size, 0.5, size),
            LayerMask::TERRAIN,
        );

        // Boundary walls
        for (center, half_extents) in [
            (Vec3::new(0.0, half_wall, -size), Vec3::new(size, half_wall, thickness)),
            (Vec3::new(0.0, half_wall, size), Vec3::new(size, half_wall, thickness)),
            (Vec3::new(size, half_wall, 0.0), Vec3::new(thickness, half_wall, size)),
            (Vec3::new(-size, half_wall, 0.0), Vec3::new(thickness, half_wall, size)),
        ] {
            level.collision.add_box(center, half_extents, LayerMask::DEFAULT);
        }

        // Walkable ramp rising toward -Z
        level.collision.add_oriented_box(
            Vec3::new(-15.0, 0.0, -12.0),
            Vec3::new(3.0, 0.5, 6.0),
            Quat::from_rotation_x(20.0_f32.to_radians()),
            LayerMask::TERRAIN,
        );

        // Too steep to stand on
        level.collision.add_oriented_box(
            Vec3::new(15.0, 0.0, -12.0),
            Vec3::new(3.0, 0.5, 6.0),
            Quat::from_rotation_x(60.0_f32.to_radians()),
            LayerMask::TERRAIN,
        );

        // Step ledge, low enough to walk onto
        level.collision.add_box(
            Vec3::new(0.0, 0.1, -10.0),
            Vec3::new(4.0, 0.1, 2.0),
            LayerMask::PROPS,
        );

        // Low ceiling, only passable crouched
        level.collision.add_box(
            Vec3::new(0.0, 2.0, 15.0),
            Vec3::new(3.0, 0.5, 4.0),
            LayerMask::DEFAULT,
        );

        level.spawn_points.push(SpawnPoint::new("start", Vec3::new(0.0, 0.05, 0.0), 0.0));
        level.spawn_points.push(SpawnPoint::new("ramp", Vec3::new(-15.0, 0.05, -2.0), 0.0));
        level.spawn_points.push(SpawnPoint::new("ceiling", Vec3::new(0.0, 0.05, 22.0), 0.0));

        level
    }

    /// Look up a spawn point by name.
    pub fn spawn(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|s| s.name == name)
    }

    /// Spawn point for the `index`th player, wrapping around.
    pub fn spawn_for(&self, index: usize) -> Option<&SpawnPoint> {
        if self.spawn_points.is_empty() {
            return None;
        }
        self.spawn_points.get(index % self.spawn_points.len())
    }

    /// Whether a standing capsule fits at the spawn without touching anything.
    pub fn is_clear(&self, spawn: &SpawnPoint, height: f32, radius: f32) -> bool {
        let capsule = Capsule::upright(spawn.position, Vec3::Y, height, radius);
        !self.collision.overlaps(&capsule, LayerMask::MASK_SOLID)
    }
}
