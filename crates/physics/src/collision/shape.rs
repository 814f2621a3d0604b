//! Query shapes and sweep results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque reference to a collider in a collision world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A capsule defined by the centers of its two hemispheres.
///
/// `bottom` and `top` may coincide, in which case the capsule is a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Center of the lower hemisphere.
    pub bottom: Vec3,
    /// Center of the upper hemisphere.
    pub top: Vec3,
    /// Radius of the cylinder and both caps.
    pub radius: f32,
}

impl Capsule {
    /// Create a capsule from its hemisphere centers.
    pub fn new(bottom: Vec3, top: Vec3, radius: f32) -> Self {
        Self { bottom, top, radius }
    }

    /// Create a capsule standing on `feet` and extending `height` along `up`.
    ///
    /// Heights below `2 * radius` collapse into a sphere resting on `feet`.
    pub fn upright(feet: Vec3, up: Vec3, height: f32, radius: f32) -> Self {
        if height < 2.0 * radius {
            log::trace!("capsule height {} below diameter {}, using a sphere", height, 2.0 * radius);
        }
        Self::new(feet + up * radius, feet + up * (height - radius).max(radius), radius)
    }

    /// Total extent from the lowest to the highest point of the capsule.
    pub fn height(&self) -> f32 {
        (self.top - self.bottom).length() + 2.0 * self.radius
    }

    /// The same capsule moved by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.bottom + offset, self.top + offset, self.radius)
    }

    /// Midpoint between the hemisphere centers.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.bottom + self.top) * 0.5
    }
}

/// The first surface touched by a capsule sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastHit {
    /// Contact point on the surface that was hit.
    pub point: Vec3,
    /// Surface normal at the contact, pointing away from the surface.
    pub normal: Vec3,
    /// Distance traveled along the sweep direction before touching.
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderId,
}
