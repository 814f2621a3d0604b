//! Collision world containing static brush geometry.
//!
//! The collision world stores convex brushes and answers capsule sweeps and
//! overlaps against them using parry3d shape casts and contact queries.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{cast_shapes, contact, Contact, ShapeCastOptions};
use parry3d::shape::SharedShape;

use super::flags::LayerMask;
use super::provider::ShapeCastProvider;
use super::shape::{Capsule, CastHit, ColliderId};

/// Overlaps shallower than this count as touching rather than penetrating.
const PENETRATION_SLOP: f32 = 1.0e-3;

/// Sweeps must move into a surface by at least this much to register a hit.
const GRAZE_EPSILON: f32 = 1.0e-4;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: ColliderId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Layers this brush belongs to.
    pub layers: LayerMask,
}

/// The collision world containing all static geometry.
///
/// Supports axis-aligned boxes, oriented boxes (ramps) and convex hulls.
/// Every brush must be convex: sweeps rely on that to discard surfaces the
/// capsule only slides along.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `layers` - Layers the box belongs to
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> ColliderId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, layers)
    }

    /// Add a rotated box to the world. Useful for ramps and tilted platforms.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        ));
        let transform =
            Isometry::from_parts(Translation3::new(center.x, center.y, center.z), rotation);

        self.push(shape, transform, layers)
    }

    /// Add a convex hull to the world.
    ///
    /// Returns `None` if the hull couldn't be computed (e.g. coplanar points).
    pub fn add_convex_hull(&mut self, points: &[Vec3], layers: LayerMask) -> Option<ColliderId> {
        let parry_points: Vec<Point<Real>> = points.iter().map(|p| to_point(*p)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;

        Some(self.push(shape, Isometry::identity(), layers))
    }

    /// Remove a brush. Returns whether it existed.
    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.brushes.len();
        self.brushes.retain(|brush| brush.id != id);
        self.brushes.len() != before
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: ColliderId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|brush| brush.id == id)
    }

    /// Check whether `capsule` penetrates any brush in `mask`.
    pub fn overlaps(&self, capsule: &Capsule, mask: LayerMask) -> bool {
        let shape = capsule_shape(capsule);
        let pose = Isometry::identity();
        self.filtered(mask)
            .any(|brush| penetration_depth(&shape, &pose, brush).is_some())
    }

    /// Compute the offset that pushes `capsule` out of every brush in `mask`.
    ///
    /// Returns zero when nothing is penetrated.
    pub fn penetration(&self, capsule: &Capsule, mask: LayerMask) -> Vec3 {
        let shape = capsule_shape(capsule);
        let pose = Isometry::identity();

        let mut correction = Vec3::ZERO;
        for brush in self.filtered(mask) {
            if let Some(contact) = brush_contact(&shape, &pose, brush, 0.0) {
                let depth = -contact.dist;
                if depth > PENETRATION_SLOP {
                    correction += surface_normal(&contact) * (depth + PENETRATION_SLOP);
                }
            }
        }

        correction
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>, layers: LayerMask) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layers,
        });

        id
    }

    fn filtered(&self, mask: LayerMask) -> impl Iterator<Item = &CollisionBrush> {
        self.brushes
            .iter()
            .filter(move |brush| mask.intersects(brush.layers))
    }

    /// Sweep against a single brush, returning `(distance, normal, point)`.
    fn sweep_brush(
        &self,
        shape: &SharedShape,
        capsule: &Capsule,
        brush: &CollisionBrush,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<(f32, Vec3, Vec3)> {
        let origin = Isometry::identity();

        // Starting pose: ignore brushes we're already inside, and brushes we
        // touch but are moving away from.
        if let Some(start) = brush_contact(shape, &origin, brush, 0.0) {
            if start.dist < -PENETRATION_SLOP {
                return None;
            }
            let point = to_vec3(&start.point2.coords);
            let normal = impact_normal(capsule, Vec3::ZERO, point, surface_normal(&start));
            if direction.dot(normal) >= -GRAZE_EPSILON {
                return None;
            }
            return Some((0.0, normal, point));
        }

        let options = ShapeCastOptions {
            max_time_of_impact: max_distance,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };
        let hit = cast_shapes(
            &origin,
            &to_vector(direction),
            shape.as_ref(),
            &brush.transform,
            &Vector::zeros(),
            brush.shape.as_ref(),
            options,
        )
        .ok()
        .flatten()?;

        let distance = hit.time_of_impact;
        let point = brush.transform * hit.witness2;
        let point = to_vec3(&point.coords);
        let normal = impact_normal(
            capsule,
            direction * distance,
            point,
            -to_vec3(&hit.normal1),
        );
        if direction.dot(normal) >= -GRAZE_EPSILON {
            return None;
        }

        Some((distance, normal, point))
    }
}

impl ShapeCastProvider for CollisionWorld {
    fn capsule_cast(
        &self,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !(max_distance > 0.0) {
            return None;
        }

        let shape = capsule_shape(capsule);
        let mut closest: Option<CastHit> = None;

        for brush in self.filtered(mask) {
            let Some((distance, normal, point)) =
                self.sweep_brush(&shape, capsule, brush, direction, max_distance)
            else {
                continue;
            };

            let is_closer = closest.as_ref().map_or(true, |hit| distance < hit.distance);
            if is_closer {
                closest = Some(CastHit {
                    point,
                    normal,
                    distance,
                    collider: brush.id,
                });
            }
        }

        closest
    }

    fn capsule_overlap(&self, capsule: &Capsule, mask: LayerMask) -> Vec<ColliderId> {
        let shape = capsule_shape(capsule);
        let pose = Isometry::identity();

        self.filtered(mask)
            .filter(|brush| penetration_depth(&shape, &pose, brush).is_some())
            .map(|brush| brush.id)
            .collect()
    }
}

// ============================================================================
// parry3d conversions
// ============================================================================

fn capsule_shape(capsule: &Capsule) -> SharedShape {
    SharedShape::capsule(to_point(capsule.bottom), to_point(capsule.top), capsule.radius)
}

fn brush_contact(
    shape: &SharedShape,
    pose: &Isometry<Real>,
    brush: &CollisionBrush,
    prediction: Real,
) -> Option<Contact> {
    contact(pose, shape.as_ref(), &brush.transform, brush.shape.as_ref(), prediction)
        .ok()
        .flatten()
}

/// Penetration depth if the shapes overlap by more than the slop.
fn penetration_depth(
    shape: &SharedShape,
    pose: &Isometry<Real>,
    brush: &CollisionBrush,
) -> Option<f32> {
    brush_contact(shape, pose, brush, 0.0)
        .map(|contact| -contact.dist)
        .filter(|depth| *depth > PENETRATION_SLOP)
}

/// Normal of the brush surface, pointing from the brush toward the capsule.
fn surface_normal(contact: &Contact) -> Vec3 {
    -to_vec3(&contact.normal1)
}

/// Surface normal at `point` where the capsule, moved by `offset`, touches a brush.
///
/// A touching capsule's surface normal runs from the nearest point of its core
/// segment through the contact point. Falls back to `fallback` when the point
/// sits on the core.
fn impact_normal(capsule: &Capsule, offset: Vec3, point: Vec3, fallback: Vec3) -> Vec3 {
    let bottom = capsule.bottom + offset;
    let axis = capsule.top - capsule.bottom;
    let length_squared = axis.length_squared();
    let t = if length_squared > 0.0 {
        ((point - bottom).dot(axis) / length_squared).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (bottom + axis * t - point).try_normalize().unwrap_or(fallback)
}

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
