//! Velocity adjustments against surfaces.

use glam::Vec3;

use crate::collision::{Capsule, LayerMask, ShapeCastProvider};

use super::state::CharacterState;

/// Sweeps shorter than this skip the obstruction check.
const MIN_RESOLVE_DISTANCE: f32 = 1.0e-5;

/// Remove the component of `vector` along `normal`.
///
/// `normal` must be unit length.
#[inline]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Rotate `direction` onto the surface with normal `normal`, keeping its length.
///
/// The result lies in the surface plane and points the same way `direction`
/// does when seen from above. Slope movement uses this so walking uphill and
/// downhill keeps the requested speed instead of losing the part that would
/// go into the ground.
pub fn reorient_on_slope(direction: Vec3, normal: Vec3, up: Vec3) -> Vec3 {
    let length = direction.length();
    if length < f32::EPSILON {
        return Vec3::ZERO;
    }
    let right = direction.cross(up);
    normal.cross(right).normalize_or_zero() * length
}

/// Stop velocity from pushing into whatever the last move ran into.
///
/// Sweeps `capsule` (the body before the move) along the velocity for
/// `dt` seconds. On a hit, the velocity at that moment is recorded as the
/// latest impact and the velocity is projected onto the hit surface.
/// Otherwise the latest impact is cleared.
///
/// Returns the impact velocity if there was one.
pub fn resolve_collision(
    state: &mut CharacterState,
    physics: &dyn ShapeCastProvider,
    capsule: &Capsule,
    dt: f32,
    mask: LayerMask,
) -> Option<Vec3> {
    state.latest_impact_speed = Vec3::ZERO;

    let distance = state.velocity.length() * dt;
    if !(distance > MIN_RESOLVE_DISTANCE) {
        return None;
    }

    let direction = state.velocity.normalize();
    let hit = physics.capsule_cast(capsule, direction, distance, mask)?;

    let impact = state.velocity;
    state.latest_impact_speed = impact;
    state.velocity = project_on_plane(state.velocity, hit.normal);

    Some(impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionWorld;

    #[test]
    fn test_project_on_plane() {
        let projected = project_on_plane(Vec3::new(10.0, 0.0, 5.0), Vec3::NEG_X);
        assert!(projected.x.abs() < 1e-6);
        assert!((projected.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_reorient_keeps_length_and_follows_slope() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        // Walking toward -Z, which is uphill on this slope
        let along = reorient_on_slope(Vec3::new(0.0, 0.0, -3.0), normal, Vec3::Y);

        assert!((along.length() - 3.0).abs() < 1e-5, "along={:?}", along);
        assert!(along.dot(normal).abs() < 1e-5);
        assert!(along.y > 0.0, "should climb: {:?}", along);
        assert!(along.z < 0.0, "should keep heading: {:?}", along);
    }

    #[test]
    fn test_reorient_on_flat_ground_is_identity() {
        let direction = Vec3::new(1.5, 0.0, -2.0);
        let along = reorient_on_slope(direction, Vec3::Y, Vec3::Y);
        assert!(along.abs_diff_eq(direction, 1e-5), "along={:?}", along);
        assert_eq!(reorient_on_slope(Vec3::ZERO, Vec3::Y, Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn test_resolve_projects_velocity_onto_wall() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(1.5, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            LayerMask::DEFAULT,
        );

        let mut state = CharacterState::new(1.8);
        state.velocity = Vec3::new(30.0, 0.0, 6.0);
        let capsule = Capsule::upright(Vec3::new(0.0, 0.1, 0.0), Vec3::Y, 1.8, 0.4);

        let impact = resolve_collision(&mut state, &world, &capsule, 0.1, LayerMask::ALL);

        assert_eq!(impact, Some(Vec3::new(30.0, 0.0, 6.0)));
        assert_eq!(state.latest_impact_speed, Vec3::new(30.0, 0.0, 6.0));
        assert!(state.velocity.dot(Vec3::NEG_X).abs() < 1e-4, "v={:?}", state.velocity);
        assert!((state.velocity.z - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_clears_impact_without_hit() {
        let world = CollisionWorld::new();
        let mut state = CharacterState::new(1.8);
        state.velocity = Vec3::new(3.0, 0.0, 0.0);
        state.latest_impact_speed = Vec3::ONE;
        let capsule = Capsule::upright(Vec3::ZERO, Vec3::Y, 1.8, 0.4);

        assert!(resolve_collision(&mut state, &world, &capsule, 0.1, LayerMask::ALL).is_none());
        assert_eq!(state.latest_impact_speed, Vec3::ZERO);
        assert_eq!(state.velocity, Vec3::new(3.0, 0.0, 0.0));
    }
}
