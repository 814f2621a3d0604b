//! The shape-cast interface consumed by movement code.

use glam::Vec3;

use super::flags::LayerMask;
use super::shape::{Capsule, CastHit, ColliderId};

/// Answers "what geometry does this capsule touch" for the movement code.
///
/// Queries are synchronous and must complete before movement decisions are
/// made. "Nothing hit" is the normal answer, not a failure.
pub trait ShapeCastProvider {
    /// Sweep `capsule` along `direction` for up to `max_distance`.
    ///
    /// `direction` is expected to be normalized. Colliders overlapping the
    /// capsule at its starting pose are ignored, as are colliders whose layers
    /// don't intersect `mask`.
    fn capsule_cast(
        &self,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit>;

    /// All colliders in `mask` that overlap `capsule` where it stands.
    fn capsule_overlap(&self, capsule: &Capsule, mask: LayerMask) -> Vec<ColliderId>;
}

impl<T: ShapeCastProvider + ?Sized> ShapeCastProvider for &T {
    fn capsule_cast(
        &self,
        capsule: &Capsule,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<CastHit> {
        (**self).capsule_cast(capsule, direction, max_distance, mask)
    }

    fn capsule_overlap(&self, capsule: &Capsule, mask: LayerMask) -> Vec<ColliderId> {
        (**self).capsule_overlap(capsule, mask)
    }
}
