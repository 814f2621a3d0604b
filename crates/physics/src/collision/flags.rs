//! Layer masks for collision filtering.
//!
//! Every collider belongs to one or more layers. Queries carry a mask and only
//! see colliders whose layers intersect it, so ground probes can ignore props
//! and no character query ever collides with trigger volumes.

use serde::{Deserialize, Serialize};

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layers - queries with this mask never hit anything.
    pub const EMPTY: Self = Self(0);

    /// Untagged static geometry.
    pub const DEFAULT: Self = Self(1 << 0);

    /// Walkable terrain and level architecture.
    pub const TERRAIN: Self = Self(1 << 1);

    /// Loose props and clutter.
    pub const PROPS: Self = Self(1 << 2);

    /// Character bodies.
    pub const CHARACTER: Self = Self(1 << 3);

    /// Trigger volumes - never block movement.
    pub const TRIGGER: Self = Self(1 << 4);

    /// Every layer, triggers included.
    pub const ALL: Self = Self(u32::MAX);

    /// Everything that physically blocks a character.
    pub const MASK_SOLID: Self = Self(u32::MAX & !Self::TRIGGER.0);

    /// Check if this mask contains every layer of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any layer is shared with `other`.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Combine two masks.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove the layers of `other` from this mask.
    #[inline]
    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask_operations() {
        let combined = LayerMask::TERRAIN | LayerMask::PROPS;

        assert!(combined.contains(LayerMask::TERRAIN));
        assert!(combined.contains(LayerMask::PROPS));
        assert!(!combined.contains(LayerMask::TRIGGER));
        assert!(combined.intersects(LayerMask::PROPS | LayerMask::TRIGGER));
        assert_eq!(combined.without(LayerMask::PROPS), LayerMask::TERRAIN);
    }

    #[test]
    fn test_solid_mask_excludes_triggers() {
        let mask = LayerMask::MASK_SOLID;
        assert!(mask.contains(LayerMask::DEFAULT));
        assert!(mask.contains(LayerMask::CHARACTER));
        assert!(!mask.intersects(LayerMask::TRIGGER));
        assert!(!LayerMask::EMPTY.intersects(LayerMask::ALL));
    }
}
