//! Collision queries for character movement.
//!
//! This module provides capsule sweeps and overlaps against world geometry.
//!
//! # Key Types
//!
//! - [`ShapeCastProvider`]: The query interface the movement code depends on
//! - [`CollisionWorld`]: A parry3d-backed implementation holding static brushes
//! - [`Capsule`]: Capsule described by its two hemisphere centers and a radius
//! - [`CastHit`]: First surface touched by a sweep
//!
//! # Sweep Semantics
//!
//! A sweep moves a capsule along a direction and reports:
//! - How far it traveled before touching something
//! - The surface normal at impact (pointing away from the surface)
//! - The contact point and the collider that was hit
//!
//! Colliders already overlapping the capsule at the start pose are ignored,
//! as are colliders the sweep only slides along without moving into them.

mod flags;
mod provider;
mod shape;
mod world;

pub use flags::LayerMask;
pub use provider::ShapeCastProvider;
pub use shape::{Capsule, CastHit, ColliderId};
pub use world::CollisionWorld;
