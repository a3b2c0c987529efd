//! Physics-facing types for the reaction core
//!
//! The physics engine is an external collaborator. This module holds the
//! data it reports (floor probes, contact pairs), the layer filter used for
//! probes, and the pure geometry used to align manifestations with the floor.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod geometry;

pub use collision::{BoundingSphere, FloorProbe, Plane, Ray};
pub use collision_layers::CollisionLayers;
pub use collision_system::{ColliderSnapshot, CollisionPair, ContactTracker};
