//! Interfaces to the systems the reaction core drives
//!
//! The core owns no entities and runs no physics. It reads box snapshots
//! from an [`EntityLifecycle`], asks a [`PhysicsQueries`] implementation
//! for floor probes, and issues destroy/instantiate commands back.

use crate::ecs::Entity;
use crate::elements::ElementBox;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::FloorProbe;
use crate::physics::collision_layers::CollisionLayers;

/// Entity-lifecycle collaborator
///
/// Destruction must take effect immediately: once `destroy` returns,
/// `element_box` for that entity yields `None`.
pub trait EntityLifecycle {
    /// Current snapshot of a live element box; `None` once destroyed
    fn element_box(&self, entity: Entity) -> Option<ElementBox>;

    /// Whether the entity still exists
    fn is_alive(&self, entity: Entity) -> bool {
        self.element_box(entity).is_some()
    }

    /// Position of a live box
    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.element_box(entity).map(|b| b.position)
    }

    /// Velocity of a live box
    fn velocity(&self, entity: Entity) -> Option<Vec3> {
        self.element_box(entity).map(|b| b.velocity)
    }

    /// Half extents of a live box
    fn bounding_extents(&self, entity: Entity) -> Option<Vec3> {
        self.element_box(entity).map(|b| b.bounding_extents)
    }

    /// Destroy an entity
    fn destroy(&mut self, entity: Entity);

    /// Spawn a prefab and return the new entity
    fn instantiate(&mut self, prefab_id: &str, transform: &Transform) -> Entity;
}

/// Physics collaborator queries
pub trait PhysicsQueries {
    /// Probe straight down from `from` for at most `max_distance`,
    /// ignoring surfaces on any layer in `exclude`
    fn probe_floor(&self, from: &Vec3, max_distance: f32, exclude: CollisionLayers) -> Option<FloorProbe>;
}

/// Physics collaborator without any floor
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFloor;

impl PhysicsQueries for NoFloor {
    fn probe_floor(&self, _from: &Vec3, _max_distance: f32, _exclude: CollisionLayers) -> Option<FloorProbe> {
        None
    }
}
