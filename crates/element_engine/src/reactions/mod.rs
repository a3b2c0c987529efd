//! Reaction resolution
//!
//! Ties the reaction table and manifestation placement to the external
//! physics and lifecycle collaborators.

pub mod collaborators;
pub mod coordinator;

#[cfg(test)]
mod tests;

pub use collaborators::{EntityLifecycle, NoFloor, PhysicsQueries};
pub use coordinator::{
    validate_authoring, CollisionCoordinator, CoordinatorConfig, PairState, Reaction, Resolution,
};

use crate::ecs::Entity;
use crate::elements::Element;
use crate::foundation::math::Vec3;
use crate::physics::collision_system::CollisionPair;

/// Problems met while resolving a contact
///
/// None of these stop the simulation. They are logged, attached to the
/// [`Reaction`] or [`Resolution`] they occurred in, and the step goes on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReactionError {
    /// A report named an entity that was already destroyed
    #[error("entity {0} no longer exists")]
    StaleEntityReference(Entity),

    /// Both bodies were at rest, so the facing came from a fallback
    #[error("both bodies of {pair:?} at rest; facing fell back to {fallback:?}")]
    DegenerateDirection {
        /// Contact pair
        pair: CollisionPair,
        /// Direction used instead
        fallback: Vec3,
    },

    /// A manifest outcome with no manifestation spec on either box
    #[error("{entity} ({element}) manifested without a manifestation spec")]
    MissingManifestationSpec {
        /// Acting entity
        entity: Entity,
        /// Its element
        element: Element,
    },

    /// A manifestation spec that fails validation
    #[error("invalid manifestation spec on {entity}: {reason}")]
    InvalidManifestationSpec {
        /// Entity carrying the spec
        entity: Entity,
        /// Validation failure
        reason: String,
    },
}
