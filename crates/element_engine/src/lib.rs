//! # Element Engine
//!
//! Reaction core for element boxes: physical objects tagged with an
//! element and a category that destroy each other, or fuse into a new
//! object, when they touch.
//!
//! ## Features
//!
//! - **Reaction Table**: Pure, data-driven outcome for any two element boxes
//! - **Manifestation Placement**: Grid and single spawns oriented along motion and floor slope
//! - **Collision Coordinator**: Exactly one reaction per physical contact, whatever the report order
//! - **Configuration**: TOML/RON engine settings with load-time validation
//!
//! The engine owns no entities and runs no physics. Hosts implement
//! [`reactions::EntityLifecycle`] and [`reactions::PhysicsQueries`] and
//! forward every contact-begin report to the coordinator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use element_engine::prelude::*;
//!
//! fn step<W: EntityLifecycle, P: PhysicsQueries>(
//!     coordinator: &mut CollisionCoordinator,
//!     world: &mut W,
//!     physics: &P,
//!     contacts: &[(Entity, Entity)],
//! ) {
//!     for &(reporter, other) in contacts {
//!         coordinator.on_contact_begin(reporter, other, &mut *world, physics);
//!     }
//!     coordinator.advance(1.0 / 60.0, &*world);
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod ecs;
pub mod elements;
pub mod events;
pub mod foundation;
pub mod manifestation;
pub mod physics;
pub mod reactions;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig},
        ecs::Entity,
        elements::{Category, Element, ElementAttributes, ElementBox, Location, LocationSubtype, Outcome, ReactionTable},
        events::{EventHandler, EventSystem, EventType, LoggingHandler, ReactionEvent},
        foundation::math::{Quat, Transform, Vec3, WORLD_FORWARD, WORLD_UP},
        manifestation::{ManifestationSpec, PlacementSettings},
        physics::{CollisionLayers, CollisionPair, FloorProbe},
        reactions::{
            CollisionCoordinator, CoordinatorConfig, EntityLifecycle, PhysicsQueries, Reaction, ReactionError,
            Resolution,
        },
    };
}
