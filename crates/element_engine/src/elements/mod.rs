//! Element data model
//!
//! Every reactive box carries a fixed set of authored tags. Only `Element`
//! and `Category` drive reactions; `Location` and `LocationSubtype` are
//! carried as inert metadata.

pub mod reaction;

pub use reaction::{resolve, OppositePair, Outcome, ReactionTable};

use crate::ecs::Entity;
use crate::foundation::math::Vec3;
use crate::manifestation::ManifestationSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary element tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Erases anything aligned with Order or Chaos
    Void,
    /// Inert to direct element matching
    Balance,
    /// Annihilates with Chaos
    Order,
    /// Annihilates with Order
    Chaos,
    /// Material member of the Stone/Lightning pair
    Stone,
    /// Energy member of the Stone/Lightning pair
    Lightning,
    /// Material member of the Ice/Fire pair
    Ice,
    /// Energy member of the Ice/Fire pair
    Fire,
    /// Material member of the Water/Wind pair
    Water,
    /// Energy member of the Water/Wind pair
    Wind,
    /// Opposes Light
    Shadow,
    /// Opposes Shadow
    Light,
    /// Opposes Life
    Death,
    /// Opposes Death
    Life,
}

impl Element {
    /// Every element, in declaration order
    pub const ALL: [Self; 14] = [
        Self::Void,
        Self::Balance,
        Self::Order,
        Self::Chaos,
        Self::Stone,
        Self::Lightning,
        Self::Ice,
        Self::Fire,
        Self::Water,
        Self::Wind,
        Self::Shadow,
        Self::Light,
        Self::Death,
        Self::Life,
    ];
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Coarse alignment, consulted only by the Void rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Void-aligned
    Void,
    /// Balance-aligned
    Balance,
    /// Order-aligned
    Order,
    /// Chaos-aligned
    Chaos,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Self; 4] = [Self::Void, Self::Balance, Self::Order, Self::Chaos];

    /// Whether a Void box erases a box of this category
    pub const fn is_erased_by_void(self) -> bool {
        matches!(self, Self::Order | Self::Chaos)
    }
}

/// Descriptive location tag (inert)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// No location
    #[default]
    Void,
    /// Point-like
    Point,
    /// Material
    Material,
    /// Force
    Force,
}

/// Descriptive location subtype (inert)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationSubtype {
    /// No subtype
    #[default]
    None,
    /// Base form
    Base,
    /// Transcendent form
    Transcendent,
}

/// Authored, immutable tags of one element box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementAttributes {
    /// Element driving the reaction table
    pub element: Element,
    /// Category consulted by the Void rule
    pub category: Category,
    /// Inert location tag
    #[serde(default)]
    pub location: Location,
    /// Inert location subtype
    #[serde(default)]
    pub location_subtype: LocationSubtype,
}

impl ElementAttributes {
    /// Tags with default location metadata
    pub const fn new(element: Element, category: Category) -> Self {
        Self {
            element,
            category,
            location: Location::Void,
            location_subtype: LocationSubtype::None,
        }
    }

    /// Builder pattern: set location metadata
    #[must_use]
    pub const fn with_location(mut self, location: Location, subtype: LocationSubtype) -> Self {
        self.location = location;
        self.location_subtype = subtype;
        self
    }

    /// The `(element, category)` key the reaction table reads
    pub const fn key(&self) -> (Element, Category) {
        (self.element, self.category)
    }
}

/// Snapshot of a reactive box, as reported by the lifecycle collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBox {
    /// Entity id
    pub entity: Entity,
    /// Authored tags
    pub attributes: ElementAttributes,
    /// World position
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
    /// Half-size of the bounding box
    pub bounding_extents: Vec3,
    /// What this box manifests into, when it can
    pub manifestation: Option<ManifestationSpec>,
}

impl ElementBox {
    /// A resting unit box at `position`
    pub fn new(entity: Entity, attributes: ElementAttributes, position: Vec3) -> Self {
        Self {
            entity,
            attributes,
            position,
            velocity: Vec3::zeros(),
            bounding_extents: Vec3::new(0.5, 0.5, 0.5),
            manifestation: None,
        }
    }

    /// Builder pattern: set velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder pattern: set bounding extents
    #[must_use]
    pub fn with_extents(mut self, extents: Vec3) -> Self {
        self.bounding_extents = extents;
        self
    }

    /// Builder pattern: attach a manifestation spec
    #[must_use]
    pub fn with_manifestation(mut self, spec: ManifestationSpec) -> Self {
        self.manifestation = Some(spec);
        self
    }

    /// Element tag
    pub const fn element(&self) -> Element {
        self.attributes.element
    }

    /// Category tag
    pub const fn category(&self) -> Category {
        self.attributes.category
    }
}
