//! Collision layer system for filtering contacts and probes
//!
//! Floor probes exclude the element-box layer so a box resting on another
//! box is never mistaken for the floor.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Reactive element boxes
        const ELEMENT_BOX = 1 << 0;
        /// The locomoting agent
        const AGENT = 1 << 1;
        /// Static floor geometry
        const FLOOR = 1 << 2;
        /// Spawned manifestation objects
        const MANIFESTATION = 1 << 3;
        /// Every layer
        const ALL = Self::ELEMENT_BOX.bits()
            | Self::AGENT.bits()
            | Self::FLOOR.bits()
            | Self::MANIFESTATION.bits();
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

impl CollisionLayers {
    /// Check if two entities should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask and B's layer must be in A's mask.
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// Whether a surface on `layer` passes a probe that excludes `exclude`
    pub fn passes_probe(layer: Self, exclude: Self) -> bool {
        !layer.intersects(exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::ELEMENT_BOX,
            CollisionLayers::ELEMENT_BOX | CollisionLayers::AGENT,
            CollisionLayers::AGENT,
            CollisionLayers::ELEMENT_BOX,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::ELEMENT_BOX,
            CollisionLayers::ALL,
            CollisionLayers::MANIFESTATION,
            CollisionLayers::FLOOR,
        ));
    }

    #[test]
    fn test_probe_exclusion() {
        assert!(CollisionLayers::passes_probe(CollisionLayers::FLOOR, CollisionLayers::ELEMENT_BOX));
        assert!(!CollisionLayers::passes_probe(CollisionLayers::ELEMENT_BOX, CollisionLayers::ELEMENT_BOX));
    }
}
