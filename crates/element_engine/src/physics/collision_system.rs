//! Contact tracking
//!
//! Turns per-frame overlap sets into contact-begin / contact-end events.
//! Physics engines report a begin event to each participant, so one
//! physical contact reaches the reaction core twice; [`CollisionPair`] is
//! the unordered key that lets the coordinator tell those reports apart
//! from genuinely new contacts.

use crate::ecs::Entity;
use crate::physics::collision::BoundingSphere;
use crate::physics::collision_layers::CollisionLayers;
use std::collections::HashSet;

/// Collision pair representing two entities that are in contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    /// Entity with the lower id
    pub entity_a: Entity,
    /// Entity with the higher id
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }

    /// Whether `entity` is one of the pair
    pub fn involves(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

/// Collider snapshot fed to [`ContactTracker::detect`]
#[derive(Debug, Clone, Copy)]
pub struct ColliderSnapshot {
    /// Owning entity
    pub entity: Entity,
    /// Bounding volume this step
    pub bounds: BoundingSphere,
    /// Layer the collider is on
    pub layer: CollisionLayers,
    /// Layers it collides with
    pub mask: CollisionLayers,
}

/// Frame-to-frame contact bookkeeping
#[derive(Debug, Default)]
pub struct ContactTracker {
    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,
}

impl ContactTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform overlap detection and roll the frame
    ///
    /// Brute-force pairwise test with layer filtering; returns the current
    /// contact set.
    pub fn detect(&mut self, colliders: &[ColliderSnapshot]) -> &HashSet<CollisionPair> {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        for (i, a) in colliders.iter().enumerate() {
            for b in &colliders[i + 1..] {
                if a.entity == b.entity {
                    continue;
                }
                if !CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask) {
                    continue;
                }
                if a.bounds.intersects(&b.bounds) {
                    self.current_pairs.insert(CollisionPair::new(a.entity, b.entity));
                }
            }
        }

        &self.current_pairs
    }

    /// Get pairs that entered contact this frame, in id order
    pub fn entered(&self) -> Vec<CollisionPair> {
        let mut pairs: Vec<_> = self.current_pairs.difference(&self.previous_pairs).copied().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Get pairs that left contact this frame, in id order
    pub fn exited(&self) -> Vec<CollisionPair> {
        let mut pairs: Vec<_> = self.previous_pairs.difference(&self.current_pairs).copied().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Get all current contact pairs
    pub fn current(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Forget an entity that no longer exists
    pub fn remove_entity(&mut self, entity: Entity) {
        self.current_pairs.retain(|pair| !pair.involves(entity));
        self.previous_pairs.retain(|pair| !pair.involves(entity));
    }}
