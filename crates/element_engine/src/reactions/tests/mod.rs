//! End-to-end reaction scenarios against an in-memory collaborator

mod scenarios;

use crate::ecs::Entity;
use crate::elements::{Category, Element, ElementAttributes, ElementBox};
use crate::foundation::math::{Transform, Vec3, WORLD_UP};
use crate::manifestation::ManifestationSpec;
use crate::physics::collision::FloorProbe;
use crate::physics::collision_layers::CollisionLayers;
use crate::reactions::{EntityLifecycle, PhysicsQueries};
use std::collections::BTreeMap;

/// Spawned manifestation record
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Spawned {
    pub entity: Entity,
    pub prefab_id: String,
    pub transform: Transform,
}

/// Entity store that refuses to destroy anything twice
#[derive(Debug, Default)]
pub(super) struct TestWorld {
    boxes: BTreeMap<Entity, ElementBox>,
    pub spawned: Vec<Spawned>,
    pub destroyed: Vec<Entity>,
    next_id: u32,
}

impl TestWorld {
    pub fn new() -> Self {
        Self { next_id: 1, ..Default::default() }
    }

    /// Add a resting box at `position` and return its id
    pub fn add(&mut self, element: Element, category: Category, position: Vec3) -> Entity {
        let entity = Entity::new(self.next_id);
        self.next_id += 1;
        self.boxes.insert(
            entity,
            ElementBox::new(entity, ElementAttributes::new(element, category), position),
        );
        entity
    }

    pub fn edit(&mut self, entity: Entity, f: impl FnOnce(ElementBox) -> ElementBox) {
        if let Some(element_box) = self.boxes.remove(&entity) {
            self.boxes.insert(entity, f(element_box));
        }
    }

    pub fn alive(&self) -> Vec<Entity> {
        self.boxes.keys().copied().collect()
    }
}

impl EntityLifecycle for TestWorld {
    fn element_box(&self, entity: Entity) -> Option<ElementBox> {
        self.boxes.get(&entity).cloned()
    }

    fn destroy(&mut self, entity: Entity) {
        assert!(self.boxes.remove(&entity).is_some(), "{entity} destroyed twice");
        self.destroyed.push(entity);
    }

    fn instantiate(&mut self, prefab_id: &str, transform: &Transform) -> Entity {
        let entity = Entity::new(self.next_id);
        self.next_id += 1;
        self.spawned.push(Spawned {
            entity,
            prefab_id: prefab_id.to_string(),
            transform: *transform,
        });
        entity
    }
}

/// Floor at a fixed height with a fixed normal
#[derive(Debug, Clone, Copy)]
pub(super) struct Floor {
    pub height: f32,
    pub normal: Vec3,
}

impl Floor {
    pub const fn flat(height: f32) -> Self {
        Self { height, normal: WORLD_UP }
    }
}

impl PhysicsQueries for Floor {
    fn probe_floor(&self, from: &Vec3, max_distance: f32, _exclude: CollisionLayers) -> Option<FloorProbe> {
        let distance = from.y - self.height;
        if distance < 0.0 || distance > max_distance {
            return None;
        }
        Some(FloorProbe {
            normal: self.normal,
            point: Vec3::new(from.x, self.height, from.z),
            distance,
        })
    }
}

/// Category a box of `element` is usually authored with
pub(super) const fn natural_category(element: Element) -> Category {
    match element {
        Element::Void => Category::Void,
        Element::Balance => Category::Balance,
        Element::Order | Element::Stone | Element::Ice | Element::Water | Element::Light | Element::Life => {
            Category::Order
        }
        Element::Chaos
        | Element::Lightning
        | Element::Fire
        | Element::Wind
        | Element::Shadow
        | Element::Death => Category::Chaos,
    }
}

pub(super) fn golem() -> ManifestationSpec {
    ManifestationSpec::single("golem")
}
