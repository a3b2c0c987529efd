//! Headless sandbox world
//!
//! Stands in for a game engine: an entity store that the coordinator
//! destroys and spawns through, plane floors it probes, and a brute-force
//! contact pass that reports every new contact once per participant.

use crate::config::{FloorDefinition, SceneDefinition};
use element_engine::ecs::Entity;
use element_engine::elements::ElementBox;
use element_engine::events::{EventType, LoggingHandler, ReactionEvent};
use element_engine::foundation::math::{Transform, Vec3};
use element_engine::physics::{
    BoundingSphere, ColliderSnapshot, CollisionLayers, ContactTracker, FloorProbe, Plane, Ray,
};
use element_engine::reactions::{CollisionCoordinator, EntityLifecycle, PhysicsQueries, Reaction, Resolution};
use log::{debug, trace, warn};
use std::collections::BTreeMap;

/// A spawned manifestation object
#[derive(Debug, Clone, PartialEq)]
pub struct Manifestation {
    /// Prefab it was spawned from
    pub prefab_id: String,
    /// Spawn transform
    pub transform: Transform,
}

/// Entity storage for element boxes and manifestations
#[derive(Debug, Default)]
pub struct EntityStore {
    next_entity_id: u32,
    boxes: BTreeMap<Entity, ElementBox>,
    manifestations: BTreeMap<Entity, Manifestation>,
}

impl EntityStore {
    /// Create an empty store; ids start at 1
    pub fn new() -> Self {
        Self {
            next_entity_id: 1,
            ..Default::default()
        }
    }

    fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        entity
    }

    /// Add an element box built by `build` for a fresh entity
    pub fn spawn_box(&mut self, build: impl FnOnce(Entity) -> ElementBox) -> Entity {
        let entity = self.create_entity();
        self.boxes.insert(entity, build(entity));
        entity
    }

    /// Live element boxes, in id order
    pub fn boxes(&self) -> impl Iterator<Item = &ElementBox> {
        self.boxes.values()
    }

    /// Spawned manifestations, in id order
    pub fn manifestations(&self) -> impl Iterator<Item = (&Entity, &Manifestation)> {
        self.manifestations.iter()
    }

    /// Move every box along its velocity
    pub fn integrate(&mut self, delta_time: f32) {
        for element_box in self.boxes.values_mut() {
            element_box.position += element_box.velocity * delta_time;
        }
    }

    /// Bounding spheres of every live box
    pub fn colliders(&self) -> Vec<ColliderSnapshot> {
        self.boxes
            .values()
            .map(|element_box| ColliderSnapshot {
                entity: element_box.entity,
                bounds: BoundingSphere::enclosing_box(element_box.position, &element_box.bounding_extents),
                layer: CollisionLayers::ELEMENT_BOX,
                mask: CollisionLayers::ELEMENT_BOX,
            })
            .collect()
    }
}

impl EntityLifecycle for EntityStore {
    fn element_box(&self, entity: Entity) -> Option<ElementBox> {
        self.boxes.get(&entity).cloned()
    }

    fn destroy(&mut self, entity: Entity) {
        if self.boxes.remove(&entity).is_none() && self.manifestations.remove(&entity).is_none() {
            warn!("destroy requested for unknown entity {entity}");
        }
    }

    fn instantiate(&mut self, prefab_id: &str, transform: &Transform) -> Entity {
        let entity = self.create_entity();
        self.manifestations.insert(
            entity,
            Manifestation {
                prefab_id: prefab_id.to_string(),
                transform: *transform,
            },
        );
        entity
    }
}

/// Static floor planes
#[derive(Debug, Default, Clone)]
pub struct FloorSet {
    floors: Vec<(Plane, CollisionLayers)>,
}

impl FloorSet {
    /// Build from authored floors
    pub fn new(definitions: &[FloorDefinition]) -> Self {
        Self {
            floors: definitions
                .iter()
                .map(|floor| (Plane::new(floor.point, floor.normal), floor.layer))
                .collect(),
        }
    }
}

impl PhysicsQueries for FloorSet {
    fn probe_floor(&self, from: &Vec3, max_distance: f32, exclude: CollisionLayers) -> Option<FloorProbe> {
        let ray = Ray::new(*from, -Vec3::y());
        self.floors
            .iter()
            .filter(|(_, layer)| CollisionLayers::passes_probe(*layer, exclude))
            .filter_map(|(plane, _)| plane.intersect_ray(&ray).map(|(distance, point)| (plane, distance, point)))
            .filter(|(_, distance, _)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(plane, distance, point)| FloorProbe {
                normal: plane.normal,
                point,
                distance,
            })
    }
}

/// What one step did
#[derive(Debug, Default)]
pub struct StepReport {
    /// Resolved reactions
    pub reactions: Vec<Reaction>,
    /// Reports dropped because their pair was already resolved
    pub duplicates: usize,
    /// Reports naming an entity that was already gone
    pub stale: usize,
    /// Events raised during the step
    pub events: Vec<ReactionEvent>,
}

/// Sandbox simulation: world, floors, contacts and the coordinator
#[derive(Debug)]
pub struct SandboxWorld {
    /// Entity store
    pub entities: EntityStore,
    /// Static floors
    pub floors: FloorSet,
    contacts: ContactTracker,
    coordinator: CollisionCoordinator,
}

impl SandboxWorld {
    /// Build the world a scene describes
    pub fn from_scene(scene: &SceneDefinition) -> Self {
        let mut entities = EntityStore::new();
        for definition in &scene.boxes {
            entities.spawn_box(|entity| definition.to_element_box(entity));
        }

        let mut coordinator = CollisionCoordinator::from_config(&scene.engine);
        for event_type in [
            EventType::Reacted,
            EventType::EntityDestroyed,
            EventType::ManifestationSpawned,
            EventType::SpawnSkipped,
        ] {
            coordinator.events_mut().register_handler(event_type, Box::new(LoggingHandler));
        }

        Self {
            entities,
            floors: FloorSet::new(&scene.floors),
            contacts: ContactTracker::new(),
            coordinator,
        }
    }

    /// Coordinator driving reactions
    pub const fn coordinator(&self) -> &CollisionCoordinator {
        &self.coordinator
    }

    /// Advance one physics step
    ///
    /// Every contact that began this step is reported twice, once from each
    /// side, as a physics engine would.
    pub fn step(&mut self, delta_time: f64) -> StepReport {
        #[allow(clippy::cast_possible_truncation)]
        let dt = delta_time as f32;
        self.entities.integrate(dt);

        self.contacts.detect(&self.entities.colliders());
        for pair in self.contacts.exited() {
            self.coordinator.on_contact_end(pair.entity_a, pair.entity_b);
        }

        let mut report = StepReport::default();
        for pair in self.contacts.entered() {
            trace!("contact began: {pair:?}");
            for (reporter, other) in [(pair.entity_b, pair.entity_a), (pair.entity_a, pair.entity_b)] {
                match self
                    .coordinator
                    .on_contact_begin(reporter, other, &mut self.entities, &self.floors)
                {
                    Resolution::Resolved(reaction) => {
                        for entity in &reaction.destroyed {
                            self.contacts.remove_entity(*entity);
                        }
                        report.reactions.push(reaction);
                    }
                    Resolution::Duplicate => report.duplicates += 1,
                    Resolution::Stale(err) => {
                        debug!("{err}");
                        report.stale += 1;
                    }
                    Resolution::Ignored => {}
                }
            }
        }

        self.coordinator.advance(delta_time, &self.entities);
        report.events = self.coordinator.dispatch_events();
        report
    }
}
