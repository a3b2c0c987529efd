//! Scene configuration
//!
//! A scene lists the static floors, the element boxes with their authored
//! tags, and how long to simulate. Scenes load from RON or TOML through the
//! engine's [`Config`] trait and are validated before anything runs.

use element_engine::config::{Config, ConfigError, EngineConfig};
use element_engine::ecs::Entity;
use element_engine::elements::{Category, Element, ElementAttributes, ElementBox};
use element_engine::foundation::math::{utils, Vec3, WORLD_UP};
use element_engine::manifestation::ManifestationSpec;
use element_engine::physics::CollisionLayers;
use element_engine::reactions::validate_authoring;
use serde::{Deserialize, Serialize};

/// Static floor surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDefinition {
    /// Any point on the floor plane
    pub point: Vec3,
    /// Surface normal
    pub normal: Vec3,
    /// Layer the floor lives on
    #[serde(default = "floor_layer")]
    pub layer: CollisionLayers,
}

fn floor_layer() -> CollisionLayers {
    CollisionLayers::FLOOR
}

impl FloorDefinition {
    /// Floor on the floor layer
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            layer: CollisionLayers::FLOOR,
        }
    }
}

/// One authored element box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDefinition {
    /// Element tags
    pub attributes: ElementAttributes,
    /// Start position
    pub position: Vec3,
    /// Constant velocity
    #[serde(default = "Vec3::zeros")]
    pub velocity: Vec3,
    /// Half-size of the box
    #[serde(default = "default_extents")]
    pub extents: Vec3,
    /// What the box manifests into
    #[serde(default)]
    pub manifestation: Option<ManifestationSpec>,
}

fn default_extents() -> Vec3 {
    Vec3::new(0.5, 0.5, 0.5)
}

impl BoxDefinition {
    /// A resting unit box
    pub fn new(element: Element, category: Category, position: Vec3) -> Self {
        Self {
            attributes: ElementAttributes::new(element, category),
            position,
            velocity: Vec3::zeros(),
            extents: default_extents(),
            manifestation: None,
        }
    }

    /// Builder pattern: set velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder pattern: attach a manifestation spec
    #[must_use]
    pub fn with_manifestation(mut self, spec: ManifestationSpec) -> Self {
        self.manifestation = Some(spec);
        self
    }

    /// Box snapshot for entity `entity`
    pub fn to_element_box(&self, entity: Entity) -> ElementBox {
        let element_box = ElementBox::new(entity, self.attributes, self.position)
            .with_velocity(self.velocity)
            .with_extents(self.extents);
        match &self.manifestation {
            Some(spec) => element_box.with_manifestation(spec.clone()),
            None => element_box,
        }
    }
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDefinition {
    /// Engine settings
    pub engine: EngineConfig,
    /// Static floors
    pub floors: Vec<FloorDefinition>,
    /// Element boxes
    pub boxes: Vec<BoxDefinition>,
    /// Number of physics steps
    pub steps: u32,
    /// Physics time step (seconds)
    pub timestep: f64,
}

impl Default for SceneDefinition {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            floors: Vec::new(),
            boxes: Vec::new(),
            steps: 180,
            timestep: 1.0 / 60.0,
        }
    }
}

impl SceneDefinition {
    /// Built-in demo: one lane per kind of reaction
    ///
    /// Lanes run along +Z at increasing X. The last lane sits over a ramp
    /// that rises from x = 20.
    pub fn demo() -> Self {
        let forward = Vec3::new(0.0, 0.0, 2.0);

        let boxes = vec![
            // Indifferent: Balance drifts through Stone
            BoxDefinition::new(Element::Balance, Category::Balance, Vec3::new(-6.0, 0.5, -2.0)).with_velocity(forward),
            BoxDefinition::new(Element::Stone, Category::Order, Vec3::new(-6.0, 0.5, 2.0))
                .with_manifestation(ManifestationSpec::single("boulder")),
            // Stone into Order: a 3 x 2 wall
            BoxDefinition::new(Element::Stone, Category::Order, Vec3::new(0.0, 0.5, -2.0))
                .with_velocity(forward)
                .with_manifestation(ManifestationSpec::grid("stone_wall", 3, 2, 1.0)),
            BoxDefinition::new(Element::Order, Category::Order, Vec3::new(0.0, 0.5, 2.0)),
            // Fire into Chaos: a single spirit
            BoxDefinition::new(Element::Fire, Category::Chaos, Vec3::new(6.0, 0.5, -2.0))
                .with_velocity(forward)
                .with_manifestation(ManifestationSpec::single("fire_spirit")),
            BoxDefinition::new(Element::Chaos, Category::Chaos, Vec3::new(6.0, 0.5, 2.0)),
            // Ice and Fire annihilate
            BoxDefinition::new(Element::Ice, Category::Order, Vec3::new(12.0, 0.5, -2.0))
                .with_velocity(forward)
                .with_manifestation(ManifestationSpec::grid("ice_bridge", 2, 1, 1.0)),
            BoxDefinition::new(Element::Fire, Category::Chaos, Vec3::new(12.0, 0.5, 2.0))
                .with_velocity(-forward)
                .with_manifestation(ManifestationSpec::single("fire_spirit")),
            // Void erases a Chaos-aligned Wind
            BoxDefinition::new(Element::Void, Category::Void, Vec3::new(18.0, 0.5, -2.0)).with_velocity(forward),
            BoxDefinition::new(Element::Wind, Category::Chaos, Vec3::new(18.0, 0.5, 2.0))
                .with_manifestation(ManifestationSpec::single("gust")),
            // Water into Order above the ramp
            BoxDefinition::new(Element::Water, Category::Order, Vec3::new(25.0, 2.0, -2.0))
                .with_velocity(forward)
                .with_manifestation(ManifestationSpec::grid("water_steps", 2, 1, 1.0)),
            BoxDefinition::new(Element::Order, Category::Order, Vec3::new(25.0, 2.0, 2.0)),
        ];

        Self {
            floors: vec![
                FloorDefinition::new(Vec3::zeros(), WORLD_UP),
                FloorDefinition::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(-0.3, 1.0, 0.0)),
            ],
            boxes,
            ..Self::default()
        }
    }
}

impl Config for SceneDefinition {
    fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.boxes.is_empty() {
            return Err(ConfigError::Validation("scene has no element boxes".to_string()));
        }
        if self.steps == 0 {
            return Err(ConfigError::Validation("scene must run at least one step".to_string()));
        }
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        for (i, floor) in self.floors.iter().enumerate() {
            if utils::try_normalize(&floor.normal).is_none() {
                return Err(ConfigError::Validation(format!("floor {i} has a zero normal")));
            }
        }

        // Entities are numbered from 1 in authoring order
        let boxes: Vec<ElementBox> = self
            .boxes
            .iter()
            .zip(1u32..)
            .map(|(definition, id)| definition.to_element_box(Entity::new(id)))
            .collect();
        validate_authoring(&self.engine.reaction_table(), &boxes)
    }
}
