//! Manifestation placement
//!
//! When two boxes are consumed into a manifestation, the spawned object (or
//! grid of objects) is placed between them, faces the way the faster body
//! was travelling, and sits upright on the local floor.

use crate::config::ConfigError;
use crate::foundation::math::{utils, Transform, Vec3, WORLD_FORWARD, WORLD_UP};
use crate::physics::collision::FloorProbe;
use crate::physics::geometry::{horizontal, is_up, look_rotation, slope_follow};
use serde::{Deserialize, Serialize};

/// Speed below which a body counts as resting
pub const REST_SPEED: f32 = 1e-4;

/// What a box manifests into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestationSpec {
    /// Prefab handed to the lifecycle collaborator
    pub prefab_id: String,
    /// Cells along the travel direction
    pub grid_length: u32,
    /// Cells along the floor normal
    pub grid_height: u32,
    /// Distance between neighbouring cells
    pub spacing: f32,
}

impl Default for ManifestationSpec {
    fn default() -> Self {
        Self {
            prefab_id: String::new(),
            grid_length: 1,
            grid_height: 1,
            spacing: 1.0,
        }
    }
}

impl ManifestationSpec {
    /// Single-object manifestation of `prefab_id`
    pub fn single(prefab_id: impl Into<String>) -> Self {
        Self {
            prefab_id: prefab_id.into(),
            ..Default::default()
        }
    }

    /// Grid manifestation of `prefab_id`
    pub fn grid(prefab_id: impl Into<String>, grid_length: u32, grid_height: u32, spacing: f32) -> Self {
        Self {
            prefab_id: prefab_id.into(),
            grid_length,
            grid_height,
            spacing,
        }
    }

    /// Whether more than one object is spawned
    pub const fn is_grid(&self) -> bool {
        self.grid_length != 1 || self.grid_height != 1
    }

    /// Number of objects spawned
    pub const fn cell_count(&self) -> usize {
        self.grid_length as usize * self.grid_height as usize
    }

    /// Authoring-time checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefab_id.trim().is_empty() {
            return Err(ConfigError::Validation("manifestation has no prefab id".into()));
        }
        if self.grid_length == 0 || self.grid_height == 0 {
            return Err(ConfigError::Validation(format!(
                "manifestation '{}' has an empty {}x{} grid",
                self.prefab_id, self.grid_length, self.grid_height
            )));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 || (self.is_grid() && self.spacing == 0.0) {
            return Err(ConfigError::Validation(format!(
                "manifestation '{}' has invalid spacing {}",
                self.prefab_id, self.spacing
            )));
        }
        Ok(())
    }
}

/// Placement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Lift applied to every grid cell along the floor normal
    pub grid_floor_epsilon: f32,
    /// Rest single manifestations on the floor instead of at the midpoint
    pub offset_single_from_floor: bool,
    /// Full size of a spawned object, used by the floor offset
    pub spawned_size: Vec3,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            grid_floor_epsilon: 0.01,
            offset_single_from_floor: false,
            spawned_size: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl PlacementSettings {
    /// Load-time checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_floor_epsilon.is_finite() || self.grid_floor_epsilon < 0.0 {
            return Err(ConfigError::Validation(format!(
                "grid_floor_epsilon must be a non-negative number, got {}",
                self.grid_floor_epsilon
            )));
        }
        if !self.spawned_size.iter().all(|c| c.is_finite() && *c >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "spawned_size must be non-negative, got {:?}",
                self.spawned_size
            )));
        }
        Ok(())
    }
}

/// Kinematic snapshot of one participant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// World position
    pub position: Vec3,
    /// Linear velocity
    pub velocity: Vec3,
}

impl Body {
    /// Create a body snapshot
    pub const fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// A body at rest
    pub fn at_rest(position: Vec3) -> Self {
        Self::new(position, Vec3::zeros())
    }
}

/// Where the facing direction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionSource {
    /// Velocity of the faster body
    Velocity,
    /// Horizontal vector from A to B
    Separation,
    /// Nothing usable; world forward (or a vector perpendicular to the floor normal)
    Fallback,
}

/// Computed placement
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Unit facing direction, parallel to the floor
    pub direction: Vec3,
    /// Unit up axis (floor normal, or world up without a floor)
    pub up: Vec3,
    /// How `direction` was derived
    pub direction_source: DirectionSource,
    /// Neither body was moving faster than [`REST_SPEED`]
    pub at_rest: bool,
    /// Whether the floor was a slope
    pub sloped: bool,
    /// One transform per object to spawn
    pub transforms: Vec<Transform>,
}

/// Compute spawn transforms for a manifestation of `a` and `b`
///
/// The caller instantiates one object per returned transform.
pub fn place_manifestation(
    a: &Body,
    b: &Body,
    spec: &ManifestationSpec,
    floor: Option<&FloorProbe>,
    settings: &PlacementSettings,
) -> Placement {
    let origin = utils::midpoint(&a.position, &b.position);
    let up = floor
        .and_then(|hit| utils::try_normalize(&hit.normal))
        .unwrap_or(WORLD_UP);

    let at_rest = a.velocity.norm() <= REST_SPEED && b.velocity.norm() <= REST_SPEED;
    let (direction, direction_source) = facing(a, b, &up);
    let rotation = look_rotation(&direction, &up);

    // Midpoint dropped onto the floor plane along `up`
    let on_floor = floor.map(|hit| origin - up * (origin - hit.point).dot(&up));

    let transforms = if spec.is_grid() {
        let base = on_floor.unwrap_or(origin) + up * settings.grid_floor_epsilon;
        (0..spec.grid_height)
            .flat_map(|j| (0..spec.grid_length).map(move |i| (i, j)))
            .map(|(i, j)| {
                let along = direction * (i as f32 * spec.spacing);
                let above = up * (j as f32 * spec.spacing);
                Transform::from_position_rotation(base + along + above, rotation)
            })
            .collect()
    } else {
        let position = match on_floor {
            Some(on_floor) if settings.offset_single_from_floor => on_floor + up * (settings.spawned_size.y * 0.5),
            _ => origin,
        };
        vec![Transform::from_position_rotation(position, rotation)]
    };

    Placement {
        direction,
        up,
        direction_source,
        at_rest,
        sloped: !is_up(&up),
        transforms,
    }
}

/// Pick a unit direction parallel to the floor with normal `up`
fn facing(a: &Body, b: &Body, up: &Vec3) -> (Vec3, DirectionSource) {
    let faster = if b.velocity.norm_squared() > a.velocity.norm_squared() { b } else { a };
    if faster.velocity.norm() > REST_SPEED {
        if let Some(direction) = slope_follow(&faster.velocity, up) {
            return (direction, DirectionSource::Velocity);
        }
    }

    let separation = horizontal(&(b.position - a.position));
    if let Some(direction) = slope_follow(&separation, up) {
        return (direction, DirectionSource::Separation);
    }

    if let Some(direction) = slope_follow(&WORLD_FORWARD, up) {
        return (direction, DirectionSource::Fallback);
    }

    // The floor normal is world forward itself.
    let direction = slope_follow(&Vec3::x(), up).unwrap_or_else(Vec3::x);
    (direction, DirectionSource::Fallback)
}
