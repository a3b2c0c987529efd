//! Collision primitives shared with the physics collaborator
//!
//! The reaction core never runs a physics step itself. These types describe
//! what the collaborator reports (floor probes) and give simple
//! collaborators (such as a headless sandbox) the sphere and plane tests
//! they need.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// A ray for floor probing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (should be normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a downward floor probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorProbe {
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from the probe origin to the hit point
    pub distance: f32,
}

/// A bounding sphere for contact detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere enclosing a box with the given half extents
    pub fn enclosing_box(center: Vec3, half_extents: &Vec3) -> Self {
        Self::new(center, half_extents.norm())
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// An infinite plane, used as static floor geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Surface normal (normalized on construction)
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane through `point` facing `normal`
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Signed distance from the plane to `p` along the normal
    pub fn signed_distance(&self, p: &Vec3) -> f32 {
        (p - self.point).dot(&self.normal)
    }

    /// Test ray intersection with the front face of this plane
    /// Returns (distance, hit_point) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        const EPSILON: f32 = 1e-6;

        let denom = ray.direction.dot(&self.normal);
        // Parallel, or approaching from behind
        if denom > -EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(&self.normal) / denom;
        if t >= 0.0 {
            Some((t, ray.point_at(t)))
        } else {
            None
        }
    }
}
