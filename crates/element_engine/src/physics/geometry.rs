//! Geometry helpers for ground-aligned placement
//!
//! Pure functions over [`Vec3`]/[`Quat`]; nothing here holds state.

use crate::foundation::math::{utils, Quat, Vec3, WORLD_FORWARD, WORLD_UP};
use crate::physics::collision::FloorProbe;
use crate::physics::collision_layers::CollisionLayers;
use crate::reactions::collaborators::PhysicsQueries;

/// Cosine tolerance for treating a normal as world up
const UP_TOLERANCE: f32 = 1e-4;

/// Reflect `v` across the plane with unit normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - n * (2.0 * v.dot(n))
}

/// Whether `normal` points (numerically) straight up
pub fn is_up(normal: &Vec3) -> bool {
    utils::try_normalize(normal).is_some_and(|n| n.dot(&WORLD_UP) >= 1.0 - UP_TOLERANCE)
}

/// Drop the vertical component of `v`
pub fn horizontal(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Bend a direction so that it runs along the surface with `normal`
///
/// The direction is averaged with its reflection, which cancels the
/// component along the normal. A direction already parallel to the surface
/// comes back unchanged (normalized). Returns `None` when the result has no
/// length, i.e. the direction ran straight into the surface.
pub fn slope_follow(direction: &Vec3, normal: &Vec3) -> Option<Vec3> {
    let n = utils::try_normalize(normal)?;
    utils::try_normalize(&(direction + reflect(direction, &n)))
}

/// Rotation whose local +Z is `forward` and whose local +Y is `up`
///
/// `up` is orthogonalised against `forward`. Degenerate inputs fall back to
/// world axes instead of producing NaN.
pub fn look_rotation(forward: &Vec3, up: &Vec3) -> Quat {
    let forward = utils::try_normalize(forward).unwrap_or(WORLD_FORWARD);
    let up = utils::try_normalize(up).unwrap_or(WORLD_UP);

    if up.cross(&forward).norm_squared() > utils::ZERO_EPSILON {
        return Quat::face_towards(&forward, &up);
    }

    // Forward runs along up; any perpendicular reference will do.
    let reference = if forward.dot(&WORLD_FORWARD).abs() < 0.9 { WORLD_FORWARD } else { Vec3::x() };
    Quat::face_towards(&forward, &reference)
}

/// Probe straight down for the floor and return its unit normal
pub fn probe_ground_normal<P: PhysicsQueries + ?Sized>(
    physics: &P,
    from: &Vec3,
    max_distance: f32,
    exclude: CollisionLayers,
) -> Option<Vec3> {
    probe_floor(physics, from, max_distance, exclude).map(|hit| hit.normal)
}

/// Probe straight down for the floor, normalising the reported normal
///
/// Hits beyond `max_distance` or with an unusable normal are discarded.
pub fn probe_floor<P: PhysicsQueries + ?Sized>(
    physics: &P,
    from: &Vec3,
    max_distance: f32,
    exclude: CollisionLayers,
) -> Option<FloorProbe> {
    let hit = physics.probe_floor(from, max_distance, exclude)?;
    if hit.distance > max_distance {
        return None;
    }
    let normal = utils::try_normalize(&hit.normal)?;
    Some(FloorProbe { normal, ..hit })
}
