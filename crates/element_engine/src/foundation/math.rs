//! Math utilities and types
//!
//! Provides the vector, quaternion and transform types shared by the
//! reaction core and its collaborators. All coordinates are Y-up,
//! right-handed; local +Z is the forward axis of every placed object.

pub use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// World up axis
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// World forward axis (local +Z of an unrotated object)
pub const WORLD_FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Local +Z axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * WORLD_FORWARD
    }

    /// Local +Y axis in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * WORLD_UP
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Squared length below which a vector is treated as zero
    pub const ZERO_EPSILON: f32 = 1e-8;

    /// Normalize `v`, or `None` when it is (numerically) zero or not finite
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        if !v.iter().all(|c| c.is_finite()) {
            return None;
        }
        v.try_normalize(ZERO_EPSILON.sqrt())
    }

    /// Midpoint between two points
    pub fn midpoint(a: &Vec3, b: &Vec3) -> Vec3 {
        (a + b) * 0.5
    }
}
