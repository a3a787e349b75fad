//! Math utilities and types
//!
//! Placement types shared by pooled actors and their spawn domains.

pub use nalgebra::{Vector3, Quaternion, Unit};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position and orientation of an actor or spawn domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a transform at the origin with no rotation
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Whether this is the origin transform
    pub fn is_identity(&self) -> bool {
        self.position == Vec3::zeros() && self.rotation == Quat::identity()
    }
}
