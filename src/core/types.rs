//! Core type definitions used throughout the codebase

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a useable world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UseableId(pub u32);

/// Position and orientation in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Unit vector the pose is facing (local +Z)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Rotation that faces `direction` on the horizontal plane
///
/// Returns `None` for a (near) zero direction.
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    let flat = flat.normalize();
    Some(Quat::from_rotation_arc(Vec3::Z, flat))
}

/// Axis-aligned box, used to fence wandering and walkable areas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Nearest point inside the box
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// RGBA color, each channel 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Clamp a scalar into the unit interval
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit_saturates() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }

    #[test]
    fn test_facing_rotation_points_along_direction() {
        let rot = facing_rotation(Vec3::new(1.0, 5.0, 0.0)).unwrap();
        let forward = rot * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-4);
        assert!(facing_rotation(Vec3::new(0.0, 3.0, 0.0)).is_none());
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let bounds = Bounds::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(-5.0, 2.0, -5.0));
        assert!(bounds.contains(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!bounds.contains(Vec3::new(6.0, 1.0, 0.0)));
        assert_eq!(bounds.clamp(Vec3::new(9.0, 1.0, 0.0)), Vec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_pose_forward_default_is_z() {
        assert_eq!(Pose::default().forward(), Vec3::Z);
    }
}
