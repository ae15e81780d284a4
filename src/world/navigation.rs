//! Navigation contract and a straight-line reference navigator
//!
//! Path planning is not the engine's job. Actions only ask for destinations,
//! speeds, warps and reachable-point samples; [`KinematicNavigator`] answers
//! those by moving in a straight line, which is enough for headless runs.

use crate::core::types::{facing_rotation, Bounds, Pose};
use glam::Vec3;

/// Movement service attached to one agent
pub trait Navigation {
    fn pose(&self) -> Pose;

    /// Place the body directly (no path following)
    fn set_pose(&mut self, pose: Pose);

    fn position(&self) -> Vec3 {
        self.pose().position
    }

    fn set_destination(&mut self, destination: Vec3);

    fn velocity(&self) -> Vec3;

    fn set_velocity(&mut self, velocity: Vec3);

    /// Teleport to a position, dropping any destination
    fn warp(&mut self, position: Vec3);

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);

    /// Vertical offset of the body relative to the walkable surface
    fn base_offset(&self) -> f32;

    fn set_base_offset(&mut self, offset: f32);

    fn set_stopped(&mut self, stopped: bool);

    fn is_stopped(&self) -> bool;

    /// Nearest walkable point to `origin` within `radius`, if any
    fn sample_reachable_point(&self, origin: Vec3, radius: f32) -> Option<Vec3>;

    /// Advance motion by `dt` seconds; called once per tick after actions run
    fn advance(&mut self, _dt: f32) {}
}

/// Moves straight toward its destination at `speed`, inside an optional
/// walkable box
#[derive(Debug, Clone)]
pub struct KinematicNavigator {
    pose: Pose,
    destination: Option<Vec3>,
    velocity: Vec3,
    speed: f32,
    base_offset: f32,
    stopped: bool,
    walkable: Option<Bounds>,
}

impl KinematicNavigator {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            pose: Pose::at(position),
            destination: None,
            velocity: Vec3::ZERO,
            speed,
            base_offset: 0.0,
            stopped: false,
            walkable: None,
        }
    }

    pub fn with_walkable(mut self, walkable: Bounds) -> Self {
        self.walkable = Some(walkable);
        self
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl Navigation for KinematicNavigator {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_destination(&mut self, destination: Vec3) {
        let destination = match &self.walkable {
            Some(bounds) => bounds.clamp(destination),
            None => destination,
        };
        self.destination = Some(destination);
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// A zero velocity also drops the destination, halting the body
    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        if velocity == Vec3::ZERO {
            self.destination = None;
        }
    }

    fn warp(&mut self, position: Vec3) {
        self.pose.position = position;
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn base_offset(&self) -> f32 {
        self.base_offset
    }

    fn set_base_offset(&mut self, offset: f32) {
        self.base_offset = offset;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.velocity = Vec3::ZERO;
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn sample_reachable_point(&self, origin: Vec3, radius: f32) -> Option<Vec3> {
        match &self.walkable {
            // Flat ground at the body's current height
            None => Some(Vec3::new(origin.x, self.pose.position.y, origin.z)),
            Some(bounds) => {
                let projected = bounds.clamp(origin);
                (projected.distance(origin) <= radius).then_some(projected)
            }
        }
    }

    fn advance(&mut self, dt: f32) {
        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            return;
        };
        if self.stopped || self.speed <= 0.0 || dt <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let to_target = destination - self.pose.position;
        let distance = to_target.length();
        let step = self.speed * dt;
        if distance <= step {
            self.pose.position = destination;
            self.destination = None;
            self.velocity = Vec3::ZERO;
            return;
        }

        let direction = to_target / distance;
        self.velocity = direction * self.speed;
        self.pose.position += direction * step;
        if let Some(rotation) = facing_rotation(direction) {
            self.pose.rotation = rotation;
        }
    }
}
