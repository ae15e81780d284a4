//! Useable world objects storage and queries

use crate::actions::{Action, UseableTarget};
use crate::core::types::{AgentId, Pose, UseableId};
use ahash::AHashMap;
use glam::Vec3;

/// A world object an agent can perform an action on
#[derive(Debug, Clone)]
pub struct Useable {
    pub id: UseableId,
    pub name: String,
    /// Action template; agents clone it into their candidate map
    pub action: Box<dyn Action>,
    /// Distance within which the action can be performed
    pub range: f32,
    /// If true, the agent carries the object in its hand while using it
    pub holdable: bool,
    pub pose: Pose,
    holder: Option<AgentId>,
}

impl Useable {
    pub fn new(name: impl Into<String>, action: Box<dyn Action>, range: f32, holdable: bool, pose: Pose) -> Self {
        Self {
            id: UseableId(0),
            name: name.into(),
            action,
            range: range.max(0.0),
            holdable,
            pose,
            holder: None,
        }
    }

    pub fn target(&self) -> UseableTarget {
        UseableTarget {
            id: self.id,
            range: self.range,
            holdable: self.holdable,
        }
    }

    pub fn holder(&self) -> Option<AgentId> {
        self.holder
    }
}

/// Spatial lookup of useables around a point
pub trait Proximity {
    /// Ids of useables within `max_range` of `origin`, in registration order
    fn query_reachable_useables(&self, origin: Vec3, max_range: f32) -> Vec<UseableId>;

    fn useable(&self, id: UseableId) -> Option<&Useable>;
}

/// Pose and parenting of useables, as seen by running actions
pub trait Props {
    fn pose(&self, id: UseableId) -> Option<Pose>;

    fn set_pose(&mut self, id: UseableId, pose: Pose) -> bool;

    /// Parent the object to an agent's hand
    fn attach(&mut self, id: UseableId, holder: AgentId) -> bool;

    fn detach(&mut self, id: UseableId) -> bool;

    fn holder(&self, id: UseableId) -> Option<AgentId>;
}

/// Storage for all useables
#[derive(Debug, Default)]
pub struct UseableRegistry {
    useables: AHashMap<UseableId, Useable>,
    /// Registration order, so queries are deterministic
    order: Vec<UseableId>,
    next_id: u32,
}

impl UseableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a useable, assigning its id and binding its action template
    pub fn add(&mut self, mut useable: Useable) -> UseableId {
        let id = UseableId(self.next_id);
        self.next_id += 1;
        useable.id = id;
        let target = useable.target();
        useable.action.bind_target(target);
        self.useables.insert(id, useable);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: UseableId) -> Option<&Useable> {
        self.useables.get(&id)
    }

    /// Move every held object to its holder's hand
    pub fn follow_holders(&mut self, hand_of: impl Fn(AgentId) -> Option<Vec3>) {
        for useable in self.useables.values_mut() {
            if let Some(position) = useable.holder.and_then(&hand_of) {
                useable.pose.position = position;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Useable> {
        self.order.iter().filter_map(|id| self.useables.get(id))
    }

    pub fn len(&self) -> usize {
        self.useables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.useables.is_empty()
    }
}

impl Proximity for UseableRegistry {
    fn query_reachable_useables(&self, origin: Vec3, max_range: f32) -> Vec<UseableId> {
        let range_sq = max_range * max_range;
        self.iter()
            .filter(|u| u.pose.position.distance_squared(origin) <= range_sq)
            .map(|u| u.id)
            .collect()
    }

    fn useable(&self, id: UseableId) -> Option<&Useable> {
        self.get(id)
    }
}

impl Props for UseableRegistry {
    fn pose(&self, id: UseableId) -> Option<Pose> {
        self.useables.get(&id).map(|u| u.pose)
    }

    fn set_pose(&mut self, id: UseableId, pose: Pose) -> bool {
        match self.useables.get_mut(&id) {
            Some(useable) => {
                useable.pose = pose;
                true
            }
            None => false,
        }
    }

    fn attach(&mut self, id: UseableId, holder: AgentId) -> bool {
        match self.useables.get_mut(&id) {
            Some(useable) if useable.holder.is_none() => {
                useable.holder = Some(holder);
                true
            }
            _ => false,
        }
    }

    fn detach(&mut self, id: UseableId) -> bool {
        match self.useables.get_mut(&id) {
            Some(useable) => useable.holder.take().is_some(),
            None => false,
        }
    }

    fn holder(&self, id: UseableId) -> Option<AgentId> {
        self.useables.get(&id).and_then(|u| u.holder)
    }
}
