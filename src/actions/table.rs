//! Per-agent action instances: intrinsic behaviors plus object actions

use super::Action;
use crate::core::types::UseableId;
use crate::world::Proximity;
use ahash::AHashMap;

/// Stable handle to an action instance owned by one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Intrinsic(usize),
    Object(UseableId),
}

/// All actions an agent can currently choose from
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    intrinsic: Vec<Box<dyn Action>>,
    on_useables: AHashMap<UseableId, Box<dyn Action>>,
    /// Useables found by the last scan, in query order
    candidates: Vec<UseableId>,
}

impl ActionTable {
    pub fn new(intrinsic: Vec<Box<dyn Action>>) -> Self {
        Self {
            intrinsic,
            on_useables: AHashMap::new(),
            candidates: Vec::new(),
        }
    }

    pub fn push_intrinsic(&mut self, action: Box<dyn Action>) {
        self.intrinsic.push(action);
    }

    pub fn intrinsic(&self) -> &[Box<dyn Action>] {
        &self.intrinsic
    }

    pub fn candidates(&self) -> &[UseableId] {
        &self.candidates
    }

    pub fn get(&self, key: ActionKey) -> Option<&dyn Action> {
        match key {
            ActionKey::Intrinsic(idx) => self.intrinsic.get(idx).map(|a| a.as_ref()),
            ActionKey::Object(id) => self.on_useables.get(&id).map(|a| a.as_ref()),
        }
    }

    pub fn get_mut(&mut self, key: ActionKey) -> Option<&mut (dyn Action + 'static)> {
        match key {
            ActionKey::Intrinsic(idx) => self.intrinsic.get_mut(idx).map(|a| a.as_mut()),
            ActionKey::Object(id) => self.on_useables.get_mut(&id).map(|a| a.as_mut()),
        }
    }

    /// Replace the candidate map with the useables from a fresh scan
    ///
    /// Instances already held for a useable are kept so their flags survive
    /// the rescan; new useables get a clone of the useable's template. The
    /// `active` instance is kept even when it fell out of range, but is no
    /// longer a candidate.
    pub fn rebuild_candidates(&mut self, found: &[UseableId], proximity: &dyn Proximity, active: Option<ActionKey>) {
        let keep = match active {
            Some(ActionKey::Object(id)) => Some(id),
            _ => None,
        };

        self.candidates.clear();
        for &id in found {
            let Some(useable) = proximity.useable(id) else {
                continue;
            };
            self.on_useables.entry(id).or_insert_with(|| useable.action.clone());
            self.candidates.push(id);
        }

        let candidates = &self.candidates;
        self.on_useables
            .retain(|id, _| candidates.contains(id) || keep == Some(*id));
    }

    /// Every instance whose name is `name`
    pub fn instances_named_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = (ActionKey, &'a mut Box<dyn Action>)> + 'a {
        let intrinsic = self
            .intrinsic
            .iter_mut()
            .enumerate()
            .map(|(idx, a)| (ActionKey::Intrinsic(idx), a));
        let objects = self.on_useables.iter_mut().map(|(id, a)| (ActionKey::Object(*id), a));
        intrinsic.chain(objects).filter(move |(_, a)| a.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{UseObjectAction, WanderAction};
    use crate::core::types::Pose;
    use crate::world::{Useable, UseableRegistry};
    use glam::Vec3;

    fn make_registry() -> (UseableRegistry, UseableId, UseableId) {
        let mut registry = UseableRegistry::new();
        let table = registry.add(Useable::new(
            "table",
            Box::new(UseObjectAction::new("Eat", "Eat")),
            1.0,
            false,
            Pose::at(Vec3::X),
        ));
        let bed = registry.add(Useable::new(
            "bed",
            Box::new(UseObjectAction::new("Sleep", "Sleep")),
            1.0,
            false,
            Pose::at(Vec3::Z),
        ));
        (registry, table, bed)
    }

    #[test]
    fn test_rebuild_clones_templates_in_order() {
        let (registry, table, bed) = make_registry();
        let mut actions = ActionTable::new(vec![Box::new(WanderAction::new("Wander", 5.0, 1.0))]);
        actions.rebuild_candidates(&[bed, table], &registry, None);
        assert_eq!(actions.candidates(), &[bed, table]);
        assert_eq!(actions.get(ActionKey::Object(table)).unwrap().name(), "Eat");
        assert_eq!(actions.get(ActionKey::Intrinsic(0)).unwrap().name(), "Wander");
    }

    #[test]
    fn test_rebuild_keeps_existing_instances_and_active() {
        let (registry, table, bed) = make_registry();
        let mut actions = ActionTable::new(Vec::new());
        actions.rebuild_candidates(&[table, bed], &registry, None);
        if let Some(action) = actions.get_mut(ActionKey::Object(table)) {
            action.core_mut().commitment_to_action = true;
        }

        actions.rebuild_candidates(&[bed], &registry, Some(ActionKey::Object(table)));
        assert_eq!(actions.candidates(), &[bed]);
        assert!(actions.get(ActionKey::Object(table)).unwrap().commitment_to_action());

        actions.rebuild_candidates(&[bed], &registry, None);
        assert!(actions.get(ActionKey::Object(table)).is_none());
    }

    #[test]
    fn test_instances_named() {
        let (registry, table, _) = make_registry();
        let mut actions = ActionTable::new(vec![Box::new(WanderAction::new("Wander", 5.0, 1.0))]);
        actions.rebuild_candidates(&[table], &registry, None);
        let keys: Vec<ActionKey> = actions.instances_named_mut("Eat").map(|(key, _)| key).collect();
        assert_eq!(keys, vec![ActionKey::Object(table)]);
    }
}
