//! Needs - drives that push an agent toward actions
//!
//! A need is 1.0 when fully satisfied and 0.0 when critical. Nothing decays
//! on its own: conditions and actions apply signed rates every tick.

use crate::core::types::clamp_unit;
use serde::{Deserialize, Serialize};

/// A single need instance owned by one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub name: String,
    value: f32,
}

impl Need {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value: clamp_unit(value),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value, saturating at the unit interval bounds
    pub fn set(&mut self, value: f32) {
        self.value = clamp_unit(value);
    }

    /// Add a signed delta, saturating at the unit interval bounds
    pub fn adjust(&mut self, delta: f32) {
        self.set(self.value + delta);
    }

    pub fn is_full(&self) -> bool {
        self.value >= 1.0
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }
}

/// Ordered collection of an agent's needs
///
/// Order matters: the evaluator sums needs in insertion order, and the
/// crisis scan stops at the first need below threshold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeedSet {
    needs: Vec<Need>,
}

impl NeedSet {
    pub fn new() -> Self {
        Self { needs: Vec::new() }
    }

    pub fn push(&mut self, need: Need) {
        self.needs.push(need);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.find(name).map(Need::value)
    }

    pub fn find(&self, name: &str) -> Option<&Need> {
        self.needs.iter().find(|n| n.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Need> {
        self.needs.iter_mut().find(|n| n.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Set a need by name; returns false if the agent has no such need
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match self.find_mut(name) {
            Some(need) => {
                need.set(value);
                true
            }
            None => false,
        }
    }

    /// Add a signed delta to a need by name; returns false if missing
    pub fn adjust(&mut self, name: &str, delta: f32) -> bool {
        match self.find_mut(name) {
            Some(need) => {
                need.adjust(delta);
                true
            }
            None => false,
        }
    }

    /// True if any need is at or below `threshold`
    pub fn any_at_or_below(&self, threshold: f32) -> bool {
        self.needs.iter().any(|n| n.value <= threshold)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Need> {
        self.needs.iter()
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    /// Snapshot as (name, value) pairs for presentation
    pub fn snapshot(&self) -> Vec<(String, f32)> {
        self.needs.iter().map(|n| (n.name.clone(), n.value)).collect()
    }
}
