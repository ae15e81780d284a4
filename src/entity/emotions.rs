//! Emotions - mood scalars, one of which is derived from the rest

use crate::core::types::clamp_unit;
use serde::{Deserialize, Serialize};

/// A single emotion instance owned by one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    pub name: String,
    value: f32,
}

impl Emotion {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value: clamp_unit(value),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32) {
        self.value = clamp_unit(value);
    }

    pub fn adjust(&mut self, delta: f32) {
        self.set(self.value + delta);
    }
}

/// Thresholds and rates for the derived emotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedEmotionRule {
    pub high_threshold: f32,
    pub low_threshold: f32,
    pub high_rate: f32,
    pub low_rate: f32,
}

impl Default for DerivedEmotionRule {
    fn default() -> Self {
        Self {
            high_threshold: 0.8,
            low_threshold: 0.2,
            high_rate: -0.01,
            low_rate: 0.01,
        }
    }
}

impl DerivedEmotionRule {
    /// Change in the derived emotion over `dt` given the other emotions
    ///
    /// `Δ = (high_count * high_rate + low_count * low_rate) * dt`. An emotion
    /// counts as high when `>= high_threshold`, otherwise as low when
    /// `<= low_threshold`.
    pub fn delta<'a>(&self, others: impl Iterator<Item = &'a Emotion>, dt: f32) -> f32 {
        let mut high = 0u32;
        let mut low = 0u32;
        for emotion in others {
            if emotion.value >= self.high_threshold {
                high += 1;
            } else if emotion.value <= self.low_threshold {
                low += 1;
            }
        }
        (high as f32 * self.high_rate + low as f32 * self.low_rate) * dt
    }
}

/// Ordered collection of an agent's emotions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionSet {
    emotions: Vec<Emotion>,
}

impl EmotionSet {
    pub fn new() -> Self {
        Self { emotions: Vec::new() }
    }

    pub fn push(&mut self, emotion: Emotion) {
        self.emotions.push(emotion);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.find(name).map(Emotion::value)
    }

    pub fn find(&self, name: &str) -> Option<&Emotion> {
        self.emotions.iter().find(|e| e.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Emotion> {
        self.emotions.iter_mut().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match self.find_mut(name) {
            Some(emotion) => {
                emotion.set(value);
                true
            }
            None => false,
        }
    }

    pub fn adjust(&mut self, name: &str, delta: f32) -> bool {
        match self.find_mut(name) {
            Some(emotion) => {
                emotion.adjust(delta);
                true
            }
            None => false,
        }
    }

    /// Recompute the derived emotion from every other emotion
    ///
    /// Does nothing if the agent lacks the derived emotion.
    pub fn update_derived(&mut self, derived: &str, rule: &DerivedEmotionRule, dt: f32) {
        let delta = rule.delta(self.emotions.iter().filter(|e| e.name != derived), dt);
        if let Some(emotion) = self.find_mut(derived) {
            emotion.adjust(delta);
        }
    }

    /// Name of the highest emotion; earlier emotions win ties
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<&Emotion> = None;
        for emotion in &self.emotions {
            match best {
                Some(b) if emotion.value <= b.value => {}
                _ => best = Some(emotion),
            }
        }
        best.map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Emotion> {
        self.emotions.iter()
    }

    pub fn len(&self) -> usize {
        self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }

    pub fn snapshot(&self) -> Vec<(String, f32)> {
        self.emotions.iter().map(|e| (e.name.clone(), e.value)).collect()
    }
}
