//! Animation contract and a clip timeline for headless runs
//!
//! Clips started with [`Animator::play`] loop until replaced. Clips queued
//! with [`Animator::queue_crossfade`] play once each, in order, after the
//! currently playing one-shot finishes.

use ahash::AHashMap;
use std::collections::VecDeque;

/// Animation playback service attached to one agent
pub trait Animator {
    /// Start a looping clip immediately, dropping anything queued
    fn play(&mut self, clip: &str);

    /// Stop a clip if it is the one playing
    fn stop(&mut self, clip: &str);

    /// Queue a one-shot clip to play once everything before it completes
    fn queue_crossfade(&mut self, clip: &str, fade_seconds: f32);

    fn is_playing(&self, clip: &str) -> bool;

    /// Advance playback by `dt` seconds; called once per tick
    fn advance(&mut self, _dt: f32) {}
}

#[derive(Debug, Clone)]
struct Playing {
    clip: String,
    elapsed: f32,
    looping: bool,
}

/// Plays clips against a table of durations
#[derive(Debug, Clone)]
pub struct ClipTimeline {
    durations: AHashMap<String, f32>,
    default_duration: f32,
    current: Option<Playing>,
    queue: VecDeque<String>,
}

impl ClipTimeline {
    pub fn new(default_duration: f32) -> Self {
        Self {
            durations: AHashMap::new(),
            default_duration,
            current: None,
            queue: VecDeque::new(),
        }
    }

    pub fn with_clip(mut self, clip: impl Into<String>, duration: f32) -> Self {
        self.durations.insert(clip.into(), duration);
        self
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.clip.as_str())
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn duration_of(&self, clip: &str) -> f32 {
        self.durations.get(clip).copied().unwrap_or(self.default_duration)
    }

    fn start_next_queued(&mut self) {
        self.current = self.queue.pop_front().map(|clip| Playing {
            clip,
            elapsed: 0.0,
            looping: false,
        });
    }
}

impl Default for ClipTimeline {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Animator for ClipTimeline {
    fn play(&mut self, clip: &str) {
        self.queue.clear();
        match &mut self.current {
            Some(playing) if playing.clip == clip => playing.looping = true,
            _ => {
                self.current = Some(Playing {
                    clip: clip.to_string(),
                    elapsed: 0.0,
                    looping: true,
                })
            }
        }
    }

    fn stop(&mut self, clip: &str) {
        if self.current.as_ref().is_some_and(|p| p.clip == clip) {
            self.current = None;
        }
    }

    fn queue_crossfade(&mut self, clip: &str, _fade_seconds: f32) {
        self.queue.push_back(clip.to_string());
        if self.current.as_ref().map_or(true, |p| p.looping) {
            self.start_next_queued();
        }
    }

    fn is_playing(&self, clip: &str) -> bool {
        self.current.as_ref().is_some_and(|p| p.clip == clip)
    }

    fn advance(&mut self, dt: f32) {
        let finished = match &mut self.current {
            Some(playing) if !playing.looping => {
                playing.elapsed += dt;
                let duration = self.durations.get(&playing.clip).copied().unwrap_or(self.default_duration);
                playing.elapsed >= duration
            }
            Some(_) => false,
            None => !self.queue.is_empty(),
        };
        if finished {
            self.start_next_queued();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_clips_play_in_order() {
        let mut anim = ClipTimeline::new(1.0).with_clip("SitDown", 0.5);
        anim.play("Walk");
        anim.stop("Walk");
        anim.queue_crossfade("SitDown", 0.3);
        anim.queue_crossfade("Sit", 0.3);
        assert!(anim.is_playing("SitDown"));
        anim.advance(0.6);
        assert!(anim.is_playing("Sit"));
        anim.advance(1.0);
        assert!(anim.current_clip().is_none());
    }

    #[test]
    fn test_play_loops_and_clears_queue() {
        let mut anim = ClipTimeline::default();
        anim.queue_crossfade("Wave", 0.3);
        anim.play("Idle");
        assert_eq!(anim.queued(), 0);
        anim.advance(10.0);
        assert!(anim.is_playing("Idle"));
        assert!(anim.duration_of("Idle") > 0.0);
    }
}
