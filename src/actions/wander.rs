//! Wander - walk to random nearby points, idling between them

use super::scoring::{legacy_score, WANDER_COMMITMENT_BONUS};
use super::{Action, ActionContext, ActionCore, ActionKind, ScoringContext};
use crate::core::types::Bounds;
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// Intrinsic action that roams around the agent's position
///
/// Always counts as within range, so its multipliers apply for as long as
/// it runs.
#[derive(Debug, Clone)]
pub struct WanderAction {
    core: ActionCore,
    /// Radius around the agent searched for the next point
    pub radius: f32,
    /// Optional box the points must fall inside
    pub boundary: Option<Bounds>,
    /// Seconds spent idle after reaching a point
    pub idle_time: f32,
    target: Option<Vec3>,
    idle_timer: f32,
    idling: bool,
    /// Walking speed captured on enter
    speed: f32,
    last_position: Option<Vec3>,
}

impl WanderAction {
    pub fn new(name: impl Into<String>, radius: f32, idle_time: f32) -> Self {
        Self {
            core: ActionCore::new(name),
            radius,
            boundary: None,
            idle_time,
            target: None,
            idle_timer: 0.0,
            idling: false,
            speed: 0.0,
            last_position: None,
        }
    }

    pub fn with_boundary(mut self, boundary: Bounds) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn with_core(mut self, core: ActionCore) -> Self {
        self.core = core;
        self
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn is_idling(&self) -> bool {
        self.idling
    }

    /// Pick a reachable point near the agent
    ///
    /// Tries up to `wander_max_samples` times, then falls back to the
    /// previous target, then to standing still.
    fn generate_position(&self, ctx: &mut ActionContext<'_>) -> Vec3 {
        let origin = ctx.nav.position();
        let samples = ctx.config.wander_max_samples.max(1);

        for _ in 0..samples {
            let candidate = origin + random_in_unit_sphere(ctx.rng) * self.radius;
            let Some(point) = ctx.nav.sample_reachable_point(candidate, self.radius) else {
                continue;
            };
            match &self.boundary {
                Some(bounds) if !bounds.contains(point) => continue,
                _ => return point,
            }
        }

        tracing::debug!(action = %self.core.name, samples, "no wander point found, falling back");
        self.target.unwrap_or(origin)
    }

    fn start_walking(&self, ctx: &mut ActionContext<'_>) {
        if !ctx.anim.is_playing(&ctx.config.walk_clip) {
            ctx.anim.play(&ctx.config.walk_clip);
        }
        ctx.nav.set_speed(self.speed);
        if let Some(target) = self.target {
            ctx.nav.set_destination(target);
        }
    }
}

/// Uniformly distributed point inside the unit sphere
fn random_in_unit_sphere(rng: &mut ChaCha8Rng) -> Vec3 {
    let r = rng.gen::<f32>().cbrt();
    let theta = rng.gen_range(0.0..TAU);
    let cos_phi: f32 = rng.gen_range(-1.0..=1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    Vec3::new(r * sin_phi * theta.cos(), r * cos_phi, r * sin_phi * theta.sin())
}

impl Action for WanderAction {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Wander
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f32 {
        legacy_score(
            &self.core.name,
            self.core.commitment_to_action,
            WANDER_COMMITMENT_BONUS,
            ctx.needs,
            ctx.conditions,
        )
    }

    fn enter(&mut self, ctx: &mut ActionContext<'_>) {
        self.speed = ctx.nav.speed();
        self.idling = false;
        self.last_position = None;
        self.target = Some(self.generate_position(ctx));
        self.idle_timer = self.idle_time;
        ctx.anim.play(&ctx.config.walk_clip);
        ctx.nav.set_speed(self.speed);
        if let Some(target) = self.target {
            ctx.nav.set_destination(target);
        }
    }

    fn update(&mut self, ctx: &mut ActionContext<'_>) {
        self.core.within_range_of_target = true;
        self.core.commitment_to_action = true;

        let position = ctx.nav.position();
        // Stuck while walking: pick a new point
        if self.last_position == Some(position) && ctx.anim.is_playing(&ctx.config.walk_clip) {
            self.idle_timer = 0.0;
        }

        if self.idle_timer > 0.0 && self.idling {
            self.idle_timer -= ctx.dt;
        } else if self.idle_timer > 0.0 {
            self.start_walking(ctx);
        } else {
            self.target = Some(self.generate_position(ctx));
            self.idle_timer = self.idle_time;
            self.idling = false;
            self.start_walking(ctx);
        }

        if let Some(target) = self.target {
            if !self.idling && position.distance(target) <= ctx.config.arrival_distance {
                ctx.anim.play(&ctx.config.idle_clip);
                ctx.nav.set_speed(0.0);
                self.target = None;
                self.idling = true;
            }
        }

        self.last_position = Some(position);
    }

    fn exit(&mut self, ctx: &mut ActionContext<'_>) {
        ctx.nav.set_speed(self.speed);
        self.target = None;
        self.idling = false;
        self.idle_timer = 0.0;
        self.last_position = None;
    }

    fn interruptible_for_dialogue(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}
