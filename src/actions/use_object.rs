//! Use object - walk to a useable, play its clip sequence, then sustain
//!
//! Three phases, picked fresh every frame from the agent's distance and
//! range flag:
//!
//! 1. Approach: farther than the useable's range, walk to it at `max_speed`
//! 2. Sequence: in range, queue the clips once and follow each clip's
//!    placement until the main clip starts playing
//! 3. Sustain: loop the main clip at its final placement

use super::scoring::{legacy_score, USE_OBJECT_COMMITMENT_BONUS};
use super::{Action, ActionContext, ActionCore, ActionKind, ScoringContext, UseableTarget};
use crate::core::error::{NpcError, Result};
use crate::core::types::{facing_rotation, Pose};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Where the body sits while one clip of the sequence plays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub pose: Pose,
    /// Navigation base offset (e.g. raised while seated)
    #[serde(default)]
    pub base_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsePhase {
    #[default]
    Approach,
    Sequence,
    Sustain,
}

#[derive(Debug, Clone)]
pub struct UseObjectAction {
    core: ActionCore,
    /// Clips played in order on arrival; the main clip should be last
    pub clips: Vec<String>,
    /// Placement per clip, by index; may be shorter than `clips`
    pub placements: Vec<Placement>,
    /// Where the agent is warped to when it stops using the object
    pub exit_pose: Option<Pose>,
    pub main_clip: String,
    /// Walking speed while approaching
    pub max_speed: f32,
    target: Option<UseableTarget>,
    phase: UsePhase,
    clips_queued: bool,
    original_base_offset: f32,
    target_position: Option<Vec3>,
    target_rotation: Option<Quat>,
}

impl UseObjectAction {
    pub fn new(name: impl Into<String>, main_clip: impl Into<String>) -> Self {
        let main_clip = main_clip.into();
        Self {
            core: ActionCore::new(name),
            clips: vec![main_clip.clone()],
            placements: Vec::new(),
            exit_pose: None,
            main_clip,
            max_speed: 3.0,
            target: None,
            phase: UsePhase::Approach,
            clips_queued: false,
            original_base_offset: 0.0,
            target_position: None,
            target_rotation: None,
        }
    }

    /// Replace the clip sequence and its placements
    pub fn with_sequence(mut self, clips: Vec<String>, placements: Vec<Placement>) -> Result<Self> {
        if placements.len() > clips.len() {
            return Err(NpcError::InvalidDefinition(format!(
                "action '{}' has {} placements for {} clips",
                self.core.name,
                placements.len(),
                clips.len()
            )));
        }
        self.clips = clips;
        self.placements = placements;
        Ok(self)
    }

    pub fn with_exit_pose(mut self, exit_pose: Pose) -> Self {
        self.exit_pose = Some(exit_pose);
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_core(mut self, core: ActionCore) -> Self {
        self.core = core;
        self
    }

    pub fn use_phase(&self) -> UsePhase {
        self.phase
    }

    /// Aim the blend at a placement, keeping the body's current height
    fn aim_at(&mut self, placement: Placement, ctx: &mut ActionContext<'_>) {
        let height = ctx.nav.position().y;
        ctx.nav.set_base_offset(placement.base_offset);
        self.target_position = Some(Vec3::new(placement.pose.position.x, height, placement.pose.position.z));
        self.target_rotation = Some(placement.pose.rotation);
    }

    fn blend(&self, ctx: &mut ActionContext<'_>, rate: f32) {
        let t = (ctx.dt * rate).clamp(0.0, 1.0);
        let mut pose = ctx.nav.pose();
        if let Some(position) = self.target_position {
            pose.position = pose.position.lerp(position, t);
        }
        if let Some(rotation) = self.target_rotation {
            pose.rotation = pose.rotation.slerp(rotation, t);
        }
        ctx.nav.set_pose(pose);
    }

    fn approach(&mut self, destination: Vec3, ctx: &mut ActionContext<'_>) {
        self.phase = UsePhase::Approach;
        ctx.nav.set_destination(destination);
        ctx.nav.set_speed(self.max_speed);
        ctx.anim.play(&ctx.config.walk_clip);
    }

    fn run_sequence(&mut self, target: UseableTarget, target_pose: Pose, ctx: &mut ActionContext<'_>) {
        self.phase = UsePhase::Sequence;

        // Nothing to play: standing next to the object is using it
        if self.main_clip == ctx.config.idle_clip {
            self.core.within_range_of_target = true;
            return;
        }

        ctx.anim.stop(&ctx.config.walk_clip);
        if !target.holdable {
            let mut pose = ctx.nav.pose();
            if let Some(rotation) = facing_rotation(target_pose.position - pose.position) {
                pose.rotation = rotation;
                ctx.nav.set_pose(pose);
            }
        }

        if !self.clips_queued {
            for clip in &self.clips {
                ctx.anim.queue_crossfade(clip, ctx.config.crossfade_seconds);
            }
            ctx.nav.set_velocity(Vec3::ZERO);
            self.clips_queued = true;
        }

        let playing = self
            .placements
            .iter()
            .zip(&self.clips)
            .find(|(_, clip)| ctx.anim.is_playing(clip))
            .map(|(placement, _)| *placement);
        if let Some(placement) = playing {
            self.aim_at(placement, ctx);
        }

        if ctx.anim.is_playing(&self.main_clip) {
            self.core.within_range_of_target = true;
            if !target.holdable {
                if let Some(last) = self.placements.last().copied() {
                    self.aim_at(last, ctx);
                }
            }
        }

        if !target.holdable {
            let rate = ctx.config.sequence_blend_rate;
            self.blend(ctx, rate);
        }
    }

    fn sustain(&mut self, target: UseableTarget, ctx: &mut ActionContext<'_>) {
        self.phase = UsePhase::Sustain;
        ctx.anim.play(&self.main_clip);
        if let Some(last) = self.placements.last().copied() {
            self.aim_at(last, ctx);
        }
        if !target.holdable {
            let rate = ctx.config.sustain_blend_rate;
            self.blend(ctx, rate);
        }
    }
}

impl Action for UseObjectAction {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn kind(&self) -> ActionKind {
        ActionKind::UseObject
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> f32 {
        legacy_score(
            &self.core.name,
            self.core.commitment_to_action,
            USE_OBJECT_COMMITMENT_BONUS,
            ctx.needs,
            ctx.conditions,
        )
    }

    fn enter(&mut self, ctx: &mut ActionContext<'_>) {
        self.core.commitment_to_action = false;
        self.clips_queued = false;
        self.phase = UsePhase::Approach;
        self.target_position = None;
        self.target_rotation = None;
        self.original_base_offset = ctx.nav.base_offset();
    }

    fn update(&mut self, ctx: &mut ActionContext<'_>) {
        self.core.commitment_to_action = true;

        let Some(target) = self.target else {
            tracing::warn!(action = %self.core.name, "object action has no useable bound");
            return;
        };
        let Some(target_pose) = ctx.props.pose(target.id) else {
            tracing::warn!(action = %self.core.name, useable = target.id.0, "bound useable is gone");
            return;
        };

        let distance = ctx.nav.position().distance(target_pose.position);
        if distance > target.range {
            self.approach(target_pose.position, ctx);
        } else if !self.core.within_range_of_target {
            self.run_sequence(target, target_pose, ctx);
        } else {
            self.sustain(target, ctx);
        }
    }

    fn exit(&mut self, ctx: &mut ActionContext<'_>) {
        let target_pose = self.target.and_then(|t| ctx.props.pose(t.id));

        if *ctx.holding_object {
            if let Some(target) = self.target {
                ctx.props.detach(target.id);
                if let Some(origin) = ctx.held_origin.take() {
                    ctx.props.set_pose(target.id, origin);
                }
            }
            *ctx.holding_object = false;
        }

        if let Some(exit_pose) = self.exit_pose {
            ctx.nav.warp(exit_pose.position);
            if let Some(rotation) = target_pose.and_then(|p| facing_rotation(p.forward())) {
                ctx.nav.set_pose(Pose::new(exit_pose.position, rotation));
            }
        }

        ctx.nav.set_base_offset(self.original_base_offset);
        self.clips_queued = false;
        self.phase = UsePhase::Approach;
        self.target_position = None;
        self.target_rotation = None;
    }

    fn bind_target(&mut self, target: UseableTarget) {
        self.target = Some(target);
    }

    fn target(&self) -> Option<UseableTarget> {
        self.target
    }

    fn clone_box(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::Rig;
    use crate::actions::{enter_action, exit_action};
    use crate::world::{Animator, Navigation, Props, Useable};

    fn chair_action() -> UseObjectAction {
        UseObjectAction::new("Sit", "Sit")
            .with_sequence(
                vec!["SitDown".to_string(), "Sit".to_string()],
                vec![
                    Placement {
                        pose: Pose::at(Vec3::new(3.0, 0.0, 0.5)),
                        base_offset: 0.2,
                    },
                    Placement {
                        pose: Pose::at(Vec3::new(3.0, 0.0, 0.0)),
                        base_offset: 0.4,
                    },
                ],
            )
            .unwrap()
    }

    fn rig_with_chair(action: UseObjectAction, holdable: bool) -> (Rig, Box<dyn Action>) {
        let mut rig = Rig::new(Vec3::ZERO);
        let id = rig.props.add(Useable::new(
            "chair",
            Box::new(action),
            1.0,
            holdable,
            Pose::at(Vec3::new(3.0, 0.0, 0.0)),
        ));
        let instance = rig.props.get(id).unwrap().action.clone();
        (rig, instance)
    }

    #[test]
    fn test_too_many_placements_rejected() {
        let placements = vec![
            Placement {
                pose: Pose::default(),
                base_offset: 0.0,
            };
            2
        ];
        assert!(UseObjectAction::new("Sit", "Sit").with_sequence(vec!["Sit".into()], placements).is_err());
    }

    #[test]
    fn test_approach_then_sequence_then_sustain() {
        let (mut rig, mut action) = rig_with_chair(chair_action(), false);
        enter_action(action.as_mut(), &mut rig.ctx(0.1));

        rig.step(action.as_mut(), 0.1);
        assert!(rig.anim.is_playing("Walk"));
        assert_eq!(rig.nav.speed(), 3.0);

        for _ in 0..10 {
            rig.step(action.as_mut(), 0.1);
        }
        assert!(rig.nav.position().distance(Vec3::new(3.0, 0.0, 0.0)) <= 1.0);
        assert!(rig.anim.is_playing("SitDown") || rig.anim.is_playing("Sit"));

        for _ in 0..10 {
            rig.step(action.as_mut(), 0.1);
        }
        assert!(action.within_range_of_target());
        assert_eq!(rig.nav.base_offset(), 0.4);

        rig.step(action.as_mut(), 0.1);
        assert!(rig.anim.is_playing("Sit"));
    }

    #[test]
    fn test_exit_restores_base_offset_and_warps() {
        let action = chair_action().with_exit_pose(Pose::at(Vec3::new(5.0, 0.0, 5.0)));
        let (mut rig, mut action) = rig_with_chair(action, false);
        rig.nav.set_base_offset(0.1);
        enter_action(action.as_mut(), &mut rig.ctx(0.1));
        for _ in 0..25 {
            rig.step(action.as_mut(), 0.1);
        }
        assert_ne!(rig.nav.base_offset(), 0.1);

        exit_action(action.as_mut(), &mut rig.ctx(0.1));
        assert_eq!(rig.nav.base_offset(), 0.1);
        assert_eq!(rig.nav.position(), Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_exit_releases_held_object_to_original_pose() {
        let (mut rig, mut action) = rig_with_chair(UseObjectAction::new("Drink", "Drink"), true);
        let id = action.target().unwrap().id;
        let original = rig.props.pose(id).unwrap();
        enter_action(action.as_mut(), &mut rig.ctx(0.1));

        rig.props.attach(id, rig.agent);
        rig.props.set_pose(id, Pose::at(Vec3::new(0.0, 1.5, 0.0)));
        rig.holding = true;
        rig.held_origin = Some(original);

        exit_action(action.as_mut(), &mut rig.ctx(0.1));
        assert_eq!(rig.props.pose(id), Some(original));
        assert_eq!(rig.props.holder(id), None);
        assert!(!rig.holding);
    }

    #[test]
    fn test_idle_main_clip_is_in_range_on_arrival() {
        let (mut rig, mut action) = rig_with_chair(UseObjectAction::new("Rest", "Idle"), false);
        rig.nav.warp(Vec3::new(2.5, 0.0, 0.0));
        enter_action(action.as_mut(), &mut rig.ctx(0.1));
        rig.step(action.as_mut(), 0.1);
        assert!(action.within_range_of_target());
    }
}
