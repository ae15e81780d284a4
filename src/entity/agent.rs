//! Agent - one NPC's needs, emotions, actions and decision state

use crate::actions::{Action, ActionContext, ActionKey, ActionTable};
use crate::conditions::Condition;
use crate::core::config::EngineConfig;
use crate::core::types::{AgentId, Pose, UseableId};
use crate::entity::{Emotion, EmotionSet, Need, NeedSet};
use crate::world::{AgentFrame, Animator, ClipTimeline, KinematicNavigator, Navigation, Props};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;

/// Walking speed given to agents built without a navigator
pub const DEFAULT_WALK_SPEED: f32 = 3.5;

pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub needs: NeedSet,
    pub emotions: EmotionSet,
    pub actions: ActionTable,
    /// Evaluated in order every frame
    pub conditions: Vec<Box<dyn Condition>>,
    pub nav: Box<dyn Navigation>,
    pub anim: Box<dyn Animator>,
    pub rng: ChaCha8Rng,
    pub config: Arc<EngineConfig>,
    /// Off: stand idle, never decide, still talk
    pub use_utility_ai: bool,
    /// Whether the body can pick up holdable objects
    pub has_hand: bool,
    /// Conversation ids this agent can open with the player
    pub conversations: Vec<String>,
    /// Seconds until the next decision
    pub action_timer: f32,
    pub best: Option<ActionKey>,
    pub current: Option<ActionKey>,
    /// Useable attached to the most recently chosen object action
    pub target: Option<UseableId>,
    pub holding_object: bool,
    /// Pose of the held object before pickup
    pub held_origin: Option<Pose>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("needs", &self.needs)
            .field("emotions", &self.emotions)
            .field("current", &self.active_action_name())
            .field("action_timer", &self.action_timer)
            .finish_non_exhaustive()
    }
}

impl Agent {
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn position(&self) -> Vec3 {
        self.nav.position()
    }

    pub fn active_action(&self) -> Option<&dyn Action> {
        self.current.and_then(|key| self.actions.get(key))
    }

    pub fn active_action_name(&self) -> Option<&str> {
        self.active_action().map(|a| a.name())
    }

    /// True when the player may start talking to this agent
    pub fn is_interruptible(&self) -> bool {
        self.active_action().map_or(true, |a| a.interruptible_for_dialogue())
    }

    pub fn dominant_emotion(&self) -> Option<&str> {
        self.emotions.dominant()
    }

    pub fn frame(&self) -> AgentFrame {
        AgentFrame {
            agent: self.id,
            name: self.name.clone(),
            needs: self.needs.snapshot(),
            emotions: self.emotions.snapshot(),
            active_action: self.active_action_name().map(str::to_string),
            dominant_emotion: self.dominant_emotion().map(str::to_string),
        }
    }

    /// Run `step` on one of this agent's action instances with its collaborators
    ///
    /// Returns false when the key no longer names an instance.
    pub fn drive(
        &mut self,
        key: ActionKey,
        props: &mut dyn Props,
        dt: f32,
        step: impl FnOnce(&mut dyn Action, &mut ActionContext<'_>),
    ) -> bool {
        let Some(action) = self.actions.get_mut(key) else {
            return false;
        };
        let mut ctx = ActionContext {
            agent: self.id,
            dt,
            nav: self.nav.as_mut(),
            anim: self.anim.as_mut(),
            props,
            rng: &mut self.rng,
            config: &self.config,
            holding_object: &mut self.holding_object,
            held_origin: &mut self.held_origin,
        };
        step(action, &mut ctx);
        true
    }
}

/// Assembles an agent; needs start full, the derived emotion at 1 and
/// every other emotion at 0
pub struct AgentBuilder {
    name: String,
    needs: Vec<String>,
    emotions: Vec<String>,
    intrinsic: Vec<Box<dyn Action>>,
    conditions: Vec<Box<dyn Condition>>,
    nav: Option<Box<dyn Navigation>>,
    anim: Option<Box<dyn Animator>>,
    position: Vec3,
    seed: Option<u64>,
    conversations: Vec<String>,
    use_utility_ai: Option<bool>,
    has_hand: bool,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            needs: Vec::new(),
            emotions: Vec::new(),
            intrinsic: Vec::new(),
            conditions: Vec::new(),
            nav: None,
            anim: None,
            position: Vec3::ZERO,
            seed: None,
            conversations: Vec::new(),
            use_utility_ai: None,
            has_hand: true,
        }
    }

    pub fn need(mut self, name: impl Into<String>) -> Self {
        self.needs.push(name.into());
        self
    }

    pub fn emotion(mut self, name: impl Into<String>) -> Self {
        self.emotions.push(name.into());
        self
    }

    pub fn intrinsic(mut self, action: Box<dyn Action>) -> Self {
        self.intrinsic.push(action);
        self
    }

    pub fn condition(mut self, condition: Box<dyn Condition>) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn navigation(mut self, nav: Box<dyn Navigation>) -> Self {
        self.nav = Some(nav);
        self
    }

    pub fn animator(mut self, anim: Box<dyn Animator>) -> Self {
        self.anim = Some(anim);
        self
    }

    /// Spawn point for the default navigator
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn conversation(mut self, id: impl Into<String>) -> Self {
        self.conversations.push(id.into());
        self
    }

    pub fn use_utility_ai(mut self, enabled: bool) -> Self {
        self.use_utility_ai = Some(enabled);
        self
    }

    pub fn has_hand(mut self, has_hand: bool) -> Self {
        self.has_hand = has_hand;
        self
    }

    pub fn build(self, config: Arc<EngineConfig>) -> Agent {
        let mut needs = NeedSet::new();
        for name in self.needs {
            needs.push(Need::new(name, 1.0));
        }

        let mut emotions = EmotionSet::new();
        for name in self.emotions {
            let start = if name == config.derived_emotion { 1.0 } else { 0.0 };
            emotions.push(Emotion::new(name, start));
        }

        let position = self.position;
        let nav = self
            .nav
            .unwrap_or_else(|| Box::new(KinematicNavigator::new(position, DEFAULT_WALK_SPEED)));
        let anim = self.anim.unwrap_or_else(|| Box::new(ClipTimeline::default()));
        let seed = self.seed.unwrap_or_else(rand::random);

        Agent {
            id: AgentId::new(),
            name: self.name,
            needs,
            emotions,
            actions: ActionTable::new(self.intrinsic),
            conditions: self.conditions,
            nav,
            anim,
            rng: ChaCha8Rng::seed_from_u64(seed),
            use_utility_ai: self.use_utility_ai.unwrap_or(config.use_utility_ai),
            has_hand: self.has_hand,
            conversations: self.conversations,
            action_timer: 0.0,
            best: None,
            current: None,
            target: None,
            holding_object: false,
            held_origin: None,
            config,
        }
    }
}
