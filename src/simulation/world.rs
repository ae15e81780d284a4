//! World - owns agents, useables, the sun and the dialogue manager
//!
//! Per-frame order:
//! 1. Advance the day/night signal
//! 2. Per agent: hold still for dialogue, run utility AI, or idle
//! 3. Advance navigation and animation
//! 4. Carry held objects along with their holders
//! 5. Emit agent frames
//! 6. Progress dialogue and emit its display

use super::registration::register_all;
use super::tick::{hand_position, update_agent, SimulationEvent};
use crate::conditions::NeedCondition;
use crate::core::astronomy::{DayNightSignal, SunCycle};
use crate::core::config::EngineConfig;
use crate::core::error::{NpcError, Result};
use crate::core::types::{AgentId, UseableId};
use crate::data::{build_library, Definitions};
use crate::dialogue::{select_conversation, Conversation, ConversationLibrary, DialogueInput, DialogueManager};
use crate::entity::agent::DEFAULT_WALK_SPEED;
use crate::entity::Agent;
use crate::world::{KinematicNavigator, Presentation, Useable, UseableRegistry};
use glam::Vec3;
use std::sync::Arc;

pub struct World {
    pub current_tick: u64,
    pub agents: Vec<Agent>,
    pub useables: UseableRegistry,
    pub sun: Option<Box<dyn DayNightSignal>>,
    pub dialogue: DialogueManager,
    config: Arc<EngineConfig>,
    /// Events raised between ticks, reported by the next tick
    pending: Vec<SimulationEvent>,
    registered: bool,
}

impl World {
    pub fn new(config: Arc<EngineConfig>, library: ConversationLibrary) -> Self {
        Self {
            current_tick: 0,
            agents: Vec::new(),
            useables: UseableRegistry::new(),
            sun: None,
            dialogue: DialogueManager::new(library, Arc::clone(&config)),
            config,
            pending: Vec::new(),
            registered: false,
        }
    }

    /// Build a world from validated definitions
    ///
    /// Every agent carries every declared need and emotion. With a seed,
    /// agent `i` is seeded with `seed + i`.
    pub fn from_definitions(defs: &Definitions, config: Arc<EngineConfig>, seed: Option<u64>) -> Result<Self> {
        let mut world = World::new(Arc::clone(&config), build_library(defs));
        world.sun = Some(Box::new(SunCycle::default()));

        for def in &defs.useables {
            let template = defs
                .action(&def.action)
                .ok_or_else(|| NpcError::UnknownAction(def.action.clone()))?;
            world.add_useable(Useable::new(
                def.name.clone(),
                template.instantiate()?,
                def.range,
                def.holdable,
                def.pose(),
            ));
        }

        for (idx, def) in defs.agents.iter().enumerate() {
            let speed = def.speed.unwrap_or(DEFAULT_WALK_SPEED);
            let mut builder = Agent::builder(def.name.clone())
                .navigation(Box::new(KinematicNavigator::new(def.position, speed)))
                .has_hand(def.has_hand);
            for need in &defs.needs {
                builder = builder.need(need.name.clone());
            }
            for emotion in &defs.emotions {
                builder = builder.emotion(emotion.name.clone());
            }
            for name in &def.intrinsic {
                let template = defs.action(name).ok_or_else(|| NpcError::UnknownAction(name.clone()))?;
                builder = builder.intrinsic(template.instantiate()?);
            }
            for time_def in &def.time_of_day {
                builder = builder.condition(Box::new(time_def.to_condition()?));
            }
            for id in &def.conversations {
                builder = builder.conversation(id.clone());
            }
            if let Some(enabled) = def.use_utility_ai {
                builder = builder.use_utility_ai(enabled);
            }
            if let Some(seed) = seed {
                builder = builder.seed(seed.wrapping_add(idx as u64));
            }
            world.spawn(builder.build(Arc::clone(&config)));
        }

        world.register(&defs.need_conditions())?;
        Ok(world)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn spawn(&mut self, agent: Agent) -> AgentId {
        let id = agent.id;
        tracing::debug!(agent = %agent.name, "agent spawned");
        self.agents.push(agent);
        id
    }

    pub fn add_useable(&mut self, useable: Useable) -> UseableId {
        self.useables.add(useable)
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.name == name)
    }

    /// Expand action and need declarations into conditions on every agent
    ///
    /// Runs once; spawn every agent and add every useable first.
    pub fn register(&mut self, need_links: &[NeedCondition]) -> Result<()> {
        if self.registered {
            return Err(NpcError::InvalidDefinition("conditions are already registered".to_string()));
        }
        register_all(&mut self.agents, &self.useables, need_links)?;
        self.registered = true;
        Ok(())
    }

    /// The player asks to talk to an agent
    ///
    /// Returns whether a conversation opened. Nothing happens while another
    /// dialogue is open or while the agent is busy with an action that
    /// cannot be interrupted.
    pub fn interact(&mut self, agent_name: &str) -> Result<bool> {
        if self.dialogue.is_open() {
            return Ok(false);
        }
        let agent = self
            .agents
            .iter_mut()
            .find(|a| a.name == agent_name)
            .ok_or_else(|| NpcError::UnknownCharacter(agent_name.to_string()))?;
        if !agent.is_interruptible() {
            tracing::debug!(agent = agent_name, action = ?agent.active_action_name(), "busy, not talking");
            return Ok(false);
        }

        let library = self.dialogue.library();
        let possibilities = agent
            .conversations
            .iter()
            .map(|id| {
                library
                    .conversation(id)
                    .ok_or_else(|| NpcError::UnknownConversation(id.clone()))
            })
            .collect::<Result<Vec<&Conversation>>>()?;
        let dominant = agent.dominant_emotion().map(str::to_string);
        let Some(conversation) = select_conversation(&possibilities, dominant.as_deref(), &mut agent.rng) else {
            tracing::warn!(agent = agent_name, "no conversation possibilities");
            return Ok(false);
        };
        let id = conversation.id.clone();

        self.dialogue.start_conversation(&id, &mut self.agents)?;
        self.pending.push(SimulationEvent::DialogueOpened {
            agent: agent_name.to_string(),
            conversation: id,
        });
        Ok(self.dialogue.is_open())
    }

    /// Run one frame
    pub fn tick(&mut self, dt: f32, input: &DialogueInput, presentation: &mut dyn Presentation) -> Vec<SimulationEvent> {
        let mut events = std::mem::take(&mut self.pending);
        self.current_tick += 1;

        if let Some(sun) = self.sun.as_mut() {
            sun.advance(dt);
        }
        let day_night = self.sun.as_deref();
        let talking = self.dialogue.speaking_npc().map(str::to_string);

        for agent in &mut self.agents {
            if talking.as_deref() == Some(agent.name.as_str()) {
                agent.nav.set_stopped(true);
                agent.anim.play(self.dialogue.npc_clip());
            } else if agent.use_utility_ai {
                update_agent(agent, &mut self.useables, day_night, dt, &mut events);
            } else {
                agent.anim.play(&agent.config.idle_clip);
            }
            agent.nav.advance(dt);
            agent.anim.advance(dt);
        }

        let hands: Vec<(AgentId, Vec3)> = self.agents.iter().map(|a| (a.id, hand_position(a))).collect();
        self.useables
            .follow_holders(|holder| hands.iter().find(|(id, _)| *id == holder).map(|(_, hand)| *hand));

        for agent in &self.agents {
            presentation.agent_frame(&agent.frame());
        }

        let was_open = self.dialogue.is_open();
        self.dialogue.update(dt, input, &mut self.agents);
        if let Some(display) = self.dialogue.display() {
            presentation.dialogue_display(&display);
        } else if was_open && !self.dialogue.is_open() {
            presentation.dialogue_closed();
            events.push(SimulationEvent::DialogueClosed);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::WanderAction;
    use crate::core::astronomy::FixedSun;
    use crate::dialogue::{Character, Dialogue};
    use crate::world::{NullPresentation, RecordedPresentation};

    fn make_world() -> World {
        let mut library = ConversationLibrary::new();
        library.add_character(Character::new("Ada"));
        library.add_conversation(Conversation::new(
            "hello",
            vec![Dialogue::new("Ada", vec!["Hi.".into()])],
        ));
        let config = Arc::new(EngineConfig::default());
        let mut world = World::new(Arc::clone(&config), library);
        world.spawn(
            Agent::builder("Ada")
                .need("Energy")
                .emotion("Happiness")
                .intrinsic(Box::new(WanderAction::new("Wander", 5.0, 1.0)))
                .conversation("hello")
                .seed(4)
                .build(Arc::clone(&config)),
        );
        world.register(&[]).unwrap();
        world
    }

    #[test]
    fn test_register_only_once() {
        let mut world = make_world();
        assert!(world.register(&[]).is_err());
    }

    #[test]
    fn test_tick_emits_frames() {
        let mut world = make_world();
        world.sun = Some(Box::new(FixedSun(90.0)));
        let mut presentation = RecordedPresentation::new();
        let events = world.tick(0.1, &DialogueInput::default(), &mut presentation);
        assert_eq!(presentation.frames.len(), 1);
        assert_eq!(presentation.frames[0].active_action.as_deref(), Some("Wander"));
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::ActionSwitched { .. })));
        assert_eq!(world.current_tick, 1);
    }

    #[test]
    fn test_talking_agent_stands_still_then_resumes() {
        let mut world = make_world();
        world.tick(0.1, &DialogueInput::default(), &mut NullPresentation);
        assert!(world.interact("Ada").unwrap());
        assert!(!world.interact("Ada").unwrap());

        let events = world.tick(0.1, &DialogueInput::default(), &mut NullPresentation);
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::DialogueOpened { .. })));
        let ada = world.agent("Ada").unwrap();
        assert!(ada.nav.is_stopped());
        assert!(ada.anim.is_playing("Talk"));

        let mut presentation = RecordedPresentation::new();
        world.tick(1.0, &DialogueInput::default(), &mut presentation);
        let events = world.tick(0.0, &DialogueInput::submit(), &mut presentation);
        assert!(events.contains(&SimulationEvent::DialogueClosed));
        assert_eq!(presentation.closed_count, 1);

        world.tick(0.1, &DialogueInput::default(), &mut NullPresentation);
        assert!(!world.agent("Ada").unwrap().nav.is_stopped());
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let mut world = make_world();
        assert!(matches!(world.interact("Zed"), Err(NpcError::UnknownCharacter(_))));
    }
}
