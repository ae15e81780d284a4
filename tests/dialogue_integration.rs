//! Integration tests for dialogue driven through the world
//!
//! These tests verify:
//! - A two-sentence unit auto-advances into a two-choice unit
//! - Choosing starts the follow-up and emotion effects land on the NPC
//! - Busy agents cannot be interrupted
//! - The demo definitions load, register and run

use glam::Vec3;
use npc_utility::actions::{ActionCore, Multiplier, UseObjectAction};
use npc_utility::core::config::EngineConfig;
use npc_utility::core::types::Pose;
use npc_utility::data::parse_definitions;
use npc_utility::dialogue::{Character, Conversation, ConversationLibrary, Dialogue, DialogueInput, DialogueState};
use npc_utility::entity::Agent;
use npc_utility::simulation::{SimulationEvent, World};
use npc_utility::world::{NullPresentation, RecordedPresentation, Useable};
use std::sync::Arc;

fn make_library() -> ConversationLibrary {
    let mut library = ConversationLibrary::new();
    library.add_character(Character::new("Mira"));
    library.add_character(Character::player("Traveler"));

    let intro = Dialogue::new("Mira", vec!["Hello!".into(), "Nice weather.".into()]);
    let branch = Dialogue::new("Traveler", vec!["Hmm.".into()]).with_choices(vec!["kind".into(), "rude".into()]);
    library.add_conversation(Conversation::new("intro", vec![intro, branch]));

    let kind = Dialogue::new("Mira", vec!["Thank you!".into()]).with_emotion_effect(vec!["Happiness".into()], 0.5);
    library.add_conversation(Conversation::new("kind", vec![kind]));
    let rude = Dialogue::new("Mira", vec!["How rude.".into()]).with_emotion_effect(vec!["Anger".into()], 0.4);
    library.add_conversation(Conversation::new("rude", vec![rude]));
    library
}

fn make_world() -> World {
    let config = Arc::new(EngineConfig::default());
    let mut world = World::new(Arc::clone(&config), make_library());
    world.spawn(
        Agent::builder("Mira")
            .need("Hunger")
            .emotion("Happiness")
            .emotion("Anger")
            .conversation("intro")
            .use_utility_ai(false)
            .build(Arc::clone(&config)),
    );
    world.register(&[]).unwrap();
    world
}

/// Tick until the sentence on screen is fully revealed
fn reveal(world: &mut World, presentation: &mut RecordedPresentation) {
    for _ in 0..200 {
        world.tick(0.05, &DialogueInput::default(), presentation);
        if world.dialogue.state() != DialogueState::Typing {
            return;
        }
    }
    panic!("sentence never finished revealing");
}

#[test]
fn test_two_sentence_unit_then_two_choices() {
    let mut world = make_world();
    let mut presentation = RecordedPresentation::new();
    assert!(world.interact("Mira").unwrap());

    reveal(&mut world, &mut presentation);
    assert_eq!(presentation.dialogue.as_ref().unwrap().text, "Hello!");
    world.tick(0.0, &DialogueInput::submit(), &mut presentation);

    reveal(&mut world, &mut presentation);
    assert_eq!(presentation.dialogue.as_ref().unwrap().visible_text(), "Nice weather.");
    world.tick(0.0, &DialogueInput::submit(), &mut presentation);

    reveal(&mut world, &mut presentation);
    assert_eq!(world.dialogue.state(), DialogueState::AwaitingChoice);
    let display = presentation.dialogue.as_ref().unwrap();
    assert!(display.speaker_is_player);
    assert_eq!(display.choices.len(), 2);
}

#[test]
fn test_choice_applies_emotion_and_closes() {
    let mut world = make_world();
    let mut presentation = RecordedPresentation::new();
    world.agent_mut("Mira").unwrap().emotions.set("Anger", 0.0);
    world.interact("Mira").unwrap();
    for _ in 0..2 {
        reveal(&mut world, &mut presentation);
        world.tick(0.0, &DialogueInput::submit(), &mut presentation);
    }
    reveal(&mut world, &mut presentation);

    world.tick(0.0, &DialogueInput::choice(1), &mut presentation);
    assert_eq!(world.dialogue.current_conversation(), Some("rude"));
    let anger = world.agent("Mira").unwrap().emotions.get("Anger").unwrap();
    assert!((anger - 0.4).abs() < 1e-6);

    reveal(&mut world, &mut presentation);
    let events = world.tick(0.0, &DialogueInput::submit(), &mut presentation);
    assert!(events.contains(&SimulationEvent::DialogueClosed));
    assert_eq!(world.dialogue.state(), DialogueState::Closed);
    assert!(presentation.dialogue.is_none());
}

#[test]
fn test_busy_agent_is_not_interruptible() {
    let config = Arc::new(EngineConfig::default());
    let mut world = World::new(Arc::clone(&config), make_library());
    let mut core = ActionCore::new("Eat");
    core.need_multipliers.push(Multiplier::new("Hunger", 0.05));
    world.add_useable(Useable::new(
        "table",
        Box::new(UseObjectAction::new("Eat", "Eat").with_core(core)),
        1.0,
        false,
        Pose::at(Vec3::new(0.5, 0.0, 0.0)),
    ));
    world.spawn(
        Agent::builder("Mira")
            .need("Hunger")
            .emotion("Happiness")
            .conversation("intro")
            .build(Arc::clone(&config)),
    );
    world.register(&[]).unwrap();
    world.agent_mut("Mira").unwrap().needs.set("Hunger", 0.3);

    world.tick(0.1, &DialogueInput::default(), &mut NullPresentation);
    assert_eq!(world.agent("Mira").unwrap().active_action_name(), Some("Eat"));
    assert!(!world.interact("Mira").unwrap());
    assert!(!world.dialogue.is_open());
}

#[test]
fn test_demo_definitions_run() {
    let defs = parse_definitions(include_str!("../assets/demo.toml")).unwrap();
    let mut world = World::from_definitions(&defs, Arc::new(EngineConfig::default()), Some(42)).unwrap();
    assert_eq!(world.agents.len(), 2);
    assert_eq!(world.useables.len(), 3);

    let mut presentation = RecordedPresentation::new();
    for _ in 0..120 {
        world.tick(1.0 / 30.0, &DialogueInput::default(), &mut presentation);
    }
    assert_eq!(presentation.frames.len(), 240);
    let tomas = world.agent("Tomas").unwrap();
    assert!(tomas.current.is_none(), "utility AI is off for Tomas");

    assert!(world.interact("Tomas").unwrap());
    assert_eq!(world.dialogue.speaking_npc(), Some("Tomas"));
}
