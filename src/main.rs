//! NPC Utility - headless demo
//!
//! Loads a village from definitions, runs it for a number of frames and
//! reports what the villagers decided. Optionally walks up to one of them
//! and clicks through their conversation.

use clap::Parser;
use npc_utility::core::config::EngineConfig;
use npc_utility::core::error::Result;
use npc_utility::data::{load_definitions, parse_definitions};
use npc_utility::dialogue::DialogueInput;
use npc_utility::simulation::{SimulationEvent, World};
use npc_utility::world::{AgentFrame, LogPresentation, Presentation, RecordedPresentation};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_DEFINITIONS: &str = include_str!("../assets/demo.toml");

/// Headless utility NPC demo
#[derive(Parser, Debug)]
#[command(name = "npc-utility")]
#[command(about = "Run utility NPCs headless and report their decisions")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine configuration TOML (defaults built in)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Definitions TOML (the demo village when omitted)
    #[arg(long)]
    defs: Option<PathBuf>,

    /// Talk to this agent on the first frame and click through the dialogue
    #[arg(long)]
    talk: Option<String>,

    /// Print one JSON line per frame instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    tick: u64,
    events: &'a [SimulationEvent],
    agents: &'a [AgentFrame],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("npc_utility=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let defs = match &args.defs {
        Some(path) => load_definitions(path)?,
        None => parse_definitions(DEMO_DEFINITIONS)?,
    };

    let mut world = World::from_definitions(&defs, Arc::new(config), Some(seed))?;
    tracing::info!(seed, agents = world.agents.len(), useables = world.useables.len(), "world ready");

    let mut presentation = RecordedPresentation::new();
    let mut log = LogPresentation;
    let mut switches = 0usize;
    let mut talked = false;

    for _ in 0..args.ticks {
        if let Some(name) = args.talk.as_deref().filter(|_| !talked) {
            talked = world.interact(name)?;
        }
        let input = dialogue_input(&world, &presentation);
        let events = world.tick(args.dt, &input, &mut presentation);
        let frames = presentation.take_frames();

        switches += events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::ActionSwitched { .. }))
            .count();

        if args.json {
            let line = FrameLine {
                tick: world.current_tick,
                events: &events,
                agents: &frames,
            };
            match serde_json::to_string(&line) {
                Ok(json) => println!("{}", json),
                Err(err) => tracing::warn!(error = %err, "frame not serializable"),
            }
        } else {
            for frame in &frames {
                log.agent_frame(frame);
            }
            for event in &events {
                tracing::debug!(tick = world.current_tick, ?event, "event");
            }
        }
    }

    if !args.json {
        print_summary(&world, switches);
    }
    Ok(())
}

/// Click continue once a sentence is fully shown; take the first choice
fn dialogue_input(world: &World, presentation: &RecordedPresentation) -> DialogueInput {
    let Some(display) = presentation.dialogue.as_ref().filter(|_| world.dialogue.is_open()) else {
        return DialogueInput::default();
    };
    if display.revealed_chars < display.text.chars().count() {
        return DialogueInput::default();
    }
    if display.choices.is_empty() {
        DialogueInput::submit()
    } else {
        DialogueInput::choice(0)
    }
}

fn print_summary(world: &World, switches: usize) {
    println!("\n=== NPC UTILITY ===");
    println!("Ticks: {}  Action switches: {}", world.current_tick, switches);
    for agent in &world.agents {
        let frame = agent.frame();
        println!(
            "\n{} - {} (mood: {})",
            frame.name,
            frame.active_action.as_deref().unwrap_or("idle"),
            frame.dominant_emotion.as_deref().unwrap_or("none")
        );
        for (name, value) in frame.needs.iter().chain(frame.emotions.iter()) {
            println!("  {:<10} {:>5.2}", name, value);
        }
    }
}
