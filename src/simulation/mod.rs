//! Simulation - decisions, registration and the per-frame world loop

pub mod evaluator;
pub mod registration;
pub mod tick;
pub mod world;

pub use evaluator::{decide, select_best, Decision};
pub use registration::register_all;
pub use tick::{update_agent, SimulationEvent};
pub use world::World;
