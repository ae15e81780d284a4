//! NPC Utility - utility-scored NPC decisions and branching dialogue

pub mod actions;
pub mod conditions;
pub mod core;
pub mod data;
pub mod dialogue;
pub mod entity;
pub mod simulation;
pub mod world;
