//! Static definitions authored in TOML

pub mod definitions;
pub mod loader;

pub use definitions::{ActionDef, AgentDef, Definitions, NeedDef, UseableDef};
pub use loader::{build_library, load_definitions, parse_definitions};
