pub mod astronomy;
pub mod config;
pub mod error;
pub mod types;

pub use astronomy::{DayNightSignal, FixedSun, SunCycle, TimeOfDay};
pub use config::EngineConfig;
pub use error::{NpcError, Result};
