//! World collaborators - navigation, animation, useables and presentation

pub mod animation;
pub mod navigation;
pub mod objects;
pub mod presentation;

pub use animation::{Animator, ClipTimeline};
pub use navigation::{KinematicNavigator, Navigation};
pub use objects::{Props, Proximity, Useable, UseableRegistry};
pub use presentation::{AgentFrame, DialogueDisplay, LogPresentation, NullPresentation, Presentation, RecordedPresentation};
