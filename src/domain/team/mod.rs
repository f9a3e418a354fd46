// Team domain module
// Contains the team aggregate, its short name value object and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use events::TeamEvent;
pub use team::{Team, TeamDraft, TeamWithStudents};
pub use value_objects::ShortName;
