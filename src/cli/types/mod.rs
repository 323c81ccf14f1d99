//! Typed values shared between the CLI surface and the storage layer.

pub mod ids;
pub mod outcome;

pub use ids::{EventId, FighterId, FightId, LineupId, ModelId, PredictionId, WeightClassId};
pub use outcome::FightOutcome;
