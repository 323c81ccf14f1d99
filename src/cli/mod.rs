//! Command-line interface: argument structures and typed values.

pub mod args;
pub mod types;

pub use args::{Commands, ExportTable, MigrateKind, ReportCmd, UfcData};
pub use types::{EventId, FighterId, FightId, FightOutcome, LineupId, ModelId, PredictionId, WeightClassId};
