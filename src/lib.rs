//! UFC fight-data store.
//!
//! Loads scraper-produced CSV files (fights, fighters, betting odds) into a
//! single-file SQLite database and exposes a typed data-access layer plus
//! report queries on top of it.
//!
//! ## Pipeline
//!
//! Scrapers write CSVs; `migrate` resolves natural keys (fighter name,
//! event name + date) to surrogate ids and inserts the dependent fight,
//! stat and odds rows, one transaction per file. Replaying a file is a
//! no-op, so scrapes can be re-run freely. `report` and `export` read the
//! result back out for analytics, prediction-model bookkeeping and fantasy
//! lineup tooling.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ufc_data::{migrate::Migrator, storage::UfcDatabase};
//!
//! # fn example() -> ufc_data::Result<()> {
//! let db = UfcDatabase::open(std::path::Path::new("ufc_data.db"))?;
//! db.seed_weight_classes()?;
//!
//! let summary = Migrator::new(&db).migrate_odds_file(std::path::Path::new("odds_raw.csv"))?;
//! println!("{} fights inserted", summary.fights_inserted);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod export;
pub mod migrate;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{
    EventId, FighterId, FightId, FightOutcome, LineupId, ModelId, PredictionId, WeightClassId,
};
pub use error::{Result, UfcError};
pub use storage::UfcDatabase;
