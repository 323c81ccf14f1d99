//! CLI argument definitions and parsing structures.

use super::types::{FightId, ModelId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "ufc-data",
    about = "UFC fight data store: CSV migration, reports and exports"
)]
pub struct UfcData {
    /// Path to the SQLite database file (defaults to the platform data dir).
    #[clap(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create all tables and indexes if absent; never alters existing tables.
    ///
    /// Also seeds the standard weight-class divisions unless told otherwise.
    Setup {
        /// Skip seeding weight-class reference data.
        #[clap(long)]
        no_seed: bool,
    },

    /// Load a scraper-produced CSV file.
    ///
    /// One transaction per file: a storage failure rolls the whole batch
    /// back, while malformed rows are logged and skipped. Re-running on the
    /// same file is a no-op.
    Migrate {
        /// Which CSV shape the file uses.
        #[clap(value_enum)]
        kind: MigrateKind,

        /// Path to the CSV file.
        file: PathBuf,
    },

    /// Load the built-in sample card through the normal migration path.
    ///
    /// This replaces the old implicit fallback-to-sample-data behavior: it
    /// only runs when explicitly invoked.
    SeedSample,

    /// Read-only reports over the stored data.
    Report {
        #[clap(subcommand)]
        cmd: ReportCmd,
    },

    /// Export a table as CSV (odds use the scraper wire format, so the
    /// output can be re-imported without creating new rows).
    Export {
        #[clap(value_enum)]
        table: ExportTable,

        /// Output file (stdout when omitted).
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}

/// CSV shapes the migrator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateKind {
    /// `link,date,event,fighter1,fighter2,fighter1_odds,fighter2_odds,result,timestamp`
    Odds,
    /// The complete fight-data shape (event, fighters, attributes, stats).
    Fights,
}

/// Tables the exporter can dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTable {
    Odds,
    Fighters,
    Events,
}

#[derive(Debug, Subcommand)]
pub enum ReportCmd {
    /// Win-rate rankings over completed fights.
    Rankings {
        /// Restrict to one weight class by name.
        #[clap(long)]
        weight_class: Option<String>,

        /// Minimum completed fights to qualify.
        #[clap(long, default_value_t = 3)]
        min_fights: u32,

        /// Maximum number of entries.
        #[clap(long, default_value_t = 25)]
        limit: u32,

        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Head-to-head record between two fighters, by name.
    HeadToHead {
        fighter_a: String,
        fighter_b: String,

        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Full card for one event (natural key: name + date).
    Event {
        name: String,

        /// Event date (YYYY-MM-DD).
        #[clap(long)]
        date: NaiveDate,

        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Feature vector for a fight, consumed by the prediction pipeline.
    Features {
        #[clap(long)]
        fight_id: FightId,

        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Accuracy of a prediction model over its resolved predictions.
    ModelAccuracy {
        #[clap(long)]
        model_id: ModelId,

        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}
