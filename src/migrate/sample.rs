//! Built-in sample card.
//!
//! The scraper historically fell back to this fixture when every live
//! source failed; here it is only loaded when the `seed-sample` command is
//! explicitly invoked, through the same ingest path as real data.

use super::rows::OddsCsvRow;
use super::{MigrationSummary, Migrator};
use crate::error::Result;
use crate::storage::UfcDatabase;

/// The fixture rows, in the scraper wire format.
pub fn sample_odds_rows() -> Vec<OddsCsvRow> {
    let card = |link: &str,
                date: &str,
                event: &str,
                fighter1: &str,
                fighter2: &str,
                odds1: f64,
                odds2: f64| OddsCsvRow {
        link: link.to_string(),
        date: date.to_string(),
        event: event.to_string(),
        fighter1: fighter1.to_string(),
        fighter2: fighter2.to_string(),
        fighter1_odds: Some(odds1),
        fighter2_odds: Some(odds2),
        result: String::new(),
        timestamp: String::new(),
    };

    vec![
        card(
            "sample_1",
            "19 Jul 25",
            "UFC 304: Edwards vs Muhammad 2",
            "Leon Edwards",
            "Belal Muhammad",
            1.85,
            1.95,
        ),
        card(
            "sample_1",
            "19 Jul 25",
            "UFC 304: Edwards vs Muhammad 2",
            "Tom Aspinall",
            "Curtis Blaydes",
            1.45,
            2.75,
        ),
        card(
            "sample_2",
            "27 Jul 25",
            "UFC Fight Night: Sandhagen vs Nurmagomedov",
            "Cory Sandhagen",
            "Umar Nurmagomedov",
            2.10,
            1.75,
        ),
        card(
            "sample_2",
            "27 Jul 25",
            "UFC Fight Night: Sandhagen vs Nurmagomedov",
            "Shara Magomedov",
            "Michal Oleksiejczuk",
            1.65,
            2.25,
        ),
    ]
}

/// Load the sample card. Replay-safe like any other migration.
pub fn seed_sample_data(db: &UfcDatabase) -> Result<MigrationSummary> {
    Migrator::new(db).migrate_odds_rows(sample_odds_rows())
}
