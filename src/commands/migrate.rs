//! `migrate` and `seed-sample`: load CSV batches into the database.

use super::common::open_database;
use crate::cli::MigrateKind;
use crate::migrate::{sample::seed_sample_data, MigrationSummary, Migrator};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle_migrate(db_path: Option<&Path>, kind: MigrateKind, file: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let migrator = Migrator::new(&db);

    let summary = match kind {
        MigrateKind::Odds => migrator.migrate_odds_file(file),
        MigrateKind::Fights => migrator.migrate_fights_file(file),
    }
    .with_context(|| format!("migration aborted, {} left unchanged", file.display()))?;

    print_summary(&summary);
    Ok(())
}

pub fn handle_seed_sample(db_path: Option<&Path>) -> Result<()> {
    let db = open_database(db_path)?;
    let summary = seed_sample_data(&db).context("seeding sample data")?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &MigrationSummary) {
    println!(
        "{} rows read, {} skipped",
        summary.rows_read, summary.rows_skipped
    );
    println!(
        "created: {} fighters, {} events",
        summary.fighters_created, summary.events_created
    );
    println!(
        "inserted: {} fights ({} already present), {} odds rows, {} stat rows",
        summary.fights_inserted, summary.fights_skipped, summary.odds_inserted,
        summary.stats_inserted
    );
}
