//! `export`: dump tables as CSV.

use super::common::open_database;
use crate::cli::ExportTable;
use crate::export::{export_events_csv, export_fighters_csv, export_odds_csv};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub fn handle_export(
    db_path: Option<&Path>,
    table: ExportTable,
    output: Option<&Path>,
) -> Result<()> {
    let db = open_database(db_path)?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    match table {
        ExportTable::Odds => export_odds_csv(&db, &mut out)?,
        ExportTable::Fighters => export_fighters_csv(&db, &mut out)?,
        ExportTable::Events => export_events_csv(&db, &mut out)?,
    }

    Ok(())
}
