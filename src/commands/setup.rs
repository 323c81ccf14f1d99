//! `setup`: create the schema and seed reference data.

use super::common::open_database;
use anyhow::Result;
use std::path::Path;

pub fn handle_setup(db_path: Option<&Path>, no_seed: bool) -> Result<()> {
    let db = open_database(db_path)?;

    if no_seed {
        println!("Schema ready (weight-class seeding skipped)");
    } else {
        let seeded = db.seed_weight_classes()?;
        println!("Schema ready; {seeded} weight classes seeded");
    }
    Ok(())
}
