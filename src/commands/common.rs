//! Shared plumbing for command handlers.

use crate::storage::UfcDatabase;
use anyhow::{Context, Result};
use std::path::Path;

/// Open the database at the given path, or at the platform default when no
/// path was given on the command line.
pub fn open_database(db_path: Option<&Path>) -> Result<UfcDatabase> {
    let path = match db_path {
        Some(path) => path.to_path_buf(),
        None => UfcDatabase::default_path()?,
    };
    UfcDatabase::open(&path).with_context(|| format!("opening database at {}", path.display()))
}
