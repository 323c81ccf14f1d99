//! Storage layer for the UFC data CLI.
//!
//! A thin abstraction over the SQLite database, organized into logical
//! components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Basic CRUD operations (the data access layer)
//! - `analysis`: Read-only analytics and report queries

pub mod analysis;
pub mod models;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

pub use models::*;
pub use schema::UfcDatabase;
