//! Command handlers, one module per CLI command.

pub mod common;
pub mod export;
pub mod migrate;
pub mod report;
pub mod setup;

pub use export::handle_export;
pub use migrate::{handle_migrate, handle_seed_sample};
pub use report::handle_report;
pub use setup::handle_setup;
