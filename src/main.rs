//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ufc_data::{
    cli::{Commands, UfcData},
    commands::{handle_export, handle_migrate, handle_report, handle_seed_sample, handle_setup},
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = UfcData::parse();
    let db_path = app.db_path.as_deref();

    match app.command {
        Commands::Setup { no_seed } => handle_setup(db_path, no_seed)?,
        Commands::Migrate { kind, file } => handle_migrate(db_path, kind, &file)?,
        Commands::SeedSample => handle_seed_sample(db_path)?,
        Commands::Report { cmd } => handle_report(db_path, cmd)?,
        Commands::Export { table, output } => {
            handle_export(db_path, table, output.as_deref())?
        }
    }

    Ok(())
}
