//! Database migration tool for gridiron.
//!
//! Migrations are embedded into the binary at compile time from the `migrations/`
//! directory. The database file is created if it does not exist.

use std::path::PathBuf;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tracing_subscriber::EnvFilter;

use gridiron::Database;

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(required, "Path to the SQLite database file")]
    database: String,
}

const USAGE: &str = r#"Usage: gridiron-migrate-up --database <PATH>

Create or migrate a gridiron database.

Arguments:
  --database <PATH>    SQLite database file

Example:
  gridiron-migrate-up --database ./gridiron.db

The migrations are embedded at compile time from the migrations/ directory."#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (options, free) = Options::from_command_line(USAGE);

    if !free.is_empty() {
        eprintln!("Error: Unexpected arguments: {:?}", free);
        eprintln!();
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let path = PathBuf::from(&options.database);
    tracing::info!(database = %path.display(), "running migrations");

    let db = Database::open(&path).await?;
    db.pool().close().await;

    tracing::info!("migrations completed successfully");
    Ok(())
}
