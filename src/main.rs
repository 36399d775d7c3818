use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use zeninvest::app::{App, Portfolio};

#[derive(Parser)]
#[command(name = "zeninvest", about = "A terminal-based portfolio tracker")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, default_value = "zeninvest.db")]
    database: String,

    /// Snapshot file used by the in-app import/export keys
    #[arg(long)]
    snapshot: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a portable snapshot of the portfolio and exit
    Export { file: String },
    /// Replace the portfolio with a snapshot file and exit
    Import { file: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let database_path = shellexpand::tilde(&cli.database).into_owned();
    let db_connect_options = SqliteConnectOptions::new()
        .filename(&database_path)
        .create_if_missing(true);

    let connection = SqlitePool::connect_with(db_connect_options).await?;
    let mut portfolio = Portfolio::load(connection).await?;

    match cli.command {
        Some(Command::Export { file }) => {
            let path = PathBuf::from(shellexpand::tilde(&file).into_owned());
            portfolio.export_snapshot(&path)?;
            println!("Snapshot exported to {}", path.display());
        }
        Some(Command::Import { file }) => {
            let path = PathBuf::from(shellexpand::tilde(&file).into_owned());
            portfolio.import_snapshot(&path).await?;
            println!(
                "Snapshot imported: {} assets, {} transactions",
                portfolio.assets().len(),
                portfolio.transactions().len()
            );
        }
        None => {
            let snapshot_path = cli
                .snapshot
                .map(|s| PathBuf::from(shellexpand::tilde(&s).into_owned()));
            let mut app = App::new(portfolio, snapshot_path);
            app.run().await?;
        }
    }

    Ok(())
}
