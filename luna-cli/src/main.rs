mod app;
mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use app::App;
use commands::{CreditArgs, QuoteArgs, RecordsAction, SettingsAction};

/// Quote and credit calculators with a persistent record log.
#[derive(Parser, Debug)]
#[command(name = "luna")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend ("sqlite" or "memory")
    #[arg(long, default_value = "sqlite")]
    backend: String,

    /// Database file for the sqlite backend (":memory:" for ephemeral)
    #[arg(long, default_value = "luna.db")]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a quote and optionally save it to the record log
    Quote(QuoteArgs),
    /// Compute remaining prorated credit for license purchases
    Credit(CreditArgs),
    /// Inspect, export, and prune the saved record log
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
    /// Show or change stored preferences
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut app = App::open(&cli.backend, &cli.database).await?;

    match &cli.command {
        Command::Quote(args) => commands::run_quote(&app, args).await,
        Command::Credit(args) => commands::run_credit(&app, args).await,
        Command::Records { action } => commands::run_records(&app, action).await,
        Command::Settings { action } => commands::run_settings(&mut app, action).await,
    }
}
