//! Groundlink CLI - terminal ground control station.
//!
//! Connects to a telemetry bridge over WebSocket and shows the vehicle on a
//! live map next to readout, chart and alert panels.

mod commands;
mod error;
mod runner;
mod tui_app;
mod ui;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "groundlink")]
#[command(version)]
#[command(about = "Ground control station dashboard for a single drone", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the telemetry bridge and open the dashboard
    Run {
        /// Telemetry WebSocket URL (overrides [telemetry] url in config.ini)
        #[arg(long)]
        url: Option<String>,

        /// Enable debug logging regardless of RUST_LOG
        #[arg(long)]
        debug: bool,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { url, debug } => commands::run::run(RunArgs { url, debug }),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
