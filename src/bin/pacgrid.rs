//! pacgrid CLI - Train, evaluate, and export TD(0) maze agents

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pacgrid")]
#[command(version, about = "Tabular TD(0) agent for a pellet-maze grid world", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a TD(0) agent on a level
    Train(pacgrid::cli::commands::train::TrainArgs),

    /// Evaluate a trained agent greedily
    Evaluate(pacgrid::cli::commands::evaluate::EvaluateArgs),

    /// Export a value table to CSV
    Export(pacgrid::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => pacgrid::cli::commands::train::execute(args),
        Commands::Evaluate(args) => pacgrid::cli::commands::evaluate::execute(args),
        Commands::Export(args) => pacgrid::cli::commands::export::execute(args),
    }
}
