//! morris CLI - train reinforcement learners on behavioural task models
//!
//! This CLI provides a unified interface for:
//! - Describing a task model
//! - Training actor-critic, SARSA and Q-learning agents on it
//! - Computing and exporting the dopamine-proxy figures

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "morris")]
#[command(version, about = "Reinforcement learning on behavioural task models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a learner and compute its figures
    Run(Box<morris_rl::cli::commands::run::RunArgs>),

    /// List the cues, states and edges of a model
    Describe(morris_rl::cli::commands::describe::DescribeArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => morris_rl::cli::commands::run::execute(*args),
        Commands::Describe(args) => morris_rl::cli::commands::describe::execute(args),
    }
}
