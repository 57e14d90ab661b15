//! Evaluate command - run a saved agent greedily and report penalties

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::SavedAgent,
    cli::{
        commands::train::load_level,
        output::{format_number, print_kv, print_section},
    },
    gridworld::GridWorld,
    pipeline::{FrozenController, ProgressObserver, TrainingConfig, TrainingPipeline},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Saved agent file produced by `train --output`
    pub agent: PathBuf,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Level file (ASCII map); the built-in maze when omitted
    #[arg(long, short = 'l')]
    pub level: Option<PathBuf>,

    /// Per-episode step cap before the episode is truncated
    #[arg(long, default_value_t = 10_000)]
    pub max_steps: usize,

    /// Random seed (tie-breaking is still stochastic under ε=0)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let mut agent = saved.to_agent()?;

    let (level_text, level_name) = load_level(args.level.as_deref())?;
    let mut world = GridWorld::from_level(&level_text)
        .with_context(|| format!("Invalid level '{level_name}'"))?;

    print_section("Evaluation");
    print_kv("Agent", &args.agent.display().to_string());
    print_kv("Level", &level_name);
    print_kv("Stored state values", &format_number(agent.values().len()));
    if let Some(trained) = saved.metadata.episodes_trained {
        print_kv("Episodes trained", &format_number(trained));
    }

    let config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        seed: args.seed,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    // Greedy and frozen: the stored policy is exercised as-is
    agent.set_epsilon(0.0)?;
    let mut frozen = FrozenController::new(&mut agent);
    let result = pipeline.run(&mut frozen, &mut world)?;

    print_section("Evaluation Results");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Exits",
        &format!(
            "{} ({:.1}%)",
            format_number(result.exits),
            result.exit_rate * 100.0
        ),
    );
    print_kv("Ghosts", &format_number(result.ghosts));
    print_kv("Truncated", &format_number(result.truncated));
    print_kv(
        "Best penalty",
        &result
            .best_penalty
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    print_kv("Mean penalty", &format!("{:.2}", result.mean_penalty));

    Ok(())
}
