//! Train command - run the TD(0) agent through repeated episodes

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    agent::{SavedAgent, TdAgent, TdConfig, TrainingMetadata},
    cli::output::{format_number, print_kv, print_section},
    gridworld::{DEFAULT_LEVEL, GridWorld},
    pipeline::{
        FrozenController, JsonlObserver, ProgressObserver, TrainingConfig, TrainingPipeline,
        TrainingResult,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Train a TD(0) agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 500)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.05)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    pub discount: f64,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long, default_value_t = 0.05)]
    pub epsilon: f64,

    /// Multiplicative ε decay per episode (1.0 disables decay)
    #[arg(long, default_value_t = 1.0)]
    pub epsilon_decay: f64,

    /// Minimum ε after decay
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,

    /// Per-episode step cap before the episode is truncated
    #[arg(long, default_value_t = 10_000)]
    pub max_steps: usize,

    /// Level file (ASCII map); the built-in maze when omitted
    #[arg(long, short = 'l')]
    pub level: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,

    /// Optional file for JSONL per-episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Number of post-training greedy evaluation episodes (ε=0, frozen)
    #[arg(long, short = 'v', default_value_t = 0)]
    pub evaluation_episodes: usize,

    /// Seed for evaluation episodes (defaults to seed+1)
    #[arg(long)]
    pub evaluation_seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    level: String,
    episodes: usize,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    max_steps: usize,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    evaluation: Option<TrainingResult>,
    metadata: SummaryMetadata,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Load the level text from a file, or fall back to the built-in maze.
pub(crate) fn load_level(level: Option<&Path>) -> Result<(String, String)> {
    match level {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read level file: {}", path.display()))?;
            Ok((text, path.display().to_string()))
        }
        None => Ok((DEFAULT_LEVEL.to_string(), "built-in".to_string())),
    }
}

fn print_result(result: &TrainingResult) {
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
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let (level_text, level_name) = load_level(args.level.as_deref())?;
    let mut world = GridWorld::from_level(&level_text)
        .with_context(|| format!("Invalid level '{level_name}'"))?;

    let mut td_config = TdConfig::default()
        .with_learning_rate(args.learning_rate)
        .with_discount_factor(args.discount)
        .with_epsilon(args.epsilon)
        .with_epsilon_decay(args.epsilon_decay, args.min_epsilon);
    if let Some(seed) = args.seed {
        td_config = td_config.with_seed(seed);
    }
    let mut agent = TdAgent::new(td_config).context("Invalid agent configuration")?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let config = TrainingConfig {
        episodes: args.episodes,
        max_steps: args.max_steps,
        seed: args.seed,
    };

    let mut pipeline = TrainingPipeline::new(config);
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(observations_path) = &args.observations {
        let jsonl_observer = JsonlObserver::new(observations_path)?;
        pipeline = pipeline.with_observer(Box::new(jsonl_observer));
    }

    let result = pipeline.run(&mut agent, &mut world)?;

    print_section("Training Complete");
    print_kv("Level", &level_name);
    print_result(&result);
    print_kv("States learned", &format_number(agent.values().len()));

    // Post-training greedy evaluation if requested
    let evaluation_result = if args.evaluation_episodes > 0 {
        print_section("Greedy Evaluation");
        println!(
            "Playing {} episodes with exploration off...",
            args.evaluation_episodes
        );

        let evaluation_seed = args
            .evaluation_seed
            .or_else(|| args.seed.map(|s| s.wrapping_add(1)));

        let evaluation_config = TrainingConfig {
            episodes: args.evaluation_episodes,
            max_steps: args.max_steps,
            seed: evaluation_seed,
        };

        let mut evaluation_pipeline = TrainingPipeline::new(evaluation_config);
        if args.progress {
            evaluation_pipeline =
                evaluation_pipeline.with_observer(Box::new(ProgressObserver::new()));
        }

        // Exploration off, learning frozen; the trained ε is restored after
        // so the saved agent keeps its training configuration.
        let trained_epsilon = agent.epsilon();
        agent.set_epsilon(0.0)?;
        let mut frozen = FrozenController::new(&mut agent);
        let evaluation_result = evaluation_pipeline.run(&mut frozen, &mut world)?;
        agent.set_epsilon(trained_epsilon)?;

        print_result(&evaluation_result);
        Some(evaluation_result)
    } else {
        None
    };

    // Save agent if output path provided
    if let Some(output_path) = &args.output {
        let metadata = TrainingMetadata {
            episodes_trained: Some(result.episodes),
            level: Some(level_name.clone()),
            seed: args.seed,
            saved_at: None,
        };

        SavedAgent::from_agent(&agent, metadata).save_to_file(output_path)?;
        println!("\nAgent saved to: {}", output_path.display());
        println!("  Stored state values: {}", format_number(agent.values().len()));
    }

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: result,
            evaluation: evaluation_result,
            metadata: SummaryMetadata {
                level: level_name,
                episodes: args.episodes,
                learning_rate: args.learning_rate,
                discount_factor: args.discount,
                epsilon: args.epsilon,
                epsilon_decay: args.epsilon_decay,
                min_epsilon: args.min_epsilon,
                max_steps: args.max_steps,
                seed: args.seed,
            },
        };

        let file = File::create(&summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
