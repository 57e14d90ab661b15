//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without
//! coupling the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{EpisodeObserver, EpisodeSummary, Termination},
};

/// Episodes included in the rolling score average, matching the score panel
/// of the original game shell.
pub const SCORE_WINDOW: usize = 25;

/// Progress bar observer - shows training progress with score statistics
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    metrics: MetricsObserver,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            metrics: MetricsObserver::new(),
        }
    }

    fn message(&self) -> String {
        let best = self
            .metrics
            .best_penalty()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        match self.metrics.rolling_mean(SCORE_WINDOW) {
            Some(avg) => format!("best:{best} avg{SCORE_WINDOW}:{avg:.1}"),
            None => format!("best:{best}"),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.metrics.on_episode_end(summary)?;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - tracks per-episode penalties and terminations
pub struct MetricsObserver {
    penalties: Vec<i32>,
    exits: usize,
    ghosts: usize,
    truncated: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            penalties: Vec::new(),
            exits: 0,
            ghosts: 0,
            truncated: 0,
        }
    }

    /// Lowest (best) penalty so far
    pub fn best_penalty(&self) -> Option<i32> {
        self.penalties.iter().copied().min()
    }

    /// Mean penalty over the last `window` episodes
    pub fn rolling_mean(&self, window: usize) -> Option<f64> {
        if self.penalties.is_empty() || window == 0 {
            return None;
        }
        let tail = &self.penalties[self.penalties.len().saturating_sub(window)..];
        Some(tail.iter().map(|p| *p as f64).sum::<f64>() / tail.len() as f64)
    }

    pub fn episodes(&self) -> usize {
        self.penalties.len()
    }

    pub fn exit_rate(&self) -> f64 {
        if self.penalties.is_empty() {
            0.0
        } else {
            self.exits as f64 / self.penalties.len() as f64
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeObserver for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.penalties.push(summary.penalty);
        match summary.termination {
            Termination::ReachedExit => self.exits += 1,
            Termination::CaughtByGhost => self.ghosts += 1,
            Termination::Truncated => self.truncated += 1,
        }
        Ok(())
    }
}

/// Per-episode record written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
    pub penalty: i32,
    pub termination: Termination,
}

/// JSONL observer - writes one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|source| crate::Error::Io {
            operation: format!("create observations file {}", path.as_ref().display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl EpisodeObserver for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            episode: summary.episode,
            steps: summary.steps,
            penalty: summary.penalty,
            termination: summary.termination,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
