//! Observer port - abstraction for training observation and data collection
//!
//! Observers can be composed to collect different kinds of data during
//! training without coupling the episode loop to specific output formats.
//!
//! # Event Sequence
//!
//! 1. `on_training_start(total_episodes)` - Once at the beginning
//! 2. For each episode:
//!    - `on_episode_start(episode)`
//!    - `on_step(...)` - For each executed move
//!    - `on_episode_end(summary)`
//! 3. `on_training_end()` - Once at the end

use serde::{Deserialize, Serialize};

use crate::{Result, ports::controller::Transition};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    ReachedExit,
    CaughtByGhost,
    /// The step cap was reached before a terminal cell; the loop simply
    /// stopped issuing calls.
    Truncated,
}

/// Summary of one completed episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    /// Cumulative penalty; lower is better.
    pub penalty: i32,
    pub termination: Termination,
}

/// Observer trait for monitoring training.
///
/// All methods default to no-ops so observers implement only the events
/// they care about.
pub trait EpisodeObserver: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each executed move, with the transition the controller
    /// also observed.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, terminal or truncated.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode. Finalize outputs here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
