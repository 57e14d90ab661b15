//! Episode loop for training and evaluation

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agent::StateKey,
    gridworld::{EpisodeStatus, GridWorld},
    ports::{Controller, EpisodeObserver, EpisodeSummary, Termination, Transition},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Per-episode step cap; an episode that reaches it is truncated
    pub max_steps: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_steps: 10_000,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,

    /// Episodes ending at the exit
    pub exits: usize,

    /// Episodes ending on a ghost
    pub ghosts: usize,

    /// Episodes stopped by the step cap
    pub truncated: usize,

    /// Lowest (best) episode penalty observed
    pub best_penalty: Option<i32>,

    /// Mean episode penalty
    pub mean_penalty: f64,

    /// Fraction of episodes reaching the exit
    pub exit_rate: f64,
}

impl TrainingResult {
    /// Create a new training result from per-episode penalties and
    /// termination counts.
    pub fn new(penalties: &[i32], exits: usize, ghosts: usize, truncated: usize) -> Self {
        let episodes = penalties.len();
        let mean_penalty = if episodes > 0 {
            penalties.iter().map(|p| *p as f64).sum::<f64>() / episodes as f64
        } else {
            0.0
        };
        let exit_rate = if episodes > 0 {
            exits as f64 / episodes as f64
        } else {
            0.0
        };

        Self {
            episodes,
            exits,
            ghosts,
            truncated,
            best_penalty: penalties.iter().copied().min(),
            mean_penalty,
            exit_rate,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Episode loop driving one controller through repeated resets of a world.
///
/// Per step, strictly in sequence: encode the pre-move state, ask the
/// controller for an action, execute it against the real world, encode the
/// post-move state, and feed the observed transition back to the controller.
/// The whole loop is single-threaded and synchronous.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn EpisodeObserver>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn EpisodeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of episodes.
    pub fn run(
        &mut self,
        controller: &mut dyn Controller,
        world: &mut GridWorld,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            controller.set_rng_seed(seed)?;
        }

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut penalties = Vec::with_capacity(self.config.episodes);
        let mut exits = 0;
        let mut ghosts = 0;
        let mut truncated = 0;

        for episode in 0..self.config.episodes {
            world.reset();

            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let (steps, termination) = self.play_episode(episode, controller, world)?;
            controller.end_episode()?;

            match termination {
                Termination::ReachedExit => exits += 1,
                Termination::CaughtByGhost => ghosts += 1,
                Termination::Truncated => truncated += 1,
            }
            penalties.push(world.penalty());

            let summary = EpisodeSummary {
                episode,
                steps,
                penalty: world.penalty(),
                termination,
            };
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(TrainingResult::new(&penalties, exits, ghosts, truncated))
    }

    fn play_episode(
        &mut self,
        episode: usize,
        controller: &mut dyn Controller,
        world: &mut GridWorld,
    ) -> Result<(usize, Termination)> {
        let mut steps = 0;

        loop {
            if steps >= self.config.max_steps {
                // Externally stopped: no further calls, no fabricated update
                return Ok((steps, Termination::Truncated));
            }

            let old_state = StateKey::capture(world.player_pos(), world.grid());
            let action = controller.select_action(world)?;
            let outcome = world.step(action)?;
            let new_state = StateKey::capture(world.player_pos(), world.grid());

            let transition = Transition {
                old_state,
                action,
                cost: outcome.cost,
                new_state,
                terminal: outcome.terminal,
            };
            controller.observe(&transition)?;

            for observer in &mut self.observers {
                observer.on_step(episode, steps, &transition)?;
            }
            steps += 1;

            if outcome.terminal {
                let termination = match world.status() {
                    EpisodeStatus::CaughtByGhost => Termination::CaughtByGhost,
                    _ => Termination::ReachedExit,
                };
                return Ok((steps, termination));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        agent::{TdAgent, TdConfig},
        pipeline::baselines::RandomController,
    };

    #[test]
    fn test_outcome_counts_sum_to_episodes() {
        let config = TrainingConfig {
            episodes: 20,
            max_steps: 50,
            seed: Some(42),
        };

        let mut world = GridWorld::from_level(". P G\n.   E").unwrap();
        let mut pipeline = TrainingPipeline::new(config);
        let mut controller = RandomController::new("Random".to_string());

        let result = pipeline.run(&mut controller, &mut world).unwrap();
        assert_eq!(result.episodes, 20);
        assert_eq!(result.exits + result.ghosts + result.truncated, 20);
        assert!(result.best_penalty.is_some());
    }

    #[test]
    fn test_td_agent_populates_value_table() {
        let config = TrainingConfig {
            episodes: 30,
            max_steps: 100,
            seed: Some(7),
        };

        let mut world = GridWorld::from_level(".P E").unwrap();
        let mut agent = TdAgent::new(TdConfig::default().with_seed(7)).unwrap();
        let mut pipeline = TrainingPipeline::new(config);

        let result = pipeline.run(&mut agent, &mut world).unwrap();
        assert_eq!(result.episodes, 30);
        // Every episode visits at least the start state
        assert!(agent.values().len() > 0);
        // The corridor has no ghost; everything ends at the exit or the cap
        assert_eq!(result.ghosts, 0);
    }

    #[test]
    fn test_truncation_at_step_cap() {
        let config = TrainingConfig {
            episodes: 3,
            max_steps: 2,
            seed: Some(1),
        };

        // No terminal cell reachable in two steps from here
        let mut world = GridWorld::from_level("P    E").unwrap();
        let mut agent = TdAgent::new(TdConfig::default().with_seed(1)).unwrap();
        let mut pipeline = TrainingPipeline::new(config);

        let result = pipeline.run(&mut agent, &mut world).unwrap();
        assert_eq!(result.truncated, 3);
    }

    #[test]
    fn test_result_json_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("result.json");

        let result = TrainingResult::new(&[3, -5, 10], 2, 0, 1);
        result.save(&path).unwrap();
        let loaded = TrainingResult::load(&path).unwrap();

        assert_eq!(loaded.episodes, 3);
        assert_eq!(loaded.best_penalty, Some(-5));
        assert!((loaded.mean_penalty - (8.0 / 3.0)).abs() < 1e-12);
        assert!((loaded.exit_rate - (2.0 / 3.0)).abs() < 1e-12);
    }
}
