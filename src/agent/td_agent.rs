//! TD(0) agent: lookahead simulation, ε-greedy selection, value update

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    agent::{config::TdConfig, state::StateKey, value_table::ValueTable},
    gridworld::{Action, Cell, GridWorld, StepOutcome, transition},
    ports::{Controller, Transition},
    types::Position,
};

/// Simulated result of taking one action: the successor state, the cost the
/// real environment would charge, and whether the move would end the episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub state: StateKey,
    pub cost: i32,
    pub terminal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TdAgentState {
    pub values: ValueTable,
    pub epsilon: f64,
    pub initial_epsilon: f64,
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular TD(0) agent with ε-greedy, cost-minimizing action selection.
///
/// The agent owns its value table; nothing about the learning state is
/// global. Selection simulates all four moves one step ahead against a
/// private copy of the grid, scores each candidate by immediate cost plus
/// discounted cost-to-go, and picks the minimum.
#[derive(Debug, Clone)]
pub struct TdAgent {
    values: ValueTable,
    epsilon: f64,
    initial_epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TdAgent {
    /// Create an agent from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`](crate::Error::InvalidHyperparameter)
    /// if any rate is non-finite or outside [0, 1].
    pub fn new(config: TdConfig) -> Result<Self> {
        config.validate()?;
        Ok(TdAgent {
            values: ValueTable::new(config.learning_rate, config.discount_factor),
            epsilon: config.epsilon,
            initial_epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            min_epsilon: config.min_epsilon,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration rate (e.g. 0.0 for greedy evaluation).
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
            return Err(crate::Error::InvalidHyperparameter {
                name: "epsilon".to_string(),
                value: epsilon,
            });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    /// Simulate all four moves one step ahead.
    ///
    /// Each legal destination is evaluated with the same [`transition`]
    /// table the real environment applies, against a private deep copy of
    /// the grid; the world itself is never touched. An illegal destination
    /// yields the current state unchanged with the fixed bump cost,
    /// mirroring the real environment exactly.
    pub fn simulate_candidates(&self, world: &GridWorld) -> Vec<(Action, Candidate)> {
        let player = world.player_pos();
        Action::ALL
            .iter()
            .map(|&action| {
                let (dx, dy) = action.delta();
                let (nx, ny) = player.translated(dx, dy);

                if !world.can_move(nx, ny) {
                    let candidate = Candidate {
                        state: StateKey::capture(player, world.grid()),
                        cost: StepOutcome::bump().cost,
                        terminal: false,
                    };
                    return (action, candidate);
                }

                let dest = Position::new(nx as usize, ny as usize);
                let mut grid = world.grid().clone();
                let outcome = transition(grid.get(dest.x, dest.y));
                grid.set(player.x, player.y, Cell::Empty);
                grid.set(dest.x, dest.y, Cell::Player);

                let candidate = Candidate {
                    state: StateKey::capture(dest, &grid),
                    cost: outcome.cost,
                    terminal: outcome.terminal,
                };
                (action, candidate)
            })
            .collect()
    }

    /// ε-greedy, cost-minimizing action selection.
    ///
    /// With probability ε the action is uniform over all four moves,
    /// including ones that would bump a wall. Otherwise each candidate is
    /// scored as `cost + γ·V(next)` (the discounted term dropped for
    /// terminal candidates) and the minimum wins; exact ties are broken
    /// uniformly at random.
    pub fn choose_action(&mut self, world: &GridWorld) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            return *Action::ALL.choose(&mut self.rng).unwrap();
        }

        // Exploit: evaluate all adjacent states
        let candidates = self.simulate_candidates(world);
        let mut best_score = f64::INFINITY;
        let mut best_actions: Vec<Action> = Vec::new();

        for (action, candidate) in &candidates {
            let mut score = candidate.cost as f64;
            if !candidate.terminal {
                score += self.values.discount_factor() * self.values.get(&candidate.state);
            }

            if score < best_score {
                best_score = score;
                best_actions.clear();
                best_actions.push(*action);
            } else if score == best_score {
                best_actions.push(*action);
            }
        }

        match best_actions.choose(&mut self.rng) {
            Some(&action) => action,
            // Unreachable with four always-enumerable candidates; the
            // contract still asks for a uniform fallback.
            None => *Action::ALL.choose(&mut self.rng).unwrap(),
        }
    }

    /// TD(0) update with the cost observed from the real environment.
    ///
    /// Runs after every real move, including terminal entries and bump
    /// no-ops (which are ordinary transitions with cost +1 and an unchanged
    /// successor state).
    pub fn update(&mut self, old_state: &StateKey, observed_cost: i32, new_state: &StateKey) {
        self.values
            .td_update(old_state, observed_cost as f64, new_state);
    }

    /// Decay ε after an episode, clamped to the configured floor.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }

    pub(crate) fn export_state(&self) -> TdAgentState {
        TdAgentState {
            values: self.values.clone(),
            epsilon: self.epsilon,
            initial_epsilon: self.initial_epsilon,
            epsilon_decay: self.epsilon_decay,
            min_epsilon: self.min_epsilon,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: TdAgentState) -> Self {
        TdAgent {
            values: state.values,
            epsilon: state.epsilon,
            initial_epsilon: state.initial_epsilon,
            epsilon_decay: state.epsilon_decay,
            min_epsilon: state.min_epsilon,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Controller for TdAgent {
    fn select_action(&mut self, world: &GridWorld) -> Result<Action> {
        Ok(self.choose_action(world))
    }

    fn observe(&mut self, transition: &Transition) -> Result<()> {
        self.update(
            &transition.old_state,
            transition.cost,
            &transition.new_state,
        );
        Ok(())
    }

    fn end_episode(&mut self) -> Result<()> {
        self.decay_epsilon();
        Ok(())
    }

    fn name(&self) -> &str {
        "TD(0)"
    }

    fn reset(&mut self) -> Result<()> {
        self.values.reset();
        self.epsilon = self.initial_epsilon;
        self.reset_rng();
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
