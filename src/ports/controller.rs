//! Controller port - abstraction for move-selection policies
//!
//! This port defines the interface the training pipeline drives, allowing it
//! to work with:
//! - Learning controllers (the TD(0) agent)
//! - Baselines (uniform random)
//! - Wrappers (frozen evaluation)

use crate::{
    Result,
    agent::StateKey,
    gridworld::{Action, GridWorld},
};

/// One real transition, as observed by the control loop.
///
/// `cost` is the cost the real environment actually charged, which is what
/// the TD update consumes — never the simulated one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub old_state: StateKey,
    pub action: Action,
    pub cost: i32,
    pub new_state: StateKey,
    pub terminal: bool,
}

/// Controller trait - unified interface for move-selection policies.
///
/// # Design Philosophy
///
/// This trait represents a **port** in hexagonal architecture - a boundary
/// between the control loop and concrete policies. The loop calls
/// [`select_action`](Controller::select_action) before each move and feeds
/// the observed [`Transition`] back through
/// [`observe`](Controller::observe); adaptive controllers learn there,
/// non-adaptive ones use the default no-op.
pub trait Controller: Send {
    /// Select the next action for the current world state.
    fn select_action(&mut self, world: &GridWorld) -> Result<Action>;

    /// Observe one real transition, including terminal entries and bump
    /// no-ops. Called unconditionally after every executed move.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive controllers.
    fn observe(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called once when an episode ends (terminal entry or truncation).
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Adaptive controllers decay exploration here.
    fn end_episode(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get the controller's name, used in reports and summaries.
    fn name(&self) -> &str;

    /// Reset learned state to initial conditions.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for stateless controllers.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the controller's internal random number generator.
    ///
    /// Training pipelines call this when supplied with a deterministic seed
    /// to ensure reproducible results. Stateless controllers can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types (e.g. for serialization after
    /// training).
    fn as_any(&self) -> &dyn std::any::Any;
}
