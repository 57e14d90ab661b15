//! Deterministic pellet-maze grid world
//!
//! This module implements the environment half of the system: typed cells,
//! grid parsing and rendering, the shared transition/cost table, and the
//! mutable world the agent acts against.

pub mod environment;
pub mod grid;
pub mod levels;
pub mod transition;

pub use environment::{Action, EpisodeStatus, GridWorld};
pub use grid::{Cell, Grid};
pub use levels::DEFAULT_LEVEL;
pub use transition::{BUMP_COST, StepOutcome, transition};
