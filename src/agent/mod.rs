//! Tabular TD(0) learning agent
//!
//! The agent chooses moves by one-step lookahead over simulated successor
//! states, scores them by cost plus discounted cost-to-go, and updates its
//! state-value table after every real transition:
//!
//! V(s) ← V(s) + α·(c + γ·V(s′) − V(s))
//!
//! Costs are minimized, not maximized: the score of a candidate move is its
//! immediate cost plus the discounted value of the successor, and the agent
//! picks the minimum. The cost table in [`crate::gridworld::transition`] is
//! calibrated to this sign convention.

pub mod config;
pub mod serialization;
pub mod state;
pub mod td_agent;
pub mod value_table;

// Public re-exports
pub use config::TdConfig;
pub use serialization::{SavedAgent, TrainingMetadata};
pub use state::StateKey;
pub use td_agent::{Candidate, TdAgent};
pub use value_table::ValueTable;
