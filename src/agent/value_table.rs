//! State-value table for TD(0) learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::state::StateKey;

/// Mapping from states to estimated cost-to-go.
///
/// Unseen states read as 0.0. Entries are created lazily on first write and
/// never evicted; episode resets do not clear the table, so revisited states
/// reuse their entries across episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<StateKey, f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl ValueTable {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        ValueTable {
            values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Estimated cost-to-go of a state, 0.0 if never written.
    pub fn get(&self, state: &StateKey) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: StateKey, value: f64) {
        self.values.insert(state, value);
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// TD(0) update toward the observed cost plus discounted successor value:
    ///
    /// V(s) ← V(s) + α·(c + γ·V(s′) − V(s))
    ///
    /// `V(s′)` is read with the 0.0 default. Terminal successors are never
    /// themselves updated, so their value stays 0.0 and the bootstrap term
    /// vanishes for terminal transitions without a special case.
    pub fn td_update(&mut self, old_state: &StateKey, observed_cost: f64, new_state: &StateKey) {
        let old = self.get(old_state);
        let target = observed_cost + self.discount_factor * self.get(new_state);
        let updated = old + self.learning_rate * (target - old);
        self.values.insert(old_state.clone(), updated);
    }

    /// Number of states with stored estimates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clear all estimates (for fresh training runs).
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Iterate over stored (state, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, f64)> {
        self.values.iter().map(|(state, value)| (state, *value))
    }
}
