//! Configuration for TD agent creation.

use serde::{Deserialize, Serialize};

/// Hyperparameters for a [`TdAgent`](crate::agent::TdAgent).
///
/// The defaults reproduce the classic setup for this maze: α = 0.05,
/// γ = 1.0, constant ε = 0.05 (no decay).
///
/// # Examples
///
/// ```
/// use pacgrid::agent::TdConfig;
///
/// let config = TdConfig::default()
///     .with_epsilon(0.2)
///     .with_epsilon_decay(0.995, 0.01)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate ε
    pub epsilon: f64,
    /// Multiplicative ε decay per episode (1.0 disables decay)
    pub epsilon_decay: f64,
    /// Floor for decayed ε
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl TdConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64, floor: f64) -> Self {
        self.epsilon_decay = decay;
        self.min_epsilon = floor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate every hyperparameter at the construction boundary.
    ///
    /// Each rate must be finite and within [0, 1]; a non-numeric or
    /// out-of-range value is rejected here rather than allowed to propagate
    /// into the update arithmetic.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let checks = [
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("epsilon", self.epsilon),
            ("epsilon_decay", self.epsilon_decay),
            ("min_epsilon", self.min_epsilon),
        ];
        for (name, value) in checks {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::InvalidHyperparameter {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for TdConfig {
    fn default() -> Self {
        TdConfig {
            learning_rate: 0.05,
            discount_factor: 1.0,
            epsilon: 0.05,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            seed: None,
        }
    }
}
