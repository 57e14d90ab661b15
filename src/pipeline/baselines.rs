//! Baseline controllers and evaluation wrappers

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    gridworld::{Action, GridWorld},
    ports::{Controller, Transition},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Uniform random baseline: picks one of the four moves with equal
/// probability, never learns.
pub struct RandomController {
    name: String,
    rng: StdRng,
}

impl RandomController {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: build_rng(None),
        }
    }
}

impl Controller for RandomController {
    fn select_action(&mut self, _world: &GridWorld) -> Result<Action> {
        Ok(*Action::ALL.choose(&mut self.rng).unwrap())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Wrapper that delegates action selection but suppresses learning.
///
/// Used for post-training evaluation: the wrapped controller's policy is
/// exercised as-is, with no value updates and no exploration decay.
pub struct FrozenController<'a> {
    inner: &'a mut dyn Controller,
}

impl<'a> FrozenController<'a> {
    pub fn new(inner: &'a mut dyn Controller) -> Self {
        Self { inner }
    }
}

impl Controller for FrozenController<'_> {
    fn select_action(&mut self, world: &GridWorld) -> Result<Action> {
        self.inner.select_action(world)
    }

    fn observe(&mut self, _transition: &Transition) -> Result<()> {
        // NO-OP - learning is frozen during evaluation
        Ok(())
    }

    fn end_episode(&mut self) -> Result<()> {
        // NO-OP - exploration decay is frozen too
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.inner.set_rng_seed(seed)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self.inner.as_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{StateKey, TdAgent, TdConfig};

    #[test]
    fn test_frozen_controller_suppresses_updates() {
        let world = GridWorld::from_level(".P E").unwrap();
        let mut agent = TdAgent::new(TdConfig::default().with_seed(3)).unwrap();

        let state = StateKey::capture(world.player_pos(), world.grid());
        let transition = Transition {
            old_state: state.clone(),
            action: Action::Left,
            cost: -1,
            new_state: state,
            terminal: false,
        };

        let mut frozen = FrozenController::new(&mut agent);
        frozen.observe(&transition).unwrap();
        frozen.end_episode().unwrap();

        assert!(agent.values().is_empty());
    }

    #[test]
    fn test_random_controller_is_seedable() {
        let world = GridWorld::from_level("P ").unwrap();

        let mut a = RandomController::new("a".to_string());
        let mut b = RandomController::new("b".to_string());
        a.set_rng_seed(9).unwrap();
        b.set_rng_seed(9).unwrap();

        for _ in 0..20 {
            assert_eq!(
                a.select_action(&world).unwrap(),
                b.select_action(&world).unwrap()
            );
        }
    }
}
