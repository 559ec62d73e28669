//! Random policy for testing and baselines.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Policy;
use crate::observation::Observation;
use crate::types::AgentId;

/// Uniformly random action selection.
///
/// Each agent independently selects a random action from `[0, action_dim)`.
/// Used for sanity checks and as a lower-bound baseline.
pub struct RandomPolicy {
    action_dim: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a new random policy seeded from OS entropy.
    ///
    /// # Arguments
    ///
    /// * `action_dim` - Number of possible actions.
    pub fn new(action_dim: usize) -> Self {
        Self {
            action_dim,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible random policy.
    pub fn with_seed(action_dim: usize, seed: u64) -> Self {
        Self {
            action_dim,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_actions(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Vec<(AgentId, usize)> {
        observations
            .keys()
            .map(|id| (*id, self.rng.gen_range(0..self.action_dim)))
            .collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}
