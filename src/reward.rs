//! Per-agent reward for a tick.

use std::collections::BTreeMap;

use crate::agent::{AgentRegistry, AgentState};
use crate::config::HarvestConfig;
use crate::types::AgentId;

/// Computes rewards for the Harvest environment.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward earned by one agent on the tick that just ran.
    ///
    /// `apple_reward` per apple collected, minus `fire_cost` if the agent
    /// fired, minus `hit_penalty` if another agent's beam covered it.
    pub fn compute(agent: &AgentState, config: &HarvestConfig) -> f64 {
        let mut reward = config.apple_reward * agent.apples_this_tick as f64;
        if agent.firing {
            reward -= config.fire_cost;
        }
        if agent.hit_this_tick {
            reward -= config.hit_penalty;
        }
        reward
    }

    pub fn compute_all(agents: &AgentRegistry, config: &HarvestConfig) -> BTreeMap<AgentId, f64> {
        agents
            .iter()
            .map(|a| (a.id, Self::compute(a, config)))
            .collect()
    }
}
