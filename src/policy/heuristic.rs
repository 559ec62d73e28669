//! Greedy harvesting policy.
//!
//! Walks each agent toward the nearest apple in its window. With no apple in
//! sight it wanders forward and turns right at obstacles. It never fires.

use std::collections::BTreeMap;

use super::trait_::Policy;
use crate::action::Action;
use crate::observation::Observation;
use crate::types::{AgentId, Cell};

/// Greedy nearest-apple policy.
///
/// Targets are ranked by Manhattan distance from the window center, ties
/// broken in row-major order. The agent steps along the axis with the larger
/// gap first, falling back to the other axis when that step is blocked.
///
/// Serves as a simple baseline that should outscore the random policy.
#[derive(Debug, Default)]
pub struct GreedyHarvestPolicy;

impl GreedyHarvestPolicy {
    /// Creates a new greedy policy.
    pub fn new() -> Self {
        Self
    }

    /// Picks the action for a single observation.
    pub fn choose(obs: &Observation) -> Action {
        let window = &obs.window;
        let (cr, cc) = ((window.rows() / 2) as i64, (window.cols() / 2) as i64);

        let passable = |(dr, dc): (i64, i64)| {
            let (r, c) = (cr + dr, cc + dc);
            r >= 0
                && c >= 0
                && matches!(
                    window.get(r as usize, c as usize),
                    Some(Cell::Empty | Cell::Resource)
                )
        };

        let target = window
            .iter()
            .filter(|(_, _, cell)| *cell == Some(Cell::Resource))
            .map(|(r, c, _)| (r as i64 - cr, c as i64 - cc))
            .min_by_key(|(dr, dc)| (dr.abs() + dc.abs(), *dr, *dc));

        if let Some((dr, dc)) = target {
            let vertical = (dr.signum(), 0);
            let horizontal = (0, dc.signum());
            let steps = if dr.abs() >= dc.abs() {
                [vertical, horizontal]
            } else {
                [horizontal, vertical]
            };
            for step in steps {
                if step == (0, 0) || !passable(step) {
                    continue;
                }
                if let Some(action) = Self::move_for(obs, step) {
                    return action;
                }
            }
        }

        if passable(obs.orientation.unit()) {
            Action::MoveForward
        } else {
            Action::TurnRight
        }
    }

    /// The orientation-relative move producing the world step `step`.
    fn move_for(obs: &Observation, step: (i64, i64)) -> Option<Action> {
        [
            Action::MoveForward,
            Action::MoveBack,
            Action::MoveLeft,
            Action::MoveRight,
        ]
        .into_iter()
        .find(|a| a.step_for(obs.orientation) == Some(step))
    }
}

impl Policy for GreedyHarvestPolicy {
    fn select_actions(
        &mut self,
        observations: &BTreeMap<AgentId, Observation>,
    ) -> Vec<(AgentId, usize)> {
        observations
            .iter()
            .map(|(id, obs)| (*id, Self::choose(obs).index()))
            .collect()
    }

    fn name(&self) -> &str {
        "greedy_harvest"
    }
}
