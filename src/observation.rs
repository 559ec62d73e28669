//! Per-agent partial observations.
//!
//! Each agent sees a padded window of the grid centered on its own cell,
//! plus its own pose so that policies can turn world directions into
//! orientation-relative moves.

use std::collections::BTreeMap;

use crate::agent::{AgentRegistry, AgentState};
use crate::config::HarvestConfig;
use crate::grid::{GridState, Window};
use crate::types::{AgentId, Orientation, Position};

/// What one agent observes after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub agent: AgentId,
    pub position: Position,
    pub orientation: Orientation,
    /// `(2 * view_rows + 1) x (2 * view_cols + 1)` view, agent at the center.
    pub window: Window,
}

impl Observation {
    /// Flat feature vector: window codes followed by a one-hot orientation.
    pub fn features(&self) -> Vec<f64> {
        let mut features = self.window.features();
        let mut one_hot = [0.0; 4];
        one_hot[self.orientation.quarter_turns() as usize] = 1.0;
        features.extend(one_hot);
        features
    }
}

/// Builds observations for agents.
pub struct ObservationBuilder;

impl ObservationBuilder {
    /// Builds the observation for a single agent.
    pub fn build(agent: &AgentState, grid: &GridState, config: &HarvestConfig) -> Observation {
        Observation {
            agent: agent.id,
            position: agent.position,
            orientation: agent.orientation,
            window: grid.window(agent.position, config.view_rows, config.view_cols),
        }
    }

    /// Builds observations for all agents, keyed by id.
    pub fn build_all(
        agents: &AgentRegistry,
        grid: &GridState,
        config: &HarvestConfig,
    ) -> BTreeMap<AgentId, Observation> {
        agents
            .iter()
            .map(|a| (a.id, Self::build(a, grid, config)))
            .collect()
    }

    /// Length of [`Observation::features`].
    pub fn feature_dim(config: &HarvestConfig) -> usize {
        let (rows, cols) = config.observation_shape();
        rows * cols + 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MapLayout;
    use crate::types::Cell;

    fn setup() -> (AgentRegistry, GridState) {
        let mut agents = AgentRegistry::new();
        agents.insert(AgentState::new(
            AgentId(0),
            Position::new(1, 1),
            Orientation::Right,
        ));
        agents.insert(AgentState::new(
            AgentId(1),
            Position::new(3, 3),
            Orientation::Down,
        ));
        let layout = MapLayout::new(5, 5)
            .with_border_walls()
            .with_resources([Position::new(2, 2)]);
        let mut grid = GridState::new(layout);
        grid.reset(&agents).unwrap();
        (agents, grid)
    }

    #[test]
    fn observation_is_centered_on_agent() {
        let (agents, grid) = setup();
        let config = HarvestConfig::default();
        let obs = ObservationBuilder::build(agents.get(AgentId(0)).unwrap(), &grid, &config);
        assert_eq!((obs.window.rows(), obs.window.cols()), config.observation_shape());
        assert_eq!(obs.window.center(), Some(Cell::Agent(AgentId(0))));
        // (2,2) sits one row down and one column right of the agent
        assert_eq!(obs.window.get(4, 4), Some(Cell::Resource));
    }

    #[test]
    fn build_all_covers_every_agent() {
        let (agents, grid) = setup();
        let config = HarvestConfig::default();
        let all = ObservationBuilder::build_all(&agents, &grid, &config);
        assert_eq!(all.len(), 2);
        assert_eq!(all[&AgentId(1)].orientation, Orientation::Down);
    }

    #[test]
    fn feature_length_matches() {
        let (agents, grid) = setup();
        let config = HarvestConfig {
            view_rows: 2,
            view_cols: 1,
            ..HarvestConfig::default()
        };
        let obs = ObservationBuilder::build(agents.get(AgentId(1)).unwrap(), &grid, &config);
        let features = obs.features();
        assert_eq!(features.len(), ObservationBuilder::feature_dim(&config));
        assert_eq!(&features[features.len() - 4..], &[0.0, 0.0, 1.0, 0.0]);
    }
}
