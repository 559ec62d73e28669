//! Static map layout: grid size plus wall, resource-spawn and agent-spawn
//! coordinates. Fixed once the environment is built.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapLayout {
    pub height: usize,
    pub width: usize,
    pub walls: Vec<Position>,
    pub resource_spawns: Vec<Position>,
    pub agent_spawns: Vec<Position>,
}

impl MapLayout {
    /// Creates an empty layout of the given size.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            walls: Vec::new(),
            resource_spawns: Vec::new(),
            agent_spawns: Vec::new(),
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Position>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn with_resources(mut self, spawns: impl IntoIterator<Item = Position>) -> Self {
        self.resource_spawns.extend(spawns);
        self
    }

    pub fn with_agent_spawns(mut self, spawns: impl IntoIterator<Item = Position>) -> Self {
        self.agent_spawns.extend(spawns);
        self
    }

    /// Adds a wall on every cell of the outer ring.
    pub fn with_border_walls(mut self) -> Self {
        if self.height == 0 || self.width == 0 {
            return self;
        }
        let (h, w) = (self.height, self.width);
        let mut ring = Vec::new();
        for col in 0..w {
            ring.push(Position::new(0, col));
            if h > 1 {
                ring.push(Position::new(h - 1, col));
            }
        }
        for row in 1..h.saturating_sub(1) {
            ring.push(Position::new(row, 0));
            if w > 1 {
                ring.push(Position::new(row, w - 1));
            }
        }
        self.walls.extend(ring);
        self
    }

    fn contains(&self, pos: &Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Checks bounds, disjointness of the static sets and spawn capacity.
    pub fn validate(&self, num_agents: usize) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(HarvestError::InvalidLayout(format!(
                "grid must be non-empty, got {}x{}",
                self.height, self.width
            )));
        }

        let groups = [
            ("wall", &self.walls),
            ("resource spawn", &self.resource_spawns),
            ("agent spawn", &self.agent_spawns),
        ];
        let mut seen: HashSet<Position> = HashSet::new();
        for (kind, points) in groups {
            let mut own: HashSet<Position> = HashSet::new();
            for p in points {
                if !self.contains(p) {
                    return Err(HarvestError::InvalidLayout(format!(
                        "{kind} {p} lies outside the {}x{} grid",
                        self.height, self.width
                    )));
                }
                // duplicates inside a group are harmless; across groups they are not
                if own.insert(*p) && !seen.insert(*p) {
                    return Err(HarvestError::InvalidLayout(format!(
                        "{kind} {p} overlaps another static element"
                    )));
                }
            }
        }

        let distinct_spawns: HashSet<_> = self.agent_spawns.iter().collect();
        if distinct_spawns.len() < num_agents {
            return Err(HarvestError::InvalidLayout(format!(
                "{num_agents} agents need at least as many spawn points, found {}",
                distinct_spawns.len()
            )));
        }
        Ok(())
    }
}
