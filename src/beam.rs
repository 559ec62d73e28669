//! Beam raycasting and occlusion bookkeeping.
//!
//! A beam walks up to `range` cells from the firing agent in its facing
//! direction. It stops in front of walls and the grid edge, but passes over
//! resources and agents. Beam cells hide whatever was underneath; the
//! [`OcclusionRecord`] remembers it so the next clear phase can restore it.
//! The record also holds resources that regrew under a standing agent until
//! that agent steps off.

use std::collections::{HashMap, HashSet};

use crate::agent::AgentRegistry;
use crate::error::Result;
use crate::grid::GridState;
use crate::reservation::Reservation;
use crate::types::{AgentId, Cell, Orientation, Position};

/// Result of a single [`fire`] call, computed against the pre-commit grid.
///
/// `masked_resources` and `masked_agents` describe that snapshot only. Commit
/// applies moves before beams and records what each cell hides at that point
/// in the [`OcclusionRecord`], so an agent that steps into the path this
/// tick is masked there even though the trace does not list it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeamTrace {
    /// Covered cells, nearest first.
    pub cells: Vec<Position>,
    /// Covered cells that held a resource before commit.
    pub masked_resources: Vec<Position>,
    /// Covered cells that held an agent before commit.
    pub masked_agents: Vec<(Position, AgentId)>,
}

impl BeamTrace {
    /// `Beam` reservations in walk order.
    pub fn reservations(&self) -> impl Iterator<Item = Reservation> + '_ {
        self.cells.iter().map(|p| Reservation::beam(*p))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Walks a beam from `origin` toward `direction`.
///
/// The origin cell itself is never covered.
pub fn fire(grid: &GridState, origin: Position, direction: Orientation, range: usize) -> BeamTrace {
    let (dr, dc) = direction.unit();
    let mut trace = BeamTrace::default();
    let (mut row, mut col) = (origin.row as i64, origin.col as i64);

    for _ in 0..range {
        row += dr;
        col += dc;
        let cell = match grid.cell_at(row, col) {
            None | Some(Cell::Wall) => break,
            Some(cell) => cell,
        };
        let pos = Position::new(row as usize, col as usize);
        match cell {
            Cell::Resource => trace.masked_resources.push(pos),
            Cell::Agent(id) => trace.masked_agents.push((pos, id)),
            _ => {}
        }
        trace.cells.push(pos);
    }
    trace
}

/// What a beam cell is hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Masked {
    Empty,
    Resource,
    Agent(AgentId),
}

/// Beam cells that are live on the grid and what lies under each of them.
///
/// Each active beam coordinate maps to exactly one [`Masked`] value, so a
/// cell can never be both a masked resource and a masked agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcclusionRecord {
    masked: HashMap<Position, Masked>,
    /// Active beam cells in the order they were committed.
    active: Vec<Position>,
    /// Resources waiting under an agent; they outlive beam clears.
    under_agents: HashSet<Position>,
}

impl OcclusionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new beam cell. Returns `false` if `pos` is already covered,
    /// in which case the original mask is kept.
    pub fn mask(&mut self, pos: Position, under: Masked) -> bool {
        if self.masked.contains_key(&pos) {
            return false;
        }
        self.masked.insert(pos, under);
        self.active.push(pos);
        true
    }

    pub fn masked_at(&self, pos: Position) -> Option<Masked> {
        self.masked.get(&pos).copied()
    }

    pub fn is_active(&self, pos: Position) -> bool {
        self.masked.contains_key(&pos)
    }

    /// Active beam cells in commit order.
    pub fn active(&self) -> &[Position] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn masked_resources(&self) -> impl Iterator<Item = Position> + '_ {
        self.active
            .iter()
            .copied()
            .filter(|p| self.masked.get(p) == Some(&Masked::Resource))
    }

    pub fn masked_agents(&self) -> impl Iterator<Item = (Position, AgentId)> + '_ {
        self.active.iter().filter_map(|p| match self.masked.get(p) {
            Some(Masked::Agent(id)) => Some((*p, *id)),
            _ => None,
        })
    }

    /// Hides a resource at `pos`, which must hold a beam or an agent.
    ///
    /// Over an empty beam cell the resource reappears when the beam clears.
    /// Under an agent, masked by a beam or not, it appears once the agent
    /// moves away. Returns `false` if a resource was already waiting there.
    pub fn defer_resource(&mut self, pos: Position) -> bool {
        match self.masked.get_mut(&pos) {
            Some(under @ Masked::Empty) => {
                *under = Masked::Resource;
                true
            }
            Some(Masked::Resource) => false,
            Some(Masked::Agent(_)) | None => self.under_agents.insert(pos),
        }
    }

    /// Called when an agent leaves `pos`: whether a resource was waiting
    /// under it. The entry is consumed.
    pub fn take_deferred(&mut self, pos: Position) -> bool {
        self.under_agents.remove(&pos)
    }

    /// Cells where a resource is waiting under an agent.
    pub fn deferred_under_agents(&self) -> impl Iterator<Item = Position> + '_ {
        self.under_agents.iter().copied()
    }

    /// Clear phase: restores every beam cell and forgets the beam masks.
    ///
    /// A masked resource comes back as `Resource`; otherwise the cell goes to
    /// whichever agent the registry places there, or `Empty`. Resources
    /// waiting under agents are kept. Returns the number of cells restored.
    pub fn clear(&mut self, grid: &mut GridState, agents: &AgentRegistry) -> Result<usize> {
        let restored = self.active.len();
        for pos in self.active.drain(..) {
            let cell = match self.masked.get(&pos) {
                Some(Masked::Resource) => Cell::Resource,
                _ => agents.agent_at(pos).map_or(Cell::Empty, Cell::Agent),
            };
            grid.set(pos, cell)?;
        }
        self.masked.clear();
        Ok(restored)
    }

    /// Drops every mask without touching the grid (used on reset).
    pub fn reset(&mut self) {
        self.masked.clear();
        self.active.clear();
        self.under_agents.clear();
    }
}
