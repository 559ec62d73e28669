//! Agent state and the registry that owns it.

use std::collections::BTreeMap;

use crate::types::{AgentId, Orientation, Position};

/// State of a single agent.
///
/// The grid only carries a `Cell::Agent(id)` back-reference; position and
/// orientation here are authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Unique identifier for this agent.
    pub id: AgentId,
    /// Current cell.
    pub position: Position,
    /// Facing direction; "forward" moves and beams follow it.
    pub orientation: Orientation,
    /// Set when the agent fires; cleared at the start of the next tick.
    pub firing: bool,
    /// Apples collected during the current tick.
    pub apples_this_tick: u32,
    /// Apples collected since the last reset.
    pub apples_collected: u32,
    /// Whether another agent's beam covered this agent this tick.
    pub hit_this_tick: bool,
}

impl AgentState {
    /// Creates a new agent.
    pub fn new(id: AgentId, position: Position, orientation: Orientation) -> Self {
        Self {
            id,
            position,
            orientation,
            firing: false,
            apples_this_tick: 0,
            apples_collected: 0,
            hit_this_tick: false,
        }
    }

    /// Clears the per-tick flags and counters.
    pub fn begin_tick(&mut self) {
        self.firing = false;
        self.apples_this_tick = 0;
        self.hit_this_tick = false;
    }

    pub fn turn_left(&mut self) {
        self.orientation = self.orientation.counter_clockwise();
    }

    pub fn turn_right(&mut self) {
        self.orientation = self.orientation.clockwise();
    }

    /// Records an apple picked up on the current tick.
    pub fn collect_apple(&mut self) {
        self.apples_this_tick += 1;
        self.apples_collected += 1;
    }
}

/// Every agent in the environment, keyed and ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, AgentState>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an agent.
    pub fn insert(&mut self, agent: AgentState) {
        self.agents.insert(agent.id, agent);
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentState> {
        self.agents.values_mut()
    }

    /// The agent currently registered at `pos`, if any.
    pub fn agent_at(&self, pos: Position) -> Option<AgentId> {
        self.agents
            .values()
            .find(|a| a.position == pos)
            .map(|a| a.id)
    }
}
