//! The Harvest environment.
//!
//! Runs one tick as an indivisible sequence:
//! clear beams → resolve actions → commit → respawn → commit → observe.

use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::agent::{AgentRegistry, AgentState};
use crate::beam::{self, OcclusionRecord};
use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use crate::grid::GridState;
use crate::layout::MapLayout;
use crate::observation::{Observation, ObservationBuilder};
use crate::reservation::{self, Reservation, ReservationBatch};
use crate::respawn;
use crate::reward::RewardComputer;
use crate::types::{AgentId, Cell, Orientation, Position};


/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Per-agent observations after the step.
    pub observations: BTreeMap<AgentId, Observation>,
    /// Per-agent reward for the step.
    pub rewards: BTreeMap<AgentId, f64>,
    /// Per-agent done flags (horizon reached).
    pub dones: BTreeMap<AgentId, bool>,
    /// Whether the episode is done.
    pub done: bool,
    /// Current time step.
    pub time_step: u32,
    /// Apples collected this step.
    pub apples_collected: usize,
    /// Agents that fired this step.
    pub beams_fired: usize,
    /// Resources regrown this step.
    pub resources_spawned: usize,
    /// Batch entries that were rejected; the rest of the batch still ran.
    pub rejected: Vec<HarvestError>,
}

/// The multi-agent Harvest environment.
///
/// # Lifecycle
///
/// 1. Call [`HarvestEnv::new`] with configuration, layout, agent count and seed.
/// 2. Call [`HarvestEnv::reset`] to place agents and resources.
/// 3. Repeatedly call [`HarvestEnv::step`] with an ordered action batch.
/// 4. Inspect [`StepResult`] for rewards, observations and done flags.
#[derive(Debug)]
pub struct HarvestEnv {
    /// Environment configuration.
    pub config: HarvestConfig,
    grid: GridState,
    agents: AgentRegistry,
    occlusion: OcclusionRecord,
    num_agents: usize,
    /// Current time step.
    pub t: u32,
    /// Random number generator; the only source of nondeterminism.
    rng: StdRng,
    /// Seed for reproducible resets.
    seed: u64,
    /// Cumulative reward over all agents this episode.
    pub cumulative_reward: f64,
}

impl HarvestEnv {
    /// Creates a new environment.
    ///
    /// # Arguments
    ///
    /// * `config` - Observation, beam, respawn and reward configuration
    /// * `layout` - Static walls, resource spawns and agent spawns
    /// * `num_agents` - Number of agents, named `agent-0 ..`
    /// * `seed` - Random seed for reproducible episodes
    pub fn new(
        config: HarvestConfig,
        layout: MapLayout,
        num_agents: usize,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        layout.validate(num_agents)?;
        Ok(Self {
            config,
            grid: GridState::new(layout),
            agents: AgentRegistry::new(),
            occlusion: OcclusionRecord::new(),
            num_agents,
            t: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
            cumulative_reward: 0.0,
        })
    }

    /// Resets the environment for a new episode.
    ///
    /// Reseeds the RNG, places every agent on a distinct random spawn point
    /// with a random orientation, rebuilds the grid and returns the initial
    /// observations.
    pub fn reset(&mut self) -> Result<BTreeMap<AgentId, Observation>> {
        self.rng = StdRng::seed_from_u64(self.seed);
        info!(seed = self.seed, agents = self.num_agents, "Resetting environment");
        self.seed = self.seed.wrapping_add(1); // different seed each episode
        self.t = 0;
        self.cumulative_reward = 0.0;
        self.occlusion.reset();

        let mut spawns: Vec<Position> = Vec::new();
        for p in self.grid.agent_spawns() {
            if !spawns.contains(p) {
                spawns.push(*p);
            }
        }
        spawns.shuffle(&mut self.rng);

        self.agents.clear();
        for (i, position) in spawns.into_iter().take(self.num_agents).enumerate() {
            let orientation = Orientation::all()[self.rng.gen_range(0..4)];
            self.agents
                .insert(AgentState::new(AgentId(i as u32), position, orientation));
        }

        self.grid.reset(&self.agents)?;
        Ok(self.observations())
    }

    /// Executes one tick.
    ///
    /// 1. Clear last tick's beams, restoring what they hid
    /// 2. Resolve the batch in order into reservations (turns apply directly)
    /// 3. Commit moves and beams
    /// 4. Draw resource regrowth and commit it
    /// 5. Compute rewards and build observations
    ///
    /// A malformed entry (unknown agent, invalid action index, second entry
    /// for the same agent) is skipped and reported in
    /// [`StepResult::rejected`]. Errors returned from this method indicate a
    /// broken internal invariant.
    ///
    /// # Arguments
    ///
    /// * `actions` - Ordered `(agent, action index)` pairs; order breaks ties.
    pub fn step(&mut self, actions: &[(AgentId, usize)]) -> Result<StepResult> {
        for agent in self.agents.iter_mut() {
            agent.begin_tick();
        }

        // 1. Clear
        let cleared = self.occlusion.clear(&mut self.grid, &self.agents)?;

        // 2. Resolve
        let mut batch = ReservationBatch::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        let mut beams_fired = 0;
        for &(id, index) in actions {
            match self.resolve_entry(id, index, &mut seen, &mut batch) {
                Ok(fired) => beams_fired += usize::from(fired),
                Err(e) => {
                    warn!(tick = self.t, error = %e, "Rejected action");
                    rejected.push(e);
                }
            }
        }

        // 3. Commit
        let committed = reservation::commit(
            &batch,
            &mut self.grid,
            &mut self.agents,
            &mut self.occlusion,
        )?;

        // 4. Respawn
        let spawns: ReservationBatch =
            respawn::respawn(&self.grid, &self.config, &mut self.rng)
                .into_iter()
                .collect();
        let regrown = reservation::commit(
            &spawns,
            &mut self.grid,
            &mut self.agents,
            &mut self.occlusion,
        )?;

        debug!(
            tick = self.t,
            cleared,
            reservations = batch.len(),
            moved = committed.moved,
            blocked = committed.blocked,
            beam_cells = committed.beam_cells,
            apples = committed.apples_collected,
            spawned = regrown.resources_placed,
            "Tick committed"
        );

        // 5. Reward and observe
        let rewards = RewardComputer::compute_all(&self.agents, &self.config);
        self.cumulative_reward += rewards.values().sum::<f64>();

        self.t += 1;
        let done = self.t >= self.config.episode_horizon;
        let dones = self.agents.ids().map(|id| (id, done)).collect();

        Ok(StepResult {
            observations: self.observations(),
            rewards,
            dones,
            done,
            time_step: self.t,
            apples_collected: committed.apples_collected,
            beams_fired,
            resources_spawned: regrown.resources_placed,
            rejected,
        })
    }

    /// Turns one batch entry into registry updates and reservations.
    /// Returns whether the agent fired.
    fn resolve_entry(
        &mut self,
        id: AgentId,
        index: usize,
        seen: &mut HashSet<AgentId>,
        batch: &mut ReservationBatch,
    ) -> Result<bool> {
        if !self.agents.contains(id) {
            return Err(HarvestError::UnknownAgent(id));
        }
        let action = Action::from_index(id, index)?;
        if !seen.insert(id) {
            return Err(HarvestError::DuplicateAction(id));
        }
        let agent = self
            .agents
            .get_mut(id)
            .ok_or(HarvestError::UnknownAgent(id))?;

        match action {
            Action::TurnLeft => agent.turn_left(),
            Action::TurnRight => agent.turn_right(),
            Action::Fire => {
                agent.firing = true;
                let trace = beam::fire(
                    &self.grid,
                    agent.position,
                    agent.orientation,
                    self.config.beam_range,
                );
                batch.extend(trace.reservations());
                return Ok(true);
            }
            Action::MoveForward
            | Action::MoveBack
            | Action::MoveLeft
            | Action::MoveRight
            | Action::Stay => {
                if let Some((dr, dc)) = action.step_for(agent.orientation) {
                    batch.push(Reservation::agent(
                        agent.position.row as i64 + dr,
                        agent.position.col as i64 + dc,
                        id,
                    ));
                }
            }
        }
        Ok(false)
    }

    /// Observations for every agent on the current grid.
    pub fn observations(&self) -> BTreeMap<AgentId, Observation> {
        ObservationBuilder::build_all(&self.agents, &self.grid, &self.config)
    }

    /// Moves an agent to `position` with `orientation` between ticks.
    ///
    /// Intended for scenario setup; the target must be an empty cell and the
    /// agent must not be covered by a live beam.
    pub fn place_agent(
        &mut self,
        id: AgentId,
        position: Position,
        orientation: Orientation,
    ) -> Result<()> {
        let current = self.grid.get(position)?;
        let agent = self
            .agents
            .get_mut(id)
            .ok_or(HarvestError::UnknownAgent(id))?;
        if current != Cell::Empty && current != Cell::Agent(id) {
            return Err(HarvestError::InvalidLayout(format!(
                "cannot place {id} on occupied cell {position}"
            )));
        }
        let from = agent.position;
        if self.occlusion.is_active(from) {
            return Err(HarvestError::InvalidLayout(format!(
                "cannot move {id} while a beam covers {from}"
            )));
        }
        agent.position = position;
        agent.orientation = orientation;
        if from != position {
            let left_behind = if self.occlusion.take_deferred(from) {
                Cell::Resource
            } else {
                Cell::Empty
            };
            self.grid.set(from, left_behind)?;
        }
        self.grid.set(position, Cell::Agent(id))?;
        Ok(())
    }

    /// Read access to the grid.
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Read access to the agents.
    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Read access to the live beam masks.
    pub fn occlusion(&self) -> &OcclusionRecord {
        &self.occlusion
    }

    /// Returns the number of agents.
    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    /// Returns the number of resources currently visible on the grid.
    pub fn n_resources(&self) -> usize {
        self.grid.count(Cell::Resource)
    }
}
