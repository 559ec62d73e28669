//! Pending grid writes and the commit that applies them.
//!
//! Action resolution never touches the grid. It appends [`Reservation`]s to
//! a [`ReservationBatch`], and [`commit`] applies the whole batch at the end
//! of the phase, so no agent's resolution can observe another's move.
//!
//! Commit order is: agent moves, then beams, then resources.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::agent::AgentRegistry;
use crate::beam::{Masked, OcclusionRecord};
use crate::error::Result;
use crate::grid::GridState;
use crate::types::{AgentId, Cell, Position};

/// An intended write of `cell` at `(row, col)`.
///
/// Coordinates are signed because move targets are not bounds-checked until
/// commit. The owner of an agent reservation is carried by `Cell::Agent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub row: i64,
    pub col: i64,
    pub cell: Cell,
}

impl Reservation {
    pub fn new(row: i64, col: i64, cell: Cell) -> Self {
        Self { row, col, cell }
    }

    /// Agent `owner` wants to end the tick at `(row, col)`.
    pub fn agent(row: i64, col: i64, owner: AgentId) -> Self {
        Self::new(row, col, Cell::Agent(owner))
    }

    pub fn beam(pos: Position) -> Self {
        Self::new(pos.row as i64, pos.col as i64, Cell::Beam)
    }

    pub fn resource(pos: Position) -> Self {
        Self::new(pos.row as i64, pos.col as i64, Cell::Resource)
    }

    /// The target as an unsigned position, if it is not negative.
    pub fn position(&self) -> Option<Position> {
        Position::new(0, 0).offset((self.row, self.col))
    }

    pub fn owner(&self) -> Option<AgentId> {
        match self.cell {
            Cell::Agent(id) => Some(id),
            _ => None,
        }
    }
}

/// Reservations for one commit, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationBatch {
    slots: Vec<Reservation>,
}

impl ReservationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reservation: Reservation) {
        self.slots.push(reservation);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.slots.iter()
    }
}

impl Extend<Reservation> for ReservationBatch {
    fn extend<I: IntoIterator<Item = Reservation>>(&mut self, iter: I) {
        self.slots.extend(iter);
    }
}

impl FromIterator<Reservation> for ReservationBatch {
    fn from_iter<I: IntoIterator<Item = Reservation>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Counts of what a commit actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Agents that changed cell.
    pub moved: usize,
    /// Move requests that did not go through (wall, edge, contested cell).
    pub blocked: usize,
    /// Apples picked up by arriving agents.
    pub apples_collected: usize,
    /// New beam cells written.
    pub beam_cells: usize,
    /// Agents covered by a beam.
    pub agents_hit: usize,
    /// Resources written to the grid or deferred under a beam or an agent.
    pub resources_placed: usize,
}

/// A move reservation after lookup of its agent's current cell.
struct Claim {
    agent: AgentId,
    from: Position,
    /// `None` when the target is off the grid or a wall.
    to: Option<Position>,
}

/// Applies `batch` to the grid, the agent registry and the occlusion record.
pub fn commit(
    batch: &ReservationBatch,
    grid: &mut GridState,
    agents: &mut AgentRegistry,
    occlusion: &mut OcclusionRecord,
) -> Result<CommitSummary> {
    let mut summary = CommitSummary::default();

    let mut claims = Vec::new();
    for r in batch.iter() {
        let Some(owner) = r.owner() else { continue };
        let Some(agent) = agents.get(owner) else {
            debug!(agent = %owner, "Dropping move reservation for unregistered agent");
            continue;
        };
        let to = r
            .position()
            .filter(|p| matches!(grid.get(*p), Ok(c) if c != Cell::Wall));
        claims.push(Claim {
            agent: owner,
            from: agent.position,
            to,
        });
    }
    apply_moves(&claims, grid, agents, occlusion, &mut summary)?;

    for r in batch.iter().filter(|r| r.cell == Cell::Beam) {
        let Some(pos) = r.position().filter(|p| grid.contains(*p)) else {
            continue;
        };
        let under = match grid.get(pos)? {
            Cell::Wall | Cell::Beam => continue,
            Cell::Empty => Masked::Empty,
            Cell::Resource => Masked::Resource,
            Cell::Agent(id) => Masked::Agent(id),
        };
        occlusion.mask(pos, under);
        grid.set(pos, Cell::Beam)?;
        summary.beam_cells += 1;
        if let Masked::Agent(id) = under {
            if let Some(agent) = agents.get_mut(id) {
                agent.hit_this_tick = true;
                summary.agents_hit += 1;
            }
        }
    }

    for r in batch.iter().filter(|r| r.cell == Cell::Resource) {
        let Some(pos) = r.position().filter(|p| grid.contains(*p)) else {
            continue;
        };
        let placed = match grid.get(pos)? {
            Cell::Empty => {
                grid.set(pos, Cell::Resource)?;
                true
            }
            Cell::Beam | Cell::Agent(_) => occlusion.defer_resource(pos),
            Cell::Resource | Cell::Wall => false,
        };
        if placed {
            summary.resources_placed += 1;
        }
    }

    Ok(summary)
}

/// Resolves move claims in batch order and writes the winners.
///
/// A claim succeeds when its target is free: not claimed earlier this tick
/// and not occupied by an agent that stays. A claim on a cell whose occupant
/// has not been decided yet waits and is retried; claims still waiting once
/// nothing changes (swaps, cycles) stay put. A claim behind an earlier
/// waiting claim on the same cell waits too, so batch order decides.
///
/// A vacated cell becomes `Empty`, or `Resource` if one regrew under the
/// agent that left.
fn apply_moves(
    claims: &[Claim],
    grid: &mut GridState,
    agents: &mut AgentRegistry,
    occlusion: &mut OcclusionRecord,
    summary: &mut CommitSummary,
) -> Result<()> {
    let occupant: HashMap<Position, AgentId> = agents.iter().map(|a| (a.position, a.id)).collect();
    let claimants: HashSet<AgentId> = claims.iter().map(|c| c.agent).collect();

    // agents without a move claim hold their cell
    let mut held: HashSet<Position> = agents
        .iter()
        .filter(|a| !claimants.contains(&a.id))
        .map(|a| a.position)
        .collect();
    let mut claimed: HashSet<Position> = HashSet::new();
    let mut leaving: HashSet<AgentId> = HashSet::new();
    let mut decided: Vec<Option<bool>> = vec![None; claims.len()];

    loop {
        let mut progress = false;
        let mut waiting: HashSet<Position> = HashSet::new();
        for (i, claim) in claims.iter().enumerate() {
            if decided[i].is_some() {
                continue;
            }
            let verdict = match claim.to {
                None => Some(false),
                Some(to) if to == claim.from => Some(false),
                Some(to) if claimed.contains(&to) || held.contains(&to) => Some(false),
                Some(to) if waiting.contains(&to) => None,
                Some(to) => match occupant.get(&to) {
                    Some(other) if !leaving.contains(other) => None,
                    _ => Some(true),
                },
            };
            match verdict {
                Some(true) => {
                    if let Some(to) = claim.to {
                        claimed.insert(to);
                    }
                    leaving.insert(claim.agent);
                }
                Some(false) => {
                    held.insert(claim.from);
                }
                None => {
                    if let Some(to) = claim.to {
                        waiting.insert(to);
                    }
                    continue;
                }
            }
            decided[i] = verdict;
            progress = true;
        }
        if !progress {
            break;
        }
    }

    let mut moves = Vec::new();
    for (claim, verdict) in claims.iter().zip(&decided) {
        match (verdict, claim.to) {
            (Some(true), Some(to)) => moves.push((claim.agent, claim.from, to)),
            _ if claim.to != Some(claim.from) => summary.blocked += 1,
            _ => {}
        }
    }

    // vacate every source first so chained moves are not erased
    for (_, from, _) in &moves {
        let left_behind = if occlusion.take_deferred(*from) {
            Cell::Resource
        } else {
            Cell::Empty
        };
        grid.set(*from, left_behind)?;
    }
    for (id, from, to) in &moves {
        let collected = grid.get(*to)? == Cell::Resource;
        grid.set(*to, Cell::Agent(*id))?;
        if let Some(agent) = agents.get_mut(*id) {
            agent.position = *to;
            if collected {
                agent.collect_apple();
                summary.apples_collected += 1;
            }
        }
        trace!(agent = %id, %from, %to, collected, "Agent moved");
        summary.moved += 1;
    }
    Ok(())
}
