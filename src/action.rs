//! The discrete per-agent action set.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};
use crate::types::{AgentId, Orientation};

/// One agent's intent for a tick.
///
/// Moves are relative to the agent's orientation: `MoveForward` steps in the
/// facing direction, `MoveLeft` steps to the agent's left, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Stay,
    TurnLeft,
    TurnRight,
    Fire,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 8;

    /// All actions in index order.
    pub fn all() -> [Action; Self::COUNT] {
        [
            Action::MoveForward,
            Action::MoveBack,
            Action::MoveLeft,
            Action::MoveRight,
            Action::Stay,
            Action::TurnLeft,
            Action::TurnRight,
            Action::Fire,
        ]
    }

    /// Decodes a policy's action index.
    pub fn from_index(agent: AgentId, index: usize) -> Result<Action> {
        Self::all()
            .get(index)
            .copied()
            .ok_or(HarvestError::InvalidAction {
                agent,
                action: index,
            })
    }

    pub fn index(&self) -> usize {
        match self {
            Action::MoveForward => 0,
            Action::MoveBack => 1,
            Action::MoveLeft => 2,
            Action::MoveRight => 3,
            Action::Stay => 4,
            Action::TurnLeft => 5,
            Action::TurnRight => 6,
            Action::Fire => 7,
        }
    }

    /// Step for move/stay actions as if the agent faced `Up`.
    pub fn base_step(&self) -> Option<(i64, i64)> {
        match self {
            Action::MoveForward => Some((-1, 0)),
            Action::MoveBack => Some((1, 0)),
            Action::MoveLeft => Some((0, -1)),
            Action::MoveRight => Some((0, 1)),
            Action::Stay => Some((0, 0)),
            Action::TurnLeft | Action::TurnRight | Action::Fire => None,
        }
    }

    /// World-frame step for move/stay actions given the agent's orientation.
    pub fn step_for(&self, orientation: Orientation) -> Option<(i64, i64)> {
        self.base_step().map(|s| orientation.rotate(s))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::MoveForward => "move_forward",
            Action::MoveBack => "move_back",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Stay => "stay",
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
            Action::Fire => "fire",
        };
        write!(f, "{name}")
    }
}
