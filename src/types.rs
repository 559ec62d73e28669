//! Core value types shared by every part of the engine.
//!
//! Defines agent identifiers, grid coordinates, facing directions and the
//! closed set of cell occupants.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable agent identifier, displayed as `agent-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// A `(row, col)` grid coordinate. Row 0 is the top edge; rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the position shifted by `(dr, dc)`, or `None` if either
    /// coordinate would become negative. Upper bounds are the grid's concern.
    pub fn offset(&self, (dr, dc): (i64, i64)) -> Option<Position> {
        let row = self.row as i64 + dr;
        let col = self.col as i64 + dc;
        if row < 0 || col < 0 {
            None
        } else {
            Some(Position::new(row as usize, col as usize))
        }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The direction an agent faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    /// All orientations in clockwise order starting from `Up`.
    pub fn all() -> [Orientation; 4] {
        [
            Orientation::Up,
            Orientation::Right,
            Orientation::Down,
            Orientation::Left,
        ]
    }

    /// Number of clockwise quarter turns from `Up`.
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Orientation::Up => 0,
            Orientation::Right => 1,
            Orientation::Down => 2,
            Orientation::Left => 3,
        }
    }

    /// Unit step `(d_row, d_col)` in the facing direction.
    pub fn unit(&self) -> (i64, i64) {
        match self {
            Orientation::Up => (-1, 0),
            Orientation::Right => (0, 1),
            Orientation::Down => (1, 0),
            Orientation::Left => (0, -1),
        }
    }

    /// Orientation after a 90° clockwise turn.
    pub fn clockwise(&self) -> Orientation {
        Self::all()[(self.quarter_turns() as usize + 1) % 4]
    }

    /// Orientation after a 90° counter-clockwise turn.
    pub fn counter_clockwise(&self) -> Orientation {
        Self::all()[(self.quarter_turns() as usize + 3) % 4]
    }

    /// Rotates an `Up`-relative step so that "forward" means this orientation.
    pub fn rotate(&self, (dr, dc): (i64, i64)) -> (i64, i64) {
        let mut v = (dr, dc);
        for _ in 0..self.quarter_turns() {
            // screen coordinates: a clockwise quarter turn maps (r, c) to (c, -r)
            v = (v.1, -v.0);
        }
        v
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Up => write!(f, "up"),
            Orientation::Right => write!(f, "right"),
            Orientation::Down => write!(f, "down"),
            Orientation::Left => write!(f, "left"),
        }
    }
}

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cell {
    #[default]
    Empty,
    /// Static obstacle, written once at reset.
    Wall,
    /// A collectible apple.
    Resource,
    /// Back-reference to the agent standing here.
    Agent(AgentId),
    /// Transient beam; the real contents live in the occlusion record.
    Beam,
}

impl Cell {
    pub fn is_agent(&self) -> bool {
        matches!(self, Cell::Agent(_))
    }

    /// Single-character rendering used by `GridState`'s `Display`.
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '@',
            Cell::Resource => 'A',
            Cell::Agent(_) => 'P',
            Cell::Beam => 'F',
        }
    }
}
