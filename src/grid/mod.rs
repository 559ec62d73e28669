//! Authoritative grid state.
//!
//! The grid owns the cell array and the static layout it was built from.
//! Every write after reset goes through [`GridState::set`], which the
//! environment only calls while committing a reservation batch.

pub mod view;

use std::fmt;

use crate::agent::AgentRegistry;
use crate::error::{HarvestError, Result};
use crate::layout::MapLayout;
use crate::types::{Cell, Position};

pub use view::Window;

/// Row-major 2D array of [`Cell`]s plus the static layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    layout: MapLayout,
    cells: Vec<Cell>,
}

impl GridState {
    /// Creates a grid for `layout` with every cell `Empty`.
    ///
    /// Call [`GridState::reset`] to populate it.
    pub fn new(layout: MapLayout) -> Self {
        let cells = vec![Cell::Empty; layout.height * layout.width];
        Self { layout, cells }
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn walls(&self) -> &[Position] {
        &self.layout.walls
    }

    pub fn resource_spawns(&self) -> &[Position] {
        &self.layout.resource_spawns
    }

    pub fn agent_spawns(&self) -> &[Position] {
        &self.layout.agent_spawns
    }

    /// Whether a signed coordinate lies on the grid.
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height() && (col as usize) < self.width()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height() && pos.col < self.width()
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if self.contains(pos) {
            Ok(pos.row * self.width() + pos.col)
        } else {
            Err(self.out_of_bounds(pos.row as i64, pos.col as i64))
        }
    }

    fn out_of_bounds(&self, row: i64, col: i64) -> HarvestError {
        HarvestError::OutOfBounds {
            row,
            col,
            height: self.height(),
            width: self.width(),
        }
    }

    /// Returns the cell at `pos`.
    pub fn get(&self, pos: Position) -> Result<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Signed lookup; `None` when the coordinate is off the grid.
    pub fn cell_at(&self, row: i64, col: i64) -> Option<Cell> {
        if self.in_bounds(row, col) {
            Some(self.cells[row as usize * self.width() + col as usize])
        } else {
            None
        }
    }

    /// Overwrites the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let i = self.index(pos)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Rebuilds the grid: all `Empty`, then walls, then resources, then
    /// every agent in `agents` at its registered position.
    pub fn reset(&mut self, agents: &AgentRegistry) -> Result<()> {
        self.cells.fill(Cell::Empty);
        let statics = self
            .layout
            .walls
            .iter()
            .map(|p| (*p, Cell::Wall))
            .chain(self.layout.resource_spawns.iter().map(|p| (*p, Cell::Resource)));
        for (pos, cell) in statics {
            let i = self.index(pos)?;
            self.cells[i] = cell;
        }
        for agent in agents.iter() {
            self.set(agent.position, Cell::Agent(agent.id))?;
        }
        Ok(())
    }

    /// Number of cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Iterates over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let width = self.width();
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Position::new(i / width, i % width), *c))
    }

    /// Extracts a padded window; see [`view::window`].
    pub fn window(&self, center: Position, row_half: usize, col_half: usize) -> Window {
        view::window(self, center, row_half, col_half)
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width().max(1)) {
            let line: String = row.iter().map(Cell::glyph).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use crate::types::{AgentId, Orientation};

    fn layout() -> MapLayout {
        MapLayout::new(4, 5)
            .with_border_walls()
            .with_resources([Position::new(1, 2), Position::new(2, 3)])
            .with_agent_spawns([Position::new(2, 1)])
    }

    #[test]
    fn get_out_of_bounds_fails() {
        let grid = GridState::new(layout());
        assert_eq!(
            grid.get(Position::new(4, 0)),
            Err(HarvestError::OutOfBounds {
                row: 4,
                col: 0,
                height: 4,
                width: 5
            })
        );
        assert!(grid.get(Position::new(0, 5)).is_err());
        assert!(grid.get(Position::new(3, 4)).is_ok());
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let mut grid = GridState::new(layout());
        assert!(grid.set(Position::new(9, 9), Cell::Resource).is_err());
    }

    #[test]
    fn reset_replays_walls_resources_agents() {
        let mut grid = GridState::new(layout());
        let mut agents = AgentRegistry::new();
        agents.insert(AgentState::new(
            AgentId(0),
            Position::new(2, 1),
            Orientation::Up,
        ));
        grid.reset(&agents).unwrap();

        assert_eq!(grid.count(Cell::Wall), 14);
        assert_eq!(grid.get(Position::new(1, 2)), Ok(Cell::Resource));
        assert_eq!(grid.get(Position::new(2, 3)), Ok(Cell::Resource));
        assert_eq!(grid.get(Position::new(2, 1)), Ok(Cell::Agent(AgentId(0))));
        assert_eq!(grid.get(Position::new(1, 1)), Ok(Cell::Empty));
    }

    #[test]
    fn reset_clears_previous_contents() {
        let mut grid = GridState::new(layout());
        let agents = AgentRegistry::new();
        grid.set(Position::new(1, 1), Cell::Beam).unwrap();
        grid.reset(&agents).unwrap();
        assert_eq!(grid.get(Position::new(1, 1)), Ok(Cell::Empty));
        assert_eq!(grid.count(Cell::Beam), 0);
    }

    #[test]
    fn display_renders_glyphs() {
        let mut grid = GridState::new(MapLayout::new(1, 3));
        grid.set(Position::new(0, 0), Cell::Wall).unwrap();
        grid.set(Position::new(0, 2), Cell::Resource).unwrap();
        assert_eq!(grid.to_string(), "@ A\n");
    }
}
