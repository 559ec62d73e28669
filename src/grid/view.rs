//! Padded rectangular views of the grid.
//!
//! A window never shrinks at the map edge: coordinates that fall outside the
//! grid come back as padding (`None`), which never compares equal to any
//! [`Cell`], so counts taken over a window see only real cells.

use super::GridState;
use crate::types::{Cell, Position};

/// A `(2 * row_half + 1) x (2 * col_half + 1)` view centered on a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    rows: usize,
    cols: usize,
    /// Row-major; `None` marks out-of-bounds padding.
    cells: Vec<Option<Cell>>,
}

/// Extracts the window around `center` with the given half extents.
pub fn window(grid: &GridState, center: Position, row_half: usize, col_half: usize) -> Window {
    let rows = 2 * row_half + 1;
    let cols = 2 * col_half + 1;
    let top = center.row as i64 - row_half as i64;
    let left = center.col as i64 - col_half as i64;

    let mut cells = Vec::with_capacity(rows * cols);
    for dr in 0..rows as i64 {
        for dc in 0..cols as i64 {
            cells.push(grid.cell_at(top + dr, left + dc));
        }
    }
    Window { rows, cols, cells }
}

impl Window {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Window-relative lookup. Padding and indices past the window are `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    /// Whether the window position maps outside the grid.
    pub fn is_padding(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col].is_none()
    }

    /// The cell at the window's center.
    pub fn center(&self) -> Option<Cell> {
        self.get(self.rows / 2, self.cols / 2)
    }

    /// Number of in-bounds cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == Some(cell)).count()
    }

    /// Iterates `(row, col, cell)` in row-major window coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Option<Cell>)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / cols, i % cols, *c))
    }

    /// Flattens the window to numeric codes for learners.
    ///
    /// padding 0, empty 1, wall 2, resource 3, agent 4, beam 5.
    pub fn features(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| match c {
                None => 0.0,
                Some(Cell::Empty) => 1.0,
                Some(Cell::Wall) => 2.0,
                Some(Cell::Resource) => 3.0,
                Some(Cell::Agent(_)) => 4.0,
                Some(Cell::Beam) => 5.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MapLayout;

    fn grid_5x5() -> GridState {
        let mut grid = GridState::new(MapLayout::new(5, 5));
        grid.set(Position::new(2, 2), Cell::Resource).unwrap();
        grid.set(Position::new(0, 0), Cell::Wall).unwrap();
        grid
    }

    #[test]
    fn window_shape_is_fixed() {
        let grid = grid_5x5();
        let w = grid.window(Position::new(2, 2), 1, 2);
        assert_eq!((w.rows(), w.cols()), (3, 5));
        assert_eq!(w.center(), Some(Cell::Resource));
    }

    #[test]
    fn corner_window_larger_than_grid_is_padded() {
        let grid = grid_5x5();
        let w = grid.window(Position::new(0, 0), 6, 7);
        assert_eq!((w.rows(), w.cols()), (13, 15));
        assert_eq!(w.iter().count(), 13 * 15);

        // grid occupies rows 6..11, cols 7..12 of the window
        for (r, c, cell) in w.iter() {
            let inside = (6..11).contains(&r) && (7..12).contains(&c);
            assert_eq!(cell.is_some(), inside, "window cell ({r}, {c})");
            assert_eq!(w.is_padding(r, c), !inside);
        }
        assert_eq!(w.center(), Some(Cell::Wall));
        assert_eq!(w.get(8, 9), Some(Cell::Resource));
    }

    #[test]
    fn padding_never_counts_as_resource() {
        let grid = grid_5x5();
        let w = grid.window(Position::new(0, 4), 3, 3);
        assert_eq!(w.count(Cell::Resource), 1);
        let padding = w.iter().filter(|(_, _, c)| c.is_none()).count();
        assert_eq!(padding, 49 - 16);
    }

    #[test]
    fn features_encode_padding_as_zero() {
        let grid = grid_5x5();
        let w = grid.window(Position::new(0, 0), 1, 1);
        let f = w.features();
        assert_eq!(f.len(), 9);
        assert_eq!(&f[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(f[4], 2.0);
        assert_eq!(f[5], 1.0);
    }
}
