use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rows × cols grid of cells, fixed in size for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            cells: Array2::default(config.size().to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    /// The cell at `coords`, or `None` when the coordinates fall outside the board.
    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        self.cells.get_mut(coords.to_nd_index())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// All cells in row-major order together with their coordinates.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells.indexed_iter().map(|((row, col), cell)| {
            // dimensions are built from `Coord` so these always fit
            ((row as Coord, col as Coord), cell)
        })
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn count_neighbors(&self, coords: Coord2, mut pred: impl FnMut(&Cell) -> bool) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| pred(&self[pos]))
            .count();
        // at most 8 neighbors
        count as u8
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
