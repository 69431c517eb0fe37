use serde::{Deserialize, Serialize};

/// Player annotation on a hidden cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Unmarked,
    Flagged,
    Questioned,
}

/// Player-visible state of a cell. Marks only exist on hidden cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden(Mark),
    Revealed,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden(Mark::Unmarked)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    neighbor_mines: u8,
    state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    /// Adjacent mine count, only meaningful for cells without a mine.
    pub const fn neighbor_mines(&self) -> u8 {
        self.neighbor_mines
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_hidden(&self) -> bool {
        !self.is_revealed()
    }

    /// Current mark, `None` once revealed.
    pub const fn mark(&self) -> Option<Mark> {
        match self.state {
            CellState::Hidden(mark) => Some(mark),
            CellState::Revealed => None,
        }
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Hidden(Mark::Flagged))
    }

    pub const fn is_questioned(&self) -> bool {
        matches!(self.state, CellState::Hidden(Mark::Questioned))
    }

    pub(crate) fn set_mine(&mut self) {
        self.mine = true;
    }

    pub(crate) fn bump_neighbor_mines(&mut self) {
        self.neighbor_mines = self.neighbor_mines.saturating_add(1);
    }

    pub(crate) fn set_revealed(&mut self) {
        self.state = CellState::Revealed;
    }

    pub(crate) fn set_mark(&mut self, mark: Mark) {
        if self.is_hidden() {
            self.state = CellState::Hidden(mark);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_hidden_and_unmarked() {
        let cell = Cell::default();
        assert!(!cell.is_mine());
        assert!(cell.is_hidden());
        assert_eq!(cell.mark(), Some(Mark::Unmarked));
        assert_eq!(cell.neighbor_mines(), 0);
    }

    #[test]
    fn revealing_drops_the_mark() {
        let mut cell = Cell::default();
        cell.set_mark(Mark::Questioned);
        cell.set_revealed();
        assert_eq!(cell.mark(), None);
        assert!(!cell.is_questioned());
    }

    #[test]
    fn revealed_cell_ignores_marks() {
        let mut cell = Cell::default();
        cell.set_revealed();
        cell.set_mark(Mark::Flagged);
        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }
}
