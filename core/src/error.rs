use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Rows must be between 9 and 24, got {0}")]
    RowsOutOfRange(Coord),
    #[error("Columns must be between 9 and 30, got {0}")]
    ColsOutOfRange(Coord),
    #[error("At least 10 mines are required, got {0}")]
    TooFewMines(CellCount),
    #[error("Too many mines: {requested} requested, at most {max} fit")]
    TooManyMines { requested: CellCount, max: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
