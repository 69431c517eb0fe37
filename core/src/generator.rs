use alloc::vec::Vec;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mines chosen for a board, in placement order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub mines: Vec<Coord2>,
    /// False when the mine count left no room for a mine-free opening.
    pub safe_zone: bool,
}

pub trait MinefieldGenerator {
    /// Marks mines on `board` and returns their coordinates.
    fn generate(self, board: &mut Board, config: &GameConfig) -> Placement;
}

/// Purely random placement around a guaranteed-safe 3×3 opening.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, board: &mut Board, config: &GameConfig) -> Placement {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        place_mines(board, config, self.start, &mut rng)
    }
}

/// Places mines at predetermined coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    mines: Vec<Coord2>,
}

impl FixedMinefieldGenerator {
    pub fn new(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let (rows, cols) = size;
        let mut coords = Vec::with_capacity(mines.len());
        for &(row, col) in mines {
            if row >= rows || col >= cols {
                return Err(GameError::InvalidCoords);
            }
            if !coords.contains(&(row, col)) {
                coords.push((row, col));
            }
        }
        Ok(Self { mines: coords })
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len().try_into().unwrap_or(CellCount::MAX)
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(self, board: &mut Board, _config: &GameConfig) -> Placement {
        for &coords in &self.mines {
            board[coords].set_mine();
        }
        Placement {
            mines: self.mines,
            safe_zone: false,
        }
    }
}

/// Chooses `config.mines` mine cells, keeping the clipped 3×3 around `safe` clear whenever
/// the board has room for it.
pub fn place_mines<R: Rng + ?Sized>(
    board: &mut Board,
    config: &GameConfig,
    safe: Coord2,
    rng: &mut R,
) -> Placement {
    let safe_zone = config.fits_safe_zone();
    if !safe_zone {
        log::warn!(
            "Too many mines ({} on {} cells), cannot guarantee a safe start area",
            config.mines,
            board.total_cells()
        );
    }

    let (safe_row, safe_col) = safe;
    let in_safe_zone =
        |(row, col): Coord2| row.abs_diff(safe_row) <= 1 && col.abs_diff(safe_col) <= 1;

    let mut candidates: Vec<Coord2> = board
        .iter_cells()
        .map(|(coords, _)| coords)
        .filter(|&coords| !safe_zone || !in_safe_zone(coords))
        .collect();
    shuffle(&mut candidates, rng);
    candidates.truncate(config.mines.into());

    for &coords in &candidates {
        board[coords].set_mine();
    }

    if candidates.len() != usize::from(config.mines) {
        log::warn!(
            "Generated minefield count mismatch, actual: {}, requested: {}",
            candidates.len(),
            config.mines
        );
    }
    log::debug!(
        "Placed {} mines, safe start at {:?}: {}",
        candidates.len(),
        safe,
        safe_zone
    );

    Placement {
        mines: candidates,
        safe_zone,
    }
}

/// Fisher–Yates: walk from the back, swapping each slot with a uniform pick from the prefix.
fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Gives every non-mine cell the number of mines among its neighbors.
pub fn compute_neighbor_counts(board: &mut Board, mines: &[Coord2]) {
    for &mine in mines {
        for pos in board.iter_neighbors(mine) {
            let cell = &mut board[pos];
            if !cell.is_mine() {
                cell.bump_neighbor_mines();
            }
        }
    }
}
