use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and mine count for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const CUSTOM_ROWS: RangeInclusive<Coord> = 9..=24;
    pub const CUSTOM_COLS: RangeInclusive<Coord> = 9..=30;
    pub const CUSTOM_MIN_MINES: CellCount = 10;

    /// Cells kept free around the first reveal.
    pub const SAFE_ZONE_CELLS: CellCount = 9;

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates a player-supplied custom board against the custom-game limits.
    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if !Self::CUSTOM_ROWS.contains(&rows) {
            return Err(GameError::RowsOutOfRange(rows));
        }
        if !Self::CUSTOM_COLS.contains(&cols) {
            return Err(GameError::ColsOutOfRange(cols));
        }
        if mines < Self::CUSTOM_MIN_MINES {
            return Err(GameError::TooFewMines(mines));
        }
        let max_mines = mult(rows, cols) - Self::SAFE_ZONE_CELLS;
        if mines > max_mines {
            return Err(GameError::TooManyMines {
                requested: mines,
                max: max_mines,
            });
        }
        Ok(Self::new_unchecked((rows, cols), mines))
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Whether a 3×3 mine-free opening can always be honored.
    pub const fn fits_safe_zone(&self) -> bool {
        self.mines as u32 + Self::SAFE_ZONE_CELLS as u32 <= self.total_cells() as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

/// The standard presets. Only these are scored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Beginner => GameConfig::new_unchecked((9, 9), 10),
            Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Expert => GameConfig::new_unchecked((16, 30), 99),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Beginner => "beginner",
            Intermediate => "intermediate",
            Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownDifficulty)
    }
}

/// What the player asked for: a scored preset or a custom board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Preset(Difficulty),
    Custom(GameConfig),
}

impl Level {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Preset(difficulty) => difficulty.config(),
            Self::Custom(config) => config,
        }
    }

    /// The preset being played, `None` for custom boards even when they match a preset's size.
    pub const fn difficulty(self) -> Option<Difficulty> {
        match self {
            Self::Preset(difficulty) => Some(difficulty),
            Self::Custom(_) => None,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Preset(Difficulty::default())
    }
}

impl From<Difficulty> for Level {
    fn from(difficulty: Difficulty) -> Self {
        Self::Preset(difficulty)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(difficulty) => f.write_str(difficulty.name()),
            Self::Custom(config) => write!(
                f,
                "custom {}x{} with {} mines",
                config.rows(),
                config.cols(),
                config.mines
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_boards() {
        assert_eq!(Difficulty::Beginner.config().size(), (9, 9));
        assert_eq!(Difficulty::Beginner.config().mines, 10);
        assert_eq!(Difficulty::Intermediate.config().size(), (16, 16));
        assert_eq!(Difficulty::Intermediate.config().mines, 40);
        assert_eq!(Difficulty::Expert.config().size(), (16, 30));
        assert_eq!(Difficulty::Expert.config().mines, 99);
    }

    #[test]
    fn custom_level_is_never_a_preset() {
        let custom = Level::Custom(Difficulty::Beginner.config());
        assert_eq!(custom.difficulty(), None);
        assert_eq!(custom.config(), Difficulty::Beginner.config());
        assert_eq!(Level::from(Difficulty::Expert).difficulty(), Some(Difficulty::Expert));
    }

    #[test]
    fn custom_accepts_limits() {
        assert!(GameConfig::custom(9, 9, 10).is_ok());
        assert!(GameConfig::custom(24, 30, 24 * 30 - 9).is_ok());
        assert_eq!(GameConfig::custom(9, 9, 72).unwrap().safe_cell_count(), 9);
    }

    #[test]
    fn custom_rejects_out_of_range() {
        assert_eq!(GameConfig::custom(8, 9, 10), Err(GameError::RowsOutOfRange(8)));
        assert_eq!(GameConfig::custom(25, 9, 10), Err(GameError::RowsOutOfRange(25)));
        assert_eq!(GameConfig::custom(9, 31, 10), Err(GameError::ColsOutOfRange(31)));
        assert_eq!(GameConfig::custom(9, 9, 9), Err(GameError::TooFewMines(9)));
        assert_eq!(
            GameConfig::custom(9, 9, 73),
            Err(GameError::TooManyMines {
                requested: 73,
                max: 72
            })
        );
    }

    #[test]
    fn safe_zone_fit() {
        assert!(GameConfig::new_unchecked((3, 3), 0).fits_safe_zone());
        assert!(!GameConfig::new_unchecked((3, 3), 1).fits_safe_zone());
        assert!(Difficulty::Expert.config().fits_safe_zone());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Expert".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert_eq!("beginner".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert_eq!("custom".parse::<Difficulty>(), Err(GameError::UnknownDifficulty));
    }
}
