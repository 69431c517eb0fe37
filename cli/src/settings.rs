use crate::storage::{Format, Location, StorageKey};
use serde::{Deserialize, Serialize};
use winmine_core::{CellCount, Coord, Difficulty, GameConfig, Level};

/// Board dimensions of the last custom game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CustomBoard {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub question_marks: bool,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomBoard>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_marks: true,
            difficulty: Difficulty::default(),
            custom: None,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "settings.toml";
    const FORMAT: Format = Format::Toml;
    const LOCATION: Location = Location::Config;
}

impl Settings {
    /// Level to start with. A stored custom board that no longer validates falls back to the preset.
    pub(crate) fn level(&self) -> Level {
        let Some(board) = self.custom else {
            return self.difficulty.into();
        };
        match GameConfig::custom(board.rows, board.cols, board.mines) {
            Ok(config) => Level::Custom(config),
            Err(err) => {
                log::warn!("ignoring stored custom board: {}", err);
                self.difficulty.into()
            }
        }
    }

    pub(crate) fn set_level(&mut self, level: Level) {
        match level {
            Level::Preset(difficulty) => {
                self.difficulty = difficulty;
                self.custom = None;
            }
            Level::Custom(config) => {
                self.custom = Some(CustomBoard {
                    rows: config.rows(),
                    cols: config.cols(),
                    mines: config.mines,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn default_is_beginner_with_question_marks() {
        let settings = Settings::default();
        assert!(settings.question_marks);
        assert_eq!(settings.level(), Level::Preset(Difficulty::Beginner));
    }

    #[test]
    fn custom_level_round_trips_through_settings() {
        let config = GameConfig::custom(20, 25, 100).unwrap();
        let mut settings = Settings::default();

        settings.set_level(Level::Custom(config));
        assert_eq!(settings.level(), Level::Custom(config));

        settings.set_level(Difficulty::Expert.into());
        assert_eq!(settings.custom, None);
        assert_eq!(settings.level(), Level::Preset(Difficulty::Expert));
    }

    #[test]
    fn invalid_custom_board_falls_back_to_preset() {
        let settings = Settings {
            difficulty: Difficulty::Intermediate,
            custom: Some(CustomBoard {
                rows: 5,
                cols: 30,
                mines: 10,
            }),
            ..Settings::default()
        };
        assert_eq!(settings.level(), Level::Preset(Difficulty::Intermediate));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let settings: Settings = toml::from_str("difficulty = \"expert\"").unwrap();
        assert!(settings.question_marks);
        assert_eq!(settings.difficulty, Difficulty::Expert);
        assert_eq!(settings.custom, None);
    }

    #[test]
    fn writes_readable_toml() {
        let mut settings = Settings {
            question_marks: false,
            ..Settings::default()
        };
        settings.set_level(Level::Custom(GameConfig::custom(10, 12, 20).unwrap()));

        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("question_marks = false"));
        assert!(text.contains("difficulty = \"beginner\""));
        assert!(text.contains("[custom]"));
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
    }
}
