use std::str::FromStr;
use thiserror::Error;
use winmine_core::{CellCount, Coord, Coord2, Difficulty, GameConfig, GameError};

pub(crate) const HELP: &str = "\
commands (rows and columns start at 1):
  r ROW COL               reveal a cell
  f ROW COL               cycle flag / question mark / nothing
  c ROW COL               reveal the neighbors of a satisfied number
  n                       new game on the same level
  beginner | intermediate | expert
  custom ROWS COLS MINES  9-24 rows, 9-30 columns, 10+ mines
  marks on|off            allow question marks
  scores                  show best times
  reset-scores            forget best times
  help                    show this list
  quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Mark(Coord2),
    Chord(Coord2),
    New,
    Preset(Difficulty),
    Custom(GameConfig),
    QuestionMarks(bool),
    Scores,
    ResetScores,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
    #[error("`{command}` takes {expected} arguments, got {got}")]
    Arity {
        command: String,
        expected: usize,
        got: usize,
    },
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("rows and columns start at 1")]
    ZeroCoordinate,
    #[error("expected `on` or `off`, got `{0}`")]
    NotAToggle(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match head.as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&head, &args)?),
            "f" | "flag" | "m" | "mark" => Self::Mark(parse_coords(&head, &args)?),
            "c" | "chord" => Self::Chord(parse_coords(&head, &args)?),
            "custom" => Self::Custom(parse_custom_level(&args.join(" "))?),
            "marks" | "questions" => {
                expect_args(&head, &args, 1)?;
                Self::QuestionMarks(parse_toggle(args[0])?)
            }
            word => {
                let command =
                    plain_command(word).ok_or_else(|| CommandError::Unknown(word.to_string()))?;
                expect_args(&head, &args, 0)?;
                command
            }
        };
        Ok(command)
    }
}

/// Parses `ROWS COLS MINES`, separated by whitespace, `x` or `,`, into a validated custom board.
pub(crate) fn parse_custom_level(text: &str) -> Result<GameConfig, CommandError> {
    let parts: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == 'x' || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    let &[rows, cols, mines] = parts.as_slice() else {
        return Err(CommandError::Arity {
            command: "custom".to_string(),
            expected: 3,
            got: parts.len(),
        });
    };
    let rows: Coord = parse_number(rows)?;
    let cols: Coord = parse_number(cols)?;
    let mines: CellCount = parse_number(mines)?;
    Ok(GameConfig::custom(rows, cols, mines)?)
}

/// Commands that take no arguments.
fn plain_command(word: &str) -> Option<Command> {
    let command = match word {
        "n" | "new" => Command::New,
        "scores" => Command::Scores,
        "reset-scores" => Command::ResetScores,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return word.parse().ok().map(Command::Preset),
    };
    Some(command)
}

fn expect_args(command: &str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() != expected {
        return Err(CommandError::Arity {
            command: command.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn parse_number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::NotANumber(word.to_string()))
}

/// One-based `ROW COL` to zero-based coordinates.
fn parse_coords(command: &str, args: &[&str]) -> Result<Coord2, CommandError> {
    expect_args(command, args, 2)?;
    let row: Coord = parse_number(args[0])?;
    let col: Coord = parse_number(args[1])?;
    match (row.checked_sub(1), col.checked_sub(1)) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(CommandError::ZeroCoordinate),
    }
}

fn parse_toggle(word: &str) -> Result<bool, CommandError> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(CommandError::NotAToggle(word.to_string())),
    }
}
