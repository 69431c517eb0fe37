use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Idle -> Running (first reveal)
/// - Idle -> Victory (first reveal clears the whole board)
/// - Running -> Victory
/// - Running -> Defeat
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Board allocated, no mines placed yet
    #[default]
    Idle,
    Running,
    Victory,
    Defeat,
}

impl Phase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum Layout {
    /// Mines get placed around the first revealed cell.
    Pending { seed: u64 },
    Placed { safe_zone: bool },
}

/// Board plus the counters and phase of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    config: GameConfig,
    board: Board,
    layout: Layout,
    revealed_count: CellCount,
    flags_placed: CellCount,
    phase: Phase,
    question_marks: bool,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    /// Fresh game; mines are placed from `seed` on the first reveal.
    pub fn new(config: GameConfig, seed: u64, question_marks: bool) -> Self {
        Self {
            config,
            board: Board::new(&config),
            layout: Layout::Pending { seed },
            revealed_count: 0,
            flags_placed: 0,
            phase: Phase::Idle,
            question_marks,
            triggered_mine: None,
        }
    }

    /// Game on a predetermined layout, still waiting for its first reveal.
    pub fn with_mines(size: Coord2, mines: &[Coord2], question_marks: bool) -> Result<Self> {
        let generator = FixedMinefieldGenerator::new(size, mines)?;
        let config = GameConfig::new_unchecked(size, generator.mine_count());
        let mut board = Board::new(&config);
        let placement = generator.generate(&mut board, &config);
        compute_neighbor_counts(&mut board, &placement.mines);

        Ok(Self {
            config,
            board,
            layout: Layout::Placed {
                safe_zone: placement.safe_zone,
            },
            revealed_count: 0,
            flags_placed: 0,
            phase: Phase::Idle,
            question_marks,
            triggered_mine: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.board.get(coords)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    /// Mine counter for display; goes negative when over-flagged.
    pub fn mines_remaining(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flags_placed)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn question_marks(&self) -> bool {
        self.question_marks
    }

    pub fn set_question_marks(&mut self, enabled: bool) {
        self.question_marks = enabled;
    }

    /// Whether the first reveal was guaranteed a mine-free 3×3 opening, `None` before placement.
    pub fn safe_opening(&self) -> Option<bool> {
        match self.layout {
            Layout::Pending { .. } => None,
            Layout::Placed { safe_zone } => Some(safe_zone),
        }
    }

    pub fn check_win_condition(&self) -> bool {
        self.revealed_count == self.config.safe_cell_count()
    }

    /// Reveal a hidden cell, flood-filling through cells with no adjacent mines.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if self.phase.is_finished() {
            return RevealOutcome::NoChange;
        }

        match self.board.get(coords) {
            Some(cell) if cell.is_hidden() && !cell.is_flagged() => {}
            _ => return RevealOutcome::NoChange,
        }

        if self.phase.is_idle() {
            self.start(coords);
        }

        self.flood_reveal(coords)
    }

    /// Reveal every unflagged hidden neighbor of a numbered cell whose flag count is satisfied.
    pub fn attempt_chord(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if !self.phase.is_running() {
            return NoChange;
        }

        let count = match self.board.get(coords) {
            Some(cell) if cell.is_revealed() && cell.neighbor_mines() > 0 => cell.neighbor_mines(),
            _ => return NoChange,
        };

        if self.board.count_neighbors(coords, Cell::is_flagged) != count {
            log::trace!("Chord at {:?} skipped, flags do not match {}", coords, count);
            return NoChange;
        }

        let targets: SmallVec<[Coord2; 8]> = self
            .board
            .iter_neighbors(coords)
            .filter(|&pos| {
                let cell = &self.board[pos];
                cell.is_hidden() && !cell.is_flagged()
            })
            .collect();

        let mut outcome = NoChange;
        for pos in targets {
            if self.phase.is_finished() {
                break;
            }
            outcome = outcome | self.flood_reveal(pos);
        }
        outcome
    }

    /// Cycle unmarked -> flagged -> questioned (when enabled) -> unmarked on a hidden cell.
    pub fn toggle_mark(&mut self, coords: Coord2) -> MarkOutcome {
        use Mark::*;

        if self.phase.is_finished() {
            return MarkOutcome::NoChange;
        }

        let question_marks = self.question_marks;
        let Some(cell) = self.board.get_mut(coords) else {
            return MarkOutcome::NoChange;
        };
        let Some(mark) = cell.mark() else {
            return MarkOutcome::NoChange;
        };

        let next = match mark {
            Unmarked => Flagged,
            Flagged if question_marks => Questioned,
            Flagged => Unmarked,
            Questioned => Unmarked,
        };
        cell.set_mark(next);

        match (mark, next) {
            (_, Flagged) => self.flags_placed = self.flags_placed.saturating_add(1),
            (Flagged, _) => self.flags_placed = self.flags_placed.saturating_sub(1),
            _ => {}
        }
        log::debug!("Mark at {:?}: {:?} -> {:?}", coords, mark, next);

        MarkOutcome::Changed(next)
    }

    fn start(&mut self, safe: Coord2) {
        if let Layout::Pending { seed } = self.layout {
            let placement =
                RandomMinefieldGenerator::new(seed, safe).generate(&mut self.board, &self.config);
            compute_neighbor_counts(&mut self.board, &placement.mines);
            self.layout = Layout::Placed {
                safe_zone: placement.safe_zone,
            };
        }
        self.phase = Phase::Running;
        log::debug!("Game started at {:?}", safe);
    }

    fn flood_reveal(&mut self, start: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        let mut outcome = NoChange;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let Some(cell) = self.board.get_mut(coords) else {
                continue;
            };
            // revealed doubles as the visited set
            if cell.is_revealed() || cell.is_flagged() {
                continue;
            }

            cell.set_revealed();
            let is_mine = cell.is_mine();
            let count = cell.neighbor_mines();
            self.revealed_count = self.revealed_count.saturating_add(1);

            if is_mine {
                log::debug!("Hit mine at {:?}", coords);
                self.triggered_mine = Some(coords);
                self.phase = Phase::Defeat;
                return HitMine;
            }

            log::trace!("Open cell at {:?}, mine count: {}", coords, count);
            if self.check_win_condition() {
                log::debug!("All safe cells revealed");
                self.phase = Phase::Victory;
                return Won;
            }
            outcome = Revealed;

            if count == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(coords)
                        .filter(|&pos| self.board[pos].is_hidden()),
                );
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn engine(size: Coord2, mines: &[Coord2]) -> PlayEngine {
        PlayEngine::with_mines(size, mines, true).unwrap()
    }

    fn distinct_revealed(engine: &PlayEngine) -> CellCount {
        engine.board().revealed_cells()
    }

    #[test]
    fn first_reveal_opens_a_safe_area() {
        let mut engine = PlayEngine::new(Difficulty::Beginner.config(), 1234, true);

        let outcome = engine.reveal((4, 4));

        assert!(matches!(outcome, RevealOutcome::Revealed | RevealOutcome::Won));
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.safe_opening(), Some(true));
        let board = engine.board();
        assert!(board[(4, 4)].is_revealed());
        assert!(!board[(4, 4)].is_mine());
        assert!(board.iter_neighbors((4, 4)).all(|pos| !board[pos].is_mine()));
        assert_eq!(board[(4, 4)].neighbor_mines(), 0);
    }

    #[test]
    fn mines_are_placed_once() {
        let mut engine = PlayEngine::new(Difficulty::Beginner.config(), 9, true);
        engine.reveal((0, 0));
        let mines: Vec<_> = engine
            .board()
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(mines.len(), 10);

        let hidden = engine
            .board()
            .iter_cells()
            .find(|(_, cell)| cell.is_hidden() && !cell.is_mine())
            .map(|(coords, _)| coords);
        if let Some(coords) = hidden {
            engine.reveal(coords);
        }
        let after: Vec<_> = engine
            .board()
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(mines, after);
    }

    #[test]
    fn reveal_hits_mine_and_sets_triggered_cell() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        let outcome = engine.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.phase(), Phase::Defeat);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn reveal_flood_fill_stops_at_numbers() {
        let mut engine = engine((4, 4), &[(3, 3), (0, 3)]);

        let outcome = engine.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::Revealed);
        let board = engine.board();
        assert_eq!(board[(0, 0)].neighbor_mines(), 0);
        assert!(board[(1, 1)].is_revealed());
        assert_eq!(board[(0, 2)].neighbor_mines(), 1);
        assert!(board[(0, 2)].is_revealed());
        assert!(board[(2, 3)].is_hidden());
        assert!(board[(3, 3)].is_hidden());
        assert_eq!(engine.revealed_count(), distinct_revealed(&engine));
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut engine = engine((3, 3), &[(2, 0), (2, 2)]);
        engine.reveal((0, 1));
        let revealed = engine.revealed_count();
        assert_eq!(revealed, 6);
        assert_eq!(engine.phase(), Phase::Running);

        assert_eq!(engine.reveal((0, 1)), RevealOutcome::NoChange);
        assert_eq!(engine.revealed_count(), revealed);
    }

    #[test]
    fn reveal_ignores_flags_and_out_of_bounds() {
        let mut engine = engine((3, 3), &[(2, 2)]);
        engine.toggle_mark((0, 0));

        assert_eq!(engine.reveal((0, 0)), RevealOutcome::NoChange);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.reveal((3, 0)), RevealOutcome::NoChange);
        assert_eq!(engine.reveal((0, 200)), RevealOutcome::NoChange);
        assert_eq!(engine.revealed_count(), 0);
    }

    #[test]
    fn flood_fill_skips_flags_but_opens_question_marks() {
        let mut engine = engine((1, 5), &[(0, 4)]);
        engine.toggle_mark((0, 1));
        engine.toggle_mark((0, 2));
        engine.toggle_mark((0, 2));
        assert!(engine.board()[(0, 2)].is_questioned());
        engine.toggle_mark((0, 1));
        engine.toggle_mark((0, 1));
        engine.toggle_mark((0, 3));
        assert!(engine.board()[(0, 3)].is_flagged());

        engine.reveal((0, 0));

        let board = engine.board();
        assert!(board[(0, 1)].is_revealed());
        assert!(board[(0, 2)].is_revealed());
        assert!(board[(0, 3)].is_flagged());
        assert_eq!(engine.revealed_count(), 3);
    }

    #[test]
    fn winning_board_transitions_to_victory_once() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)), RevealOutcome::Won);
        assert_eq!(engine.phase(), Phase::Victory);
        assert!(engine.is_finished());
        assert_eq!(engine.reveal((0, 0)), RevealOutcome::NoChange);
        assert_eq!(engine.phase(), Phase::Victory);
    }

    #[test]
    fn beginner_board_is_won_at_the_last_safe_cell() {
        let mines = [
            (0, 0),
            (0, 8),
            (8, 0),
            (8, 8),
            (2, 4),
            (4, 2),
            (4, 6),
            (6, 4),
            (1, 6),
            (7, 1),
        ];
        let mut engine = engine((9, 9), &mines);
        let safe: Vec<Coord2> = engine
            .board()
            .iter_cells()
            .filter(|(_, cell)| !cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        assert_eq!(safe.len(), 71);

        let mut victories = 0;
        for coords in safe {
            let before = engine.revealed_count();
            let outcome = engine.reveal(coords);
            assert_eq!(engine.revealed_count(), distinct_revealed(&engine));
            if outcome == RevealOutcome::Won {
                victories += 1;
                assert_eq!(engine.revealed_count(), 71);
                assert!(before < 71);
            } else if victories == 0 {
                assert_ne!(engine.phase(), Phase::Victory);
            }
        }

        assert_eq!(victories, 1);
        assert_eq!(engine.phase(), Phase::Victory);
    }

    #[test]
    fn chord_reveals_neighbors_when_flags_match() {
        let mines = &[(1, 0), (1, 2)];
        let mut engine = engine((3, 3), mines);

        engine.reveal((1, 1));
        engine.toggle_mark((1, 0));
        engine.toggle_mark((1, 2));

        let outcome = engine.attempt_chord((1, 1));

        assert_eq!(outcome, RevealOutcome::Won);
        let board = engine.board();
        assert!(board[(0, 1)].is_revealed());
        assert!(board[(2, 1)].is_revealed());
        assert!(board[(1, 0)].is_flagged());
    }

    #[test]
    fn chord_with_mismatched_flags_is_a_no_op() {
        let mines = &[(0, 0), (0, 2)];
        let mut engine = engine((3, 3), mines);
        engine.reveal((1, 1));
        assert_eq!(engine.board()[(1, 1)].neighbor_mines(), 2);
        engine.toggle_mark((0, 0));
        let before = engine.board().clone();

        assert_eq!(engine.attempt_chord((1, 1)), RevealOutcome::NoChange);
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn chord_on_wrong_flag_hits_mine_and_stops() {
        let mines = &[(0, 0)];
        let mut engine = engine((3, 3), mines);
        engine.reveal((1, 1));
        engine.toggle_mark((0, 1));

        let outcome = engine.attempt_chord((1, 1));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.phase(), Phase::Defeat);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert_eq!(engine.revealed_count(), distinct_revealed(&engine));
        // (0, 0) comes first in row-major order; the later targets stay hidden
        assert_eq!(engine.revealed_count(), 2);
        for pos in [(0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(engine.board()[pos].is_hidden(), "{:?} was revealed", pos);
        }
        assert!(engine.board()[(0, 1)].is_flagged());
    }

    #[test]
    fn chord_that_wins_leaves_unflagged_mines_hidden() {
        let mut engine = engine((1, 5), &[(0, 0), (0, 4)]);
        engine.reveal((0, 1));
        assert_eq!(engine.phase(), Phase::Running);
        engine.toggle_mark((0, 0));

        let outcome = engine.attempt_chord((0, 1));

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.phase(), Phase::Victory);
        assert_eq!(engine.revealed_count(), 3);
        assert!(engine.board()[(0, 4)].is_hidden());
        assert!(engine.board()[(0, 0)].is_flagged());
        assert_eq!(engine.triggered_mine(), None);

        assert_eq!(engine.attempt_chord((0, 3)), RevealOutcome::NoChange);
        assert_eq!(engine.phase(), Phase::Victory);
        assert!(engine.board()[(0, 4)].is_hidden());
    }

    #[test]
    fn chord_ignores_unnumbered_and_hidden_cells() {
        let mut engine = engine((3, 4), &[(0, 3), (2, 3)]);
        engine.reveal((2, 0));
        assert_eq!(engine.board()[(2, 0)].neighbor_mines(), 0);
        assert_eq!(engine.phase(), Phase::Running);

        assert_eq!(engine.attempt_chord((2, 0)), RevealOutcome::NoChange);
        assert_eq!(engine.attempt_chord((0, 3)), RevealOutcome::NoChange);
        assert_eq!(engine.attempt_chord((9, 9)), RevealOutcome::NoChange);
    }

    #[test]
    fn chord_is_inert_before_the_first_reveal() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        assert_eq!(engine.attempt_chord((1, 1)), RevealOutcome::NoChange);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn toggle_mark_cycles_through_question() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::Changed(Mark::Flagged));
        assert_eq!(engine.flags_placed(), 1);
        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::Changed(Mark::Questioned));
        assert_eq!(engine.flags_placed(), 0);
        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::Changed(Mark::Unmarked));
        assert_eq!(engine.flags_placed(), 0);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn toggle_mark_skips_question_when_disabled() {
        let mut engine = PlayEngine::with_mines((3, 3), &[(0, 0)], false).unwrap();

        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::Changed(Mark::Flagged));
        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::Changed(Mark::Unmarked));
        assert_eq!(engine.flags_placed(), 0);
    }

    #[test]
    fn toggle_mark_leaves_revealed_cells_alone() {
        let mut engine = engine((3, 3), &[(0, 0), (0, 2)]);
        engine.reveal((2, 2));
        assert_eq!(engine.phase(), Phase::Running);

        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::NoChange);
        assert_eq!(engine.toggle_mark((5, 5)), MarkOutcome::NoChange);
        assert_eq!(engine.flags_placed(), 0);
    }

    #[test]
    fn mines_remaining_can_go_negative() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_mark((0, 1));
        engine.toggle_mark((0, 2));
        assert_eq!(engine.mines_remaining(), -1);
    }

    #[test]
    fn nothing_moves_after_defeat() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((0, 0));
        assert_eq!(engine.phase(), Phase::Defeat);

        assert_eq!(engine.reveal((2, 2)), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_mark((2, 2)), MarkOutcome::NoChange);
        assert_eq!(engine.attempt_chord((0, 1)), RevealOutcome::NoChange);
    }

    #[test]
    fn crowded_board_reports_missing_safe_opening() {
        let config = GameConfig::new_unchecked((3, 3), 2);
        let mut engine = PlayEngine::new(config, 5, true);
        engine.reveal((1, 1));
        assert_eq!(engine.safe_opening(), Some(false));
        let mines = engine
            .board()
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .count();
        assert_eq!(mines, 2);
    }

    #[test]
    fn large_open_board_floods_without_recursion() {
        let mut engine = engine((200, 200), &[(199, 199)]);
        assert_eq!(engine.reveal((0, 0)), RevealOutcome::Won);
        assert_eq!(engine.revealed_count(), 200 * 200 - 1);
    }
}
