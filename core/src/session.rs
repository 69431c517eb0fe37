use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Include the question mark in the mark cycle.
    pub question_marks: bool,
    /// Seed for mine placement on the first reveal.
    pub seed: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            question_marks: true,
            seed: 0,
        }
    }
}

/// What the controller has to do about its tick source after a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerChange {
    Unchanged,
    /// Start producing ticks for this token.
    Started(TimerToken),
    /// Stop producing ticks.
    Stopped,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub outcome: RevealOutcome,
    pub phase: Phase,
    pub revealed_delta: CellCount,
    pub timer: TimerChange,
}

/// One game from first click to victory or defeat, plus its clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    level: Level,
    engine: PlayEngine,
    timer: GameTimer,
}

impl Session {
    pub fn new(level: Level, options: SessionOptions) -> Self {
        log::info!("New game: {}", level);
        Self {
            level,
            engine: PlayEngine::new(level.config(), options.seed, options.question_marks),
            timer: GameTimer::default(),
        }
    }

    /// Session over an engine built elsewhere, e.g. one with a fixed mine layout.
    pub fn from_engine(level: Level, engine: PlayEngine) -> Self {
        Self {
            level,
            engine,
            timer: GameTimer::default(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The preset being played, `None` for custom games.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.level.difficulty()
    }

    pub fn config(&self) -> GameConfig {
        self.engine.config()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.engine.flags_placed()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.engine.revealed_count()
    }

    pub fn mines_remaining(&self) -> i32 {
        self.engine.mines_remaining()
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.timer.elapsed_secs()
    }

    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    pub fn question_marks(&self) -> bool {
        self.engine.question_marks()
    }

    pub fn set_question_marks(&mut self, enabled: bool) {
        self.engine.set_question_marks(enabled);
    }

    pub fn reveal(&mut self, coords: Coord2) -> MoveReport {
        self.apply_move(|engine| engine.reveal(coords))
    }

    pub fn chord(&mut self, coords: Coord2) -> MoveReport {
        self.apply_move(|engine| engine.attempt_chord(coords))
    }

    /// Marks never start the game or its clock.
    pub fn toggle_mark(&mut self, coords: Coord2) -> MarkOutcome {
        self.engine.toggle_mark(coords)
    }

    /// One second passed on the timer identified by `token`.
    pub fn tick(&mut self, token: TimerToken) -> Option<u16> {
        if !self.engine.phase().is_running() {
            return None;
        }
        self.timer.tick(token)
    }

    /// Same level, fresh board.
    pub fn reset(&mut self, seed: u64) -> TimerChange {
        self.restart(self.level, seed)
    }

    /// Discards the current game and starts an idle one on `level`.
    pub fn restart(&mut self, level: Level, seed: u64) -> TimerChange {
        let question_marks = self.engine.question_marks();
        let stopped = self.timer.cancel();
        *self = Self::new(
            level,
            SessionOptions {
                question_marks,
                seed,
            },
        );
        if stopped {
            TimerChange::Stopped
        } else {
            TimerChange::Unchanged
        }
    }

    /// Stores the winning time when this is a won preset game that beats the record.
    pub fn record_best_time(&self, best: &mut BestTimes) -> bool {
        match (self.phase(), self.difficulty()) {
            (Phase::Victory, Some(difficulty)) => best.record(difficulty, self.elapsed_secs()),
            _ => false,
        }
    }

    fn apply_move(&mut self, f: impl FnOnce(&mut PlayEngine) -> RevealOutcome) -> MoveReport {
        let phase_before = self.engine.phase();
        let revealed_before = self.engine.revealed_count();

        let outcome = f(&mut self.engine);

        let phase = self.engine.phase();
        let timer = self.sync_timer(phase_before, phase);
        MoveReport {
            outcome,
            phase,
            revealed_delta: self.engine.revealed_count() - revealed_before,
            timer,
        }
    }

    fn sync_timer(&mut self, before: Phase, after: Phase) -> TimerChange {
        use Phase::*;
        match (before, after) {
            (Idle, Running) => TimerChange::Started(self.timer.start()),
            (_, Victory | Defeat) if self.timer.cancel() => TimerChange::Stopped,
            _ => TimerChange::Unchanged,
        }
    }
}
