use crate::input::{Command, CommandError, HELP};
use crate::interval::Interval;
use crate::render::render;
use crate::scores::format_table;
use crate::settings::Settings;
use crate::storage::{Storage, StorageKey};
use rand::{Rng, rngs::SmallRng};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;
use winmine_core::{
    BestTimes, Coord2, Level, MoveReport, Phase, RevealOutcome, Session, SessionOptions,
    TimerChange, TimerToken,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Everything the main loop waits on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Line(String),
    InputClosed,
    Tick(TimerToken),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct App {
    session: Session,
    settings: Settings,
    best_times: BestTimes,
    storage: Option<Storage>,
    seeds: SmallRng,
    events: Sender<Event>,
    ticker: Option<Interval>,
}

impl App {
    pub(crate) fn new(
        settings: Settings,
        best_times: BestTimes,
        storage: Option<Storage>,
        mut seeds: SmallRng,
        events: Sender<Event>,
    ) -> Self {
        let session = Session::new(
            settings.level(),
            SessionOptions {
                question_marks: settings.question_marks,
                seed: seeds.random(),
            },
        );
        Self {
            session,
            settings,
            best_times,
            storage,
            seeds,
            events,
            ticker: None,
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn render(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", render(&self.session))?;
        out.flush()
    }

    pub(crate) fn handle_event(&mut self, event: Event, out: &mut impl Write) -> io::Result<Flow> {
        match event {
            Event::Line(line) => self.handle_line(&line, out),
            Event::InputClosed => Ok(Flow::Quit),
            Event::Tick(token) => {
                self.handle_tick(token);
                Ok(Flow::Continue)
            }
        }
    }

    pub(crate) fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        match line.parse::<Command>() {
            Ok(command) => self.handle_command(command, out),
            Err(CommandError::Empty) => {
                self.render(out)?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                writeln!(out, "{}", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub(crate) fn handle_command(
        &mut self,
        command: Command,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        log::debug!("command: {:?}", command);
        match command {
            Command::Reveal(coords) => {
                let report = self.session.reveal(coords);
                self.after_move(coords, report, out)?;
            }
            Command::Chord(coords) => {
                let report = self.session.chord(coords);
                self.after_move(coords, report, out)?;
            }
            Command::Mark(coords) => {
                if !self.session.toggle_mark(coords).has_update() {
                    log::debug!("mark at {:?} ignored", coords);
                }
            }
            Command::New => self.restart(self.session.level()),
            Command::Preset(difficulty) => self.change_level(difficulty.into()),
            Command::Custom(config) => self.change_level(Level::Custom(config)),
            Command::QuestionMarks(enabled) => {
                self.settings.question_marks = enabled;
                self.session.set_question_marks(enabled);
                self.save_settings();
            }
            Command::Scores => {
                write!(out, "{}", format_table(&self.best_times))?;
                return Ok(Flow::Continue);
            }
            Command::ResetScores => {
                self.best_times.reset();
                self.save_scores();
                writeln!(out, "Best times cleared.")?;
                return Ok(Flow::Continue);
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        self.render(out)?;
        Ok(Flow::Continue)
    }

    /// Applies one tick, returning the new elapsed time when it belonged to the current game.
    pub(crate) fn handle_tick(&mut self, token: TimerToken) -> Option<u16> {
        self.session.tick(token)
    }

    fn after_move(
        &mut self,
        coords: Coord2,
        report: MoveReport,
        out: &mut impl Write,
    ) -> io::Result<()> {
        self.apply_timer(report.timer);
        match (report.outcome, report.phase) {
            (RevealOutcome::HitMine, Phase::Defeat) => {
                log::info!(
                    "game lost at {:?} after {}s",
                    coords,
                    self.session.elapsed_secs()
                );
                writeln!(out, "Boom! Type `n` for a new game.")?;
            }
            (RevealOutcome::Won, Phase::Victory) => {
                writeln!(out, "Cleared in {} seconds!", self.session.elapsed_secs())?;
                if self.session.record_best_time(&mut self.best_times) {
                    self.save_scores();
                    writeln!(out, "New best time for {}!", self.session.level())?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_timer(&mut self, change: TimerChange) {
        match change {
            TimerChange::Started(token) => {
                let events = self.events.clone();
                self.ticker = Some(Interval::new(TICK_PERIOD, move || {
                    let _ = events.send(Event::Tick(token));
                }));
            }
            TimerChange::Stopped => {
                if let Some(ticker) = self.ticker.take() {
                    ticker.cancel();
                }
            }
            TimerChange::Unchanged => {}
        }
    }

    fn change_level(&mut self, level: Level) {
        self.settings.set_level(level);
        self.save_settings();
        self.restart(level);
    }

    fn restart(&mut self, level: Level) {
        let change = self.session.restart(level, self.seeds.random());
        self.apply_timer(change);
    }

    fn save_settings(&self) {
        self.persist(&self.settings);
    }

    fn save_scores(&self) {
        self.persist(&self.best_times);
    }

    fn persist<T: StorageKey + Serialize>(&self, value: &T) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.save(value) {
            log::error!("{:#}", anyhow::Error::new(err));
        }
    }
}
