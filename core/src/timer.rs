use core::sync::atomic::{AtomicU32, Ordering};
use serde::{Deserialize, Serialize};

/// Highest value the elapsed-time display can show.
pub const MAX_ELAPSED_SECS: u16 = 999;

static NEXT_TOKEN: AtomicU32 = AtomicU32::new(1);

/// Identity of one armed timer. Unique for the lifetime of the process, so ticks produced for
/// a discarded game never match the timer of the game that replaced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u32);

impl TimerToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// One-second game clock driven by tick events from the controller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameTimer {
    armed: Option<TimerToken>,
    elapsed_secs: u16,
}

impl GameTimer {
    /// Arms the timer with a fresh token; ticks carrying any older token are ignored from now on.
    pub fn start(&mut self) -> TimerToken {
        let token = TimerToken::next();
        self.armed = Some(token);
        token
    }

    /// Disarms the timer, returning whether it was running.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.armed
    }

    pub fn elapsed_secs(&self) -> u16 {
        self.elapsed_secs
    }

    /// Applies one tick, returning the new elapsed time, or `None` for a stale token.
    pub fn tick(&mut self, token: TimerToken) -> Option<u16> {
        if self.armed != Some(token) {
            log::trace!("Ignoring tick for {:?}", token);
            return None;
        }
        if self.elapsed_secs < MAX_ELAPSED_SECS {
            self.elapsed_secs += 1;
        }
        Some(self.elapsed_secs)
    }
}
