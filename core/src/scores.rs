use serde::{Deserialize, Serialize};

use crate::*;

/// Stored best time meaning "no record yet".
pub const UNSET_BEST_TIME: u16 = MAX_ELAPSED_SECS;

/// Best winning time per preset difficulty. Missing entries deserialize as unset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestTimes {
    beginner: u16,
    intermediate: u16,
    expert: u16,
}

impl BestTimes {
    /// Raw stored value, `UNSET_BEST_TIME` when nothing was recorded.
    pub fn raw(&self, difficulty: Difficulty) -> u16 {
        use Difficulty::*;
        match difficulty {
            Beginner => self.beginner,
            Intermediate => self.intermediate,
            Expert => self.expert,
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> Option<u16> {
        Some(self.raw(difficulty)).filter(|&secs| secs < UNSET_BEST_TIME)
    }

    pub fn is_best(&self, difficulty: Difficulty, secs: u16) -> bool {
        secs < self.raw(difficulty)
    }

    /// Stores `secs` when it beats the current record, returning whether it did.
    pub fn record(&mut self, difficulty: Difficulty, secs: u16) -> bool {
        if !self.is_best(difficulty, secs) {
            return false;
        }
        *self.slot_mut(difficulty) = secs;
        log::info!("New best time for {}: {}s", difficulty, secs);
        true
    }

    /// Sets a previously stored time as is. Values at or above the cap mean unset.
    pub fn restore(&mut self, difficulty: Difficulty, secs: u16) {
        *self.slot_mut(difficulty) = secs.min(UNSET_BEST_TIME);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut u16 {
        use Difficulty::*;
        match difficulty {
            Beginner => &mut self.beginner,
            Intermediate => &mut self.intermediate,
            Expert => &mut self.expert,
        }
    }
}

impl Default for BestTimes {
    fn default() -> Self {
        Self {
            beginner: UNSET_BEST_TIME,
            intermediate: UNSET_BEST_TIME,
            expert: UNSET_BEST_TIME,
        }
    }
}
