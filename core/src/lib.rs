#![no_std]

extern crate alloc;

use core::ops::BitOr;

pub use board::*;
pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use scores::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod config;
mod engine;
mod error;
mod generator;
mod scores;
mod session;
mod timer;
mod types;

/// Outcome of cycling the mark on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed(Mark),
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Outcome of revealing one or more cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    const fn severity(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Revealed => 1,
            Self::Won => 2,
            Self::HitMine => 3,
        }
    }
}

/// Merges the outcomes of the reveals in one chord; the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.severity() > self.severity() {
            rhs
        } else {
            self
        }
    }
}
