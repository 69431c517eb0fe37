use crate::storage::{Format, Location, StorageKey};
use serde_json::{Map, Value};
use winmine_core::{BestTimes, Difficulty};

impl StorageKey for BestTimes {
    const KEY: &'static str = "highscores.json";
    const FORMAT: Format = Format::Json;
    const LOCATION: Location = Location::Data;

    /// Keeps every preset entry that is still a valid time; the rest stay unset.
    fn salvage(text: &str) -> Option<Self> {
        let entries: Map<String, Value> = serde_json::from_str(text).ok()?;
        let mut best = BestTimes::default();
        for difficulty in Difficulty::ALL {
            let secs = entries
                .get(difficulty.name())
                .and_then(Value::as_u64)
                .and_then(|secs| u16::try_from(secs).ok());
            match secs {
                Some(secs) => best.restore(difficulty, secs),
                None => log::debug!("no usable best time for {}", difficulty),
            }
        }
        Some(best)
    }
}

/// Best time for display, `---` when nothing was recorded.
pub(crate) fn format_best_time(best: &BestTimes, difficulty: Difficulty) -> String {
    match best.get(difficulty) {
        Some(secs) => format!("{} seconds", secs),
        None => "---".to_string(),
    }
}

pub(crate) fn format_table(best: &BestTimes) -> String {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            format!(
                "{:<14}{}\n",
                format!("{}:", difficulty),
                format_best_time(best, difficulty)
            )
        })
        .collect()
}
