//! Hit / miss / shot counters and the overlay text built from them

use serde::{Deserialize, Serialize};

/// Running score of one exercise session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub hit_clays: u32,
    pub missed_clays: u32,
    pub shots: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_shot(&mut self) {
        self.shots += 1;
    }

    pub fn record_hit(&mut self) {
        self.hit_clays += 1;
    }

    pub fn record_miss(&mut self) {
        self.missed_clays += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Three-line overlay: broken, missed, shots
    pub fn status_text(&self) -> String {
        format!(
            "Broken Clays: {}\nMissed Clays: {}\nShots: {}",
            self.hit_clays, self.missed_clays, self.shots
        )
    }
}
