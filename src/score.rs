//! Scoring, levels and gravity speed

use std::time::Duration;

/// Points per simultaneous line clear, indexed by line count
pub const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];
/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;
/// Drop interval at level 1
pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
/// Fastest the gravity ever gets
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);
const INTERVAL_STEP_MS: u64 = 100;

/// Session score tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u64,
    /// Starts at 1
    pub level: u32,
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Credit a line clear and return the points awarded.
    ///
    /// The award uses the level in effect before the clear; the level is
    /// recomputed afterwards.
    pub fn add_clear(&mut self, lines: usize) -> u64 {
        let base = SCORE_TABLE.get(lines).copied().unwrap_or(0);
        let award = base * self.level as u64;

        self.points += award;
        self.lines += lines as u32;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        award
    }

    /// Time between forced downward moves at the current level
    pub fn drop_interval(&self) -> Duration {
        drop_interval_for(self.level)
    }
}

/// `max(100, 1000 - (level - 1) * 100)` milliseconds
pub fn drop_interval_for(level: u32) -> Duration {
    let reduction = INTERVAL_STEP_MS.saturating_mul(level.saturating_sub(1) as u64);
    let interval = Duration::from_millis(
        (INITIAL_DROP_INTERVAL.as_millis() as u64).saturating_sub(reduction),
    );
    interval.max(MIN_DROP_INTERVAL)
}
