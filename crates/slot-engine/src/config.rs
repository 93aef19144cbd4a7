//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::grid::PeriodBounds;

pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Tunables shared by every computation in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Length of one slot in minutes.
    pub granularity_minutes: u32,
    /// Where the display periods start.
    pub periods: PeriodBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            periods: PeriodBounds::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    /// # Errors
    /// `InvalidGranularity` outside 1..=720 minutes, `InvalidConfig` when the
    /// afternoon does not start before the evening.
    pub fn validate(&self) -> Result<()> {
        if !(1..=720).contains(&self.granularity_minutes) {
            return Err(ScheduleError::InvalidGranularity(self.granularity_minutes));
        }
        if self.periods.afternoon_start > self.periods.evening_start {
            return Err(ScheduleError::InvalidConfig(format!(
                "afternoon starts at {} but evening starts at {}",
                self.periods.afternoon_start, self.periods.evening_start
            )));
        }
        Ok(())
    }
}
