use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::layout::{DayBounds, DEFAULT_MIN_INTERVAL_DISPLAY_MINUTES, PIXELS_PER_HOUR};
use crate::time::ClockTime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineSettings {
    pub wake_time: ClockTime,
    pub sleep_time: ClockTime,
    pub pixels_per_hour: f64,
    pub min_interval_display_minutes: u32,
    pub show_completed_tasks: bool,
    pub notifications_enabled: bool,
    pub notification_advance_minutes: u32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            wake_time: ClockTime::from_minutes_wrapping(6 * 60),
            sleep_time: ClockTime::from_minutes_wrapping(23 * 60),
            pixels_per_hour: PIXELS_PER_HOUR,
            min_interval_display_minutes: DEFAULT_MIN_INTERVAL_DISPLAY_MINUTES,
            show_completed_tasks: true,
            notifications_enabled: false,
            notification_advance_minutes: 10,
        }
    }
}

impl TimelineSettings {
    pub fn bounds(&self) -> DayBounds {
        DayBounds::new(self.wake_time, self.sleep_time)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if !self.pixels_per_hour.is_finite() || self.pixels_per_hour <= 0.0 {
            return Err(PlannerError::OutOfRange(format!(
                "pixels per hour must be positive, got {}",
                self.pixels_per_hour
            )));
        }
        Ok(())
    }
}
