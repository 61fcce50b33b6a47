use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{day_of_week, normalize_custom_day};
use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "days", rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    Weekdays,
    Weekends,
    /// Stored as 1 = Monday .. 7 = Sunday.
    Custom(Vec<u8>),
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::Daily
    }
}

impl Recurrence {
    pub fn custom(days: impl IntoIterator<Item = u8>) -> PlannerResult<Self> {
        let mut days: Vec<u8> = days.into_iter().collect();
        if let Some(bad) = days.iter().find(|day| !(1..=7).contains(*day)) {
            return Err(PlannerError::OutOfRange(format!(
                "custom day {bad} is not within 1 (Monday)..=7 (Sunday)"
            )));
        }
        days.sort_unstable();
        days.dedup();
        Ok(Self::Custom(days))
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        let weekday = day_of_week(date);
        match self {
            Self::Daily => true,
            Self::Weekdays => (1..=5).contains(&weekday),
            Self::Weekends => weekday == 0 || weekday == 6,
            Self::Custom(days) => days
                .iter()
                .filter(|day| (1..=7).contains(*day))
                .any(|day| normalize_custom_day(*day) == weekday),
        }
    }

    pub fn due_days_per_week(&self) -> u32 {
        match self {
            Self::Daily => 7,
            Self::Weekdays => 5,
            Self::Weekends => 2,
            Self::Custom(days) => {
                let mut valid: Vec<u8> = days
                    .iter()
                    .copied()
                    .filter(|day| (1..=7).contains(day))
                    .collect();
                valid.sort_unstable();
                valid.dedup();
                valid.len() as u32
            }
        }
    }

    /// Expected due days in a window of `window_days` calendar days, pro-rated
    /// by the weekly share and rounded down.
    pub fn expected_days(&self, window_days: u32) -> u32 {
        match self {
            Self::Daily => window_days,
            other => (u64::from(window_days) * u64::from(other.due_days_per_week()) / 7) as u32,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Daily => "Every day".to_string(),
            Self::Weekdays => "Weekdays".to_string(),
            Self::Weekends => "Weekends".to_string(),
            Self::Custom(days) => {
                const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
                let names: Vec<&str> = days
                    .iter()
                    .filter_map(|day| NAMES.get(usize::from(*day).checked_sub(1)?).copied())
                    .collect();
                if names.is_empty() {
                    "Never".to_string()
                } else {
                    names.join(", ")
                }
            }
        }
    }
}
