use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{calculate_duration, ClockTime};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Alarm,
    Habit,
    TimeBlock,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Habit => "habit",
            Self::TimeBlock => "time block",
        }
    }
}

/// A single dated instance on the timeline. Recurring templates are expanded
/// into one `Task` per date before they reach the layout engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub kind: TaskKind,
    pub time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(default)]
    pub is_completed: bool,
    pub date: NaiveDate,
}

impl Task {
    pub fn new(id: impl Into<String>, kind: TaskKind, time: ClockTime, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            kind,
            time,
            duration_minutes: None,
            end_time: None,
            is_completed: false,
            date,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_end_time(mut self, end: ClockTime) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    pub fn duration(&self) -> u32 {
        self.duration_minutes.unwrap_or(0)
    }

    pub fn is_span(&self) -> bool {
        self.duration() > 0
    }

    /// Length of the occupied interval. An explicit end time wins over the
    /// declared duration; an end earlier than the start runs past midnight.
    pub fn span_minutes(&self) -> u32 {
        match self.end_time {
            Some(end) => calculate_duration(self.time, end),
            None => self.duration(),
        }
    }

    pub fn start_minutes(&self) -> u32 {
        self.time.minutes()
    }

    /// End offset in minutes since midnight of `date`, not wrapped; values
    /// past 1440 belong to the next day.
    pub fn end_minutes(&self) -> u32 {
        self.start_minutes() + self.span_minutes()
    }

    pub fn toggle_completion(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

pub fn tasks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|task| task.date == date)
        .cloned()
        .collect();
    sort_by_time(&mut selected);
    selected
}

pub fn sort_by_time(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.time);
}

pub fn visible_tasks(tasks: Vec<Task>, show_completed: bool) -> Vec<Task> {
    if show_completed {
        return tasks;
    }
    tasks.into_iter().filter(|task| !task.is_completed).collect()
}
