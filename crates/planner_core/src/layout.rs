//! Timeline geometry: maps a day's tasks and its wake/sleep bounds onto
//! vertical pixel offsets, gap records, hour-ruler labels and overlap pairs.
//!
//! Every function here is pure. "Now" is always an argument.

use serde::{Deserialize, Serialize};

use crate::settings::TimelineSettings;
use crate::task::{sort_by_time, Task};
use crate::time::{calculate_duration, format_duration, ClockTime, MINUTES_PER_DAY};

pub const PIXELS_PER_HOUR: f64 = 120.0;
pub const CIRCLE_NODE_SIZE: f64 = 64.0;
pub const MIN_BLOCK_HEIGHT: f64 = 64.0;
pub const LONG_INTERVAL_MINUTES: u32 = 60;
pub const DEFAULT_MIN_INTERVAL_DISPLAY_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    Point,
    Span,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub task_id: String,
    pub y: f64,
    pub height: f64,
    pub visual_kind: VisualKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Short,
    Long,
}

impl IntervalKind {
    pub fn for_gap(minutes: u32) -> Self {
        if minutes >= LONG_INTERVAL_MINUTES {
            Self::Long
        } else {
            Self::Short
        }
    }

    pub fn message(self, minutes: u32) -> String {
        match self {
            Self::Short => format!("{} break. Reflect on the respite.", format_duration(minutes)),
            Self::Long => format!("{} free. What's next?", format_duration(minutes)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntervalInfo {
    pub after_task_id: String,
    pub duration_minutes: u32,
    pub kind: IntervalKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourLabel {
    pub time: ClockTime,
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayBounds {
    pub wake_time: ClockTime,
    pub sleep_time: ClockTime,
}

impl DayBounds {
    pub fn new(wake_time: ClockTime, sleep_time: ClockTime) -> Self {
        Self {
            wake_time,
            sleep_time,
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.sleep_time < self.wake_time
    }

    pub fn span_minutes(&self) -> u32 {
        calculate_duration(self.wake_time, self.sleep_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayLayout {
    pub nodes: Vec<NodePosition>,
    pub intervals: Vec<IntervalInfo>,
    pub hour_labels: Vec<HourLabel>,
    pub height: f64,
}

fn minutes_to_pixels(minutes: f64, pixels_per_hour: f64) -> f64 {
    minutes / 60.0 * pixels_per_hour
}

fn signed_offset(time: ClockTime, wake: ClockTime) -> f64 {
    f64::from(time.minutes()) - f64::from(wake.minutes())
}

/// One node per task, in input order. Tasks before the wake time pin to the
/// top of the timeline; tasks sharing a start time share a `y`.
pub fn calculate_node_positions(
    tasks: &[Task],
    wake_time: ClockTime,
    pixels_per_hour: f64,
) -> Vec<NodePosition> {
    tasks
        .iter()
        .map(|task| {
            let y = minutes_to_pixels(signed_offset(task.time, wake_time), pixels_per_hour).max(0.0);
            let (height, visual_kind) = if task.is_span() {
                let block = minutes_to_pixels(f64::from(task.duration()), pixels_per_hour);
                (block.max(MIN_BLOCK_HEIGHT), VisualKind::Span)
            } else {
                (CIRCLE_NODE_SIZE, VisualKind::Point)
            };
            NodePosition {
                task_id: task.id.clone(),
                y,
                height,
                visual_kind,
            }
        })
        .collect()
}

/// Gaps between consecutive tasks of a list already sorted by start time.
///
/// The current task ends at its explicit end time when present, otherwise at
/// start plus duration. A next task earlier on the clock than the current one
/// is taken to be after midnight. When the current task runs into the next one
/// no gap is emitted and the pair shows up in [`find_overlapping_tasks`]
/// instead. A plain wrap-around duration from end to next start would report
/// a near-full-day gap there; dropping it is a product decision still awaiting
/// sign-off.
pub fn calculate_intervals(tasks: &[Task]) -> Vec<IntervalInfo> {
    tasks
        .windows(2)
        .filter_map(|pair| {
            let (current, next) = (&pair[0], &pair[1]);
            let current_end = current.end_minutes();
            let mut next_start = next.start_minutes();
            if next_start < current.start_minutes() {
                next_start += MINUTES_PER_DAY;
            }
            if next_start <= current_end {
                return None;
            }
            let gap = next_start - current_end;
            let kind = IntervalKind::for_gap(gap);
            Some(IntervalInfo {
                after_task_id: current.id.clone(),
                duration_minutes: gap,
                kind,
                message: kind.message(gap),
            })
        })
        .collect()
}

pub fn visible_intervals(intervals: &[IntervalInfo], min_minutes: u32) -> Vec<IntervalInfo> {
    intervals
        .iter()
        .filter(|interval| interval.duration_minutes > min_minutes)
        .cloned()
        .collect()
}

pub fn calculate_hour_labels(bounds: &DayBounds, pixels_per_hour: f64) -> Vec<HourLabel> {
    let wake = bounds.wake_time.minutes();
    let end = wake + bounds.span_minutes();
    let first = wake.div_ceil(60) * 60;

    (first..=end)
        .step_by(60)
        .map(|minutes| {
            let time = ClockTime::from_minutes_wrapping(i64::from(minutes));
            HourLabel {
                time,
                label: time.to_twelve_hour(),
                y: minutes_to_pixels(f64::from(minutes - wake), pixels_per_hour),
            }
        })
        .collect()
}

pub fn calculate_timeline_height(bounds: &DayBounds, pixels_per_hour: f64) -> f64 {
    minutes_to_pixels(f64::from(bounds.span_minutes()), pixels_per_hour)
}

/// The earliest incomplete task starting strictly after `now`. Ties resolve to
/// the task that comes first in `tasks`.
pub fn find_next_task(tasks: &[Task], now: ClockTime) -> Option<&Task> {
    tasks
        .iter()
        .filter(|task| task.time > now && !task.is_completed)
        .min_by_key(|task| task.time)
}

pub fn calculate_current_time_position(
    now: ClockTime,
    wake_time: ClockTime,
    pixels_per_hour: f64,
) -> f64 {
    minutes_to_pixels(signed_offset(now, wake_time), pixels_per_hour)
}

pub fn get_scroll_to_time(
    target: ClockTime,
    wake_time: ClockTime,
    container_height: f64,
    pixels_per_hour: f64,
) -> f64 {
    let y = calculate_current_time_position(target, wake_time, pixels_per_hour);
    (y - container_height / 2.0).max(0.0)
}

/// Half-open `[start, end)` intersection. A zero-width task is a point: it
/// overlaps a span that contains its instant, and never another point.
/// The end is the explicit end time when one is set, not start plus duration,
/// so a task whose two ends disagree is judged the same way as in
/// [`calculate_intervals`].
pub fn tasks_overlap(a: &Task, b: &Task) -> bool {
    let (a_start, a_end) = (a.start_minutes(), a.end_minutes());
    let (b_start, b_end) = (b.start_minutes(), b.end_minutes());
    match (a_end > a_start, b_end > b_start) {
        (false, false) => false,
        (true, true) => a_start < b_end && b_start < a_end,
        (false, true) => b_start <= a_start && a_start < b_end,
        (true, false) => a_start <= b_start && b_start < a_end,
    }
}

pub fn find_overlapping_tasks(tasks: &[Task]) -> Vec<(&Task, &Task)> {
    let mut overlaps = Vec::new();
    for (i, first) in tasks.iter().enumerate() {
        for second in &tasks[i + 1..] {
            if tasks_overlap(first, second) {
                overlaps.push((first, second));
            }
        }
    }
    overlaps
}

pub fn layout_day(tasks: &[Task], settings: &TimelineSettings) -> DayLayout {
    let mut ordered = tasks.to_vec();
    sort_by_time(&mut ordered);
    let bounds = settings.bounds();
    DayLayout {
        nodes: calculate_node_positions(&ordered, bounds.wake_time, settings.pixels_per_hour),
        intervals: calculate_intervals(&ordered),
        hour_labels: calculate_hour_labels(&bounds, settings.pixels_per_hour),
        height: calculate_timeline_height(&bounds, settings.pixels_per_hour),
    }
}
