use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use planner_core::{
    calendar::{format_date_display, parse_date},
    habit::HabitKind,
    layout::VisualKind,
    settings::TimelineSettings,
    task::Task,
    time::{format_duration, format_time_range, format_time_until, time_until},
    ClockTime, DaySnapshot, PlannerService,
};
use tracing::{info, warn};

use crate::data::PlannerData;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub(crate) data_path: Option<PathBuf>,
    pub(crate) wake_time: Option<ClockTime>,
    pub(crate) sleep_time: Option<ClockTime>,
    pub(crate) pixels_per_hour: Option<f64>,
    pub(crate) min_interval_minutes: Option<u32>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) now: Option<ClockTime>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Builds the config from any key lookup. Values that fail to parse are
    /// logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("PLANNER_DATA") {
            let path = path.trim();
            if !path.is_empty() {
                config.data_path = Some(PathBuf::from(path));
            }
        }
        config.wake_time = parse_var(&lookup, "PLANNER_WAKE_TIME", |raw| raw.parse().ok());
        config.sleep_time = parse_var(&lookup, "PLANNER_SLEEP_TIME", |raw| raw.parse().ok());
        config.pixels_per_hour = parse_var(&lookup, "PLANNER_PIXELS_PER_HOUR", |raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value > 0.0)
        });
        config.min_interval_minutes =
            parse_var(&lookup, "PLANNER_MIN_INTERVAL_MINUTES", |raw| raw.parse().ok());
        config.date = parse_var(&lookup, "PLANNER_DATE", |raw| parse_date(raw).ok());
        config.now = parse_var(&lookup, "PLANNER_NOW", |raw| raw.parse().ok());
        config
    }

    /// Layers the environment overrides over the saved settings.
    pub fn apply_to(&self, mut settings: TimelineSettings) -> TimelineSettings {
        if let Some(wake) = self.wake_time {
            settings.wake_time = wake;
        }
        if let Some(sleep) = self.sleep_time {
            settings.sleep_time = sleep;
        }
        if let Some(pph) = self.pixels_per_hour {
            settings.pixels_per_hour = pph;
        }
        if let Some(min) = self.min_interval_minutes {
            settings.min_interval_display_minutes = min;
        }
        settings
    }

    /// Pinned `PLANNER_DATE`/`PLANNER_NOW` win over the wall clock.
    pub fn today_and_now(&self, clock: NaiveDateTime) -> (NaiveDate, ClockTime) {
        (
            self.date.unwrap_or_else(|| clock.date()),
            self.now.unwrap_or_else(|| ClockTime::from(clock.time())),
        )
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        warn!(key, value = %raw, "ignoring invalid environment value");
    }
    value
}

pub fn build_service(config: &AppConfig, data: PlannerData) -> Result<PlannerService> {
    let settings = config.apply_to(data.settings.unwrap_or_default());
    PlannerService::builder()
        .with_settings(settings)
        .add_tasks(data.tasks)
        .add_habits(data.habits)
        .build()
        .context("failed to initialize planner service")
}

/// Plain-text rendering of one day's timeline and habit checklist.
pub fn render_day(snapshot: &DaySnapshot, settings: &TimelineSettings, now: ClockTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_date_display(snapshot.date));
    let _ = writeln!(
        out,
        "Awake {}",
        format_time_range(settings.wake_time, settings.sleep_time)
    );
    let _ = writeln!(out);

    for node in &snapshot.layout.nodes {
        let Some(task) = snapshot.tasks.iter().find(|task| task.id == node.task_id) else {
            continue;
        };
        let mark = if task.is_completed { "x" } else { " " };
        let _ = writeln!(
            out,
            "{:>7.1}  [{mark}] {}",
            node.y,
            describe_task(task, node.visual_kind)
        );
        if let Some(gap) = snapshot
            .visible_intervals
            .iter()
            .find(|interval| interval.after_task_id == task.id)
        {
            let _ = writeln!(out, "         ... {}", gap.message);
        }
    }
    if snapshot.layout.nodes.is_empty() {
        let _ = writeln!(out, "Nothing scheduled.");
    }

    if let Some(next) = &snapshot.next_task {
        let (hours, minutes) = time_until(next.time, now);
        let _ = writeln!(
            out,
            "\nNext: {} at {} (in {})",
            task_title(next),
            next.time.to_twelve_hour(),
            format_time_until(hours, minutes)
        );
    }

    for pair in &snapshot.overlaps {
        let _ = writeln!(out, "Overlap: {} / {}", pair.first_id, pair.second_id);
    }

    if !snapshot.habits.is_empty() {
        let _ = writeln!(out, "\nHabits");
        for entry in snapshot.habits.iter().filter(|entry| entry.due) {
            let mark = if entry.completed { "x" } else { " " };
            let streak_label = match entry.kind {
                HabitKind::Building => "streak",
                HabitKind::Breaking => "clean",
            };
            let _ = writeln!(
                out,
                "  [{mark}] {}  {streak_label} {} (best {}), {:.0}%",
                entry.title, entry.current_streak, entry.longest_streak, entry.completion_rate
            );
        }
    }
    out
}

fn task_title(task: &Task) -> &str {
    if task.title.is_empty() {
        &task.id
    } else {
        &task.title
    }
}

fn describe_task(task: &Task, visual_kind: VisualKind) -> String {
    match visual_kind {
        VisualKind::Point => format!("{} {}", task.time.to_twelve_hour(), task_title(task)),
        VisualKind::Span => {
            let end = ClockTime::from_minutes_wrapping(i64::from(task.end_minutes()));
            format!(
                "{} {} ({})",
                format_time_range(task.time, end),
                task_title(task),
                format_duration(task.span_minutes())
            )
        }
    }
}

pub fn run(config: AppConfig, today: NaiveDate, now: ClockTime) -> Result<()> {
    let data = match &config.data_path {
        Some(path) => PlannerData::load(path)?,
        None => {
            info!("no PLANNER_DATA set, starting with an empty planner");
            PlannerData::default()
        }
    };
    let service = build_service(&config, data)?;
    service.refresh_habits(today);

    info!(%today, %now, "rendering day");
    let snapshot = service.day_snapshot(today, now);
    print!("{}", render_day(&snapshot, &service.settings(), now));
    Ok(())
}
