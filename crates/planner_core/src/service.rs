use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::PlannerResult,
    habit::{self, Habit, HabitKind, HabitStats},
    layout::{self, DayLayout, IntervalInfo},
    settings::TimelineSettings,
    sink::ChangeSink,
    task::{self, Task},
    time::ClockTime,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverlapPair {
    pub first_id: String,
    pub second_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitAgendaEntry {
    pub id: String,
    pub title: String,
    pub kind: HabitKind,
    pub due: bool,
    pub completed: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub layout: DayLayout,
    pub visible_intervals: Vec<IntervalInfo>,
    pub next_task: Option<Task>,
    pub overlaps: Vec<OverlapPair>,
    pub current_time_y: f64,
    pub habits: Vec<HabitAgendaEntry>,
}

/// Owns the current planner state. Each mutation runs a pure reducer under the
/// write lock, so derived habit fields for one record are never recomputed
/// concurrently.
pub struct PlannerService {
    settings: RwLock<TimelineSettings>,
    habits: RwLock<HashMap<String, Habit>>,
    tasks: RwLock<HashMap<String, Task>>,
    change_sink: Option<Box<dyn ChangeSink>>,
}

impl std::fmt::Debug for PlannerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerService")
            .field("settings", &self.settings)
            .field("habits", &self.habits)
            .field("tasks", &self.tasks)
            .field("change_sink", &self.change_sink.is_some())
            .finish()
    }
}

pub struct PlannerServiceBuilder {
    settings: TimelineSettings,
    habits: Vec<Habit>,
    tasks: Vec<Task>,
    change_sink: Option<Box<dyn ChangeSink>>,
}

impl Default for PlannerServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerServiceBuilder {
    pub fn new() -> Self {
        Self {
            settings: TimelineSettings::default(),
            habits: Vec::new(),
            tasks: Vec::new(),
            change_sink: None,
        }
    }

    pub fn with_settings(mut self, settings: TimelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn add_habit(mut self, habit: Habit) -> Self {
        self.habits.push(habit);
        self
    }

    pub fn add_habits(mut self, habits: impl IntoIterator<Item = Habit>) -> Self {
        self.habits.extend(habits);
        self
    }

    pub fn add_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn add_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn with_change_sink(mut self, sink: Box<dyn ChangeSink>) -> Self {
        self.change_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<PlannerService> {
        self.settings.validate()?;

        let mut habits = HashMap::with_capacity(self.habits.len());
        for habit in self.habits {
            habit.validate()?;
            if habits.contains_key(&habit.id) {
                bail!("duplicate habit id `{}`", habit.id);
            }
            habits.insert(habit.id.clone(), habit);
        }

        let mut tasks = HashMap::with_capacity(self.tasks.len());
        for task in self.tasks {
            if tasks.contains_key(&task.id) {
                bail!("duplicate task id `{}`", task.id);
            }
            tasks.insert(task.id.clone(), task);
        }

        tracing::debug!(
            habits = habits.len(),
            tasks = tasks.len(),
            "planner service ready"
        );
        Ok(PlannerService {
            settings: RwLock::new(self.settings),
            habits: RwLock::new(habits),
            tasks: RwLock::new(tasks),
            change_sink: self.change_sink,
        })
    }
}

impl PlannerService {
    pub fn builder() -> PlannerServiceBuilder {
        PlannerServiceBuilder::new()
    }

    pub fn settings(&self) -> TimelineSettings {
        self.settings.read().clone()
    }

    pub fn update_settings(&self, settings: TimelineSettings) -> Result<()> {
        settings.validate()?;
        *self.settings.write() = settings;
        Ok(())
    }

    pub fn habits(&self) -> Vec<Habit> {
        let mut habits: Vec<Habit> = self.habits.read().values().cloned().collect();
        habits.sort_by(|a, b| a.id.cmp(&b.id));
        habits
    }

    pub fn get_habit(&self, id: &str) -> Result<Habit> {
        self.habits
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("habit `{id}` not found"))
    }

    pub fn active_habits(&self) -> Vec<Habit> {
        self.select_habits(habit::active_habits)
    }

    pub fn building_habits(&self) -> Vec<Habit> {
        self.select_habits(habit::building_habits)
    }

    pub fn breaking_habits(&self) -> Vec<Habit> {
        self.select_habits(habit::breaking_habits)
    }

    pub fn timed_habits(&self) -> Vec<Habit> {
        self.select_habits(habit::timed_habits)
    }

    pub fn anytime_habits(&self) -> Vec<Habit> {
        self.select_habits(habit::anytime_habits)
    }

    #[instrument(skip(self, habit), fields(habit_id = %habit.id))]
    pub fn add_habit(&self, habit: Habit) -> Result<()> {
        habit.validate()?;
        {
            let mut habits = self.habits.write();
            if habits.contains_key(&habit.id) {
                bail!("habit `{}` already exists", habit.id);
            }
            habits.insert(habit.id.clone(), habit.clone());
        }
        tracing::debug!("habit added");
        self.emit_habit(&habit);
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn log_completion(
        &self,
        habit_id: &str,
        date: NaiveDate,
        units_completed: Option<u32>,
        today: NaiveDate,
    ) -> Result<Habit> {
        self.mutate_habit(habit_id, |current| {
            habit::log_completion(current, date, units_completed, today)
        })
    }

    #[instrument(skip(self))]
    pub fn remove_completion(&self, habit_id: &str, date: NaiveDate, today: NaiveDate) -> Result<Habit> {
        self.mutate_habit(habit_id, |current| {
            Ok(habit::remove_completion(current, date, today))
        })
    }

    #[instrument(skip(self, notes))]
    pub fn log_relapse(
        &self,
        habit_id: &str,
        date: NaiveDate,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<Habit> {
        self.mutate_habit(habit_id, |current| {
            habit::log_relapse(current, date, notes, today)
        })
    }

    #[instrument(skip(self))]
    pub fn archive_habit(&self, habit_id: &str) -> Result<Habit> {
        self.mutate_habit(habit_id, |current| Ok(habit::archive(current)))
    }

    #[instrument(skip(self))]
    pub fn restore_habit(&self, habit_id: &str) -> Result<Habit> {
        self.mutate_habit(habit_id, |current| Ok(habit::restore(current)))
    }

    /// Recomputes every habit's derived fields for a new `today`, so streaks
    /// that lapsed overnight drop to zero.
    #[instrument(skip(self))]
    pub fn refresh_habits(&self, today: NaiveDate) {
        let refreshed: Vec<Habit> = {
            let mut habits = self.habits.write();
            habits
                .values_mut()
                .filter_map(|current| {
                    let next = habit::recompute_stats(current, today);
                    if next == *current {
                        return None;
                    }
                    *current = next.clone();
                    Some(next)
                })
                .collect()
        };
        tracing::debug!(changed = refreshed.len(), "habits refreshed");
        for habit in &refreshed {
            self.emit_habit(habit);
        }
    }

    pub fn habit_stats(
        &self,
        habit_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<HabitStats> {
        let habit = self.get_habit(habit_id)?;
        Ok(habit::habit_stats(&habit, window_start, window_end))
    }

    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<Task> {
        let tasks = self.tasks.read();
        let mut selected: Vec<Task> = tasks
            .values()
            .filter(|task| task.date == date)
            .cloned()
            .collect();
        // Map order is arbitrary; break start-time ties by id so the order is
        // stable across calls.
        selected.sort_by(|a, b| a.id.cmp(&b.id));
        task::sort_by_time(&mut selected);
        selected
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.tasks
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("task `{id}` not found"))
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub fn upsert_task(&self, task: Task) {
        self.tasks.write().insert(task.id.clone(), task.clone());
        tracing::debug!("task stored");
        if let Some(sink) = &self.change_sink {
            sink.task_changed(&task);
        }
    }

    #[instrument(skip(self))]
    pub fn remove_task(&self, task_id: &str) -> Result<Task> {
        let removed = self
            .tasks
            .write()
            .remove(task_id)
            .ok_or_else(|| anyhow!("task `{task_id}` not found"))?;
        tracing::debug!("task removed");
        if let Some(sink) = &self.change_sink {
            sink.task_removed(task_id);
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub fn toggle_task_completion(&self, task_id: &str) -> Result<Task> {
        let toggled = {
            let mut tasks = self.tasks.write();
            let current = tasks
                .get_mut(task_id)
                .ok_or_else(|| anyhow!("task `{task_id}` not found"))?;
            *current = current.toggle_completion();
            current.clone()
        };
        tracing::debug!(completed = toggled.is_completed, "task toggled");
        if let Some(sink) = &self.change_sink {
            sink.task_changed(&toggled);
        }
        Ok(toggled)
    }

    pub fn day_layout(&self, date: NaiveDate) -> DayLayout {
        let settings = self.settings();
        let tasks = task::visible_tasks(self.tasks_for_date(date), settings.show_completed_tasks);
        layout::layout_day(&tasks, &settings)
    }

    pub fn next_task(&self, date: NaiveDate, now: ClockTime) -> Option<Task> {
        layout::find_next_task(&self.tasks_for_date(date), now).cloned()
    }

    pub fn overlapping_tasks(&self, date: NaiveDate) -> Vec<OverlapPair> {
        overlap_pairs(&self.tasks_for_date(date))
    }

    pub fn day_snapshot(&self, date: NaiveDate, now: ClockTime) -> DaySnapshot {
        let settings = self.settings();
        let all_tasks = self.tasks_for_date(date);
        let tasks = task::visible_tasks(all_tasks.clone(), settings.show_completed_tasks);
        let layout = layout::layout_day(&tasks, &settings);
        let visible_intervals =
            layout::visible_intervals(&layout.intervals, settings.min_interval_display_minutes);
        let habits = self
            .active_habits()
            .into_iter()
            .map(|habit| HabitAgendaEntry {
                due: habit.is_scheduled_on(date),
                completed: habit.is_completed_on(date),
                id: habit.id,
                title: habit.title,
                kind: habit.kind,
                current_streak: habit.current_streak,
                longest_streak: habit.longest_streak,
                completion_rate: habit.completion_rate,
            })
            .collect();

        DaySnapshot {
            date,
            next_task: layout::find_next_task(&all_tasks, now).cloned(),
            overlaps: overlap_pairs(&tasks),
            current_time_y: layout::calculate_current_time_position(
                now,
                settings.wake_time,
                settings.pixels_per_hour,
            ),
            tasks,
            layout,
            visible_intervals,
            habits,
        }
    }
}

fn overlap_pairs(tasks: &[Task]) -> Vec<OverlapPair> {
    layout::find_overlapping_tasks(tasks)
        .into_iter()
        .map(|(first, second)| OverlapPair {
            first_id: first.id.clone(),
            second_id: second.id.clone(),
        })
        .collect()
}

impl PlannerService {
    fn select_habits(&self, select: impl for<'a> Fn(&'a [Habit]) -> Vec<&'a Habit>) -> Vec<Habit> {
        let habits = self.habits();
        select(&habits).into_iter().cloned().collect()
    }

    fn mutate_habit(
        &self,
        habit_id: &str,
        reducer: impl FnOnce(&Habit) -> PlannerResult<Habit>,
    ) -> Result<Habit> {
        let updated = {
            let mut habits = self.habits.write();
            let current = habits
                .get_mut(habit_id)
                .ok_or_else(|| anyhow!("habit `{habit_id}` not found"))?;
            *current = reducer(current)?;
            current.clone()
        };
        tracing::debug!(
            habit_id,
            current_streak = updated.current_streak,
            longest_streak = updated.longest_streak,
            total_completions = updated.total_completions,
            "habit updated"
        );
        self.emit_habit(&updated);
        Ok(updated)
    }

    fn emit_habit(&self, habit: &Habit) {
        if let Some(sink) = &self.change_sink {
            sink.habit_changed(habit);
        }
    }
}
