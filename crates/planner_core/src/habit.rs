use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, week_dates};
use crate::error::{PlannerError, PlannerResult};
use crate::recurrence::Recurrence;
use crate::time::ClockTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    Building,
    Breaking,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relapse {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A habit with its full event history. `current_streak`, `longest_streak`,
/// `total_completions` and `completion_rate` are derived and are rewritten by
/// every reducer in this module that touches the event streams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub kind: HabitKind,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub units_completed: BTreeMap<NaiveDate, u32>,
    #[serde(default)]
    pub relapses: Vec<Relapse>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub total_completions: u32,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Habit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: HabitKind,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            recurrence: Recurrence::Daily,
            time: None,
            start_date,
            end_date: None,
            completed_dates: BTreeSet::new(),
            units_completed: BTreeMap::new(),
            relapses: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            total_completions: 0,
            completion_rate: 0.0,
            is_active: true,
            created_at: start_date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_time(mut self, time: ClockTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    pub fn relapse_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.relapses.iter().map(|relapse| relapse.date)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(PlannerError::OutOfRange(format!(
                    "habit `{}` ends {end} before it starts {}",
                    self.id, self.start_date
                )));
            }
        }
        if let Some(early) = self
            .completed_dates
            .first()
            .filter(|date| **date < self.start_date)
        {
            return Err(PlannerError::OutOfRange(format!(
                "habit `{}` has completion {early} before start date {}",
                self.id, self.start_date
            )));
        }
        if let Recurrence::Custom(days) = &self.recurrence {
            Recurrence::custom(days.iter().copied())?;
        }
        Ok(())
    }

    fn last_relapse_on_or_before(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.relapse_dates().filter(|date| *date <= today).max()
    }

    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.is_active
            && date >= self.start_date
            && self.end_date.map_or(true, |end| date <= end)
            && is_due_on_date(self, date)
    }
}

pub fn is_due_on_date(habit: &Habit, date: NaiveDate) -> bool {
    habit.recurrence.is_due_on(date)
}

/// Length of the unbroken run of completed days that ends exactly on `today`.
///
/// A missing `today` yields zero even when yesterday and earlier are present:
/// the streak describes a chain that is still alive, not the latest run.
/// Dates after `today` are ignored.
pub fn calculate_streak<'a>(
    completed_dates: impl IntoIterator<Item = &'a NaiveDate>,
    today: NaiveDate,
) -> u32 {
    let mut dates: Vec<NaiveDate> = completed_dates
        .into_iter()
        .copied()
        .filter(|date| *date <= today)
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let mut streak = 0;
    let mut expected = today;
    for date in dates {
        if date != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(1);
    }
    streak
}

/// Lifetime rate: completions over every calendar day since the start date,
/// inclusive, as a percentage capped at 100.
pub fn completion_rate(total_completions: u32, start_date: NaiveDate, as_of: NaiveDate) -> f64 {
    let elapsed_days = days_between(start_date, as_of) + 1;
    if elapsed_days <= 0 {
        return 0.0;
    }
    (f64::from(total_completions) / elapsed_days as f64 * 100.0).min(100.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub completions: u32,
    pub expected_days: u32,
    pub completion_rate: f64,
}

/// Windowed rate: completions inside `[window_start, window_end]` over the
/// number of days the recurrence expects in that window.
pub fn habit_stats(habit: &Habit, window_start: NaiveDate, window_end: NaiveDate) -> HabitStats {
    let window_days = days_between(window_start, window_end) + 1;
    if window_days <= 0 {
        return HabitStats {
            completions: 0,
            expected_days: 0,
            completion_rate: 0.0,
        };
    }
    let completions = habit
        .completed_dates
        .range(window_start..=window_end)
        .count() as u32;
    let expected_days = habit.recurrence.expected_days(window_days as u32);
    let completion_rate = if expected_days > 0 {
        f64::from(completions) / f64::from(expected_days) * 100.0
    } else {
        0.0
    };
    HabitStats {
        completions,
        expected_days,
        completion_rate,
    }
}

pub fn days_since_last_relapse(habit: &Habit, today: NaiveDate) -> i64 {
    let anchor = habit
        .last_relapse_on_or_before(today)
        .unwrap_or(habit.start_date);
    days_between(anchor, today).max(0)
}

fn streak_for(habit: &Habit, today: NaiveDate) -> u32 {
    // For breaking habits a relapse cuts the chain: only completions after the
    // latest relapse count.
    let cutoff = match habit.kind {
        HabitKind::Building => None,
        HabitKind::Breaking => habit.last_relapse_on_or_before(today),
    };
    calculate_streak(
        habit
            .completed_dates
            .iter()
            .filter(|date| cutoff.map_or(true, |relapse| **date > relapse)),
        today,
    )
}

pub fn recompute_stats(habit: &Habit, today: NaiveDate) -> Habit {
    let mut next = habit.clone();
    next.current_streak = streak_for(&next, today);
    next.longest_streak = next.longest_streak.max(next.current_streak);
    next.total_completions = next.completed_dates.len() as u32;
    next.completion_rate = completion_rate(next.total_completions, next.start_date, today);
    next
}

/// Records a completion for `date`. Logging a date that is already present is
/// a no-op and returns the habit unchanged.
pub fn log_completion(
    habit: &Habit,
    date: NaiveDate,
    units_completed: Option<u32>,
    today: NaiveDate,
) -> PlannerResult<Habit> {
    if date < habit.start_date {
        return Err(PlannerError::OutOfRange(format!(
            "completion {date} precedes start date {} of habit `{}`",
            habit.start_date, habit.id
        )));
    }
    if habit.is_completed_on(date) {
        return Ok(habit.clone());
    }
    let mut next = habit.clone();
    next.completed_dates.insert(date);
    if let Some(units) = units_completed {
        next.units_completed.insert(date, units);
    }
    Ok(recompute_stats(&next, today))
}

pub fn remove_completion(habit: &Habit, date: NaiveDate, today: NaiveDate) -> Habit {
    let mut next = habit.clone();
    next.completed_dates.remove(&date);
    next.units_completed.remove(&date);
    recompute_stats(&next, today)
}

/// Appends a relapse (several per day are allowed) and recomputes. A relapse
/// dated `today` always leaves a zero streak; a backdated one keeps the clean
/// days logged after it. Completion history is left untouched.
pub fn log_relapse(
    habit: &Habit,
    date: NaiveDate,
    notes: Option<String>,
    today: NaiveDate,
) -> PlannerResult<Habit> {
    if habit.kind != HabitKind::Breaking {
        return Err(PlannerError::NotBreakingHabit(habit.id.clone()));
    }
    if date > today {
        return Err(PlannerError::OutOfRange(format!(
            "relapse {date} is after today ({today}) for habit `{}`",
            habit.id
        )));
    }
    let mut next = habit.clone();
    next.relapses.push(Relapse { date, notes });
    Ok(recompute_stats(&next, today))
}

pub fn archive(habit: &Habit) -> Habit {
    Habit {
        is_active: false,
        ..habit.clone()
    }
}

pub fn restore(habit: &Habit) -> Habit {
    Habit {
        is_active: true,
        ..habit.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitDay {
    pub date: NaiveDate,
    pub due: bool,
    pub completed: bool,
}

pub fn week_grid(habit: &Habit, week_of: NaiveDate) -> Vec<HabitDay> {
    week_dates(week_of)
        .into_iter()
        .map(|date| HabitDay {
            date,
            due: habit.is_scheduled_on(date),
            completed: habit.is_completed_on(date),
        })
        .collect()
}

pub fn active_habits(habits: &[Habit]) -> Vec<&Habit> {
    let mut selected: Vec<&Habit> = habits.iter().filter(|habit| habit.is_active).collect();
    selected.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    selected
}

pub fn building_habits(habits: &[Habit]) -> Vec<&Habit> {
    let mut selected: Vec<&Habit> = habits
        .iter()
        .filter(|habit| habit.is_active && habit.kind == HabitKind::Building)
        .collect();
    selected.sort_by(|a, b| match (a.time, b.time) {
        (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    });
    selected
}

pub fn breaking_habits(habits: &[Habit]) -> Vec<&Habit> {
    let mut selected: Vec<&Habit> = habits
        .iter()
        .filter(|habit| habit.is_active && habit.kind == HabitKind::Breaking)
        .collect();
    selected.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
    selected
}

pub fn timed_habits(habits: &[Habit]) -> Vec<&Habit> {
    building_habits(habits)
        .into_iter()
        .filter(|habit| habit.time.is_some())
        .collect()
}

pub fn anytime_habits(habits: &[Habit]) -> Vec<&Habit> {
    building_habits(habits)
        .into_iter()
        .filter(|habit| habit.time.is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;

    fn d(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    fn dates(raw: &[&str]) -> Vec<NaiveDate> {
        raw.iter().map(|value| d(value)).collect()
    }

    fn meditation() -> Habit {
        Habit::new("meditate", "Meditate", HabitKind::Building, d("2025-11-01"))
    }

    fn no_sugar() -> Habit {
        Habit::new("sugar", "No sugar", HabitKind::Breaking, d("2025-11-01"))
    }

    #[test]
    fn streak_is_zero_without_completions() {
        let none: Vec<NaiveDate> = Vec::new();
        assert_eq!(calculate_streak(&none, d("2025-11-11")), 0);
    }

    #[test]
    fn streak_counts_chain_ending_today() {
        let completed = dates(&["2025-11-11", "2025-11-10", "2025-11-09"]);
        assert_eq!(calculate_streak(&completed, d("2025-11-11")), 3);
    }

    #[test]
    fn streak_requires_today() {
        let completed = dates(&["2025-11-10", "2025-11-09"]);
        assert_eq!(calculate_streak(&completed, d("2025-11-11")), 0);
    }

    #[test]
    fn streak_stops_at_first_gap_and_ignores_order() {
        let completed = dates(&["2025-11-08", "2025-11-11", "2025-11-10", "2025-11-07"]);
        assert_eq!(calculate_streak(&completed, d("2025-11-11")), 2);
    }

    #[test]
    fn streak_ignores_future_dates_and_duplicates() {
        let completed = dates(&["2025-11-12", "2025-11-11", "2025-11-11", "2025-11-10"]);
        assert_eq!(calculate_streak(&completed, d("2025-11-11")), 2);
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let completed = dates(&["2025-03-01", "2025-02-28", "2025-02-27"]);
        assert_eq!(calculate_streak(&completed, d("2025-03-01")), 3);
    }

    #[test]
    fn lifetime_rate_uses_elapsed_calendar_days() {
        assert_eq!(completion_rate(5, d("2025-11-01"), d("2025-11-10")), 50.0);
        assert_eq!(completion_rate(1, d("2025-11-01"), d("2025-11-01")), 100.0);
        assert_eq!(completion_rate(3, d("2025-11-05"), d("2025-11-01")), 0.0);
        assert_eq!(completion_rate(4, d("2025-11-01"), d("2025-11-02")), 100.0);
    }

    #[test]
    fn windowed_rate_uses_expected_days() {
        let mut habit = meditation().with_recurrence(Recurrence::Weekdays);
        for date in date_list("2025-11-03", 5) {
            habit = log_completion(&habit, date, None, d("2025-11-16")).unwrap();
        }
        let stats = habit_stats(&habit, d("2025-11-03"), d("2025-11-16"));
        assert_eq!(stats.completions, 5);
        assert_eq!(stats.expected_days, 10);
        assert_eq!(stats.completion_rate, 50.0);

        // The lifetime figure for the same habit divides by calendar days instead.
        assert_ne!(habit.completion_rate, stats.completion_rate);
    }

    #[test]
    fn windowed_rate_handles_empty_and_inverted_windows() {
        let habit = meditation().with_recurrence(Recurrence::Custom(Vec::new()));
        let stats = habit_stats(&habit, d("2025-11-01"), d("2025-11-30"));
        assert_eq!(stats.expected_days, 0);
        assert_eq!(stats.completion_rate, 0.0);
        let inverted = habit_stats(&meditation(), d("2025-11-30"), d("2025-11-01"));
        assert_eq!(inverted.completions, 0);
        assert_eq!(inverted.expected_days, 0);
    }

    fn date_list(first: &str, count: usize) -> Vec<NaiveDate> {
        d(first).iter_days().take(count).collect()
    }

    #[test]
    fn logging_updates_derived_fields() {
        let today = d("2025-11-03");
        let mut habit = meditation();
        for date in dates(&["2025-11-01", "2025-11-02", "2025-11-03"]) {
            habit = log_completion(&habit, date, None, today).unwrap();
        }
        assert_eq!(habit.current_streak, 3);
        assert_eq!(habit.longest_streak, 3);
        assert_eq!(habit.total_completions, 3);
        assert_eq!(habit.completion_rate, 100.0);
    }

    #[test]
    fn logging_same_date_twice_is_a_no_op() {
        let today = d("2025-11-11");
        let once = log_completion(&meditation(), today, Some(3), today).unwrap();
        let twice = log_completion(&once, today, Some(8), today).unwrap();
        assert_eq!(twice.total_completions, once.total_completions);
        assert_eq!(twice, once);
        assert_eq!(twice.units_completed.get(&today), Some(&3));
    }

    #[test]
    fn completions_before_start_are_rejected() {
        let result = log_completion(&meditation(), d("2025-10-31"), None, d("2025-11-11"));
        assert!(matches!(result, Err(PlannerError::OutOfRange(_))));
    }

    #[test]
    fn removal_recomputes_but_keeps_longest() {
        let today = d("2025-11-03");
        let mut habit = meditation();
        for date in dates(&["2025-11-01", "2025-11-02", "2025-11-03"]) {
            habit = log_completion(&habit, date, None, today).unwrap();
        }
        let removed = remove_completion(&habit, d("2025-11-03"), today);
        assert_eq!(removed.current_streak, 0);
        assert_eq!(removed.longest_streak, 3);
        assert_eq!(removed.total_completions, 2);
        assert!(removed.current_streak <= removed.longest_streak);

        let absent = remove_completion(&removed, d("2025-11-20"), today);
        assert_eq!(absent.completed_dates, removed.completed_dates);
    }

    #[test]
    fn relapse_resets_streak_without_touching_completions() {
        let today = d("2025-11-03");
        let mut habit = no_sugar();
        for date in dates(&["2025-11-01", "2025-11-02", "2025-11-03"]) {
            habit = log_completion(&habit, date, None, today).unwrap();
        }
        assert_eq!(habit.current_streak, 3);

        let relapsed = log_relapse(&habit, today, Some("birthday cake".into()), today).unwrap();
        assert_eq!(relapsed.current_streak, 0);
        assert_eq!(relapsed.longest_streak, 3);
        assert_eq!(relapsed.completed_dates, habit.completed_dates);
        assert_eq!(relapsed.relapses.len(), 1);
    }

    #[test]
    fn relapses_on_same_day_accumulate() {
        let today = d("2025-11-05");
        let once = log_relapse(&no_sugar(), today, None, today).unwrap();
        let twice = log_relapse(&once, today, None, today).unwrap();
        assert_eq!(twice.relapses.len(), 2);
        assert_eq!(twice.current_streak, 0);
    }

    #[test]
    fn relapse_cuts_chain_on_later_recompute() {
        let habit = no_sugar();
        let habit = log_completion(&habit, d("2025-11-02"), None, d("2025-11-02")).unwrap();
        let habit = log_relapse(&habit, d("2025-11-03"), None, d("2025-11-03")).unwrap();
        let habit = log_completion(&habit, d("2025-11-03"), None, d("2025-11-03")).unwrap();
        assert_eq!(habit.current_streak, 0);
        let habit = log_completion(&habit, d("2025-11-04"), None, d("2025-11-04")).unwrap();
        assert_eq!(habit.current_streak, 1);
    }

    #[test]
    fn backdated_relapse_matches_recompute() {
        let today = d("2025-11-11");
        let mut habit = no_sugar();
        for date in dates(&["2025-11-09", "2025-11-10", "2025-11-11"]) {
            habit = log_completion(&habit, date, None, today).unwrap();
        }
        let relapsed = log_relapse(&habit, d("2025-11-09"), None, today).unwrap();
        assert_eq!(relapsed.current_streak, 2);
        assert_eq!(recompute_stats(&relapsed, today), relapsed);
        assert_eq!(relapsed.longest_streak, 3);
    }

    #[test]
    fn future_relapse_is_rejected() {
        let today = d("2025-11-11");
        let habit = log_completion(&no_sugar(), today, None, today).unwrap();
        let result = log_relapse(&habit, d("2025-11-20"), None, today);
        assert!(matches!(result, Err(PlannerError::OutOfRange(_))));
    }

    #[test]
    fn validation_rejects_history_outside_the_window() {
        assert!(meditation().validate().is_ok());

        let mut early = meditation();
        early.completed_dates.insert(d("2025-10-30"));
        assert!(matches!(early.validate(), Err(PlannerError::OutOfRange(_))));

        let inverted = meditation().with_end_date(d("2025-10-01"));
        assert!(inverted.validate().is_err());

        let bad_days = meditation().with_recurrence(Recurrence::Custom(vec![0, 3]));
        assert!(bad_days.validate().is_err());
    }

    #[test]
    fn building_habits_cannot_relapse() {
        let result = log_relapse(&meditation(), d("2025-11-05"), None, d("2025-11-05"));
        assert_eq!(
            result,
            Err(PlannerError::NotBreakingHabit("meditate".to_string()))
        );
    }

    #[test]
    fn days_clean_since_relapse() {
        let habit = no_sugar();
        assert_eq!(days_since_last_relapse(&habit, d("2025-11-11")), 10);
        let habit = log_relapse(&habit, d("2025-11-08"), None, d("2025-11-11")).unwrap();
        assert_eq!(days_since_last_relapse(&habit, d("2025-11-11")), 3);
        assert_eq!(days_since_last_relapse(&habit, d("2025-11-07")), 6);
    }

    #[test]
    fn due_dates_follow_recurrence() {
        let habit = meditation().with_recurrence(Recurrence::custom([1, 3, 5]).unwrap());
        assert!(is_due_on_date(&habit, d("2025-11-12")));
        assert!(!is_due_on_date(&habit, d("2025-11-09")));
    }

    #[test]
    fn scheduling_respects_window_and_archive() {
        let habit = meditation().with_end_date(d("2025-11-30"));
        assert!(!habit.is_scheduled_on(d("2025-10-31")));
        assert!(habit.is_scheduled_on(d("2025-11-15")));
        assert!(!habit.is_scheduled_on(d("2025-12-01")));

        let archived = archive(&habit);
        assert!(!archived.is_scheduled_on(d("2025-11-15")));
        assert!(restore(&archived).is_scheduled_on(d("2025-11-15")));
    }

    #[test]
    fn week_grid_marks_due_and_completed() {
        let habit = meditation().with_recurrence(Recurrence::Weekdays);
        let habit = log_completion(&habit, d("2025-11-10"), None, d("2025-11-10")).unwrap();
        let grid = week_grid(&habit, d("2025-11-12"));
        assert_eq!(grid.len(), 7);
        assert_eq!(grid[0].date, d("2025-11-09"));
        assert!(!grid[0].due);
        assert!(grid[1].due && grid[1].completed);
        assert!(grid[2].due && !grid[2].completed);
    }

    #[test]
    fn selectors_order_habits() {
        let older = Habit::new("older", "Older", HabitKind::Building, d("2025-10-01"));
        let newer = Habit::new("newer", "Newer", HabitKind::Building, d("2025-11-01"));
        let timed_late = Habit::new("late", "Late", HabitKind::Building, d("2025-09-01"))
            .with_time("20:00".parse().unwrap());
        let timed_early = Habit::new("early", "Early", HabitKind::Building, d("2025-09-01"))
            .with_time("06:30".parse().unwrap());
        let mut strong = no_sugar();
        strong.id = "strong".into();
        strong.current_streak = 9;
        strong.longest_streak = 9;
        let mut weak = no_sugar();
        weak.id = "weak".into();
        weak.current_streak = 2;
        weak.longest_streak = 2;
        let archived = archive(&Habit::new("gone", "Gone", HabitKind::Building, d("2025-11-05")));

        let habits = vec![
            weak,
            older,
            archived,
            timed_late,
            strong,
            newer,
            timed_early,
        ];
        let ids = |selected: Vec<&Habit>| -> Vec<String> {
            selected.into_iter().map(|habit| habit.id.clone()).collect()
        };

        assert_eq!(
            ids(building_habits(&habits)),
            vec!["early", "late", "newer", "older"]
        );
        assert_eq!(ids(breaking_habits(&habits)), vec!["strong", "weak"]);
        assert_eq!(ids(timed_habits(&habits)), vec!["early", "late"]);
        assert_eq!(ids(anytime_habits(&habits)), vec!["newer", "older"]);

        let active = ids(active_habits(&habits));
        assert_eq!(active.len(), 6);
        assert!(!active.contains(&"gone".to_string()));
        assert_eq!(active[0], "newer");
        assert!(active[4..].iter().all(|id| id == "strong" || id == "weak"));
    }

    #[test]
    fn round_trips_through_json_with_defaults() {
        let habit: Habit = serde_json::from_str(
            r#"{
                "id": "read",
                "kind": "building",
                "recurrence": {"type": "weekends"},
                "startDate": "2025-11-01",
                "completedDates": ["2025-11-02", "2025-11-01"]
            }"#,
        )
        .unwrap();
        assert!(habit.is_active);
        assert_eq!(habit.recurrence, Recurrence::Weekends);
        assert_eq!(habit.completed_dates.len(), 2);
        let refreshed = recompute_stats(&habit, d("2025-11-02"));
        assert_eq!(refreshed.current_streak, 2);
        assert_eq!(refreshed.total_completions, 2);
    }
}
