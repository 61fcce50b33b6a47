use std::path::Path;

use anyhow::{Context, Result};
use planner_core::{habit::Habit, settings::TimelineSettings, task::Task};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Saved planner state as it lives on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<TimelineSettings>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl PlannerData {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse planner data")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let data = Self::from_json(&raw).with_context(|| format!("in {}", path.display()))?;
        info!(
            path = %path.display(),
            tasks = data.tasks.len(),
            habits = data.habits.len(),
            "loaded planner data"
        );
        Ok(data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("failed to encode planner data")?;
        std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
    }
}
