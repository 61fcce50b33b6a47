use crate::{habit::Habit, task::Task};

/// Persistence adapters implement this trait. The service hands over each
/// record after a mutation has been fully applied; storing it is up to the
/// adapter.
pub trait ChangeSink: Send + Sync {
    fn habit_changed(&self, habit: &Habit);
    fn task_changed(&self, task: &Task);
    fn task_removed(&self, task_id: &str);
}
