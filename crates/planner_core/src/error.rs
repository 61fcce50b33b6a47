use thiserror::Error;

/// Failures raised where raw values enter the planner core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("value out of range: {0}")]
    OutOfRange(String),
    #[error("relapses can only be logged for breaking habits (habit `{0}`)")]
    NotBreakingHabit(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
