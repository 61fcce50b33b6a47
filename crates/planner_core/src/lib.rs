pub mod calendar;
pub mod error;
pub mod habit;
pub mod layout;
pub mod recurrence;
pub mod service;
pub mod settings;
pub mod sink;
pub mod task;
pub mod time;

pub use crate::error::{PlannerError, PlannerResult};
pub use crate::service::{DaySnapshot, PlannerService, PlannerServiceBuilder};
pub use crate::time::ClockTime;
