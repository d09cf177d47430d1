//! Cooperative periodic task scheduler
//!
//! Tracks a fixed table of periodic tasks against a millisecond clock and
//! reports which ones are due. The caller owns the task bodies and runs
//! each due task to completion.

pub mod table;

pub use table::{DueTasks, Scheduler, SchedulerError, TaskId};
