//! Cooperative task scheduling.
//!
//! The state machine never runs work itself. It hands resumable units of
//! work to a [`Scheduler`], which polls every running unit once per tick.
//! A unit is a small step function: it does some work, then either yields
//! back to the scheduler or reports that it is done.
//!
//! # Key Concepts
//!
//! - **Task**: a resumable unit, polled once per tick until it returns [`Step::Done`]
//! - **Scheduler**: spawns, cancels and advances tasks
//! - **Clock**: the time source the scheduler reports to tasks
//!
//! # Example
//!
//! ```rust
//! use linkstate::scheduler::{
//!     LocalScheduler, ManualClock, Scheduler, Step, Task, TaskStatus, TickContext,
//! };
//!
//! struct Countdown(u32);
//!
//! impl Task for Countdown {
//!     fn poll(&mut self, _cx: &TickContext) -> Step {
//!         if self.0 == 0 {
//!             return Step::Done;
//!         }
//!         self.0 -= 1;
//!         Step::Yield
//!     }
//! }
//!
//! let mut scheduler = LocalScheduler::new(ManualClock::new());
//! let handle = scheduler.spawn(Box::new(Countdown(1))).unwrap();
//! assert_eq!(scheduler.status(handle), TaskStatus::Running);
//!
//! scheduler.advance();
//! assert_eq!(scheduler.status(handle), TaskStatus::Completed);
//! ```

mod clock;
mod local;

pub use clock::{Clock, ManualClock, SystemClock};
pub use local::LocalScheduler;

use std::time::Duration;
use thiserror::Error;

slotmap::new_key_type! {
    /// Handle to a unit of work owned by a scheduler.
    pub struct TaskHandle;
}

/// Outcome of a single poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Still running; poll again on the next tick.
    Yield,

    /// Finished; never polled again.
    Done,
}

/// Lifecycle of a spawned unit as seen through its handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Completed,
    Cancelled,
    /// The handle was released or never belonged to this scheduler.
    Unknown,
}

impl TaskStatus {
    /// Whether the unit will be polled again.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Per-tick information handed to every poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickContext {
    /// Number of ticks the scheduler has advanced so far.
    pub tick: u64,

    /// Clock reading for this tick.
    pub now: Duration,
}

/// A resumable unit of work.
///
/// Implementations keep whatever progress they need between polls. A unit
/// that returned [`Step::Done`] is dropped by the scheduler.
pub trait Task: Send {
    fn poll(&mut self, cx: &TickContext) -> Step;
}

/// Errors reported by a scheduler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Scheduler is not available to run tasks")]
    Unavailable,
}

/// The scheduling collaborator a state machine runs on.
pub trait Scheduler {
    /// Begin running a unit. The unit is polled once before this returns,
    /// so work up to its first yield happens synchronously.
    fn spawn(&mut self, task: Box<dyn Task>) -> Result<TaskHandle, SchedulerError>;

    /// Stop a unit before its natural completion.
    ///
    /// Cancelling a completed, cancelled or unknown handle is a no-op.
    fn cancel(&mut self, handle: TaskHandle);

    /// Forget a handle. A still-running unit is cancelled first.
    fn release(&mut self, handle: TaskHandle) {
        self.cancel(handle);
    }

    fn status(&self, handle: TaskHandle) -> TaskStatus;

    /// Run one tick: poll every running unit once, in spawn order.
    fn advance(&mut self);

    /// Ticks advanced so far.
    fn tick_index(&self) -> u64;

    /// Current clock reading.
    fn now(&self) -> Duration;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn spawn(&mut self, task: Box<dyn Task>) -> Result<TaskHandle, SchedulerError> {
        (**self).spawn(task)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        (**self).cancel(handle)
    }

    fn release(&mut self, handle: TaskHandle) {
        (**self).release(handle)
    }

    fn status(&self, handle: TaskHandle) -> TaskStatus {
        (**self).status(handle)
    }

    fn advance(&mut self) {
        (**self).advance()
    }

    fn tick_index(&self) -> u64 {
        (**self).tick_index()
    }

    fn now(&self) -> Duration {
        (**self).now()
    }
}
