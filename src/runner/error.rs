//! Runner error types.

use crate::core::StateId;
use crate::scheduler::SchedulerError;
use thiserror::Error;

/// Errors surfaced by runner operations.
///
/// All of them point at a programming or topology mistake; none is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State {id:?} is not registered with this runner")]
    UnknownState { id: StateId },

    #[error("Cannot interrupt: there is no current state")]
    NoCurrentState,

    #[error("State '{name}' is current and cannot be removed")]
    StateIsCurrent { name: String },

    #[error("Scheduler failed: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Errors loading a runner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid runner configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
