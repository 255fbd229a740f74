//! The state machine runner.
//!
//! A [`Runner`] owns the registered states and the scheduler their work
//! runs on. Exactly one state is current at a time. When its execution
//! finishes, the runner asks the state's links, in registration order,
//! which state comes next.
//!
//! # Lifecycle
//!
//! - **Stopped**: loop inactive, no current state
//! - **Executing**: current state's work is in flight
//! - **Idle-in-state**: work finished, waiting for a link to fire

mod config;
mod error;
mod machine;

pub use config::{RunnerConfig, DEFAULT_HISTORY_LIMIT};
pub use error::{ConfigError, MachineError};
pub use machine::{ActivationStatus, MachineSnapshot, Runner};
