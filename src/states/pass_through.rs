//! A state with no duration.

use super::Callback;
use crate::core::State;
use crate::scheduler::{Step, Task, TickContext};
use std::sync::Arc;

/// Yields once, then runs an optional callback and finishes.
///
/// # Example
///
/// ```rust
/// use linkstate::states::PassThrough;
/// use linkstate::core::State;
///
/// let state = PassThrough::new("Boot").on_execute(|| println!("booted"));
/// assert_eq!(state.name(), "Boot");
/// ```
pub struct PassThrough {
    name: String,
    on_execute: Option<Callback>,
}

impl PassThrough {
    /// Create a pass-through state with no callback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_execute: None,
        }
    }

    /// Called when the unit finishes.
    pub fn on_execute<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_execute = Some(Arc::new(callback));
        self
    }
}

impl State for PassThrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self) -> Box<dyn Task> {
        Box::new(PassThroughTask {
            yielded: false,
            callback: self.on_execute.clone(),
        })
    }
}

struct PassThroughTask {
    yielded: bool,
    callback: Option<Callback>,
}

impl Task for PassThroughTask {
    fn poll(&mut self, _cx: &TickContext) -> Step {
        if !self.yielded {
            self.yielded = true;
            return Step::Yield;
        }
        if let Some(callback) = &self.callback {
            callback();
        }
        Step::Done
    }
}
