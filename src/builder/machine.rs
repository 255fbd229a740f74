//! Builder for constructing runners.

use crate::runner::{Runner, RunnerConfig};
use crate::scheduler::Scheduler;

/// Builder for constructing runners with a fluent API.
///
/// # Example
///
/// ```rust
/// use linkstate::builder::RunnerBuilder;
/// use linkstate::scheduler::{LocalScheduler, SystemClock};
///
/// let runner = RunnerBuilder::new()
///     .history_limit(16)
///     .debug_states(true)
///     .build(LocalScheduler::new(SystemClock::new()));
///
/// assert_eq!(runner.config().history_limit, Some(16));
/// assert!(!runner.is_running());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RunnerBuilder {
    config: RunnerConfig,
}

impl RunnerBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep at most `limit` history records.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Keep every history record.
    pub fn unbounded_history(mut self) -> Self {
        self.config.history_limit = None;
        self
    }

    /// Debug flag given to states inserted afterwards.
    pub fn debug_states(mut self, debug: bool) -> Self {
        self.config.debug_states = debug;
        self
    }

    /// Build a stopped runner on the given scheduler.
    pub fn build<S: Scheduler>(self, scheduler: S) -> Runner<S> {
        Runner::with_config(scheduler, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{LocalScheduler, ManualClock};

    #[test]
    fn defaults_match_config_defaults() {
        let runner = RunnerBuilder::new().build(LocalScheduler::new(ManualClock::new()));

        assert_eq!(runner.config(), &RunnerConfig::default());
        assert_eq!(runner.history().limit(), RunnerConfig::default().history_limit);
    }

    #[test]
    fn unbounded_history_clears_limit() {
        let runner = RunnerBuilder::new()
            .history_limit(4)
            .unbounded_history()
            .build(LocalScheduler::new(ManualClock::new()));

        assert_eq!(runner.history().limit(), None);
    }

    #[test]
    fn config_replaces_previous_settings() {
        let config = RunnerConfig {
            history_limit: Some(2),
            debug_states: true,
        };

        let runner = RunnerBuilder::new()
            .debug_states(false)
            .config(config.clone())
            .build(LocalScheduler::new(ManualClock::new()));

        assert_eq!(runner.config(), &config);
    }
}
