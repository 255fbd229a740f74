//! A state that waits for a fixed duration.

use super::{Callback, ProgressCallback};
use crate::core::State;
use crate::scheduler::{Step, Task, TickContext};
use std::sync::Arc;
use std::time::Duration;

/// Holds the machine for a duration, e.g. behind a loading bar.
///
/// The progress callback runs on every tick before the duration has
/// elapsed, starting at `0.0` on the first tick. The exit callback runs
/// when the activation ends, including when it is interrupted.
pub struct Delay {
    name: String,
    duration: Duration,
    on_progress: Option<ProgressCallback>,
    on_exit: Option<Callback>,
}

impl Delay {
    /// Create a delay with no callbacks.
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
            on_progress: None,
            on_exit: None,
        }
    }

    /// Called each tick with progress in `[0, 100)`.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Called when the activation ends.
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(callback));
        self
    }

    /// Configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl State for Delay {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self) -> Box<dyn Task> {
        Box::new(DelayTask {
            started: None,
            duration: self.duration,
            on_progress: self.on_progress.clone(),
        })
    }

    fn exit(&mut self) {
        if let Some(callback) = &self.on_exit {
            callback();
        }
    }
}

struct DelayTask {
    started: Option<Duration>,
    duration: Duration,
    on_progress: Option<ProgressCallback>,
}

impl Task for DelayTask {
    fn poll(&mut self, cx: &TickContext) -> Step {
        let started = *self.started.get_or_insert(cx.now);
        let elapsed = cx.now.saturating_sub(started);
        if elapsed >= self.duration {
            return Step::Done;
        }

        if let Some(callback) = &self.on_progress {
            callback(elapsed.as_secs_f32() / self.duration.as_secs_f32() * 100.0);
        }
        Step::Yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn at(millis: u64) -> TickContext {
        TickContext {
            tick: millis,
            now: Duration::from_millis(millis),
        }
    }

    #[test]
    fn progress_starts_at_zero_and_stops_before_hundred() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut state = Delay::new("Splash", Duration::from_millis(100))
            .on_progress(move |p| sink.lock().unwrap().push(p));

        let mut task = state.execute();
        assert_eq!(task.poll(&at(1000)), Step::Yield);
        assert_eq!(task.poll(&at(1050)), Step::Yield);
        assert_eq!(task.poll(&at(1100)), Step::Done);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 50.0).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut state = Delay::new("Instant", Duration::ZERO).on_progress(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(state.execute().poll(&at(0)), Step::Done);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exit_runs_completion_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut state = Delay::new("Splash", Duration::from_secs(1)).on_exit(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        state.exit();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restarted_activation_measures_from_new_start() {
        let mut state = Delay::new("Splash", Duration::from_millis(10));

        let mut first = state.execute();
        first.poll(&at(0));
        assert_eq!(first.poll(&at(10)), Step::Done);

        let mut second = state.execute();
        assert_eq!(second.poll(&at(500)), Step::Yield);
        assert_eq!(second.poll(&at(509)), Step::Yield);
        assert_eq!(second.poll(&at(510)), Step::Done);
    }
}
