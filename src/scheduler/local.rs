//! Single-threaded scheduler driven by explicit ticks.

use super::{Clock, Scheduler, SchedulerError, Step, Task, TaskHandle, TaskStatus, TickContext};
use slotmap::SlotMap;
use std::time::Duration;

struct Slot {
    task: Option<Box<dyn Task>>,
    status: TaskStatus,
}

/// Scheduler that polls its units only when [`Scheduler::advance`] is called.
///
/// Finished units keep their slot (and status) until the handle is
/// released, so owners can tell natural completion from cancellation.
pub struct LocalScheduler<C: Clock> {
    clock: C,
    slots: SlotMap<TaskHandle, Slot>,
    order: Vec<TaskHandle>,
    tick: u64,
    open: bool,
}

impl<C: Clock> LocalScheduler<C> {
    /// Create an open scheduler at tick zero.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            slots: SlotMap::with_key(),
            order: Vec::new(),
            tick: 0,
            open: true,
        }
    }

    /// Get the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of units still being polled.
    pub fn running(&self) -> usize {
        self.order.len()
    }

    /// Cancel every running unit and refuse further spawns.
    pub fn shutdown(&mut self) {
        for handle in std::mem::take(&mut self.order) {
            self.cancel(handle);
        }
        self.open = false;
        tracing::trace!(tick = self.tick, "scheduler shut down");
    }

    /// Whether spawns are still accepted.
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn context(&self) -> TickContext {
        TickContext {
            tick: self.tick,
            now: self.clock.now(),
        }
    }
}

impl<C: Clock> Scheduler for LocalScheduler<C> {
    fn spawn(&mut self, mut task: Box<dyn Task>) -> Result<TaskHandle, SchedulerError> {
        if !self.open {
            return Err(SchedulerError::Unavailable);
        }

        let step = task.poll(&self.context());
        let handle = match step {
            Step::Yield => {
                let handle = self.slots.insert(Slot {
                    task: Some(task),
                    status: TaskStatus::Running,
                });
                self.order.push(handle);
                handle
            }
            Step::Done => self.slots.insert(Slot {
                task: None,
                status: TaskStatus::Completed,
            }),
        };

        tracing::trace!(?handle, ?step, tick = self.tick, "task spawned");
        Ok(handle)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let Some(slot) = self.slots.get_mut(handle) else {
            return;
        };
        if slot.status.is_running() {
            slot.task = None;
            slot.status = TaskStatus::Cancelled;
            self.order.retain(|h| *h != handle);
            tracing::trace!(?handle, tick = self.tick, "task cancelled");
        }
    }

    fn release(&mut self, handle: TaskHandle) {
        self.cancel(handle);
        self.slots.remove(handle);
    }

    fn status(&self, handle: TaskHandle) -> TaskStatus {
        self.slots
            .get(handle)
            .map_or(TaskStatus::Unknown, |slot| slot.status)
    }

    fn advance(&mut self) {
        self.tick += 1;
        let cx = self.context();

        for handle in &self.order {
            let Some(slot) = self.slots.get_mut(*handle) else {
                continue;
            };
            let Some(task) = slot.task.as_mut() else {
                continue;
            };
            if task.poll(&cx) == Step::Done {
                slot.task = None;
                slot.status = TaskStatus::Completed;
            }
        }

        let slots = &self.slots;
        self.order
            .retain(|handle| slots.get(*handle).is_some_and(|s| s.status.is_running()));
    }

    fn tick_index(&self) -> u64 {
        self.tick
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counted {
        polls: Arc<AtomicUsize>,
        yields: usize,
    }

    impl Task for Counted {
        fn poll(&mut self, _cx: &TickContext) -> Step {
            self.polls.fetch_add(1, Ordering::SeqCst);
            if self.yields == 0 {
                Step::Done
            } else {
                self.yields -= 1;
                Step::Yield
            }
        }
    }

    fn counted(yields: usize) -> (Box<dyn Task>, Arc<AtomicUsize>) {
        let polls = Arc::new(AtomicUsize::new(0));
        let task = Counted {
            polls: Arc::clone(&polls),
            yields,
        };
        (Box::new(task), polls)
    }

    #[test]
    fn spawn_polls_unit_once() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, polls) = counted(3);

        let handle = scheduler.spawn(task).unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.status(handle), TaskStatus::Running);
        assert_eq!(scheduler.running(), 1);
    }

    #[test]
    fn unit_that_never_yields_completes_on_spawn() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, _) = counted(0);

        let handle = scheduler.spawn(task).unwrap();

        assert_eq!(scheduler.status(handle), TaskStatus::Completed);
        assert_eq!(scheduler.running(), 0);
    }

    #[test]
    fn advance_polls_until_done() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, polls) = counted(2);
        let handle = scheduler.spawn(task).unwrap();

        scheduler.advance();
        assert_eq!(scheduler.status(handle), TaskStatus::Running);

        scheduler.advance();
        assert_eq!(scheduler.status(handle), TaskStatus::Completed);

        scheduler.advance();
        assert_eq!(polls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.tick_index(), 3);
    }

    #[test]
    fn cancel_stops_polling() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, polls) = counted(10);
        let handle = scheduler.spawn(task).unwrap();

        scheduler.cancel(handle);
        scheduler.advance();

        assert_eq!(polls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.status(handle), TaskStatus::Cancelled);
    }

    #[test]
    fn cancel_after_completion_is_noop() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, _) = counted(0);
        let handle = scheduler.spawn(task).unwrap();

        scheduler.cancel(handle);
        scheduler.cancel(handle);

        assert_eq!(scheduler.status(handle), TaskStatus::Completed);
    }

    #[test]
    fn release_forgets_handle() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (task, _) = counted(5);
        let handle = scheduler.spawn(task).unwrap();

        scheduler.release(handle);

        assert_eq!(scheduler.status(handle), TaskStatus::Unknown);
        assert_eq!(scheduler.running(), 0);
    }

    #[test]
    fn shutdown_rejects_spawns() {
        let mut scheduler = LocalScheduler::new(ManualClock::new());
        let (running, _) = counted(5);
        let handle = scheduler.spawn(running).unwrap();

        scheduler.shutdown();

        assert_eq!(scheduler.status(handle), TaskStatus::Cancelled);
        let (task, polls) = counted(1);
        assert_eq!(scheduler.spawn(task), Err(SchedulerError::Unavailable));
        assert_eq!(polls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn context_reports_clock_and_tick() {
        struct Recorder(Arc<std::sync::Mutex<Vec<TickContext>>>);

        impl Task for Recorder {
            fn poll(&mut self, cx: &TickContext) -> Step {
                self.0.lock().unwrap().push(*cx);
                Step::Yield
            }
        }

        let clock = ManualClock::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = LocalScheduler::new(clock.clone());
        scheduler
            .spawn(Box::new(Recorder(Arc::clone(&seen))))
            .unwrap();

        clock.advance(Duration::from_millis(20));
        scheduler.advance();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].tick, 0);
        assert_eq!(seen[0].now, Duration::ZERO);
        assert_eq!(seen[1].tick, 1);
        assert_eq!(seen[1].now, Duration::from_millis(20));
    }
}
