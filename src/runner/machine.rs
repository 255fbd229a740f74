//! The runner: drives one state at a time and follows its links.

use super::config::RunnerConfig;
use super::error::MachineError;
use crate::core::{Link, LinkId, State, StateHistory, StateId, StateNode, TransitionRecord};
use crate::scheduler::{Scheduler, TaskHandle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use uuid::Uuid;

/// Where the current activation is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationStatus {
    /// Entered, execution in flight.
    Active,

    /// Execution returned on its own; exit not yet called.
    NaturallyCompleted,

    /// Exit has been called.
    Exited,
}

#[derive(Debug)]
struct Activation {
    id: Uuid,
    status: ActivationStatus,
    task: Option<TaskHandle>,
    entered_at: DateTime<Utc>,
}

/// Serializable view of a runner for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Whether the outer loop was active.
    pub running: bool,
    /// Name of the current state.
    pub current: Option<String>,
    pub status: Option<ActivationStatus>,
    pub activation: Option<Uuid>,
    pub entered_at: Option<DateTime<Utc>>,
    /// Scheduler tick index at capture time.
    pub tick: u64,
    pub history: StateHistory,
}

impl MachineSnapshot {
    /// Render the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Cooperative state machine.
///
/// The runner owns its states and its scheduler. The host calls
/// [`tick`](Runner::tick) once per frame; each tick reaps a finished
/// execution, advances the scheduler, then runs one loop iteration (when
/// running). A finished execution is therefore noticed on the tick after
/// it finished.
///
/// # Example
///
/// ```rust
/// use linkstate::core::Link;
/// use linkstate::runner::Runner;
/// use linkstate::scheduler::{LocalScheduler, ManualClock};
/// use linkstate::states::PassThrough;
///
/// let mut runner = Runner::new(LocalScheduler::new(ManualClock::new()));
/// let intro = runner.insert_state(PassThrough::new("Intro"));
/// let menu = runner.insert_state(PassThrough::new("Menu"));
/// runner.link(intro, Link::always(menu)).unwrap();
///
/// runner.run_from(intro).unwrap();
/// runner.tick().unwrap();
/// runner.tick().unwrap();
///
/// assert_eq!(runner.current_name(), Some("Menu"));
/// ```
pub struct Runner<S: Scheduler> {
    scheduler: S,
    nodes: SlotMap<StateId, StateNode>,
    current: Option<StateId>,
    activation: Option<Activation>,
    looping: bool,
    history: StateHistory,
    config: RunnerConfig,
}

impl<S: Scheduler> Runner<S> {
    /// Create a runner with the default configuration.
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, RunnerConfig::default())
    }

    /// Create a runner with the given configuration.
    pub fn with_config(scheduler: S, config: RunnerConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };
        Self {
            scheduler,
            nodes: SlotMap::with_key(),
            current: None,
            activation: None,
            looping: false,
            history,
            config,
        }
    }

    /// Register a state. Its debug flag starts at the configured default.
    pub fn insert_state<T: State + 'static>(&mut self, state: T) -> StateId {
        self.insert_boxed(Box::new(state))
    }

    /// Register an already boxed state.
    pub fn insert_boxed(&mut self, state: Box<dyn State>) -> StateId {
        let mut node = StateNode::new(state);
        node.set_debug(self.config.debug_states);
        self.nodes.insert(node)
    }

    /// Unregister a state that is not current.
    ///
    /// Links elsewhere that still point at it are reported by
    /// [`check_topology`](Runner::check_topology).
    pub fn remove_state(&mut self, id: StateId) -> Result<StateNode, MachineError> {
        if self.current == Some(id) {
            let name = self.nodes.get(id).map(|n| n.name().to_string());
            return Err(MachineError::StateIsCurrent {
                name: name.unwrap_or_default(),
            });
        }
        self.nodes
            .remove(id)
            .ok_or(MachineError::UnknownState { id })
    }

    /// Get a registered state.
    pub fn node(&self, id: StateId) -> Option<&StateNode> {
        self.nodes.get(id)
    }

    /// Get a registered state mutably, e.g. to toggle its debug flag.
    pub fn node_mut(&mut self, id: StateId) -> Option<&mut StateNode> {
        self.nodes.get_mut(id)
    }

    /// Iterate over all registered states.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &StateNode)> {
        self.nodes.iter()
    }

    /// Attach a link to `from`. Returns `Ok(false)` if it is already there.
    ///
    /// A link added to the active state is enabled right away.
    pub fn link(&mut self, from: StateId, mut link: Link) -> Result<bool, MachineError> {
        let active = self.current == Some(from) && self.activation.is_some();
        let node = self
            .nodes
            .get_mut(from)
            .ok_or(MachineError::UnknownState { id: from })?;
        if node.links().contains(&link) {
            return Ok(false);
        }
        if active {
            link.enable();
        }
        Ok(node.add_link(link))
    }

    /// Detach a link from `from`, disabling it.
    pub fn unlink(&mut self, from: StateId, link: LinkId) -> Result<Option<Link>, MachineError> {
        let node = self
            .nodes
            .get_mut(from)
            .ok_or(MachineError::UnknownState { id: from })?;
        Ok(node.remove_link(link).map(|mut link| {
            link.disable();
            link
        }))
    }

    /// Get the current state, if any.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Get the name of the current state.
    pub fn current_name(&self) -> Option<&str> {
        self.current
            .and_then(|id| self.nodes.get(id))
            .map(StateNode::name)
    }

    /// Lifecycle status of the current activation.
    ///
    /// A unit that finished during the last scheduler advance already
    /// reports [`ActivationStatus::NaturallyCompleted`].
    pub fn activation_status(&self) -> Option<ActivationStatus> {
        let activation = self.activation.as_ref()?;
        let finished = activation
            .task
            .is_some_and(|handle| !self.scheduler.status(handle).is_running());
        if finished && activation.status == ActivationStatus::Active {
            return Some(ActivationStatus::NaturallyCompleted);
        }
        Some(activation.status)
    }

    /// Unique id of the current activation.
    pub fn activation_id(&self) -> Option<Uuid> {
        self.activation.as_ref().map(|a| a.id)
    }

    /// Whether the outer loop is active.
    pub fn is_running(&self) -> bool {
        self.looping
    }

    /// Get the transition history.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Get the configuration this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Get the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Get the scheduler mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Make `id` the current state and start its activation.
    ///
    /// The previous activation is interrupted (if still executing) or
    /// finalized (if it completed on its own), and its links disabled,
    /// before the new state is entered. An unknown id leaves the machine
    /// untouched.
    pub fn set_current_state(&mut self, id: StateId) -> Result<(), MachineError> {
        if !self.nodes.contains_key(id) {
            return Err(MachineError::UnknownState { id });
        }
        let from = self.finish_current();
        self.activate(id, from)
    }

    /// Set the current state, then start the loop.
    pub fn run_from(&mut self, id: StateId) -> Result<(), MachineError> {
        self.set_current_state(id)?;
        self.run();
        Ok(())
    }

    /// Start the loop. Does nothing if already running.
    ///
    /// After [`stop`](Runner::stop) the previous state is not resumed; set
    /// one with [`set_current_state`](Runner::set_current_state) or use
    /// [`run_from`](Runner::run_from).
    pub fn run(&mut self) {
        if self.looping {
            return;
        }
        self.looping = true;
        tracing::debug!(current = ?self.current_name(), "runner started");
    }

    /// Stop the loop, interrupting any in-flight execution, and clear the
    /// current state. Does nothing if already stopped.
    pub fn stop(&mut self) {
        if !self.looping {
            return;
        }
        let last = self.finish_current();
        self.current = None;
        self.activation = None;
        self.looping = false;
        tracing::debug!(last = ?last, "runner stopped");
    }

    /// Abandon the current state's in-flight execution and exit it.
    ///
    /// A no-op when nothing is executing. Fails if there is no current state.
    pub fn skip(&mut self) -> Result<(), MachineError> {
        if self.current.is_none() {
            return Err(MachineError::NoCurrentState);
        }
        self.reap();
        self.interrupt();
        Ok(())
    }

    /// Advance the machine by one tick.
    ///
    /// A state entered during the loop iteration is first resumed on the
    /// next tick, so every unit gets at most one resumption per tick.
    pub fn tick(&mut self) -> Result<(), MachineError> {
        self.reap();
        self.scheduler.advance();
        if self.looping {
            self.step()?;
        }
        Ok(())
    }

    /// Capture a serializable view of the runner.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            running: self.looping,
            current: self.current_name().map(str::to_string),
            status: self.activation_status(),
            activation: self.activation_id(),
            entered_at: self.activation.as_ref().map(|a| a.entered_at),
            tick: self.scheduler.tick_index(),
            history: self.history.clone(),
        }
    }

    pub(crate) fn nodes(&self) -> &SlotMap<StateId, StateNode> {
        &self.nodes
    }

    /// One iteration of the outer loop.
    fn step(&mut self) -> Result<(), MachineError> {
        let Some(current) = self.current else {
            return Ok(());
        };
        if self.activation.as_ref().is_some_and(|a| a.task.is_some()) {
            return Ok(());
        }
        let Some(next) = self.nodes.get(current).and_then(StateNode::validate_links) else {
            return Ok(());
        };
        if !self.nodes.contains_key(next) {
            tracing::warn!(from = ?self.current_name(), ?next, "link points at a removed state");
            return Err(MachineError::UnknownState { id: next });
        }
        self.set_current_state(next)
    }

    /// Clear the handle of an execution that is no longer running.
    fn reap(&mut self) {
        let Some(activation) = self.activation.as_mut() else {
            return;
        };
        let Some(handle) = activation.task else {
            return;
        };
        if self.scheduler.status(handle).is_running() {
            return;
        }
        self.scheduler.release(handle);
        activation.task = None;
        if activation.status == ActivationStatus::Active {
            activation.status = ActivationStatus::NaturallyCompleted;
        }
    }

    /// Cancel the in-flight execution and exit the current state.
    fn interrupt(&mut self) {
        let (Some(current), Some(activation)) = (self.current, self.activation.as_mut()) else {
            return;
        };
        let Some(handle) = activation.task.take() else {
            return;
        };
        self.scheduler.release(handle);
        activation.status = ActivationStatus::Exited;
        if let Some(node) = self.nodes.get_mut(current) {
            node.exit();
        }
        tracing::debug!(state = ?self.current_name(), "execution interrupted");
    }

    /// End the current activation exactly once and disable its links.
    /// Returns the name of the state that was current.
    fn finish_current(&mut self) -> Option<String> {
        let current = self.current?;
        self.reap();
        self.interrupt();

        let node = self.nodes.get_mut(current)?;
        if let Some(activation) = self.activation.as_mut() {
            if activation.status == ActivationStatus::NaturallyCompleted {
                node.exit();
                activation.status = ActivationStatus::Exited;
            }
        }
        node.disable_links();
        Some(node.name().to_string())
    }

    fn activate(&mut self, id: StateId, from: Option<String>) -> Result<(), MachineError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(MachineError::UnknownState { id })?;

        node.enter();
        let task = node.execute();
        let handle = match self.scheduler.spawn(task) {
            Ok(handle) => handle,
            Err(err) => {
                node.exit();
                self.current = None;
                self.activation = None;
                tracing::warn!(state = node.name(), %err, "could not start execution");
                return Err(err.into());
            }
        };
        node.enable_links();

        let record = TransitionRecord {
            from,
            to: node.name().to_string(),
            timestamp: Utc::now(),
            activation: Uuid::new_v4(),
        };
        tracing::debug!(
            from = ?record.from,
            to = %record.to,
            activation = %record.activation,
            "state activated"
        );

        self.current = Some(id);
        self.activation = Some(Activation {
            id: record.activation,
            status: ActivationStatus::Active,
            task: Some(handle),
            entered_at: record.timestamp,
        });
        self.history.record(record);
        Ok(())
    }
}
