//! The `State` trait and the node that carries a state's links.
//!
//! Application code supplies arbitrary state behaviour through the
//! [`State`] trait. Once registered with a runner, each state lives in a
//! [`StateNode`] that also owns its outgoing links and debug flag.

use super::link::{Link, LinkId};
use crate::scheduler::Task;
use std::fmt;

slotmap::new_key_type! {
    /// Identifier of a state registered with a runner.
    pub struct StateId;
}

/// An interruptible unit of work with lifecycle hooks.
///
/// The runner calls [`enter`](State::enter) once when the state becomes
/// current, spawns the unit returned by [`execute`](State::execute), and
/// calls [`exit`](State::exit) exactly once when the activation ends,
/// whether the unit ran to completion or was interrupted.
///
/// # Example
///
/// ```rust
/// use linkstate::core::State;
/// use linkstate::scheduler::{Step, Task, TickContext};
///
/// struct Blink {
///     frames: u32,
/// }
///
/// struct BlinkTask {
///     left: u32,
/// }
///
/// impl Task for BlinkTask {
///     fn poll(&mut self, _cx: &TickContext) -> Step {
///         if self.left == 0 {
///             return Step::Done;
///         }
///         self.left -= 1;
///         Step::Yield
///     }
/// }
///
/// impl State for Blink {
///     fn name(&self) -> &str {
///         "Blink"
///     }
///
///     fn execute(&mut self) -> Box<dyn Task> {
///         Box::new(BlinkTask { left: self.frames })
///     }
/// }
/// ```
pub trait State: Send {
    /// Label used for logging and history.
    fn name(&self) -> &str;

    fn enter(&mut self) {}

    /// Create the resumable work for one activation.
    ///
    /// Called once per activation; the returned unit is never restarted.
    fn execute(&mut self) -> Box<dyn Task>;

    fn exit(&mut self) {}
}

/// A registered state together with its ordered, duplicate-free links.
pub struct StateNode {
    state: Box<dyn State>,
    links: Vec<Link>,
    debug: bool,
}

impl StateNode {
    /// Wrap a state with no links.
    pub fn new(state: Box<dyn State>) -> Self {
        Self {
            state,
            links: Vec::new(),
            debug: false,
        }
    }

    /// Name of the wrapped state.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Whether debug output is on for this state.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Turn debug output on or off.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Append a link. Returns `false` if a link with the same id is
    /// already present, in which case nothing changes.
    pub fn add_link(&mut self, link: Link) -> bool {
        if self.links.contains(&link) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Remove and return the link with this id, if present.
    pub fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        let index = self.links.iter().position(|link| link.id() == id)?;
        Some(self.links.remove(index))
    }

    /// Remove every link.
    pub fn remove_all_links(&mut self) {
        self.links.clear();
    }

    /// Links in registration order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The target of the first link, in registration order, that fires.
    pub fn validate_links(&self) -> Option<StateId> {
        self.links.iter().find_map(Link::evaluate)
    }

    /// Arm every link for a new activation.
    pub fn enable_links(&mut self) {
        self.links.iter_mut().for_each(Link::enable);
    }

    /// Disarm every link, dropping signal subscriptions.
    pub fn disable_links(&mut self) {
        self.links.iter_mut().for_each(Link::disable);
    }

    /// Emit a debug event describing this state, if its debug flag is set.
    pub fn debug_state(&self) {
        if self.debug {
            tracing::debug!(state = self.name(), links = self.links.len(), "current state");
        }
    }

    pub(crate) fn enter(&mut self) {
        self.state.enter();
    }

    pub(crate) fn execute(&mut self) -> Box<dyn Task> {
        self.debug_state();
        self.state.execute()
    }

    pub(crate) fn exit(&mut self) {
        self.state.exit();
    }
}

impl fmt::Debug for StateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("name", &self.name())
            .field("links", &self.links)
            .field("debug", &self.debug)
            .finish()
    }
}
