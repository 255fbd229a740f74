//! Transition links.
//!
//! A link is owned by a state and, when asked, names the state the machine
//! should move to next. Links are a closed set: unconditional links always
//! fire, signal links fire once their signal has been raised since they
//! were last enabled.

use super::signal::{Signal, Subscription};
use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Identity of a link, used for de-duplication and removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkId(Uuid);

impl LinkId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Link that waits for an external signal.
pub struct SignalLink {
    id: LinkId,
    next: StateId,
    signal: Signal,
    raised: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl SignalLink {
    fn enable(&mut self) {
        // Each enable gets its own flag, so a handler captured by an
        // earlier subscription can never mark this activation.
        let raised = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&raised);
        self.raised = raised;
        self.subscription = Some(self.signal.subscribe(move || {
            flag.store(true, Ordering::SeqCst);
        }));
    }

    fn disable(&mut self) {
        self.subscription = None;
        self.raised = Arc::new(AtomicBool::new(false));
    }

    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

impl Clone for SignalLink {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            next: self.next,
            signal: self.signal.clone(),
            raised: Arc::new(AtomicBool::new(false)),
            subscription: None,
        }
    }
}

/// A transition predicate owned by a state.
///
/// Links compare equal when they share a [`LinkId`]; clones keep the id
/// but never the live subscription.
///
/// # Example
///
/// ```rust
/// use linkstate::core::{Link, Signal};
/// use linkstate::states::PassThrough;
/// use linkstate::runner::Runner;
/// use linkstate::scheduler::{LocalScheduler, ManualClock};
///
/// let mut runner = Runner::new(LocalScheduler::new(ManualClock::new()));
/// let next = runner.insert_state(PassThrough::new("Next"));
///
/// let always = Link::always(next);
/// assert_eq!(always.evaluate(), Some(next));
///
/// let signal = Signal::new();
/// let mut gated = Link::on_signal(&signal, next);
/// gated.enable();
/// assert_eq!(gated.evaluate(), None);
///
/// signal.raise();
/// assert_eq!(gated.evaluate(), Some(next));
/// ```
#[derive(Clone)]
pub enum Link {
    Always { id: LinkId, next: StateId },
    OnSignal(SignalLink),
}

impl Link {
    /// A link that fires as soon as its state has finished executing.
    pub fn always(next: StateId) -> Self {
        Self::Always {
            id: LinkId::new(),
            next,
        }
    }

    /// A link that fires once `signal` is raised while the link is enabled.
    pub fn on_signal(signal: &Signal, next: StateId) -> Self {
        Self::OnSignal(SignalLink {
            id: LinkId::new(),
            next,
            signal: signal.clone(),
            raised: Arc::new(AtomicBool::new(false)),
            subscription: None,
        })
    }

    /// Identity of this link.
    pub fn id(&self) -> LinkId {
        match self {
            Self::Always { id, .. } => *id,
            Self::OnSignal(link) => link.id,
        }
    }

    /// The state this link leads to.
    pub fn next(&self) -> StateId {
        match self {
            Self::Always { next, .. } => *next,
            Self::OnSignal(link) => link.next,
        }
    }

    /// Decide whether the link fires. Does not clear a raised signal.
    pub fn evaluate(&self) -> Option<StateId> {
        match self {
            Self::Always { next, .. } => Some(*next),
            Self::OnSignal(link) => link.is_raised().then_some(link.next),
        }
    }

    /// Start observing the signal with a cleared flag.
    pub fn enable(&mut self) {
        if let Self::OnSignal(link) = self {
            link.enable();
        }
    }

    /// Stop observing the signal and clear the flag.
    pub fn disable(&mut self) {
        if let Self::OnSignal(link) = self {
            link.disable();
        }
    }

    /// Whether a signal link currently holds a subscription.
    /// Unconditional links have nothing to enable and report `false`.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Always { .. } => false,
            Self::OnSignal(link) => link.subscription.is_some(),
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Link {}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always { id, next } => f
                .debug_struct("Always")
                .field("id", id)
                .field("next", next)
                .finish(),
            Self::OnSignal(link) => f
                .debug_struct("OnSignal")
                .field("id", &link.id)
                .field("next", &link.next)
                .field("raised", &link.is_raised())
                .field("enabled", &link.subscription.is_some())
                .finish(),
        }
    }
}
