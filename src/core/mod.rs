//! Core state machine types.
//!
//! This module contains the building blocks a runner drives:
//! - State behaviour via the `State` trait, registered as a `StateNode`
//! - Links deciding the next state, optionally gated on a `Signal`
//! - Bounded history of transitions

mod history;
mod link;
mod signal;
mod state;

pub use history::{StateHistory, TransitionRecord};
pub use link::{Link, LinkId, SignalLink};
pub use signal::{Signal, Subscription};
pub use state::{State, StateId, StateNode};
