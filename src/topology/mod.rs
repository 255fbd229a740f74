//! Accumulating topology checks.
//!
//! A misregistered link does not crash a running machine; it makes it
//! stall or fail on some later tick. These checks walk every registered
//! state up front and report ALL problems in one pass using Stillwater's
//! `Validation`, instead of stopping at the first.
//!
//! States without links are legal terminal states and are not reported.
//!
//! # Example
//!
//! ```rust
//! use linkstate::core::Link;
//! use linkstate::runner::Runner;
//! use linkstate::scheduler::{LocalScheduler, ManualClock};
//! use linkstate::states::PassThrough;
//!
//! let mut runner = Runner::new(LocalScheduler::new(ManualClock::new()));
//! let a = runner.insert_state(PassThrough::new("A"));
//! let b = runner.insert_state(PassThrough::new("B"));
//! runner.link(a, Link::always(b)).unwrap();
//!
//! assert!(runner.check_topology().is_success());
//! ```

pub mod rules;
pub mod violations;

pub use rules::check_topology;
pub use violations::TopologyError;
