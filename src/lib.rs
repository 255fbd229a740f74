//! Linkstate: a cooperative, tick-driven state machine
//!
//! One state runs at a time. Each state performs a long-running,
//! interruptible unit of work on a cooperative scheduler, and the links
//! attached to it decide which state runs next once that work is done.
//!
//! # Core Concepts
//!
//! - **State**: application behaviour with `enter`, `execute` and `exit` hooks
//! - **Link**: a predicate naming the next state, unconditional or signal-gated
//! - **Runner**: owns the current state, drives its lifecycle and follows links
//! - **Scheduler**: polls resumable units once per tick; injected into the runner
//!
//! # Example
//!
//! ```rust
//! use linkstate::core::{Link, Signal};
//! use linkstate::runner::Runner;
//! use linkstate::scheduler::{LocalScheduler, ManualClock};
//! use linkstate::states::{Delay, PassThrough};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut runner = Runner::new(LocalScheduler::new(clock.clone()));
//!
//! let splash = runner.insert_state(Delay::new("Splash", Duration::from_secs(2)));
//! let menu = runner.insert_state(PassThrough::new("Menu"));
//! let game = runner.insert_state(PassThrough::new("Game"));
//!
//! let start_pressed = Signal::new();
//! runner.link(splash, Link::always(menu)).unwrap();
//! runner.link(menu, Link::on_signal(&start_pressed, game)).unwrap();
//!
//! runner.run_from(splash).unwrap();
//! clock.advance(Duration::from_secs(2));
//! runner.tick().unwrap();
//! runner.tick().unwrap();
//! assert_eq!(runner.current_name(), Some("Menu"));
//!
//! start_pressed.raise();
//! runner.tick().unwrap();
//! runner.tick().unwrap();
//! assert_eq!(runner.current_name(), Some("Game"));
//! ```

pub mod builder;
pub mod core;
pub mod runner;
pub mod scheduler;
pub mod states;
pub mod topology;

// Re-export commonly used types
pub use builder::RunnerBuilder;
pub use self::core::{Link, Signal, State, StateId};
pub use runner::{MachineError, Runner};
pub use scheduler::{LocalScheduler, Scheduler, Step, Task, TickContext};
