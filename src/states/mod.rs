//! Ready-made states.
//!
//! - [`PassThrough`]: no duration, performs a side effect after one tick
//! - [`Delay`]: waits for a duration, reporting progress every tick

mod delay;
mod pass_through;

pub use delay::Delay;
pub use pass_through::PassThrough;

use std::sync::Arc;

/// Zero-argument callback invoked by a state.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Progress callback receiving a value in `0.0..100.0`.
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;
