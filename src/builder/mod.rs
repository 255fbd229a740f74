//! Builder API for ergonomic runner construction.

pub mod machine;

pub use machine::RunnerBuilder;
