// keep_or_skip/src/pipeline/mod.rs

//! The host pipeline: named steps, handler registration, guarded-sequence installation
//! and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
