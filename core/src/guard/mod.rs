// keep_or_skip/src/guard/mod.rs

//! Conditional execution of handlers.
//!
//! [`GuardBuilder`] (or the [`keep_or_skip`] shorthand) wraps one or more handlers behind a
//! predicate and produces a [`GuardedSequence`] that is installed into a pipeline step.

pub mod builder;
pub mod debug;
pub mod middlewares;
pub mod predicate;
pub mod state;

pub use builder::{keep_or_skip, keep_or_skip_with_debug, GuardBuilder, GuardConfig, GuardedSequence};
pub use debug::{global_debug, set_global_debug, DebugSetting, WARNING_TAG};
pub use middlewares::Middlewares;
pub use predicate::{predicate_fn, Predicate, PredicateResult};
pub use state::DecisionState;
