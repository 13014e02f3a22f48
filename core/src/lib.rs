// src/lib.rs

//! keep-or-skip: conditional execution of handlers inside an async pipeline.
//!
//! Wrap one or more handlers behind a predicate and the resulting guarded sequence
//! runs them only when the predicate returns `true` for the current request:
//!  - The predicate is evaluated once per pass, by a decision step placed in front
//!    of the wrapped handlers.
//!  - A predicate that does not give a clean boolean skips the handlers and, when
//!    diagnostics are enabled, logs a warning.
//!  - Diagnostics follow a global toggle that a per-sequence setting can override.
//!  - Skip decisions are stored per request, so one pipeline can serve concurrent
//!    requests.

pub mod core;
pub mod error;
pub mod guard;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::context::{handler_fn, Handler};
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::StepDef;

pub use crate::guard::{
  global_debug, keep_or_skip, keep_or_skip_with_debug, set_global_debug, DebugSetting, GuardBuilder, GuardConfig,
  GuardedSequence, Middlewares, PredicateResult,
};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{KeepOrSkipError, KeepOrSkipResult};

/*
    Typical use:
    1. Define a context struct `MyCtx` holding the request and the response being built.
    2. Build a guarded sequence:
         GuardBuilder::new()
           .middleware_fn(auth)
           .middleware_fn(audit)
           .predicate(|ctx: ContextData<MyCtx>| ctx.read().needs_auth)
           .build()?
    3. Install it into a step with `pipeline.use_guarded("step", sequence)?`.
    4. Run the pipeline once per request with a fresh `ContextData<MyCtx>`.
*/
