// keep_or_skip/src/guard/state.rs

//! Decision state shared between the decision step and the guard steps of one
//! guarded sequence.

use crate::core::context_data::ContextData;
use crate::guard::debug::{self, NON_BOOLEAN_PREDICATE_WARNING};
use crate::guard::predicate::PredicateResult;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{event, Level};

static NEXT_SLOT: AtomicU64 = AtomicU64::new(1);

/// Skip policy: a clean `true` keeps the handlers, anything else skips them.
pub fn should_skip(result: PredicateResult) -> bool {
  match result {
    PredicateResult::Bool(keep) => !keep,
    PredicateResult::Invalid => true,
  }
}

/// Owns the skip flag of one guarded sequence.
///
/// The flag itself lives in the request's `ContextData`, under a slot id unique to this
/// state, so each in-flight request carries its own value. A request that has not
/// passed the decision step yet reads `false`.
#[derive(Debug)]
pub struct DecisionState {
  slot: u64,
  debug: bool,
}

impl DecisionState {
  pub fn new(debug: bool) -> Self {
    Self {
      slot: NEXT_SLOT.fetch_add(1, Ordering::Relaxed),
      debug,
    }
  }

  pub fn debug(&self) -> bool {
    self.debug
  }

  /// Records the decision for this request. Never fails.
  pub fn evaluate<TData: Send + Sync + 'static>(&self, ctx_data: &ContextData<TData>, result: PredicateResult) {
    let skip = should_skip(result);
    if result == PredicateResult::Invalid && self.debug {
      debug::warn(NON_BOOLEAN_PREDICATE_WARNING);
    }
    ctx_data.store_decision(self.slot, skip);
    event!(Level::TRACE, slot = self.slot, ?result, skip, "Guard decision recorded.");
  }

  pub fn is_skipped<TData: Send + Sync + 'static>(&self, ctx_data: &ContextData<TData>) -> bool {
    ctx_data.load_decision(self.slot).unwrap_or(false)
  }
}
