// keep_or_skip/src/guard/predicate.rs

//! The value a predicate hands back to the decision step.

use crate::core::context_data::ContextData;
use std::sync::Arc;

/// Outcome of one predicate evaluation.
///
/// `Invalid` covers every answer that is not a clean boolean. It is an expected
/// outcome, not an error: the guarded handlers are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
  Bool(bool),
  Invalid,
}

impl PredicateResult {
  pub fn as_bool(self) -> Option<bool> {
    match self {
      PredicateResult::Bool(b) => Some(b),
      PredicateResult::Invalid => None,
    }
  }
}

impl From<bool> for PredicateResult {
  fn from(value: bool) -> Self {
    PredicateResult::Bool(value)
  }
}

impl From<Option<bool>> for PredicateResult {
  fn from(value: Option<bool>) -> Self {
    value.map_or(PredicateResult::Invalid, PredicateResult::Bool)
  }
}

impl<E> From<Result<bool, E>> for PredicateResult {
  fn from(value: Result<bool, E>) -> Self {
    value.ok().into()
  }
}

/// Type-erased predicate stored by a guarded sequence.
pub type Predicate<TData> = Arc<dyn Fn(ContextData<TData>) -> PredicateResult + Send + Sync + 'static>;

/// Erases any closure whose answer converts into a `PredicateResult`.
pub fn predicate_fn<TData, R>(f: impl Fn(ContextData<TData>) -> R + Send + Sync + 'static) -> Predicate<TData>
where
  TData: 'static + Send + Sync,
  R: Into<PredicateResult>,
{
  Arc::new(move |ctx_data: ContextData<TData>| -> PredicateResult { f(ctx_data).into() })
}
