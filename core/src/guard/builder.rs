// keep_or_skip/src/guard/builder.rs

//! Assembles guarded sequences.
//!
//! A guarded sequence is the ordered list `[decision, guard(h1), …, guard(hn)]`. The
//! decision step evaluates the predicate and records whether to skip; every guard step
//! then either forwards control directly or hands the request to its wrapped handler.

use crate::core::context::{forward, handler_fn, Handler};
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::{KeepOrSkipError, KeepOrSkipResult};
use crate::guard::debug::DebugSetting;
use crate::guard::middlewares::Middlewares;
use crate::guard::predicate::{predicate_fn, Predicate, PredicateResult};
use crate::guard::state::DecisionState;

use std::future::Future;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Explicit settings threaded into a [`GuardBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardConfig {
  /// Local diagnostics override. `Unset` defers to the global toggle.
  pub debug: DebugSetting,
}

/// Fluent builder for a [`GuardedSequence`].
///
/// Nothing is validated until [`GuardBuilder::build`]: a missing predicate fails with
/// `InvalidPredicateParam`, then missing or empty middlewares fail with
/// `InvalidMiddlewaresParam`.
pub struct GuardBuilder<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  middlewares: Option<Middlewares<TData, Err>>,
  predicate: Option<Predicate<TData>>,
  config: GuardConfig,
}

impl<TData, Err> Default for GuardBuilder<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<TData, Err> GuardBuilder<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  pub fn new() -> Self {
    Self::with_config(GuardConfig::default())
  }

  pub fn with_config(config: GuardConfig) -> Self {
    Self {
      middlewares: None,
      predicate: None,
      config,
    }
  }

  /// Replaces the wrapped handlers.
  pub fn middlewares(mut self, middlewares: impl Into<Middlewares<TData, Err>>) -> Self {
    self.middlewares = Some(middlewares.into());
    self
  }

  /// Appends one boxed handler.
  pub fn middleware(mut self, handler: Handler<TData, Err>) -> Self {
    self.middlewares = Some(Middlewares::append(self.middlewares.take(), handler));
    self
  }

  /// Appends an async closure as a handler, converting its error into `Err`.
  pub fn middleware_fn<F, UserErr>(self, f: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static) -> Self
  where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.middleware(handler_fn(f))
  }

  /// Sets the predicate. Any answer convertible into [`PredicateResult`] is accepted;
  /// `bool` is the usual one.
  pub fn predicate<R>(mut self, f: impl Fn(ContextData<TData>) -> R + Send + Sync + 'static) -> Self
  where
    R: Into<PredicateResult>,
  {
    self.predicate = Some(predicate_fn(f));
    self
  }

  pub fn erased_predicate(mut self, predicate: Predicate<TData>) -> Self {
    self.predicate = Some(predicate);
    self
  }

  /// Local diagnostics override.
  pub fn debug(mut self, setting: impl Into<DebugSetting>) -> Self {
    self.config.debug = setting.into();
    self
  }

  #[instrument(
    name = "GuardBuilder::build",
    skip_all,
    fields(
      context_data_type = %std::any::type_name::<TData>(),
      num_middlewares = self.middlewares.as_ref().map_or(0, |m| m.len()),
    ),
    err(Display)
  )]
  pub fn build(self) -> KeepOrSkipResult<GuardedSequence<TData, Err>> {
    let predicate = self.predicate.ok_or(KeepOrSkipError::InvalidPredicateParam)?;
    let handlers = self
      .middlewares
      .ok_or(KeepOrSkipError::InvalidMiddlewaresParam)?
      .into_handlers()?;

    let debug = self.config.debug.resolve_global();
    let state = Arc::new(DecisionState::new(debug));

    let mut steps: Vec<SharedHandler<TData, Err>> = Vec::with_capacity(handlers.len() + 1);
    steps.push(Arc::new(decision_step(predicate, state.clone())));
    steps.extend(
      handlers
        .into_iter()
        .enumerate()
        .map(|(index, handler)| Arc::new(guard_step(index, handler, state.clone()))),
    );

    event!(
      Level::DEBUG,
      num_steps = steps.len(),
      effective_debug = state.debug(),
      "Guarded sequence built."
    );
    Ok(GuardedSequence { steps, state })
  }
}

fn decision_step<TData, Err>(predicate: Predicate<TData>, state: Arc<DecisionState>) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  Box::new(move |ctx_data: ContextData<TData>| {
    let result = predicate(ctx_data.clone());
    state.evaluate(&ctx_data, result);
    forward::<Err>()
  })
}

fn guard_step<TData, Err>(index: usize, handler: Handler<TData, Err>, state: Arc<DecisionState>) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  Box::new(move |ctx_data: ContextData<TData>| {
    if state.is_skipped(&ctx_data) {
      event!(Level::TRACE, handler_index = index, "Guarded handler skipped.");
      forward::<Err>()
    } else {
      handler(ctx_data)
    }
  })
}

type SharedHandler<TData, Err> = Arc<Handler<TData, Err>>;

/// The output of a [`GuardBuilder`]: one decision step followed by one guard step per
/// wrapped handler, in the order the handlers were supplied.
///
/// Cloning is cheap and keeps the decision state: every clone installed in a pipeline
/// re-evaluates the same predicate and drives the same guards, so one sequence can be
/// placed at several positions of a route.
pub struct GuardedSequence<TData, Err>
where
  TData: 'static + Send + Sync,
{
  steps: Vec<SharedHandler<TData, Err>>,
  state: Arc<DecisionState>,
}

impl<TData, Err> Clone for GuardedSequence<TData, Err>
where
  TData: 'static + Send + Sync,
{
  fn clone(&self) -> Self {
    Self {
      steps: self.steps.clone(),
      state: Arc::clone(&self.state),
    }
  }
}

impl<TData, Err> GuardedSequence<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
{
  /// Number of steps, i.e. wrapped handlers + 1.
  pub fn len(&self) -> usize {
    self.steps.len()
  }

  /// Always false: a sequence holds at least the decision step and one guard.
  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Effective diagnostics setting captured at build time.
  pub fn debug(&self) -> bool {
    self.state.debug()
  }

  /// Whether the guard steps would currently skip for this request.
  pub fn is_skipped(&self, ctx_data: &ContextData<TData>) -> bool {
    self.state.is_skipped(ctx_data)
  }

  /// Whether both values drive the same decision state.
  pub fn shares_state_with(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.state, &other.state)
  }

  /// Boxed handlers ready to be appended to a pipeline step.
  pub fn into_handlers(self) -> Vec<Handler<TData, Err>> {
    self
      .steps
      .into_iter()
      .map(|step| -> Handler<TData, Err> { Box::new(move |ctx_data: ContextData<TData>| step(ctx_data)) })
      .collect()
  }

  /// Runs the steps in order against one request, without a host pipeline.
  /// Stops early when a wrapped handler returns `Stop`.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineControl, Err> {
    for step in &self.steps {
      if step(ctx_data.clone()).await? == PipelineControl::Stop {
        return Ok(PipelineControl::Stop);
      }
    }
    Ok(PipelineControl::Continue)
  }
}

impl<TData, Err> std::fmt::Debug for GuardedSequence<TData, Err>
where
  TData: 'static + Send + Sync,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GuardedSequence")
      .field("len", &self.steps.len())
      .field("state", &self.state)
      .finish()
  }
}

/// Wraps `middlewares` so they only run when `predicate` returns `true` for the request.
/// Diagnostics follow the global toggle.
pub fn keep_or_skip<TData, Err, R>(
  middlewares: impl Into<Middlewares<TData, Err>>,
  predicate: impl Fn(ContextData<TData>) -> R + Send + Sync + 'static,
) -> KeepOrSkipResult<GuardedSequence<TData, Err>>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
  R: Into<PredicateResult>,
{
  keep_or_skip_with_debug(middlewares, predicate, DebugSetting::Unset)
}

/// Same as [`keep_or_skip`] with a local diagnostics override.
pub fn keep_or_skip_with_debug<TData, Err, R>(
  middlewares: impl Into<Middlewares<TData, Err>>,
  predicate: impl Fn(ContextData<TData>) -> R + Send + Sync + 'static,
  debug: impl Into<DebugSetting>,
) -> KeepOrSkipResult<GuardedSequence<TData, Err>>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
  R: Into<PredicateResult>,
{
  GuardBuilder::new()
    .middlewares(middlewares)
    .predicate(predicate)
    .debug(debug)
    .build()
}
