// keep_or_skip/src/pipeline/hooks.rs

//! Methods for registering `before`, `on`, and `after` handlers for pipeline steps,
//! and for installing guarded sequences.

use tracing::{event, instrument, Level};

use crate::core::context::{handler_fn, Handler};
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::KeepOrSkipError;
use crate::guard::builder::GuardedSequence;
use crate::pipeline::definition::Pipeline;
use std::future::Future;

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KeepOrSkipError> + Send + Sync + 'static,
{
  /// Registers a `before` hook for a given step.
  ///
  /// The `handler_fn` takes `ContextData<TData>` and returns a `Future`
  /// resolving to `Result<PipelineControl, UserProvidedErr>`, where
  /// `UserProvidedErr` must be convertible into the pipeline's `Err` type.
  pub fn before_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .before
      .entry(step_name.to_string())
      .or_default()
      .push(handler_fn(handler));
  }

  /// Registers an `on` hook for a given step.
  pub fn on_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self.on.entry(step_name.to_string()).or_default().push(handler_fn(handler));
  }

  /// Registers an `after` hook for a given step.
  pub fn after_root<F, UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserProvidedErr>> + Send + 'static,
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self.after.entry(step_name.to_string()).or_default().push(handler_fn(handler));
  }

  /// Registers an already boxed `on` handler.
  pub fn on_handler(&mut self, step_name: &str, handler: Handler<TData, Err>) {
    self.ensure_step_exists(step_name);
    self.on.entry(step_name.to_string()).or_default().push(handler);
  }

  /// Appends every step of a guarded sequence, in order, to the `on` phase of `step_name`.
  ///
  /// Unlike the hook methods this does not panic on an unknown step: it returns
  /// `StepNotFound` so it composes with the `Result` returned by `GuardBuilder::build`.
  #[instrument(
    name = "Pipeline::use_guarded",
    skip(self, sequence),
    fields(sequence_len = sequence.len())
  )]
  pub fn use_guarded(&mut self, step_name: &str, sequence: GuardedSequence<TData, Err>) -> Result<(), KeepOrSkipError> {
    self.find_step_mut(step_name)?;
    self
      .on
      .entry(step_name.to_string())
      .or_default()
      .extend(sequence.into_handlers());
    event!(Level::DEBUG, "Guarded sequence installed.");
    Ok(())
  }
}
