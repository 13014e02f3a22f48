// keep_or_skip/src/pipeline/execution.rs

//! Contains the `Pipeline::run()` method, responsible for executing the pipeline's steps and handlers.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::KeepOrSkipError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KeepOrSkipError> + Send + Sync + 'static,
{
  /// Executes the pipeline for one request.
  ///
  /// Steps run in order; within a step the `before`, `on` and `after` handlers run in
  /// registration order. A handler returning `Stop` ends the run with
  /// `PipelineResult::Stopped`, and a handler error ends it with that error.
  /// A non-optional step without any handler fails with `HandlerMissing`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(Level::INFO, step_name = step_name_str, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let phases = [
        ("before", self.before.get(step_name_str)),
        ("on", self.on.get(step_name_str)),
        ("after", self.after.get(step_name_str)),
      ];

      if phases.iter().all(|&(_, handlers)| handlers.map_or(true, |v| v.is_empty())) {
        if step_def.optional {
          event!(Level::DEBUG, step_name = step_name_str, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step_name = step_name_str, "Non-optional step has no handlers.");
        return Err(Err::from(KeepOrSkipError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name_str,
        step_index = step_idx,
        optional = step_def.optional
      );

      let outcome = async {
        for (phase, handlers) in phases {
          if let Some(handlers) = handlers {
            if run_phase(phase, handlers, &ctx_data).await? == PipelineControl::Stop {
              return Ok(PipelineControl::Stop);
            }
          }
        }
        Ok::<_, Err>(PipelineControl::Continue)
      }
      .instrument(step_span)
      .await?;

      if outcome == PipelineControl::Stop {
        return Ok(PipelineResult::Stopped);
      }
      event!(Level::DEBUG, step_name = step_name_str, "Step processing finished successfully.");
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  event!(Level::TRACE, phase, "Executing handlers.");
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::INFO, phase, handler_index = handler_idx, "Pipeline stopped by a handler.");
        return Ok(PipelineControl::Stop);
      }
      Err(e) => {
        event!(Level::ERROR, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PipelineControl::Continue)
}
