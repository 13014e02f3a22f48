// keep_or_skip/src/pipeline/definition.rs

//! Contains the `Pipeline<TData, Err>` struct definition and methods for its
//! construction and structural modification.

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::KeepOrSkipError;
use std::collections::HashMap;

/// An ordered list of named steps, each with `before`, `on` and `after` handlers.
///
/// This is the host that guarded sequences are installed into. It is built once and
/// can then be run for any number of requests, concurrently if shared behind an `Arc`.
///
/// `Err` must be `From<KeepOrSkipError>` so assembly and run errors can be reported
/// in the caller's error type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KeepOrSkipError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<KeepOrSkipError> + Send + Sync + 'static,
{
  /// Creates a new `Pipeline` with an initial set of step definitions.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Number of `on` handlers currently registered for a step.
  pub fn on_handler_count(&self, step_name: &str) -> usize {
    self.on.get(step_name).map_or(0, Vec::len)
  }

  pub(crate) fn find_step_mut(&mut self, step_name: &str) -> Result<&mut StepDef<TData>, KeepOrSkipError> {
    self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .ok_or_else(|| KeepOrSkipError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  /// Panics if the step is unknown. A typo in a step name is a setup bug.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "keep-or-skip setup error: Step '{}' not found in pipeline definition.",
        step_name
      );
    }
  }

  /// Appends a new step at the end of the pipeline.
  pub fn push_step<S: Into<String>>(&mut self, name: S, optional: bool, skip_if: Option<SkipCondition<TData>>) {
    let name: String = name.into();
    if self.steps.iter().any(|s| s.name == name) {
      panic!("keep-or-skip setup error: Step '{}' already exists in pipeline definition.", name);
    }
    self.steps.push(StepDef { name, optional, skip_if });
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> Result<(), KeepOrSkipError> {
    self.find_step_mut(step_name)?.optional = optional;
    Ok(())
  }

  pub fn set_skip_condition(
    &mut self,
    step_name: &str,
    skip_if: Option<SkipCondition<TData>>,
  ) -> Result<(), KeepOrSkipError> {
    self.find_step_mut(step_name)?.skip_if = skip_if;
    Ok(())
  }
}
