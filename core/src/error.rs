// keep_or_skip/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeepOrSkipError {
  /// Raised while assembling a guarded sequence when no predicate was supplied.
  #[error("The predicate parameter must be a function.")]
  InvalidPredicateParam,

  /// Raised while assembling a guarded sequence when the middlewares are missing or empty.
  #[error("The middlewares parameter must be a function or a non-empty list of functions.")]
  InvalidMiddlewaresParam,

  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in user-provided handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal keep-or-skip error: {0}")]
  Internal(String),
}

impl KeepOrSkipError {
  /// Stable, machine-readable code for the error kind.
  pub fn code(&self) -> &'static str {
    match self {
      KeepOrSkipError::InvalidPredicateParam => "INVALID_PREDICATE_PARAM",
      KeepOrSkipError::InvalidMiddlewaresParam => "INVALID_MIDDLEWARES_PARAM",
      KeepOrSkipError::StepNotFound { .. } => "STEP_NOT_FOUND",
      KeepOrSkipError::HandlerMissing { .. } => "HANDLER_MISSING",
      KeepOrSkipError::HandlerError { .. } => "HANDLER_ERROR",
      KeepOrSkipError::Internal(_) => "INTERNAL",
    }
  }
}

impl From<AnyhowError> for KeepOrSkipError {
  fn from(err: AnyhowError) -> Self {
    // Don't nest our own error inside HandlerError(HandlerError(..)).
    match err.downcast::<KeepOrSkipError>() {
      Ok(inner) => inner,
      Err(err) => KeepOrSkipError::HandlerError { source: err },
    }
  }
}

pub type KeepOrSkipResult<T, E = KeepOrSkipError> = std::result::Result<T, E>;
