// keep_or_skip/src/guard/middlewares.rs

use crate::core::context::Handler;
use crate::error::KeepOrSkipError;

/// The handlers a guarded sequence wraps: one handler or an ordered list of them.
pub enum Middlewares<TData: Send + Sync + 'static, Err> {
  Single(Handler<TData, Err>),
  Many(Vec<Handler<TData, Err>>),
}

impl<TData: Send + Sync + 'static, Err> Middlewares<TData, Err> {
  pub fn len(&self) -> usize {
    match self {
      Middlewares::Single(_) => 1,
      Middlewares::Many(handlers) => handlers.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Normalizes to a non-empty list, preserving order.
  pub fn into_handlers(self) -> Result<Vec<Handler<TData, Err>>, KeepOrSkipError> {
    match self {
      Middlewares::Single(handler) => Ok(vec![handler]),
      Middlewares::Many(handlers) if handlers.is_empty() => Err(KeepOrSkipError::InvalidMiddlewaresParam),
      Middlewares::Many(handlers) => Ok(handlers),
    }
  }

  fn push(self, handler: Handler<TData, Err>) -> Self {
    match self {
      Middlewares::Single(first) => Middlewares::Many(vec![first, handler]),
      Middlewares::Many(mut handlers) => {
        handlers.push(handler);
        Middlewares::Many(handlers)
      }
    }
  }

  /// Appends `handler` to `existing`, starting a new single entry when there is none.
  pub(crate) fn append(existing: Option<Self>, handler: Handler<TData, Err>) -> Self {
    match existing {
      Some(middlewares) => middlewares.push(handler),
      None => Middlewares::Single(handler),
    }
  }
}

impl<TData: Send + Sync + 'static, Err> From<Handler<TData, Err>> for Middlewares<TData, Err> {
  fn from(handler: Handler<TData, Err>) -> Self {
    Middlewares::Single(handler)
  }
}

impl<TData: Send + Sync + 'static, Err> From<Vec<Handler<TData, Err>>> for Middlewares<TData, Err> {
  fn from(handlers: Vec<Handler<TData, Err>>) -> Self {
    Middlewares::Many(handlers)
  }
}

impl<TData: Send + Sync + 'static, Err> std::fmt::Debug for Middlewares<TData, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Middlewares::Single(_) => f.write_str("Middlewares::Single"),
      Middlewares::Many(handlers) => write!(f, "Middlewares::Many({})", handlers.len()),
    }
  }
}
