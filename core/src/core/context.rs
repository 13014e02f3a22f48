// keep_or_skip/src/core/context.rs

//! Defines the `Handler<TData, Err>` type used for every unit of work in a pipeline,
//! including the decision and guard steps produced by a guarded sequence.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a pipeline handler.
///
/// A handler is an asynchronous function that takes a clone of the request's
/// `ContextData<TData>` and returns a `Future` resolving to `Result<PipelineControl, Err>`.
///
/// Handlers are responsible for:
/// 1. Acquiring locks (`.read()` or `.write()`) on the `ContextData` to access or modify state.
/// 2. **Crucially, ensuring that lock guards are dropped BEFORE any `.await` suspension point.**
/// 3. Returning `PipelineControl::Continue` to forward control or `PipelineControl::Stop` to halt.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Boxes an async closure into a `Handler<TData, Err>`, converting the closure's
/// error type into `Err`.
pub fn handler_fn<TData, Err, F, UserErr>(
  f: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
  F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = f(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

/// Already-resolved future that forwards control without doing anything.
pub(crate) fn forward<Err: Send + 'static>() -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>> {
  Box::pin(std::future::ready(Ok(PipelineControl::Continue)))
}
