// keep_or_skip/examples/debug_warnings.rs

use keep_or_skip::{
  keep_or_skip, keep_or_skip_with_debug, set_global_debug, ContextData, DebugSetting, KeepOrSkipError, PipelineControl,
};
use tracing::info;

#[derive(Clone, Debug, Default)]
struct RequestContext {
  header: Option<String>,
  handled: bool,
}

fn mark_handled() -> keep_or_skip::Handler<RequestContext, KeepOrSkipError> {
  Box::new(|ctx: ContextData<RequestContext>| {
    Box::pin(async move {
      ctx.write().handled = true;
      Ok(PipelineControl::Continue)
    })
  })
}

// The predicate cannot always answer: a missing header gives `None`.
fn header_is_yes(ctx: ContextData<RequestContext>) -> Option<bool> {
  ctx.read().header.as_deref().map(|h| h == "yes")
}

#[tokio::main]
async fn main() -> Result<(), KeepOrSkipError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  // Global toggle on: sequences built from now on warn about non-boolean answers...
  set_global_debug(true);
  let loud = keep_or_skip(mark_handled(), header_is_yes)?;
  // ...unless they opt out locally.
  let quiet = keep_or_skip_with_debug(mark_handled(), header_is_yes, DebugSetting::Disabled)?;
  set_global_debug(false);

  for (name, sequence) in [("loud", &loud), ("quiet", &quiet)] {
    let ctx = ContextData::new(RequestContext::default());
    sequence.run(ctx.clone()).await?;
    info!(name, handled = ctx.read().handled, "Request without header.");
  }

  Ok(())
}
