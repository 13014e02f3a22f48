// keep_or_skip/examples/basic_guard.rs

use keep_or_skip::{ContextData, GuardBuilder, KeepOrSkipError, Pipeline, PipelineControl, PipelineResult};
use tracing::info;

// 1. Request/response state for one pass through the pipeline.
#[derive(Clone, Debug, Default)]
struct RequestContext {
  path: String,
  is_admin: bool,
  response_log: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), KeepOrSkipError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Guarded Sequence Example ---");

  let mut pipeline = Pipeline::<RequestContext, KeepOrSkipError>::new(&[("admin_only", false, None), ("respond", false, None)]);

  // 2. Two handlers that should only run for admin requests.
  let admin_sequence = GuardBuilder::<RequestContext, KeepOrSkipError>::new()
    .middleware_fn(|ctx: ContextData<RequestContext>| async move {
      ctx.write().response_log.push("audit".to_string());
      Ok::<_, KeepOrSkipError>(PipelineControl::Continue)
    })
    .middleware_fn(|ctx: ContextData<RequestContext>| async move {
      ctx.write().response_log.push("admin panel".to_string());
      Ok::<_, KeepOrSkipError>(PipelineControl::Continue)
    })
    .predicate(|ctx: ContextData<RequestContext>| ctx.read().is_admin)
    .build()?;

  // 3. Install the guarded sequence, then a handler every request reaches.
  pipeline.use_guarded("admin_only", admin_sequence)?;
  pipeline.on_root("respond", |ctx: ContextData<RequestContext>| async move {
    let mut data = ctx.write();
    let line = format!("200 OK {}", data.path);
    data.response_log.push(line);
    Ok::<_, KeepOrSkipError>(PipelineControl::Continue)
  });

  // 4. One fresh context per request.
  for (path, is_admin) in [("/admin", true), ("/home", false)] {
    let ctx = ContextData::new(RequestContext {
      path: path.to_string(),
      is_admin,
      ..Default::default()
    });
    let result = pipeline.run(ctx.clone()).await?;
    assert_eq!(result, PipelineResult::Completed);
    info!(path, log = ?ctx.read().response_log, "Request handled.");
  }

  Ok(())
}
