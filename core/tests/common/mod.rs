// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use keep_or_skip::{ContextData, KeepOrSkipError, PipelineControl};
use once_cell::sync::Lazy;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;

// --- Common Context Structs ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  /// Per-request input the predicates look at.
  pub value: i32,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

impl TestContext {
  pub fn with_value(value: i32) -> Self {
    Self {
      value,
      ..Default::default()
    }
  }
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("keep-or-skip error: {0}")]
  Framework(String), // code of the KeepOrSkipError, for Eq comparison

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<KeepOrSkipError> for TestError {
  fn from(e: KeepOrSkipError) -> Self {
    TestError::Framework(e.code().to_string())
  }
}

// --- Common Handler Creators ---
pub fn create_simple_handler(step_name: &'static str) -> keep_or_skip::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, "executed");
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> keep_or_skip::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

/// Sleeps before recording, so concurrent runs interleave.
pub fn create_yielding_handler(step_name: &'static str) -> keep_or_skip::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      tokio::time::sleep(std::time::Duration::from_millis(5)).await;
      ctx.write().steps_executed.push(step_name.to_string());
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn steps_of(ctx: &ContextData<TestContext>) -> Vec<String> {
  ctx.read().steps_executed.clone()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Capturing warnings ---

/// In-memory sink for a scoped fmt subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }

  /// Number of captured lines containing `needle`.
  pub fn count(&self, needle: &str) -> usize {
    self.contents().lines().filter(|line| line.contains(needle)).count()
  }
}

impl io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// Runs `f` on a current-thread runtime with a subscriber that records WARN events
/// into the returned buffer.
pub fn with_captured_warnings<F, Fut>(f: F) -> CapturedLogs
where
  F: FnOnce() -> Fut,
  Fut: std::future::Future<Output = ()>,
{
  let logs = CapturedLogs::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::WARN)
    .with_ansi(false)
    .with_writer(move || writer.clone())
    .finish();

  tracing::subscriber::with_default(subscriber, || {
    let rt = tokio::runtime::Builder::new_current_thread()
      .enable_time()
      .build()
      .unwrap();
    rt.block_on(f());
  });
  logs
}

pub const NON_BOOLEAN_WARNING: &str = "doesn't return a boolean value";
