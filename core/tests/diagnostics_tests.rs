// tests/diagnostics_tests.rs
//
// Warnings are asserted through a scoped subscriber, so this file deliberately does
// not install the global test subscriber from `common`.
mod common;

use common::*;
use keep_or_skip::guard::WARNING_TAG;
use keep_or_skip::{
  global_debug, keep_or_skip, keep_or_skip_with_debug, set_global_debug, ContextData, DebugSetting, GuardBuilder,
  GuardConfig, GuardedSequence,
};
use serial_test::serial;

fn non_boolean_sequence(local: DebugSetting) -> GuardedSequence<TestContext, TestError> {
  keep_or_skip_with_debug(
    vec![create_simple_handler("h1"), create_simple_handler("h2")],
    |_ctx: ContextData<TestContext>| None::<bool>,
    local,
  )
  .unwrap()
}

fn run_passes(sequence: GuardedSequence<TestContext, TestError>, passes: usize) -> CapturedLogs {
  with_captured_warnings(move || async move {
    for _ in 0..passes {
      let ctx = ContextData::new(TestContext::default());
      sequence.run(ctx.clone()).await.unwrap();
      assert!(steps_of(&ctx).is_empty());
    }
  })
}

#[test]
#[serial]
fn test_debug_resolution_table() {
  use DebugSetting::*;
  let cases = [
    (false, Unset, false),
    (false, Disabled, false),
    (true, Disabled, false),
    (true, Unset, true),
    (true, Enabled, true),
    (false, Enabled, true),
  ];

  for (global, local, expected) in cases {
    set_global_debug(global);
    let sequence = non_boolean_sequence(local);
    assert_eq!(sequence.debug(), expected, "global={global} local={local:?}");

    let logs = run_passes(sequence, 1);
    assert_eq!(
      logs.count(NON_BOOLEAN_WARNING),
      usize::from(expected),
      "global={global} local={local:?}, logs: {}",
      logs.contents()
    );
  }
  set_global_debug(false);
}

#[test]
#[serial]
fn test_warning_is_emitted_once_per_pass_with_fixed_tag() {
  set_global_debug(false);
  let logs = run_passes(non_boolean_sequence(DebugSetting::Enabled), 3);

  assert_eq!(logs.count(NON_BOOLEAN_WARNING), 3, "logs: {}", logs.contents());
  assert_eq!(logs.count(WARNING_TAG), 3);
}

#[test]
#[serial]
fn test_boolean_answers_never_warn() {
  set_global_debug(true);
  let sequence = keep_or_skip(create_simple_handler("h"), |ctx: ContextData<TestContext>| {
    ctx.read().value < 0
  })
  .unwrap();
  set_global_debug(false);
  assert!(sequence.debug());

  let logs = with_captured_warnings(move || async move {
    for value in [-1, 1] {
      sequence.run(ContextData::new(TestContext::with_value(value))).await.unwrap();
    }
  });
  assert_eq!(logs.count(NON_BOOLEAN_WARNING), 0, "logs: {}", logs.contents());
}

#[test]
#[serial]
fn test_global_toggle_is_captured_at_build_time() {
  set_global_debug(false);
  let built_quiet = non_boolean_sequence(DebugSetting::Unset);
  set_global_debug(true);
  let built_loud = non_boolean_sequence(DebugSetting::Unset);
  set_global_debug(false);

  assert!(!built_quiet.debug());
  assert!(built_loud.debug());

  set_global_debug(true);
  let logs = run_passes(built_quiet, 1);
  set_global_debug(false);
  assert_eq!(logs.count(NON_BOOLEAN_WARNING), 0);

  let logs = run_passes(built_loud, 1);
  assert_eq!(logs.count(NON_BOOLEAN_WARNING), 1);
}

#[test]
#[serial]
fn test_global_setter_coerces_unset_to_disabled() {
  set_global_debug(true);
  assert_eq!(global_debug(), DebugSetting::Enabled);

  set_global_debug(DebugSetting::Unset);
  assert_eq!(global_debug(), DebugSetting::Disabled);

  set_global_debug(Some(true));
  assert_eq!(global_debug(), DebugSetting::Enabled);
  set_global_debug(None::<bool>);
  assert_eq!(global_debug(), DebugSetting::Disabled);
}

#[test]
#[serial]
fn test_explicit_config_overrides_global() {
  set_global_debug(false);
  let sequence = GuardBuilder::<TestContext, TestError>::with_config(GuardConfig {
    debug: DebugSetting::Enabled,
  })
  .middleware(create_simple_handler("h"))
  .predicate(|_ctx: ContextData<TestContext>| None::<bool>)
  .build()
  .unwrap();
  assert!(sequence.debug());

  let logs = run_passes(sequence, 2);
  assert_eq!(logs.count(NON_BOOLEAN_WARNING), 2);
}
