// keep_or_skip/src/guard/debug.rs

//! Diagnostics toggle for guarded sequences.
//!
//! Two scopes exist: a process-wide setting changed through [`set_global_debug`], and a
//! per-sequence setting given to the builder. A local `Enabled`/`Disabled` always wins;
//! only a local `Unset` falls back to the global value. The result is captured once, when
//! the guarded sequence is built, so flipping the global toggle later does not affect
//! sequences that already exist.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{event, Level};

/// Tag prefixed to every warning emitted by this crate.
pub const WARNING_TAG: &str = "KeepOrSkipWarning: ";

pub(crate) const NON_BOOLEAN_PREDICATE_WARNING: &str =
  "The predicate parameter doesn't return a boolean value, middlewares will be skipped.";

static GLOBAL_DEBUG: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugSetting {
  Enabled,
  Disabled,
  #[default]
  Unset,
}

impl DebugSetting {
  /// Resolves this (local) setting against a global value.
  pub fn resolve(self, global: DebugSetting) -> bool {
    match self {
      DebugSetting::Enabled => true,
      DebugSetting::Disabled => false,
      DebugSetting::Unset => global == DebugSetting::Enabled,
    }
  }

  /// Resolves this (local) setting against the current process-wide toggle.
  pub fn resolve_global(self) -> bool {
    self.resolve(global_debug())
  }
}

impl From<bool> for DebugSetting {
  fn from(value: bool) -> Self {
    if value {
      DebugSetting::Enabled
    } else {
      DebugSetting::Disabled
    }
  }
}

impl From<Option<bool>> for DebugSetting {
  fn from(value: Option<bool>) -> Self {
    value.map_or(DebugSetting::Unset, DebugSetting::from)
  }
}

/// Sets the process-wide debug toggle. `Unset` is stored as disabled.
pub fn set_global_debug(value: impl Into<DebugSetting>) {
  let enabled = value.into() == DebugSetting::Enabled;
  GLOBAL_DEBUG.store(enabled, Ordering::SeqCst);
  event!(Level::DEBUG, enabled, "Global keep-or-skip debug toggled.");
}

pub fn global_debug() -> DebugSetting {
  GLOBAL_DEBUG.load(Ordering::SeqCst).into()
}

/// Emits one tagged warning line.
pub(crate) fn warn(msg: &str) {
  event!(target: "keep_or_skip", Level::WARN, "{}{}", WARNING_TAG, msg);
}
