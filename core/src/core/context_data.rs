// keep_or_skip/src/core/context_data.rs
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to the state of one in-flight request.
///
/// Every clone points at the same data. Besides the caller's `T`, the handle carries the
/// decision slots written by guarded sequences, so a skip decision made for one request
/// can never be observed by another request running through the same pipeline.
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points in asynchronous code.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static> {
  data: Arc<RwLock<T>>,
  decisions: Arc<Mutex<HashMap<u64, bool>>>,
}

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData {
      data: Arc::new(RwLock::new(data)),
      decisions: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// Acquires a read lock.
  /// The returned guard MUST be dropped before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.data.read()
  }

  /// Acquires a write lock.
  /// The returned guard MUST be dropped before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.data.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.data.try_read()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.data.try_write()
  }

  // Example: context_data.map_read(|data| &data.some_field)
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  pub fn map_write<F, U: ?Sized>(&self, f: F) -> MappedRwLockWriteGuard<'_, U>
  where
    F: FnOnce(&mut T) -> &mut U,
  {
    RwLockWriteGuard::map(self.write(), f)
  }

  /// True when both handles refer to the same request.
  pub fn same_request(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.data, &other.data)
  }

  pub(crate) fn store_decision(&self, slot: u64, skip: bool) {
    self.decisions.lock().insert(slot, skip);
  }

  pub(crate) fn load_decision(&self, slot: u64) -> Option<bool> {
    self.decisions.lock().get(&slot).copied()
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData {
      data: Arc::clone(&self.data),
      decisions: Arc::clone(&self.decisions),
    }
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
