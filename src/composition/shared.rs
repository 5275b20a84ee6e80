//! Thread-safe composable handle

use crate::composition::behaviors::{Behavior, OwnerHandle};
use crate::composition::composable::Composable;
use crate::DelegationResult;
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::sync::Arc;

/// A [`Composable`] behind a single mutex.
///
/// Every operation holds the lock for its whole duration, so attachment,
/// detachment and resolution never interleave. Cloning the handle shares the
/// same object; use [`duplicate`](Self::duplicate) for composable clone semantics.
///
/// Behavior methods run while the lock is held and must not call back into the
/// same handle.
#[derive(Clone)]
pub struct SharedComposable {
    inner: Arc<Mutex<Composable>>,
}

impl SharedComposable {
    pub fn new(composable: Composable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(composable)),
        }
    }

    /// Lock the composable for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, Composable> {
        self.inner.lock()
    }

    pub fn with<R>(&self, f: impl FnOnce(&Composable) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Composable) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn handle(&self) -> OwnerHandle {
        self.inner.lock().handle().clone()
    }

    pub fn attach_behavior<B: Behavior>(
        &self,
        name: impl Into<String>,
        behavior: B,
    ) -> DelegationResult<Option<Box<dyn Behavior>>> {
        self.inner.lock().attach_behavior(name, behavior)
    }

    pub fn detach_behavior(&self, name: &str) -> Option<Box<dyn Behavior>> {
        self.inner.lock().detach_behavior(name)
    }

    pub fn get(&self, name: &str) -> DelegationResult<Value> {
        self.inner.lock().get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.lock().has(name)
    }

    pub fn set(&self, name: &str, value: Value) -> DelegationResult<()> {
        self.inner.lock().set(name, value)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> DelegationResult<Value> {
        self.inner.lock().call(name, args)
    }

    #[track_caller]
    pub fn unset(&self, name: &str) -> DelegationResult<()> {
        self.inner.lock().unset(name)
    }

    /// Clone the underlying composable into a new, independent handle
    pub fn duplicate(&self) -> Self {
        Self::new(self.inner.lock().clone())
    }

    /// Whether both handles share the same composable
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Composable> for SharedComposable {
    fn from(composable: Composable) -> Self {
        Self::new(composable)
    }
}

impl std::fmt::Debug for SharedComposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedComposable")
            .field(&*self.inner.lock())
            .finish()
    }
}
