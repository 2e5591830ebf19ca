/*!
 * Scoped Lock Guards
 *
 * Guard-on-scope-exit mutual exclusion over an external resource
 */

use super::config::{AcquirePolicy, LockConfig};
use super::{LockError, LockResult};
use parking_lot::{Mutex, MutexGuard};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};
use tracing::debug;

/// Mutual-exclusion resource guarded by `ScopedLock`
#[derive(Debug)]
pub struct LockResource<T> {
    name: String,
    data: Mutex<T>,
    owner: Mutex<Option<ThreadId>>,
    acquisitions: AtomicU64,
    releases: AtomicU64,
    config: LockConfig,
}

impl<T> LockResource<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self::with_config(name, value, LockConfig::default())
    }

    pub fn with_config(name: impl Into<String>, value: T, config: LockConfig) -> Self {
        Self {
            name: name.into(),
            data: Mutex::new(value),
            owner: Mutex::new(None),
            acquisitions: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Whether some guard currently holds the resource
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.data.is_locked()
    }

    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Acquire)
    }

    /// Acquire with the resource's configured policy
    pub fn lock(&self) -> LockResult<ScopedLock<'_, T>> {
        ScopedLock::acquire(self)
    }

    /// Run `f` under the lock
    ///
    /// The guard is released before the closure's result, success or error,
    /// reaches the caller.
    pub fn guarded<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<LockError>,
    {
        let mut guard = ScopedLock::acquire(self)?;
        let result = f(&mut *guard);
        drop(guard);
        result
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    fn acquisition_error(&self, reason: &'static str) -> LockError {
        debug!(resource = %self.name, reason, "Lock acquisition failed");
        LockError::Acquisition {
            resource: self.name.clone(),
            reason,
        }
    }
}

/// RAII guard holding a `LockResource` for its whole lifetime
///
/// Not `Clone` and not `Send`: a guard belongs to the scope (and thread)
/// that acquired it.
///
/// # Example
///
/// ```rust
/// use ownership_kernel::{LockResource, ScopedLock};
///
/// let counter = LockResource::new("counter", 0u32);
/// {
///     let mut guard = ScopedLock::acquire(&counter).unwrap();
///     *guard += 1;
///     assert!(counter.is_locked());
/// }
/// assert!(!counter.is_locked());
/// ```
#[derive(Debug)]
pub struct ScopedLock<'a, T> {
    resource: &'a LockResource<T>,
    guard: MutexGuard<'a, T>,
}

impl<'a, T> ScopedLock<'a, T> {
    pub fn acquire(resource: &'a LockResource<T>) -> LockResult<Self> {
        Self::acquire_with(resource, resource.config.policy)
    }

    pub fn acquire_with(resource: &'a LockResource<T>, policy: AcquirePolicy) -> LockResult<Self> {
        let current = thread::current().id();
        if *resource.owner.lock() == Some(current) {
            return Err(resource.acquisition_error("already held by the current thread"));
        }

        let guard = match policy {
            AcquirePolicy::Block => resource.data.lock(),
            AcquirePolicy::FailFast => resource
                .data
                .try_lock()
                .ok_or_else(|| resource.acquisition_error("held by another owner"))?,
        };

        *resource.owner.lock() = Some(current);
        resource.acquisitions.fetch_add(1, Ordering::AcqRel);
        debug!(resource = %resource.name, ?policy, "Scoped lock acquired");

        Ok(Self { resource, guard })
    }

    pub fn resource(&self) -> &LockResource<T> {
        self.resource
    }
}

impl<T> Deref for ScopedLock<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for ScopedLock<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for ScopedLock<'_, T> {
    fn drop(&mut self) {
        // The mutex itself unlocks when `guard` drops right after this body
        *self.resource.owner.lock() = None;
        self.resource.releases.fetch_add(1, Ordering::AcqRel);
        debug!(resource = %self.resource.name, "Scoped lock released");
    }
}
