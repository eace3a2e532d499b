//! Serialise environment mutations across tests.
//!
//! Configuration is read from process variables such as `SERVER`, so tests
//! that set them must not interleave. Hold an [`EnvLock`] for as long as the
//! variables are changed.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::{fmt, fmt::Formatter};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that holds the global environment lock.
pub struct EnvLock {
    _guard: MutexGuard<'static, ()>,
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLock").finish_non_exhaustive()
    }
}

impl EnvLock {
    /// Acquire the lock, recovering it if a previous holder panicked.
    pub fn acquire() -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Self { _guard: guard }
    }
}
