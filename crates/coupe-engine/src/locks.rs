//! Per-barber serialization for the overlap-check-and-insert window.
//!
//! SQLite gives us a single writer but no row-range locking, so the
//! check-then-insert in appointment creation needs its own critical
//! section. Creations for *different* barbers never conflict with each
//! other and proceed concurrently; creations for the same barber queue
//! on one async mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per barber id.
///
/// Cloning is cheap and all clones share the same registry, so every
/// engine handle in the process serializes on the same locks. Entries are
/// created on first use and kept for the life of the process; the set of
/// barbers is small and bounded.
#[derive(Debug, Clone, Default)]
pub struct BarberLocks {
    inner: Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl BarberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `barber_id`, waiting if another creation for
    /// the same barber is in flight. The guard is owned so it can be held
    /// across await points.
    pub async fn acquire(&self, barber_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("barber lock registry poisoned");
            map.entry(barber_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
