use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per session key. Turns for the same user run one at a
/// time; different users never contend.
#[derive(Debug, Default)]
pub struct SessionLocks {
    table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `key`. The lock is released when the
    /// returned guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Entries only referenced by the table are idle.
            table.retain(|k, l| k == key || Arc::strong_count(l) > 1);
            table
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    pub fn tracked(&self) -> usize {
        self.table
            .lock()
            .map(|t| t.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}
