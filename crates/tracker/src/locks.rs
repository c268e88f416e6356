use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

/// Per-prospect mutexes serializing mutations of one prospect and its
/// follow-ups. Unrelated prospects never wait on each other.
#[derive(Default, Clone)]
pub struct ProspectLocks {
    locks: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ProspectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_lock(&self, prospect_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&prospect_id) {
                return lock.clone();
            }
        }

        let mut locks = self.locks.write().await;
        locks
            .entry(prospect_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Waits for and holds the prospect's lock until the guard drops.
    pub async fn lock(&self, prospect_id: Uuid) -> OwnedMutexGuard<()> {
        self.get_lock(prospect_id).await.lock_owned().await
    }

    /// Drops the lock entry of a deleted prospect.
    pub async fn remove(&self, prospect_id: Uuid) {
        self.locks.write().await.remove(&prospect_id);
    }

    /// Drops the entry if nobody else holds or waits on it.
    pub async fn release(&self, prospect_id: Uuid) {
        let mut locks = self.locks.write().await;
        if locks
            .get(&prospect_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&prospect_id);
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_prospect_shares_lock() {
        let locks = ProspectLocks::new();
        let id = Uuid::new_v4();

        let a = locks.get_lock(id).await;
        let b = locks.get_lock(id).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len().await, 1);
    }

    #[tokio::test]
    async fn test_unrelated_prospects_do_not_block() {
        let locks = ProspectLocks::new();
        let _held = locks.lock(Uuid::new_v4()).await;

        let other = tokio::time::timeout(Duration::from_millis(100), locks.lock(Uuid::new_v4())).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_same_prospect_waits() {
        let locks = ProspectLocks::new();
        let id = Uuid::new_v4();
        let held = locks.lock(id).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.lock(id)).await;
        assert!(blocked.is_err());

        drop(held);
        let acquired = tokio::time::timeout(Duration::from_millis(100), locks.lock(id)).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_release_keeps_contended_locks() {
        let locks = ProspectLocks::new();
        let held = Uuid::new_v4();
        let idle = Uuid::new_v4();
        let guard = locks.lock(held).await;
        drop(locks.lock(idle).await);

        locks.release(held).await;
        locks.release(idle).await;
        assert_eq!(locks.len().await, 1);

        drop(guard);
        locks.release(held).await;
        assert_eq!(locks.len().await, 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let locks = ProspectLocks::new();
        let id = Uuid::new_v4();
        drop(locks.lock(id).await);

        locks.remove(id).await;
        assert_eq!(locks.len().await, 0);
    }
}
