//! Per-user serialisation of cart writes and checkout.

use crate::ids::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per user, created on demand.
///
/// Cart writes and checkout for the same user run one after the other,
/// so nothing lands in a cart between the checkout snapshot and the clear.
/// Different users never wait on each other.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access for `user_id`.
    pub async fn acquire(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Nobody holds or waits on a lock the map alone references.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a lock currently held or awaited.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_waits() {
        let locks = Arc::new(UserLocks::new());
        let user = UserId::new("alice");

        let guard = locks.acquire(&user).await;
        let second = {
            let locks = locks.clone();
            let user = user.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!second.is_finished());

        drop(guard);
        second.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_users_do_not_wait() {
        let locks = UserLocks::new();
        let _alice = locks.acquire(&UserId::new("alice")).await;
        let bob = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&UserId::new("bob")),
        )
        .await;
        assert!(bob.is_ok());
    }

    #[tokio::test]
    async fn test_idle_locks_are_dropped() {
        let locks = UserLocks::new();
        drop(locks.acquire(&UserId::new("alice")).await);
        let _bob = locks.acquire(&UserId::new("bob")).await;
        assert_eq!(locks.active(), 1);
    }
}
