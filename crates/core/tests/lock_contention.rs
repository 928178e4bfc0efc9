//! Concurrency tests for `LockManager`.
//!
//! Many tasks race for the same objects on a multi-threaded runtime through a
//! shared manager. Exactly one contender may win each object, and the losers
//! must observe the winner as the holder.

use std::sync::Arc;

use chrono::Duration;
use curator_core::access::AccessGate;
use curator_core::error::CoreError;
use curator_core::lock::{LockManager, LockTarget};
use curator_core::memory::MemoryLockStore;
use curator_core::user::User;

const CONTENDERS: usize = 16;

fn shared_manager() -> Arc<LockManager> {
    let store = Arc::new(MemoryLockStore::new());
    Arc::new(LockManager::new(
        store,
        AccessGate::new(false),
        Duration::seconds(600),
    ))
}

// ---------------------------------------------------------------------------
// Test: exactly one of many concurrent set_lock calls wins
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_set_lock_has_single_winner() {
    let manager = shared_manager();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let user = User::staff(format!("editor-{i}"));
                manager.set_lock(&LockTarget::global("doc-1"), &user).await
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut losers = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(record) => winners.push(record),
            Err(CoreError::LockHeldByOther { holder_user_id, .. }) => losers.push(holder_user_id),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(losers.len(), CONTENDERS - 1);
    assert!(losers.iter().all(|holder| *holder == winners[0].holder_user_id));
}

// ---------------------------------------------------------------------------
// Test: distinct objects can each be locked by a different user
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_objects_lock_independently() {
    let manager = shared_manager();

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let user = User::registered(format!("owner-{i}"));
                let object_id = format!("doc-{i}");
                let target = LockTarget::owned(&object_id, &user.id);
                manager.set_lock(&target, &user).await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    for i in 0..CONTENDERS {
        let stranger = User::registered("stranger");
        assert!(manager.is_locked(&format!("doc-{i}"), &stranger).await.unwrap());
    }
}

// ---------------------------------------------------------------------------
// Test: a released lock is immediately available to the next contender
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_hands_lock_to_next_user() {
    let manager = shared_manager();
    let first = User::staff("first");
    let second = User::staff("second");
    let target = LockTarget::global("doc-1");

    manager.set_lock(&target, &first).await.unwrap();
    assert!(manager.set_lock(&target, &second).await.is_err());

    manager.release_lock("doc-1", &first).await;

    let record = manager.set_lock(&target, &second).await.unwrap();
    assert_eq!(record.holder_user_id, "second");
    assert!(manager.is_locked("doc-1", &first).await.unwrap());
}
