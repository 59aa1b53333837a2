// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Lifecycle tests: construction, the drain-and-destroy protocol, and
// behavior of a destroyed lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reentrant_rwlock::{LockError, LockMode, RwLock};

#[test]
fn new_lock_is_unlocked() {
    let lock = RwLock::new().expect("new");
    assert_eq!(lock.mode().expect("mode"), LockMode::Unlocked);
}

#[test]
fn native_builds_enforce_exclusion() {
    #[cfg(any(unix, windows))]
    assert!(RwLock::enforces_exclusion());
}

#[test]
fn destroy_idle_lock() {
    let lock = RwLock::new().expect("new");
    lock.destroy().expect("destroy");
}

#[test]
fn destroy_twice_fails() {
    let lock = RwLock::new().expect("new");
    lock.destroy().expect("destroy");
    assert_eq!(lock.destroy(), Err(LockError::InvalidArgument));
}

#[test]
fn destroyed_lock_rejects_acquisitions() {
    let lock = RwLock::new().expect("new");
    lock.destroy().expect("destroy");

    assert_eq!(lock.lock(), Err(LockError::InvalidLockState));
    assert_eq!(lock.try_lock(), Err(LockError::InvalidLockState));
    assert_eq!(lock.lock_shared(), Err(LockError::InvalidLockState));
    assert_eq!(lock.try_lock_shared(), Err(LockError::InvalidLockState));

    // Releases on the drained lock are misuse as well.
    assert_eq!(lock.unlock(), Err(LockError::InvalidLockState));
    assert_eq!(lock.unlock_shared(), Err(LockError::InvalidLockState));

    // The drained bookkeeping still reads as unlocked.
    assert_eq!(lock.mode().expect("mode"), LockMode::Unlocked);
}

#[test]
fn destroy_waits_for_writer() {
    let lock = Arc::new(RwLock::new().expect("new"));
    let destroyed = Arc::new(AtomicBool::new(false));

    lock.lock().expect("lock");

    let lock_d = Arc::clone(&lock);
    let destroyed_d = Arc::clone(&destroyed);
    let destroyer = thread::spawn(move || {
        lock_d.destroy().expect("destroy");
        destroyed_d.store(true, Ordering::SeqCst);
    });

    // The destroyer must stay blocked in the drain while we hold the lock.
    thread::sleep(Duration::from_millis(50));
    assert!(!destroyed.load(Ordering::SeqCst));

    lock.unlock().expect("unlock");
    destroyer.join().unwrap();
    assert!(destroyed.load(Ordering::SeqCst));

    assert_eq!(lock.lock(), Err(LockError::InvalidLockState));
}

#[test]
fn destroy_waits_for_readers() {
    let lock = Arc::new(RwLock::new().expect("new"));
    let destroyed = Arc::new(AtomicBool::new(false));

    lock.lock_shared().expect("lock_shared");
    lock.lock_shared().expect("recursive lock_shared");

    let lock_d = Arc::clone(&lock);
    let destroyed_d = Arc::clone(&destroyed);
    let destroyer = thread::spawn(move || {
        lock_d.destroy().expect("destroy");
        destroyed_d.store(true, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(50));
    assert!(!destroyed.load(Ordering::SeqCst));

    // The drain only completes once the whole recursive stack unwinds.
    lock.unlock_shared().expect("unlock_shared 1");
    thread::sleep(Duration::from_millis(20));
    assert!(!destroyed.load(Ordering::SeqCst));

    lock.unlock_shared().expect("unlock_shared 2");
    destroyer.join().unwrap();
    assert!(destroyed.load(Ordering::SeqCst));
}

// A fresh lock behaves identically to one that never saw the destroyed
// object; destruction does not poison new instances.
#[test]
fn fresh_lock_after_destroy() {
    let old = RwLock::new().expect("new");
    old.lock().expect("lock");
    old.unlock().expect("unlock");
    old.destroy().expect("destroy");

    let fresh = RwLock::new().expect("new fresh");
    fresh.lock().expect("lock fresh");
    assert_eq!(fresh.mode().expect("mode"), LockMode::Write);
    fresh.unlock().expect("unlock fresh");
    assert_eq!(fresh.mode().expect("mode"), LockMode::Unlocked);
    fresh.destroy().expect("destroy fresh");
}

// An acquirer that loses the race with destroy backs out instead of
// completing against the dead lock.
#[test]
fn blocked_acquirer_fails_after_destroy() {
    let lock = Arc::new(RwLock::new().expect("new"));

    lock.lock().expect("lock");

    let lock_w = Arc::clone(&lock);
    let waiter = thread::spawn(move || {
        // Blocks on the gate behind the main thread's write lock.
        lock_w.lock()
    });

    thread::sleep(Duration::from_millis(50));

    let lock_d = Arc::clone(&lock);
    let destroyer = thread::spawn(move || lock_d.destroy());

    thread::sleep(Duration::from_millis(50));
    lock.unlock().expect("unlock");

    // The waiter wins the gate only after the destroy mark is already set,
    // so it must release the gate again and report the dead lock rather
    // than complete the acquisition.
    assert_eq!(waiter.join().unwrap(), Err(LockError::InvalidLockState));
    destroyer.join().unwrap().expect("destroy");

    assert_eq!(lock.mode().expect("mode"), LockMode::Unlocked);
}
