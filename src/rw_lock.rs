// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Reentrant read-write lock over a pair of native mutexes.
// - The gate is held for an entire busy period: from the first acquisition
//   on an empty lock until the hold count returns to zero.
// - The monitor serializes access to the bookkeeping fields and is held
//   only transiently, never across a blocking gate acquisition.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

use crate::error::LockError;
use crate::platform::{NativeMutex, ThreadId, NATIVE_LOCKS};

/// The mode a lock is currently held in, as reported by [`RwLock::mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// No outstanding acquisitions.
    Unlocked,
    /// Held by one or more readers.
    Read,
    /// Held exclusively by a single writer thread.
    Write,
}

/// Bookkeeping fields. Read or written only while the monitor is held.
struct State {
    /// Outstanding acquisitions, reads and writes counted together.
    hold_count: u64,
    /// Set iff the lock is in write mode; names the one thread allowed to
    /// extend the write lock without re-contending the gate.
    writer: Option<ThreadId>,
    /// Monotonic: once set it is never cleared.
    destroyed: bool,
}

/// A reentrant read-write lock.
///
/// Any number of threads may hold overlapping shared (read) locks; an
/// exclusive (write) lock admits a single thread. A thread already holding
/// the write lock may re-acquire it, and may take nested shared locks,
/// without blocking on itself. Every acquisition must be paired with a
/// release, and the lock only returns to [`LockMode::Unlocked`] once the
/// whole stack has been released.
///
/// Writers contend with readers on equal terms: a steady stream of
/// overlapping readers can delay a waiting writer indefinitely. Blocking
/// operations have no timeout; callers who need bounded waiting build
/// backoff from the try variants.
pub struct RwLock {
    /// Exclusive reservation for the busy period.
    gate: NativeMutex,
    /// Serializes all access to `state`.
    monitor: NativeMutex,
    state: UnsafeCell<State>,
}

// Safety: `state` is only touched through the `Monitor` guard, which holds
// `monitor` for the duration of the access.
unsafe impl Send for RwLock {}
unsafe impl Sync for RwLock {}

/// RAII monitor hold: locks the monitor on construction, derefs to the
/// bookkeeping fields, unlocks on drop. Dropping the guard before a gate
/// acquisition keeps the "never hold both while blocking" rule visible in
/// the control flow.
struct Monitor<'a> {
    owner: &'a RwLock,
}

impl<'a> Monitor<'a> {
    fn enter(owner: &'a RwLock) -> Result<Self, LockError> {
        owner.monitor.lock()?;
        Ok(Self { owner })
    }
}

impl Deref for Monitor<'_> {
    type Target = State;

    fn deref(&self) -> &State {
        // Safety: the monitor is held for the lifetime of the guard.
        unsafe { &*self.owner.state.get() }
    }
}

impl DerefMut for Monitor<'_> {
    fn deref_mut(&mut self) -> &mut State {
        // Safety: as above, with `&mut self` for exclusivity.
        unsafe { &mut *self.owner.state.get() }
    }
}

impl Drop for Monitor<'_> {
    fn drop(&mut self) {
        let _ = self.owner.monitor.unlock();
    }
}

impl RwLock {
    /// Create an unlocked lock.
    ///
    /// Allocates the two native mutexes. If the second allocation fails the
    /// first is released before the error returns, so a partial failure
    /// leaks nothing.
    pub fn new() -> Result<Self, LockError> {
        let gate = NativeMutex::new()?;
        let monitor = NativeMutex::new()?;
        Ok(Self {
            gate,
            monitor,
            state: UnsafeCell::new(State {
                hold_count: 0,
                writer: None,
                destroyed: false,
            }),
        })
    }

    /// Whether this build provides real mutual exclusion.
    ///
    /// `false` on targets without native lock support, where every
    /// operation reports success but nothing is excluded and only
    /// single-threaded use is sound.
    pub const fn enforces_exclusion() -> bool {
        NATIVE_LOCKS
    }

    /// Acquire the exclusive (write) lock, blocking until available.
    ///
    /// Reentrant: the thread currently holding the write lock re-acquires
    /// by bumping the hold count, without touching the gate. Fails with
    /// [`LockError::InvalidLockState`] once the lock has been destroyed.
    pub fn lock(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.destroyed {
            return Err(LockError::InvalidLockState);
        }
        if st.writer != Some(me) {
            drop(st);
            self.gate.lock()?;
            st = self.reenter_after_gate()?;
            st.writer = Some(me);
        }
        st.hold_count += 1;
        Ok(())
    }

    /// Try to acquire the exclusive lock without blocking.
    ///
    /// Fails with [`LockError::Busy`] when the gate is held elsewhere,
    /// leaving the bookkeeping exactly as it was.
    pub fn try_lock(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.destroyed {
            return Err(LockError::InvalidLockState);
        }
        if st.writer != Some(me) {
            // The gate attempt cannot block, so the monitor stays held and
            // a failure has no side effects.
            if !self.gate.try_lock()? {
                return Err(LockError::Busy);
            }
            st.writer = Some(me);
        }
        st.hold_count += 1;
        Ok(())
    }

    /// Release the exclusive lock.
    ///
    /// Fails with [`LockError::InvalidLockState`] when the calling thread
    /// is not the current writer.
    pub fn unlock(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.writer != Some(me) {
            return Err(LockError::InvalidLockState);
        }
        st.hold_count -= 1;
        if st.hold_count == 0 {
            st.writer = None;
            self.gate.unlock()?;
        }
        Ok(())
    }

    /// Acquire a shared (read) lock, blocking while another thread's write
    /// lock holds the gate.
    ///
    /// Readers join an existing read-mode busy period without touching the
    /// gate, and the thread holding the write lock may take nested shared
    /// locks without demoting out of write mode.
    pub fn lock_shared(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.destroyed {
            return Err(LockError::InvalidLockState);
        }
        if st.hold_count == 0 || st.writer.is_some_and(|w| w != me) {
            drop(st);
            self.gate.lock()?;
            st = self.reenter_after_gate()?;
            // The gate was claimed for read mode: the writer identity
            // deliberately stays unset.
        }
        st.hold_count += 1;
        Ok(())
    }

    /// Try to acquire a shared lock without blocking.
    ///
    /// Fails with [`LockError::Busy`] when the gate is held elsewhere,
    /// leaving the bookkeeping exactly as it was.
    pub fn try_lock_shared(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.destroyed {
            return Err(LockError::InvalidLockState);
        }
        if st.hold_count == 0 || st.writer.is_some_and(|w| w != me) {
            if !self.gate.try_lock()? {
                return Err(LockError::Busy);
            }
        }
        st.hold_count += 1;
        Ok(())
    }

    /// Release a shared lock.
    ///
    /// Fails with [`LockError::InvalidLockState`] when a different thread
    /// holds the write lock, or when nothing is held at all.
    pub fn unlock_shared(&self) -> Result<(), LockError> {
        let me = ThreadId::current();
        let mut st = Monitor::enter(self)?;
        if st.writer.is_some_and(|w| w != me) || st.hold_count == 0 {
            return Err(LockError::InvalidLockState);
        }
        st.hold_count -= 1;
        if st.hold_count == 0 {
            st.writer = None;
            self.gate.unlock()?;
        }
        Ok(())
    }

    /// Report the current mode, blocking only for the transient monitor
    /// hold.
    pub fn mode(&self) -> Result<LockMode, LockError> {
        let st = Monitor::enter(self)?;
        Ok(if st.writer.is_some() {
            LockMode::Write
        } else if st.hold_count > 0 {
            LockMode::Read
        } else {
            LockMode::Unlocked
        })
    }

    /// Destroy the lock: mark it dead, then drain whatever busy period is
    /// in progress so no holder is still mid-operation when this returns.
    ///
    /// Fails with [`LockError::InvalidArgument`] on an already-destroyed
    /// lock. After `destroy` returns the lock is inert: all further
    /// acquisitions fail with [`LockError::InvalidLockState`]. The native
    /// mutexes themselves are reclaimed when the `RwLock` drops.
    ///
    /// Calling this from a thread that still holds the lock deadlocks in
    /// the drain, like any other self-wait.
    pub fn destroy(&self) -> Result<(), LockError> {
        {
            let mut st = Monitor::enter(self)?;
            if st.destroyed {
                return Err(LockError::InvalidArgument);
            }
            st.destroyed = true;
        }
        // Wait for the holders already in flight to finish up.
        self.gate.lock()?;
        self.gate.unlock()?;
        Ok(())
    }

    /// Re-acquire the monitor after winning the gate. If the monitor cannot
    /// be re-acquired, or the lock was destroyed while this thread was
    /// blocked, the gate is released before the error returns; an
    /// acquisition must never complete against a destroyed lock.
    fn reenter_after_gate(&self) -> Result<Monitor<'_>, LockError> {
        let st = match Monitor::enter(self) {
            Ok(st) => st,
            Err(e) => {
                let _ = self.gate.unlock();
                return Err(e);
            }
        };
        if st.destroyed {
            drop(st);
            let _ = self.gate.unlock();
            return Err(LockError::InvalidLockState);
        }
        Ok(st)
    }
}
