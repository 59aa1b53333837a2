// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX implementation of the native mutex facility: a heap-pinned
// process-private pthread_mutex_t, plus pthread-based thread identity.

use std::cell::UnsafeCell;
use std::ptr;

use crate::error::LockError;

/// True: this build provides real mutual exclusion.
pub const NATIVE_LOCKS: bool = true;

/// A process-private pthread mutex with default attributes.
///
/// The Box keeps the `pthread_mutex_t` at a stable address for its whole
/// lifetime; pthread requires the object not to move once initialised.
/// Default (non-error-checking) mutexes permit an unlock from a thread
/// other than the locker, which the gate protocol relies on: the last
/// reader may end a busy period a different reader began.
pub struct NativeMutex {
    inner: Box<UnsafeCell<libc::pthread_mutex_t>>,
}

// Safety: pthread mutexes are made for cross-thread use; the UnsafeCell
// contents are only ever handed to pthread calls.
unsafe impl Send for NativeMutex {}
unsafe impl Sync for NativeMutex {}

impl NativeMutex {
    /// Allocate and initialise a mutex.
    pub fn new() -> Result<Self, LockError> {
        let inner = Box::new(UnsafeCell::new(unsafe { std::mem::zeroed() }));
        let eno = unsafe { libc::pthread_mutex_init(inner.get(), ptr::null()) };
        if eno != 0 {
            return Err(LockError::from_errno(eno));
        }
        Ok(Self { inner })
    }

    /// Blocking acquire.
    pub fn lock(&self) -> Result<(), LockError> {
        let eno = unsafe { libc::pthread_mutex_lock(self.inner.get()) };
        if eno != 0 {
            return Err(LockError::from_errno(eno));
        }
        Ok(())
    }

    /// Non-blocking acquire. Returns `Ok(false)` when the mutex is held
    /// elsewhere.
    pub fn try_lock(&self) -> Result<bool, LockError> {
        let eno = unsafe { libc::pthread_mutex_trylock(self.inner.get()) };
        match eno {
            0 => Ok(true),
            libc::EBUSY => Ok(false),
            _ => Err(LockError::from_errno(eno)),
        }
    }

    /// Release the mutex.
    pub fn unlock(&self) -> Result<(), LockError> {
        let eno = unsafe { libc::pthread_mutex_unlock(self.inner.get()) };
        if eno != 0 {
            return Err(LockError::from_errno(eno));
        }
        Ok(())
    }
}

impl Drop for NativeMutex {
    fn drop(&mut self) {
        unsafe { libc::pthread_mutex_destroy(self.inner.get()) };
    }
}

/// Opaque identity of an OS thread.
///
/// `pthread_t` values must only be compared through `pthread_equal`, never
/// with `==` on the raw value.
#[derive(Clone, Copy)]
pub struct ThreadId(libc::pthread_t);

impl ThreadId {
    /// Identity of the calling thread.
    pub fn current() -> Self {
        Self(unsafe { libc::pthread_self() })
    }
}

impl PartialEq for ThreadId {
    fn eq(&self, other: &Self) -> bool {
        unsafe { libc::pthread_equal(self.0, other.0) != 0 }
    }
}
