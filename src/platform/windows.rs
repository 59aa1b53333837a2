// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Windows implementation of the native mutex facility: an unnamed binary
// semaphore handle, plus DWORD-based thread identity.

use std::ptr;

use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
use windows_sys::Win32::System::Threading::{
    CreateSemaphoreW, GetCurrentThreadId, ReleaseSemaphore, WaitForSingleObject, INFINITE,
};

use crate::error::LockError;

/// True: this build provides real mutual exclusion.
pub const NATIVE_LOCKS: bool = true;

/// An unnamed binary semaphore used as a plain mutual-exclusion lock.
///
/// A Win32 mutex HANDLE is recursive and owner-checked on release; the gate
/// protocol needs neither (the last reader may release a gate a different
/// reader acquired), so the semaphore form of a binary lock is used.
pub struct NativeMutex {
    handle: HANDLE,
}

// Safety: semaphore handles are process-wide kernel objects; any thread may
// wait on or release them.
unsafe impl Send for NativeMutex {}
unsafe impl Sync for NativeMutex {}

impl NativeMutex {
    /// Allocate a semaphore with one available slot.
    pub fn new() -> Result<Self, LockError> {
        let handle = unsafe { CreateSemaphoreW(ptr::null(), 1, 1, ptr::null()) };
        if handle.is_null() {
            return Err(LockError::from_win32(unsafe { GetLastError() }));
        }
        Ok(Self { handle })
    }

    /// Blocking acquire.
    pub fn lock(&self) -> Result<(), LockError> {
        match unsafe { WaitForSingleObject(self.handle, INFINITE) } {
            WAIT_OBJECT_0 => Ok(()),
            _ => Err(LockError::from_win32(unsafe { GetLastError() })),
        }
    }

    /// Non-blocking acquire. Returns `Ok(false)` when the slot is taken.
    pub fn try_lock(&self) -> Result<bool, LockError> {
        match unsafe { WaitForSingleObject(self.handle, 0) } {
            WAIT_OBJECT_0 => Ok(true),
            WAIT_TIMEOUT => Ok(false),
            _ => Err(LockError::from_win32(unsafe { GetLastError() })),
        }
    }

    /// Release the slot.
    pub fn unlock(&self) -> Result<(), LockError> {
        let ok = unsafe { ReleaseSemaphore(self.handle, 1, ptr::null_mut()) };
        if ok == 0 {
            return Err(LockError::from_win32(unsafe { GetLastError() }));
        }
        Ok(())
    }
}

impl Drop for NativeMutex {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.handle) };
    }
}

/// Opaque identity of an OS thread.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Identity of the calling thread.
    pub fn current() -> Self {
        Self(unsafe { GetCurrentThreadId() })
    }
}
