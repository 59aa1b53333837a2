// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Stub facility for targets with no native lock support. Every operation
// succeeds without excluding anything, so the lock degrades to a
// single-thread-only bookkeeping structure. Callers detect this
// configuration through RwLock::enforces_exclusion().

use crate::error::LockError;

/// False: this build provides no real mutual exclusion.
pub const NATIVE_LOCKS: bool = false;

/// A mutex that never blocks and never excludes.
pub struct NativeMutex;

impl NativeMutex {
    pub fn new() -> Result<Self, LockError> {
        Ok(Self)
    }

    pub fn lock(&self) -> Result<(), LockError> {
        Ok(())
    }

    pub fn try_lock(&self) -> Result<bool, LockError> {
        Ok(true)
    }

    pub fn unlock(&self) -> Result<(), LockError> {
        Ok(())
    }
}

/// Thread identity on a target with a single thread of execution.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThreadId;

impl ThreadId {
    pub fn current() -> Self {
        Self
    }
}
