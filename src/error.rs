// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error taxonomy for lock operations, with the mapping from raw OS codes
// reported by the native mutex primitives.

use std::error::Error;
use std::fmt;

/// Errors reported by [`RwLock`](crate::RwLock) operations.
///
/// Nothing is retried internally; every failure returns synchronously to the
/// caller. Backoff on [`Busy`](LockError::Busy) is the caller's job, via the
/// try variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// Invalid input, e.g. destroying an already-destroyed lock.
    InvalidArgument,
    /// The platform could not allocate an underlying primitive.
    NoMemory,
    /// The platform denied the operation.
    Permission,
    /// A try variant could not immediately acquire exclusivity.
    Busy,
    /// The caller attempted to release a mode it does not hold, or to
    /// acquire a destroyed lock.
    InvalidLockState,
    /// Unclassified platform failure, carrying the raw OS code.
    Unknown(i32),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::NoMemory => f.write_str("out of memory"),
            Self::Permission => f.write_str("permission denied"),
            Self::Busy => f.write_str("lock is busy"),
            Self::InvalidLockState => f.write_str("invalid lock state"),
            Self::Unknown(code) => write!(f, "unknown platform error ({code})"),
        }
    }
}

impl Error for LockError {}

#[cfg(unix)]
impl LockError {
    /// Classify a nonzero errno from a pthread call.
    pub(crate) fn from_errno(eno: i32) -> Self {
        match eno {
            libc::ENOMEM => Self::NoMemory,
            libc::EPERM => Self::Permission,
            libc::EBUSY => Self::Busy,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(windows)]
impl LockError {
    /// Classify a Win32 error code from `GetLastError`.
    pub(crate) fn from_win32(code: u32) -> Self {
        use windows_sys::Win32::Foundation::{
            ERROR_ACCESS_DENIED, ERROR_NOT_ENOUGH_MEMORY, ERROR_OUTOFMEMORY,
        };
        match code {
            ERROR_NOT_ENOUGH_MEMORY | ERROR_OUTOFMEMORY => Self::NoMemory,
            ERROR_ACCESS_DENIED => Self::Permission,
            other => Self::Unknown(other as i32),
        }
    }
}
