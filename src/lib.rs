// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Reentrant read-write lock built on native platform mutex primitives.
// The same gate/monitor protocol runs on every platform: POSIX pthread
// mutexes, Win32 semaphore handles, or a no-op stub where the target has
// no lock support at all.

mod error;
pub use error::LockError;

mod platform;

mod rw_lock;
pub use rw_lock::{LockMode, RwLock};
