// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Native mutex facility, selected per target. Every backend exports the
// same surface: NativeMutex (init / blocking lock / try-lock / unlock, torn
// down on Drop), ThreadId (opaque equatable thread identity), and the
// NATIVE_LOCKS flag reporting whether exclusion is real on this build.

#[cfg(unix)]
pub mod posix;

#[cfg(windows)]
pub mod windows;

#[cfg(not(any(unix, windows)))]
pub mod fallback;

#[cfg(unix)]
pub use posix::{NativeMutex, ThreadId, NATIVE_LOCKS};

#[cfg(windows)]
pub use windows::{NativeMutex, ThreadId, NATIVE_LOCKS};

#[cfg(not(any(unix, windows)))]
pub use fallback::{NativeMutex, ThreadId, NATIVE_LOCKS};
