//! Kernel Error Codes
//!
//! The error numbers that cross the user/kernel boundary. On a failed
//! syscall the positive code is placed in `v0` with the `a3` failure flag
//! set; userlevel libc converts that into `errno` and a `-1` return.
//!
//! Values follow the conventional POSIX numbering so user headers can be
//! shared with other systems.

use core::fmt;

/// A syscall error code.
///
/// Every handler returns `Result<_, Errno>`; the dispatcher encodes the
/// code into the trap frame. There is no partial-success state: a call
/// either yields a value or exactly one of these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Errno {
    /// Operation not permitted.
    Eperm = 1,
    /// No such file or directory.
    Enoent = 2,
    /// Hardware I/O error.
    Eio = 5,
    /// Bad file descriptor.
    Ebadf = 9,
    /// Out of memory.
    Enomem = 12,
    /// Bad user-space address.
    Efault = 14,
    /// Invalid argument.
    Einval = 22,
    /// Too many open files in system.
    Enfile = 23,
    /// No space left on device.
    Enospc = 28,
    /// File name too long.
    EnameTooLong = 36,
    /// No such system call.
    Enosys = 38,
}

impl Errno {
    /// The raw ABI value placed in the return register on failure.
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Eperm => "operation not permitted",
            Self::Enoent => "no such file or directory",
            Self::Eio => "input/output error",
            Self::Ebadf => "bad file descriptor",
            Self::Enomem => "out of memory",
            Self::Efault => "bad address",
            Self::Einval => "invalid argument",
            Self::Enfile => "too many open files in system",
            Self::Enospc => "no space left on device",
            Self::EnameTooLong => "file name too long",
            Self::Enosys => "no such system call",
        };
        write!(f, "{}", msg)
    }
}
