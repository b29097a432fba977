//! Machine and Thread-State Collaborators
//!
//! The clock, the reboot machinery, and the per-thread interrupt/lock
//! bookkeeping are owned by the embedding kernel. The dispatcher and the
//! `reboot`/`__time` handlers reach them through these traits.

use crate::errno::Errno;

/// A point in time as reported by the hardware clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timespec {
    /// Seconds since the epoch.
    pub secs: u64,
    /// Nanoseconds within the current second.
    pub nsecs: u32,
}

/// Validated `reboot(2)` request modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RebootMode {
    /// Reset and boot again.
    Reboot = 0,
    /// Halt without powering off.
    Halt = 1,
    /// Power the machine off.
    PowerOff = 2,
}

impl RebootMode {
    /// Decode the user-supplied `how` argument. Any other value is an
    /// invalid argument, not a fault.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Reboot),
            1 => Some(Self::Halt),
            2 => Some(Self::PowerOff),
            _ => None,
        }
    }
}

/// Platform services consumed by the system-level handlers.
pub trait Machine: Sync {
    /// Current wall-clock time.
    fn timestamp(&self) -> Timespec;

    /// Carry out a validated reboot request. Does not return on real
    /// hardware; the signature allows the VFS sync step to fail first.
    fn reboot(&self, mode: RebootMode) -> Result<(), Errno>;
}

/// Interrupt-priority and spinlock bookkeeping for the calling thread.
///
/// The dispatcher asserts on entry and exit that the thread runs at base
/// interrupt priority and holds no spinlocks. A violation is a bug in
/// prior kernel code, so it is fatal rather than reported to the user.
pub trait CurrentThread: Sync {
    /// True if the thread has raised its interrupt priority level.
    fn ipl_raised(&self) -> bool;

    /// Number of spinlocks the thread currently holds.
    fn spinlocks_held(&self) -> usize;
}
