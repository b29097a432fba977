//! User-Memory Copy Collaborator
//!
//! Safe movement of bytes across the user/kernel address-space boundary.
//! The implementations live in the embedding kernel's memory subsystem
//! (they need the fault-recovery machinery of the trap code); this crate
//! only consumes them.
//!
//! # Security Model
//! - User pointers are plain `u32` values and are never dereferenced in
//!   this crate; every access goes through one of these methods
//! - Bad addresses surface as `Efault` and over-long strings as
//!   `EnameTooLong`: ordinary user errors, never panics

use crate::errno::Errno;

/// Fault-checked copy primitives between user and kernel space.
pub trait UserCopy: Sync {
    /// Copy `dst.len()` bytes from user address `user_src` into the
    /// kernel buffer.
    fn copy_in(&self, user_src: u32, dst: &mut [u8]) -> Result<(), Errno>;

    /// Copy the kernel buffer out to user address `user_dst`.
    fn copy_out(&self, src: &[u8], user_dst: u32) -> Result<(), Errno>;

    /// Copy a NUL-terminated string from user address `user_src` into
    /// `dst`, returning the number of bytes copied including the NUL.
    ///
    /// Fails with `EnameTooLong` if the string (with its NUL) does not
    /// fit in `dst`, and with `Efault` for a bad address.
    fn copy_in_str(&self, user_src: u32, dst: &mut [u8]) -> Result<usize, Errno>;
}
