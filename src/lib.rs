//! Ocelot - Syscall Boundary Layer
//!
//! The user/kernel boundary of the Ocelot MIPS kernel: turns a raw trap
//! (a saved user register context carrying a call number and arguments)
//! into a validated, typed kernel operation, and maintains the table that
//! maps small integer file descriptors to open-file objects.
//!
//! # Security Model
//! - Whitelist approach: only registered syscall numbers are dispatched
//! - User-supplied pointers never cross the boundary raw; all copies go
//!   through the fault-checked copy-in/copy-out collaborators
//! - Handlers return errors, never panic; a panic here means a kernel bug
//! - Descriptor allocation is serialized by a single lock, so a handle can
//!   never be double-issued or torn down mid-allocation
//!
//! # Architecture
//! - Target: MIPS (o32 calling convention)
//! - The embedding kernel provides the trap entry/exit assembly, the VFS,
//!   the user-memory copy primitives, the clock and reboot machinery, and
//!   the heap; this crate consumes them through the collaborator traits in
//!   [`vfs`], [`usercopy`], and [`machine`].
//!
//! # Calling Convention
//! Call number in `v0`; up to four 32-bit arguments in `a0`-`a3` (64-bit
//! arguments in aligned register pairs); further arguments on the user
//! stack at `sp + 16`. Result in `v0` (`v0`/`v1` if 64-bit); `a3` is 0 on
//! success and 1 on failure, in which case `v0` holds the error code. The
//! saved program counter is advanced past the trapping instruction before
//! returning to user mode.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod errno;
pub mod fd;
pub mod machine;
pub mod syscall;
pub mod trap;
pub mod usercopy;
pub mod vfs;

pub use errno::Errno;
pub use trap::TrapFrame;

/// One-time setup of the boundary layer's process-wide state: the
/// descriptor table and the syscall registry.
///
/// Call once during kernel initialization, after the heap is up. Both
/// structures are also created on first use, so a missed call is not
/// fatal, but explicit init keeps allocation out of the first trap.
pub fn init() {
    fd::init();
    syscall::init();
    log::info!("syscall boundary initialized");
}
