//! System Call Interface
//!
//! Decodes a trap frame into a typed request, routes it to a registered
//! handler, and encodes the handler's outcome back into the frame.
//!
//! # Security Model
//! - Whitelist approach: only numbers present in the registry dispatch;
//!   everything else is `Enosys`
//! - Handlers receive a typed [`SyscallRequest`] and never touch raw
//!   register slots
//! - User pointers cross the boundary only through the copy collaborators
//! - Invalid user input returns an error; a panic in this layer means a
//!   kernel bug
//!
//! # Registered Syscalls
//! - 8:   chdir(path)
//! - 45:  open(path, flags, mode)
//! - 49:  close(fd)
//! - 113: __time(secs_ptr, nsecs_ptr)
//! - 119: reboot(how)
//! - 120: __getcwd(buf, buflen)

mod args;
mod dispatch;
mod fs;
mod system;

#[cfg(test)]
pub(crate) mod mock;

pub use args::SyscallRequest;
pub use dispatch::{init, syscall, Handler};

use spin::Mutex;

use crate::fd::DescriptorTable;
use crate::machine::{CurrentThread, Machine};
use crate::usercopy::UserCopy;
use crate::vfs::Vfs;

/// System call numbers.
pub mod numbers {
    pub const SYS_CHDIR: u32 = 8;
    pub const SYS_OPEN: u32 = 45;
    pub const SYS_CLOSE: u32 = 49;
    pub const SYS_TIME: u32 = 113;
    pub const SYS_REBOOT: u32 = 119;
    pub const SYS_GETCWD: u32 = 120;
}

/// The collaborators a syscall executes against.
///
/// The trap glue builds one of these per call from the kernel's global
/// subsystems (`fds` normally comes from [`crate::fd::table`]); tests
/// supply mocks and a private table. Handlers reach everything outside
/// this crate through here.
pub struct KernelCtx<'a> {
    pub vfs: &'a dyn Vfs,
    pub user: &'a dyn UserCopy,
    pub machine: &'a dyn Machine,
    pub thread: &'a dyn CurrentThread,
    pub fds: &'a Mutex<DescriptorTable>,
}
