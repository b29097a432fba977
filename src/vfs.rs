//! VFS Collaborator Interface
//!
//! The storage layer is external to this crate; handlers drive it through
//! the [`Vfs`] trait. Path resolution, mount tables, and vnode reference
//! counting all live behind it. This crate only ever opens a file object,
//! parks it in the descriptor table, and hands it back to be closed.

use alloc::boxed::Box;
use core::fmt;

use bitflags::bitflags;

use crate::errno::Errno;

/// Longest path the kernel will handle, including the directory walk in
/// `__getcwd`.
pub const PATH_MAX: usize = 1024;

/// Longest single path name accepted from user space by `open`/`chdir`.
pub const NAME_MAX: usize = 255;

bitflags! {
    /// File open flags, as passed by user code to `open`.
    ///
    /// Access-mode bits use the historical encoding where `O_RDONLY` is
    /// zero; the VFS interprets them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const O_WRONLY = 1;
        const O_RDWR   = 2;
        const O_CREAT  = 4;
        const O_EXCL   = 8;
        const O_TRUNC  = 16;
        const O_APPEND = 32;
    }
}

impl OpenFlags {
    /// Read-only access (the all-zero access mode).
    pub const O_RDONLY: Self = Self::empty();
}

/// An open-file object (vnode reference) owned by the storage layer.
///
/// Opaque to this crate beyond ownership: the descriptor table holds
/// exactly one boxed reference per live descriptor, and hands it back on
/// deallocation so the handler can close it.
pub trait FileObject: Send {}

// Opaque on purpose: the concrete vnode type belongs to the storage
// layer, so all a debug dump can say is that a file object is present.
impl fmt::Debug for dyn FileObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileObject")
    }
}

/// The virtual filesystem collaborator.
///
/// None of these methods are called while the descriptor table lock is
/// held; they may block on I/O.
pub trait Vfs: Sync {
    /// Open `path`, returning an owned open-file object.
    fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> Result<Box<dyn FileObject>, Errno>;

    /// Release an open-file object previously returned by [`Vfs::open`].
    fn close(&self, file: Box<dyn FileObject>);

    /// Write the current working directory path into `buf`, returning the
    /// number of bytes written (no NUL terminator).
    fn current_path(&self, buf: &mut [u8]) -> Result<usize, Errno>;

    /// Change the current working directory.
    fn set_current_path(&self, path: &str) -> Result<(), Errno>;
}
