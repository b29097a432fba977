//! File Descriptor Table
//!
//! Maps small integer descriptors to open-file objects so user code can
//! name kernel resources indirectly. Descriptors are drawn from a fixed
//! reserved range; values below the minimum belong to the standard
//! streams, which are wired up elsewhere and never allocated here.
//!
//! # Design
//! - One slot per descriptor in the range, owned storage, no free list:
//!   clearing a slot releases the entry, so a dangling or doubly-freed
//!   entry cannot exist
//! - A single lock serializes every mutation; the in-use scan that picks
//!   a free descriptor happens inside the same critical section as the
//!   insertion, so two racing allocations can never pick the same slot
//! - The table performs no I/O; callers close file objects through the
//!   VFS only after the lock has been released
//!
//! # Allocation Policy
//! First-fit ascending: the lowest free descriptor is always chosen, so
//! a freed descriptor is reused before the range grows upward.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use spin::{Mutex, Once};

use crate::vfs::FileObject;

/// Lowest descriptor this table may allocate. 0, 1, and 2 are the
/// standard streams.
pub const FD_MIN: u32 = 3;

/// Highest descriptor this table may allocate. 127 keeps a descriptor
/// representable in a `char` for user headers that want that.
pub const FD_MAX: u32 = 127;

/// A file descriptor value.
///
/// A newtype so arbitrary integers don't masquerade as descriptors in
/// kernel interfaces. Carrying a value does not imply validity; only the
/// table can judge that, against its own range and membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Fd(u32);

impl Fd {
    /// Wrap a raw user-supplied descriptor value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for descriptor table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdError {
    /// The table's backing storage could not be allocated.
    OutOfMemory,
    /// Every descriptor in the reserved range is in use.
    TableFull,
    /// The descriptor is outside the reserved range or not currently
    /// allocated.
    InvalidHandle,
}

impl fmt::Display for FdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::TableFull => write!(f, "descriptor table full"),
            Self::InvalidHandle => write!(f, "invalid file descriptor"),
        }
    }
}

impl From<FdError> for crate::errno::Errno {
    fn from(err: FdError) -> Self {
        match err {
            FdError::OutOfMemory => Self::Enomem,
            FdError::TableFull => Self::Enfile,
            FdError::InvalidHandle => Self::Ebadf,
        }
    }
}

/// The descriptor table proper.
///
/// Callers access the process-wide instance through [`table`], behind a
/// `Mutex`; the methods here assume the caller holds that lock.
pub struct DescriptorTable {
    min: u32,
    max: u32,
    /// One slot per descriptor in `min..=max`; index is `fd - min`.
    slots: Vec<Option<Box<dyn FileObject>>>,
}

impl DescriptorTable {
    /// Create a table covering the default reserved range
    /// [`FD_MIN`]`..=`[`FD_MAX`].
    pub fn new() -> Result<Self, FdError> {
        Self::with_range(FD_MIN, FD_MAX)
    }

    /// Create a table covering `min..=max`.
    ///
    /// The backing storage is reserved up front; exhaustion of the
    /// kernel heap surfaces as `OutOfMemory` here rather than during a
    /// later allocation.
    pub fn with_range(min: u32, max: u32) -> Result<Self, FdError> {
        debug_assert!(min <= max);
        let capacity = (max - min + 1) as usize;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| FdError::OutOfMemory)?;
        slots.resize_with(capacity, || None);
        Ok(Self { min, max, slots })
    }

    /// The `[min, max]` descriptor range this table allocates from.
    #[inline]
    pub fn range(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    /// Number of descriptors the table can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of descriptors currently allocated.
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True if `fd` is currently allocated.
    pub fn contains(&self, fd: Fd) -> bool {
        match self.index_of(fd) {
            Some(i) => self.slots[i].is_some(),
            None => false,
        }
    }

    /// Allocate the lowest free descriptor and store `file` in its slot.
    ///
    /// Ownership of `file` transfers to the table only on success; on
    /// failure it is handed back alongside the error so the caller can
    /// close it without the table ever having owned it.
    pub fn allocate(
        &mut self,
        file: Box<dyn FileObject>,
    ) -> Result<Fd, (FdError, Box<dyn FileObject>)> {
        // First-fit ascending scan. The scan and the insertion happen
        // under the same borrow, so no other mutation can interleave.
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(file);
                return Ok(Fd(self.min + i as u32));
            }
        }
        Err((FdError::TableFull, file))
    }

    /// Unlink `fd` and return ownership of its file object.
    ///
    /// Out-of-range and unallocated descriptors both report
    /// `InvalidHandle`; the table is left unchanged. The returned object
    /// must be closed by the caller, after releasing the table lock.
    pub fn deallocate(&mut self, fd: Fd) -> Result<Box<dyn FileObject>, FdError> {
        let i = self.index_of(fd).ok_or(FdError::InvalidHandle)?;
        self.slots[i].take().ok_or(FdError::InvalidHandle)
    }

    fn index_of(&self, fd: Fd) -> Option<usize> {
        if fd.0 < self.min || fd.0 > self.max {
            return None;
        }
        Some((fd.0 - self.min) as usize)
    }
}

static TABLE: Once<Mutex<DescriptorTable>> = Once::new();

fn make_table() -> Mutex<DescriptorTable> {
    // Failure to reserve ~125 slot pointers at boot means the kernel
    // heap never came up; nothing sensible can run after that.
    let table = match DescriptorTable::new() {
        Ok(t) => t,
        Err(e) => panic!("descriptor table setup failed: {}", e),
    };
    Mutex::new(table)
}

/// Set up the process-wide descriptor table. Called once from kernel
/// initialization via [`crate::init`].
pub fn init() {
    TABLE.call_once(make_table);
}

/// The process-wide descriptor table.
///
/// First use initializes it if [`init`] was skipped; the `Once` makes
/// that a single racing winner, never two tables.
pub fn table() -> &'static Mutex<DescriptorTable> {
    TABLE.call_once(make_table)
}
