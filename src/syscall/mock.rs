//! Mock collaborators for boundary tests.
//!
//! A small simulated user address space, a counting VFS, a settable
//! clock, and a thread whose interrupt/lock state tests can corrupt on
//! purpose. `TestKernel` bundles them with a private descriptor table so
//! each test gets an isolated kernel.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex as HostMutex;

use spin::Mutex;

use crate::errno::Errno;
use crate::fd::DescriptorTable;
use crate::machine::{CurrentThread, Machine, RebootMode, Timespec};
use crate::trap::TrapFrame;
use crate::usercopy::UserCopy;
use crate::vfs::{FileObject, OpenFlags, Vfs};

use super::{KernelCtx, SyscallRequest};

/// Base address of the simulated user region.
pub const USER_BASE: u32 = 0x1000;

/// Size of the simulated user region in bytes.
pub const USER_SIZE: usize = 4096;

/// Build a syscall trap frame with the given call number and arguments.
pub fn trap(number: u32, args: [u32; 4]) -> TrapFrame {
    TrapFrame {
        v0: number,
        a0: args[0],
        a1: args[1],
        a2: args[2],
        a3: args[3],
        sp: USER_BASE + USER_SIZE as u32 / 2,
        ..Default::default()
    }
}

/// Build a decoded request directly, for handler-level tests.
pub fn request(args: [u32; 4]) -> SyscallRequest {
    SyscallRequest::decode(&trap(0, args))
}

/// Simulated user address space: `USER_SIZE` bytes at `USER_BASE`,
/// anything outside faults.
pub struct MockUser {
    mem: HostMutex<Vec<u8>>,
}

impl MockUser {
    pub fn new() -> Self {
        Self {
            mem: HostMutex::new(vec![0; USER_SIZE]),
        }
    }

    /// Plant bytes in user memory (test setup; panics on bad addresses).
    pub fn poke(&self, addr: u32, bytes: &[u8]) {
        let off = (addr - USER_BASE) as usize;
        self.mem.lock().unwrap()[off..off + bytes.len()].copy_from_slice(bytes);
    }

    /// Plant a NUL-terminated string in user memory.
    pub fn poke_str(&self, addr: u32, s: &str) {
        self.poke(addr, s.as_bytes());
        self.poke(addr + s.len() as u32, &[0]);
    }

    /// Read bytes back out of user memory (test assertions).
    pub fn peek(&self, addr: u32, len: usize) -> Vec<u8> {
        let off = (addr - USER_BASE) as usize;
        self.mem.lock().unwrap()[off..off + len].to_vec()
    }

    fn offset(&self, addr: u32, len: usize) -> Result<usize, Errno> {
        let start = addr.checked_sub(USER_BASE).ok_or(Errno::Efault)? as usize;
        let end = start.checked_add(len).ok_or(Errno::Efault)?;
        if end > USER_SIZE {
            return Err(Errno::Efault);
        }
        Ok(start)
    }
}

impl UserCopy for MockUser {
    fn copy_in(&self, user_src: u32, dst: &mut [u8]) -> Result<(), Errno> {
        if dst.is_empty() {
            return Ok(());
        }
        let off = self.offset(user_src, dst.len())?;
        let mem = self.mem.lock().unwrap();
        dst.copy_from_slice(&mem[off..off + dst.len()]);
        Ok(())
    }

    fn copy_out(&self, src: &[u8], user_dst: u32) -> Result<(), Errno> {
        if src.is_empty() {
            return Ok(());
        }
        let off = self.offset(user_dst, src.len())?;
        let mut mem = self.mem.lock().unwrap();
        mem[off..off + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn copy_in_str(&self, user_src: u32, dst: &mut [u8]) -> Result<usize, Errno> {
        if dst.is_empty() {
            return Err(Errno::EnameTooLong);
        }
        let start = self.offset(user_src, 1)?;
        let mem = self.mem.lock().unwrap();
        for (i, out) in dst.iter_mut().enumerate() {
            let pos = start + i;
            if pos >= USER_SIZE {
                return Err(Errno::Efault);
            }
            *out = mem[pos];
            if mem[pos] == 0 {
                return Ok(i + 1);
            }
        }
        Err(Errno::EnameTooLong)
    }
}

struct MockFile;
impl FileObject for MockFile {}

/// Counting VFS: every path opens successfully except those under
/// `/missing`, and open/close traffic is tallied for leak checks.
pub struct MockVfs {
    opens: AtomicUsize,
    closes: AtomicUsize,
    paths: HostMutex<Vec<String>>,
    cwd: HostMutex<String>,
}

impl MockVfs {
    pub fn new() -> Self {
        Self {
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            paths: HostMutex::new(Vec::new()),
            cwd: HostMutex::new(String::from("/")),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn opened_paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn set_cwd(&self, path: &str) {
        *self.cwd.lock().unwrap() = String::from(path);
    }

    pub fn cwd(&self) -> String {
        self.cwd.lock().unwrap().clone()
    }
}

impl Vfs for MockVfs {
    fn open(
        &self,
        path: &str,
        _flags: OpenFlags,
        _mode: u32,
    ) -> Result<Box<dyn FileObject>, Errno> {
        if path.starts_with("/missing") {
            return Err(Errno::Enoent);
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(String::from(path));
        Ok(Box::new(MockFile))
    }

    fn close(&self, file: Box<dyn FileObject>) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        drop(file);
    }

    fn current_path(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let cwd = self.cwd.lock().unwrap();
        let bytes = cwd.as_bytes();
        if bytes.len() > buf.len() {
            return Err(Errno::Enospc);
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }

    fn set_current_path(&self, path: &str) -> Result<(), Errno> {
        if path.starts_with("/missing") {
            return Err(Errno::Enoent);
        }
        self.set_cwd(path);
        Ok(())
    }
}

/// Settable clock plus a record of reboot requests.
pub struct MockMachine {
    now: HostMutex<Timespec>,
    reboots: HostMutex<Vec<RebootMode>>,
}

impl MockMachine {
    pub fn new() -> Self {
        Self {
            now: HostMutex::new(Timespec::default()),
            reboots: HostMutex::new(Vec::new()),
        }
    }

    pub fn set_now(&self, now: Timespec) {
        *self.now.lock().unwrap() = now;
    }

    pub fn reboots(&self) -> Vec<RebootMode> {
        self.reboots.lock().unwrap().clone()
    }
}

impl Machine for MockMachine {
    fn timestamp(&self) -> Timespec {
        *self.now.lock().unwrap()
    }

    fn reboot(&self, mode: RebootMode) -> Result<(), Errno> {
        self.reboots.lock().unwrap().push(mode);
        Ok(())
    }
}

/// Thread state the dispatcher's invariant checks read; tests corrupt it
/// to provoke the fatal paths.
pub struct MockThread {
    ipl: AtomicBool,
    spinlocks: AtomicUsize,
}

impl MockThread {
    pub fn new() -> Self {
        Self {
            ipl: AtomicBool::new(false),
            spinlocks: AtomicUsize::new(0),
        }
    }

    pub fn raise_ipl(&self, raised: bool) {
        self.ipl.store(raised, Ordering::SeqCst);
    }

    pub fn hold_spinlocks(&self, count: usize) {
        self.spinlocks.store(count, Ordering::SeqCst);
    }
}

impl CurrentThread for MockThread {
    fn ipl_raised(&self) -> bool {
        self.ipl.load(Ordering::SeqCst)
    }

    fn spinlocks_held(&self) -> usize {
        self.spinlocks.load(Ordering::SeqCst)
    }
}

/// An isolated kernel: mock collaborators plus a private descriptor
/// table.
pub struct TestKernel {
    pub vfs: MockVfs,
    pub user: MockUser,
    pub machine: MockMachine,
    pub thread: MockThread,
    pub fds: Mutex<DescriptorTable>,
}

impl TestKernel {
    pub fn new() -> Self {
        Self::with_table(DescriptorTable::new().unwrap())
    }

    pub fn with_fd_range(min: u32, max: u32) -> Self {
        Self::with_table(DescriptorTable::with_range(min, max).unwrap())
    }

    fn with_table(table: DescriptorTable) -> Self {
        Self {
            vfs: MockVfs::new(),
            user: MockUser::new(),
            machine: MockMachine::new(),
            thread: MockThread::new(),
            fds: Mutex::new(table),
        }
    }

    pub fn ctx(&self) -> KernelCtx<'_> {
        KernelCtx {
            vfs: &self.vfs,
            user: &self.user,
            machine: &self.machine,
            thread: &self.thread,
            fds: &self.fds,
        }
    }
}
