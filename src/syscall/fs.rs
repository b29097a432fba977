//! Filesystem Syscall Handlers
//!
//! `open`, `close`, `chdir`, and `__getcwd`. These are the only handlers
//! that touch the descriptor table, and they observe its one locking
//! rule: the table lock is never held across a call into the VFS.

use crate::errno::Errno;
use crate::fd::Fd;
use crate::trap::SyscallReturn;
use crate::vfs::{OpenFlags, NAME_MAX, PATH_MAX};

use super::{KernelCtx, SyscallRequest};

/// Reassemble a copied-in path: drop the NUL and require valid UTF-8.
fn path_from(buf: &[u8], got: usize) -> Result<&str, Errno> {
    let bytes = &buf[..got.saturating_sub(1)];
    core::str::from_utf8(bytes).map_err(|_| Errno::Einval)
}

/// `open(path, flags, mode) -> fd`
///
/// Copies the path in, opens it through the VFS, and parks the resulting
/// file object in the descriptor table. If the table rejects it after
/// the open succeeded, the file is closed again before the error goes
/// back to the user: either the caller gets a descriptor over a fully
/// opened file, or nothing stays open.
pub(super) fn sys_open(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let user_path = req.arg(0);
    let flags = OpenFlags::from_bits(req.arg(1)).ok_or(Errno::Einval)?;
    let mode = req.arg(2);

    let mut kname = [0u8; NAME_MAX + 1];
    let got = ctx.user.copy_in_str(user_path, &mut kname)?;
    let path = path_from(&kname, got)?;

    let file = ctx.vfs.open(path, flags, mode)?;

    // Binding the result here drops the table guard before any call
    // back into the VFS.
    let allocated = ctx.fds.lock().allocate(file);
    match allocated {
        Ok(fd) => Ok(SyscallReturn::Value(fd.raw())),
        Err((err, file)) => {
            ctx.vfs.close(file);
            Err(err.into())
        }
    }
}

/// `close(fd)`
///
/// Unlinks the descriptor first; only a successful unlink reaches the
/// VFS, so a second close of the same descriptor fails at the table and
/// the file object cannot be closed twice.
pub(super) fn sys_close(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let fd = Fd::new(req.arg(0));
    // Guard dropped at the end of this statement.
    let file = ctx.fds.lock().deallocate(fd)?;
    ctx.vfs.close(file);
    Ok(SyscallReturn::Value(0))
}

/// `__getcwd(buf, buflen) -> bytes copied`
///
/// Fetches the current path into a kernel buffer and copies out at most
/// `buflen` bytes. A user buffer shorter than the path truncates
/// silently; the return value tells the caller how much arrived.
pub(super) fn sys_getcwd(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let user_buf = req.arg(0);
    let user_len = req.arg(1) as usize;

    let mut kbuf = [0u8; PATH_MAX];
    let len = ctx.vfs.current_path(&mut kbuf)?;
    debug_assert!(len <= kbuf.len());

    let n = len.min(user_len);
    ctx.user.copy_out(&kbuf[..n], user_buf)?;
    Ok(SyscallReturn::Value(n as u32))
}

/// `chdir(path)`
pub(super) fn sys_chdir(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let user_path = req.arg(0);

    let mut kname = [0u8; NAME_MAX + 1];
    let got = ctx.user.copy_in_str(user_path, &mut kname)?;
    let path = path_from(&kname, got)?;

    ctx.vfs.set_current_path(path)?;
    Ok(SyscallReturn::Value(0))
}
