//! System-Level Syscall Handlers
//!
//! `reboot` and `__time`, delegating to the machine collaborator.

use crate::errno::Errno;
use crate::machine::RebootMode;
use crate::trap::SyscallReturn;

use super::{KernelCtx, SyscallRequest};

/// `reboot(how)`
///
/// The mode is validated before anything irreversible happens; an
/// unknown mode is an invalid argument, not a fault.
pub(super) fn sys_reboot(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let mode = RebootMode::from_raw(req.arg(0)).ok_or(Errno::Einval)?;
    log::info!("reboot requested: {:?}", mode);
    ctx.machine.reboot(mode)?;
    Ok(SyscallReturn::Value(0))
}

/// `__time(secs_ptr, nsecs_ptr) -> seconds`
///
/// Either pointer may be null, in which case that half is not copied
/// out. The seconds also come back as the (64-bit) return value.
pub(super) fn sys_time(
    ctx: &KernelCtx<'_>,
    req: &SyscallRequest,
) -> Result<SyscallReturn, Errno> {
    let secs_ptr = req.arg(0);
    let nsecs_ptr = req.arg(1);

    let now = ctx.machine.timestamp();

    if secs_ptr != 0 {
        ctx.user.copy_out(&now.secs.to_be_bytes(), secs_ptr)?;
    }
    if nsecs_ptr != 0 {
        ctx.user.copy_out(&now.nsecs.to_be_bytes(), nsecs_ptr)?;
    }

    Ok(SyscallReturn::Wide(now.secs))
}
