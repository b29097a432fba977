//! Syscall Dispatcher
//!
//! The single entry point from the trap code. Each invocation is one
//! atomic request/response cycle: decode the frame, route by call
//! number, run the handler, encode the outcome, advance the program
//! counter.
//!
//! # Routing
//! Handlers live in a sparse table indexed by call number, populated
//! once at startup. A miss is the natural "no such system call" case;
//! no default branch, no handler invoked.
//!
//! # Fatal Invariants
//! On entry and exit the calling thread must be at base interrupt
//! priority and hold no spinlocks. A violation means some earlier kernel
//! code leaked state across the boundary; that is not a user error and
//! is never encoded into the frame. The kernel asserts and halts.

use spin::Once;

use super::args::SyscallRequest;
use super::{fs, numbers, system, KernelCtx};
use crate::errno::Errno;
use crate::machine::CurrentThread;
use crate::trap::{SyscallReturn, TrapFrame};

/// A syscall handler: typed request in, value-or-errno out.
pub type Handler = fn(&KernelCtx<'_>, &SyscallRequest) -> Result<SyscallReturn, Errno>;

/// One past the highest routable call number.
const CALL_LIMIT: usize = 128;

#[derive(Clone, Copy)]
struct SyscallEntry {
    name: &'static str,
    handler: Handler,
}

/// Sparse call-number-to-handler table.
struct SyscallTable {
    entries: [Option<SyscallEntry>; CALL_LIMIT],
}

impl SyscallTable {
    const fn empty() -> Self {
        Self {
            entries: [None; CALL_LIMIT],
        }
    }

    fn register(&mut self, number: u32, name: &'static str, handler: Handler) {
        let i = number as usize;
        debug_assert!(i < CALL_LIMIT, "call number {} beyond table", number);
        debug_assert!(
            self.entries[i].is_none(),
            "syscall {} registered twice",
            number
        );
        self.entries[i] = Some(SyscallEntry { name, handler });
    }

    fn lookup(&self, number: u32) -> Option<&SyscallEntry> {
        self.entries.get(number as usize)?.as_ref()
    }
}

fn build_table() -> SyscallTable {
    let mut table = SyscallTable::empty();
    table.register(numbers::SYS_CHDIR, "chdir", fs::sys_chdir);
    table.register(numbers::SYS_OPEN, "open", fs::sys_open);
    table.register(numbers::SYS_CLOSE, "close", fs::sys_close);
    table.register(numbers::SYS_TIME, "__time", system::sys_time);
    table.register(numbers::SYS_REBOOT, "reboot", system::sys_reboot);
    table.register(numbers::SYS_GETCWD, "__getcwd", fs::sys_getcwd);
    table
}

static TABLE: Once<SyscallTable> = Once::new();

/// Populate the syscall registry. Called once from kernel init via
/// [`crate::init`].
pub fn init() {
    TABLE.call_once(build_table);
}

fn registry() -> &'static SyscallTable {
    TABLE.call_once(build_table)
}

/// Handle a syscall trap.
///
/// Decodes `tf`, runs the routed handler against `ctx`, and writes the
/// result back: on success `v0`(/`v1`) carries the value and `a3` is 0;
/// on failure `v0` carries the error code and `a3` is 1. The saved
/// program counter is advanced past the `syscall` instruction in both
/// cases so it is not re-executed.
pub fn syscall(tf: &mut TrapFrame, ctx: &KernelCtx<'_>) {
    check_thread_state(ctx.thread);

    let req = SyscallRequest::decode(tf);

    let result = match registry().lookup(req.number) {
        Some(entry) => {
            log::debug!("syscall {} (#{})", entry.name, req.number);
            (entry.handler)(ctx, &req)
        }
        None => {
            log::warn!("unknown syscall #{}", req.number);
            Err(Errno::Enosys)
        }
    };

    match result {
        Ok(ret) => tf.set_return(ret),
        Err(err) => {
            log::debug!("syscall #{} failed: {}", req.number, err);
            tf.set_error(err);
        }
    }

    tf.advance_pc();

    check_thread_state(ctx.thread);
}

fn check_thread_state(thread: &dyn CurrentThread) {
    assert!(
        !thread.ipl_raised(),
        "syscall boundary crossed with interrupt priority raised"
    );
    assert_eq!(
        thread.spinlocks_held(),
        0,
        "syscall boundary crossed holding spinlocks"
    );
}
