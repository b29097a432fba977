//! MIPS Trap Frame
//!
//! The register snapshot saved by the trap entry assembly when user code
//! executes the `syscall` instruction. The dispatcher reads the call
//! number and arguments out of it and writes the result back into it;
//! the trap exit assembly then restores it into the CPU.
//!
//! Only the registers the syscall convention touches are modeled here.
//! The full hardware frame (all 31 GPRs plus coprocessor state) lives in
//! the entry assembly and is opaque to this crate.

use crate::errno::Errno;

/// Width of one MIPS instruction in bytes.
///
/// The program counter is advanced by exactly this much after every call
/// so the trapping `syscall` instruction is not re-executed on return.
pub const INSTRUCTION_WIDTH: u32 = 4;

/// Byte offset above the user stack pointer where stack-spilled syscall
/// arguments begin (the first 16 bytes are the caller's register save
/// area for `a0`-`a3`).
pub const STACK_ARG_OFFSET: u32 = 16;

/// Result of a successful syscall, as encoded into the return registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallReturn {
    /// 32-bit result in `v0`. Handlers with no meaningful result return
    /// `Value(0)`.
    Value(u32),
    /// 64-bit result split across `v0` (high half) and `v1` (low half).
    Wide(u64),
}

impl Default for SyscallReturn {
    fn default() -> Self {
        Self::Value(0)
    }
}

/// Saved user register context for a syscall trap.
///
/// Field roles on entry: `v0` = call number, `a0`-`a3` = arguments,
/// `sp` = user stack pointer. On exit: `v0`(/`v1`) = result or error
/// code, `a3` = failure flag, `epc` advanced past the trap instruction.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapFrame {
    pub v0: u32,
    pub v1: u32,
    pub a0: u32,
    pub a1: u32,
    pub a2: u32,
    pub a3: u32,
    pub sp: u32,
    pub epc: u32,
}

impl TrapFrame {
    /// Encode a successful result: value in `v0` (and `v1` for a wide
    /// result, high half first), failure flag cleared.
    pub fn set_return(&mut self, ret: SyscallReturn) {
        match ret {
            SyscallReturn::Value(v) => {
                self.v0 = v;
            }
            SyscallReturn::Wide(v) => {
                self.v0 = (v >> 32) as u32;
                self.v1 = v as u32;
            }
        }
        self.a3 = 0;
    }

    /// Encode a failure: error code in `v0`, failure flag set.
    ///
    /// Userlevel code turns this into `errno` and a `-1` return from the
    /// libc wrapper.
    pub fn set_error(&mut self, err: Errno) {
        self.v0 = err.code();
        self.a3 = 1;
    }

    /// Advance the saved program counter past the trapping instruction.
    pub fn advance_pc(&mut self) {
        self.epc = self.epc.wrapping_add(INSTRUCTION_WIDTH);
    }
}
