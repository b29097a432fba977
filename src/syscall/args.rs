//! Typed Syscall Argument Decoding
//!
//! The dispatcher decodes the trap frame into a [`SyscallRequest`] once;
//! handlers pull their arguments from it by position and never see the
//! raw registers.
//!
//! # Calling Convention
//! The first four 32-bit arguments travel in `a0`-`a3`. A 64-bit
//! argument occupies an aligned pair (`a0`/`a1` or `a2`/`a3`, high half
//! in the lower-numbered register, as the machine is big-endian); if that
//! forces a gap, the skipped register is unused. Arguments beyond the
//! register budget live on the user stack starting at `sp + 16` and are
//! fetched with a fault-checked copy-in.

use crate::errno::Errno;
use crate::trap::{TrapFrame, STACK_ARG_OFFSET};
use crate::usercopy::UserCopy;

/// A decoded syscall: the call number plus its argument sources.
#[derive(Debug, Clone, Copy)]
pub struct SyscallRequest {
    /// The call number from `v0`.
    pub number: u32,
    args: [u32; 4],
    sp: u32,
}

impl SyscallRequest {
    /// Decode the register state of a trap frame.
    pub fn decode(tf: &TrapFrame) -> Self {
        Self {
            number: tf.v0,
            args: [tf.a0, tf.a1, tf.a2, tf.a3],
            sp: tf.sp,
        }
    }

    /// The 32-bit argument in register slot `slot` (0..=3).
    ///
    /// Panics if `slot` is out of range; that is a handler bug, not
    /// user input.
    #[inline]
    pub fn arg(&self, slot: usize) -> u32 {
        self.args[slot]
    }

    /// The 64-bit argument starting at or after register slot `slot`
    /// (0..=2), rounded up to the next aligned pair.
    ///
    /// `arg64(0)` reads `a0`/`a1`; `arg64(1)` and `arg64(2)` both read
    /// `a2`/`a3`, leaving `a1` unused in the former case.
    pub fn arg64(&self, slot: usize) -> u64 {
        let start = (slot + 1) & !1;
        ((self.args[start] as u64) << 32) | self.args[start + 1] as u64
    }

    /// The `index`-th stack-spilled argument, read from
    /// `sp + 16 + 4 * index` in user memory.
    pub fn stack_arg(&self, user: &dyn UserCopy, index: usize) -> Result<u32, Errno> {
        let offset = STACK_ARG_OFFSET
            .checked_add((index as u32).wrapping_mul(4))
            .ok_or(Errno::Efault)?;
        let addr = self.sp.checked_add(offset).ok_or(Errno::Efault)?;
        let mut bytes = [0u8; 4];
        user.copy_in(addr, &mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }
}
