//! CPU status register (P) flags.
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal (latches but has no effect on the 2A03)
//! │  │  │  └───────────── Break (exists only on stack copies of P)
//! │  │  └──────────────── Unused (reads as 1)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```

use bitflags::bitflags;

bitflags! {
    /// CPU status register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// Carry: set on unsigned overflow out of bit 7 (or no borrow).
        const C = 1 << 0;
        /// Zero: set when the last result was zero.
        const Z = 1 << 1;
        /// Interrupt disable: masks IRQ (never NMI).
        const I = 1 << 2;
        /// Decimal mode: stored but ignored by the 2A03's ALU.
        const D = 1 << 3;
        /// Break: present only in stack copies pushed by PHP/BRK.
        const B = 1 << 4;
        /// Unused: always 1 in the live register.
        const U = 1 << 5;
        /// Overflow: set on signed overflow.
        const V = 1 << 6;
        /// Negative: mirrors bit 7 of the last result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Register value after reset: interrupt disable plus the fixed bit.
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Set or clear the zero and negative flags from a result byte.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set_flag(Self::Z, value == 0);
        self.set_flag(Self::N, value & 0x80 != 0);
    }

    /// Set or clear a single flag.
    #[inline]
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        if value {
            *self |= flag;
        } else {
            *self &= !flag;
        }
    }

    /// The byte pushed to the stack by PHP/BRK (`brk` true) or by
    /// interrupt entry (`brk` false). The unused bit is always set.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        }
        value
    }

    /// Rebuild the register from a byte pulled off the stack. The break
    /// bit is discarded and the unused bit forced on.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_value_is_0x24() {
        assert_eq!(Status::POWER_ON.bits(), 0x24);
    }

    #[test]
    fn set_zn_tracks_result() {
        let mut status = Status::POWER_ON;
        status.set_zn(0x00);
        assert!(status.contains(Status::Z));
        assert!(!status.contains(Status::N));

        status.set_zn(0x80);
        assert!(!status.contains(Status::Z));
        assert!(status.contains(Status::N));

        status.set_zn(0x01);
        assert!(!status.contains(Status::Z));
        assert!(!status.contains(Status::N));
    }

    #[test]
    fn stack_byte_sets_break_only_for_brk() {
        let status = Status::POWER_ON;
        assert_eq!(status.to_stack_byte(false), 0x24);
        assert_eq!(status.to_stack_byte(true), 0x34);
    }

    #[test]
    fn pull_discards_break_and_forces_unused() {
        let status = Status::from_stack_byte(0xDF);
        assert!(!status.contains(Status::B));
        assert!(status.contains(Status::U));
        assert_eq!(status.bits(), 0xEF);

        let status = Status::from_stack_byte(0x00);
        assert_eq!(status.bits(), 0x20);
    }
}
