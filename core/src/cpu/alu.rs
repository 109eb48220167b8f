//! Pure arithmetic and logic operations.
//!
//! Every operation returns the result together with a complete, freshly
//! computed flag set; nothing is accumulated from earlier calls. Which of
//! these flags actually reach F is decided by the instruction's
//! [`FlagPolicy`](super::flags::FlagPolicy).

use super::flags::Flag;
use crate::core::bits::{self, RotDir, bit_get, lsb4, lsb8, merge4, merge8, msb4, msb8};

/// Result of an ALU operation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u16,
    pub flags: u8,
}

impl AluOutput {
    /// Low byte of the result.
    #[inline]
    pub fn byte(&self) -> u8 {
        self.value as u8
    }

    pub fn has(&self, flag: Flag) -> bool {
        flag.is_set(self.flags)
    }
}

#[inline]
fn zero_flag(value: u16) -> u8 {
    if value == 0 { Flag::Z as u8 } else { 0 }
}

/// Z from the value, H from the low-nibble overflow, C from the high-nibble overflow.
fn nibble_flags(value: u8, lsbs: u8, msbs: u8) -> u8 {
    let mut f = zero_flag(value as u16);
    if msb4(lsbs) != 0 {
        f |= Flag::H as u8;
    }
    if msb4(msbs) != 0 {
        f |= Flag::C as u8;
    }
    f
}

/// Z from the value, C from the bit that left the register.
fn shift_flags(value: u8, out: bool) -> AluOutput {
    let mut flags = zero_flag(value as u16);
    if out {
        flags |= Flag::C as u8;
    }
    AluOutput {
        value: value as u16,
        flags,
    }
}

/// `x + y + carry_in`, computed nibble by nibble.
pub fn add8(x: u8, y: u8, carry_in: bool) -> AluOutput {
    let lsbs = lsb4(x) + lsb4(y) + carry_in as u8;
    let msbs = msb4(x) + msb4(y) + msb4(lsbs);
    let value = merge4(lsbs, msbs);
    AluOutput {
        value: value as u16,
        flags: nibble_flags(value, lsbs, msbs),
    }
}

/// `x - y - borrow_in`, computed nibble by nibble. N is always set.
pub fn sub8(x: u8, y: u8, borrow_in: bool) -> AluOutput {
    let lsbs = lsb4(x).wrapping_sub(lsb4(y)).wrapping_sub(borrow_in as u8);
    let msbs = msb4(x)
        .wrapping_sub(msb4(y))
        .wrapping_sub((msb4(lsbs) != 0) as u8);
    let value = merge4(lsbs, msbs);
    AluOutput {
        value: value as u16,
        flags: Flag::N as u8 | nibble_flags(value, lsbs, msbs),
    }
}

/// 16-bit add whose H and C come from the low byte. Z reflects the full result.
pub fn add16_low(x: u16, y: u16) -> AluOutput {
    let low = add8(lsb8(x), lsb8(y), false);
    let high = msb8(x)
        .wrapping_add(msb8(y))
        .wrapping_add(low.has(Flag::C) as u8);
    let value = merge8(low.byte(), high);
    AluOutput {
        value,
        flags: (low.flags & !(Flag::Z as u8)) | zero_flag(value),
    }
}

/// 16-bit add whose H and C come from the high byte. Z reflects the full result.
pub fn add16_high(x: u16, y: u16) -> AluOutput {
    let (low, carry) = lsb8(x).overflowing_add(lsb8(y));
    let high = add8(msb8(x), msb8(y), carry);
    let value = merge8(low, high.byte());
    AluOutput {
        value,
        flags: (high.flags & !(Flag::Z as u8)) | zero_flag(value),
    }
}

/// Logical shift by one. The bit shifted out becomes C.
pub fn shift(x: u8, dir: RotDir) -> AluOutput {
    match dir {
        RotDir::Left => shift_flags(x << 1, bit_get(x, 7)),
        RotDir::Right => shift_flags(x >> 1, bit_get(x, 0)),
    }
}

/// Shift right by one, keeping the sign bit.
pub fn shift_right_arithmetic(x: u8) -> AluOutput {
    shift_flags((x >> 1) | (x & 0x80), bit_get(x, 0))
}

/// Rotate by one without carry. The bit that wrapped around becomes C.
pub fn rotate(x: u8, dir: RotDir) -> AluOutput {
    let out = match dir {
        RotDir::Left => bit_get(x, 7),
        RotDir::Right => bit_get(x, 0),
    };
    shift_flags(bits::rotate(x, dir, 1), out)
}

/// 9-bit rotate through the carry in `flags`.
pub fn carry_rotate(x: u8, dir: RotDir, flags: u8) -> AluOutput {
    let c = Flag::C.is_set(flags) as u8;
    match dir {
        RotDir::Left => shift_flags((x << 1) | c, bit_get(x, 7)),
        RotDir::Right => shift_flags((x >> 1) | (c << 7), bit_get(x, 0)),
    }
}

pub fn and8(x: u8, y: u8) -> AluOutput {
    let value = x & y;
    AluOutput {
        value: value as u16,
        flags: zero_flag(value as u16) | Flag::H as u8,
    }
}

pub fn or8(x: u8, y: u8) -> AluOutput {
    let value = x | y;
    AluOutput {
        value: value as u16,
        flags: zero_flag(value as u16),
    }
}

pub fn xor8(x: u8, y: u8) -> AluOutput {
    let value = x ^ y;
    AluOutput {
        value: value as u16,
        flags: zero_flag(value as u16),
    }
}

/// Exchange the two nibbles.
pub fn swap(x: u8) -> AluOutput {
    let value = merge4(msb4(x), lsb4(x));
    AluOutput {
        value: value as u16,
        flags: zero_flag(value as u16),
    }
}

/// Z set when bit `n` of `x` is clear; H always set.
pub fn test_bit(x: u8, n: u32) -> AluOutput {
    let on = bit_get(x, n);
    AluOutput {
        value: on as u16,
        flags: (if on { 0 } else { Flag::Z as u8 }) | Flag::H as u8,
    }
}

/// Turn the binary result of the last BCD add/subtract in `a` back into
/// packed BCD, using N, H and C from `flags`.
pub fn decimal_adjust(a: u8, flags: u8) -> AluOutput {
    let mut value = a;
    let mut carry = Flag::C.is_set(flags);
    if Flag::N.is_set(flags) {
        if carry {
            value = value.wrapping_sub(0x60);
        }
        if Flag::H.is_set(flags) {
            value = value.wrapping_sub(0x06);
        }
    } else {
        if carry || value > 0x99 {
            value = value.wrapping_add(0x60);
            carry = true;
        }
        if Flag::H.is_set(flags) || lsb4(value) > 0x09 {
            value = value.wrapping_add(0x06);
        }
    }
    shift_flags(value, carry)
}

/// C set to `on`, everything else clear (SCF when true).
pub fn set_carry(on: bool) -> AluOutput {
    AluOutput {
        value: 0,
        flags: if on { Flag::C as u8 } else { 0 },
    }
}

/// C inverted from `flags` (CCF).
pub fn complement_carry(flags: u8) -> AluOutput {
    set_carry(!Flag::C.is_set(flags))
}
