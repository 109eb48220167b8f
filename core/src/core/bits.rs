//! Bit and nibble manipulation primitives.
//!
//! Bit indices wrap modulo the width of the value they address: index 9 on a
//! byte is bit 1. Callers decode indices out of opcode fields and never need
//! a failure path for them.

/// Direction of a shift or rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotDir {
    Left,
    Right,
}

#[inline]
pub fn bit_get(value: u8, index: u32) -> bool {
    (value >> (index & 7)) & 1 != 0
}

#[inline]
pub fn bit_get16(value: u16, index: u32) -> bool {
    (value >> (index & 15)) & 1 != 0
}

#[inline]
pub fn bit_set(value: &mut u8, index: u32) {
    *value |= 1 << (index & 7);
}

#[inline]
pub fn bit_unset(value: &mut u8, index: u32) {
    *value &= !(1 << (index & 7));
}

#[inline]
pub fn bit_edit(value: &mut u8, index: u32, on: bool) {
    if on {
        bit_set(value, index);
    } else {
        bit_unset(value, index);
    }
}

/// Low nibble of a byte.
#[inline]
pub fn lsb4(value: u8) -> u8 {
    value & 0x0F
}

/// High nibble of a byte, shifted down.
#[inline]
pub fn msb4(value: u8) -> u8 {
    value >> 4
}

/// Build a byte from two nibbles; only the low 4 bits of each are used.
#[inline]
pub fn merge4(low: u8, high: u8) -> u8 {
    (lsb4(high) << 4) | lsb4(low)
}

#[inline]
pub fn lsb8(value: u16) -> u8 {
    value as u8
}

#[inline]
pub fn msb8(value: u16) -> u8 {
    (value >> 8) as u8
}

#[inline]
pub fn merge8(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Rotate a byte by `d` positions (modulo 8), wrapping bits around.
#[inline]
pub fn rotate(value: u8, dir: RotDir, d: u32) -> u8 {
    match dir {
        RotDir::Left => value.rotate_left(d & 7),
        RotDir::Right => value.rotate_right(d & 7),
    }
}

/// Sign-extend a relative offset byte to 16 bits.
#[inline]
pub fn sign_extend(value: u8) -> u16 {
    value as i8 as i16 as u16
}
