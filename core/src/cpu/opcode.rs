//! Instruction descriptors and the two decode tables.
//!
//! Opcodes are grouped into families that share one execution routine; the
//! routine pulls its operands out of the opcode bits with the `extract_*`
//! helpers below. Cycle counts are machine cycles.

use crate::core::bits::{RotDir, bit_get};

/// Escape byte selecting the [`PREFIXED`] table.
pub const PREFIX: u8 = 0xCB;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    // 8/16-bit arithmetic
    AddAHlr,
    AddAN8,
    AddAR8,
    IncHlr,
    IncR8,
    AddHlR16sp,
    IncR16sp,
    SubAHlr,
    SubAN8,
    SubAR8,
    DecHlr,
    DecR8,
    DecR16sp,
    // Logic and compare
    AndAHlr,
    AndAN8,
    AndAR8,
    OrAHlr,
    OrAN8,
    OrAR8,
    XorAHlr,
    XorAN8,
    XorAR8,
    Cpl,
    CpAHlr,
    CpAN8,
    CpAR8,
    // Shifts and rotates
    SlaHlr,
    SlaR8,
    SraHlr,
    SraR8,
    SrlHlr,
    SrlR8,
    RotcA,
    RotA,
    RotcHlr,
    RotcR8,
    RotHlr,
    RotR8,
    SwapHlr,
    SwapR8,
    // Single bits
    BitU3Hlr,
    BitU3R8,
    ChgU3Hlr,
    ChgU3R8,
    // Misc arithmetic
    LdHlSpS8,
    Daa,
    Sccf,
    // Loads and stores
    LdABcr,
    LdACr,
    LdADer,
    LdAHlru,
    LdAN16r,
    LdAN8r,
    LdBcrA,
    LdCrA,
    LdDerA,
    LdHlruA,
    LdHlrN8,
    LdHlrR8,
    LdN16rA,
    LdN16rSp,
    LdN8rA,
    LdR16spN16,
    LdR8Hlr,
    LdR8N8,
    LdR8R8,
    LdSpHl,
    PopR16,
    PushR16,
    // Jumps, calls, returns
    JpN16,
    JpCcN16,
    JpHl,
    JrE8,
    JrCcE8,
    CallN16,
    CallCcN16,
    RstU3,
    Ret,
    RetCc,
    Reti,
    // Control
    Edi,
    Halt,
    Stop,
    Nop,
}

/// Decoded opcode metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub family: Family,
    /// Opcode byte the family decodes its operands from (the second byte
    /// for prefixed instructions).
    pub opcode: u8,
    /// Encoded length, prefix included.
    pub bytes: u8,
    pub cycles: u8,
    /// Charged on top of `cycles` when a conditional branch is taken.
    pub extra_cycles: u8,
}

impl Instruction {
    const fn new(family: Family, opcode: u8, bytes: u8, cycles: u8, extra_cycles: u8) -> Self {
        Self {
            family,
            opcode,
            bytes,
            cycles,
            extra_cycles,
        }
    }
}

// --- Operand extraction ---

/// 3-bit register code at bit `shift`.
#[inline]
pub fn extract_reg(opcode: u8, shift: u32) -> u8 {
    (opcode >> shift) & 0x07
}

/// 2-bit register pair code in bits 5-4.
#[inline]
pub fn extract_reg_pair(opcode: u8) -> u8 {
    (opcode >> 4) & 0x03
}

/// Bit index (BIT/SET/RES) or restart slot (RST) in bits 5-3.
#[inline]
pub fn extract_n3(opcode: u8) -> u32 {
    ((opcode >> 3) & 0x07) as u32
}

/// Branch condition code in bits 4-3: NZ, Z, NC, C.
#[inline]
pub fn extract_cc(opcode: u8) -> u8 {
    (opcode >> 3) & 0x03
}

#[inline]
pub fn extract_rot_dir(opcode: u8) -> RotDir {
    if bit_get(opcode, 3) { RotDir::Right } else { RotDir::Left }
}

/// Post-increment or post-decrement of HL for `LD A,(HL+/-)` and friends.
#[inline]
pub fn extract_hl_increment(opcode: u8) -> u16 {
    if bit_get(opcode, 4) { 0xFFFF } else { 1 }
}

/// EI (true) or DI (false).
#[inline]
pub fn extract_ime(opcode: u8) -> bool {
    bit_get(opcode, 3)
}

/// ADC/SBC against ADD/SUB; also CCF against SCF.
#[inline]
pub fn extract_carry(opcode: u8) -> bool {
    bit_get(opcode, 3)
}

/// SET (true) or RES (false).
#[inline]
pub fn extract_sr_bit(opcode: u8) -> bool {
    bit_get(opcode, 6)
}

// --- Tables ---

const fn alu_family(op: u8, operand: u8) -> Family {
    use Family::*;
    // operand: 0 = register, 1 = (HL), 2 = immediate
    match (op, operand) {
        (0 | 1, 0) => AddAR8,
        (0 | 1, 1) => AddAHlr,
        (0 | 1, _) => AddAN8,
        (2 | 3, 0) => SubAR8,
        (2 | 3, 1) => SubAHlr,
        (2 | 3, _) => SubAN8,
        (4, 0) => AndAR8,
        (4, 1) => AndAHlr,
        (4, _) => AndAN8,
        (5, 0) => XorAR8,
        (5, 1) => XorAHlr,
        (5, _) => XorAN8,
        (6, 0) => OrAR8,
        (6, 1) => OrAHlr,
        (6, _) => OrAN8,
        (_, 0) => CpAR8,
        (_, 1) => CpAHlr,
        (_, _) => CpAN8,
    }
}

const fn direct(op: u8) -> Option<Instruction> {
    use Family::*;
    let y = (op >> 3) & 0x07;
    let z = op & 0x07;
    let (family, bytes, cycles, extra) = match op {
        0x00 => (Nop, 1, 1, 0),
        0x10 => (Stop, 2, 1, 0),
        0x76 => (Halt, 1, 1, 0),
        0x02 => (LdBcrA, 1, 2, 0),
        0x12 => (LdDerA, 1, 2, 0),
        0x22 | 0x32 => (LdHlruA, 1, 2, 0),
        0x0A => (LdABcr, 1, 2, 0),
        0x1A => (LdADer, 1, 2, 0),
        0x2A | 0x3A => (LdAHlru, 1, 2, 0),
        0x07 | 0x0F => (RotcA, 1, 1, 0),
        0x17 | 0x1F => (RotA, 1, 1, 0),
        0x08 => (LdN16rSp, 3, 5, 0),
        0x18 => (JrE8, 2, 3, 0),
        0x20 | 0x28 | 0x30 | 0x38 => (JrCcE8, 2, 2, 1),
        0x27 => (Daa, 1, 1, 0),
        0x2F => (Cpl, 1, 1, 0),
        0x37 | 0x3F => (Sccf, 1, 1, 0),
        0x34 => (IncHlr, 1, 3, 0),
        0x35 => (DecHlr, 1, 3, 0),
        0x36 => (LdHlrN8, 2, 3, 0),
        o if o & 0xCF == 0x01 => (LdR16spN16, 3, 3, 0),
        o if o & 0xCF == 0x03 => (IncR16sp, 1, 2, 0),
        o if o & 0xCF == 0x09 => (AddHlR16sp, 1, 2, 0),
        o if o & 0xCF == 0x0B => (DecR16sp, 1, 2, 0),
        o if o & 0xC7 == 0x04 => (IncR8, 1, 1, 0),
        o if o & 0xC7 == 0x05 => (DecR8, 1, 1, 0),
        o if o & 0xC7 == 0x06 => (LdR8N8, 2, 2, 0),
        0x40..=0x7F => {
            if z == 6 {
                (LdR8Hlr, 1, 2, 0)
            } else if y == 6 {
                (LdHlrR8, 1, 2, 0)
            } else if y == z {
                (Nop, 1, 1, 0)
            } else {
                (LdR8R8, 1, 1, 0)
            }
        }
        0x80..=0xBF => {
            if z == 6 {
                (alu_family(y, 1), 1, 2, 0)
            } else {
                (alu_family(y, 0), 1, 1, 0)
            }
        }
        o if o & 0xC7 == 0xC6 => (alu_family(y, 2), 2, 2, 0),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => (RetCc, 1, 2, 3),
        0xC2 | 0xCA | 0xD2 | 0xDA => (JpCcN16, 3, 3, 1),
        0xC4 | 0xCC | 0xD4 | 0xDC => (CallCcN16, 3, 3, 3),
        o if o & 0xCF == 0xC1 => (PopR16, 1, 3, 0),
        o if o & 0xCF == 0xC5 => (PushR16, 1, 4, 0),
        o if o & 0xC7 == 0xC7 => (RstU3, 1, 4, 0),
        0xC3 => (JpN16, 3, 4, 0),
        0xC9 => (Ret, 1, 4, 0),
        0xCD => (CallN16, 3, 6, 0),
        0xD9 => (Reti, 1, 4, 0),
        0xE0 => (LdN8rA, 2, 3, 0),
        0xF0 => (LdAN8r, 2, 3, 0),
        0xE2 => (LdCrA, 1, 2, 0),
        0xF2 => (LdACr, 1, 2, 0),
        0xE8 => (LdHlSpS8, 2, 4, 0),
        0xF8 => (LdHlSpS8, 2, 3, 0),
        0xE9 => (JpHl, 1, 1, 0),
        0xF9 => (LdSpHl, 1, 2, 0),
        0xEA => (LdN16rA, 3, 4, 0),
        0xFA => (LdAN16r, 3, 4, 0),
        0xF3 | 0xFB => (Edi, 1, 1, 0),
        // PREFIX and the unused opcodes D3 DB DD E3 E4 EB EC ED F4 FC FD
        _ => return None,
    };
    Some(Instruction::new(family, op, bytes, cycles, extra))
}

const fn prefixed(op: u8) -> Instruction {
    use Family::*;
    let hlr = op & 0x07 == 6;
    let family = match (op >> 3, hlr) {
        (0 | 1, false) => RotcR8,
        (0 | 1, true) => RotcHlr,
        (2 | 3, false) => RotR8,
        (2 | 3, true) => RotHlr,
        (4, false) => SlaR8,
        (4, true) => SlaHlr,
        (5, false) => SraR8,
        (5, true) => SraHlr,
        (6, false) => SwapR8,
        (6, true) => SwapHlr,
        (7, false) => SrlR8,
        (7, true) => SrlHlr,
        (8..=15, false) => BitU3R8,
        (8..=15, true) => BitU3Hlr,
        (_, false) => ChgU3R8,
        (_, true) => ChgU3Hlr,
    };
    let cycles = match (family, hlr) {
        (_, false) => 2,
        (BitU3Hlr, true) => 3,
        (_, true) => 4,
    };
    Instruction::new(family, op, 2, cycles, 0)
}

/// Single-byte opcodes. `None` marks the prefix byte and unused opcodes.
pub static DIRECT: [Option<Instruction>; 256] = {
    let mut table = [None; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = direct(op as u8);
        op += 1;
    }
    table
};

/// Opcodes following [`PREFIX`]. Every byte decodes.
pub static PREFIXED: [Option<Instruction>; 256] = {
    let mut table = [None; 256];
    let mut op = 0;
    while op < 256 {
        table[op] = Some(prefixed(op as u8));
        op += 1;
    }
    table
};
