//! Condition flags and the per-instruction flag policies.
//!
//! Every flag-producing instruction declares, for each of Z, N, H and C,
//! where the new value comes from. [`combine`] is the only place those
//! declarations are turned into a flag byte.

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flag {
    Z = 0x80, // Zero
    N = 0x40, // Subtract
    H = 0x20, // Half carry
    C = 0x10, // Carry
}

impl Flag {
    #[inline]
    pub fn is_set(self, flags: u8) -> bool {
        flags & self as u8 != 0
    }
}

/// Only the high nibble of F holds flags.
pub const FLAGS_MASK: u8 = 0xF0;

/// Where one flag's new value is taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagSource {
    Clear,
    Set,
    /// The bit the ALU just computed.
    Alu,
    /// Keep the CPU's current bit.
    Cpu,
}

impl FlagSource {
    #[inline]
    fn resolve(self, flag: Flag, cpu: u8, alu: u8) -> bool {
        match self {
            FlagSource::Clear => false,
            FlagSource::Set => true,
            FlagSource::Alu => flag.is_set(alu),
            FlagSource::Cpu => flag.is_set(cpu),
        }
    }
}

/// One [`FlagSource`] per flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagPolicy {
    pub z: FlagSource,
    pub n: FlagSource,
    pub h: FlagSource,
    pub c: FlagSource,
}

use FlagSource::{Alu, Clear, Cpu, Set};

const fn policy(z: FlagSource, n: FlagSource, h: FlagSource, c: FlagSource) -> FlagPolicy {
    FlagPolicy { z, n, h, c }
}

impl FlagPolicy {
    pub const ADD: Self = policy(Alu, Clear, Alu, Alu);
    pub const SUB: Self = policy(Alu, Set, Alu, Alu);
    pub const INC: Self = policy(Alu, Clear, Alu, Cpu);
    pub const DEC: Self = policy(Alu, Set, Alu, Cpu);
    /// ADD HL,rr: Z is left alone.
    pub const ADD16: Self = policy(Cpu, Clear, Alu, Alu);
    pub const AND: Self = policy(Alu, Clear, Set, Clear);
    /// OR and XOR.
    pub const OR: Self = policy(Alu, Clear, Clear, Clear);
    pub const CPL: Self = policy(Cpu, Set, Set, Cpu);
    /// Shifts and the prefixed rotates.
    pub const SHIFT: Self = policy(Alu, Clear, Clear, Alu);
    /// RLCA/RRCA/RLA/RRA always clear Z.
    pub const ROTATE_A: Self = policy(Clear, Clear, Clear, Alu);
    pub const SWAP: Self = policy(Alu, Clear, Clear, Clear);
    pub const BIT: Self = policy(Alu, Clear, Set, Cpu);
    /// SCF and CCF.
    pub const SCCF: Self = policy(Cpu, Clear, Clear, Alu);
    /// ADD SP,e8 and LD HL,SP+e8.
    pub const SP_OFFSET: Self = policy(Clear, Clear, Alu, Alu);
    pub const DAA: Self = policy(Alu, Cpu, Clear, Alu);
}

/// Build the new flag byte from the CPU's current flags, the ALU's freshly
/// computed flags, and a policy. The low nibble of the result is always 0.
pub fn combine(cpu: u8, alu: u8, policy: FlagPolicy) -> u8 {
    [
        (Flag::Z, policy.z),
        (Flag::N, policy.n),
        (Flag::H, policy.h),
        (Flag::C, policy.c),
    ]
    .into_iter()
    .filter(|&(flag, source)| source.resolve(flag, cpu, alu))
    .fold(0, |f, (flag, _)| f | flag as u8)
}
