//! Register file views: 8-bit registers, 16-bit pairs, and the operand
//! codes instructions use to name them.

use super::Cpu;
use super::flags::FLAGS_MASK;
use crate::core::bits::{lsb8, merge8, msb8};
use crate::error::{Error, Result};

/// 8-bit register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg {
    /// Decode a 3-bit operand code: B C D E H L (HL) A.
    ///
    /// Code 6 names the byte at (HL), not a register; instructions that
    /// allow it are decoded to their own `...Hlr` family.
    pub fn from_code(code: u8) -> Result<Self> {
        match code & 0x07 {
            0 => Ok(Reg::B),
            1 => Ok(Reg::C),
            2 => Ok(Reg::D),
            3 => Ok(Reg::E),
            4 => Ok(Reg::H),
            5 => Ok(Reg::L),
            7 => Ok(Reg::A),
            other => Err(Error::BadRegister(other)),
        }
    }
}

/// 16-bit register pair, `(high << 8) | low`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegPair {
    BC,
    DE,
    HL,
    AF,
}

impl RegPair {
    /// Decode a 2-bit operand code. Code 3 is AF here; instructions that
    /// use it for SP go through [`Cpu::r16sp`] instead.
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::HL,
            _ => RegPair::AF,
        }
    }
}

impl Cpu {
    pub fn reg(&self, r: Reg) -> u8 {
        match r {
            Reg::A => self.a,
            Reg::F => self.f,
            Reg::B => self.b,
            Reg::C => self.c,
            Reg::D => self.d,
            Reg::E => self.e,
            Reg::H => self.h,
            Reg::L => self.l,
        }
    }

    /// Set an 8-bit register. Writes to F keep only the flag nibble.
    pub fn set_reg(&mut self, r: Reg, value: u8) {
        match r {
            Reg::A => self.a = value,
            Reg::F => self.f = value & FLAGS_MASK,
            Reg::B => self.b = value,
            Reg::C => self.c = value,
            Reg::D => self.d = value,
            Reg::E => self.e = value,
            Reg::H => self.h = value,
            Reg::L => self.l = value,
        }
    }

    pub fn reg_pair(&self, rp: RegPair) -> u16 {
        match rp {
            RegPair::BC => merge8(self.c, self.b),
            RegPair::DE => merge8(self.e, self.d),
            RegPair::HL => merge8(self.l, self.h),
            RegPair::AF => merge8(self.f, self.a),
        }
    }

    pub fn set_reg_pair(&mut self, rp: RegPair, value: u16) {
        let (high, low) = match rp {
            RegPair::BC => (Reg::B, Reg::C),
            RegPair::DE => (Reg::D, Reg::E),
            RegPair::HL => (Reg::H, Reg::L),
            RegPair::AF => (Reg::A, Reg::F),
        };
        self.set_reg(high, msb8(value));
        self.set_reg(low, lsb8(value));
    }

    pub fn af(&self) -> u16 {
        self.reg_pair(RegPair::AF)
    }

    pub fn set_af(&mut self, value: u16) {
        self.set_reg_pair(RegPair::AF, value)
    }

    pub fn bc(&self) -> u16 {
        self.reg_pair(RegPair::BC)
    }

    pub fn set_bc(&mut self, value: u16) {
        self.set_reg_pair(RegPair::BC, value)
    }

    pub fn de(&self) -> u16 {
        self.reg_pair(RegPair::DE)
    }

    pub fn set_de(&mut self, value: u16) {
        self.set_reg_pair(RegPair::DE, value)
    }

    pub fn hl(&self) -> u16 {
        self.reg_pair(RegPair::HL)
    }

    pub fn set_hl(&mut self, value: u16) {
        self.set_reg_pair(RegPair::HL, value)
    }

    /// Pair named by a 2-bit code where code 3 means SP (16-bit loads and
    /// arithmetic).
    pub(crate) fn r16sp(&self, code: u8) -> u16 {
        match RegPair::from_code(code) {
            RegPair::AF => self.sp,
            rp => self.reg_pair(rp),
        }
    }

    pub(crate) fn set_r16sp(&mut self, code: u8, value: u16) {
        match RegPair::from_code(code) {
            RegPair::AF => self.sp = value,
            rp => self.set_reg_pair(rp, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_high_then_low() {
        let mut cpu = Cpu::new();
        cpu.set_bc(0x1234);
        assert_eq!((cpu.b, cpu.c), (0x12, 0x34));
        cpu.d = 0xAB;
        cpu.e = 0xCD;
        assert_eq!(cpu.de(), 0xABCD);
        cpu.set_hl(0xBEEF);
        assert_eq!(cpu.reg(Reg::H), 0xBE);
        assert_eq!(cpu.reg(Reg::L), 0xEF);
    }

    #[test]
    fn flag_register_masks_low_nibble() {
        let mut cpu = Cpu::new();
        cpu.set_af(0x12FF);
        assert_eq!(cpu.a, 0x12);
        assert_eq!(cpu.f, 0xF0);
        assert_eq!(cpu.af(), 0x12F0);
        cpu.set_reg(Reg::F, 0x3A);
        assert_eq!(cpu.f, 0x30);
    }

    #[test]
    fn operand_codes() {
        assert_eq!(Reg::from_code(0).unwrap(), Reg::B);
        assert_eq!(Reg::from_code(7).unwrap(), Reg::A);
        assert!(matches!(Reg::from_code(6), Err(Error::BadRegister(6))));
        assert_eq!(RegPair::from_code(2), RegPair::HL);

        let mut cpu = Cpu::new();
        cpu.set_r16sp(3, 0xFFFE);
        assert_eq!(cpu.sp, 0xFFFE);
        assert_eq!(cpu.r16sp(3), 0xFFFE);
        assert_eq!(cpu.af(), 0x0000);
    }
}
