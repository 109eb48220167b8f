use super::Cpu;
use super::alu;
use super::flags::{Flag, FlagPolicy};
use super::opcode::{Family, Instruction, extract_carry, extract_reg, extract_reg_pair};
use super::registers::Reg;
use crate::core::Bus;
use crate::core::bits::{bit_get, sign_extend};
use crate::error::Result;

impl Cpu {
    /// 8-bit source operand: (HL), the immediate byte, or the register in bits 2-0.
    fn alu_operand<B: Bus + ?Sized>(&self, instr: &Instruction, bus: &mut B) -> Result<u8> {
        use Family::*;
        match instr.family {
            AddAHlr | SubAHlr | AndAHlr | OrAHlr | XorAHlr | CpAHlr => Ok(self.read_at_hl(bus)),
            AddAN8 | SubAN8 | AndAN8 | OrAN8 | XorAN8 | CpAN8 => Ok(self.read_after_opcode(bus)),
            _ => Ok(self.reg(Reg::from_code(extract_reg(instr.opcode, 0))?)),
        }
    }

    /// Carry/borrow in for ADC and SBC; ADD and SUB ignore it.
    fn carry_in(&self, opcode: u8) -> bool {
        extract_carry(opcode) && Flag::C.is_set(self.f)
    }

    /// Arithmetic, logic and compare families.
    pub(crate) fn op_arith<B: Bus + ?Sized>(
        &mut self,
        instr: &Instruction,
        bus: &mut B,
    ) -> Result<()> {
        use Family::*;
        let op = instr.opcode;

        match instr.family {
            // ADD/ADC A,x
            AddAHlr | AddAN8 | AddAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::add8(self.a, value, self.carry_in(op));
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::ADD);
            }
            // SUB/SBC A,x
            SubAHlr | SubAN8 | SubAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::sub8(self.a, value, self.carry_in(op));
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::SUB);
            }
            CpAHlr | CpAN8 | CpAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::sub8(self.a, value, false);
                self.combine_flags(FlagPolicy::SUB);
            }
            AndAHlr | AndAN8 | AndAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::and8(self.a, value);
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::AND);
            }
            OrAHlr | OrAN8 | OrAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::or8(self.a, value);
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::OR);
            }
            XorAHlr | XorAN8 | XorAR8 => {
                let value = self.alu_operand(instr, bus)?;
                self.alu = alu::xor8(self.a, value);
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::OR);
            }

            // INC/DEC 8-bit
            IncHlr => {
                let result = alu::add8(self.read_at_hl(bus), 1, false);
                self.write_at_hl(bus, result.byte())?;
                self.alu = result;
                self.combine_flags(FlagPolicy::INC);
            }
            IncR8 => {
                let r = Reg::from_code(extract_reg(op, 3))?;
                self.alu = alu::add8(self.reg(r), 1, false);
                self.combine_flags(FlagPolicy::INC);
                self.set_reg(r, self.alu.byte());
            }
            DecHlr => {
                let result = alu::sub8(self.read_at_hl(bus), 1, false);
                self.write_at_hl(bus, result.byte())?;
                self.alu = result;
                self.combine_flags(FlagPolicy::DEC);
            }
            DecR8 => {
                let r = Reg::from_code(extract_reg(op, 3))?;
                self.alu = alu::sub8(self.reg(r), 1, false);
                self.combine_flags(FlagPolicy::DEC);
                self.set_reg(r, self.alu.byte());
            }

            // 16-bit arithmetic
            AddHlR16sp => {
                let value = self.r16sp(extract_reg_pair(op));
                self.alu = alu::add16_high(self.hl(), value);
                self.combine_flags(FlagPolicy::ADD16);
                self.set_hl(self.alu.value);
            }
            // Flags untouched
            IncR16sp => {
                let code = extract_reg_pair(op);
                self.alu = alu::add16_low(self.r16sp(code), 1);
                self.set_r16sp(code, self.alu.value);
            }
            DecR16sp => {
                let code = extract_reg_pair(op);
                self.alu = alu::add16_low(self.r16sp(code), 0xFFFF);
                self.set_r16sp(code, self.alu.value);
            }
            // E8: ADD SP,e8   F8: LD HL,SP+e8
            LdHlSpS8 => {
                let offset = sign_extend(self.read_after_opcode(bus));
                self.alu = alu::add16_low(self.sp, offset);
                self.combine_flags(FlagPolicy::SP_OFFSET);
                if bit_get(op, 4) {
                    self.set_hl(self.alu.value);
                } else {
                    self.sp = self.alu.value;
                }
            }

            Cpl => {
                self.a = !self.a;
                self.combine_flags(FlagPolicy::CPL);
            }
            Daa => {
                self.alu = alu::decimal_adjust(self.a, self.f);
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::DAA);
            }
            // 37: SCF   3F: CCF
            Sccf => {
                self.alu = if extract_carry(op) {
                    alu::complement_carry(self.f)
                } else {
                    alu::set_carry(true)
                };
                self.combine_flags(FlagPolicy::SCCF);
            }

            other => unreachable!("{other:?} is not an arithmetic family"),
        }
        Ok(())
    }
}
