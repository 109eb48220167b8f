use super::Cpu;
use super::alu;
use super::flags::FlagPolicy;
use super::opcode::{Family, Instruction, extract_n3, extract_reg, extract_rot_dir, extract_sr_bit};
use super::registers::Reg;
use crate::core::Bus;
use crate::core::bits::{RotDir, bit_edit};
use crate::error::Result;

/// Where a prefixed instruction reads and writes its operand.
#[derive(Copy, Clone)]
enum Target {
    Hl,
    Reg(Reg),
}

impl Cpu {
    fn bit_target(&self, instr: &Instruction) -> Result<Target> {
        use Family::*;
        match instr.family {
            SlaHlr | SraHlr | SrlHlr | RotcHlr | RotHlr | SwapHlr | BitU3Hlr | ChgU3Hlr => {
                Ok(Target::Hl)
            }
            _ => Ok(Target::Reg(Reg::from_code(extract_reg(instr.opcode, 0))?)),
        }
    }

    fn load_target<B: Bus + ?Sized>(&self, target: Target, bus: &mut B) -> u8 {
        match target {
            Target::Hl => self.read_at_hl(bus),
            Target::Reg(r) => self.reg(r),
        }
    }

    fn store_target<B: Bus + ?Sized>(
        &mut self,
        target: Target,
        bus: &mut B,
        value: u8,
    ) -> Result<()> {
        match target {
            Target::Hl => self.write_at_hl(bus, value),
            Target::Reg(r) => {
                self.set_reg(r, value);
                Ok(())
            }
        }
    }

    /// Shifts, rotates, SWAP, BIT, SET and RES.
    pub(crate) fn op_bit<B: Bus + ?Sized>(
        &mut self,
        instr: &Instruction,
        bus: &mut B,
    ) -> Result<()> {
        use Family::*;
        let op = instr.opcode;

        match instr.family {
            // RLCA/RRCA
            RotcA => {
                self.alu = alu::rotate(self.a, extract_rot_dir(op));
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::ROTATE_A);
            }
            // RLA/RRA
            RotA => {
                self.alu = alu::carry_rotate(self.a, extract_rot_dir(op), self.f);
                self.a = self.alu.byte();
                self.combine_flags(FlagPolicy::ROTATE_A);
            }

            BitU3Hlr | BitU3R8 => {
                let target = self.bit_target(instr)?;
                let value = self.load_target(target, bus);
                self.alu = alu::test_bit(value, extract_n3(op));
                self.combine_flags(FlagPolicy::BIT);
            }
            // SET/RES leave the flags alone
            ChgU3Hlr | ChgU3R8 => {
                let target = self.bit_target(instr)?;
                let mut value = self.load_target(target, bus);
                bit_edit(&mut value, extract_n3(op), extract_sr_bit(op));
                self.store_target(target, bus, value)?;
            }

            family => {
                let target = self.bit_target(instr)?;
                let value = self.load_target(target, bus);
                let (result, policy) = match family {
                    RotcHlr | RotcR8 => (
                        alu::rotate(value, extract_rot_dir(op)),
                        FlagPolicy::SHIFT,
                    ),
                    RotHlr | RotR8 => (
                        alu::carry_rotate(value, extract_rot_dir(op), self.f),
                        FlagPolicy::SHIFT,
                    ),
                    SlaHlr | SlaR8 => (alu::shift(value, RotDir::Left), FlagPolicy::SHIFT),
                    SraHlr | SraR8 => (alu::shift_right_arithmetic(value), FlagPolicy::SHIFT),
                    SrlHlr | SrlR8 => (alu::shift(value, RotDir::Right), FlagPolicy::SHIFT),
                    SwapHlr | SwapR8 => (alu::swap(value), FlagPolicy::SWAP),
                    other => unreachable!("{other:?} is not a bit family"),
                };
                self.store_target(target, bus, result.byte())?;
                self.alu = result;
                self.combine_flags(policy);
            }
        }
        Ok(())
    }
}
