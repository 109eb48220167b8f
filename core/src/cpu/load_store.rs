use super::Cpu;
use super::opcode::{Family, Instruction, extract_hl_increment, extract_reg, extract_reg_pair};
use super::registers::Reg;
use crate::core::Bus;
use crate::error::Result;
use crate::memory_map::REGISTERS;

/// `LDH` and `LD (C)` address the peripheral register page.
fn register_page(offset: u8) -> u16 {
    REGISTERS.0 + offset as u16
}

impl Cpu {
    /// Loads, stores and register copies.
    pub(crate) fn op_load_store<B: Bus + ?Sized>(
        &mut self,
        instr: &Instruction,
        bus: &mut B,
    ) -> Result<()> {
        use Family::*;
        let op = instr.opcode;

        match instr.family {
            // --- Loads into A ---
            LdABcr => self.a = self.read_at(bus, self.bc()),
            LdADer => self.a = self.read_at(bus, self.de()),
            LdACr => self.a = self.read_at(bus, register_page(self.c)),
            LdAN8r => {
                let addr = register_page(self.read_after_opcode(bus));
                self.a = self.read_at(bus, addr);
            }
            LdAN16r => {
                let addr = self.read16_after_opcode(bus)?;
                self.a = self.read_at(bus, addr);
            }
            // 2A: LD A,(HL+)   3A: LD A,(HL-)
            LdAHlru => {
                self.a = self.read_at_hl(bus);
                self.set_hl(self.hl().wrapping_add(extract_hl_increment(op)));
            }

            // --- Other loads ---
            LdR16spN16 => {
                let value = self.read16_after_opcode(bus)?;
                self.set_r16sp(extract_reg_pair(op), value);
            }
            LdR8Hlr => {
                let r = Reg::from_code(extract_reg(op, 3))?;
                let value = self.read_at_hl(bus);
                self.set_reg(r, value);
            }
            LdR8N8 => {
                let r = Reg::from_code(extract_reg(op, 3))?;
                let value = self.read_after_opcode(bus);
                self.set_reg(r, value);
            }

            // --- Stores ---
            LdBcrA => self.write_at(bus, self.bc(), self.a)?,
            LdDerA => self.write_at(bus, self.de(), self.a)?,
            LdCrA => self.write_at(bus, register_page(self.c), self.a)?,
            LdN8rA => {
                let addr = register_page(self.read_after_opcode(bus));
                self.write_at(bus, addr, self.a)?;
            }
            LdN16rA => {
                let addr = self.read16_after_opcode(bus)?;
                self.write_at(bus, addr, self.a)?;
            }
            LdN16rSp => {
                let addr = self.read16_after_opcode(bus)?;
                self.write16_at(bus, addr, self.sp)?;
            }
            // 22: LD (HL+),A   32: LD (HL-),A
            LdHlruA => {
                self.write_at_hl(bus, self.a)?;
                self.set_hl(self.hl().wrapping_add(extract_hl_increment(op)));
            }
            LdHlrN8 => {
                let value = self.read_after_opcode(bus);
                self.write_at_hl(bus, value)?;
            }
            LdHlrR8 => {
                let value = self.reg(Reg::from_code(extract_reg(op, 0))?);
                self.write_at_hl(bus, value)?;
            }

            // --- Copies ---
            LdSpHl => self.sp = self.hl(),
            LdR8R8 => {
                let from = Reg::from_code(extract_reg(op, 0))?;
                let to = Reg::from_code(extract_reg(op, 3))?;
                self.set_reg(to, self.reg(from));
            }

            other => unreachable!("{other:?} is not a load/store family"),
        }
        Ok(())
    }
}
