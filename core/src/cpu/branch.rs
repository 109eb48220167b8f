use super::Cpu;
use super::opcode::{Family, Instruction, extract_n3};
use crate::core::Bus;
use crate::core::bits::sign_extend;
use crate::error::Result;

impl Cpu {
    /// Jumps, calls and returns. Returns `true` when a conditional branch
    /// was taken, so the caller charges the extra cycles.
    pub(crate) fn op_branch<B: Bus + ?Sized>(
        &mut self,
        instr: &Instruction,
        bus: &mut B,
    ) -> Result<bool> {
        use Family::*;
        let next = self.pc.wrapping_add(instr.bytes as u16);

        let conditional = matches!(instr.family, JpCcN16 | JrCcE8 | CallCcN16 | RetCc);
        if conditional && !self.check_condition(instr.opcode) {
            self.pc = next;
            return Ok(false);
        }

        match instr.family {
            JpN16 | JpCcN16 => self.pc = self.read16_after_opcode(bus)?,
            JpHl => self.pc = self.hl(),
            // Relative to the following instruction; wraps around the address space
            JrE8 | JrCcE8 => {
                let offset = sign_extend(self.read_after_opcode(bus));
                self.pc = next.wrapping_add(offset);
            }
            CallN16 | CallCcN16 => {
                let target = self.read16_after_opcode(bus)?;
                self.call(bus, next, target)?;
            }
            RstU3 => self.call(bus, next, 8 * extract_n3(instr.opcode) as u16)?,
            Ret | RetCc => self.pc = self.pop(bus)?,
            Reti => {
                self.pc = self.pop(bus)?;
                self.ime = true;
            }
            other => unreachable!("{other:?} is not a branch family"),
        }
        Ok(conditional)
    }

    fn call<B: Bus + ?Sized>(&mut self, bus: &mut B, ret: u16, target: u16) -> Result<()> {
        self.push(bus, ret)?;
        self.pc = target;
        Ok(())
    }
}
