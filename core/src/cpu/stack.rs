use super::Cpu;
use super::opcode::{Family, Instruction, extract_reg_pair};
use super::registers::RegPair;
use crate::core::Bus;
use crate::error::Result;

impl Cpu {
    /// PUSH rr / POP rr. Code 3 is AF here, never SP.
    pub(crate) fn op_stack<B: Bus + ?Sized>(
        &mut self,
        instr: &Instruction,
        bus: &mut B,
    ) -> Result<()> {
        let rp = RegPair::from_code(extract_reg_pair(instr.opcode));
        match instr.family {
            Family::PushR16 => self.push(bus, self.reg_pair(rp)),
            Family::PopR16 => {
                let value = self.pop(bus)?;
                self.set_reg_pair(rp, value);
                Ok(())
            }
            other => unreachable!("{other:?} is not a stack family"),
        }
    }
}
