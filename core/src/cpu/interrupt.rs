use tracing::trace;

use super::{Cpu, INTERRUPT_CYCLES};
use crate::core::Bus;
use crate::core::bits::{bit_get, bit_unset};
use crate::error::Result;
use crate::memory_map::IF;

/// Interrupt sources, in priority order (lowest bit wins).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit position in IE/IF.
    pub fn bit(self) -> u32 {
        self as u32
    }

    pub fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Handler address.
    pub fn vector(self) -> u16 {
        0x40 + 8 * self as u16
    }

    /// Highest-priority source set in `mask`.
    pub fn highest_priority(mask: u8) -> Option<Interrupt> {
        Self::ALL.into_iter().find(|irq| bit_get(mask, irq.bit()))
    }
}

/// Raise `irq` in the IF register.
pub fn request_interrupt<B: Bus + ?Sized>(bus: &mut B, irq: Interrupt) -> Result<()> {
    let flags = bus.read(IF);
    bus.write(IF, flags | irq.mask())
}

impl Cpu {
    /// Service the highest-priority pending interrupt: push PC, acknowledge
    /// its IF bit, disable IME and jump to the vector.
    pub(crate) fn service_interrupt<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        pending: u8,
    ) -> Result<()> {
        let Some(irq) = Interrupt::highest_priority(pending) else {
            return Ok(());
        };
        trace!("servicing {irq:?} interrupt from {:#06X}", self.pc);

        self.push(bus, self.pc)?;
        let mut flags = bus.read(IF);
        bit_unset(&mut flags, irq.bit());
        bus.write(IF, flags)?;
        self.ime = false;
        self.pc = irq.vector();
        self.idle_cycles += INTERRUPT_CYCLES;
        Ok(())
    }
}
