use crate::core::bits::{bit_get, bit_get16, msb8};
use crate::core::{Bus, Clocked, WriteListener};
use crate::cpu::interrupt::{Interrupt, request_interrupt};
use crate::error::Result;
use crate::memory_map::{DIV, TAC, TIMA, TMA};

/// Counter ticks per machine cycle.
pub const TICKS_PER_CYCLE: u16 = 4;

/// TAC bit 2 enables TIMA.
const TAC_ENABLE_BIT: u32 = 2;

/// Divider/timer unit (DIV, TIMA, TMA, TAC).
///
/// A free-running 16-bit counter advances by [`TICKS_PER_CYCLE`] every
/// machine cycle; DIV is its high byte. TIMA lives on the bus and is
/// incremented on each falling edge of the counter bit selected by TAC
/// (gated by the TAC enable bit). When TIMA wraps it is reloaded from TMA
/// and the timer interrupt is requested.
pub struct Timer {
    counter: u16,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Current value of the free-running counter.
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Counter bit watched for TIMA increments, selected by TAC bits 1-0.
    pub fn watched_bit(tac: u8) -> u32 {
        match tac & 0x03 {
            0 => 9,
            1 => 3,
            2 => 5,
            _ => 7,
        }
    }

    /// True when TIMA counting is enabled and the watched bit is high.
    fn state<B: Bus + ?Sized>(&self, bus: &mut B) -> bool {
        let tac = bus.read(TAC);
        bit_get(tac, TAC_ENABLE_BIT) && bit_get16(self.counter, Self::watched_bit(tac))
    }

    /// Increment TIMA if the state fell from high to low since `was_active`.
    fn step_on_falling_edge<B: Bus + ?Sized>(
        &mut self,
        bus: &mut B,
        was_active: bool,
    ) -> Result<()> {
        if !was_active || self.state(bus) {
            return Ok(());
        }
        match bus.read(TIMA).checked_add(1) {
            Some(tima) => bus.write(TIMA, tima),
            None => {
                request_interrupt(bus, Interrupt::Timer)?;
                let reload = bus.read(TMA);
                bus.write(TIMA, reload)
            }
        }
    }
}

impl<B: Bus + ?Sized> Clocked<B> for Timer {
    fn cycle(&mut self, bus: &mut B) -> Result<()> {
        let was_active = self.state(bus);
        self.counter = self.counter.wrapping_add(TICKS_PER_CYCLE);
        bus.write(DIV, msb8(self.counter))?;
        self.step_on_falling_edge(bus, was_active)
    }
}

impl<B: Bus + ?Sized> WriteListener<B> for Timer {
    /// Any write to DIV resets the whole counter, which can itself produce
    /// a falling edge.
    fn on_bus_write(&mut self, bus: &mut B, addr: u16) -> Result<()> {
        let was_active = self.state(bus);
        if addr == DIV {
            self.counter = 0;
            bus.write(DIV, 0)?;
        }
        self.step_on_falling_edge(bus, was_active)
    }
}
