use crate::cpu::CpuState;
use crate::cpu::interrupt::Interrupt;
use crate::error::Result;

/// Uniform driving surface for a simulated system.
///
/// The frontend only talks to this trait: it never reaches into the bus or
/// the devices of a concrete machine.
pub trait Machine {
    /// Advance cycle by cycle until `cycles()` reaches `target`.
    ///
    /// Stops at the first error, leaving the machine at the cycle that
    /// failed. A target at or below the current count is a no-op.
    fn run_until(&mut self, target: u64) -> Result<()>;

    /// Machine cycles elapsed since power-on.
    fn cycles(&self) -> u64;

    /// Raise an interrupt request line (display vsync, input, ...).
    fn request_interrupt(&mut self, irq: Interrupt) -> Result<()>;

    /// Bytes written to the serial console so far.
    fn serial_output(&self) -> &[u8];

    /// Snapshot of the CPU registers.
    fn cpu_state(&self) -> CpuState;
}
