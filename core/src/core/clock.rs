use super::bus::Bus;
use crate::error::Result;

/// A device advanced once per machine cycle by the system driver.
pub trait Clocked<B: Bus + ?Sized> {
    /// Advance by one machine cycle, exchanging data over `bus`.
    fn cycle(&mut self, bus: &mut B) -> Result<()>;
}

/// A device that reacts to CPU bus writes.
///
/// After each cycle in which the CPU wrote to the bus, the driver calls
/// every listener with the address of that write. Listeners that rewire
/// the bus implement this for [`AddressBus`](super::AddressBus) only.
pub trait WriteListener<B: Bus + ?Sized> {
    fn on_bus_write(&mut self, bus: &mut B, addr: u16) -> Result<()>;
}
