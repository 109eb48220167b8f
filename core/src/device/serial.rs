use tracing::trace;

use crate::core::{Bus, WriteListener};
use crate::error::Result;
use crate::memory_map::SB;

/// Serial console capture.
///
/// Test ROMs print their results one byte at a time through the serial
/// data register; this keeps every byte the CPU writes there.
#[derive(Debug, Default)]
pub struct SerialCapture {
    output: Vec<u8>,
}

impl SerialCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

impl<B: Bus + ?Sized> WriteListener<B> for SerialCapture {
    fn on_bus_write(&mut self, bus: &mut B, addr: u16) -> Result<()> {
        if addr == SB {
            let byte = bus.read(SB);
            trace!("serial {byte:#04X}");
            self.output.push(byte);
        }
        Ok(())
    }
}
