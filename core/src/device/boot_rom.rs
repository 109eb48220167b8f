use tracing::info;

use crate::core::{AddressBus, Component, ComponentId, Memory, WriteListener};
use crate::error::{Error, Result};
use crate::memory_map::{BOOT_DISABLE, BOOT_ROM, BOOT_ROM_SIZE, ROM};

/// Minimal boot program used when no boot image is supplied.
///
/// Sets SP, jumps to the end of the overlay and writes 1 to the boot
/// disable register; execution then falls through to the cartridge entry
/// point at 0x0100.
pub const STUB_BOOT_ROM: [u8; BOOT_ROM_SIZE] = {
    let mut rom = [0u8; BOOT_ROM_SIZE];
    // LD SP,0xFFFE
    rom[0x00] = 0x31;
    rom[0x01] = 0xFE;
    rom[0x02] = 0xFF;
    // JP 0x00FC
    rom[0x03] = 0xC3;
    rom[0x04] = 0xFC;
    rom[0x05] = 0x00;
    // LD A,0x01
    rom[0xFC] = 0x3E;
    rom[0xFD] = 0x01;
    // LDH (0x50),A
    rom[0xFE] = 0xE0;
    rom[0xFF] = 0x50;
    rom
};

/// Boot program overlay.
///
/// Force-plugged over the bottom of the cartridge at power-on. The first
/// CPU write to the boot disable register releases the overlay and maps the
/// cartridge back over its full window; later writes do nothing.
pub struct BootRom {
    overlay: Option<ComponentId>,
    cartridge: ComponentId,
}

impl BootRom {
    pub fn plug(bus: &mut AddressBus, content: &[u8], cartridge: ComponentId) -> Result<Self> {
        if content.len() != BOOT_ROM_SIZE {
            return Err(Error::BadBootImage {
                expected: BOOT_ROM_SIZE,
                actual: content.len(),
            });
        }
        let mut memory = Memory::new(BOOT_ROM_SIZE)?;
        memory.load(0, content)?;
        let id = bus.attach(Component::with_memory("boot_rom", memory));
        if let Err(err) = bus.forced_plug(id, BOOT_ROM.0, BOOT_ROM.1, 0) {
            let _ = bus.release(id);
            return Err(err);
        }
        Ok(Self {
            overlay: Some(id),
            cartridge,
        })
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_some()
    }

    /// Drop the overlay and expose the cartridge at 0x0000.
    pub fn disable(&mut self, bus: &mut AddressBus) -> Result<()> {
        let Some(id) = self.overlay else {
            return Ok(());
        };
        bus.release(id)?;
        self.overlay = None;
        bus.unplug(self.cartridge)?;
        bus.forced_plug(self.cartridge, ROM.0, ROM.1, 0)?;
        info!("boot ROM disabled, cartridge mapped at {:#06X}", ROM.0);
        Ok(())
    }

    /// Drop the overlay without touching the cartridge mapping.
    pub fn release(&mut self, bus: &mut AddressBus) -> Result<()> {
        if let Some(id) = self.overlay.take() {
            bus.release(id)?;
        }
        Ok(())
    }
}

impl WriteListener<AddressBus> for BootRom {
    fn on_bus_write(&mut self, bus: &mut AddressBus, addr: u16) -> Result<()> {
        if addr == BOOT_DISABLE && self.is_active() {
            self.disable(bus)?;
        }
        Ok(())
    }
}
