use std::path::Path;

use tracing::debug;

use crate::core::{AddressBus, Component, ComponentId, Memory};
use crate::error::{Error, Result};
use crate::memory_map::{CARTRIDGE_TYPE, ROM, ROM_SIZE};

/// Plain ROM cartridge: two 16 KiB banks and no mapper.
///
/// Only images whose header declares cartridge type 0 are accepted; any
/// bank-switching hardware is refused rather than silently ignored.
#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Memory,
}

impl Cartridge {
    /// Build from a ROM image. Bytes past the two banks are ignored.
    pub fn from_bytes(image: &[u8]) -> Result<Self> {
        if image.len() < ROM_SIZE {
            return Err(Error::RomTooSmall {
                expected: ROM_SIZE,
                actual: image.len(),
            });
        }
        let kind = image[CARTRIDGE_TYPE];
        if kind != 0 {
            return Err(Error::UnsupportedCartridge { kind });
        }
        let mut rom = Memory::new(ROM_SIZE)?;
        rom.load(0, &image[..ROM_SIZE])?;
        Ok(Self { rom })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = std::fs::read(path)?;
        debug!("read {} bytes from {}", image.len(), path.display());
        Self::from_bytes(&image)
    }

    pub fn rom(&self) -> &[u8] {
        self.rom.as_slice()
    }

    /// Hand the ROM to the bus and map it over both bank windows.
    pub fn plug(self, bus: &mut AddressBus) -> Result<ComponentId> {
        let id = bus.attach(Component::with_memory("cartridge", self.rom));
        bus.forced_plug(id, ROM.0, ROM.1, 0)?;
        Ok(id)
    }
}
