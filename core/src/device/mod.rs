pub mod boot_rom;
pub mod cartridge;
pub mod serial;
pub mod timer;

pub use boot_rom::{BootRom, STUB_BOOT_ROM};
pub use cartridge::Cartridge;
pub use serial::SerialCapture;
pub use timer::Timer;
