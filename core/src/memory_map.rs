//! Address map of the console's 16-bit bus.
//!
//! Windows are inclusive `(start, end)` pairs.

pub const BOOT_ROM: (u16, u16) = (0x0000, 0x00FF);
pub const BOOT_ROM_SIZE: usize = 0x100;

pub const ROM_BANK0: (u16, u16) = (0x0000, 0x3FFF);
pub const ROM_BANK1: (u16, u16) = (0x4000, 0x7FFF);
pub const ROM: (u16, u16) = (ROM_BANK0.0, ROM_BANK1.1);
pub const ROM_SIZE: usize = 0x8000;
/// Header byte describing the cartridge hardware.
pub const CARTRIDGE_TYPE: usize = 0x0147;
/// First instruction executed once the boot program hands over.
pub const ENTRY_POINT: u16 = 0x0100;

pub const VIDEO_RAM: (u16, u16) = (0x8000, 0x9FFF);
pub const EXTERNAL_RAM: (u16, u16) = (0xA000, 0xBFFF);
pub const WORK_RAM: (u16, u16) = (0xC000, 0xDFFF);
pub const ECHO_RAM: (u16, u16) = (0xE000, 0xFDFF);
pub const GRAPH_RAM: (u16, u16) = (0xFE00, 0xFE9F);
pub const UNUSABLE: (u16, u16) = (0xFEA0, 0xFEFF);
pub const REGISTERS: (u16, u16) = (0xFF00, 0xFF7F);
pub const HIGH_RAM: (u16, u16) = (0xFF80, 0xFFFE);

// Peripheral registers
pub const SB: u16 = 0xFF01;
pub const DIV: u16 = 0xFF04;
pub const TIMA: u16 = 0xFF05;
pub const TMA: u16 = 0xFF06;
pub const TAC: u16 = 0xFF07;
pub const IF: u16 = 0xFF0F;
pub const BOOT_DISABLE: u16 = 0xFF50;
pub const IE: u16 = 0xFFFF;

/// Number of bytes covered by an inclusive window.
pub const fn window_len(window: (u16, u16)) -> usize {
    (window.1 - window.0) as usize + 1
}
