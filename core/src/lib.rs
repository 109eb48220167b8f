pub mod core;
pub mod cpu;
pub mod device;
pub mod error;
pub mod gameboy;
pub mod memory_map;

pub use error::{Error, ErrorKind, Result};
pub use gameboy::{GameBoy, GameBoyConfig};

pub mod prelude {
    pub use crate::core::{AddressBus, Bus, Clocked, Machine, WriteListener};
    pub use crate::cpu::interrupt::Interrupt;
    pub use crate::cpu::{Cpu, CpuState, CpuStateTrait};
    pub use crate::device::Cartridge;
    pub use crate::gameboy::{GameBoy, GameBoyConfig};
}
