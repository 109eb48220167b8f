use std::path::Path;

use tracing::{debug, warn};

use crate::core::{AddressBus, Clocked, Component, ComponentId, Machine, WriteListener};
use crate::cpu::interrupt::{self, Interrupt};
use crate::cpu::{Cpu, CpuState, CpuStateTrait};
use crate::device::{BootRom, Cartridge, STUB_BOOT_ROM, SerialCapture, Timer};
use crate::error::Result;
use crate::memory_map::{
    ECHO_RAM, ENTRY_POINT, EXTERNAL_RAM, GRAPH_RAM, REGISTERS, UNUSABLE, VIDEO_RAM, WORK_RAM,
    window_len,
};

/// Machine cycles per display frame. The display is not simulated; this
/// is the period used when a periodic VBLANK request is wanted.
pub const CYCLES_PER_FRAME: u64 = 17_556;

/// Machine cycles per second.
pub const CYCLES_PER_SECOND: u64 = 1 << 20;

/// Power-on options.
#[derive(Debug, Clone, Default)]
pub struct GameBoyConfig {
    /// 256-byte boot program. The built-in stub is used when absent.
    pub boot_rom: Option<Vec<u8>>,
    /// Record bytes written to the serial data register.
    pub capture_serial: bool,
    /// Request VBLANK every this many cycles, standing in for the display.
    pub vblank_period: Option<u64>,
}

/// The whole console: bus, CPU, timer and the devices wired to them.
///
/// Every component lives in the bus; the system only keeps handles. Each
/// cycle runs the timer, then the CPU, then hands the address the CPU wrote
/// (if any) to the boot overlay, the timer and the serial capture.
pub struct GameBoy {
    bus: AddressBus,
    cpu: Cpu,
    timer: Timer,
    boot_rom: BootRom,
    serial: Option<SerialCapture>,
    /// Memory windows plugged at power-on, in plug order.
    memories: Vec<ComponentId>,
    cartridge: ComponentId,
    cycles: u64,
    vblank_period: Option<u64>,
}

impl GameBoy {
    pub fn new(cartridge: Cartridge) -> Result<Self> {
        Self::with_config(cartridge, GameBoyConfig::default())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(Cartridge::from_file(path)?)
    }

    /// Build the address map and power on.
    ///
    /// On failure everything created so far is dropped with the bus.
    pub fn with_config(cartridge: Cartridge, config: GameBoyConfig) -> Result<Self> {
        let mut bus = AddressBus::new();
        let mut memories = Vec::new();

        let work_ram = plug_memory(&mut bus, "work_ram", WORK_RAM)?;
        memories.push(work_ram);

        let echo_ram = bus.attach(Component::detached("echo_ram"));
        bus.share(echo_ram, work_ram)?;
        bus.plug(echo_ram, ECHO_RAM.0, ECHO_RAM.1)?;
        memories.push(echo_ram);

        for (name, window) in [
            ("registers", REGISTERS),
            ("external_ram", EXTERNAL_RAM),
            ("video_ram", VIDEO_RAM),
            ("graph_ram", GRAPH_RAM),
            ("unusable", UNUSABLE),
        ] {
            memories.push(plug_memory(&mut bus, name, window)?);
        }

        let mut cpu = Cpu::new();
        cpu.plug(&mut bus)?;

        let cartridge = cartridge.plug(&mut bus)?;
        let boot_image = config.boot_rom.as_deref().unwrap_or(&STUB_BOOT_ROM[..]);
        let boot_rom = BootRom::plug(&mut bus, boot_image, cartridge)?;

        debug!("powered on, boot program hands over at {ENTRY_POINT:#06X}");
        Ok(Self {
            bus,
            cpu,
            timer: Timer::new(),
            boot_rom,
            serial: config.capture_serial.then(SerialCapture::new),
            memories,
            cartridge,
            cycles: 0,
            vblank_period: config.vblank_period.filter(|&p| p > 0),
        })
    }

    /// Advance one machine cycle.
    pub fn step(&mut self) -> Result<()> {
        if let Some(period) = self.vblank_period
            && self.cycles > 0
            && self.cycles % period == 0
        {
            self.request_interrupt(Interrupt::VBlank)?;
        }

        self.timer.cycle(&mut self.bus)?;
        self.cpu.cycle(&mut self.bus)?;
        self.cycles += 1;

        if let Some(addr) = self.cpu.last_write {
            self.boot_rom.on_bus_write(&mut self.bus, addr)?;
            self.timer.on_bus_write(&mut self.bus, addr)?;
            if let Some(serial) = self.serial.as_mut() {
                serial.on_bus_write(&mut self.bus, addr)?;
            }
        }
        Ok(())
    }

    pub fn request_interrupt(&mut self, irq: Interrupt) -> Result<()> {
        interrupt::request_interrupt(&mut self.bus, irq)
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn bus(&self) -> &AddressBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut AddressBus {
        &mut self.bus
    }

    pub fn cartridge(&self) -> ComponentId {
        self.cartridge
    }

    /// True until the boot program writes the boot disable register.
    pub fn boot_active(&self) -> bool {
        self.boot_rom.is_active()
    }

    /// Bytes written to the serial data register, if capture is enabled.
    pub fn serial_output(&self) -> &[u8] {
        self.serial
            .as_ref()
            .map(SerialCapture::output)
            .unwrap_or_default()
    }
}

fn plug_memory(
    bus: &mut AddressBus,
    name: &'static str,
    window: (u16, u16),
) -> Result<ComponentId> {
    let id = bus.attach(Component::new(name, window_len(window))?);
    bus.plug(id, window.0, window.1)?;
    Ok(id)
}

impl Machine for GameBoy {
    fn run_until(&mut self, target: u64) -> Result<()> {
        while self.cycles < target {
            self.step()?;
        }
        Ok(())
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }

    fn request_interrupt(&mut self, irq: Interrupt) -> Result<()> {
        GameBoy::request_interrupt(self, irq)
    }

    fn serial_output(&self) -> &[u8] {
        GameBoy::serial_output(self)
    }

    fn cpu_state(&self) -> CpuState {
        self.cpu.snapshot()
    }
}

impl Drop for GameBoy {
    fn drop(&mut self) {
        if let Err(err) = self.cpu.unplug(&mut self.bus) {
            warn!("failed to unplug CPU: {err}");
        }
        if let Err(err) = self.boot_rom.release(&mut self.bus) {
            warn!("failed to release boot ROM: {err}");
        }
        // Aliases before the memory they mirror
        for &id in self.memories.iter().rev().chain([&self.cartridge]) {
            if let Err(err) = self.bus.unplug(id) {
                warn!("failed to unplug component #{}: {err}", id.index());
            }
        }
        debug!("powered off after {} cycles", self.cycles);
    }
}
