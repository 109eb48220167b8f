#![allow(dead_code)]

use gbsim_core::core::{AddressBus, Bus, Clocked, Component};
use gbsim_core::cpu::Cpu;
use gbsim_core::error::Result;

/// Minimal bus for testing: flat 64KB read/write memory, no peripherals.
pub struct TestBus {
    pub memory: [u8; 0x10000],
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.memory[addr as usize] = data;
        Ok(())
    }
}

/// Run one whole instruction (or interrupt dispatch) and return the number
/// of machine cycles it took.
pub fn run_instruction(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    let mut cycles = 0;
    loop {
        cpu.cycle(bus).unwrap();
        cycles += 1;
        if cpu.idle_cycles == 0 {
            return cycles;
        }
    }
}

/// Address bus with only `program` mapped, from 0x0000. Writes anywhere
/// else fail as unmapped.
pub fn program_only_bus(program: &[u8]) -> AddressBus {
    let mut bus = AddressBus::new();
    let rom = bus.attach(Component::new("program", 0x100).unwrap());
    bus.memory_mut(rom).unwrap()[..program.len()].copy_from_slice(program);
    bus.plug(rom, 0x0000, 0x00FF).unwrap();
    bus
}
