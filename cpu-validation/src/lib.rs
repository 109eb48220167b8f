use gbsim_core::core::Bus;
use gbsim_core::error::Result;
use serde::{Deserialize, Serialize};

// --- TracingBus: flat 64KB memory with access recording ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusOp {
    Read,
    Write,
}

#[derive(Clone, Debug)]
pub struct BusAccess {
    pub addr: u16,
    pub data: u8,
    pub op: BusOp,
}

pub struct TracingBus {
    pub memory: [u8; 0x10000],
    pub accesses: Vec<BusAccess>,
}

impl TracingBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            accesses: Vec::new(),
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    pub fn clear_accesses(&mut self) {
        self.accesses.clear();
    }

    pub fn writes(&self) -> impl Iterator<Item = &BusAccess> {
        self.accesses.iter().filter(|a| a.op == BusOp::Write)
    }
}

impl Default for TracingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for TracingBus {
    fn read(&mut self, addr: u16) -> u8 {
        let data = self.memory[addr as usize];
        self.accesses.push(BusAccess {
            addr,
            data,
            op: BusOp::Read,
        });
        data
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.memory[addr as usize] = data;
        self.accesses.push(BusAccess {
            addr,
            data,
            op: BusOp::Write,
        });
        Ok(())
    }
}

// --- SM83 JSON test vector types (SingleStepTests/sm83 format) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sm83TestCase {
    pub name: String,
    pub initial: Sm83CpuState,
    #[serde(rename = "final")]
    pub final_state: Sm83CpuState,
    /// One entry per machine cycle; idle cycles may be `null`.
    pub cycles: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sm83CpuState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    #[serde(default)]
    pub ime: u8,
    #[serde(default)]
    pub ie: Option<u8>,
    pub ram: Vec<(u16, u8)>,
}
