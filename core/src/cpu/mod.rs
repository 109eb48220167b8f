//! SM83 CPU core.
//!
//! The CPU is stepped one machine cycle at a time. A fetch executes the whole
//! instruction at once and then sets `idle_cycles` so that the following
//! `cycles - 1` calls to [`Cpu::cycle`] do nothing, which keeps the
//! externally visible timing exact.

pub mod alu;
mod arith;
mod bit;
mod branch;
pub mod flags;
pub mod interrupt;
mod load_store;
pub mod opcode;
pub mod registers;
mod stack;
pub mod state;

pub use alu::AluOutput;
pub use flags::{Flag, FlagPolicy, FlagSource};
pub use interrupt::Interrupt;
pub use opcode::{Family, Instruction};
pub use registers::{Reg, RegPair};
pub use state::{CpuState, CpuStateTrait};

use tracing::error;

use crate::core::{AddressBus, Bus, Clocked, Component, ComponentId};
use crate::error::{Error, Result};
use crate::memory_map::{HIGH_RAM, IE, IF, window_len};
use opcode::{DIRECT, PREFIX, PREFIXED};

/// Only the low five bits of IE/IF name interrupt sources.
pub const INTERRUPT_MASK: u8 = 0x1F;

/// Cycles charged for dispatching to an interrupt vector.
pub const INTERRUPT_CYCLES: u8 = 5;

/// Bus-side storage the CPU owns while plugged.
#[derive(Debug, Clone, Copy)]
struct Plugged {
    high_ram: ComponentId,
    if_reg: ComponentId,
    ie_reg: ComponentId,
}

pub struct Cpu {
    // Registers
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,

    /// Scratch result of the last ALU operation, zeroed before each dispatch.
    pub alu: AluOutput,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// Cycles left before the next fetch.
    pub idle_cycles: u8,
    /// Address of the last CPU write in the current cycle.
    pub last_write: Option<u16>,

    plugged: Option<Plugged>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            f: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: 0,
            pc: 0,
            alu: AluOutput::default(),
            ime: false,
            halted: false,
            idle_cycles: 0,
            last_write: None,
            plugged: None,
        }
    }

    /// Plug high RAM, IF and IE onto the bus.
    ///
    /// IF sits inside the peripheral register window, so it is force-plugged
    /// over whatever is there.
    pub fn plug(&mut self, bus: &mut AddressBus) -> Result<()> {
        let high_ram = bus.attach(Component::new("high_ram", window_len(HIGH_RAM))?);
        let if_reg = bus.attach(Component::new("interrupt_flag", 1)?);
        let ie_reg = bus.attach(Component::new("interrupt_enable", 1)?);
        let plugged = bus
            .plug(high_ram, HIGH_RAM.0, HIGH_RAM.1)
            .and_then(|()| bus.forced_plug(if_reg, IF, IF, 0))
            .and_then(|()| bus.plug(ie_reg, IE, IE));
        if let Err(err) = plugged {
            for id in [high_ram, if_reg, ie_reg] {
                let _ = bus.release(id);
            }
            return Err(err);
        }
        self.plugged = Some(Plugged {
            high_ram,
            if_reg,
            ie_reg,
        });
        Ok(())
    }

    /// Release everything [`Cpu::plug`] put on the bus.
    pub fn unplug(&mut self, bus: &mut AddressBus) -> Result<()> {
        if let Some(p) = self.plugged.take() {
            for id in [p.high_ram, p.if_reg, p.ie_reg] {
                bus.release(id)?;
            }
        }
        Ok(())
    }

    pub fn is_plugged(&self) -> bool {
        self.plugged.is_some()
    }

    // --- Bus access ---

    pub fn read_at<B: Bus + ?Sized>(&self, bus: &mut B, addr: u16) -> u8 {
        bus.read(addr)
    }

    pub fn read16_at<B: Bus + ?Sized>(&self, bus: &mut B, addr: u16) -> Result<u16> {
        bus.read16(addr)
    }

    /// Write through the bus, recording `addr` for the write listeners.
    pub fn write_at<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16, data: u8) -> Result<()> {
        bus.write(addr, data)?;
        self.last_write = Some(addr);
        Ok(())
    }

    pub fn write16_at<B: Bus + ?Sized>(&mut self, bus: &mut B, addr: u16, data: u16) -> Result<()> {
        bus.write16(addr, data)?;
        self.last_write = Some(addr);
        Ok(())
    }

    /// Byte following the opcode at PC.
    pub fn read_after_opcode<B: Bus + ?Sized>(&self, bus: &mut B) -> u8 {
        bus.read(self.pc.wrapping_add(1))
    }

    /// Little-endian word following the opcode at PC.
    pub fn read16_after_opcode<B: Bus + ?Sized>(&self, bus: &mut B) -> Result<u16> {
        bus.read16(self.pc.wrapping_add(1))
    }

    pub(crate) fn read_at_hl<B: Bus + ?Sized>(&self, bus: &mut B) -> u8 {
        bus.read(self.hl())
    }

    pub(crate) fn write_at_hl<B: Bus + ?Sized>(&mut self, bus: &mut B, data: u8) -> Result<()> {
        self.write_at(bus, self.hl(), data)
    }

    /// Push a word; the stack grows downward.
    pub fn push<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u16) -> Result<()> {
        let sp = self.sp.wrapping_sub(2);
        self.write16_at(bus, sp, value)?;
        self.sp = sp;
        Ok(())
    }

    pub fn pop<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u16> {
        let value = self.read16_at(bus, self.sp)?;
        self.sp = self.sp.wrapping_add(2);
        Ok(value)
    }

    // --- Interrupt registers ---

    pub fn interrupt_enable<B: Bus + ?Sized>(&self, bus: &mut B) -> u8 {
        bus.read(IE)
    }

    pub fn interrupt_flag<B: Bus + ?Sized>(&self, bus: &mut B) -> u8 {
        bus.read(IF)
    }

    /// Sources both requested and enabled.
    pub fn interrupt_pending<B: Bus + ?Sized>(&self, bus: &mut B) -> u8 {
        self.interrupt_enable(bus) & self.interrupt_flag(bus) & INTERRUPT_MASK
    }

    // --- Execution ---

    /// Branch condition encoded in bits 4-3: NZ, Z, NC, C.
    pub fn check_condition(&self, opcode: u8) -> bool {
        match opcode::extract_cc(opcode) {
            0 => !Flag::Z.is_set(self.f),
            1 => Flag::Z.is_set(self.f),
            2 => !Flag::C.is_set(self.f),
            _ => Flag::C.is_set(self.f),
        }
    }

    /// Fetch and decode the instruction at PC.
    fn decode<B: Bus + ?Sized>(&self, bus: &mut B) -> Result<Instruction> {
        let opcode = bus.read(self.pc);
        let (entry, opcode, prefixed) = if opcode == PREFIX {
            let second = self.read_after_opcode(bus);
            (PREFIXED[second as usize], second, true)
        } else {
            (DIRECT[opcode as usize], opcode, false)
        };
        entry.ok_or_else(|| {
            let err = Error::UnknownOpcode {
                opcode,
                prefixed,
                pc: self.pc,
            };
            error!("{err}");
            err
        })
    }

    /// Execute one decoded instruction and charge its cycles.
    pub fn dispatch<B: Bus + ?Sized>(&mut self, instr: &Instruction, bus: &mut B) -> Result<()> {
        use Family::*;

        self.alu = AluOutput::default();
        let mut extra_cycles = 0;

        match instr.family {
            AddAHlr | AddAN8 | AddAR8 | IncHlr | IncR8 | AddHlR16sp | IncR16sp | SubAHlr
            | SubAN8 | SubAR8 | DecHlr | DecR8 | DecR16sp | AndAHlr | AndAN8 | AndAR8 | OrAHlr
            | OrAN8 | OrAR8 | XorAHlr | XorAN8 | XorAR8 | Cpl | CpAHlr | CpAN8 | CpAR8
            | LdHlSpS8 | Daa | Sccf => {
                self.op_arith(instr, bus)?;
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            SlaHlr | SlaR8 | SraHlr | SraR8 | SrlHlr | SrlR8 | RotcA | RotA | RotcHlr | RotcR8
            | RotHlr | RotR8 | SwapHlr | SwapR8 | BitU3Hlr | BitU3R8 | ChgU3Hlr | ChgU3R8 => {
                self.op_bit(instr, bus)?;
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            PushR16 | PopR16 => {
                self.op_stack(instr, bus)?;
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            LdABcr | LdACr | LdADer | LdAHlru | LdAN16r | LdAN8r | LdBcrA | LdCrA | LdDerA
            | LdHlruA | LdHlrN8 | LdHlrR8 | LdN16rA | LdN16rSp | LdN8rA | LdR16spN16
            | LdR8Hlr | LdR8N8 | LdR8R8 | LdSpHl => {
                self.op_load_store(instr, bus)?;
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            JpN16 | JpCcN16 | JpHl | JrE8 | JrCcE8 | CallN16 | CallCcN16 | RstU3 | Ret | RetCc
            | Reti => {
                if self.op_branch(instr, bus)? {
                    extra_cycles = instr.extra_cycles;
                }
            }

            Edi => {
                self.ime = opcode::extract_ime(instr.opcode);
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            Halt => {
                self.halted = true;
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }

            Stop | Nop => {
                self.pc = self.pc.wrapping_add(instr.bytes as u16);
            }
        }
        self.idle_cycles = instr.cycles.saturating_sub(1) + extra_cycles;
        Ok(())
    }

    /// Write the ALU scratch flags into F under `policy`.
    pub(crate) fn combine_flags(&mut self, policy: FlagPolicy) {
        self.f = flags::combine(self.f, self.alu.flags, policy);
    }
}

impl<B: Bus + ?Sized> Clocked<B> for Cpu {
    /// One machine cycle: idle, wake from HALT, service an interrupt, or
    /// fetch and execute.
    fn cycle(&mut self, bus: &mut B) -> Result<()> {
        self.last_write = None;

        if self.idle_cycles > 0 {
            self.idle_cycles -= 1;
            return Ok(());
        }

        let pending = self.interrupt_pending(bus);
        if self.halted && pending == 0 {
            return Ok(());
        }

        if self.ime && pending != 0 {
            self.service_interrupt(bus, pending)?;
            self.halted = false;
            return Ok(());
        }
        self.halted = false;

        let instr = self.decode(bus)?;
        self.dispatch(&instr, bus)
    }
}

impl CpuStateTrait for Cpu {
    type Snapshot = CpuState;

    fn snapshot(&self) -> CpuState {
        CpuState {
            a: self.a,
            f: self.f,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            h: self.h,
            l: self.l,
            sp: self.sp,
            pc: self.pc,
            ime: self.ime,
            halted: self.halted,
        }
    }
}
