//! CPU state snapshot types and traits

/// Trait for CPU types that can provide state snapshots
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
}

/// SM83 CPU state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CpuState {
    pub a: u8,        // Accumulator
    pub f: u8,        // Flags (high nibble only)
    pub b: u8,        // Register B
    pub c: u8,        // Register C
    pub d: u8,        // Register D
    pub e: u8,        // Register E
    pub h: u8,        // Register H
    pub l: u8,        // Register L
    pub sp: u16,      // Stack pointer
    pub pc: u16,      // Program counter
    pub ime: bool,    // Interrupt master enable
    pub halted: bool, // Waiting in HALT
}

impl std::fmt::Display for CpuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:02X} F={:02X} B={:02X} C={:02X} D={:02X} E={:02X} H={:02X} L={:02X} SP={:04X} PC={:04X} IME={} HALT={}",
            self.a,
            self.f,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            self.ime as u8,
            self.halted as u8,
        )
    }
}
