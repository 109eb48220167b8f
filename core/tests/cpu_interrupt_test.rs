use gbsim_core::core::Clocked;
use gbsim_core::cpu::Cpu;
use gbsim_core::cpu::interrupt::{Interrupt, request_interrupt};
use gbsim_core::error::Error;
mod common;
use common::{TestBus, run_instruction};

const IF: usize = 0xFF0F;
const IE: usize = 0xFFFF;

fn cpu_at(pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.pc = pc;
    cpu.sp = 0xD000;
    cpu
}

// ============================================================
// EI / DI
// ============================================================

#[test]
fn test_ei_then_di() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0xFB, 0xF3]); // EI; DI

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 1);
    assert!(cpu.ime);
    run_instruction(&mut cpu, &mut bus);
    assert!(!cpu.ime);
}

// ============================================================
// Dispatch
// ============================================================

#[test]
fn test_dispatch_to_vector() {
    let mut cpu = cpu_at(0x0150);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = Interrupt::Timer.mask();
    request_interrupt(&mut bus, Interrupt::Timer).unwrap();

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 6);
    assert_eq!(cpu.pc, 0x0050);
    assert!(!cpu.ime);
    assert_eq!(bus.memory[IF], 0x00);
    assert_eq!(cpu.sp, 0xCFFE);
    assert_eq!(bus.memory[0xCFFE], 0x50);
    assert_eq!(bus.memory[0xCFFF], 0x01);
}

#[test]
fn test_priority_and_acknowledge() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = 0x1F;
    bus.memory[IF] = 0x1E; // everything but VBLANK

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0048, "LCD STAT wins over the rest");
    assert_eq!(bus.memory[IF], 0x1C, "only the serviced bit is cleared");

    cpu.ime = true;
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0050);
    assert_eq!(bus.memory[IF], 0x18);
}

#[test]
fn test_disabled_source_is_ignored() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = Interrupt::Serial.mask();
    bus.memory[IF] = Interrupt::VBlank.mask() | 0xE0;

    run_instruction(&mut cpu, &mut bus); // NOP
    assert_eq!(cpu.pc, 1);
    assert_eq!(bus.memory[IF], 0xE1);
}

#[test]
fn test_ime_clear_blocks_dispatch() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    bus.memory[IE] = 0x01;
    bus.memory[IF] = 0x01;

    run_instruction(&mut cpu, &mut bus); // NOP
    assert_eq!(cpu.pc, 1);
    assert_eq!(bus.memory[IF], 0x01);
}

#[test]
fn test_dispatch_waits_for_instruction_to_finish() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = 0x01;
    bus.load(0, &[0xC3, 0x00, 0x10]); // JP 0x1000

    cpu.cycle(&mut bus).unwrap();
    bus.memory[IF] = 0x01;
    for _ in 0..3 {
        cpu.cycle(&mut bus).unwrap();
        assert_eq!(cpu.pc, 0x1000);
    }
    cpu.cycle(&mut bus).unwrap();
    assert_eq!(cpu.pc, 0x0040);
    assert_eq!(bus.memory[0xCFFE], 0x00);
    assert_eq!(bus.memory[0xCFFF], 0x10);
}

#[test]
fn test_failed_dispatch_keeps_request() {
    let mut cpu = cpu_at(0x0150);
    let mut bus = TestBus::new();
    cpu.sp = 0x0001; // return address would land on 0xFFFF-0x0000
    cpu.ime = true;
    bus.memory[IE] = Interrupt::VBlank.mask();
    bus.memory[IF] = Interrupt::VBlank.mask();

    let err = cpu.cycle(&mut bus).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { addr: 0xFFFF }));
    assert_eq!(bus.memory[IF], Interrupt::VBlank.mask());
    assert!(cpu.ime);
    assert_eq!(cpu.pc, 0x0150);
    assert_eq!(cpu.sp, 0x0001);
    assert_eq!(cpu.idle_cycles, 0);
    assert_eq!(cpu.last_write, None);
}

// ============================================================
// HALT
// ============================================================

#[test]
fn test_halt_waits_for_request() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    bus.memory[IE] = 0x04;
    bus.load(0, &[0x76, 0x00]); // HALT; NOP

    run_instruction(&mut cpu, &mut bus);
    assert!(cpu.halted);
    assert_eq!(cpu.pc, 1);

    for _ in 0..10 {
        cpu.cycle(&mut bus).unwrap();
        assert!(cpu.halted);
        assert_eq!(cpu.pc, 1);
    }

    // Wakes without dispatch when IME is clear
    request_interrupt(&mut bus, Interrupt::Timer).unwrap();
    run_instruction(&mut cpu, &mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.pc, 2);
    assert_eq!(bus.memory[IF], 0x04);
}

#[test]
fn test_halt_then_dispatch() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = 0x10;
    bus.load(0, &[0x76]); // HALT

    run_instruction(&mut cpu, &mut bus);
    assert!(cpu.halted);

    request_interrupt(&mut bus, Interrupt::Joypad).unwrap();
    run_instruction(&mut cpu, &mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.pc, 0x0060);
    assert_eq!(bus.memory[0xCFFE], 0x01, "returns past the HALT");
}

#[test]
fn test_handler_returns_with_reti() {
    let mut cpu = cpu_at(0x0300);
    let mut bus = TestBus::new();
    cpu.ime = true;
    bus.memory[IE] = 0x01;
    bus.memory[IF] = 0x01;
    bus.load(0x0040, &[0xD9]); // RETI

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0040);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0300);
    assert!(cpu.ime);
    assert_eq!(cpu.sp, 0xD000);
}
