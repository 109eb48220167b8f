use gbsim_core::core::Clocked;
use gbsim_core::cpu::Cpu;
use gbsim_core::error::Error;
mod common;
use common::{TestBus, run_instruction};

// ============================================================
// Immediate and register loads
// ============================================================

#[test]
fn test_ld_b_n() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x06, 0x42]); // LD B,0x42

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.b, 0x42);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_ld_d_b() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.b = 0x99;
    cpu.f = 0xF0;
    bus.load(0, &[0x50]); // LD D,B

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 1);
    assert_eq!(cpu.d, 0x99);
    assert_eq!(cpu.f, 0xF0, "loads leave the flags alone");
}

#[test]
fn test_ld_b_b_is_nop() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.b = 0x12;
    bus.load(0, &[0x40]); // LD B,B

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 1);
    assert_eq!(cpu.b, 0x12);
    assert_eq!(cpu.pc, 1);
}

#[test]
fn test_ld_bc_nn() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x01, 0x34, 0x12]); // LD BC,0x1234

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 3);
    assert_eq!(cpu.bc(), 0x1234);
    assert_eq!(cpu.b, 0x12);
    assert_eq!(cpu.c, 0x34);
    assert_eq!(cpu.pc, 3);
}

#[test]
fn test_ld_sp_nn() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x31, 0xFE, 0xFF]); // LD SP,0xFFFE

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.sp, 0xFFFE);
}

#[test]
fn test_ld_sp_hl() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0xD000);
    bus.load(0, &[0xF9]); // LD SP,HL

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.sp, 0xD000);
}

// ============================================================
// Indirect loads and stores
// ============================================================

#[test]
fn test_ld_a_hl_increment() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0xC000);
    bus.load(0xC000, &[0x99]);
    bus.load(0, &[0x2A]); // LD A,(HL+)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x99);
    assert_eq!(cpu.hl(), 0xC001);
}

#[test]
fn test_ld_hl_decrement_a() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x5A;
    cpu.set_hl(0xC000);
    bus.load(0, &[0x32]); // LD (HL-),A

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.hl(), 0xBFFF);
}

#[test]
fn test_ld_hl_n() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0xC010);
    bus.load(0, &[0x36, 0x77]); // LD (HL),0x77

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 3);
    assert_eq!(bus.memory[0xC010], 0x77);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_ld_a_bc_and_ld_de_a() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_bc(0xC100);
    cpu.set_de(0xC200);
    bus.load(0xC100, &[0x3C]);
    bus.load(0, &[0x0A, 0x12]); // LD A,(BC); LD (DE),A

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x3C);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC200], 0x3C);
}

#[test]
fn test_ld_r_hl_and_ld_hl_r() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0xC000);
    bus.load(0xC000, &[0xAB]);
    bus.load(0, &[0x4E, 0x71]); // LD C,(HL); LD (HL),C

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.c, 0xAB);
    bus.memory[0xC000] = 0;
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC000], 0xAB);
}

// ============================================================
// Register page and absolute addressing
// ============================================================

#[test]
fn test_ldh_n_a_records_write() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x12;
    bus.load(0, &[0xE0, 0x80]); // LDH (0x80),A

    cpu.cycle(&mut bus).unwrap();
    assert_eq!(cpu.last_write, Some(0xFF80));
    assert_eq!(bus.memory[0xFF80], 0x12);
    cpu.cycle(&mut bus).unwrap();
    assert_eq!(cpu.last_write, None, "idle cycles write nothing");
    cpu.cycle(&mut bus).unwrap();
    assert_eq!(cpu.idle_cycles, 0);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_ldh_a_n() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    bus.load(0xFF44, &[0x90]);
    bus.load(0, &[0xF0, 0x44]); // LDH A,(0x44)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 3);
    assert_eq!(cpu.a, 0x90);
}

#[test]
fn test_ld_c_a_and_ld_a_c() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x4F;
    cpu.c = 0x01;
    bus.load(0, &[0xE2, 0xAF, 0xF2]); // LD (C),A; XOR A; LD A,(C)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(bus.memory[0xFF01], 0x4F);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x4F);
}

#[test]
fn test_ld_nn_a_and_ld_a_nn() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x66;
    bus.load(0, &[0xEA, 0x00, 0xC3, 0x3E, 0x00, 0xFA, 0x00, 0xC3]); // LD (0xC300),A; LD A,0; LD A,(0xC300)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 4);
    assert_eq!(bus.memory[0xC300], 0x66);
    assert_eq!(cpu.pc, 3);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0);
    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 4);
    assert_eq!(cpu.a, 0x66);
}

#[test]
fn test_ld_nn_sp() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0xBEEF;
    bus.load(0, &[0x08, 0x00, 0xC1]); // LD (0xC100),SP

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 5);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
}

#[test]
fn test_ld_nn_sp_at_top_of_space() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0x1234;
    bus.load(0, &[0x08, 0xFF, 0xFF]); // LD (0xFFFF),SP

    let err = cpu.cycle(&mut bus).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { addr: 0xFFFF }));
    assert_eq!(bus.memory[0xFFFF], 0);
}
