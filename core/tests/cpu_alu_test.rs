use gbsim_core::core::Clocked;
use gbsim_core::cpu::Cpu;
mod common;
use common::{TestBus, program_only_bus, run_instruction};
use gbsim_core::error::Error;

const Z: u8 = 0x80;
const N: u8 = 0x40;
const H: u8 = 0x20;
const C: u8 = 0x10;

// ============================================================
// ADD / ADC
// ============================================================

#[test]
fn test_add_a_b_wraps_to_zero() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x3A;
    cpu.b = 0xC6;
    bus.load(0, &[0x80]); // ADD A,B

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 1);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.f, Z | H | C);
    assert_eq!(cpu.pc, 1);
}

#[test]
fn test_adc_a_n_uses_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0xE1;
    cpu.f = C;
    bus.load(0, &[0xCE, 0x0F]); // ADC A,0x0F

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0xF1);
    assert_eq!(cpu.f, H);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_add_ignores_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x01;
    cpu.f = C;
    bus.load(0, &[0xC6, 0x01]); // ADD A,0x01

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x02);
    assert_eq!(cpu.f, 0);
}

// ============================================================
// SUB / SBC / CP
// ============================================================

#[test]
fn test_sub_a_hl_to_zero() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x3E;
    cpu.set_hl(0xC000);
    bus.load(0xC000, &[0x3E]);
    bus.load(0, &[0x96]); // SUB A,(HL)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.f, Z | N);
}

#[test]
fn test_sbc_a_b_with_borrow() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x3B;
    cpu.b = 0x2A;
    cpu.f = C;
    bus.load(0, &[0x98]); // SBC A,B

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x10);
    assert_eq!(cpu.f, N);
}

#[test]
fn test_cp_leaves_a_alone() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x3C;
    bus.load(0, &[0xFE, 0x40]); // CP 0x40

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x3C);
    assert_eq!(cpu.f, N | C);
}

// ============================================================
// AND / OR / XOR
// ============================================================

#[test]
fn test_and_b_sets_half_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x5A;
    cpu.b = 0x3F;
    cpu.f = C;
    bus.load(0, &[0xA0]); // AND B

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x1A);
    assert_eq!(cpu.f, H);
}

#[test]
fn test_xor_a_clears_a() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0xFF;
    cpu.f = N | H | C;
    bus.load(0, &[0xAF]); // XOR A

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.f, Z);
}

#[test]
fn test_or_hl() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x5A;
    cpu.set_hl(0xC123);
    bus.load(0xC123, &[0x0F]);
    bus.load(0, &[0xB6]); // OR (HL)

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.a, 0x5F);
    assert_eq!(cpu.f, 0);
}

// ============================================================
// INC / DEC
// ============================================================

#[test]
fn test_inc_b_keeps_carry() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.b = 0xFF;
    cpu.f = C;
    bus.load(0, &[0x04]); // INC B

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.b, 0x00);
    assert_eq!(cpu.f, Z | H | C);
}

#[test]
fn test_dec_c_half_borrow() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.c = 0x10;
    bus.load(0, &[0x0D]); // DEC C

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.c, 0x0F);
    assert_eq!(cpu.f, N | H);
}

#[test]
fn test_dec_hl_memory() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0xC000);
    bus.load(0xC000, &[0x01]);
    bus.load(0, &[0x35]); // DEC (HL)

    cpu.cycle(&mut bus).unwrap();
    assert_eq!(cpu.last_write, Some(0xC000));
    let cycles = 1 + run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 3);
    assert_eq!(bus.memory[0xC000], 0x00);
    assert_eq!(cpu.f, Z | N);
}

#[test]
fn test_inc_hl_unmapped_leaves_cpu_untouched() {
    let mut cpu = Cpu::new();
    let mut bus = program_only_bus(&[0x34]); // INC (HL)
    cpu.set_hl(0x8000);
    cpu.f = C;

    let err = cpu.cycle(&mut bus).unwrap_err();
    assert!(matches!(err, Error::Unmapped { addr: 0x8000 }));
    assert_eq!(cpu.f, C);
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.idle_cycles, 0);
    assert_eq!(cpu.last_write, None);
}

// ============================================================
// 16-bit arithmetic
// ============================================================

#[test]
fn test_add_hl_bc_keeps_zero() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0x8A23);
    cpu.set_bc(0x0605);
    cpu.f = Z;
    bus.load(0, &[0x09]); // ADD HL,BC

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.hl(), 0x9028);
    assert_eq!(cpu.f, Z | H);
}

#[test]
fn test_add_hl_hl_carries() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_hl(0x8A23);
    bus.load(0, &[0x29]); // ADD HL,HL

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.hl(), 0x1446);
    assert_eq!(cpu.f, H | C);
}

#[test]
fn test_inc_sp_leaves_flags() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0xFFFF;
    cpu.f = Z | N | H | C;
    bus.load(0, &[0x33]); // INC SP

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.sp, 0x0000);
    assert_eq!(cpu.f, Z | N | H | C);
}

#[test]
fn test_dec_de() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.set_de(0x0100);
    bus.load(0, &[0x1B]); // DEC DE

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.de(), 0x00FF);
    assert_eq!(cpu.f, 0);
}

#[test]
fn test_add_sp_e8_flags_from_low_byte() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0xFFF8;
    cpu.f = Z | N;
    bus.load(0, &[0xE8, 0x08]); // ADD SP,8

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 4);
    assert_eq!(cpu.sp, 0x0000);
    assert_eq!(cpu.f, H | C);
}

#[test]
fn test_ld_hl_sp_plus_e8() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0xFFF8;
    bus.load(0, &[0xF8, 0x02]); // LD HL,SP+2

    let cycles = run_instruction(&mut cpu, &mut bus);
    assert_eq!(cycles, 3);
    assert_eq!(cpu.hl(), 0xFFFA);
    assert_eq!(cpu.sp, 0xFFF8);
    assert_eq!(cpu.f, 0);
}

#[test]
fn test_ld_hl_sp_minus_one() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.sp = 0x0005;
    bus.load(0, &[0xF8, 0xFF]); // LD HL,SP-1

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.hl(), 0x0004);
    assert_eq!(cpu.f, H | C);
}

// ============================================================
// DAA / CPL / SCF / CCF
// ============================================================

#[test]
fn test_daa_after_add() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x45;
    cpu.b = 0x38;
    bus.load(0, &[0x80, 0x27]); // ADD A,B; DAA

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x7D);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x83);
    assert_eq!(cpu.f, 0);
}

#[test]
fn test_daa_after_sub() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x83;
    cpu.b = 0x38;
    bus.load(0, &[0x90, 0x27]); // SUB A,B; DAA

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x4B);
    assert_eq!(cpu.f, N | H);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x45);
    assert_eq!(cpu.f, N);
}

#[test]
fn test_cpl() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.a = 0x35;
    cpu.f = Z | C;
    bus.load(0, &[0x2F]); // CPL

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0xCA);
    assert_eq!(cpu.f, Z | N | H | C);
}

#[test]
fn test_scf_then_ccf() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.f = Z | N | H;
    bus.load(0, &[0x37, 0x3F]); // SCF; CCF

    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.f, Z | C);
    run_instruction(&mut cpu, &mut bus);
    assert_eq!(cpu.f, Z);
}
