//! Z80 CPU instruction tests, organized by opcode page:
//!
//! - `instructions.rs`: base-page loads, ALU, stack, jump/call/ret families
//! - `modes.rs`: CB page, ED page, and DD/FD (indexed) page dispatch
//! - `parity.rs`: flag-edge-case coverage for the ALU and rotate/shift primitives

use super::*;
use crate::bus::Bus;


/// Load `program` at address 0 and single-step it `steps` times.
fn run(program: &[u8], steps: usize) -> (Cpu, Bus) {
    let mut cpu = Cpu::new();
    let mut bus = Bus::new();
    for (i, &b) in program.iter().enumerate() {
        bus.poke(i as u16, b);
    }
    for _ in 0..steps {
        cpu.step(&mut bus);
    }
    (cpu, bus)
}

/// Assert the F register equals `expected`, with a readable breakdown on mismatch.
fn assert_flags(cpu: &Cpu, expected: u8, context: &str) {
    assert_eq!(
        cpu.f, expected,
        "{context}: flags mismatch. expected {:08b}, got {:08b} (S={} Z={} H={} PV={} N={} C={})",
        expected,
        cpu.f,
        cpu.flag_s() as u8,
        cpu.flag_z() as u8,
        cpu.flag_h() as u8,
        cpu.flag_pv() as u8,
        cpu.flag_n() as u8,
        cpu.flag_c() as u8,
    );
}
