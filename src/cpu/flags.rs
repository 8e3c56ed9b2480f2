//! Z80 flag bit definitions.
//!
//! Bit positions in the F (flags) register. Bits 3 and 5 are the
//! undocumented "copy" flags on real hardware; this core does not track
//! them (see `DESIGN.md`), so only the six documented bits are named here.

/// Carry flag (bit 0)
pub const C: u8 = 0b0000_0001;
/// Add/Subtract flag (bit 1) - set for subtraction-family instructions
pub const N: u8 = 0b0000_0010;
/// Parity/Overflow flag (bit 2) - parity for logical ops, signed overflow for arithmetic
pub const PV: u8 = 0b0000_0100;
/// Half-carry flag (bit 4)
pub const H: u8 = 0b0001_0000;
/// Zero flag (bit 6)
pub const Z: u8 = 0b0100_0000;
/// Sign flag (bit 7)
pub const S: u8 = 0b1000_0000;
