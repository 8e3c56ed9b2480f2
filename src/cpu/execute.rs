//! Opcode dispatch for the base page, CB page, ED page, DD/FD index pages,
//! and the DDCB/FDCB indexed-bit page.
//!
//! Decoding follows the standard Z80 octal breakdown of an opcode byte:
//! `x = (op>>6)&3`, `y = (op>>3)&7`, `z = op&7`, `p = (y>>1)&3`, `q = y&1`.

use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    // ================= Base page (x dispatch) =================

    pub(super) fn execute_x0(&mut self, bus: &mut Bus, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => self.x0_z0(bus, y),
            1 => {
                if q == 0 {
                    let nn = self.fetch_word(bus);
                    self.set_rp(p, nn);
                    10
                } else {
                    let rp = self.get_rp(p);
                    let result = self.alu_add16(self.hl, rp);
                    self.hl = result;
                    11
                }
            }
            2 => {
                if q == 0 {
                    match p {
                        0 => {
                            bus.write_byte(self.bc, self.a);
                            7
                        }
                        1 => {
                            bus.write_byte(self.de, self.a);
                            7
                        }
                        2 => {
                            let nn = self.fetch_word(bus);
                            bus.write_word(nn, self.hl);
                            16
                        }
                        3 => {
                            let nn = self.fetch_word(bus);
                            bus.write_byte(nn, self.a);
                            13
                        }
                        _ => unreachable!(),
                    }
                } else {
                    match p {
                        0 => {
                            self.a = bus.read_byte(self.bc);
                            7
                        }
                        1 => {
                            self.a = bus.read_byte(self.de);
                            7
                        }
                        2 => {
                            let nn = self.fetch_word(bus);
                            self.hl = bus.read_word(nn);
                            16
                        }
                        3 => {
                            let nn = self.fetch_word(bus);
                            self.a = bus.read_byte(nn);
                            13
                        }
                        _ => unreachable!(),
                    }
                }
            }
            3 => {
                let rp = self.get_rp(p);
                if q == 0 {
                    self.set_rp(p, rp.wrapping_add(1));
                } else {
                    self.set_rp(p, rp.wrapping_sub(1));
                }
                6
            }
            4 => {
                if y == 6 {
                    let val = bus.read_byte(self.hl);
                    let result = self.alu_inc(val);
                    bus.write_byte(self.hl, result);
                    11
                } else {
                    let val = self.get_reg8(y, bus);
                    let result = self.alu_inc(val);
                    self.set_reg8(y, result, bus);
                    4
                }
            }
            5 => {
                if y == 6 {
                    let val = bus.read_byte(self.hl);
                    let result = self.alu_dec(val);
                    bus.write_byte(self.hl, result);
                    11
                } else {
                    let val = self.get_reg8(y, bus);
                    let result = self.alu_dec(val);
                    self.set_reg8(y, result, bus);
                    4
                }
            }
            6 => {
                let n = self.fetch_byte(bus);
                if y == 6 {
                    bus.write_byte(self.hl, n);
                    10
                } else {
                    self.set_reg8(y, n, bus);
                    7
                }
            }
            7 => {
                self.x0_z7(y);
                4
            }
            _ => unreachable!(),
        }
    }

    /// z=0 family: NOP, EX AF,AF', DJNZ, JR, JR cc — none of these touch HL,
    /// so the indexed pages delegate here unchanged.
    pub(super) fn x0_z0(&mut self, bus: &mut Bus, y: u8) -> u32 {
        match y {
            0 => 4,
            1 => {
                self.ex_af();
                4
            }
            2 => {
                let d = self.fetch_byte(bus) as i8;
                self.set_b(self.b().wrapping_sub(1));
                if self.b() != 0 {
                    self.pc = self.pc.wrapping_add(d as i16 as u16);
                    13
                } else {
                    8
                }
            }
            3 => {
                let d = self.fetch_byte(bus) as i8;
                self.pc = self.pc.wrapping_add(d as i16 as u16);
                12
            }
            4..=7 => {
                let d = self.fetch_byte(bus) as i8;
                if self.check_cc(y - 4) {
                    self.pc = self.pc.wrapping_add(d as i16 as u16);
                    12
                } else {
                    7
                }
            }
            _ => unreachable!(),
        }
    }

    /// z=7 family: the accumulator/flag "exotic" ops — unaffected by DD/FD.
    fn x0_z7(&mut self, y: u8) {
        match y {
            0 => {
                let carry = self.a & 0x80 != 0;
                self.a = self.a.rotate_left(1);
                self.set_flag_c(carry);
                self.set_flag_h(false);
                self.set_flag_n(false);
            }
            1 => {
                let carry = self.a & 0x01 != 0;
                self.a = self.a.rotate_right(1);
                self.set_flag_c(carry);
                self.set_flag_h(false);
                self.set_flag_n(false);
            }
            2 => {
                let carry = self.a & 0x80 != 0;
                let old_c = self.flag_c();
                self.a = (self.a << 1) | (old_c as u8);
                self.set_flag_c(carry);
                self.set_flag_h(false);
                self.set_flag_n(false);
            }
            3 => {
                let carry = self.a & 0x01 != 0;
                let old_c = self.flag_c();
                self.a = (self.a >> 1) | ((old_c as u8) << 7);
                self.set_flag_c(carry);
                self.set_flag_h(false);
                self.set_flag_n(false);
            }
            4 => self.daa(),
            5 => {
                self.a = !self.a;
                self.set_flag_h(true);
                self.set_flag_n(true);
            }
            6 => {
                self.set_flag_c(true);
                self.set_flag_h(false);
                self.set_flag_n(false);
            }
            7 => {
                let old_c = self.flag_c();
                self.set_flag_h(old_c);
                self.set_flag_c(!old_c);
                self.set_flag_n(false);
            }
            _ => unreachable!(),
        }
    }

    /// Decimal-adjust A after a BCD ADD/SUB, per the standard N/H/C correction table.
    fn daa(&mut self) {
        let a = self.a;
        let n = self.flag_n();
        let h = self.flag_h();
        let c = self.flag_c();

        let mut correction: u8 = 0;
        let mut new_c = c;
        if h || (!n && (a & 0x0F) > 9) {
            correction |= 0x06;
        }
        if c || (!n && a > 0x99) {
            correction |= 0x60;
            new_c = true;
        }

        let new_h = if n {
            h && (a & 0x0F) < 6
        } else {
            (a & 0x0F) + (correction & 0x0F) > 0x0F
        };

        self.a = if n {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        self.set_flag_c(new_c);
        self.set_flag_h(new_h);
        self.set_sz_flags(self.a);
        self.set_flag_pv(Self::parity(self.a));
    }

    /// ALU A,val dispatch for y=0..7: ADD,ADC,SUB,SBC,AND,XOR,OR,CP.
    pub(super) fn execute_alu(&mut self, y: u8, val: u8) {
        match y {
            0 => {
                self.a = self.alu_add(val, false);
            }
            1 => {
                self.a = self.alu_add(val, true);
            }
            2 => {
                self.a = self.alu_sub(val, false);
            }
            3 => {
                self.a = self.alu_sub(val, true);
            }
            4 => self.alu_and(val),
            5 => self.alu_xor(val),
            6 => self.alu_or(val),
            7 => {
                // CP: discard the result, keep the flags.
                self.alu_sub(val, false);
            }
            _ => unreachable!(),
        }
    }

    pub(super) fn execute_x3(&mut self, bus: &mut Bus, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => {
                if self.check_cc(y) {
                    self.pc = self.pop_word(bus);
                    11
                } else {
                    5
                }
            }
            1 => {
                if q == 0 {
                    let val = self.pop_word(bus);
                    self.set_rp2(p, val);
                    10
                } else {
                    match p {
                        0 => {
                            self.pc = self.pop_word(bus);
                            10
                        }
                        1 => {
                            self.exx();
                            4
                        }
                        2 => {
                            self.pc = self.hl;
                            4
                        }
                        3 => {
                            self.sp = self.hl;
                            6
                        }
                        _ => unreachable!(),
                    }
                }
            }
            2 => {
                let nn = self.fetch_word(bus);
                if self.check_cc(y) {
                    self.pc = nn;
                }
                10
            }
            3 => match y {
                0 => {
                    self.pc = self.fetch_word(bus);
                    10
                }
                1 => self.execute_cb(bus),
                2 => {
                    let n = self.fetch_byte(bus);
                    bus.port_write(n, self.a);
                    11
                }
                3 => {
                    let n = self.fetch_byte(bus);
                    self.a = bus.port_read(n);
                    11
                }
                4 => {
                    let sp_val = bus.read_word(self.sp);
                    bus.write_word(self.sp, self.hl);
                    self.hl = sp_val;
                    19
                }
                5 => {
                    self.ex_de_hl();
                    4
                }
                6 => {
                    self.iff1 = false;
                    self.iff2 = false;
                    4
                }
                7 => {
                    self.iff1 = true;
                    self.iff2 = true;
                    4
                }
                _ => unreachable!(),
            },
            4 => {
                let nn = self.fetch_word(bus);
                if self.check_cc(y) {
                    self.push_word(bus, self.pc);
                    self.pc = nn;
                    17
                } else {
                    10
                }
            }
            5 => {
                if q == 0 {
                    let val = self.get_rp2(p);
                    self.push_word(bus, val);
                    11
                } else {
                    match p {
                        0 => {
                            let nn = self.fetch_word(bus);
                            self.push_word(bus, self.pc);
                            self.pc = nn;
                            17
                        }
                        1 => self.execute_index(bus, true),
                        2 => self.execute_ed(bus),
                        3 => self.execute_index(bus, false),
                        _ => unreachable!(),
                    }
                }
            }
            6 => {
                let n = self.fetch_byte(bus);
                self.execute_alu(y, n);
                7
            }
            7 => {
                self.push_word(bus, self.pc);
                self.pc = (y as u16) * 8;
                11
            }
            _ => unreachable!(),
        }
    }

    // ================= CB page =================

    pub(super) fn execute_cb(&mut self, bus: &mut Bus) -> u32 {
        let opcode = self.fetch_byte(bus);
        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;

        match x {
            0 => {
                let val = self.get_reg8(z, bus);
                let result = self.execute_rot(y, val);
                self.set_reg8(z, result, bus);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            1 => {
                let val = self.get_reg8(z, bus);
                self.bit_test(y, val);
                if z == 6 {
                    12
                } else {
                    8
                }
            }
            2 => {
                let val = self.get_reg8(z, bus);
                let result = val & !(1 << y);
                self.set_reg8(z, result, bus);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            3 => {
                let val = self.get_reg8(z, bus);
                let result = val | (1 << y);
                self.set_reg8(z, result, bus);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            _ => unreachable!(),
        }
    }

    /// RLC/RRC/RL/RR/SLA/SRA/SLL/SRL on a byte, setting C/H/N/PV/Z/S.
    pub(super) fn execute_rot(&mut self, y: u8, val: u8) -> u8 {
        let (result, carry) = match y {
            0 => (val.rotate_left(1), val & 0x80 != 0),
            1 => (val.rotate_right(1), val & 0x01 != 0),
            2 => {
                let old_c = self.flag_c() as u8;
                ((val << 1) | old_c, val & 0x80 != 0)
            }
            3 => {
                let old_c = self.flag_c() as u8;
                ((val >> 1) | (old_c << 7), val & 0x01 != 0)
            }
            4 => (val << 1, val & 0x80 != 0),
            5 => ((val >> 1) | (val & 0x80), val & 0x01 != 0),
            // SLL is an undocumented opcode: shift left, shifting in a 1 bit.
            6 => ((val << 1) | 1, val & 0x80 != 0),
            7 => (val >> 1, val & 0x01 != 0),
            _ => unreachable!(),
        };

        self.set_sz_flags(result);
        self.set_flag_h(false);
        self.set_flag_n(false);
        self.set_flag_pv(Self::parity(result));
        self.set_flag_c(carry);
        result
    }

    /// BIT n,val: Z=(bit==0), H=1, N=0, PV=Z; S copies the bit only for n=7. C unchanged.
    fn bit_test(&mut self, y: u8, val: u8) {
        let bit_set = val & (1 << y) != 0;
        self.set_flag_z(!bit_set);
        self.set_flag_pv(!bit_set);
        self.set_flag_h(true);
        self.set_flag_n(false);
        self.set_flag_s(y == 7 && bit_set);
    }

    // ================= ED page =================

    pub(super) fn execute_ed(&mut self, bus: &mut Bus) -> u32 {
        let opcode = self.fetch_byte(bus);
        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = (y >> 1) & 0x03;
        let q = y & 0x01;

        match x {
            1 => self.execute_ed_x1(bus, y, z, p, q),
            2 if y >= 4 => {
                let increment = y == 4 || y == 6;
                let repeat = y == 6 || y == 7;
                match z {
                    0 => self.op_ldi_ldd(bus, increment, repeat),
                    1 => self.op_cpi_cpd(bus, increment, repeat),
                    2 => self.op_ini_ind(bus, increment, repeat),
                    3 => self.op_outi_outd(bus, increment, repeat),
                    _ => unreachable!(),
                }
            }
            _ => {
                self.log_unknown_opcode(2, "ED", opcode);
                8
            }
        }
    }

    fn execute_ed_x1(&mut self, bus: &mut Bus, y: u8, z: u8, p: u8, q: u8) -> u32 {
        match z {
            0 => {
                // IN r,(C); y=6 is the undocumented "IN (C)" — read and discard.
                let val = bus.port_read(self.c());
                self.set_sz_flags(val);
                self.set_flag_h(false);
                self.set_flag_n(false);
                self.set_flag_pv(Self::parity(val));
                if y != 6 {
                    self.set_reg8(y, val, bus);
                }
                12
            }
            1 => {
                // OUT (C),r; y=6 is the undocumented "OUT (C),0".
                let val = if y == 6 { 0 } else { self.get_reg8(y, bus) };
                bus.port_write(self.c(), val);
                12
            }
            2 => {
                let rp = self.get_rp(p);
                if q == 0 {
                    self.hl = self.alu_sbc16(self.hl, rp);
                } else {
                    self.hl = self.alu_adc16(self.hl, rp);
                }
                15
            }
            3 => {
                let nn = self.fetch_word(bus);
                if q == 0 {
                    bus.write_word(nn, self.get_rp(p));
                } else {
                    let val = bus.read_word(nn);
                    self.set_rp(p, val);
                }
                20
            }
            4 => {
                // NEG
                let old_a = self.a;
                self.a = 0u8.wrapping_sub(old_a);
                self.set_sz_flags(self.a);
                self.set_flag_c(old_a != 0);
                self.set_flag_h(old_a & 0x0F != 0);
                self.set_flag_pv(old_a == 0x80);
                self.set_flag_n(true);
                8
            }
            5 => {
                // RETN and RETI are not distinguished: both pop PC and copy IFF2 into IFF1.
                self.iff1 = self.iff2;
                self.pc = self.pop_word(bus);
                14
            }
            6 => {
                self.im = match y {
                    0 | 1 | 4 | 5 => super::InterruptMode::Mode0,
                    2 | 6 => super::InterruptMode::Mode1,
                    3 | 7 => super::InterruptMode::Mode2,
                    _ => unreachable!(),
                };
                8
            }
            7 => match y {
                0 => {
                    self.i = self.a;
                    9
                }
                1 => {
                    self.r = self.a;
                    9
                }
                2 => {
                    self.a = self.i;
                    self.set_sz_flags(self.a);
                    self.set_flag_h(false);
                    self.set_flag_n(false);
                    self.set_flag_pv(self.iff2);
                    9
                }
                3 => {
                    self.a = self.r;
                    self.set_sz_flags(self.a);
                    self.set_flag_h(false);
                    self.set_flag_n(false);
                    self.set_flag_pv(self.iff2);
                    9
                }
                4 => {
                    self.rrd(bus);
                    18
                }
                5 => {
                    self.rld(bus);
                    18
                }
                _ => 8,
            },
            _ => unreachable!(),
        }
    }

    fn rrd(&mut self, bus: &mut Bus) {
        let mem = bus.read_byte(self.hl);
        let a_lo = self.a & 0x0F;
        let new_a = (self.a & 0xF0) | (mem & 0x0F);
        let new_mem = (a_lo << 4) | (mem >> 4);
        self.a = new_a;
        bus.write_byte(self.hl, new_mem);
        self.set_sz_flags(self.a);
        self.set_flag_h(false);
        self.set_flag_n(false);
        self.set_flag_pv(Self::parity(self.a));
    }

    fn rld(&mut self, bus: &mut Bus) {
        let mem = bus.read_byte(self.hl);
        let a_lo = self.a & 0x0F;
        let new_a = (self.a & 0xF0) | (mem >> 4);
        let new_mem = (mem << 4) | a_lo;
        self.a = new_a;
        bus.write_byte(self.hl, new_mem);
        self.set_sz_flags(self.a);
        self.set_flag_h(false);
        self.set_flag_n(false);
        self.set_flag_pv(Self::parity(self.a));
    }

    // ================= Block primitives (single iteration per step) =================
    //
    // Each of these performs exactly one iteration. A repeating variant with
    // work remaining rewinds PC by 2 (back onto its own ED prefix byte) so
    // the next `step` call re-decodes and re-executes the same instruction,
    // rather than looping internally to completion.

    fn op_ldi_ldd(&mut self, bus: &mut Bus, increment: bool, repeat: bool) -> u32 {
        let val = bus.read_byte(self.hl);
        bus.write_byte(self.de, val);
        if increment {
            self.hl = self.hl.wrapping_add(1);
            self.de = self.de.wrapping_add(1);
        } else {
            self.hl = self.hl.wrapping_sub(1);
            self.de = self.de.wrapping_sub(1);
        }
        self.bc = self.bc.wrapping_sub(1);
        self.set_flag_h(false);
        self.set_flag_n(false);
        self.set_flag_pv(self.bc != 0);

        if repeat && self.bc != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }

    fn op_cpi_cpd(&mut self, bus: &mut Bus, increment: bool, repeat: bool) -> u32 {
        let val = bus.read_byte(self.hl);
        let result = self.a.wrapping_sub(val);
        let half = (self.a & 0x0F) < (val & 0x0F);
        if increment {
            self.hl = self.hl.wrapping_add(1);
        } else {
            self.hl = self.hl.wrapping_sub(1);
        }
        self.bc = self.bc.wrapping_sub(1);

        self.set_flag_s(result & 0x80 != 0);
        self.set_flag_z(result == 0);
        self.set_flag_h(half);
        self.set_flag_pv(self.bc != 0);
        self.set_flag_n(true);

        if repeat && self.bc != 0 && result != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }

    fn op_ini_ind(&mut self, bus: &mut Bus, increment: bool, repeat: bool) -> u32 {
        let val = bus.port_read(self.c());
        bus.write_byte(self.hl, val);
        if increment {
            self.hl = self.hl.wrapping_add(1);
        } else {
            self.hl = self.hl.wrapping_sub(1);
        }
        self.set_b(self.b().wrapping_sub(1));
        self.set_flag_z(self.b() == 0);
        self.set_flag_n(val & 0x80 != 0);

        if repeat && self.b() != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }

    fn op_outi_outd(&mut self, bus: &mut Bus, increment: bool, repeat: bool) -> u32 {
        let val = bus.read_byte(self.hl);
        self.set_b(self.b().wrapping_sub(1));
        bus.port_write(self.c(), val);
        if increment {
            self.hl = self.hl.wrapping_add(1);
        } else {
            self.hl = self.hl.wrapping_sub(1);
        }
        self.set_flag_z(self.b() == 0);
        self.set_flag_n(val & 0x80 != 0);

        if repeat && self.b() != 0 {
            self.pc = self.pc.wrapping_sub(2);
            21
        } else {
            16
        }
    }

    // ================= DD/FD index pages =================

    fn index_addr(&self, use_ix: bool, d: i8) -> u16 {
        let base = if use_ix { self.ix } else { self.iy };
        base.wrapping_add(d as i16 as u16)
    }

    pub(super) fn execute_index(&mut self, bus: &mut Bus, use_ix: bool) -> u32 {
        let opcode = self.fetch_byte(bus);

        match opcode {
            // A run of DD/FD prefixes: only the last one before a real opcode
            // is effective; each discarded prefix bills 4 cycles (see `DESIGN.md`).
            0xDD => 4 + self.execute_index(bus, true),
            0xFD => 4 + self.execute_index(bus, false),
            0xED => 4 + self.execute_ed(bus),
            0xCB => self.execute_index_cb(bus, use_ix),
            _ => {
                let x = (opcode >> 6) & 0x03;
                let y = (opcode >> 3) & 0x07;
                let z = opcode & 0x07;
                let p = (y >> 1) & 0x03;
                let q = y & 0x01;

                match x {
                    0 => self.execute_index_x0(bus, y, z, p, q, use_ix),
                    1 => {
                        if y == 6 && z == 6 {
                            self.halted = true;
                            4
                        } else if y == 6 {
                            // LD (IX+d),r — source register is not substituted.
                            let src = self.get_reg8(z, bus);
                            let d = self.fetch_byte(bus) as i8;
                            let addr = self.index_addr(use_ix, d);
                            bus.write_byte(addr, src);
                            19
                        } else if z == 6 {
                            // LD r,(IX+d) — destination register is not substituted.
                            let d = self.fetch_byte(bus) as i8;
                            let addr = self.index_addr(use_ix, d);
                            let val = bus.read_byte(addr);
                            self.set_reg8(y, val, bus);
                            19
                        } else {
                            let src = self.get_index_reg8(z, bus, use_ix);
                            self.set_index_reg8(y, src, bus, use_ix);
                            8
                        }
                    }
                    2 => {
                        let val = self.get_index_reg8(z, bus, use_ix);
                        self.execute_alu(y, val);
                        if z == 6 {
                            19
                        } else {
                            8
                        }
                    }
                    3 => self.execute_index_x3(bus, y, z, p, q, use_ix),
                    _ => unreachable!(),
                }
            }
        }
    }

    /// Get an 8-bit operand with H/L substituted by IXH/IXL or IYH/IYL.
    pub(super) fn get_index_reg8(&mut self, idx: u8, bus: &mut Bus, use_ix: bool) -> u8 {
        match idx {
            0 => self.b(),
            1 => self.c(),
            2 => self.d(),
            3 => self.e(),
            4 => {
                if use_ix {
                    self.ixh()
                } else {
                    self.iyh()
                }
            }
            5 => {
                if use_ix {
                    self.ixl()
                } else {
                    self.iyl()
                }
            }
            6 => {
                let d = self.fetch_byte(bus) as i8;
                let addr = self.index_addr(use_ix, d);
                bus.read_byte(addr)
            }
            7 => self.a,
            _ => unreachable!(),
        }
    }

    pub(super) fn set_index_reg8(&mut self, idx: u8, val: u8, bus: &mut Bus, use_ix: bool) {
        match idx {
            0 => self.set_b(val),
            1 => self.set_c(val),
            2 => self.set_d(val),
            3 => self.set_e(val),
            4 => {
                if use_ix {
                    self.set_ixh(val)
                } else {
                    self.set_iyh(val)
                }
            }
            5 => {
                if use_ix {
                    self.set_ixl(val)
                } else {
                    self.set_iyl(val)
                }
            }
            6 => {
                let d = self.fetch_byte(bus) as i8;
                let addr = self.index_addr(use_ix, d);
                bus.write_byte(addr, val);
            }
            7 => self.a = val,
            _ => unreachable!(),
        }
    }

    fn get_index_rp(&self, p: u8, use_ix: bool) -> u16 {
        match p {
            0 => self.bc,
            1 => self.de,
            2 => {
                if use_ix {
                    self.ix
                } else {
                    self.iy
                }
            }
            3 => self.sp,
            _ => unreachable!(),
        }
    }

    fn set_index_rp(&mut self, p: u8, val: u16, use_ix: bool) {
        match p {
            0 => self.bc = val,
            1 => self.de = val,
            2 => {
                if use_ix {
                    self.ix = val
                } else {
                    self.iy = val
                }
            }
            3 => self.sp = val,
            _ => unreachable!(),
        }
    }

    fn execute_index_x0(&mut self, bus: &mut Bus, y: u8, z: u8, p: u8, q: u8, use_ix: bool) -> u32 {
        match z {
            0 => self.x0_z0(bus, y),
            1 => {
                if q == 0 {
                    if p == 2 {
                        let nn = self.fetch_word(bus);
                        self.set_index_rp(2, nn, use_ix);
                        14
                    } else {
                        let nn = self.fetch_word(bus);
                        self.set_rp(p, nn);
                        10
                    }
                } else {
                    let idx_reg = self.get_index_rp(2, use_ix);
                    let rp = self.get_index_rp(p, use_ix);
                    let result = self.alu_add16(idx_reg, rp);
                    self.set_index_rp(2, result, use_ix);
                    15
                }
            }
            2 => {
                if p == 2 {
                    // LD (nn),IX/IY or LD IX/IY,(nn)
                    let nn = self.fetch_word(bus);
                    if q == 0 {
                        bus.write_word(nn, self.get_index_rp(2, use_ix));
                    } else {
                        let val = bus.read_word(nn);
                        self.set_index_rp(2, val, use_ix);
                    }
                    20
                } else {
                    // LD (BC)/(DE),A and the reverse — not affected by the prefix.
                    self.execute_x0(bus, y, 2, p, q)
                }
            }
            3 => {
                if p == 2 {
                    let rp = self.get_index_rp(2, use_ix);
                    if q == 0 {
                        self.set_index_rp(2, rp.wrapping_add(1), use_ix);
                    } else {
                        self.set_index_rp(2, rp.wrapping_sub(1), use_ix);
                    }
                    10
                } else {
                    let rp = self.get_rp(p);
                    if q == 0 {
                        self.set_rp(p, rp.wrapping_add(1));
                    } else {
                        self.set_rp(p, rp.wrapping_sub(1));
                    }
                    6
                }
            }
            4 => {
                if y == 6 {
                    let d = self.fetch_byte(bus) as i8;
                    let addr = self.index_addr(use_ix, d);
                    let val = bus.read_byte(addr);
                    let result = self.alu_inc(val);
                    bus.write_byte(addr, result);
                    23
                } else if y == 4 || y == 5 {
                    let val = self.get_index_reg8(y, bus, use_ix);
                    let result = self.alu_inc(val);
                    self.set_index_reg8(y, result, bus, use_ix);
                    8
                } else {
                    let val = self.get_reg8(y, bus);
                    let result = self.alu_inc(val);
                    self.set_reg8(y, result, bus);
                    4
                }
            }
            5 => {
                if y == 6 {
                    let d = self.fetch_byte(bus) as i8;
                    let addr = self.index_addr(use_ix, d);
                    let val = bus.read_byte(addr);
                    let result = self.alu_dec(val);
                    bus.write_byte(addr, result);
                    23
                } else if y == 4 || y == 5 {
                    let val = self.get_index_reg8(y, bus, use_ix);
                    let result = self.alu_dec(val);
                    self.set_index_reg8(y, result, bus, use_ix);
                    8
                } else {
                    let val = self.get_reg8(y, bus);
                    let result = self.alu_dec(val);
                    self.set_reg8(y, result, bus);
                    4
                }
            }
            6 => {
                if y == 6 {
                    let d = self.fetch_byte(bus) as i8;
                    let n = self.fetch_byte(bus);
                    let addr = self.index_addr(use_ix, d);
                    bus.write_byte(addr, n);
                    19
                } else if y == 4 || y == 5 {
                    let n = self.fetch_byte(bus);
                    self.set_index_reg8(y, n, bus, use_ix);
                    11
                } else {
                    let n = self.fetch_byte(bus);
                    self.set_reg8(y, n, bus);
                    7
                }
            }
            7 => {
                self.x0_z7(y);
                4
            }
            _ => unreachable!(),
        }
    }

    fn execute_index_x3(&mut self, bus: &mut Bus, y: u8, z: u8, p: u8, q: u8, use_ix: bool) -> u32 {
        match (z, p, q) {
            (1, 2, 0) => {
                // POP IX/IY
                let val = self.pop_word(bus);
                self.set_index_rp(2, val, use_ix);
                14
            }
            (1, 2, 1) => {
                // JP (IX)/(IY)
                self.pc = self.get_index_rp(2, use_ix);
                8
            }
            (1, 3, 1) => {
                // LD SP,IX/IY
                self.sp = self.get_index_rp(2, use_ix);
                10
            }
            (3, _, _) if y == 4 => {
                // EX (SP),IX/IY
                let sp_val = bus.read_word(self.sp);
                let idx_reg = self.get_index_rp(2, use_ix);
                bus.write_word(self.sp, idx_reg);
                self.set_index_rp(2, sp_val, use_ix);
                23
            }
            (5, 2, 0) => {
                // PUSH IX/IY
                let val = self.get_index_rp(2, use_ix);
                self.push_word(bus, val);
                15
            }
            _ => self.execute_x3(bus, y, z, p, q),
        }
    }

    fn execute_index_cb(&mut self, bus: &mut Bus, use_ix: bool) -> u32 {
        let d = self.fetch_byte(bus) as i8;
        let opcode = self.fetch_byte(bus);

        let x = (opcode >> 6) & 0x03;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;

        let addr = self.index_addr(use_ix, d);
        let val = bus.read_byte(addr);

        match x {
            0 => {
                let result = self.execute_rot(y, val);
                bus.write_byte(addr, result);
                if z != 6 {
                    self.set_reg8(z, result, bus);
                }
                23
            }
            1 => {
                self.bit_test(y, val);
                20
            }
            2 => {
                let result = val & !(1 << y);
                bus.write_byte(addr, result);
                if z != 6 {
                    self.set_reg8(z, result, bus);
                }
                23
            }
            3 => {
                let result = val | (1 << y);
                bus.write_byte(addr, result);
                if z != 6 {
                    self.set_reg8(z, result, bus);
                }
                23
            }
            _ => unreachable!(),
        }
    }
}
