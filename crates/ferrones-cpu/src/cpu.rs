//! 6502 execution core.
//!
//! [`Cpu::step`] runs exactly one instruction: it services a pending NMI
//! if one was raised, fetches and decodes the opcode, resolves the
//! effective address for the addressing mode (accumulating page-cross
//! penalties as it goes), executes the semantic tag, advances the program
//! counter and reports the cycles consumed. Control-transfer instructions
//! store their target minus the instruction length so the common
//! PC-advance at the end of the step lands exactly on the target.

use crate::addressing::AddrMode;
use crate::opcodes::{ExtraCycle, Op, OPCODE_TABLE};
use crate::status::Status;
use crate::{vectors, CpuError, Result};

/// Memory interface the CPU executes against.
///
/// The console's bus implements this over the full memory map; tests use
/// flat arrays. Reads take `&mut self` because several hardware registers
/// ($2002, $2007, $4016) change state when read.
pub trait Bus {
    /// Read one byte.
    fn read(&mut self, addr: u16) -> u8;

    /// Write one byte.
    fn write(&mut self, addr: u16, value: u8);

    /// Read a little-endian 16-bit word.
    fn read_u16(&mut self, addr: u16) -> u16 {
        let lo = u16::from(self.read(addr));
        let hi = u16::from(self.read(addr.wrapping_add(1)));
        (hi << 8) | lo
    }
}

/// Base of the hardware stack page.
const STACK_BASE: u16 = 0x0100;

/// MOS 6502 CPU state and interpreter.
#[derive(Debug)]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer into $0100-$01FF.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Status register.
    pub status: Status,
    /// Pending edge-triggered NMI.
    nmi_pending: bool,
    /// Effective address of the instruction in flight. For `Relative`
    /// this holds the sign-extended branch offset instead.
    addr: u16,
    /// Penalty cycles accumulated by the instruction in flight.
    extra_cycles: u8,
    /// Extra-cycle rule of the instruction in flight.
    extra_rule: ExtraCycle,
}

impl Cpu {
    /// Create a CPU in its pre-reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::POWER_ON,
            nmi_pending: false,
            addr: 0,
            extra_cycles: 0,
            extra_rule: ExtraCycle::None,
        }
    }

    /// Reset: clear the registers and load PC from the reset vector.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.nmi_pending = false;
        log::debug!("CPU reset, PC=${:04X}", self.pc);
    }

    /// Raise the NMI line. The interrupt is taken at the start of the
    /// next [`step`](Self::step), never mid-instruction.
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Execute one instruction (or service a pending NMI) and return the
    /// CPU cycles consumed.
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::UnknownOpcode`] when the fetched byte has no
    /// table entry. The CPU is left at the faulting instruction.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<u8> {
        if self.nmi_pending {
            self.nmi_pending = false;
            return Ok(self.service_nmi(bus));
        }

        let code = bus.read(self.pc);
        let Some(opcode) = &OPCODE_TABLE[usize::from(code)] else {
            return Err(CpuError::UnknownOpcode(code, self.pc));
        };

        self.extra_cycles = 0;
        self.extra_rule = opcode.extra;
        self.addr = self.operand_address(opcode.mode, bus);
        self.execute(opcode.op, opcode.mode, bus);
        self.pc = self.pc.wrapping_add(opcode.length);

        Ok(opcode.cycles + self.extra_cycles)
    }

    /// Enter the NMI handler: push PC and P, set I, vector through $FFFA.
    fn service_nmi(&mut self, bus: &mut impl Bus) -> u8 {
        self.push_u16(bus, self.pc);
        self.push(bus, self.status.to_stack_byte(false));
        self.status.insert(Status::I);
        self.pc = bus.read_u16(vectors::NMI);
        log::trace!("NMI taken, PC=${:04X}", self.pc);
        2
    }

    // ---------------------------------------------------------------
    // Effective-address resolution
    // ---------------------------------------------------------------

    fn operand_address(&mut self, mode: AddrMode, bus: &mut impl Bus) -> u16 {
        let operand = self.pc.wrapping_add(1);
        match mode {
            // No memory operand; keep the operand pointer so Immediate
            // reads fall out of the common bus.read(self.addr) path.
            AddrMode::Implied | AddrMode::Accumulator | AddrMode::Immediate => operand,
            AddrMode::ZeroPage => u16::from(bus.read(operand)),
            AddrMode::ZeroPageX => u16::from(bus.read(operand).wrapping_add(self.x)),
            AddrMode::ZeroPageY => u16::from(bus.read(operand).wrapping_add(self.y)),
            AddrMode::Absolute => bus.read_u16(operand),
            AddrMode::AbsoluteX => {
                let base = bus.read_u16(operand);
                let addr = base.wrapping_add(u16::from(self.x));
                self.page_cross_penalty(base, addr);
                addr
            }
            AddrMode::AbsoluteY => {
                let base = bus.read_u16(operand);
                let addr = base.wrapping_add(u16::from(self.y));
                self.page_cross_penalty(base, addr);
                addr
            }
            AddrMode::Indirect => {
                let ptr = bus.read_u16(operand);
                read_u16_page_bug(bus, ptr)
            }
            AddrMode::IndexedIndirect => {
                let ptr = bus.read(operand).wrapping_add(self.x);
                read_u16_page_bug(bus, u16::from(ptr))
            }
            AddrMode::IndirectIndexed => {
                let ptr = u16::from(bus.read(operand));
                let base = read_u16_page_bug(bus, ptr);
                let addr = base.wrapping_add(u16::from(self.y));
                self.page_cross_penalty(base, addr);
                addr
            }
            // Sign-extended offset; the branch helper adds it to PC.
            AddrMode::Relative => bus.read(operand) as i8 as u16,
        }
    }

    fn page_cross_penalty(&mut self, base: u16, addr: u16) {
        if self.extra_rule == ExtraCycle::PageCross && base & 0xFF00 != addr & 0xFF00 {
            self.extra_cycles += 1;
        }
    }

    // ---------------------------------------------------------------
    // Stack helpers
    // ---------------------------------------------------------------

    fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_BASE + u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    fn pop(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE + u16::from(self.sp))
    }

    fn pop_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pop(bus));
        let hi = u16::from(self.pop(bus));
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------

    #[allow(clippy::too_many_lines)] // One arm per semantic tag.
    fn execute(&mut self, op: Op, mode: AddrMode, bus: &mut impl Bus) {
        match op {
            Op::Adc => self.adc(bus),
            Op::And => self.and(bus),
            Op::Asl => {
                if mode == AddrMode::Accumulator {
                    let carry = self.a & 0x80 != 0;
                    self.a <<= 1;
                    self.status.set_flag(Status::C, carry);
                    self.status.set_zn(self.a);
                } else {
                    self.asl_mem(bus);
                }
            }
            Op::Bcc => self.branch(!self.status.contains(Status::C)),
            Op::Bcs => self.branch(self.status.contains(Status::C)),
            Op::Beq => self.branch(self.status.contains(Status::Z)),
            Op::Bit => {
                let m = bus.read(self.addr);
                self.status.set_flag(Status::Z, self.a & m == 0);
                self.status.set_flag(Status::V, m & 0x40 != 0);
                self.status.set_flag(Status::N, m & 0x80 != 0);
            }
            Op::Bmi => self.branch(self.status.contains(Status::N)),
            Op::Bne => self.branch(!self.status.contains(Status::Z)),
            Op::Bpl => self.branch(!self.status.contains(Status::N)),
            Op::Brk => {
                self.push_u16(bus, self.pc.wrapping_add(2));
                self.push(bus, self.status.to_stack_byte(true));
                self.status.insert(Status::I);
                self.pc = bus.read_u16(vectors::IRQ).wrapping_sub(1);
            }
            Op::Bvc => self.branch(!self.status.contains(Status::V)),
            Op::Bvs => self.branch(self.status.contains(Status::V)),
            Op::Clc => self.status.remove(Status::C),
            Op::Cld => self.status.remove(Status::D),
            Op::Cli => self.status.remove(Status::I),
            Op::Clv => self.status.remove(Status::V),
            Op::Cmp => self.compare(bus, self.a),
            Op::Cpx => self.compare(bus, self.x),
            Op::Cpy => self.compare(bus, self.y),
            Op::Dec => {
                let value = bus.read(self.addr).wrapping_sub(1);
                bus.write(self.addr, value);
                self.status.set_zn(value);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }
            Op::Eor => self.eor(bus),
            Op::Inc => {
                let value = bus.read(self.addr).wrapping_add(1);
                bus.write(self.addr, value);
                self.status.set_zn(value);
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Op::Jmp => self.pc = self.addr.wrapping_sub(3),
            Op::Jsr => {
                self.push_u16(bus, self.pc.wrapping_add(2));
                self.pc = self.addr.wrapping_sub(3);
            }
            Op::Lda => self.lda(bus),
            Op::Ldx => self.ldx(bus),
            Op::Ldy => {
                self.y = bus.read(self.addr);
                self.status.set_zn(self.y);
            }
            Op::Lsr => {
                if mode == AddrMode::Accumulator {
                    let carry = self.a & 0x01 != 0;
                    self.a >>= 1;
                    self.status.set_flag(Status::C, carry);
                    self.status.set_zn(self.a);
                } else {
                    self.lsr_mem(bus);
                }
            }
            Op::Nop => {}
            Op::Ora => self.ora(bus),
            Op::Pha => self.push(bus, self.a),
            Op::Php => self.push(bus, self.status.to_stack_byte(true)),
            Op::Pla => {
                self.a = self.pop(bus);
                self.status.set_zn(self.a);
            }
            Op::Plp => {
                let value = self.pop(bus);
                self.status = Status::from_stack_byte(value);
            }
            Op::Rol => {
                if mode == AddrMode::Accumulator {
                    let carry = self.a & 0x80 != 0;
                    self.a = (self.a << 1) | u8::from(self.status.contains(Status::C));
                    self.status.set_flag(Status::C, carry);
                    self.status.set_zn(self.a);
                } else {
                    self.rol_mem(bus);
                }
            }
            Op::Ror => {
                if mode == AddrMode::Accumulator {
                    let carry = self.a & 0x01 != 0;
                    self.a = (self.a >> 1) | (u8::from(self.status.contains(Status::C)) << 7);
                    self.status.set_flag(Status::C, carry);
                    self.status.set_zn(self.a);
                } else {
                    self.ror_mem(bus);
                }
            }
            Op::Rti => {
                let value = self.pop(bus);
                self.status = Status::from_stack_byte(value);
                self.pc = self.pop_u16(bus).wrapping_sub(1);
            }
            Op::Rts => self.pc = self.pop_u16(bus),
            Op::Sbc => self.sbc(bus),
            Op::Sec => self.status.insert(Status::C),
            Op::Sed => self.status.insert(Status::D),
            Op::Sei => self.status.insert(Status::I),
            Op::Sta => bus.write(self.addr, self.a),
            Op::Stx => bus.write(self.addr, self.x),
            Op::Sty => bus.write(self.addr, self.y),
            Op::Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Op::Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Op::Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            Op::Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Op::Txs => self.sp = self.x,
            Op::Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            // Illegal opcodes are compositions of the official pieces.
            Op::Dcp => {
                let value = bus.read(self.addr).wrapping_sub(1);
                bus.write(self.addr, value);
                self.status.set_zn(value);
                self.compare(bus, self.a);
            }
            Op::Isb => {
                let value = bus.read(self.addr).wrapping_add(1);
                bus.write(self.addr, value);
                self.status.set_zn(value);
                self.sbc(bus);
            }
            Op::Lax => {
                self.lda(bus);
                self.ldx(bus);
            }
            Op::Rla => {
                self.rol_mem(bus);
                self.and(bus);
            }
            Op::Rra => {
                self.ror_mem(bus);
                self.adc(bus);
            }
            Op::Sax => bus.write(self.addr, self.a & self.x),
            Op::Slo => {
                self.asl_mem(bus);
                self.ora(bus);
            }
            Op::Sre => {
                self.lsr_mem(bus);
                self.eor(bus);
            }
        }
    }

    /// Taken branches cost one cycle, two when the target sits in a
    /// different page than the following instruction.
    fn branch(&mut self, condition: bool) {
        if condition {
            self.extra_cycles += 1;
            let next = self.pc.wrapping_add(2);
            let target = next.wrapping_add(self.addr);
            if next & 0xFF00 != target & 0xFF00 {
                self.extra_cycles += 1;
            }
            self.pc = self.pc.wrapping_add(self.addr);
        }
    }

    fn adc(&mut self, bus: &mut impl Bus) {
        let a = self.a;
        let m = bus.read(self.addr);
        let carry = u16::from(self.status.contains(Status::C));
        let result = u16::from(a) + u16::from(m) + carry;
        self.a = result as u8;
        self.status.set_flag(Status::C, result > 0xFF);
        self.status
            .set_flag(Status::V, (a ^ self.a) & (m ^ self.a) & 0x80 != 0);
        self.status.set_zn(self.a);
    }

    fn sbc(&mut self, bus: &mut impl Bus) {
        let a = self.a;
        let m = bus.read(self.addr);
        let borrow = 1 - u16::from(self.status.contains(Status::C));
        let result = u16::from(a).wrapping_sub(u16::from(m)).wrapping_sub(borrow);
        self.a = result as u8;
        self.status.set_flag(Status::C, result <= 0xFF);
        self.status
            .set_flag(Status::V, (a ^ m) & (a ^ self.a) & 0x80 != 0);
        self.status.set_zn(self.a);
    }

    fn compare(&mut self, bus: &mut impl Bus, register: u8) {
        let m = bus.read(self.addr);
        self.status.set_flag(Status::C, register >= m);
        self.status.set_zn(register.wrapping_sub(m));
    }

    fn and(&mut self, bus: &mut impl Bus) {
        self.a &= bus.read(self.addr);
        self.status.set_zn(self.a);
    }

    fn eor(&mut self, bus: &mut impl Bus) {
        self.a ^= bus.read(self.addr);
        self.status.set_zn(self.a);
    }

    fn ora(&mut self, bus: &mut impl Bus) {
        self.a |= bus.read(self.addr);
        self.status.set_zn(self.a);
    }

    fn lda(&mut self, bus: &mut impl Bus) {
        self.a = bus.read(self.addr);
        self.status.set_zn(self.a);
    }

    fn ldx(&mut self, bus: &mut impl Bus) {
        self.x = bus.read(self.addr);
        self.status.set_zn(self.x);
    }

    fn asl_mem(&mut self, bus: &mut impl Bus) {
        let m = bus.read(self.addr);
        let value = m << 1;
        bus.write(self.addr, value);
        self.status.set_flag(Status::C, m & 0x80 != 0);
        self.status.set_zn(value);
    }

    fn lsr_mem(&mut self, bus: &mut impl Bus) {
        let m = bus.read(self.addr);
        let value = m >> 1;
        bus.write(self.addr, value);
        self.status.set_flag(Status::C, m & 0x01 != 0);
        self.status.set_zn(value);
    }

    fn rol_mem(&mut self, bus: &mut impl Bus) {
        let m = bus.read(self.addr);
        let value = (m << 1) | u8::from(self.status.contains(Status::C));
        bus.write(self.addr, value);
        self.status.set_zn(value);
        self.status.set_flag(Status::C, m & 0x80 != 0);
    }

    fn ror_mem(&mut self, bus: &mut impl Bus) {
        let m = bus.read(self.addr);
        let value = (m >> 1) | (u8::from(self.status.contains(Status::C)) << 7);
        bus.write(self.addr, value);
        self.status.set_zn(value);
        self.status.set_flag(Status::C, m & 0x01 != 0);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// 16-bit read reproducing the 6502's indirect page-wrap bug: when the
/// pointer's low byte is $FF, the high byte is fetched from the start of
/// the same page rather than the next one.
pub(crate) fn read_u16_page_bug(bus: &mut impl Bus, ptr: u16) -> u16 {
    if ptr & 0x00FF == 0x00FF {
        let lo = u16::from(bus.read(ptr));
        let hi = u16::from(bus.read(ptr & 0xFF00));
        (hi << 8) | lo
    } else {
        bus.read_u16(ptr)
    }
}
