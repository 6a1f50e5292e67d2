//! Instruction trace capture in the nestest log format.
//!
//! A [`TraceEntry`] snapshots the CPU immediately before an instruction
//! executes and renders one log line:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
//! ```
//!
//! The PPU position and cycle total belong to the caller (the console, or
//! a test harness doing its own accounting), so they are supplied at
//! formatting time rather than captured here.

use crate::addressing::AddrMode;
use crate::cpu::{read_u16_page_bug, Bus, Cpu};
use crate::opcodes::OPCODE_TABLE;
use std::fmt::Write;

/// Snapshot of one instruction about to execute.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pc: u16,
    bytes: Vec<u8>,
    mnemonic: &'static str,
    operand: String,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    sp: u8,
}

impl TraceEntry {
    /// Capture the instruction at the current PC. Returns `None` when the
    /// byte at PC is not a dispatched opcode (the subsequent step will
    /// fail with the real error).
    pub fn capture(cpu: &Cpu, bus: &mut impl Bus) -> Option<Self> {
        let code = bus.read(cpu.pc);
        let opcode = OPCODE_TABLE[usize::from(code)].as_ref()?;

        let bytes: Vec<u8> = (0..opcode.length)
            .map(|i| bus.read(cpu.pc.wrapping_add(i)))
            .collect();
        let operand = disassemble_operand(cpu, bus, opcode.mode, opcode.mnemonic, &bytes);

        Some(Self {
            pc: cpu.pc,
            bytes,
            mnemonic: opcode.mnemonic,
            operand,
            a: cpu.a,
            x: cpu.x,
            y: cpu.y,
            p: cpu.status.bits(),
            sp: cpu.sp,
        })
    }

    /// Render the nestest-format line. `scanline` and `dot` give the PPU
    /// raster position; `cycles` the running CPU cycle total.
    #[must_use]
    pub fn format(&self, scanline: u32, dot: u32, cycles: u64) -> String {
        let mut line = format!("{:04X}  ", self.pc);
        for byte in &self.bytes {
            write!(line, "{byte:02X} ").unwrap();
        }
        for _ in self.bytes.len()..3 {
            line.push_str("   ");
        }
        write!(line, "{:>4} {:<28}", self.mnemonic, self.operand).unwrap();
        write!(
            line,
            "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{scanline:>3},{dot:>3} CYC:{cycles}",
            self.a, self.x, self.y, self.p, self.sp,
        )
        .unwrap();
        line
    }
}

/// Read a byte for display purposes. Hardware registers change state when
/// read, so the window $2000-$401F is never touched; the log shows $FF
/// there, which only ever differs for instructions nestest does not trace.
fn peek_data(bus: &mut impl Bus, addr: u16) -> u8 {
    if (0x2000..0x4020).contains(&addr) {
        0xFF
    } else {
        bus.read(addr)
    }
}

fn disassemble_operand(
    cpu: &Cpu,
    bus: &mut impl Bus,
    mode: AddrMode,
    mnemonic: &str,
    bytes: &[u8],
) -> String {
    match mode {
        AddrMode::Implied => String::new(),
        AddrMode::Accumulator => "A".to_string(),
        AddrMode::Immediate => format!("#${:02X}", bytes[1]),
        AddrMode::ZeroPage => {
            let addr = u16::from(bytes[1]);
            format!("${:02X} = {:02X}", bytes[1], peek_data(bus, addr))
        }
        AddrMode::ZeroPageX => {
            let addr = bytes[1].wrapping_add(cpu.x);
            format!(
                "${:02X},X @ {addr:02X} = {:02X}",
                bytes[1],
                peek_data(bus, u16::from(addr))
            )
        }
        AddrMode::ZeroPageY => {
            let addr = bytes[1].wrapping_add(cpu.y);
            format!(
                "${:02X},Y @ {addr:02X} = {:02X}",
                bytes[1],
                peek_data(bus, u16::from(addr))
            )
        }
        AddrMode::Absolute => {
            let addr = u16::from_le_bytes([bytes[1], bytes[2]]);
            if mnemonic.starts_with('J') {
                format!("${addr:04X}")
            } else {
                format!("${addr:04X} = {:02X}", peek_data(bus, addr))
            }
        }
        AddrMode::AbsoluteX => {
            let base = u16::from_le_bytes([bytes[1], bytes[2]]);
            let addr = base.wrapping_add(u16::from(cpu.x));
            format!("${base:04X},X @ {addr:04X} = {:02X}", peek_data(bus, addr))
        }
        AddrMode::AbsoluteY => {
            let base = u16::from_le_bytes([bytes[1], bytes[2]]);
            let addr = base.wrapping_add(u16::from(cpu.y));
            format!("${base:04X},Y @ {addr:04X} = {:02X}", peek_data(bus, addr))
        }
        AddrMode::Indirect => {
            let ptr = u16::from_le_bytes([bytes[1], bytes[2]]);
            let target = read_u16_page_bug(bus, ptr);
            format!("(${ptr:04X}) = {target:04X}")
        }
        AddrMode::IndexedIndirect => {
            let ptr = bytes[1].wrapping_add(cpu.x);
            let addr = read_u16_page_bug(bus, u16::from(ptr));
            format!(
                "(${:02X},X) @ {ptr:02X} = {addr:04X} = {:02X}",
                bytes[1],
                peek_data(bus, addr)
            )
        }
        AddrMode::IndirectIndexed => {
            let base = read_u16_page_bug(bus, u16::from(bytes[1]));
            let addr = base.wrapping_add(u16::from(cpu.y));
            format!(
                "(${:02X}),Y = {base:04X} @ {addr:04X} = {:02X}",
                bytes[1],
                peek_data(bus, addr)
            )
        }
        AddrMode::Relative => {
            let offset = bytes[1] as i8 as u16;
            let target = cpu.pc.wrapping_add(2).wrapping_add(offset);
            format!("${target:04X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus {
        memory: [u8; 65536],
    }

    impl Bus for FlatBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.memory[usize::from(addr)]
        }

        fn write(&mut self, addr: u16, value: u8) {
            self.memory[usize::from(addr)] = value;
        }
    }

    fn setup(program: &[u8]) -> (Cpu, FlatBus) {
        let mut bus = FlatBus { memory: [0; 65536] };
        for (i, &b) in program.iter().enumerate() {
            bus.memory[0xC000 + i] = b;
        }
        bus.memory[0xFFFC] = 0x00;
        bus.memory[0xFFFD] = 0xC0;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn formats_the_canonical_first_nestest_line() {
        let (cpu, mut bus) = setup(&[0x4C, 0xF5, 0xC5]);
        let entry = TraceEntry::capture(&cpu, &mut bus).unwrap();
        assert_eq!(
            entry.format(0, 21, 7),
            "C000  4C F5 C5  JMP $C5F5                       \
             A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"
        );
    }

    #[test]
    fn formats_immediate_operands() {
        let (cpu, mut bus) = setup(&[0xA2, 0x00]);
        let entry = TraceEntry::capture(&cpu, &mut bus).unwrap();
        assert_eq!(
            entry.format(0, 21, 7),
            "C000  A2 00     LDX #$00                        \
             A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"
        );
    }

    #[test]
    fn unofficial_mnemonics_keep_their_star_prefix() {
        let (cpu, mut bus) = setup(&[0x04, 0x10]);
        bus.memory[0x0010] = 0xAB;
        let entry = TraceEntry::capture(&cpu, &mut bus).unwrap();
        let line = entry.format(0, 0, 0);
        assert!(line.contains("*NOP $10 = AB"), "line was: {line}");
    }

    #[test]
    fn indirect_shows_the_page_wrap_target() {
        let (cpu, mut bus) = setup(&[0x6C, 0xFF, 0x02]);
        bus.memory[0x02FF] = 0x00;
        bus.memory[0x0200] = 0x03; // high byte from $0200, not $0300
        let entry = TraceEntry::capture(&cpu, &mut bus).unwrap();
        let line = entry.format(0, 0, 0);
        assert!(line.contains("JMP ($02FF) = 0300"), "line was: {line}");
    }

    #[test]
    fn relative_target_is_pc_plus_two_plus_offset() {
        let (cpu, mut bus) = setup(&[0xD0, 0xFE]); // BNE -2: branch to itself
        let entry = TraceEntry::capture(&cpu, &mut bus).unwrap();
        let line = entry.format(0, 0, 0);
        assert!(line.contains("BNE $C000"), "line was: {line}");
    }

    #[test]
    fn capture_returns_none_for_undispatched_bytes() {
        let (cpu, mut bus) = setup(&[0x02]);
        assert!(TraceEntry::capture(&cpu, &mut bus).is_none());
    }
}
