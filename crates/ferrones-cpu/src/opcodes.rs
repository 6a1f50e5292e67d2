//! Static opcode descriptor table.
//!
//! Every dispatched opcode byte maps to an [`Opcode`] descriptor pairing a
//! semantic tag with its addressing mode, instruction length, base cycle
//! cost and extra-cycle rule. Bytes without an entry (the JAM opcodes and
//! a few undocumented immediates no software depends on) are left `None`
//! and surface as [`crate::CpuError::UnknownOpcode`] when fetched.
//!
//! Unofficial entries keep the `*`-prefixed mnemonics used by the
//! reference nestest log.

use crate::addressing::AddrMode;

/// Instruction semantics, one tag per distinct operation.
///
/// The execution core is an exhaustive `match` over this enum, so adding
/// an operation without implementing it fails at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // The 6502 mnemonics are their own documentation.
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
    Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
    Tsx, Txa, Txs, Tya,
    // Documented-illegal compositions.
    Dcp, Isb, Lax, Rla, Rra, Sax, Slo, Sre,
}

/// Rule for cycles charged beyond the base cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraCycle {
    /// Base cost only.
    None,
    /// One extra cycle when indexing crosses a page boundary.
    PageCross,
    /// One extra cycle when the branch is taken, another when the target
    /// lies in a different page than the following instruction.
    Branch,
}

/// One opcode's static description.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Semantic tag dispatched by the execution core.
    pub op: Op,
    /// Mnemonic for tracing; unofficial opcodes carry a `*` prefix.
    pub mnemonic: &'static str,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Total instruction length in bytes (opcode plus operands).
    pub length: u16,
    /// Base cycle cost.
    pub cycles: u8,
    /// Extra-cycle rule.
    pub extra: ExtraCycle,
}

macro_rules! opcode_table {
    ($($code:literal: $op:ident $mnemonic:literal $mode:ident $length:literal $cycles:literal $extra:ident;)*) => {{
        let mut table: [Option<Opcode>; 256] = [None; 256];
        $(
            table[$code] = Some(Opcode {
                op: Op::$op,
                mnemonic: $mnemonic,
                mode: AddrMode::$mode,
                length: $length,
                cycles: $cycles,
                extra: ExtraCycle::$extra,
            });
        )*
        table
    }};
}

/// The 256-entry dispatch table, indexed by opcode byte.
pub static OPCODE_TABLE: [Option<Opcode>; 256] = opcode_table! {
    // Official opcodes.
    0x69: Adc "ADC" Immediate       2 2 None;
    0x65: Adc "ADC" ZeroPage        2 3 None;
    0x75: Adc "ADC" ZeroPageX       2 4 None;
    0x6D: Adc "ADC" Absolute        3 4 None;
    0x7D: Adc "ADC" AbsoluteX       3 4 PageCross;
    0x79: Adc "ADC" AbsoluteY       3 4 PageCross;
    0x61: Adc "ADC" IndexedIndirect 2 6 None;
    0x71: Adc "ADC" IndirectIndexed 2 5 PageCross;
    0x29: And "AND" Immediate       2 2 None;
    0x25: And "AND" ZeroPage        2 3 None;
    0x35: And "AND" ZeroPageX       2 4 None;
    0x2D: And "AND" Absolute        3 4 None;
    0x3D: And "AND" AbsoluteX       3 4 PageCross;
    0x39: And "AND" AbsoluteY       3 4 PageCross;
    0x21: And "AND" IndexedIndirect 2 6 None;
    0x31: And "AND" IndirectIndexed 2 5 PageCross;
    0x0A: Asl "ASL" Accumulator     1 2 None;
    0x06: Asl "ASL" ZeroPage        2 5 None;
    0x16: Asl "ASL" ZeroPageX       2 6 None;
    0x0E: Asl "ASL" Absolute        3 6 None;
    0x1E: Asl "ASL" AbsoluteX       3 7 None;
    0x90: Bcc "BCC" Relative        2 2 Branch;
    0xB0: Bcs "BCS" Relative        2 2 Branch;
    0xF0: Beq "BEQ" Relative        2 2 Branch;
    0x24: Bit "BIT" ZeroPage        2 3 None;
    0x2C: Bit "BIT" Absolute        3 4 None;
    0x30: Bmi "BMI" Relative        2 2 Branch;
    0xD0: Bne "BNE" Relative        2 2 Branch;
    0x10: Bpl "BPL" Relative        2 2 Branch;
    0x00: Brk "BRK" Implied         1 7 None;
    0x50: Bvc "BVC" Relative        2 2 Branch;
    0x70: Bvs "BVS" Relative        2 2 Branch;
    0x18: Clc "CLC" Implied         1 2 None;
    0xD8: Cld "CLD" Implied         1 2 None;
    0x58: Cli "CLI" Implied         1 2 None;
    0xB8: Clv "CLV" Implied         1 2 None;
    0xC9: Cmp "CMP" Immediate       2 2 None;
    0xC5: Cmp "CMP" ZeroPage        2 3 None;
    0xD5: Cmp "CMP" ZeroPageX       2 4 None;
    0xCD: Cmp "CMP" Absolute        3 4 None;
    0xDD: Cmp "CMP" AbsoluteX       3 4 PageCross;
    0xD9: Cmp "CMP" AbsoluteY       3 4 PageCross;
    0xC1: Cmp "CMP" IndexedIndirect 2 6 None;
    0xD1: Cmp "CMP" IndirectIndexed 2 5 PageCross;
    0xE0: Cpx "CPX" Immediate       2 2 None;
    0xE4: Cpx "CPX" ZeroPage        2 3 None;
    0xEC: Cpx "CPX" Absolute        3 4 None;
    0xC0: Cpy "CPY" Immediate       2 2 None;
    0xC4: Cpy "CPY" ZeroPage        2 3 None;
    0xCC: Cpy "CPY" Absolute        3 4 None;
    0xC6: Dec "DEC" ZeroPage        2 5 None;
    0xD6: Dec "DEC" ZeroPageX       2 6 None;
    0xCE: Dec "DEC" Absolute        3 6 None;
    0xDE: Dec "DEC" AbsoluteX       3 7 None;
    0xCA: Dex "DEX" Implied         1 2 None;
    0x88: Dey "DEY" Implied         1 2 None;
    0x49: Eor "EOR" Immediate       2 2 None;
    0x45: Eor "EOR" ZeroPage        2 3 None;
    0x55: Eor "EOR" ZeroPageX       2 4 None;
    0x4D: Eor "EOR" Absolute        3 4 None;
    0x5D: Eor "EOR" AbsoluteX       3 4 PageCross;
    0x59: Eor "EOR" AbsoluteY       3 4 PageCross;
    0x41: Eor "EOR" IndexedIndirect 2 6 None;
    0x51: Eor "EOR" IndirectIndexed 2 5 PageCross;
    0xE6: Inc "INC" ZeroPage        2 5 None;
    0xF6: Inc "INC" ZeroPageX       2 6 None;
    0xEE: Inc "INC" Absolute        3 6 None;
    0xFE: Inc "INC" AbsoluteX       3 7 None;
    0xE8: Inx "INX" Implied         1 2 None;
    0xC8: Iny "INY" Implied         1 2 None;
    0x4C: Jmp "JMP" Absolute        3 3 None;
    0x6C: Jmp "JMP" Indirect        3 5 None;
    0x20: Jsr "JSR" Absolute        3 6 None;
    0xA9: Lda "LDA" Immediate       2 2 None;
    0xA5: Lda "LDA" ZeroPage        2 3 None;
    0xB5: Lda "LDA" ZeroPageX       2 4 None;
    0xAD: Lda "LDA" Absolute        3 4 None;
    0xBD: Lda "LDA" AbsoluteX       3 4 PageCross;
    0xB9: Lda "LDA" AbsoluteY       3 4 PageCross;
    0xA1: Lda "LDA" IndexedIndirect 2 6 None;
    0xB1: Lda "LDA" IndirectIndexed 2 5 PageCross;
    0xA2: Ldx "LDX" Immediate       2 2 None;
    0xA6: Ldx "LDX" ZeroPage        2 3 None;
    0xB6: Ldx "LDX" ZeroPageY       2 4 None;
    0xAE: Ldx "LDX" Absolute        3 4 None;
    0xBE: Ldx "LDX" AbsoluteY       3 4 PageCross;
    0xA0: Ldy "LDY" Immediate       2 2 None;
    0xA4: Ldy "LDY" ZeroPage        2 3 None;
    0xB4: Ldy "LDY" ZeroPageX       2 4 None;
    0xAC: Ldy "LDY" Absolute        3 4 None;
    0xBC: Ldy "LDY" AbsoluteX       3 4 PageCross;
    0x4A: Lsr "LSR" Accumulator     1 2 None;
    0x46: Lsr "LSR" ZeroPage        2 5 None;
    0x56: Lsr "LSR" ZeroPageX       2 6 None;
    0x4E: Lsr "LSR" Absolute        3 6 None;
    0x5E: Lsr "LSR" AbsoluteX       3 7 None;
    0xEA: Nop "NOP" Implied         1 2 None;
    0x09: Ora "ORA" Immediate       2 2 None;
    0x05: Ora "ORA" ZeroPage        2 3 None;
    0x15: Ora "ORA" ZeroPageX       2 4 None;
    0x0D: Ora "ORA" Absolute        3 4 None;
    0x1D: Ora "ORA" AbsoluteX       3 4 PageCross;
    0x19: Ora "ORA" AbsoluteY       3 4 PageCross;
    0x01: Ora "ORA" IndexedIndirect 2 6 None;
    0x11: Ora "ORA" IndirectIndexed 2 5 PageCross;
    0x48: Pha "PHA" Implied         1 3 None;
    0x08: Php "PHP" Implied         1 3 None;
    0x68: Pla "PLA" Implied         1 4 None;
    0x28: Plp "PLP" Implied         1 4 None;
    0x2A: Rol "ROL" Accumulator     1 2 None;
    0x26: Rol "ROL" ZeroPage        2 5 None;
    0x36: Rol "ROL" ZeroPageX       2 6 None;
    0x2E: Rol "ROL" Absolute        3 6 None;
    0x3E: Rol "ROL" AbsoluteX       3 7 None;
    0x6A: Ror "ROR" Accumulator     1 2 None;
    0x66: Ror "ROR" ZeroPage        2 5 None;
    0x76: Ror "ROR" ZeroPageX       2 6 None;
    0x6E: Ror "ROR" Absolute        3 6 None;
    0x7E: Ror "ROR" AbsoluteX       3 7 None;
    0x40: Rti "RTI" Implied         1 6 None;
    0x60: Rts "RTS" Implied         1 6 None;
    0xE9: Sbc "SBC" Immediate       2 2 None;
    0xE5: Sbc "SBC" ZeroPage        2 3 None;
    0xF5: Sbc "SBC" ZeroPageX       2 4 None;
    0xED: Sbc "SBC" Absolute        3 4 None;
    0xFD: Sbc "SBC" AbsoluteX       3 4 PageCross;
    0xF9: Sbc "SBC" AbsoluteY       3 4 PageCross;
    0xE1: Sbc "SBC" IndexedIndirect 2 6 None;
    0xF1: Sbc "SBC" IndirectIndexed 2 5 PageCross;
    0x38: Sec "SEC" Implied         1 2 None;
    0xF8: Sed "SED" Implied         1 2 None;
    0x78: Sei "SEI" Implied         1 2 None;
    0x85: Sta "STA" ZeroPage        2 3 None;
    0x95: Sta "STA" ZeroPageX       2 4 None;
    0x8D: Sta "STA" Absolute        3 4 None;
    0x9D: Sta "STA" AbsoluteX       3 5 None;
    0x99: Sta "STA" AbsoluteY       3 5 None;
    0x81: Sta "STA" IndexedIndirect 2 6 None;
    0x91: Sta "STA" IndirectIndexed 2 6 None;
    0x86: Stx "STX" ZeroPage        2 3 None;
    0x96: Stx "STX" ZeroPageY       2 4 None;
    0x8E: Stx "STX" Absolute        3 4 None;
    0x84: Sty "STY" ZeroPage        2 3 None;
    0x94: Sty "STY" ZeroPageX       2 4 None;
    0x8C: Sty "STY" Absolute        3 4 None;
    0xAA: Tax "TAX" Implied         1 2 None;
    0xA8: Tay "TAY" Implied         1 2 None;
    0xBA: Tsx "TSX" Implied         1 2 None;
    0x8A: Txa "TXA" Implied         1 2 None;
    0x9A: Txs "TXS" Implied         1 2 None;
    0x98: Tya "TYA" Implied         1 2 None;
    // Documented-illegal opcodes.
    0xC7: Dcp "*DCP" ZeroPage        2 5 None;
    0xD7: Dcp "*DCP" ZeroPageX       2 6 None;
    0xCF: Dcp "*DCP" Absolute        3 6 None;
    0xDF: Dcp "*DCP" AbsoluteX       3 6 PageCross;
    0xDB: Dcp "*DCP" AbsoluteY       3 6 PageCross;
    0xC3: Dcp "*DCP" IndexedIndirect 2 8 None;
    0xD3: Dcp "*DCP" IndirectIndexed 2 7 PageCross;
    0xE7: Isb "*ISB" ZeroPage        2 5 None;
    0xF7: Isb "*ISB" ZeroPageX       2 6 None;
    0xEF: Isb "*ISB" Absolute        3 6 None;
    0xFF: Isb "*ISB" AbsoluteX       3 6 PageCross;
    0xFB: Isb "*ISB" AbsoluteY       3 6 PageCross;
    0xE3: Isb "*ISB" IndexedIndirect 2 8 None;
    0xF3: Isb "*ISB" IndirectIndexed 2 7 PageCross;
    0xA7: Lax "*LAX" ZeroPage        2 3 None;
    0xB7: Lax "*LAX" ZeroPageY       2 4 None;
    0xAF: Lax "*LAX" Absolute        3 4 None;
    0xBF: Lax "*LAX" AbsoluteY       3 4 PageCross;
    0xA3: Lax "*LAX" IndexedIndirect 2 6 None;
    0xB3: Lax "*LAX" IndirectIndexed 2 5 PageCross;
    0x1A: Nop "*NOP" Implied         1 2 None;
    0x3A: Nop "*NOP" Implied         1 2 None;
    0x5A: Nop "*NOP" Implied         1 2 None;
    0x7A: Nop "*NOP" Implied         1 2 None;
    0xDA: Nop "*NOP" Implied         1 2 None;
    0xFA: Nop "*NOP" Implied         1 2 None;
    0x80: Nop "*NOP" Immediate       2 2 None;
    0x04: Nop "*NOP" ZeroPage        2 3 None;
    0x44: Nop "*NOP" ZeroPage        2 3 None;
    0x64: Nop "*NOP" ZeroPage        2 3 None;
    0x14: Nop "*NOP" ZeroPageX       2 4 None;
    0x34: Nop "*NOP" ZeroPageX       2 4 None;
    0x54: Nop "*NOP" ZeroPageX       2 4 None;
    0x74: Nop "*NOP" ZeroPageX       2 4 None;
    0xD4: Nop "*NOP" ZeroPageX       2 4 None;
    0xF4: Nop "*NOP" ZeroPageX       2 4 None;
    0x0C: Nop "*NOP" Absolute        3 4 None;
    0x1C: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0x3C: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0x5C: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0x7C: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0xDC: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0xFC: Nop "*NOP" AbsoluteX       3 4 PageCross;
    0x27: Rla "*RLA" ZeroPage        2 5 None;
    0x37: Rla "*RLA" ZeroPageX       2 6 None;
    0x2F: Rla "*RLA" Absolute        3 6 None;
    0x3F: Rla "*RLA" AbsoluteX       3 6 PageCross;
    0x3B: Rla "*RLA" AbsoluteY       3 6 PageCross;
    0x23: Rla "*RLA" IndexedIndirect 2 8 None;
    0x33: Rla "*RLA" IndirectIndexed 2 7 PageCross;
    0x67: Rra "*RRA" ZeroPage        2 5 None;
    0x77: Rra "*RRA" ZeroPageX       2 6 None;
    0x6F: Rra "*RRA" Absolute        3 6 None;
    0x7F: Rra "*RRA" AbsoluteX       3 6 PageCross;
    0x7B: Rra "*RRA" AbsoluteY       3 6 PageCross;
    0x63: Rra "*RRA" IndexedIndirect 2 8 None;
    0x73: Rra "*RRA" IndirectIndexed 2 7 PageCross;
    0x87: Sax "*SAX" ZeroPage        2 3 None;
    0x97: Sax "*SAX" ZeroPageY       2 4 None;
    0x8F: Sax "*SAX" Absolute        3 4 None;
    0x83: Sax "*SAX" IndexedIndirect 2 6 None;
    0xEB: Sbc "*SBC" Immediate       2 2 None;
    0x07: Slo "*SLO" ZeroPage        2 5 None;
    0x17: Slo "*SLO" ZeroPageX       2 6 None;
    0x0F: Slo "*SLO" Absolute        3 6 None;
    0x1F: Slo "*SLO" AbsoluteX       3 6 PageCross;
    0x1B: Slo "*SLO" AbsoluteY       3 6 PageCross;
    0x03: Slo "*SLO" IndexedIndirect 2 8 None;
    0x13: Slo "*SLO" IndirectIndexed 2 7 PageCross;
    0x47: Sre "*SRE" ZeroPage        2 5 None;
    0x57: Sre "*SRE" ZeroPageX       2 6 None;
    0x4F: Sre "*SRE" Absolute        3 6 None;
    0x5F: Sre "*SRE" AbsoluteX       3 6 PageCross;
    0x5B: Sre "*SRE" AbsoluteY       3 6 PageCross;
    0x43: Sre "*SRE" IndexedIndirect 2 8 None;
    0x53: Sre "*SRE" IndirectIndexed 2 7 PageCross;
};
