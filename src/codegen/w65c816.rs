// Glorp - A Python-inspired compiler creating SNES cartridge images
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! W65C816 instruction encoding for the Glorp compiler.
//!
//! This module provides the addressing modes, the opcode constants and the
//! hand-curated `(mnemonic, mode) -> opcode` table used by the encoder.

use crate::error::{CompileError, ErrorCode, Result};

/// Addressing modes of the 65816.
///
/// Only a subset has an assembly routine; see [`AddressMode::is_supported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Absolute,
    AbsoluteIndexedByX,
    AbsoluteIndexedByY,
    AbsoluteLong,
    AbsoluteLongIndexedByX,
    DirectPage,
    DirectPageIndexedByX,
    DirectPageIndexedByY,
    DirectPageIndexedIndirectByX,
    DirectPageIndirect,
    DirectPageIndirectLong,
    DirectPageIndirectLongIndexedByY,
    Immediate,
    Implied,
    ProgramCounterRelative,
    StackRelative,
    StackRelativeIndirectIndexedByY,
}

impl AddressMode {
    pub const ALL: [AddressMode; 17] = [
        AddressMode::Absolute,
        AddressMode::AbsoluteIndexedByX,
        AddressMode::AbsoluteIndexedByY,
        AddressMode::AbsoluteLong,
        AddressMode::AbsoluteLongIndexedByX,
        AddressMode::DirectPage,
        AddressMode::DirectPageIndexedByX,
        AddressMode::DirectPageIndexedByY,
        AddressMode::DirectPageIndexedIndirectByX,
        AddressMode::DirectPageIndirect,
        AddressMode::DirectPageIndirectLong,
        AddressMode::DirectPageIndirectLongIndexedByY,
        AddressMode::Immediate,
        AddressMode::Implied,
        AddressMode::ProgramCounterRelative,
        AddressMode::StackRelative,
        AddressMode::StackRelativeIndirectIndexedByY,
    ];

    /// Modes [`EmitHelpers::assemble`](super::EmitHelpers::assemble) can
    /// encode.
    ///
    /// Relative branches have opcodes but are only emitted through
    /// [`LabelManager::branch`](super::LabelManager::branch).
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            AddressMode::Absolute
                | AddressMode::AbsoluteLong
                | AddressMode::Immediate
                | AddressMode::Implied
        )
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            AddressMode::Absolute => "absolute",
            AddressMode::AbsoluteIndexedByX => "absolute indexed by x",
            AddressMode::AbsoluteIndexedByY => "absolute indexed by y",
            AddressMode::AbsoluteLong => "absolute long",
            AddressMode::AbsoluteLongIndexedByX => "absolute long indexed by x",
            AddressMode::DirectPage => "direct page",
            AddressMode::DirectPageIndexedByX => "direct page indexed by x",
            AddressMode::DirectPageIndexedByY => "direct page indexed by y",
            AddressMode::DirectPageIndexedIndirectByX => "direct page indexed indirect by x",
            AddressMode::DirectPageIndirect => "direct page indirect",
            AddressMode::DirectPageIndirectLong => "direct page indirect long",
            AddressMode::DirectPageIndirectLongIndexedByY => {
                "direct page indirect long indexed by y"
            }
            AddressMode::Immediate => "immediate",
            AddressMode::Implied => "implied",
            AddressMode::ProgramCounterRelative => "program counter relative",
            AddressMode::StackRelative => "stack relative",
            AddressMode::StackRelativeIndirectIndexedByY => "stack relative indirect indexed by y",
        }
    }
}

impl std::fmt::Display for AddressMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opcodes for the 65816.
///
/// Naming convention: INSTR_MODE where MODE is:
/// - IMM: Immediate (#$xx / #$xxxx)
/// - ABS: Absolute ($xxxx)
/// - LONG: Absolute long ($xx:xxxx)
/// - no suffix: Implied or program counter relative
pub mod opcodes {
    // Load/Store Operations
    pub const LDA_IMM: u8 = 0xA9;
    pub const LDA_ABS: u8 = 0xAD;
    pub const LDA_LONG: u8 = 0xAF;

    pub const LDX_IMM: u8 = 0xA2;
    pub const LDX_ABS: u8 = 0xAE;

    pub const LDY_IMM: u8 = 0xA0;
    pub const LDY_ABS: u8 = 0xAC;

    pub const STA_ABS: u8 = 0x8D;
    pub const STA_LONG: u8 = 0x8F;
    pub const STX_ABS: u8 = 0x8E;
    pub const STY_ABS: u8 = 0x8C;
    pub const STZ_ABS: u8 = 0x9C;

    // Logic and compare
    pub const AND_IMM: u8 = 0x29;
    pub const ORA_IMM: u8 = 0x09;
    pub const CMP_IMM: u8 = 0xC9;

    // Increment/Decrement
    pub const INX: u8 = 0xE8;
    pub const DEX: u8 = 0xCA;

    // Branch Operations (all relative)
    pub const BCC: u8 = 0x90;
    pub const BCS: u8 = 0xB0;
    pub const BEQ: u8 = 0xF0;
    pub const BNE: u8 = 0xD0;
    pub const BRA: u8 = 0x80;

    // Jump and Subroutine
    pub const JMP_ABS: u8 = 0x4C;
    pub const JML_LONG: u8 = 0x5C;
    pub const JSR_ABS: u8 = 0x20;
    pub const JSL_LONG: u8 = 0x22;
    pub const RTS: u8 = 0x60;
    pub const RTL: u8 = 0x6B;
    pub const RTI: u8 = 0x40;

    // Status Flag Operations
    pub const CLC: u8 = 0x18;
    pub const SEC: u8 = 0x38;
    pub const CLI: u8 = 0x58;
    pub const SEI: u8 = 0x78;
    pub const REP_IMM: u8 = 0xC2;
    pub const SEP_IMM: u8 = 0xE2;
    pub const XCE: u8 = 0xFB;

    // Transfer Operations
    pub const TAX: u8 = 0xAA;
    pub const TXA: u8 = 0x8A;
    pub const TXS: u8 = 0x9A;
    pub const TCD: u8 = 0x5B;

    // Miscellaneous
    pub const NOP: u8 = 0xEA;
}

/// Hardware registers touched by generated code.
pub mod registers {
    /// Screen display (forced blank, brightness).
    pub const INIDISP: u16 = 0x2100;
    /// Interrupt enable.
    pub const NMITIMEN: u16 = 0x4200;
}

/// Mnemonics whose immediate operand is one byte regardless of M and X.
pub const FIXED_WIDTH_IMMEDIATE: &[&str] = &["rep", "sep"];

/// True if the immediate operand of `mnemonic` never depends on M or X.
pub fn is_fixed_width_immediate(mnemonic: &str) -> bool {
    FIXED_WIDTH_IMMEDIATE
        .iter()
        .any(|m| m.eq_ignore_ascii_case(mnemonic))
}

/// Look up the opcode for a mnemonic in a given mode.
pub fn lookup(mnemonic: &str, mode: AddressMode) -> Option<u8> {
    use opcodes::*;
    use AddressMode::*;

    let opcode = match (mnemonic.to_ascii_lowercase().as_str(), mode) {
        ("clc", Implied) => CLC,
        ("cli", Implied) => CLI,
        ("dex", Implied) => DEX,
        ("inx", Implied) => INX,
        ("nop", Implied) => NOP,
        ("rti", Implied) => RTI,
        ("rtl", Implied) => RTL,
        ("rts", Implied) => RTS,
        ("sec", Implied) => SEC,
        ("sei", Implied) => SEI,
        ("tax", Implied) => TAX,
        ("tcd", Implied) => TCD,
        ("txa", Implied) => TXA,
        ("txs", Implied) => TXS,
        ("xce", Implied) => XCE,

        ("and", Immediate) => AND_IMM,
        ("cmp", Immediate) => CMP_IMM,
        ("lda", Immediate) => LDA_IMM,
        ("ldx", Immediate) => LDX_IMM,
        ("ldy", Immediate) => LDY_IMM,
        ("ora", Immediate) => ORA_IMM,
        ("rep", Immediate) => REP_IMM,
        ("sep", Immediate) => SEP_IMM,

        ("jmp", Absolute) => JMP_ABS,
        ("jsr", Absolute) => JSR_ABS,
        ("lda", Absolute) => LDA_ABS,
        ("ldx", Absolute) => LDX_ABS,
        ("ldy", Absolute) => LDY_ABS,
        ("sta", Absolute) => STA_ABS,
        ("stx", Absolute) => STX_ABS,
        ("sty", Absolute) => STY_ABS,
        ("stz", Absolute) => STZ_ABS,

        ("jml", AbsoluteLong) => JML_LONG,
        ("jsl", AbsoluteLong) => JSL_LONG,
        ("lda", AbsoluteLong) => LDA_LONG,
        ("sta", AbsoluteLong) => STA_LONG,

        ("bcc", ProgramCounterRelative) => BCC,
        ("bcs", ProgramCounterRelative) => BCS,
        ("beq", ProgramCounterRelative) => BEQ,
        ("bne", ProgramCounterRelative) => BNE,
        ("bra", ProgramCounterRelative) => BRA,

        _ => return None,
    };
    Some(opcode)
}

/// Resolve an opcode or fail with [`ErrorCode::UnsupportedEncoding`].
pub fn opcode(mnemonic: &str, mode: AddressMode) -> Result<u8> {
    lookup(mnemonic, mode).ok_or_else(|| {
        CompileError::new(
            ErrorCode::UnsupportedEncoding,
            format!(
                "No encoding for '{}' in {} mode",
                mnemonic.to_ascii_lowercase(),
                mode
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("clc", AddressMode::Implied, 0x18; "clc")]
    #[test_case("SEI", AddressMode::Implied, 0x78; "sei uppercase")]
    #[test_case("xce", AddressMode::Implied, 0xFB; "xce")]
    #[test_case("tcd", AddressMode::Implied, 0x5B; "tcd")]
    #[test_case("rep", AddressMode::Immediate, 0xC2; "rep")]
    #[test_case("sep", AddressMode::Immediate, 0xE2; "sep")]
    #[test_case("lda", AddressMode::Immediate, 0xA9; "lda immediate")]
    #[test_case("lda", AddressMode::AbsoluteLong, 0xAF; "lda long")]
    #[test_case("sta", AddressMode::Absolute, 0x8D; "sta absolute")]
    #[test_case("sta", AddressMode::AbsoluteLong, 0x8F; "sta long")]
    #[test_case("jml", AddressMode::AbsoluteLong, 0x5C; "jml")]
    #[test_case("beq", AddressMode::ProgramCounterRelative, 0xF0; "beq")]
    fn test_lookup(mnemonic: &str, mode: AddressMode, expected: u8) {
        assert_eq!(lookup(mnemonic, mode), Some(expected));
    }

    #[test]
    fn test_unmapped_pair_is_an_error() {
        let err = opcode("clc", AddressMode::Immediate).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedEncoding);
        assert!(err.message.contains("clc"));
        assert!(err.message.contains("immediate"));

        assert!(opcode("foo", AddressMode::Implied).is_err());
    }

    #[test]
    fn test_fixed_width_immediates() {
        assert!(is_fixed_width_immediate("rep"));
        assert!(is_fixed_width_immediate("SEP"));
        assert!(!is_fixed_width_immediate("lda"));
    }

    #[test]
    fn test_supported_modes() {
        assert!(AddressMode::Implied.is_supported());
        assert!(AddressMode::AbsoluteLong.is_supported());
        assert!(!AddressMode::ProgramCounterRelative.is_supported());
        assert!(!AddressMode::DirectPage.is_supported());
        assert!(!AddressMode::StackRelative.is_supported());
    }
}
