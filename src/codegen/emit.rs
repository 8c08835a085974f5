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

//! Emit helper methods for code generation.
//!
//! This module provides the low-level assembly routines. Each routine:
//! - resolves the opcode for `(mnemonic, mode)`
//! - lays out the operand bytes (little-endian, width from the tracker for
//!   immediates)
//! - injects the bytes at the image cursor
//! - applies the instruction's side effects to the tracked state

use tracing::trace;

use super::tracking::{Operand, StateTracking};
use super::w65c816::{self, AddressMode};
use super::CodeGenerator;
use crate::cpu::{Flag, FlagState};
use crate::error::{CompileError, ErrorCode, Result};
use crate::memory::long_address;

/// Pack `value` into `byte_count` little-endian bytes, zero padded.
///
/// Fails with [`ErrorCode::OperandTooWide`] if the value does not fit.
pub fn reorder_bytes(value: u32, byte_count: usize) -> Result<Vec<u8>> {
    let needed = (32 - value.leading_zeros() as usize + 7) / 8;
    if needed > byte_count {
        return Err(CompileError::new(
            ErrorCode::OperandTooWide,
            format!(
                "Value ${:X} does not fit in {} byte(s)",
                value, byte_count
            ),
        ));
    }

    let mut bytes = value.to_le_bytes().to_vec();
    bytes.resize(byte_count, 0);
    Ok(bytes)
}

/// Extension trait for instruction assembly.
///
/// This trait is implemented for `CodeGenerator` and separates encoding
/// from the higher level instruction helpers.
pub trait EmitHelpers {
    /// Inject raw bytes at the cursor.
    fn emit_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Width in bytes of the immediate operand of `mnemonic` in the current
    /// tracked state.
    fn immediate_width(&self, mnemonic: &str) -> Result<usize>;

    /// Assemble an instruction without operand.
    fn assemble_implied(&mut self, mnemonic: &str) -> Result<()>;

    /// Assemble an immediate instruction, sizing the operand from the
    /// tracked processor state.
    fn assemble_immediate(&mut self, mnemonic: &str, value: u32) -> Result<()>;

    /// Assemble an immediate instruction with an explicit operand width.
    fn assemble_immediate_sized(&mut self, mnemonic: &str, value: u32, width: usize)
        -> Result<()>;

    /// Assemble an instruction with a 16-bit address in the data bank.
    fn assemble_absolute(&mut self, mnemonic: &str, address: u16) -> Result<()>;

    /// Assemble an instruction with a 24-bit address.
    fn assemble_absolute_long(&mut self, mnemonic: &str, bank: u8, address: u16) -> Result<()>;

    /// Assemble by addressing mode.
    ///
    /// `operand` is the immediate value, the absolute address or the 24-bit
    /// long address depending on `mode`.
    fn assemble(&mut self, mnemonic: &str, mode: AddressMode, operand: u32) -> Result<()>;
}

impl EmitHelpers for CodeGenerator {
    fn emit_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.rom.inject_next(bytes)
    }

    fn immediate_width(&self, mnemonic: &str) -> Result<usize> {
        if w65c816::is_fixed_width_immediate(mnemonic) {
            return Ok(1);
        }

        let status = &self.registers.status;
        let wide_index = self.registers.x_index == Some(0);
        match status.emulation() {
            FlagState::Set => Ok(1),
            FlagState::Unknown => Err(indeterminate_width(mnemonic, "the emulation bit")),
            FlagState::Clear => match status.flag(Flag::AccumulatorWidth) {
                FlagState::Set => Ok(2),
                FlagState::Clear if wide_index => Ok(2),
                FlagState::Clear => Ok(1),
                FlagState::Unknown if wide_index => Ok(2),
                FlagState::Unknown => Err(indeterminate_width(mnemonic, "the accumulator width flag")),
            },
        }
    }

    fn assemble_implied(&mut self, mnemonic: &str) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::Implied)?;
        self.place(&mnemonic, AddressMode::Implied, &[opcode])?;
        self.apply_side_effects(&mnemonic, Operand::None)
    }

    fn assemble_immediate(&mut self, mnemonic: &str, value: u32) -> Result<()> {
        let width = self.immediate_width(mnemonic)?;
        self.assemble_immediate_sized(mnemonic, value, width)
    }

    fn assemble_immediate_sized(
        &mut self,
        mnemonic: &str,
        value: u32,
        width: usize,
    ) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::Immediate)?;

        let mut asm = vec![opcode];
        asm.extend(reorder_bytes(value, width)?);
        self.place(&mnemonic, AddressMode::Immediate, &asm)?;
        self.apply_side_effects(&mnemonic, Operand::Immediate { value, width })
    }

    fn assemble_absolute(&mut self, mnemonic: &str, address: u16) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::Absolute)?;

        let mut asm = vec![opcode];
        asm.extend(address.to_le_bytes());
        self.place(&mnemonic, AddressMode::Absolute, &asm)?;
        // The data bank register is never changed, so it stays at 00.
        self.apply_side_effects(&mnemonic, Operand::Memory(long_address(0x00, address)))
    }

    fn assemble_absolute_long(&mut self, mnemonic: &str, bank: u8, address: u16) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::AbsoluteLong)?;

        let mut asm = vec![opcode];
        asm.extend(address.to_le_bytes());
        asm.push(bank);
        self.place(&mnemonic, AddressMode::AbsoluteLong, &asm)?;
        self.apply_side_effects(&mnemonic, Operand::Memory(long_address(bank, address)))
    }

    fn assemble(&mut self, mnemonic: &str, mode: AddressMode, operand: u32) -> Result<()> {
        if !mode.is_supported() {
            return Err(unsupported_mode(mnemonic, mode));
        }

        match mode {
            AddressMode::Implied => self.assemble_implied(mnemonic),
            AddressMode::Immediate => self.assemble_immediate(mnemonic, operand),
            AddressMode::Absolute => {
                let address = u16::try_from(operand).map_err(|_| too_wide(operand, 2))?;
                self.assemble_absolute(mnemonic, address)
            }
            AddressMode::AbsoluteLong => {
                if operand > 0x00FF_FFFF {
                    return Err(too_wide(operand, 3));
                }
                self.assemble_absolute_long(mnemonic, (operand >> 16) as u8, operand as u16)
            }
            _ => Err(unsupported_mode(mnemonic, mode)),
        }
    }
}

impl CodeGenerator {
    /// Inject one encoded instruction.
    pub(super) fn place(&mut self, mnemonic: &str, mode: AddressMode, asm: &[u8]) -> Result<()> {
        let offset = self.rom.current_address();
        self.emit_bytes(asm)?;
        trace!(mnemonic, %mode, offset, bytes = ?asm, "instruction");
        Ok(())
    }
}

fn indeterminate_width(mnemonic: &str, what: &str) -> CompileError {
    CompileError::new(
        ErrorCode::IndeterminateOperandWidth,
        format!(
            "Cannot size the immediate operand of '{}': {} is unknown",
            mnemonic.to_ascii_lowercase(),
            what
        ),
    )
    .with_hint("Switch the CPU mode or set the width flags explicitly before this instruction")
}

fn unsupported_mode(mnemonic: &str, mode: AddressMode) -> CompileError {
    CompileError::new(
        ErrorCode::UnsupportedEncoding,
        format!(
            "Addressing mode '{}' is not implemented for '{}'",
            mode,
            mnemonic.to_ascii_lowercase()
        ),
    )
}

fn too_wide(value: u32, width: usize) -> CompileError {
    CompileError::new(
        ErrorCode::OperandTooWide,
        format!("Value ${:X} does not fit in {} byte(s)", value, width),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RomConfig;
    use pretty_assertions::assert_eq;

    fn generator() -> CodeGenerator {
        CodeGenerator::new(RomConfig::default().with_size_in_mb(1)).unwrap()
    }

    fn native(generator: &mut CodeGenerator, accumulator_width: FlagState) {
        let status = &mut generator.registers.status;
        status.set_emulation(FlagState::Clear);
        status.set_flag(Flag::AccumulatorWidth, accumulator_width);
    }

    #[test]
    fn test_reorder_bytes() {
        assert_eq!(reorder_bytes(0x1234, 2).unwrap(), vec![0x34, 0x12]);
        assert_eq!(reorder_bytes(0, 3).unwrap(), vec![0, 0, 0]);
        assert_eq!(reorder_bytes(0x7E, 2).unwrap(), vec![0x7E, 0x00]);
        assert_eq!(reorder_bytes(0x7E0200, 3).unwrap(), vec![0x00, 0x02, 0x7E]);
    }

    #[test]
    fn test_reorder_bytes_too_wide() {
        let err = reorder_bytes(0x1234, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::OperandTooWide);
    }

    #[test]
    fn test_assemble_implied() {
        let mut gen = generator();
        gen.assemble_implied("CLC").unwrap();
        assert_eq!(gen.rom.read(0, 1).unwrap(), &[0x18]);
        assert_eq!(gen.rom.current_address(), 1);
        assert_eq!(gen.registers.status.flag(Flag::Carry), FlagState::Clear);
    }

    #[test]
    fn test_assemble_absolute() {
        let mut gen = generator();
        gen.assemble_absolute("sta", 0x2100).unwrap();
        assert_eq!(gen.rom.read(0, 3).unwrap(), &[0x8D, 0x00, 0x21]);
    }

    #[test]
    fn test_assemble_absolute_long() {
        let mut gen = generator();
        gen.assemble_absolute_long("sta", 0x7E, 0x0200).unwrap();
        assert_eq!(gen.rom.read(0, 4).unwrap(), &[0x8F, 0x00, 0x02, 0x7E]);
    }

    #[test]
    fn test_assemble_agrees_with_supported_modes() {
        for mode in AddressMode::ALL {
            let mnemonic = ["lda", "nop", "bra"]
                .into_iter()
                .find(|m| w65c816::lookup(m, mode).is_some())
                .unwrap_or("lda");

            let mut gen = generator();
            gen.registers.status.set_emulation(FlagState::Set);
            let result = gen.assemble(mnemonic, mode, 0);

            assert_eq!(result.is_ok(), mode.is_supported(), "{} in {} mode", mnemonic, mode);
            if let Err(err) = result {
                assert_eq!(err.code, ErrorCode::UnsupportedEncoding);
            }
        }
    }

    #[test]
    fn test_immediate_width_native() {
        let mut gen = generator();
        native(&mut gen, FlagState::Set);
        assert_eq!(gen.immediate_width("lda").unwrap(), 2);

        native(&mut gen, FlagState::Clear);
        assert_eq!(gen.immediate_width("lda").unwrap(), 1);

        gen.registers.x_index = Some(0);
        assert_eq!(gen.immediate_width("lda").unwrap(), 2);
    }

    #[test]
    fn test_immediate_width_emulation() {
        let mut gen = generator();
        gen.registers.status.set_emulation(FlagState::Set);
        gen.registers.status.set_flag(Flag::AccumulatorWidth, FlagState::Set);
        assert_eq!(gen.immediate_width("lda").unwrap(), 1);
    }

    #[test]
    fn test_immediate_width_unknown() {
        let mut gen = generator();
        let err = gen.immediate_width("lda").unwrap_err();
        assert_eq!(err.code, ErrorCode::IndeterminateOperandWidth);

        native(&mut gen, FlagState::Unknown);
        let err = gen.assemble_immediate("lda", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::IndeterminateOperandWidth);
        assert_eq!(gen.rom.current_address(), 0);
    }

    #[test]
    fn test_fixed_width_needs_no_state() {
        let mut gen = generator();
        gen.assemble_immediate("rep", 0x30).unwrap();
        assert_eq!(gen.rom.read(0, 2).unwrap(), &[0xC2, 0x30]);
    }

    #[test]
    fn test_assemble_by_mode() {
        let mut gen = generator();
        gen.assemble("sta", AddressMode::AbsoluteLong, 0x7E0200).unwrap();
        gen.assemble("nop", AddressMode::Implied, 0).unwrap();
        assert_eq!(gen.rom.read(0, 5).unwrap(), &[0x8F, 0x00, 0x02, 0x7E, 0xEA]);

        let err = gen.assemble("sta", AddressMode::Absolute, 0x10000).unwrap_err();
        assert_eq!(err.code, ErrorCode::OperandTooWide);

        let err = gen.assemble("lda", AddressMode::DirectPage, 0x10).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedEncoding);
        assert!(err.message.contains("direct page"));
    }

    #[test]
    fn test_unmapped_pair() {
        let mut gen = generator();
        let err = gen.assemble_absolute("clc", 0x1234).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedEncoding);
        assert_eq!(gen.rom.current_address(), 0);
    }
}
