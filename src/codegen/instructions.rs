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

//! Named instruction helpers and the mode switch macros.

use super::emit::EmitHelpers;
use super::CodeGenerator;
use crate::error::Result;

/// Extension trait with one method per instruction used by the backend.
pub trait InstructionEmitter {
    fn asm_clc(&mut self) -> Result<()>;
    fn asm_sec(&mut self) -> Result<()>;
    fn asm_cli(&mut self) -> Result<()>;
    fn asm_sei(&mut self) -> Result<()>;
    fn asm_nop(&mut self) -> Result<()>;
    fn asm_rtl(&mut self) -> Result<()>;

    /// Exchange carry and emulation.
    fn asm_xce(&mut self) -> Result<()>;

    /// Clear the status bits selected by `mask`.
    fn asm_rep(&mut self, mask: u8) -> Result<()>;

    /// Set the status bits selected by `mask`.
    fn asm_sep(&mut self, mask: u8) -> Result<()>;

    /// Load the accumulator, width from the tracked state.
    fn asm_lda_imm(&mut self, value: u16) -> Result<()>;

    /// Load the accumulator with an explicit operand width.
    fn asm_lda_imm_sized(&mut self, value: u16, width: usize) -> Result<()>;

    fn asm_lda_long(&mut self, bank: u8, address: u16) -> Result<()>;
    fn asm_sta(&mut self, address: u16) -> Result<()>;
    fn asm_sta_long(&mut self, bank: u8, address: u16) -> Result<()>;

    /// `clc; xce`
    fn macro_set_mode_native(&mut self) -> Result<()>;

    /// `sec; xce`
    fn macro_set_mode_emulated(&mut self) -> Result<()>;
}

impl InstructionEmitter for CodeGenerator {
    fn asm_clc(&mut self) -> Result<()> {
        self.assemble_implied("clc")
    }

    fn asm_sec(&mut self) -> Result<()> {
        self.assemble_implied("sec")
    }

    fn asm_cli(&mut self) -> Result<()> {
        self.assemble_implied("cli")
    }

    fn asm_sei(&mut self) -> Result<()> {
        self.assemble_implied("sei")
    }

    fn asm_nop(&mut self) -> Result<()> {
        self.assemble_implied("nop")
    }

    fn asm_rtl(&mut self) -> Result<()> {
        self.assemble_implied("rtl")
    }

    fn asm_xce(&mut self) -> Result<()> {
        self.assemble_implied("xce")
    }

    fn asm_rep(&mut self, mask: u8) -> Result<()> {
        self.assemble_immediate("rep", u32::from(mask))
    }

    fn asm_sep(&mut self, mask: u8) -> Result<()> {
        self.assemble_immediate("sep", u32::from(mask))
    }

    fn asm_lda_imm(&mut self, value: u16) -> Result<()> {
        self.assemble_immediate("lda", u32::from(value))
    }

    fn asm_lda_imm_sized(&mut self, value: u16, width: usize) -> Result<()> {
        self.assemble_immediate_sized("lda", u32::from(value), width)
    }

    fn asm_lda_long(&mut self, bank: u8, address: u16) -> Result<()> {
        self.assemble_absolute_long("lda", bank, address)
    }

    fn asm_sta(&mut self, address: u16) -> Result<()> {
        self.assemble_absolute("sta", address)
    }

    fn asm_sta_long(&mut self, bank: u8, address: u16) -> Result<()> {
        self.assemble_absolute_long("sta", bank, address)
    }

    fn macro_set_mode_native(&mut self) -> Result<()> {
        self.asm_clc()?;
        self.asm_xce()
    }

    fn macro_set_mode_emulated(&mut self) -> Result<()> {
        self.asm_sec()?;
        self.asm_xce()
    }
}
