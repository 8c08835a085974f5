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

//! Built-in functions.
//!
//! Calls that do not name a user function are looked up in a name-keyed
//! table. Each entry drives the instruction helpers directly.

use super::constants::{WAIT_FLAG_ADDRESS, WAIT_FLAG_BANK};
use super::instructions::InstructionEmitter;
use super::labels::LabelManager;
use super::w65c816::registers::{INIDISP, NMITIMEN};
use super::CodeGenerator;
use crate::error::Result;

/// Signature of a built-in.
pub type BuiltinFn = fn(&mut CodeGenerator) -> Result<()>;

/// Names accepted by [`lookup_builtin`].
pub const BUILTIN_NAMES: &[&str] = &[
    "nop",
    "disable_interrupts",
    "enable_interrupts",
    "clear_carry",
    "set_carry",
    "native_mode",
    "emulated_mode",
    "init",
];

/// Find the emitter for a built-in call.
pub fn lookup_builtin(name: &str) -> Option<BuiltinFn> {
    let builtin: BuiltinFn = match name {
        "nop" => |gen| gen.asm_nop(),
        "disable_interrupts" => |gen| gen.asm_sei(),
        "enable_interrupts" => |gen| gen.asm_cli(),
        "clear_carry" => |gen| gen.asm_clc(),
        "set_carry" => |gen| gen.asm_sec(),
        "native_mode" => |gen| gen.macro_set_mode_native(),
        "emulated_mode" => |gen| gen.macro_set_mode_emulated(),
        "init" => |gen| gen.builtin_init(),
        _ => return None,
    };
    Some(builtin)
}

/// Extension trait for the fixed startup sequence.
pub trait BuiltinEmitter {
    /// Bring the console into a defined state.
    ///
    /// Switches to native mode, blanks the screen, disables NMI and waits
    /// for the flag byte at $7E:0200 before clearing it.
    fn builtin_init(&mut self) -> Result<()>;
}

impl BuiltinEmitter for CodeGenerator {
    fn builtin_init(&mut self) -> Result<()> {
        // Called from inside a function, the init runs as a nested segment.
        let outer = self.segment.take();
        self.start_segment("SNES init");

        self.asm_sei()?;
        self.macro_set_mode_native()?;
        self.asm_rep(0x30)?;
        self.asm_lda_imm_sized(0x0000, 2)?;
        self.asm_sep(0x20)?;

        // forced blank
        self.asm_lda_imm_sized(0x80, 1)?;
        self.asm_sta(INIDISP)?;

        self.asm_lda_imm_sized(0x00, 1)?;
        self.asm_sta(NMITIMEN)?;

        let wait = self.make_label("wait");
        self.define_label(&wait);
        self.asm_lda_long(WAIT_FLAG_BANK, WAIT_FLAG_ADDRESS)?;
        self.branch("beq", &wait)?;
        self.asm_lda_imm_sized(0x00, 1)?;
        self.asm_sta_long(WAIT_FLAG_BANK, WAIT_FLAG_ADDRESS)?;

        self.end_segment();
        self.segment = outer;
        Ok(())
    }
}
