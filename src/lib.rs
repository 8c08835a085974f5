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

//! Glorp Compiler Library
//!
//! This library turns the declaration tree produced by the Glorp front end
//! into a LoROM cartridge image for the Super Nintendo.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`ast`] - Declaration tree handed over by the front end
//! - [`memory`] - The 24-bit address space with its mirrors
//! - [`cpu`] - Tracked processor state
//! - [`codegen`] - W65C816 machine code generation
//! - [`output`] - Cartridge image, header and SFC/SMC writing
//!
//! # Example
//!
//! ```no_run
//! use glorp::ast::{FunctionCall, FunctionDef, Program};
//! use glorp::output::{self, OutputFormat};
//! use glorp::CompileOptions;
//! use std::path::Path;
//!
//! fn build(output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut program = Program::new();
//!     program.add_item(FunctionDef::new("main", 1).with(FunctionCall::new("nop")));
//!
//!     let rom = glorp::compile(&program, &CompileOptions::default())?;
//!     output::write_output(&rom, output_path, OutputFormat::Sfc)?;
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod codegen;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod output;

// Re-export commonly used types
pub use ast::Program;
pub use error::{format_error, CompileError, ErrorCode, Result, SourceLocation};
pub use output::{ChecksumKind, RomConfig, RomImage};

/// The version of the Glorp compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "Glorp";

/// Settings for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Header fields and image size.
    pub rom: RomConfig,
    /// Checksum written when the image is finalized.
    pub checksum: ChecksumKind,
}

impl CompileOptions {
    pub fn with_rom(mut self, rom: RomConfig) -> Self {
        self.rom = rom;
        self
    }

    pub fn with_checksum(mut self, checksum: ChecksumKind) -> Self {
        self.checksum = checksum;
        self
    }
}

/// Compile a program into a cartridge image.
///
/// This is the main entry point. It writes the header and the reset vector,
/// emits the startup sequence, lowers the program and resolves all labels.
/// On error no image is returned.
///
/// # Example
///
/// ```no_run
/// use glorp::ast::{FunctionCall, Program};
///
/// let mut program = Program::new();
/// program.add_item(FunctionCall::new("native_mode"));
///
/// match glorp::compile(&program, &glorp::CompileOptions::default()) {
///     Ok(rom) => println!("Built a {} byte image", rom.len()),
///     Err(e) => eprintln!("Compilation error: {}", e),
/// }
/// ```
pub fn compile(program: &Program, options: &CompileOptions) -> Result<RomImage> {
    codegen::generate(program, options)
}
