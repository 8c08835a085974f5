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

//! Code generation module for the Glorp compiler.
//!
//! This module generates W65C816 machine code from the declaration tree.
//! It handles:
//! - Instruction encoding
//! - Processor state tracking for operand widths
//! - Labels, branches and long jumps
//! - Built-in functions and the startup sequence
//!
//! The implementation is split across multiple submodules for maintainability:
//! - `constants`: LoROM layout constants
//! - `w65c816`: Opcodes and addressing modes
//! - `emit`: Assembly routines
//! - `tracking`: Instruction side effects
//! - `labels`: Label management and resolution
//! - `instructions`: Named instruction helpers and mode macros
//! - `builtins`: Built-in function table and init sequence
//! - `lower`: Lowering of the declaration tree

pub mod builtins;
pub mod constants;
pub mod emit;
pub mod instructions;
pub mod labels;
pub mod lower;
pub mod tracking;
pub mod w65c816;

pub use builtins::BuiltinEmitter;
pub use emit::{reorder_bytes, EmitHelpers};
pub use instructions::InstructionEmitter;
pub use labels::{LabelManager, PendingBranch, PendingJump};
pub use lower::ProgramLowering;
pub use tracking::StateTracking;
pub use w65c816::AddressMode;

use std::collections::HashMap;

use tracing::debug;

use crate::ast::Program;
use crate::cpu::CpuRegisters;
use crate::error::{Result, SourceLocation};
use crate::memory::AddressSpace;
use crate::output::header::RESET_VECTOR_OFFSET;
use crate::output::{ChecksumHook, RomConfig, RomImage};
use crate::CompileOptions;
use constants::{CODE_START, RESET_ADDRESS};

/// The code generator for the W65C816 CPU.
///
/// Owns the image under construction together with everything the compiler
/// knows about the machine at the current emission point.
#[derive(Debug)]
pub struct CodeGenerator {
    /// The image being built.
    rom: RomImage,
    /// Tracked registers and flags.
    registers: CpuRegisters,
    /// Compile-time model of the address space.
    memory: AddressSpace,
    /// Label offsets (resolved).
    labels: HashMap<String, usize>,
    /// Pending branches to resolve.
    pending_branches: Vec<PendingBranch>,
    /// Pending long jumps to resolve.
    pending_jumps: Vec<PendingJump>,
    /// Label counter for generating unique labels.
    label_counter: u32,
    /// User functions and where they were defined.
    functions: HashMap<String, Option<SourceLocation>>,
    /// Name of the open code segment.
    segment: Option<String>,
}

impl CodeGenerator {
    /// Create a new code generator around a fresh image.
    pub fn new(config: RomConfig) -> Result<Self> {
        Ok(Self {
            rom: RomImage::new(config)?,
            registers: CpuRegisters::new(),
            memory: AddressSpace::snes(),
            labels: HashMap::new(),
            pending_branches: Vec::new(),
            pending_jumps: Vec::new(),
            label_counter: 0,
            functions: HashMap::new(),
            segment: None,
        })
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    pub fn registers(&self) -> &CpuRegisters {
        &self.registers
    }

    /// Mutable access to the tracked state, e.g. to seed a known mode.
    pub fn registers_mut(&mut self) -> &mut CpuRegisters {
        &mut self.registers
    }

    pub fn memory(&self) -> &AddressSpace {
        &self.memory
    }

    /// Image offset of the next emitted byte.
    pub fn current_address(&self) -> usize {
        self.rom.current_address()
    }

    pub fn set_current_address(&mut self, address: usize) {
        self.rom.set_current_address(address);
    }

    /// Name of the open code segment, if any.
    pub fn current_segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    /// Begin a code segment.
    ///
    /// Control may arrive here from anywhere, so every tracked register and
    /// flag is forgotten.
    pub fn start_segment(&mut self, name: &str) {
        debug!(segment = name, offset = self.rom.current_address(), "segment start");
        self.registers.mark_all_unknown();
        self.segment = Some(name.to_string());
    }

    /// End the open code segment.
    pub fn end_segment(&mut self) {
        if let Some(name) = self.segment.take() {
            debug!(segment = %name, offset = self.rom.current_address(), "segment end");
        }
    }

    /// Point the reset vector at the start of code.
    pub fn write_reset_vector(&mut self) -> Result<()> {
        self.rom
            .inject_direct(RESET_VECTOR_OFFSET, &RESET_ADDRESS.to_le_bytes(), true)
    }

    /// Resolve labels, apply the checksum hook and hand out the image.
    pub fn finish(mut self, hook: &dyn ChecksumHook) -> Result<RomImage> {
        self.resolve_labels()?;
        self.rom.finalize(hook)?;
        Ok(self.rom)
    }
}

/// Generate a complete cartridge image for a program.
pub fn generate(program: &Program, options: &CompileOptions) -> Result<RomImage> {
    let mut generator = CodeGenerator::new(options.rom.clone())?;
    generator.write_reset_vector()?;
    generator.set_current_address(CODE_START);
    generator.builtin_init()?;
    generator.lower_program(program)?;
    generator.finish(options.checksum.hook())
}
