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

//! Label and branch management for code generation.
//!
//! This module handles:
//! - Pending branches (8-bit program counter relative)
//! - Pending long jumps (24-bit, into the fast-ROM mirror)
//! - LabelManager trait for label creation and resolution

use tracing::debug;

use super::constants::fastrom_address;
use super::emit::EmitHelpers;
use super::tracking::{Operand, StateTracking};
use super::w65c816::{self, AddressMode};
use super::CodeGenerator;
use crate::error::{CompileError, ErrorCode, Result};

/// A pending branch that needs its target resolved.
#[derive(Debug, Clone)]
pub struct PendingBranch {
    /// Image offset of the displacement byte.
    pub code_offset: usize,
    /// Label this branch should jump to.
    pub target_label: String,
}

/// A pending long jump or call that needs its target resolved.
#[derive(Debug, Clone)]
pub struct PendingJump {
    /// Image offset of the first address byte.
    pub code_offset: usize,
    /// Label this jump should jump to.
    pub target_label: String,
}

/// Extension trait for label management.
///
/// Labels bind to image offsets. Branches and jumps are emitted with
/// placeholder operands and patched by [`LabelManager::resolve_labels`].
pub trait LabelManager {
    /// Generate a unique label with the given prefix.
    fn make_label(&mut self, prefix: &str) -> String;

    /// Define a label at the current image offset.
    fn define_label(&mut self, name: &str);

    /// Image offset of a defined label.
    fn label_address(&self, name: &str) -> Option<usize>;

    /// Emit a relative branch to `label`.
    fn branch(&mut self, mnemonic: &str, label: &str) -> Result<()>;

    /// Emit a long jump or call to `label`.
    fn jump_long(&mut self, mnemonic: &str, label: &str) -> Result<()>;

    /// Resolve all pending branches and jumps.
    fn resolve_labels(&mut self) -> Result<()>;
}

impl LabelManager for CodeGenerator {
    fn make_label(&mut self, prefix: &str) -> String {
        // The leading dot keeps internal labels apart from function names.
        let label = format!(".{}_{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    fn define_label(&mut self, name: &str) {
        self.labels
            .insert(name.to_string(), self.rom.current_address());
    }

    fn label_address(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    fn branch(&mut self, mnemonic: &str, label: &str) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::ProgramCounterRelative)?;

        let offset = self.rom.current_address();
        self.place(&mnemonic, AddressMode::ProgramCounterRelative, &[opcode, 0x00])?;
        self.pending_branches.push(PendingBranch {
            code_offset: offset + 1,
            target_label: label.to_string(),
        });
        Ok(())
    }

    fn jump_long(&mut self, mnemonic: &str, label: &str) -> Result<()> {
        let mnemonic = mnemonic.to_ascii_lowercase();
        let opcode = w65c816::opcode(&mnemonic, AddressMode::AbsoluteLong)?;

        let offset = self.rom.current_address();
        self.place(&mnemonic, AddressMode::AbsoluteLong, &[opcode, 0x00, 0x00, 0x00])?;
        self.pending_jumps.push(PendingJump {
            code_offset: offset + 1,
            target_label: label.to_string(),
        });
        self.apply_side_effects(&mnemonic, Operand::None)
    }

    fn resolve_labels(&mut self) -> Result<()> {
        for branch in &self.pending_branches {
            let target = lookup(&self.labels, &branch.target_label)?;

            // Relative to the byte after the displacement.
            let displacement = target as i64 - (branch.code_offset as i64 + 1);
            if !(-128..=127).contains(&displacement) {
                return Err(CompileError::new(
                    ErrorCode::BranchOutOfRange,
                    format!(
                        "Branch to '{}' is {} bytes away (allowed: -128 to 127)",
                        branch.target_label, displacement
                    ),
                ));
            }

            self.rom
                .inject_direct(branch.code_offset, &[displacement as i8 as u8], false)?;
        }

        for jump in &self.pending_jumps {
            let target = lookup(&self.labels, &jump.target_label)?;
            let (bank, address) = fastrom_address(target);
            let [lo, hi] = address.to_le_bytes();
            self.rom.inject_direct(jump.code_offset, &[lo, hi, bank], false)?;
        }

        debug!(
            labels = self.labels.len(),
            branches = self.pending_branches.len(),
            jumps = self.pending_jumps.len(),
            "labels resolved"
        );
        self.pending_branches.clear();
        self.pending_jumps.clear();
        Ok(())
    }
}

fn lookup(labels: &std::collections::HashMap<String, usize>, name: &str) -> Result<usize> {
    labels.get(name).copied().ok_or_else(|| {
        CompileError::new(ErrorCode::UndefinedLabel, format!("Undefined label '{}'", name))
    })
}
