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

//! Register file as known to the compiler.

use super::status::ProcessorStatus;

/// Tracked register values. `None` means the compiler cannot prove the
/// content at the current emission point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuRegisters {
    pub accumulator: Option<u16>,
    pub x_index: Option<u16>,
    pub y_index: Option<u16>,
    pub stack_pointer: Option<u16>,
    pub program_counter: Option<u16>,
    pub status: ProcessorStatus,
}

impl CpuRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every register and every flag.
    pub fn mark_all_unknown(&mut self) {
        self.accumulator = None;
        self.x_index = None;
        self.y_index = None;
        self.stack_pointer = None;
        self.program_counter = None;
        self.status.mark_all_unknown();
    }
}
