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

//! Per-byte state of the simulated address space.

/// Whether the contents of a location are defined by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupancy {
    /// Nothing is known about the location (power-on state).
    #[default]
    Unknown,
    /// The location is known to hold nothing of interest.
    Empty,
    /// Something was written to the location.
    Filled,
}

/// Whether the concrete byte value of a location is known.
///
/// Independent from [`Occupancy`]: a location touched by DMA or by a store
/// of an untracked register is `Filled` but its value stays `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKnown {
    #[default]
    Unknown,
    Known,
}

/// Status pair stored for every byte of the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellState {
    pub occupancy: Occupancy,
    pub known: ValueKnown,
}

impl CellState {
    /// State of a cell that was explicitly set to a literal.
    pub const WRITTEN: CellState = CellState {
        occupancy: Occupancy::Filled,
        known: ValueKnown::Known,
    };

    /// State of a cell that was written with a value the compiler cannot see.
    pub const CLOBBERED: CellState = CellState {
        occupancy: Occupancy::Filled,
        known: ValueKnown::Unknown,
    };

    pub fn new(occupancy: Occupancy, known: ValueKnown) -> Self {
        Self { occupancy, known }
    }
}

/// A snapshot of one byte of the 24-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCell {
    /// Absolute 24-bit address of the cell.
    pub address: u32,
    /// The stored byte.
    pub value: u8,
    /// Occupancy status.
    pub occupancy: Occupancy,
    /// Whether `value` is meaningful.
    pub known: ValueKnown,
}

impl MemoryCell {
    /// The stored value, if the simulation knows it.
    pub fn known_value(&self) -> Option<u8> {
        match self.known {
            ValueKnown::Known => Some(self.value),
            ValueKnown::Unknown => None,
        }
    }

    pub fn state(&self) -> CellState {
        CellState::new(self.occupancy, self.known)
    }
}
