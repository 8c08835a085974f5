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

//! Compile-time model of the console's 24-bit address space.
//!
//! This module provides:
//! - Byte cells with tri-state occupancy and value knowledge
//! - An arena-backed address space whose mirrors observe shared writes
//! - Named segments (banks, hardware regions) aliasing the same cells
//! - The SNES LoROM mirror wiring

mod cell;
pub mod map;
mod segment;
mod space;

pub use cell::{CellState, MemoryCell, Occupancy, ValueKnown};
pub use segment::Segment;
pub use space::{AddressSpace, MirrorRule};

/// Number of addressable bytes (24-bit bus).
pub const ADDRESS_SPACE_SIZE: usize = 1 << 24;

/// Size of one bank.
pub const BANK_SIZE: usize = 0x10000;

/// Number of banks.
pub const BANK_COUNT: usize = 256;

/// Combine a bank number and a 16-bit offset into an absolute address.
pub fn long_address(bank: u8, offset: u16) -> u32 {
    ((bank as u32) << 16) | offset as u32
}
