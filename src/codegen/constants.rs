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

//! Memory layout constants for LoROM images.
//!
//! This module defines where code is placed and how image offsets map to
//! CPU addresses.

/// Size of the ROM window in each LoROM bank.
pub const LOROM_BANK_SIZE: usize = 0x8000;

/// CPU address of the first byte of each LoROM bank window.
pub const LOROM_WINDOW_START: u16 = 0x8000;

/// Banks `80-FF` are the fast-ROM mirrors of banks `00-7F`.
pub const FASTROM_BANK_BASE: u8 = 0x80;

/// Image offset the code starts at ($00:8000).
pub const CODE_START: usize = 0x0000;

/// Value stored in the reset vector (points at `CODE_START`).
pub const RESET_ADDRESS: u16 = 0x8000;

/// Work RAM byte the init sequence waits on.
pub const WAIT_FLAG_ADDRESS: u16 = 0x0200;
pub const WAIT_FLAG_BANK: u8 = 0x7E;

/// Translate an image offset into a (bank, address) pair in the slow-ROM
/// banks.
pub fn lorom_address(offset: usize) -> (u8, u16) {
    let bank = (offset / LOROM_BANK_SIZE) as u8;
    let address = LOROM_WINDOW_START + (offset % LOROM_BANK_SIZE) as u16;
    (bank, address)
}

/// Same as [`lorom_address`] but in the fast-ROM mirror.
pub fn fastrom_address(offset: usize) -> (u8, u16) {
    let (bank, address) = lorom_address(offset);
    (bank | FASTROM_BANK_BASE, address)
}
