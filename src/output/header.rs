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

//! Cartridge header layout and configuration.
//!
//! Offsets are image offsets for the "LoROM, fast" format: the header sits
//! in the last 64 bytes of the first 32KiB bank.

/// Start of the header.
pub const HEADER_OFFSET: usize = 0x7FC0;

/// Title, 21 bytes.
pub const TITLE_OFFSET: usize = 0x7FC0;
pub const TITLE_LEN: usize = 21;

pub const MAP_MODE_OFFSET: usize = 0x7FD5;
pub const CARTRIDGE_TYPE_OFFSET: usize = 0x7FD6;
pub const ROM_SIZE_OFFSET: usize = 0x7FD7;
pub const SRAM_SIZE_OFFSET: usize = 0x7FD8;
pub const DESTINATION_OFFSET: usize = 0x7FD9;

/// Byte with a value mandated by the format.
pub const FIXED_VALUE_OFFSET: usize = 0x7FDA;
pub const FIXED_VALUE: u8 = 33;

pub const VERSION_OFFSET: usize = 0x7FDB;
pub const CHECKSUM_COMPLEMENT_OFFSET: usize = 0x7FDC;
pub const CHECKSUM_OFFSET: usize = 0x7FDE;

/// Emulation-mode reset vector.
pub const RESET_VECTOR_OFFSET: usize = 0x7FFC;

/// LoROM with fast (3.58MHz) ROM access.
pub const MAP_MODE_LOROM_FAST: u8 = 0x30;

/// The smallest image that can hold the header and vectors.
pub const MIN_IMAGE_SIZE: usize = 0x8000;

/// Destination code written to the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Japan,
    #[default]
    NorthAmerica,
    Europe,
}

impl Destination {
    pub fn code(self) -> u8 {
        match self {
            Destination::Japan => 0x00,
            Destination::NorthAmerica => 0x01,
            Destination::Europe => 0x02,
        }
    }
}

/// Cartridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomConfig {
    /// Game title. Truncated to 21 bytes and padded with spaces.
    pub title: String,
    /// Total image size in megabytes.
    pub size_in_mb: usize,
    pub destination: Destination,
    /// ROM, RAM, battery ("battery backed save") by default.
    pub cartridge_type: u8,
    /// log2 of the SRAM size in KiB.
    pub sram_size: u8,
    pub version: u8,
}

impl Default for RomConfig {
    fn default() -> Self {
        Self {
            title: "GLORP".to_string(),
            size_in_mb: 4,
            destination: Destination::NorthAmerica,
            cartridge_type: 0x02,
            sram_size: 0x07,
            version: 0,
        }
    }
}

impl RomConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size_in_mb(mut self, size_in_mb: usize) -> Self {
        self.size_in_mb = size_in_mb;
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn with_sram_size(mut self, sram_size: u8) -> Self {
        self.sram_size = sram_size;
        self
    }

    /// Image size in bytes.
    pub fn image_size(&self) -> usize {
        self.size_in_mb * 1024 * 1024
    }

    /// Title bytes as stored in the header.
    ///
    /// Non-ASCII characters are replaced with `?`.
    pub fn title_bytes(&self) -> [u8; TITLE_LEN] {
        let mut out = [b' '; TITLE_LEN];
        for (slot, ch) in out.iter_mut().zip(self.title.chars()) {
            *slot = if ch.is_ascii() && !ch.is_ascii_control() {
                ch as u8
            } else {
                b'?'
            };
        }
        out
    }

    /// ROM size byte: log2 of the image size in KiB.
    ///
    /// Sizes between powers of two round up, so a 3 MB image reports the
    /// 4 MB chip it has to be mapped as.
    pub fn rom_size_code(&self) -> u8 {
        let kib = (self.image_size() / 1024).max(1);
        kib.next_power_of_two().trailing_zeros() as u8
    }
}
