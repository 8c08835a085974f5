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

//! The cartridge image.
//!
//! A fixed-size buffer with an occupancy bitmap. Every byte may be written
//! once; a second write to an occupied byte is a [`ErrorCode::WriteCollision`]
//! unless the caller explicitly asks to overwrite.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use bitvec::prelude::*;
use tracing::debug;

use super::checksum::ChecksumHook;
use super::header::*;
use crate::error::{CompileError, ErrorCode, Result};

/// A LoROM ("fast") cartridge image under construction.
#[derive(Debug, Clone)]
pub struct RomImage {
    bytes: Vec<u8>,
    occupied: BitVec,
    current_address: usize,
    config: RomConfig,
}

impl RomImage {
    /// Create a blank image and populate its header.
    pub fn new(config: RomConfig) -> Result<Self> {
        let size = config.image_size();
        if size < MIN_IMAGE_SIZE {
            return Err(CompileError::new(
                ErrorCode::ImageTooSmall,
                format!(
                    "A LoROM image needs at least ${:X} bytes, got ${:X}",
                    MIN_IMAGE_SIZE, size
                ),
            )
            .with_hint("Use a size of at least 1 MB"));
        }

        let mut rom = Self {
            bytes: vec![0; size],
            occupied: bitvec![0; size],
            current_address: 0,
            config,
        };
        rom.write_header()?;
        Ok(rom)
    }

    fn write_header(&mut self) -> Result<()> {
        let config = self.config.clone();

        self.inject_direct(FIXED_VALUE_OFFSET, &[FIXED_VALUE], true)?;
        self.inject_direct(TITLE_OFFSET, &config.title_bytes(), true)?;
        self.inject_direct(MAP_MODE_OFFSET, &[MAP_MODE_LOROM_FAST], true)?;
        self.inject_direct(CARTRIDGE_TYPE_OFFSET, &[config.cartridge_type], true)?;
        self.inject_direct(ROM_SIZE_OFFSET, &[config.rom_size_code()], true)?;
        self.inject_direct(SRAM_SIZE_OFFSET, &[config.sram_size], true)?;
        self.inject_direct(DESTINATION_OFFSET, &[config.destination.code()], true)?;
        self.inject_direct(VERSION_OFFSET, &[config.version], true)?;

        // Reserved until finalize; nothing else may be placed here.
        self.inject_direct(CHECKSUM_COMPLEMENT_OFFSET, &[0x00; 4], true)?;

        debug!(
            title = %config.title,
            size = self.bytes.len(),
            rom_size = config.rom_size_code(),
            "header populated"
        );
        Ok(())
    }

    pub fn config(&self) -> &RomConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The complete image.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read `len` bytes starting at `address`.
    pub fn read(&self, address: usize, len: usize) -> Result<&[u8]> {
        self.check_range(address, len)?;
        Ok(&self.bytes[address..address + len])
    }

    pub fn is_occupied(&self, address: usize) -> bool {
        self.occupied.get(address).map(|bit| *bit).unwrap_or(false)
    }

    /// Number of occupied bytes.
    pub fn occupied_count(&self) -> usize {
        self.occupied.count_ones()
    }

    /// The write cursor used by [`RomImage::inject_next`].
    pub fn current_address(&self) -> usize {
        self.current_address
    }

    pub fn set_current_address(&mut self, address: usize) {
        self.current_address = address;
    }

    /// Write `values` starting at `address`.
    ///
    /// With `only_if_empty` the write fails before touching anything if any
    /// target byte is already occupied.
    pub fn inject_direct(&mut self, address: usize, values: &[u8], only_if_empty: bool) -> Result<()> {
        self.check_range(address, values.len())?;

        if only_if_empty {
            if let Some(pos) = self.occupied[address..address + values.len()].first_one() {
                return Err(CompileError::new(
                    ErrorCode::WriteCollision,
                    format!(
                        "Tried to write to occupied address ${:06X}",
                        address + pos
                    ),
                ));
            }
        }

        self.bytes[address..address + values.len()].copy_from_slice(values);
        self.occupied[address..address + values.len()].fill(true);
        Ok(())
    }

    /// Write `values` at the cursor and advance it.
    pub fn inject_next(&mut self, values: &[u8]) -> Result<()> {
        self.inject_direct(self.current_address, values, true)?;
        self.current_address += values.len();
        Ok(())
    }

    /// Apply the checksum hook to the reserved header fields.
    pub fn finalize(&mut self, hook: &dyn ChecksumHook) -> Result<()> {
        if let Some(checksum) = hook.checksum(&self.bytes) {
            let complement = !checksum;
            self.inject_direct(CHECKSUM_COMPLEMENT_OFFSET, &complement.to_le_bytes(), false)?;
            self.inject_direct(CHECKSUM_OFFSET, &checksum.to_le_bytes(), false)?;
            debug!(checksum, complement, "checksum written");
        }
        Ok(())
    }

    /// Write the image verbatim to a file.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(&self.bytes)?;
        Ok(())
    }

    fn check_range(&self, address: usize, len: usize) -> Result<()> {
        let end = address.checked_add(len);
        match end {
            Some(end) if end <= self.bytes.len() => Ok(()),
            _ => Err(CompileError::address_out_of_bounds(
                address.saturating_add(len).saturating_sub(1),
                "rom",
                self.bytes.len(),
            )),
        }
    }
}
