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

//! Output module for the Glorp compiler.
//!
//! This module builds the cartridge image and writes it to disk:
//! - SFC files (the plain image)
//! - SMC files (the image behind a 512-byte copier header)

mod checksum;
pub mod header;
mod rom;

pub use checksum::{ChecksumHook, ChecksumKind, NoChecksum, StandardChecksum};
pub use header::{Destination, RomConfig};
pub use rom::RomImage;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Size of the copier header in front of SMC images.
pub const COPIER_HEADER_SIZE: usize = 512;

/// Determine the output format from a file extension.
pub fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "sfc" => Some(OutputFormat::Sfc),
        "smc" => Some(OutputFormat::Smc),
        _ => None,
    }
}

/// The on-disk format of a cartridge image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The image verbatim.
    Sfc,
    /// A zeroed copier header followed by the image.
    Smc,
}

/// Write an image to a file in the specified format.
pub fn write_output(rom: &RomImage, path: &Path, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Sfc => rom.write(path),
        OutputFormat::Smc => {
            let mut file = File::create(path)?;
            file.write_all(&[0u8; COPIER_HEADER_SIZE])?;
            file.write_all(rom.bytes())?;
            Ok(())
        }
    }
}
