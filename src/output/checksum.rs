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

//! Checksum hooks applied when an image is finalized.

use super::header::{CHECKSUM_COMPLEMENT_OFFSET, CHECKSUM_OFFSET};

/// Computes the value stored in the header checksum field.
///
/// Returning `None` leaves the reserved checksum bytes as they are.
pub trait ChecksumHook {
    fn checksum(&self, image: &[u8]) -> Option<u16>;
}

/// Leaves the checksum fields untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChecksum;

impl ChecksumHook for NoChecksum {
    fn checksum(&self, _image: &[u8]) -> Option<u16> {
        None
    }
}

/// 16-bit sum of all bytes, computed with the complement field seeded as
/// `FFFF` and the checksum field as `0000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChecksum;

impl ChecksumHook for StandardChecksum {
    fn checksum(&self, image: &[u8]) -> Option<u16> {
        const SEED: [u8; 4] = [0xFF, 0xFF, 0x00, 0x00];

        let sum = image
            .iter()
            .enumerate()
            .fold(0u16, |sum, (offset, &byte)| {
                let byte = if (CHECKSUM_COMPLEMENT_OFFSET..CHECKSUM_OFFSET + 2).contains(&offset) {
                    SEED[offset - CHECKSUM_COMPLEMENT_OFFSET]
                } else {
                    byte
                };
                sum.wrapping_add(byte as u16)
            });
        Some(sum)
    }
}

/// Selects the hook used by [`crate::compile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumKind {
    #[default]
    None,
    Standard,
}

impl ChecksumKind {
    pub fn hook(self) -> &'static dyn ChecksumHook {
        match self {
            ChecksumKind::None => &NoChecksum,
            ChecksumKind::Standard => &StandardChecksum,
        }
    }
}
