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

//! SNES (LoROM) memory map.
//!
//! Wires the console's known address aliases into an [`AddressSpace`]:
//!
//! | Offsets       | Banks                         |
//! |---------------|-------------------------------|
//! | `0000-1FFF`   | `00-3F`, `80-BF`, `7E`        |
//! | `2000-7FFF`   | `00-3F`, `80-BF`              |
//! | `0000-FFFF`   | `7E` and `7F`                 |
//! | `8000-FFFF`   | `b` and `b+80` for `b` in `00-3F` |
//! | `0000-FFFF`   | `b` and `b+80` for `b` in `40-7D` |

use super::segment::Segment;
use super::space::AddressSpace;

/// A named hardware region inside the system banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub offset: u32,
    pub len: u32,
}

/// Regions present at the same offsets of every system bank.
pub const SYSTEM_REGIONS: [Region; 6] = [
    Region { name: "lowram", offset: 0x0000, len: 0x2000 },
    Region { name: "ppu_apu", offset: 0x2000, len: 0x2000 },
    Region { name: "controller", offset: 0x4000, len: 0x0200 },
    Region { name: "cpu_dma", offset: 0x4200, len: 0x1E00 },
    Region { name: "expansion", offset: 0x6000, len: 0x2000 },
    Region { name: "rom_window", offset: 0x8000, len: 0x8000 },
];

/// First bank of work RAM.
pub const WRAM_LOW_BANK: u8 = 0x7E;

/// Second bank of work RAM.
pub const WRAM_HIGH_BANK: u8 = 0x7F;

/// Banks `00-3F` followed by `80-BF`.
pub fn system_banks() -> impl Iterator<Item = u8> {
    (0x00..=0x3Fu8).chain(0x80..=0xBFu8)
}

impl AddressSpace {
    /// Create the address space of the console with all mirrors wired.
    pub fn snes() -> Self {
        let mut space = AddressSpace::new();

        // Low WRAM shows up in every system bank.
        space.link_banks(0x0000..0x2000, system_banks().chain([WRAM_LOW_BANK]));

        // PPU/APU, controller, DMA and expansion windows.
        space.link_banks(0x2000..0x8000, system_banks());

        space.link_banks(0x0000..0x10000, [WRAM_LOW_BANK, WRAM_HIGH_BANK]);

        for bank in 0x00..=0x3Fu8 {
            space.link_banks(0x8000..0x10000, [bank, bank | 0x80]);
        }
        for bank in 0x40..=0x7Du8 {
            space.link_banks(0x0000..0x10000, [bank, bank | 0x80]);
        }

        let root = space.root();
        for region in SYSTEM_REGIONS {
            space.register_segment(Segment::new(region.name, region.offset, region.len));
        }
        for bank in 0..=0xFFu8 {
            let segment = space.bank(bank);
            space.register_segment(segment);
        }
        space.register_segment(Segment::new(
            "wram_low",
            (WRAM_LOW_BANK as u32) << 16,
            0x10000,
        ));
        space.register_segment(Segment::new(
            "wram_high",
            (WRAM_HIGH_BANK as u32) << 16,
            0x10000,
        ));
        space.register_segment(root);

        space
    }
}
