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

//! The flat 24-bit address space with mirror wiring.
//!
//! Cells live in one arena indexed by their absolute address. The mirror
//! relation is an adjacency list of addresses with two sources:
//!
//! - [`MirrorRule`]s, which link the same bank offsets across an ordered
//!   list of banks neighbour-to-neighbour (bank `n` is adjacent to the banks
//!   right before and after it in the list)
//! - explicit edges registered with [`AddressSpace::add_mirror`]
//!
//! A write walks the mirror graph breadth-first with a visited set, so
//! cycles of any length are applied exactly once per cell.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::Range;

use tracing::trace;

use super::cell::{CellState, MemoryCell, Occupancy, ValueKnown};
use super::segment::Segment;
use super::{ADDRESS_SPACE_SIZE, BANK_COUNT, BANK_SIZE};
use crate::error::{CompileError, Result};

/// Links the bytes at `offsets` of every bank in `banks` as mirrors.
#[derive(Debug, Clone)]
pub struct MirrorRule {
    offsets: Range<u32>,
    banks: Vec<u8>,
    /// Position of each bank number inside `banks`.
    positions: Vec<Option<usize>>,
}

impl MirrorRule {
    /// Create a rule for the bank-relative `offsets` of `banks`.
    ///
    /// Duplicate banks are ignored; the first occurrence fixes the order.
    pub fn new(offsets: Range<u32>, banks: impl IntoIterator<Item = u8>) -> Self {
        let mut ordered = Vec::new();
        let mut positions = vec![None; BANK_COUNT];
        for bank in banks {
            if positions[bank as usize].is_none() {
                positions[bank as usize] = Some(ordered.len());
                ordered.push(bank);
            }
        }

        Self {
            offsets,
            banks: ordered,
            positions,
        }
    }

    pub fn offsets(&self) -> &Range<u32> {
        &self.offsets
    }

    pub fn banks(&self) -> &[u8] {
        &self.banks
    }

    fn push_neighbours(&self, address: u32, out: &mut Vec<u32>) {
        let bank = (address >> 16) as usize;
        let offset = address & 0xFFFF;
        if !self.offsets.contains(&offset) {
            return;
        }

        if let Some(pos) = self.positions[bank] {
            if pos > 0 {
                out.push(((self.banks[pos - 1] as u32) << 16) | offset);
            }
            if let Some(next) = self.banks.get(pos + 1) {
                out.push(((*next as u32) << 16) | offset);
            }
        }
    }
}

/// The simulated 24-bit address space.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    values: Vec<u8>,
    states: Vec<CellState>,
    rules: Vec<MirrorRule>,
    edges: HashMap<u32, Vec<u32>>,
    segments: HashMap<String, Segment>,
}

impl AddressSpace {
    /// Create an address space with no mirrors and no named segments.
    pub fn new() -> Self {
        Self {
            values: vec![0; ADDRESS_SPACE_SIZE],
            states: vec![CellState::default(); ADDRESS_SPACE_SIZE],
            rules: Vec::new(),
            edges: HashMap::new(),
            segments: HashMap::new(),
        }
    }

    /// A segment spanning the complete address space.
    pub fn root(&self) -> Segment {
        Segment::new("system", 0, ADDRESS_SPACE_SIZE as u32)
    }

    /// A segment spanning one 64KiB bank.
    pub fn bank(&self, bank: u8) -> Segment {
        Segment::new(
            format!("bank_{:02x}", bank),
            (bank as u32) << 16,
            BANK_SIZE as u32,
        )
    }

    /// Register a named segment so it can be looked up later.
    pub fn register_segment(&mut self, segment: Segment) {
        self.segments.insert(segment.name().to_string(), segment);
    }

    /// Look up a named segment.
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.get(name)
    }

    /// Link the same offsets across `banks`, neighbour to neighbour.
    pub fn link_banks(&mut self, offsets: Range<u32>, banks: impl IntoIterator<Item = u8>) {
        self.rules.push(MirrorRule::new(offsets, banks));
    }

    /// Register a symmetric mirror between two cells.
    ///
    /// Linking a cell with itself is a no-op.
    pub fn add_mirror(&mut self, a: u32, b: u32) -> Result<()> {
        check_address(a)?;
        check_address(b)?;
        if a == b {
            return Ok(());
        }

        for (from, to) in [(a, b), (b, a)] {
            let list = self.edges.entry(from).or_default();
            if !list.contains(&to) {
                list.push(to);
            }
        }
        Ok(())
    }

    /// Direct mirror neighbours of a cell.
    pub fn mirrors(&self, address: u32) -> Result<Vec<u32>> {
        check_address(address)?;
        let mut out = Vec::new();
        self.push_neighbours(address, &mut out);
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    /// Every cell that observes writes to `address`, including itself.
    pub fn mirror_group(&self, address: u32) -> Result<Vec<u32>> {
        check_address(address)?;
        let mut group: Vec<u32> = self.walk(address).into_iter().collect();
        group.sort_unstable();
        Ok(group)
    }

    /// Read the full state of one byte.
    pub fn get_byte(&self, address: u32) -> Result<MemoryCell> {
        check_address(address)?;
        let state = self.states[address as usize];
        Ok(MemoryCell {
            address,
            value: self.values[address as usize],
            occupancy: state.occupancy,
            known: state.known,
        })
    }

    /// Read the raw value of one byte.
    pub fn get_value(&self, address: u32) -> Result<u8> {
        check_address(address)?;
        Ok(self.values[address as usize])
    }

    /// Write a literal byte, marking the cell and all its mirrors as
    /// filled with a known value.
    pub fn set_value(&mut self, address: u32, value: i32) -> Result<()> {
        let byte = u8::try_from(value).map_err(|_| CompileError::out_of_range(value as i64))?;
        check_address(address)?;

        for cell in self.walk(address) {
            self.values[cell as usize] = byte;
            self.states[cell as usize] = CellState::WRITTEN;
        }
        trace!(address, value = byte, "memory write");
        Ok(())
    }

    /// Change the status of a cell and all its mirrors, keeping the value.
    pub fn set_status(&mut self, address: u32, occupancy: Occupancy, known: ValueKnown) -> Result<()> {
        check_address(address)?;

        let state = CellState::new(occupancy, known);
        for cell in self.walk(address) {
            self.states[cell as usize] = state;
        }
        Ok(())
    }

    fn push_neighbours(&self, address: u32, out: &mut Vec<u32>) {
        for rule in &self.rules {
            rule.push_neighbours(address, out);
        }
        if let Some(list) = self.edges.get(&address) {
            out.extend_from_slice(list);
        }
    }

    /// Breadth-first walk of the mirror graph starting at `start`.
    fn walk(&self, start: u32) -> HashSet<u32> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut neighbours = Vec::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(address) = queue.pop_front() {
            neighbours.clear();
            self.push_neighbours(address, &mut neighbours);
            for &next in &neighbours {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_address(address: u32) -> Result<()> {
    if (address as usize) < ADDRESS_SPACE_SIZE {
        Ok(())
    } else {
        Err(CompileError::address_out_of_bounds(
            address as usize,
            "system",
            ADDRESS_SPACE_SIZE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_fresh_cell_is_unknown() {
        let space = AddressSpace::new();
        let cell = space.get_byte(0x000000).unwrap();
        assert_eq!(cell.value, 0);
        assert_eq!(cell.occupancy, Occupancy::Unknown);
        assert_eq!(cell.known, ValueKnown::Unknown);
    }

    #[test]
    fn test_set_value_marks_known() {
        let mut space = AddressSpace::new();
        space.set_value(0x7E0010, 0xAB).unwrap();

        let cell = space.get_byte(0x7E0010).unwrap();
        assert_eq!(cell.known_value(), Some(0xAB));
        assert_eq!(cell.occupancy, Occupancy::Filled);
    }

    #[test]
    fn test_set_value_out_of_range() {
        let mut space = AddressSpace::new();
        let err = space.set_value(0x10, 256).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);

        let err = space.set_value(0x10, -1).unwrap_err();
        assert_eq!(err.code, ErrorCode::OutOfRange);
    }

    #[test]
    fn test_address_out_of_bounds() {
        let space = AddressSpace::new();
        let err = space.get_value(0x0100_0000).unwrap_err();
        assert_eq!(err.code, ErrorCode::AddressOutOfBounds);
    }

    #[test]
    fn test_add_mirror_self_is_noop() {
        let mut space = AddressSpace::new();
        space.add_mirror(0x20, 0x20).unwrap();
        assert!(space.mirrors(0x20).unwrap().is_empty());
    }

    #[test]
    fn test_add_mirror_is_symmetric() {
        let mut space = AddressSpace::new();
        space.add_mirror(0x10, 0x20).unwrap();
        space.add_mirror(0x10, 0x20).unwrap();

        assert_eq!(space.mirrors(0x10).unwrap(), vec![0x20]);
        assert_eq!(space.mirrors(0x20).unwrap(), vec![0x10]);

        space.set_value(0x20, 7).unwrap();
        assert_eq!(space.get_value(0x10).unwrap(), 7);
    }

    #[test]
    fn test_rule_links_neighbours_only() {
        let mut space = AddressSpace::new();
        space.link_banks(0x0000..0x0010, [0x01, 0x02, 0x03]);

        assert_eq!(space.mirrors(0x020005).unwrap(), vec![0x010005, 0x030005]);
        assert_eq!(space.mirrors(0x010005).unwrap(), vec![0x020005]);
        assert!(space.mirrors(0x020010).unwrap().is_empty());

        // The group is still transitive through the middle bank.
        assert_eq!(
            space.mirror_group(0x010005).unwrap(),
            vec![0x010005, 0x020005, 0x030005]
        );
    }

    #[test]
    fn test_cycle_write_terminates_and_repeats() {
        let mut space = AddressSpace::new();
        space.add_mirror(0x100, 0x200).unwrap();
        space.add_mirror(0x200, 0x300).unwrap();
        space.add_mirror(0x300, 0x100).unwrap();

        space.set_value(0x100, 1).unwrap();
        for address in [0x100, 0x200, 0x300] {
            assert_eq!(space.get_value(address).unwrap(), 1);
        }

        space.set_value(0x300, 2).unwrap();
        for address in [0x100, 0x200, 0x300] {
            assert_eq!(space.get_value(address).unwrap(), 2);
        }
    }

    #[test]
    fn test_set_status_propagates_but_keeps_value() {
        let mut space = AddressSpace::new();
        space.add_mirror(0x40, 0x50).unwrap();
        space.set_value(0x40, 9).unwrap();

        space
            .set_status(0x50, Occupancy::Filled, ValueKnown::Unknown)
            .unwrap();

        let cell = space.get_byte(0x40).unwrap();
        assert_eq!(cell.value, 9);
        assert_eq!(cell.state(), CellState::CLOBBERED);
    }

    #[test]
    fn test_duplicate_banks_in_rule_are_ignored() {
        let rule = MirrorRule::new(0..1, [5, 6, 5, 7]);
        assert_eq!(rule.banks(), &[5, 6, 7]);
    }
}
