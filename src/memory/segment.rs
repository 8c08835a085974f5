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

//! Named views over the address space.
//!
//! A [`Segment`] never holds bytes of its own. It is a window (start and
//! length) into an [`AddressSpace`], so a write through any segment is
//! visible through the master space and through every other segment that
//! covers the same cells.

use super::cell::MemoryCell;
use super::space::AddressSpace;
use crate::error::{CompileError, Result};

/// A contiguous, named window into the address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    name: String,
    start: u32,
    len: u32,
}

impl Segment {
    /// Create a segment starting at the absolute address `start`.
    pub fn new(name: impl Into<String>, start: u32, len: u32) -> Self {
        Self {
            name: name.into(),
            start,
            len,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute address of the first byte.
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute address one past the last byte.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Build a view over `len` bytes starting at the segment-relative
    /// `start`. Fails if the range leaves this segment.
    pub fn derive(&self, start: u32, len: u32) -> Result<Segment> {
        let end = start as u64 + len as u64;
        if end > self.len as u64 {
            return Err(self.out_of_bounds(end.saturating_sub(1) as u32));
        }

        Ok(Segment::new(
            format!("{}[{:04x}..{:04x}]", self.name, start, end),
            self.start + start,
            len,
        ))
    }

    /// Translate a segment-relative offset into an absolute address.
    pub fn absolute(&self, offset: u32) -> Result<u32> {
        if offset < self.len {
            Ok(self.start + offset)
        } else {
            Err(self.out_of_bounds(offset))
        }
    }

    pub fn contains(&self, address: u32) -> bool {
        address >= self.start && address < self.end()
    }

    pub fn get_byte(&self, space: &AddressSpace, offset: u32) -> Result<MemoryCell> {
        space.get_byte(self.absolute(offset)?)
    }

    pub fn get_value(&self, space: &AddressSpace, offset: u32) -> Result<u8> {
        space.get_value(self.absolute(offset)?)
    }

    pub fn set_value(&self, space: &mut AddressSpace, offset: u32, value: i32) -> Result<()> {
        space.set_value(self.absolute(offset)?, value)
    }

    fn out_of_bounds(&self, offset: u32) -> CompileError {
        CompileError::address_out_of_bounds(offset as usize, &self.name, self.len as usize)
    }
}
