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

//! Compile-time knowledge of the processor status register (P) and the
//! emulation bit (E).

use crate::error::{CompileError, ErrorCode, Result};

/// What the compiler knows about a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagState {
    #[default]
    Unknown,
    Clear,
    Set,
}

impl FlagState {
    /// The flag as a bit, if known.
    pub fn bit(self) -> Option<u8> {
        match self {
            FlagState::Unknown => None,
            FlagState::Clear => Some(0),
            FlagState::Set => Some(1),
        }
    }

    pub fn is_known(self) -> bool {
        self != FlagState::Unknown
    }

    /// Convert a 0/1 bit. Anything else is rejected.
    pub fn from_bit(bit: u8) -> Result<Self> {
        match bit {
            0 => Ok(FlagState::Clear),
            1 => Ok(FlagState::Set),
            other => Err(CompileError::new(
                ErrorCode::InvalidFlagValue,
                format!("A flag is a single bit, got {}", other),
            )),
        }
    }
}

impl From<bool> for FlagState {
    fn from(value: bool) -> Self {
        if value {
            FlagState::Set
        } else {
            FlagState::Clear
        }
    }
}

/// The eight bits of P, from bit 0 upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Carry,
    Zero,
    IrqDisable,
    Decimal,
    /// X: index register width.
    IndexWidth,
    /// M: accumulator/memory width.
    AccumulatorWidth,
    Overflow,
    Negative,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Flag::Carry,
        Flag::Zero,
        Flag::IrqDisable,
        Flag::Decimal,
        Flag::IndexWidth,
        Flag::AccumulatorWidth,
        Flag::Overflow,
        Flag::Negative,
    ];

    /// Bit position inside P.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mask(self) -> u8 {
        1 << self.index()
    }
}

/// Tri-state model of P plus the emulation bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessorStatus {
    flags: [FlagState; 8],
    emulation: FlagState,
}

impl ProcessorStatus {
    /// Create a status register with every bit unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode all eight bits of P from a concrete value.
    ///
    /// The emulation bit is not part of P and stays untouched.
    pub fn set(&mut self, value: u8) {
        for flag in Flag::ALL {
            self.flags[flag.index()] = FlagState::from(value & flag.mask() != 0);
        }
    }

    /// The packed value of P, only if every bit is known.
    pub fn get(&self) -> Option<u8> {
        Flag::ALL.iter().try_fold(0u8, |packed, flag| {
            self.flags[flag.index()]
                .bit()
                .map(|bit| packed | (bit << flag.index()))
        })
    }

    /// Forget everything, including the emulation bit.
    pub fn mark_all_unknown(&mut self) {
        self.flags = [FlagState::Unknown; 8];
        self.emulation = FlagState::Unknown;
    }

    pub fn flag(&self, flag: Flag) -> FlagState {
        self.flags[flag.index()]
    }

    pub fn set_flag(&mut self, flag: Flag, state: FlagState) {
        self.flags[flag.index()] = state;
    }

    /// Set a flag from a 0/1 bit.
    pub fn set_bit(&mut self, flag: Flag, bit: u8) -> Result<()> {
        self.flags[flag.index()] = FlagState::from_bit(bit)?;
        Ok(())
    }

    pub fn emulation(&self) -> FlagState {
        self.emulation
    }

    pub fn set_emulation(&mut self, state: FlagState) {
        self.emulation = state;
    }

    /// Set the emulation bit from a 0/1 bit.
    pub fn set_emulation_bit(&mut self, bit: u8) -> Result<()> {
        self.emulation = FlagState::from_bit(bit)?;
        Ok(())
    }

    /// Mark every bit selected by `mask` as set (SEP).
    pub fn set_mask(&mut self, mask: u8) {
        self.apply_mask(mask, FlagState::Set);
    }

    /// Mark every bit selected by `mask` as clear (REP).
    pub fn clear_mask(&mut self, mask: u8) {
        self.apply_mask(mask, FlagState::Clear);
    }

    /// Swap carry and emulation (XCE).
    pub fn exchange_carry_emulation(&mut self) {
        let carry = self.flags[Flag::Carry.index()];
        self.flags[Flag::Carry.index()] = self.emulation;
        self.emulation = carry;
    }

    /// True if the CPU is known to run in native mode.
    pub fn is_native(&self) -> bool {
        self.emulation == FlagState::Clear
    }

    fn apply_mask(&mut self, mask: u8, state: FlagState) {
        for flag in Flag::ALL {
            if mask & flag.mask() != 0 {
                self.flags[flag.index()] = state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unknown() {
        let status = ProcessorStatus::new();
        assert_eq!(status.get(), None);
        assert_eq!(status.emulation(), FlagState::Unknown);
        for flag in Flag::ALL {
            assert_eq!(status.flag(flag), FlagState::Unknown);
        }
    }

    #[test]
    fn test_set_decodes_each_bit() {
        let mut status = ProcessorStatus::new();
        status.set(0b1010_0101);

        assert_eq!(status.flag(Flag::Carry), FlagState::Set);
        assert_eq!(status.flag(Flag::Zero), FlagState::Clear);
        assert_eq!(status.flag(Flag::IrqDisable), FlagState::Set);
        assert_eq!(status.flag(Flag::Decimal), FlagState::Clear);
        assert_eq!(status.flag(Flag::IndexWidth), FlagState::Clear);
        assert_eq!(status.flag(Flag::AccumulatorWidth), FlagState::Set);
        assert_eq!(status.flag(Flag::Overflow), FlagState::Clear);
        assert_eq!(status.flag(Flag::Negative), FlagState::Set);
        assert_eq!(status.get(), Some(0b1010_0101));
    }

    #[test]
    fn test_accumulator_width_clear_is_decoded() {
        let mut status = ProcessorStatus::new();
        status.set(0xFF);
        status.set(0x10);
        assert_eq!(status.flag(Flag::AccumulatorWidth), FlagState::Clear);
        assert_eq!(status.flag(Flag::IndexWidth), FlagState::Set);
    }

    #[test]
    fn test_single_unknown_bit_hides_value() {
        let mut status = ProcessorStatus::new();
        status.set(0x30);
        status.set_flag(Flag::Overflow, FlagState::Unknown);
        assert_eq!(status.get(), None);

        status.set_flag(Flag::Overflow, FlagState::Clear);
        assert_eq!(status.get(), Some(0x30));
    }

    #[test]
    fn test_set_bit_rejects_non_bits() {
        let mut status = ProcessorStatus::new();
        assert!(status.set_bit(Flag::Carry, 1).is_ok());
        let err = status.set_bit(Flag::Carry, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFlagValue);
        assert_eq!(status.flag(Flag::Carry), FlagState::Set);

        assert!(status.set_emulation_bit(3).is_err());
    }

    #[test]
    fn test_masks() {
        let mut status = ProcessorStatus::new();
        status.clear_mask(0x30);
        assert_eq!(status.flag(Flag::IndexWidth), FlagState::Clear);
        assert_eq!(status.flag(Flag::AccumulatorWidth), FlagState::Clear);
        assert_eq!(status.flag(Flag::Carry), FlagState::Unknown);

        status.set_mask(0x20);
        assert_eq!(status.flag(Flag::AccumulatorWidth), FlagState::Set);
        assert_eq!(status.flag(Flag::IndexWidth), FlagState::Clear);
    }

    #[test]
    fn test_exchange_carry_emulation() {
        let mut status = ProcessorStatus::new();
        status.set_flag(Flag::Carry, FlagState::Clear);
        status.exchange_carry_emulation();

        assert!(status.is_native());
        assert_eq!(status.flag(Flag::Carry), FlagState::Unknown);
    }

    #[test]
    fn test_mark_all_unknown() {
        let mut status = ProcessorStatus::new();
        status.set(0x00);
        status.set_emulation(FlagState::Set);
        status.mark_all_unknown();

        assert_eq!(status, ProcessorStatus::new());
    }
}
