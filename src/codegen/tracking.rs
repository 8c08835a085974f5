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

//! Processor and RAM state updates after an instruction was emitted.

use super::CodeGenerator;
use crate::cpu::{Flag, FlagState};
use crate::error::Result;
use crate::memory::{Occupancy, ValueKnown};

/// The operand an emitted instruction was assembled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Immediate { value: u32, width: usize },
    /// Absolute 24-bit address of a memory operand.
    Memory(u32),
}

/// Extension trait applying instruction semantics to the tracked state.
pub trait StateTracking {
    /// Update registers, flags and the RAM model after `mnemonic` (lower
    /// case) was emitted with `operand`.
    fn apply_side_effects(&mut self, mnemonic: &str, operand: Operand) -> Result<()>;

    /// Record a store of `value` to `address`. Only the low byte is
    /// modelled.
    fn record_store(&mut self, address: u32, value: Option<u16>) -> Result<()>;
}

impl StateTracking for CodeGenerator {
    fn apply_side_effects(&mut self, mnemonic: &str, operand: Operand) -> Result<()> {
        let registers = &mut self.registers;
        let status = &mut registers.status;

        match (mnemonic, operand) {
            ("clc", _) => status.set_flag(Flag::Carry, FlagState::Clear),
            ("sec", _) => status.set_flag(Flag::Carry, FlagState::Set),
            ("cli", _) => status.set_flag(Flag::IrqDisable, FlagState::Clear),
            ("sei", _) => status.set_flag(Flag::IrqDisable, FlagState::Set),
            ("xce", _) => {
                status.exchange_carry_emulation();
                // Emulation mode forces 8-bit registers.
                if status.emulation() == FlagState::Set {
                    status.set_mask(Flag::AccumulatorWidth.mask() | Flag::IndexWidth.mask());
                }
            }
            ("rep", Operand::Immediate { value, .. }) => {
                let widths = Flag::AccumulatorWidth.mask() | Flag::IndexWidth.mask();
                let mask = value as u8;
                match status.emulation() {
                    FlagState::Clear => status.clear_mask(mask),
                    // M and X stay 1 in emulation mode.
                    FlagState::Set => status.clear_mask(mask & !widths),
                    FlagState::Unknown => {
                        status.clear_mask(mask & !widths);
                        for flag in [Flag::AccumulatorWidth, Flag::IndexWidth] {
                            if mask & flag.mask() != 0 {
                                status.set_flag(flag, FlagState::Unknown);
                            }
                        }
                    }
                }
            }
            ("sep", Operand::Immediate { value, .. }) => {
                status.set_mask(value as u8);
                if value as u8 & Flag::IndexWidth.mask() != 0 {
                    registers.x_index = registers.x_index.map(|x| x & 0xFF);
                    registers.y_index = registers.y_index.map(|y| y & 0xFF);
                }
            }

            ("lda", Operand::Immediate { value, width }) => {
                registers.accumulator = Some(value as u16);
                set_nz(registers, Some(value), width);
            }
            ("ldx", Operand::Immediate { value, width }) => {
                registers.x_index = Some(value as u16);
                set_nz(registers, Some(value), width);
            }
            ("ldy", Operand::Immediate { value, width }) => {
                registers.y_index = Some(value as u16);
                set_nz(registers, Some(value), width);
            }
            ("and", Operand::Immediate { value, width }) => {
                registers.accumulator = registers.accumulator.map(|a| a & value as u16);
                let result = registers.accumulator.map(u32::from);
                set_nz(registers, result, width);
            }
            ("ora", Operand::Immediate { value, width }) => {
                registers.accumulator = registers.accumulator.map(|a| a | value as u16);
                let result = registers.accumulator.map(u32::from);
                set_nz(registers, result, width);
            }
            ("cmp", _) => {
                status.set_flag(Flag::Carry, FlagState::Unknown);
                set_nz(registers, None, 0);
            }

            ("lda", Operand::Memory(_)) => {
                registers.accumulator = None;
                set_nz(registers, None, 0);
            }
            ("ldx", Operand::Memory(_)) => {
                registers.x_index = None;
                set_nz(registers, None, 0);
            }
            ("ldy", Operand::Memory(_)) => {
                registers.y_index = None;
                set_nz(registers, None, 0);
            }
            ("sta", Operand::Memory(address)) => {
                let value = registers.accumulator;
                self.record_store(address, value)?;
            }
            ("stx", Operand::Memory(address)) => {
                let value = registers.x_index;
                self.record_store(address, value)?;
            }
            ("sty", Operand::Memory(address)) => {
                let value = registers.y_index;
                self.record_store(address, value)?;
            }
            ("stz", Operand::Memory(address)) => self.record_store(address, Some(0))?,

            ("tax", _) => {
                registers.x_index = registers.accumulator;
                set_nz(registers, None, 0);
            }
            ("txa", _) => {
                registers.accumulator = registers.x_index;
                set_nz(registers, None, 0);
            }
            ("txs", _) => registers.stack_pointer = registers.x_index,
            ("inx", _) => {
                registers.x_index = registers.x_index.map(|x| x.wrapping_add(1));
                set_nz(registers, None, 0);
            }
            ("dex", _) => {
                registers.x_index = registers.x_index.map(|x| x.wrapping_sub(1));
                set_nz(registers, None, 0);
            }
            ("tcd", _) => set_nz(registers, None, 0),

            // The callee may leave anything behind.
            ("jsl" | "jsr", _) => registers.mark_all_unknown(),
            ("rti", _) => {
                for flag in Flag::ALL {
                    status.set_flag(flag, FlagState::Unknown);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn record_store(&mut self, address: u32, value: Option<u16>) -> Result<()> {
        match value {
            Some(value) => self.memory.set_value(address, i32::from(value & 0xFF)),
            None => self
                .memory
                .set_status(address, Occupancy::Filled, ValueKnown::Unknown),
        }
    }
}

/// Derive N and Z from a loaded value of `width` bytes.
fn set_nz(registers: &mut crate::cpu::CpuRegisters, value: Option<u32>, width: usize) {
    let status = &mut registers.status;
    match value {
        Some(value) if width > 0 => {
            let bits = (width * 8).min(16) as u32;
            let masked = value & ((1u32 << bits) - 1);
            status.set_flag(Flag::Zero, FlagState::from(masked == 0));
            status.set_flag(Flag::Negative, FlagState::from(masked >> (bits - 1) & 1 == 1));
        }
        _ => {
            status.set_flag(Flag::Zero, FlagState::Unknown);
            status.set_flag(Flag::Negative, FlagState::Unknown);
        }
    }
}
