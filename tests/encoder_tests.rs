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

//! Tests for the instruction encoder.

use glorp::codegen::{
    reorder_bytes, AddressMode, CodeGenerator, EmitHelpers, InstructionEmitter, LabelManager,
};
use glorp::cpu::{Flag, FlagState};
use glorp::output::RomConfig;
use glorp::ErrorCode;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn generator() -> CodeGenerator {
    CodeGenerator::new(RomConfig::default().with_size_in_mb(1)).unwrap()
}

fn emitted(gen: &CodeGenerator) -> Vec<u8> {
    gen.rom().read(0, gen.current_address()).unwrap().to_vec()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_clear_carry_from_nothing() {
    let mut gen = generator();
    gen.asm_clc().unwrap();

    assert_eq!(emitted(&gen), vec![0x18]);
    assert_eq!(gen.registers().status.flag(Flag::Carry), FlagState::Clear);
}

#[test]
fn test_long_store() {
    let mut gen = generator();
    gen.asm_sta_long(0x7E, 0x0200).unwrap();
    assert_eq!(emitted(&gen), vec![0x8F, 0x00, 0x02, 0x7E]);
}

#[test_case(FlagState::Set, vec![0xA9, 0x34, 0x12]; "wide accumulator")]
#[test_case(FlagState::Clear, vec![0xA9, 0x34]; "narrow accumulator")]
fn test_immediate_width_in_native_mode(accumulator_width: FlagState, expected: Vec<u8>) {
    let mut gen = generator();
    let status = &mut gen.registers_mut().status;
    status.set_emulation(FlagState::Clear);
    status.set_flag(Flag::AccumulatorWidth, accumulator_width);

    let value = if accumulator_width == FlagState::Set { 0x1234 } else { 0x34 };
    gen.asm_lda_imm(value).unwrap();
    assert_eq!(emitted(&gen), expected);
}

#[test]
fn test_zero_index_widens_immediates() {
    let mut gen = generator();
    gen.registers_mut().status.set_emulation(FlagState::Clear);
    gen.registers_mut().x_index = Some(0);

    gen.assemble_immediate("ldy", 0x10).unwrap();
    assert_eq!(emitted(&gen), vec![0xA0, 0x10, 0x00]);
}

#[test]
fn test_segment_reset() {
    let mut gen = generator();
    gen.asm_sei().unwrap();
    gen.asm_clc().unwrap();
    gen.start_segment("after");

    for flag in Flag::ALL {
        assert_eq!(gen.registers().status.flag(flag), FlagState::Unknown);
    }
    assert_eq!(gen.registers().status.get(), None);
}

#[test]
fn test_unknown_width_fails_loudly() {
    let mut gen = generator();
    let err = gen.asm_lda_imm(0x01).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndeterminateOperandWidth);
    assert!(err.message.contains("lda"));
    assert!(emitted(&gen).is_empty());
}

// ============================================================================
// Opcode Resolution
// ============================================================================

#[test_case("nop", AddressMode::Implied, 0, vec![0xEA]; "nop")]
#[test_case("XCE", AddressMode::Implied, 0, vec![0xFB]; "xce uppercase")]
#[test_case("sep", AddressMode::Immediate, 0x20, vec![0xE2, 0x20]; "sep")]
#[test_case("rep", AddressMode::Immediate, 0x30, vec![0xC2, 0x30]; "rep")]
#[test_case("sta", AddressMode::Absolute, 0x2100, vec![0x8D, 0x00, 0x21]; "sta absolute")]
#[test_case("stz", AddressMode::Absolute, 0x4200, vec![0x9C, 0x00, 0x42]; "stz absolute")]
#[test_case("lda", AddressMode::AbsoluteLong, 0x7E0200, vec![0xAF, 0x00, 0x02, 0x7E]; "lda long")]
#[test_case("jsl", AddressMode::AbsoluteLong, 0x808000, vec![0x22, 0x00, 0x80, 0x80]; "jsl long")]
fn test_assemble(mnemonic: &str, mode: AddressMode, operand: u32, expected: Vec<u8>) {
    let mut gen = generator();
    gen.assemble(mnemonic, mode, operand).unwrap();
    assert_eq!(emitted(&gen), expected);
}

#[test_case("clc", AddressMode::Absolute; "implied only")]
#[test_case("sta", AddressMode::Immediate; "store immediate")]
#[test_case("jml", AddressMode::Absolute; "long only")]
#[test_case("frob", AddressMode::Implied; "unknown mnemonic")]
fn test_unsupported_pairs(mnemonic: &str, mode: AddressMode) {
    let mut gen = generator();
    gen.registers_mut().status.set_emulation(FlagState::Set);

    let err = gen.assemble(mnemonic, mode, 0x10).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedEncoding);
    assert!(err.message.contains(mnemonic));
    assert!(err.message.contains(mode.name()));
}

#[test]
fn test_cursor_follows_instructions() {
    let mut gen = generator();
    gen.asm_sei().unwrap();
    gen.macro_set_mode_native().unwrap();
    gen.asm_rep(0x30).unwrap();
    assert_eq!(gen.current_address(), 5);

    let label = gen.make_label("loop");
    gen.define_label(&label);
    gen.branch("bra", &label).unwrap();
    gen.resolve_labels().unwrap();
    assert_eq!(
        emitted(&gen),
        vec![0x78, 0x18, 0xFB, 0xC2, 0x30, 0x80, 0xFE]
    );
}

// ============================================================================
// Byte Ordering
// ============================================================================

#[test]
fn test_reorder_examples() {
    assert_eq!(reorder_bytes(0x1234, 2).unwrap(), vec![0x34, 0x12]);
    assert_eq!(reorder_bytes(0x000000, 3).unwrap(), vec![0x00, 0x00, 0x00]);
    assert_eq!(reorder_bytes(0xFF, 1).unwrap(), vec![0xFF]);
    assert_eq!(
        reorder_bytes(0x01_0000, 2).unwrap_err().code,
        ErrorCode::OperandTooWide
    );
}

proptest! {
    /// Property: decoding the packed bytes little-endian gives the value back.
    #[test]
    fn prop_reorder_round_trip(width in 1usize..=3, raw in any::<u32>()) {
        let value = raw & ((1u32 << (width * 8)) - 1);
        let bytes = reorder_bytes(value, width).unwrap();
        prop_assert_eq!(bytes.len(), width);

        let decoded = bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);
        prop_assert_eq!(decoded, value);
    }
}
