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

//! Snapshot tests for the Glorp compiler.
//!
//! These tests use the `insta` crate to pin the generated machine code.

use glorp::ast::{FunctionCall, FunctionDef, Program};
use glorp::{compile, CompileOptions, RomConfig, RomImage};

/// Format the code area of an image as hex bytes.
fn format_code(rom: &RomImage, len: usize) -> String {
    rom.read(0, len)
        .unwrap()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn options() -> CompileOptions {
    CompileOptions::default().with_rom(RomConfig::default().with_size_in_mb(1))
}

#[test]
fn test_codegen_snapshot_empty_program() {
    let rom = compile(&Program::new(), &options()).unwrap();
    insta::assert_snapshot!(
        format_code(&rom, 34),
        @"78 18 FB C2 30 A9 00 00 E2 20 A9 80 8D 00 21 A9 00 8D 00 42 AF 00 02 7E F0 FA A9 00 8F 00 02 7E 80 FE"
    );
}

#[test]
fn test_codegen_snapshot_main() {
    let mut program = Program::new();
    program.add_item(FunctionDef::new("main", 1).with(FunctionCall::new("nop")));

    let rom = compile(&program, &options()).unwrap();
    insta::assert_snapshot!(
        format_code(&rom, 39),
        @"78 18 FB C2 30 A9 00 00 E2 20 A9 80 8D 00 21 A9 00 8D 00 42 AF 00 02 7E F0 FA A9 00 8F 00 02 7E 5C 24 80 80 EA 80 FE"
    );
}

#[test]
fn test_codegen_snapshot_functions() {
    let mut program = Program::new();
    program.add_item(FunctionCall::new("emulated_mode"));
    program.add_item(
        FunctionDef::new("blink", 1)
            .with(FunctionCall::new("disable_interrupts"))
            .with(FunctionCall::new("enable_interrupts")),
    );
    program.add_item(FunctionDef::new("main", 1).with(FunctionCall::new("blink")));

    let rom = compile(&program, &options()).unwrap();
    let code = rom.read(32, 18).unwrap();
    let hex = code
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    // sec xce | jml main | blink: sei cli rtl | main: jsl blink, bra
    insta::assert_snapshot!(hex, @"38 FB 5C 29 80 80 78 58 6B 22 26 80 80 80 FE 00 00 00");
}
