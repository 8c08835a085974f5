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

//! Negative/Error tests for the Glorp compiler.
//!
//! These tests verify that invalid programs and impossible configurations
//! are rejected with the right error code and location.

use glorp::ast::{FunctionCall, FunctionDef, Program};
use glorp::{compile, format_error, CompileOptions, ErrorCode, RomConfig, SourceLocation};
use test_case::test_case;

fn options() -> CompileOptions {
    CompileOptions::default().with_rom(RomConfig::default().with_size_in_mb(1))
}

// ============================================================================
// Lowering Errors
// ============================================================================

#[test_case("print"; "unknown builtin")]
#[test_case("Nop"; "case sensitive")]
#[test_case("mainn"; "typo")]
fn test_undefined_function(name: &str) {
    let mut program = Program::new();
    program.add_item(
        FunctionDef::new("main", 1).with(FunctionCall::new(name).at(SourceLocation::new(2, 5))),
    );

    let err = compile(&program, &options()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndefinedFunction);
    assert!(err.message.contains(name));
    assert_eq!(err.location, Some(SourceLocation::new(2, 5)));
}

#[test]
fn test_function_defined_twice() {
    let mut program = Program::new();
    program.add_item(FunctionDef::new("main", 1));
    program.add_item(FunctionDef::new("main", 1).at(SourceLocation::new(9, 1)));

    let err = compile(&program, &options()).unwrap_err();
    assert_eq!(err.code, ErrorCode::FunctionAlreadyDefined);
    assert_eq!(err.location, Some(SourceLocation::new(9, 1)));
}

#[test]
fn test_builtin_name_cannot_be_defined_twice_either() {
    let mut program = Program::new();
    program.add_item(FunctionDef::new("helper", 1).with(FunctionDef::new("helper", 2)));

    let err = compile(&program, &options()).unwrap_err();
    assert_eq!(err.code, ErrorCode::FunctionAlreadyDefined);
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_image_too_small() {
    let options = CompileOptions::default().with_rom(RomConfig::default().with_size_in_mb(0));
    let err = compile(&Program::new(), &options).unwrap_err();
    assert_eq!(err.code, ErrorCode::ImageTooSmall);
    assert!(err.hint.is_some());
}

// ============================================================================
// Error Codes and Formatting
// ============================================================================

#[test_case(ErrorCode::OutOfRange, "E300"; "out of range")]
#[test_case(ErrorCode::AddressOutOfBounds, "E301"; "address out of bounds")]
#[test_case(ErrorCode::InvalidFlagValue, "E302"; "invalid flag value")]
#[test_case(ErrorCode::WriteCollision, "E310"; "write collision")]
#[test_case(ErrorCode::ImageTooSmall, "E311"; "image too small")]
#[test_case(ErrorCode::UnsupportedEncoding, "E320"; "unsupported encoding")]
#[test_case(ErrorCode::IndeterminateOperandWidth, "E321"; "indeterminate width")]
#[test_case(ErrorCode::OperandTooWide, "E322"; "operand too wide")]
#[test_case(ErrorCode::UndefinedLabel, "E330"; "undefined label")]
#[test_case(ErrorCode::BranchOutOfRange, "E331"; "branch out of range")]
#[test_case(ErrorCode::UndefinedFunction, "E340"; "undefined function")]
#[test_case(ErrorCode::FunctionAlreadyDefined, "E341"; "function already defined")]
fn test_error_codes(code: ErrorCode, expected: &str) {
    assert_eq!(code.code(), expected);
}

#[test]
fn test_formatted_error_names_location() {
    let mut program = Program::new();
    program.add_item(FunctionCall::new("boom").at(SourceLocation::new(3, 1)));

    let err = compile(&program, &options()).unwrap_err();
    let report = format_error(&err, Some("game.glorp"));
    assert!(report.contains("E340"));
    assert!(report.contains("boom"));
    assert!(report.contains("game.glorp:3:1"));
}
