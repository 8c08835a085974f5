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

//! Error types for the Glorp backend.
//!
//! Every condition raised while modelling memory, building the cartridge
//! image or encoding instructions is fatal for the current compilation and
//! is reported as a [`CompileError`].

use thiserror::Error;

/// Error codes for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Memory model errors (E300-E309)
    OutOfRange,
    AddressOutOfBounds,
    InvalidFlagValue,

    // Image errors (E310-E319)
    WriteCollision,
    ImageTooSmall,

    // Encoding errors (E320-E339)
    UnsupportedEncoding,
    IndeterminateOperandWidth,
    OperandTooWide,
    UndefinedLabel,
    BranchOutOfRange,

    // Lowering errors (E340-E349)
    UndefinedFunction,
    FunctionAlreadyDefined,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::OutOfRange => "E300",
            ErrorCode::AddressOutOfBounds => "E301",
            ErrorCode::InvalidFlagValue => "E302",

            ErrorCode::WriteCollision => "E310",
            ErrorCode::ImageTooSmall => "E311",

            ErrorCode::UnsupportedEncoding => "E320",
            ErrorCode::IndeterminateOperandWidth => "E321",
            ErrorCode::OperandTooWide => "E322",
            ErrorCode::UndefinedLabel => "E330",
            ErrorCode::BranchOutOfRange => "E331",

            ErrorCode::UndefinedFunction => "E340",
            ErrorCode::FunctionAlreadyDefined => "E341",
        }
    }
}

/// Line and column of the front-end node an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A backend error.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Where in the source the failing node came from, when known.
    pub location: Option<SourceLocation>,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error without a source location.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            hint: None,
        }
    }

    /// Attach a source location, keeping an already attached one.
    pub fn at(mut self, location: Option<SourceLocation>) -> Self {
        if self.location.is_none() {
            self.location = location;
        }
        self
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub(crate) fn out_of_range(value: i64) -> Self {
        Self::new(
            ErrorCode::OutOfRange,
            format!("Value {} does not fit in a byte (0-255)", value),
        )
    }

    pub(crate) fn address_out_of_bounds(address: usize, region: &str, len: usize) -> Self {
        Self::new(
            ErrorCode::AddressOutOfBounds,
            format!(
                "Address ${:06X} is outside of '{}' (length ${:X})",
                address, region, len
            ),
        )
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Format an error for display on a terminal.
pub fn format_error(error: &CompileError, filename: Option<&str>) -> String {
    let filename = filename.unwrap_or("<input>");

    let mut output = String::new();

    output.push_str(&format!("error[{}]: {}\n", error.code_str(), error.message));

    match error.location {
        Some(loc) => output.push_str(&format!("  --> {}:{}\n", filename, loc)),
        None => output.push_str(&format!("  --> {}\n", filename)),
    }

    if let Some(hint) = &error.hint {
        output.push_str(&format!("   = hint: {}\n", hint));
    }

    output
}
