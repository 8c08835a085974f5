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

//! Lowering of the declaration tree into instructions.
//!
//! This module provides code generation for:
//! - The entry segment (top-level calls, then a jump into `main`)
//! - One segment per function definition, nested ones hoisted
//! - Calls to user functions (`jsl`) and to built-ins

use tracing::debug;

use super::builtins::{lookup_builtin, BUILTIN_NAMES};
use super::instructions::InstructionEmitter;
use super::labels::LabelManager;
use super::CodeGenerator;
use crate::ast::{FunctionCall, FunctionDef, Node, Program};
use crate::error::{CompileError, ErrorCode, Result};

/// Name of the function the entry segment jumps to.
pub const MAIN_FUNCTION: &str = "main";

/// Extension trait for lowering front-end nodes.
pub trait ProgramLowering {
    /// Lower a whole program: entry segment first, then every function.
    fn lower_program(&mut self, program: &Program) -> Result<()>;

    /// Lower one function definition into its own segment.
    fn lower_function(&mut self, def: &FunctionDef) -> Result<()>;

    /// Lower a single call.
    fn lower_call(&mut self, call: &FunctionCall) -> Result<()>;

    /// Emit an endless `bra` loop.
    fn emit_spin(&mut self) -> Result<()>;
}

impl ProgramLowering for CodeGenerator {
    fn lower_program(&mut self, program: &Program) -> Result<()> {
        let mut definitions = Vec::new();
        collect_definitions(&program.items, &mut definitions);

        for def in &definitions {
            if self.functions.contains_key(&def.name) {
                return Err(CompileError::new(
                    ErrorCode::FunctionAlreadyDefined,
                    format!("Function '{}' is already defined", def.name),
                )
                .at(def.location));
            }
            self.functions.insert(def.name.clone(), def.location);
        }

        self.start_segment("entry");
        for node in &program.items {
            if let Node::FunctionCall(call) = node {
                self.lower_call(call)?;
            }
        }
        if self.functions.contains_key(MAIN_FUNCTION) {
            self.jump_long("jml", MAIN_FUNCTION)?;
        } else {
            self.emit_spin()?;
        }
        self.end_segment();

        for def in definitions {
            self.lower_function(def)?;
        }
        Ok(())
    }

    fn lower_function(&mut self, def: &FunctionDef) -> Result<()> {
        self.start_segment(&def.name);
        self.define_label(&def.name);

        for node in &def.body {
            if let Node::FunctionCall(call) = node {
                self.lower_call(call)?;
            }
        }

        if def.name == MAIN_FUNCTION {
            self.emit_spin()?;
        } else {
            self.asm_rtl()?;
        }
        self.end_segment();
        Ok(())
    }

    fn lower_call(&mut self, call: &FunctionCall) -> Result<()> {
        if self.functions.contains_key(&call.name) {
            debug!(name = %call.name, "user call");
            return self.jump_long("jsl", &call.name).map_err(|e| e.at(call.location));
        }

        match lookup_builtin(&call.name) {
            Some(builtin) => builtin(self).map_err(|e| e.at(call.location)),
            None => Err(CompileError::new(
                ErrorCode::UndefinedFunction,
                format!("Undefined function '{}'", call.name),
            )
            .at(call.location)
            .with_hint(format!("Built-in functions: {}", BUILTIN_NAMES.join(", ")))),
        }
    }

    fn emit_spin(&mut self) -> Result<()> {
        let spin = self.make_label("spin");
        self.define_label(&spin);
        self.branch("bra", &spin)
    }
}

/// Every definition in source order, nested ones after their parent.
fn collect_definitions<'a>(nodes: &'a [Node], out: &mut Vec<&'a FunctionDef>) {
    for node in nodes {
        if let Node::FunctionDef(def) = node {
            out.push(def);
            collect_definitions(&def.body, out);
        }
    }
}
