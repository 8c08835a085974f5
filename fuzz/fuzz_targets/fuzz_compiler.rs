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

//! Fuzz target for the complete Glorp backend.
//!
//! This fuzzer builds random declaration trees and feeds them through
//! `compile` to find panics at any stage.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_compiler
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_compiler -- -max_total_time=60

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use glorp::ast::{FunctionCall, FunctionDef, Node, Program};
use glorp::{CompileOptions, RomConfig};
use libfuzzer_sys::fuzz_target;

const NAMES: &[&str] = &[
    "main",
    "helper",
    "loop",
    "nop",
    "init",
    "native_mode",
    "emulated_mode",
    "set_carry",
    "clear_carry",
    "disable_interrupts",
    "enable_interrupts",
    "missing",
];

#[derive(Debug, Arbitrary)]
enum FuzzNode {
    Def(u8, Vec<FuzzNode>),
    Call(u8),
}

fn name(index: u8) -> &'static str {
    NAMES[index as usize % NAMES.len()]
}

fn convert(node: &FuzzNode, depth: usize) -> Node {
    match node {
        FuzzNode::Def(index, body) if depth < 4 => {
            let mut def = FunctionDef::new(name(*index), depth + 1);
            for child in body {
                def = def.with(convert(child, depth + 1));
            }
            def.into()
        }
        FuzzNode::Def(index, _) | FuzzNode::Call(index) => FunctionCall::new(name(*index)).into(),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut input = Unstructured::new(data);
    if let Ok(nodes) = Vec::<FuzzNode>::arbitrary(&mut input) {
        let program = Program {
            items: nodes.iter().map(|node| convert(node, 0)).collect(),
        };
        let options = CompileOptions::default().with_rom(RomConfig::default().with_size_in_mb(1));

        // Should never panic, only return Ok or Err
        let _ = glorp::compile(&program, &options);
    }
});
