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

//! Declaration tree handed over by the front end.
//!
//! The grammar only knows function definitions and argument-less calls, so
//! the tree is small. Nested definitions are allowed.

use crate::error::SourceLocation;

/// A complete Glorp program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Top-level nodes in source order.
    pub items: Vec<Node>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node to the program.
    pub fn add_item(&mut self, item: impl Into<Node>) {
        self.items.push(item.into());
    }
}

/// A declaration node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    FunctionDef(FunctionDef),
    FunctionCall(FunctionCall),
}

impl From<FunctionDef> for Node {
    fn from(def: FunctionDef) -> Self {
        Node::FunctionDef(def)
    }
}

impl From<FunctionCall> for Node {
    fn from(call: FunctionCall) -> Self {
        Node::FunctionCall(call)
    }
}

/// `def name():` followed by an indented body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    /// Indentation depth of the body.
    pub depth: usize,
    pub body: Vec<Node>,
    pub location: Option<SourceLocation>,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            body: Vec::new(),
            location: None,
        }
    }

    /// Append a node to the body.
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.body.push(node.into());
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// `name()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub location: Option<SourceLocation>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}()", self.name)
    }
}

impl std::fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "def {}():", self.name)
    }
}
