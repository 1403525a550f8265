// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Solidus compiler front end core.
//!
//! This crate contains the front-end functionality for Solidity source:
//! - Lexical analysis (tokenization with doc-comment attachment)
//! - Parsing (recursive descent, span-annotated AST, stable diagnostic ids,
//!   optional error recovery)
//! - Version-pragma and SPDX-license extraction
//! - Specification expressions (quantified pre/postcondition clauses)
//!
//! The crate is a pure library: no I/O, no CLI, no persisted state. One
//! [`source_analysis::Parser`] instance performs one parse; independent
//! instances are fully independent.

pub mod ast;
pub mod source_analysis;

/// The handful of types most callers need.
pub mod prelude {
    pub use crate::ast::{
        ContractDefinition, Expression, FunctionDefinition, SourceUnit, SourceUnitPart, Statement,
        TypeName, VariableDeclaration,
    };
    pub use crate::source_analysis::{
        parse_source_unit, parse_standalone_expression, Diagnostic, ParserConfig, Severity, Span,
    };
}
