// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Source analysis for Solidity: lexer, token source, parser, and
//! diagnostics.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. Each
//! token carries its source location via [`Span`] and the doc comment (if
//! any) that precedes it.
//!
//! ```
//! use solidus_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("a + 1").collect();
//! assert_eq!(tokens.len(), 3); // a, +, 1
//! ```
//!
//! # Parsing
//!
//! [`parse_source_unit`] converts source text into a
//! [`SourceUnit`](crate::ast::SourceUnit) AST, together with all recorded
//! diagnostics. [`parse_standalone_expression`],
//! [`parse_specification_expression`], and [`parse_specification_cases`]
//! are the narrower entry points.
//!
//! # Error Handling
//!
//! The lexer recovers from invalid input with [`TokenKind::Illegal`]
//! tokens. The parser records [`Diagnostic`]s with stable numeric ids in an
//! [`ErrorReporter`]; fatal errors unwind as [`FatalError`] values and are
//! absorbed by the driver firewall or, with error recovery enabled, at the
//! recovery points (contract bodies, blocks, statements).

mod error;
mod lexer;
mod parser;
mod scanner;
mod span;
mod token;
pub(crate) mod version;

#[cfg(test)]
mod lexer_property_tests;

pub use error::{Diagnostic, ErrorReporter, FatalError, ParseResult, Severity};
pub use lexer::{lex, lex_with_eof, Lexer};
pub use parser::{
    parse_source_unit, parse_specification_cases, parse_specification_expression,
    parse_standalone_expression, EvmVersion, Parser, ParserConfig,
};
pub use scanner::Scanner;
pub use span::Span;
pub use token::{DocComment, ElementaryKind, ElementaryTypeToken, Token, TokenKind};
