// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Solidity source code.
//!
//! This parser builds a span-annotated AST from a stream of tokens,
//! reporting structured diagnostics with stable numeric ids and optionally
//! recovering past local errors to continue parsing.
//!
//! # Design Philosophy
//!
//! - **Stable diagnostic ids** — every diagnostic carries a numeric id that
//!   tests and tooling match on; ids are never renumbered
//! - **Fatal errors are values** — a fatal error records its diagnostic and
//!   unwinds as `Err(FatalError)` through [`ParseResult`]; the driver
//!   firewall turns it into a `None` result
//! - **Recovery points** — with `error_recovery` enabled, a fatal error
//!   inside a contract body, block, or statement resynchronizes to `}` or
//!   `;` and resumes
//! - **Single node factory** — every AST node is stamped with a fresh id
//!   and a resolved span by [`NodeTracker::finish`]; invariants (unique
//!   ids, spans within the source) hold by construction
//!
//! # Usage
//!
//! ```
//! use solidus_core::source_analysis::{parse_source_unit, ParserConfig};
//!
//! let source = "// SPDX-License-Identifier: MIT\ncontract C {}";
//! let (unit, diagnostics) = parse_source_unit(source, &ParserConfig::default());
//!
//! let unit = unit.expect("parse succeeds");
//! assert_eq!(unit.license.as_deref(), Some("MIT"));
//! assert!(diagnostics.is_empty());
//! ```

use std::sync::OnceLock;

use ecow::EcoString;
use regex::Regex;
use semver::Version;

use crate::ast::{
    Expression, Identifier, NodeId, SourceUnit, SourceUnitPart, SpecificationCase,
    SpecificationExpressionInfo, StructuredDocumentation,
};
use crate::source_analysis::{
    Diagnostic, ErrorReporter, FatalError, ParseResult, Scanner, Span, TokenKind,
};

// Each grammar area contributes its own impl block for Parser
mod declarations;
mod expressions;
mod specification;
mod statements;
mod types;

#[cfg(test)]
mod property_tests;

/// The maximum parse depth before a fatal diagnostic is raised.
const MAX_RECURSION_DEPTH: usize = 1024;

/// The EVM version a source unit targets.
///
/// The parser itself only threads this through as an opaque handle (the
/// inline-assembly dialect is selected from it downstream).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvmVersion {
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    #[default]
    Istanbul,
    Berlin,
}

/// Configuration for a parse.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// The targeted EVM version.
    pub evm_version: EvmVersion,
    /// Whether the parser resynchronizes at recovery points instead of
    /// aborting on the first fatal error.
    pub error_recovery: bool,
    /// The compiler version a `pragma solidity …;` directive is matched
    /// against.
    pub compiler_version: Version,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            evm_version: EvmVersion::default(),
            error_recovery: false,
            compiler_version: Version::new(0, 8, 4),
        }
    }
}

/// Parses a full source unit.
///
/// Always returns all recorded diagnostics; the unit is `None` exactly when
/// a fatal error was not recovered from.
#[must_use]
pub fn parse_source_unit(source: &str, config: &ParserConfig) -> (Option<SourceUnit>, Vec<Diagnostic>) {
    Parser::new(Scanner::new(source), config.clone()).parse()
}

/// Parses a standalone expression.
///
/// Trailing tokens after the expression are reported as error 4272.
#[must_use]
pub fn parse_standalone_expression(
    source: &str,
    config: &ParserConfig,
) -> (Option<Expression>, Vec<Diagnostic>) {
    let mut parser = Parser::new(Scanner::new(source), config.clone());
    let result = parser.parse_expression();
    let expression = parser.firewall(result);
    if expression.is_some() && !parser.scanner.current().is_eof() {
        let message = format!(
            "Expected end of expression but got '{}'",
            parser.scanner.current()
        );
        let span = parser.scanner.current_span();
        parser.reporter.parser_error(4272, span, message);
    }
    (expression, parser.reporter.into_diagnostics())
}

/// Parses a specification expression with optional leading quantifiers
/// (`forall (…)`, `exists (…)`) or the `property(arr)` form.
#[must_use]
pub fn parse_specification_expression(
    source: &str,
    config: &ParserConfig,
) -> (
    Option<(Expression, SpecificationExpressionInfo)>,
    Vec<Diagnostic>,
) {
    let mut parser = Parser::new(Scanner::new(source), config.clone());
    let mut info = SpecificationExpressionInfo::default();
    let result = parser.parse_specification_expression_inner(&mut info);
    let expression = parser.firewall(result);
    if expression.is_some() && !parser.scanner.current().is_eof() {
        let message = format!(
            "Expected end of expression but got '{}'",
            parser.scanner.current()
        );
        let span = parser.scanner.current_span();
        parser.reporter.parser_error(1553, span, message);
    }
    (
        expression.map(|expression| (expression, info)),
        parser.reporter.into_diagnostics(),
    )
}

/// Parses a specification case list: `[case P1 : Q1; case P2 : Q2; …]`.
#[must_use]
pub fn parse_specification_cases(
    source: &str,
    config: &ParserConfig,
) -> (Vec<SpecificationCase>, Vec<Diagnostic>) {
    let mut parser = Parser::new(Scanner::new(source), config.clone());
    let mut cases = Vec::new();
    let result = parser.parse_specification_case_list(&mut cases);
    if parser.firewall(result).is_some() && !parser.scanner.current().is_eof() {
        let message = format!(
            "Expected end of expression but got '{}'",
            parser.scanner.current()
        );
        let span = parser.scanner.current_span();
        parser.reporter.parser_error(2180, span, message);
    }
    (cases, parser.reporter.into_diagnostics())
}

/// Tracks the span of a node while it is being parsed, and resolves it into
/// a fresh node id and span.
///
/// This is the single factory point for AST nodes: ids are only ever minted
/// by [`NodeTracker::finish`], which keeps them unique within the parse.
#[derive(Debug, Clone, Copy)]
struct NodeTracker {
    start: u32,
    end: Option<u32>,
}

impl NodeTracker {
    /// Sets the end offset to the end of the parser's current token.
    fn mark_end(&mut self, parser: &Parser) {
        self.end = Some(parser.scanner.current_span().end());
    }

    /// Sets the end offset from an already-parsed child node.
    fn set_end_from(&mut self, span: Span) {
        self.end = Some(span.end());
    }

    /// Collapses the span to its start offset (synthesized nodes).
    fn set_empty(&mut self) {
        self.end = Some(self.start);
    }

    /// The span tracked so far (end defaults to start when never marked).
    fn span(&self) -> Span {
        Span::new(self.start, self.end.unwrap_or(self.start))
    }

    /// Mints a fresh node id with the resolved span. When the end was never
    /// marked it defaults to the end of the current token.
    fn finish(&self, parser: &mut Parser) -> (NodeId, Span) {
        let end = self
            .end
            .unwrap_or_else(|| parser.scanner.current_span().end());
        parser.fresh_node(Span::new(self.start, end))
    }
}

/// All mutable state of one parse.
///
/// One instance performs one parse over one token source; instances are
/// independent and not safe for concurrent use.
pub struct Parser {
    /// The token source.
    scanner: Scanner,
    /// The diagnostic sink.
    reporter: ErrorReporter,
    /// Parse configuration.
    config: ParserConfig,
    /// Current recursion depth; returns to 0 at every public entry exit.
    recursion_depth: usize,
    /// Set when a fatal error was absorbed at a recovery point and the
    /// parser is resynchronizing.
    in_recovery: bool,
    /// Set while parsing a modifier body (`_;` is only legal there).
    inside_modifier: bool,
    /// Source of node ids; monotonically increasing within the parse.
    next_node_id: u64,
}

impl Parser {
    /// Creates a parser over the given token source.
    #[must_use]
    pub fn new(scanner: Scanner, config: ParserConfig) -> Self {
        Self {
            scanner,
            reporter: ErrorReporter::new(),
            config,
            recursion_depth: 0,
            in_recovery: false,
            inside_modifier: false,
            next_node_id: 0,
        }
    }

    /// Parses the token source as a full source unit, consuming the parser.
    ///
    /// The unit is `None` exactly when a fatal error was not recovered
    /// from; the diagnostics are always returned.
    #[must_use]
    pub fn parse(mut self) -> (Option<SourceUnit>, Vec<Diagnostic>) {
        let result = self.parse_unit();
        let unit = self.firewall(result);
        (unit, self.reporter.into_diagnostics())
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// The kind of the token the scanner is stopped on.
    fn current(&self) -> &TokenKind {
        self.scanner.current()
    }

    /// Returns the current token's source location.
    fn current_span(&self) -> Span {
        self.scanner.current_span()
    }

    /// Moves forward one token.
    fn advance(&mut self) {
        self.scanner.advance();
    }

    /// Checks whether the current token has the same kind as `kind`,
    /// ignoring payloads.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(kind)
    }

    /// Returns the current token's literal text and advances.
    fn literal_and_advance(&mut self) -> EcoString {
        let literal = self.scanner.current_literal();
        self.advance();
        literal
    }

    /// Expects the current token to be `expected` and consumes it;
    /// otherwise raises fatal error 2314.
    fn expect_token(&mut self, expected: &TokenKind) -> ParseResult<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.fatal_expected(expected))
        }
    }

    /// Like [`Self::expect_token`] but leaves the token in place.
    fn check_token(&mut self, expected: &TokenKind) -> ParseResult<()> {
        if self.check(expected) {
            Ok(())
        } else {
            Err(self.fatal_expected(expected))
        }
    }

    /// Expects an identifier and returns its name and span.
    fn expect_identifier(&mut self) -> ParseResult<(EcoString, Span)> {
        if let TokenKind::Identifier(name) = self.current() {
            let name = name.clone();
            let span = self.current_span();
            self.advance();
            Ok((name, span))
        } else {
            Err(self.fatal_expected(&TokenKind::Identifier(EcoString::new())))
        }
    }

    fn fatal_expected(&mut self, expected: &TokenKind) -> FatalError {
        let message = format!("Expected '{expected}' but got '{}'", self.current());
        let span = self.current_span();
        self.reporter.fatal_parser_error(2314, span, message)
    }

    /// Error-recovery variant of [`Self::expect_token`]: consumes tokens
    /// until `expected` (or end of source) and reports where
    /// synchronization happened. Clears the in-recovery state on success.
    fn expect_token_or_consume_until(
        &mut self,
        expected: &TokenKind,
        context: &str,
    ) -> ParseResult<()> {
        debug_assert!(self.in_recovery, "only called while recovering");
        if self.check(expected) {
            let span = self.current_span();
            self.reporter
                .parser_error(4796, span, format!("Recovered in {context} at '{expected}'."));
            self.in_recovery = false;
            self.advance();
            return Ok(());
        }

        let error_span = Span::point(self.current_span().start());
        while !self.check(expected) && !self.current().is_eof() {
            self.advance();
        }
        if self.current().is_eof() {
            Err(self.reporter.fatal_parser_error(
                1957,
                error_span,
                format!("In {context}, '{expected}' is expected; got end of source."),
            ))
        } else {
            self.reporter.parser_error(
                6635,
                error_span,
                format!("In {context}, '{expected}' is expected; synchronized here."),
            );
            self.in_recovery = false;
            self.advance();
            Ok(())
        }
    }

    /// Decides whether a fatal error caught at a recovery point may be
    /// absorbed; re-raises it otherwise.
    fn enter_recovery(&mut self, fatal: FatalError) -> ParseResult<()> {
        if !self.reporter.has_errors()
            || !self.config.error_recovery
            || self.reporter.has_excessive_errors()
        {
            return Err(fatal);
        }
        self.in_recovery = true;
        Ok(())
    }

    // ========================================================================
    // Node Factory & Guards
    // ========================================================================

    /// Starts tracking a node at the current token.
    fn start_node(&self) -> NodeTracker {
        NodeTracker {
            start: self.current_span().start(),
            end: None,
        }
    }

    /// Starts tracking a node that inherits an already-parsed child's span.
    fn node_from_span(&self, span: Span) -> NodeTracker {
        NodeTracker {
            start: span.start(),
            end: Some(span.end()),
        }
    }

    /// Mints a fresh node id. Only reachable through [`NodeTracker::finish`]
    /// and the span-preserving rebuilds of the ambiguity resolver.
    fn fresh_node(&mut self, span: Span) -> (NodeId, Span) {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        (id, span)
    }

    /// Runs `f` with the recursion depth increased, raising fatal error
    /// 7319 when the depth limit would be exceeded. The depth is restored
    /// on every exit path.
    fn with_recursion_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            let span = self.current_span();
            return Err(self.reporter.fatal_parser_error(
                7319,
                span,
                "Maximum recursion depth reached during parsing.",
            ));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Reports a recoverable error at the current token.
    fn error(&mut self, code: u32, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.reporter.parser_error(code, span, message);
    }

    /// Reports a recoverable error at the given span.
    fn error_at(&mut self, code: u32, span: Span, message: impl Into<EcoString>) {
        self.reporter.parser_error(code, span, message);
    }

    /// Reports a warning at the current token.
    fn warning(&mut self, code: u32, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.reporter.parser_warning(code, span, message);
    }

    /// Records a fatal error at the current token and returns the
    /// unwinding marker.
    #[must_use]
    fn fatal(&mut self, code: u32, message: impl Into<EcoString>) -> FatalError {
        let span = self.current_span();
        self.reporter.fatal_parser_error(code, span, message)
    }

    /// Records a fatal error at the given span.
    #[must_use]
    fn fatal_at(&mut self, code: u32, span: Span, message: impl Into<EcoString>) -> FatalError {
        self.reporter.fatal_parser_error(code, span, message)
    }

    /// The top-level firewall: a fatal error is suppressed (yielding `None`)
    /// only when at least one diagnostic was recorded; a fatal with no
    /// diagnostic is an internal contract violation.
    fn firewall<T>(&mut self, result: ParseResult<T>) -> Option<T> {
        debug_assert_eq!(self.recursion_depth, 0, "recursion depth must return to 0");
        match result {
            Ok(value) => Some(value),
            Err(FatalError) => {
                assert!(
                    self.reporter.has_diagnostics(),
                    "fatal parse error with no diagnostic recorded"
                );
                None
            }
        }
    }

    // ========================================================================
    // Documentation
    // ========================================================================

    /// Builds a [`StructuredDocumentation`] node from the doc comment
    /// preceding the current token, if any.
    fn parse_structured_documentation(&mut self) -> Option<StructuredDocumentation> {
        let doc = self.scanner.current_doc_comment()?.clone();
        let (id, span) = self.fresh_node(doc.span);
        Some(StructuredDocumentation {
            id,
            span,
            text: doc.text,
        })
    }

    /// Returns the raw doc comment text preceding the current token
    /// (statement docstrings are plain strings, not nodes).
    fn current_doc_text(&self) -> Option<EcoString> {
        self.scanner
            .current_doc_comment()
            .map(|doc| doc.text.clone())
    }

    /// Parses an identifier into an [`Identifier`] node.
    fn parse_identifier_node(&mut self) -> ParseResult<Identifier> {
        self.with_recursion_guard(|parser| {
            let (name, span) = parser.expect_identifier()?;
            let (id, span) = parser.fresh_node(span);
            Ok(Identifier { id, span, name })
        })
    }

    // ========================================================================
    // License Scanning
    // ========================================================================

    /// Searches the regions of source not covered by any parsed top-level
    /// node for an SPDX license identifier. Exactly one match is attached
    /// to the unit; zero is warning 1878, more than one is error 3716.
    fn find_license_string(&mut self, nodes: &[SourceUnitPart]) -> Option<EcoString> {
        let source = self.scanner.source();
        let mut gaps: Vec<(usize, usize)> = vec![(0, source.len())];
        for node in nodes {
            let span = node.span();
            if span.has_text() {
                if let Some(last) = gaps.last_mut() {
                    last.1 = span.start() as usize;
                }
                gaps.push((span.end() as usize, source.len()));
            }
        }

        let mut matches: Vec<EcoString> = Vec::new();
        for (start, end) in gaps {
            let Some(region) = source.get(start..end) else {
                continue;
            };
            if let Some(captures) = license_regex().captures(region) {
                let license = captures[1].trim();
                if !license.is_empty() {
                    matches.push(EcoString::from(license));
                }
            }
        }

        match matches.len() {
            1 => return matches.pop(),
            0 => self.reporter.parser_warning(
                1878,
                Span::point(0),
                "SPDX license identifier not provided in source file. Before publishing, \
                 consider adding a comment containing \"SPDX-License-Identifier: <SPDX-License>\" \
                 to each source file. Use \"SPDX-License-Identifier: UNLICENSED\" for \
                 non-open-source code.",
            ),
            _ => self.reporter.parser_error(
                3716,
                Span::point(0),
                "Multiple SPDX license identifiers found in source file. Use \"AND\" or \"OR\" \
                 to combine multiple licenses.",
            ),
        }
        None
    }
}

fn license_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"SPDX-License-Identifier:\s*([A-Za-z0-9 ()+.\-]+)").expect("valid regex")
    })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    /// Parses a unit that must produce no errors (warnings are allowed;
    /// the license warning in particular fires for most test sources).
    pub(crate) fn parse_ok(source: &str) -> SourceUnit {
        let (unit, diagnostics) = parse_source_unit(source, &ParserConfig::default());
        let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
        assert!(errors.is_empty(), "Expected no errors, got: {errors:?}");
        unit.expect("unit is produced when no fatal error occurred")
    }

    /// Parses a unit expecting diagnostics; returns them together with the
    /// (possibly absent) unit.
    pub(crate) fn parse_err(source: &str) -> (Option<SourceUnit>, Vec<Diagnostic>) {
        parse_source_unit(source, &ParserConfig::default())
    }

    /// Returns the diagnostic codes recorded for the source, in order.
    pub(crate) fn diagnostic_codes(source: &str) -> Vec<u32> {
        let (_, diagnostics) = parse_source_unit(source, &ParserConfig::default());
        diagnostics.iter().map(|d| d.code).collect()
    }
}
