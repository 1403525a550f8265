// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for Solidity.
//!
//! Control-flow statements, blocks, try/catch, `emit`, inline assembly, the
//! `_` placeholder, and the resolver for the hardest ambiguity in the
//! grammar: whether `x.y.z[1][2] a;` declares a variable `a` of type
//! `x.y.z[1][2]` or `x.y.z[1][2] = 9;` assigns through an index access.
//!
//! The resolver parses the common prefix (an *index accessed path*: a
//! dotted identifier path or one elementary type, followed by `[…]`
//! segments) without committing, then rebuilds it as either a type name or
//! an expression once the next token decides the statement category.
//!
//! Blocks and statements are recovery points: with `error_recovery`
//! enabled, a fatal error resynchronizes to `}` or `;` respectively.

use ecow::EcoString;

use crate::ast::{
    ArrayTypeName, AsmBlock, Block, ElementaryTypeName, ElementaryTypeNameExpression,
    EmitStatement, Expression, ExpressionStatement, ForStatement, FunctionCall, IfStatement,
    IndexAccess, IndexRangeAccess, InlineAssembly, MemberAccess, ReturnStatement, TerminalStatement,
    Statement, TryCatchClause, TryStatement, TypeName, UserDefinedTypeName,
    VariableDeclarationStatement, WhileStatement,
};
use crate::source_analysis::{ParseResult, Span, TokenKind};

use super::declarations::VarDeclOptions;
use super::Parser;

/// What the one-token lookahead alone can say about a simple statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookAheadInfo {
    /// Definitely a variable declaration (`mapping`, `function`, a type
    /// followed by an identifier, …).
    VariableDeclaration,
    /// Definitely an expression.
    Expression,
    /// Undecidable yet: an identifier path or elementary type followed by
    /// `[` or `.` — parse the common prefix first.
    IndexAccessStructure,
}

/// The resolved statement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementIntent {
    VariableDeclaration,
    Expression,
}

/// One `[…]` segment of an index accessed path.
struct IapIndex {
    index: Option<Expression>,
    /// The end expression of a slice segment (`[start:end]`).
    end: Option<Expression>,
    is_slice: bool,
    span: Span,
}

/// The common prefix of a potential type name and a potential expression.
#[derive(Default)]
pub(super) struct IndexAccessedPath {
    /// Identifier nodes, or a single elementary-type-name expression.
    path: Vec<Expression>,
    indices: Vec<IapIndex>,
}

impl IndexAccessedPath {
    fn is_empty(&self) -> bool {
        debug_assert!(self.indices.is_empty() || !self.path.is_empty());
        self.path.is_empty()
    }
}

/// How a parsed statement relates to the trailing `;`.
enum StatementOutcome {
    /// Control-flow forms that carry their own terminator.
    Standalone(Statement),
    /// Forms that the caller terminates with `;`.
    NeedsSemicolon(Statement),
}

impl Parser {
    // ========================================================================
    // Blocks & Statement Dispatch
    // ========================================================================

    /// Parses a `{ … }` block. A recovery point: a fatal error inside
    /// resynchronizes to the closing `}` when recovery is enabled.
    pub(super) fn parse_block(&mut self, documentation: Option<EcoString>) -> ParseResult<Block> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::LBrace)?;
            let mut statements = Vec::new();
            let result = parser.parse_block_statements(&mut statements);
            if let Err(fatal) = result {
                parser.enter_recovery(fatal)?;
            }
            tracker.mark_end(parser);
            if parser.in_recovery {
                parser.expect_token_or_consume_until(&TokenKind::RBrace, "Block")?;
            } else {
                parser.expect_token(&TokenKind::RBrace)?;
            }
            let (id, span) = tracker.finish(parser);
            Ok(Block {
                id,
                span,
                documentation,
                statements,
            })
        })
    }

    fn parse_block_statements(&mut self, statements: &mut Vec<Statement>) -> ParseResult<()> {
        while !self.check(&TokenKind::RBrace) {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }
        Ok(())
    }

    /// Parses one statement. Returns `None` when the statement was consumed
    /// by error recovery.
    ///
    /// The doc comment preceding the statement's first token becomes its
    /// docstring.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        self.with_recursion_guard(|parser| {
            let documentation = parser.current_doc_text();
            let statement;
            match parser.parse_statement_dispatch(documentation) {
                Ok(StatementOutcome::Standalone(parsed)) => return Ok(Some(parsed)),
                Ok(StatementOutcome::NeedsSemicolon(parsed)) => statement = Some(parsed),
                Err(fatal) => {
                    parser.enter_recovery(fatal)?;
                    statement = None;
                }
            }
            if parser.in_recovery {
                parser.expect_token_or_consume_until(&TokenKind::Semicolon, "Statement")?;
            } else {
                parser.expect_token(&TokenKind::Semicolon)?;
            }
            Ok(statement)
        })
    }

    fn parse_statement_dispatch(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<StatementOutcome> {
        let token = self.current().clone();
        let outcome = match token {
            TokenKind::If => StatementOutcome::Standalone(Statement::If(Box::new(
                self.parse_if_statement(documentation)?,
            ))),
            TokenKind::While => StatementOutcome::Standalone(Statement::While(Box::new(
                self.parse_while_statement(documentation)?,
            ))),
            TokenKind::Do => StatementOutcome::Standalone(Statement::While(Box::new(
                self.parse_do_while_statement(documentation)?,
            ))),
            TokenKind::For => StatementOutcome::Standalone(Statement::For(Box::new(
                self.parse_for_statement(documentation)?,
            ))),
            TokenKind::LBrace => {
                StatementOutcome::Standalone(Statement::Block(self.parse_block(documentation)?))
            }
            TokenKind::Continue => {
                StatementOutcome::NeedsSemicolon(Statement::Continue(
                    self.terminal_statement_node(documentation),
                ))
            }
            TokenKind::Break => StatementOutcome::NeedsSemicolon(Statement::Break(
                self.terminal_statement_node(documentation),
            )),
            TokenKind::Return => {
                let mut tracker = self.start_node();
                self.advance();
                let mut expression = None;
                if !self.check(&TokenKind::Semicolon) {
                    let parsed = self.parse_expression()?;
                    tracker.set_end_from(parsed.span());
                    expression = Some(parsed);
                }
                let (id, span) = tracker.finish(self);
                StatementOutcome::NeedsSemicolon(Statement::Return(Box::new(ReturnStatement {
                    id,
                    span,
                    documentation,
                    expression,
                })))
            }
            TokenKind::Throw => StatementOutcome::NeedsSemicolon(Statement::Throw(
                self.terminal_statement_node(documentation),
            )),
            TokenKind::Try => StatementOutcome::Standalone(Statement::Try(Box::new(
                self.parse_try_statement(documentation)?,
            ))),
            TokenKind::Assembly => StatementOutcome::Standalone(Statement::InlineAssembly(
                self.parse_inline_assembly(documentation)?,
            )),
            TokenKind::Emit => StatementOutcome::NeedsSemicolon(Statement::Emit(Box::new(
                self.parse_emit_statement(documentation)?,
            ))),
            TokenKind::Identifier(ref name) if self.inside_modifier && name == "_" => {
                StatementOutcome::NeedsSemicolon(Statement::Placeholder(
                    self.terminal_statement_node(documentation),
                ))
            }
            _ => StatementOutcome::NeedsSemicolon(self.parse_simple_statement(documentation)?),
        };
        Ok(outcome)
    }

    /// Builds a childless statement node spanning the current token and
    /// consumes it.
    fn terminal_statement_node(&mut self, documentation: Option<EcoString>) -> TerminalStatement {
        let mut tracker = self.start_node();
        tracker.mark_end(self);
        let (id, span) = tracker.finish(self);
        self.advance();
        TerminalStatement {
            id,
            span,
            documentation,
        }
    }

    /// A statement used as a loop or branch body; recovery that consumed
    /// the statement leaves an empty block in its place.
    fn parse_body_statement(&mut self) -> ParseResult<Statement> {
        match self.parse_statement()? {
            Some(statement) => Ok(statement),
            None => {
                let mut tracker = self.start_node();
                tracker.set_empty();
                let (id, span) = tracker.finish(self);
                Ok(Statement::Block(Block {
                    id,
                    span,
                    documentation: None,
                    statements: Vec::new(),
                }))
            }
        }
    }

    // ========================================================================
    // Control Flow
    // ========================================================================

    fn parse_if_statement(&mut self, documentation: Option<EcoString>) -> ParseResult<IfStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::If)?;
            parser.expect_token(&TokenKind::LParen)?;
            let condition = parser.parse_expression()?;
            parser.expect_token(&TokenKind::RParen)?;
            let true_body = parser.parse_body_statement()?;
            let mut false_body = None;
            if parser.check(&TokenKind::Else) {
                parser.advance();
                let body = parser.parse_body_statement()?;
                tracker.set_end_from(body.span());
                false_body = Some(body);
            } else {
                tracker.set_end_from(true_body.span());
            }
            let (id, span) = tracker.finish(parser);
            Ok(IfStatement {
                id,
                span,
                documentation,
                condition,
                true_body,
                false_body,
            })
        })
    }

    fn parse_while_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<WhileStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::While)?;
            parser.expect_token(&TokenKind::LParen)?;
            let condition = parser.parse_expression()?;
            parser.expect_token(&TokenKind::RParen)?;
            let body = parser.parse_body_statement()?;
            tracker.set_end_from(body.span());
            let (id, span) = tracker.finish(parser);
            Ok(WhileStatement {
                id,
                span,
                documentation,
                condition,
                body,
                is_do_while: false,
            })
        })
    }

    fn parse_do_while_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<WhileStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Do)?;
            let body = parser.parse_body_statement()?;
            parser.expect_token(&TokenKind::While)?;
            parser.expect_token(&TokenKind::LParen)?;
            let condition = parser.parse_expression()?;
            parser.expect_token(&TokenKind::RParen)?;
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::Semicolon)?;
            let (id, span) = tracker.finish(parser);
            Ok(WhileStatement {
                id,
                span,
                documentation,
                condition,
                body,
                is_do_while: true,
            })
        })
    }

    /// Parses `for ( [init] ; [cond] ; [loop] ) body`; each header slot may
    /// be omitted.
    fn parse_for_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<ForStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::For)?;
            parser.expect_token(&TokenKind::LParen)?;

            let mut init = None;
            if !parser.check(&TokenKind::Semicolon) {
                init = Some(parser.parse_simple_statement(None)?);
            }
            parser.expect_token(&TokenKind::Semicolon)?;

            let mut condition = None;
            if !parser.check(&TokenKind::Semicolon) {
                condition = Some(parser.parse_expression()?);
            }
            parser.expect_token(&TokenKind::Semicolon)?;

            let mut loop_expression = None;
            if !parser.check(&TokenKind::RParen) {
                loop_expression = Some(parser.parse_expression_statement(None, None)?);
            }
            parser.expect_token(&TokenKind::RParen)?;

            let body = parser.parse_body_statement()?;
            tracker.set_end_from(body.span());
            let (id, span) = tracker.finish(parser);
            Ok(ForStatement {
                id,
                span,
                documentation,
                init,
                condition,
                loop_expression,
                body,
            })
        })
    }

    // ========================================================================
    // Try / Catch
    // ========================================================================

    /// Parses `try <call> [returns(…)] <block> catch … `; the success
    /// clause is synthesized with an empty error name.
    fn parse_try_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<TryStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Try)?;
            let external_call = parser.parse_expression()?;
            let mut clauses = Vec::new();

            let mut success_tracker = parser.start_node();
            let mut returns_parameters = None;
            if parser.check(&TokenKind::Returns) {
                parser.advance();
                let options = VarDeclOptions {
                    allow_empty_name: true,
                    allow_location: true,
                    ..VarDeclOptions::default()
                };
                returns_parameters = Some(parser.parse_parameter_list(options, false)?);
            }
            let success_block = parser.parse_block(None)?;
            success_tracker.set_end_from(success_block.span);
            let (success_id, success_span) = success_tracker.finish(parser);
            clauses.push(TryCatchClause {
                id: success_id,
                span: success_span,
                error_name: EcoString::new(),
                parameters: returns_parameters,
                block: success_block,
            });

            loop {
                clauses.push(parser.parse_catch_clause()?);
                if !parser.check(&TokenKind::Catch) {
                    break;
                }
            }
            let last_span = clauses.last().expect("at least the success clause").span;
            tracker.set_end_from(last_span);
            let (id, span) = tracker.finish(parser);
            Ok(TryStatement {
                id,
                span,
                documentation,
                external_call,
                clauses,
            })
        })
    }

    fn parse_catch_clause(&mut self) -> ParseResult<TryCatchClause> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Catch)?;
            let mut error_name = EcoString::new();
            let mut parameters = None;
            if !parser.check(&TokenKind::LBrace) {
                if matches!(parser.current(), TokenKind::Identifier(_)) {
                    let (name, _) = parser.expect_identifier()?;
                    error_name = name;
                }
                let options = VarDeclOptions {
                    allow_empty_name: true,
                    allow_location: true,
                    ..VarDeclOptions::default()
                };
                let allow_empty = !error_name.is_empty();
                parameters = Some(parser.parse_parameter_list(options, allow_empty)?);
            }
            let block = parser.parse_block(None)?;
            tracker.set_end_from(block.span);
            let (id, span) = tracker.finish(parser);
            Ok(TryCatchClause {
                id,
                span,
                error_name,
                parameters,
                block,
            })
        })
    }

    // ========================================================================
    // Emit & Inline Assembly
    // ========================================================================

    /// Parses `emit <dotted-path>( args );`.
    fn parse_emit_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<EmitStatement> {
        self.check_token(&TokenKind::Emit)?;
        let mut tracker = self.start_node();
        self.advance();
        let mut call_tracker = self.start_node();

        if !matches!(self.current(), TokenKind::Identifier(_)) {
            return Err(self.fatal(5620, "Expected event name or path."));
        }
        let mut iap = IndexAccessedPath::default();
        loop {
            iap.path
                .push(Expression::Identifier(self.parse_identifier_node()?));
            if !self.check(&TokenKind::Period) {
                break;
            }
            self.advance();
        }
        let event_name = self
            .expression_from_index_access_structure(iap)
            .expect("the event path is non-empty");
        self.expect_token(&TokenKind::LParen)?;

        let (arguments, names) = self.parse_function_call_arguments()?;
        call_tracker.mark_end(self);
        tracker.mark_end(self);
        self.expect_token(&TokenKind::RParen)?;

        let (call_id, call_span) = call_tracker.finish(self);
        let event_call = FunctionCall {
            id: call_id,
            span: call_span,
            expression: event_name,
            arguments,
            names,
        };
        let (id, span) = tracker.finish(self);
        Ok(EmitStatement {
            id,
            span,
            documentation,
            event_call,
        })
    }

    /// Parses `assembly ["evmasm"] { … }`, wrapping the dialect block
    /// opaquely; its grammar belongs to the assembly sub-parser.
    fn parse_inline_assembly(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<InlineAssembly> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Assembly)?;
            let dialect = EcoString::from("evmasm");
            if matches!(parser.current(), TokenKind::StringLiteral(_)) {
                if parser.scanner.current_literal() != "evmasm" {
                    return Err(parser.fatal(4531, "Only \"evmasm\" supported."));
                }
                parser.advance();
            }
            let block = parser.parse_asm_block()?;
            tracker.set_end_from(block.span);
            let (id, span) = tracker.finish(parser);
            Ok(InlineAssembly {
                id,
                span,
                documentation,
                dialect,
                block,
            })
        })
    }

    /// Captures the raw extent of a balanced `{ … }` assembly block.
    fn parse_asm_block(&mut self) -> ParseResult<AsmBlock> {
        let start_span = self.current_span();
        self.check_token(&TokenKind::LBrace)?;
        let mut depth = 0usize;
        loop {
            match self.current() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => return Err(self.fatal_expected(&TokenKind::RBrace)),
                _ => {}
            }
            self.advance();
        }
        let end_span = self.current_span();
        self.advance(); // the closing `}`
        let span = Span::new(start_span.start(), end_span.end());
        let raw = EcoString::from(&self.scanner.source()[span.as_range()]);
        Ok(AsmBlock { span, raw })
    }

    // ========================================================================
    // Simple Statements & the Ambiguity Resolver
    // ========================================================================

    /// Parses a simple statement: a variable declaration, an expression
    /// statement, or the parenthesized tuple form of either.
    fn parse_simple_statement(
        &mut self,
        documentation: Option<EcoString>,
    ) -> ParseResult<Statement> {
        self.with_recursion_guard(|parser| {
            if !parser.check(&TokenKind::LParen) {
                let (intent, iap) = parser.try_parse_index_accessed_path()?;
                return match intent {
                    StatementIntent::VariableDeclaration => {
                        let lookahead = parser.type_name_from_index_access_structure(iap);
                        Ok(Statement::VariableDeclaration(Box::new(
                            parser.parse_variable_declaration_statement(documentation, lookahead)?,
                        )))
                    }
                    StatementIntent::Expression => {
                        let partial = parser.expression_from_index_access_structure(iap);
                        Ok(Statement::Expression(Box::new(
                            parser.parse_expression_statement(documentation, partial)?,
                        )))
                    }
                };
            }

            // Leading `(`: first consume all empty components from stray
            // commas, then resolve the first non-empty one.
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::LParen)?;
            let mut empty_components = 0usize;
            while parser.check(&TokenKind::Comma) {
                parser.advance();
                empty_components += 1;
            }

            let (intent, iap) = parser.try_parse_index_accessed_path()?;
            match intent {
                StatementIntent::VariableDeclaration => {
                    // Already consumed something like `(,,,a.b.c[2][3]`.
                    let options = VarDeclOptions {
                        allow_location: true,
                        ..VarDeclOptions::default()
                    };
                    let mut declarations: Vec<_> = (0..empty_components).map(|_| None).collect();
                    let lookahead = parser.type_name_from_index_access_structure(iap);
                    declarations
                        .push(Some(parser.parse_variable_declaration(options, lookahead)?));
                    while !parser.check(&TokenKind::RParen) {
                        parser.expect_token(&TokenKind::Comma)?;
                        if parser.check(&TokenKind::Comma) || parser.check(&TokenKind::RParen) {
                            declarations.push(None);
                        } else {
                            declarations
                                .push(Some(parser.parse_variable_declaration(options, None)?));
                        }
                    }
                    parser.expect_token(&TokenKind::RParen)?;
                    parser.expect_token(&TokenKind::Assign)?;
                    let value = parser.parse_expression()?;
                    tracker.set_end_from(value.span());
                    let (id, span) = tracker.finish(parser);
                    Ok(Statement::VariableDeclaration(Box::new(
                        VariableDeclarationStatement {
                            id,
                            span,
                            documentation,
                            declarations,
                            initial_value: Some(value),
                        },
                    )))
                }
                StatementIntent::Expression => {
                    let mut components: Vec<Option<Expression>> =
                        (0..empty_components).map(|_| None).collect();
                    let partial = parser.expression_from_index_access_structure(iap);
                    components.push(Some(parser.parse_expression_with(partial)?));
                    while !parser.check(&TokenKind::RParen) {
                        parser.expect_token(&TokenKind::Comma)?;
                        if parser.check(&TokenKind::Comma) || parser.check(&TokenKind::RParen) {
                            components.push(None);
                        } else {
                            components.push(Some(parser.parse_expression()?));
                        }
                    }
                    tracker.mark_end(parser);
                    parser.expect_token(&TokenKind::RParen)?;
                    let (id, span) = tracker.finish(parser);
                    let tuple = Expression::Tuple(crate::ast::TupleExpression {
                        id,
                        span,
                        components,
                        is_array: false,
                    });
                    Ok(Statement::Expression(Box::new(
                        parser.parse_expression_statement(documentation, Some(tuple))?,
                    )))
                }
            }
        })
    }

    fn parse_variable_declaration_statement(
        &mut self,
        documentation: Option<EcoString>,
        lookahead_type: Option<TypeName>,
    ) -> ParseResult<VariableDeclarationStatement> {
        self.with_recursion_guard(|parser| {
            let mut tracker = match &lookahead_type {
                Some(type_name) => parser.node_from_span(type_name.span()),
                None => parser.start_node(),
            };
            let options = VarDeclOptions {
                allow_location: true,
                ..VarDeclOptions::default()
            };
            let first = parser.parse_variable_declaration(options, lookahead_type)?;
            tracker.set_end_from(first.span);
            let declarations = vec![Some(first)];

            let mut initial_value = None;
            if parser.check(&TokenKind::Assign) {
                parser.advance();
                let value = parser.parse_expression()?;
                tracker.set_end_from(value.span());
                initial_value = Some(value);
            }
            let (id, span) = tracker.finish(parser);
            Ok(VariableDeclarationStatement {
                id,
                span,
                documentation,
                declarations,
                initial_value,
            })
        })
    }

    pub(super) fn parse_expression_statement(
        &mut self,
        documentation: Option<EcoString>,
        partial: Option<Expression>,
    ) -> ParseResult<ExpressionStatement> {
        self.with_recursion_guard(|parser| {
            let expression = parser.parse_expression_with(partial)?;
            let (id, span) = parser.fresh_node(expression.span());
            Ok(ExpressionStatement {
                id,
                span,
                documentation,
                expression,
            })
        })
    }

    /// What the current and next token alone say about the statement
    /// category.
    fn peek_statement_type(&self) -> LookAheadInfo {
        // A variable declaration starts with a keyword that is definitely a
        // type (`mapping`, `function`), or with a type-like token whose
        // follower commits one way or the other. An identifier followed by
        // `[` or `.` can still be both (`lib.type[9] a;` declares,
        // `variable.el[9] = 7;` assigns).
        let token = self.current();
        let might_be_type_name =
            token.is_elementary_type() || matches!(token, TokenKind::Identifier(_));

        if matches!(token, TokenKind::Mapping | TokenKind::Function) {
            return LookAheadInfo::VariableDeclaration;
        }
        if might_be_type_name {
            let next = self.scanner.peek();
            // `address payable` only occurs in variable declarations; type
            // expressions of the form `address payable;` stay rejected.
            if token.is_elementary_type() && next.is_state_mutability_specifier() {
                return LookAheadInfo::VariableDeclaration;
            }
            if matches!(next, TokenKind::Identifier(_)) || next.is_location_specifier() {
                return LookAheadInfo::VariableDeclaration;
            }
            if matches!(next, TokenKind::LBrack | TokenKind::Period) {
                return LookAheadInfo::IndexAccessStructure;
            }
        }
        LookAheadInfo::Expression
    }

    /// Resolves the declaration/expression ambiguity.
    ///
    /// When one token of lookahead already decides, returns an empty path;
    /// otherwise parses the index accessed path and classifies by what
    /// follows it: an identifier or location specifier means a declaration.
    fn try_parse_index_accessed_path(
        &mut self,
    ) -> ParseResult<(StatementIntent, IndexAccessedPath)> {
        match self.peek_statement_type() {
            LookAheadInfo::VariableDeclaration => {
                return Ok((
                    StatementIntent::VariableDeclaration,
                    IndexAccessedPath::default(),
                ));
            }
            LookAheadInfo::Expression => {
                return Ok((StatementIntent::Expression, IndexAccessedPath::default()));
            }
            LookAheadInfo::IndexAccessStructure => {}
        }

        let iap = self.parse_index_accessed_path()?;
        if matches!(self.current(), TokenKind::Identifier(_))
            || self.current().is_location_specifier()
        {
            Ok((StatementIntent::VariableDeclaration, iap))
        } else {
            Ok((StatementIntent::Expression, iap))
        }
    }

    /// Parses `(Identifier ("." Identifier)* | ElementaryTypeName)
    /// ("[" expr? (":" expr?)? "]")*` without committing to a category.
    fn parse_index_accessed_path(&mut self) -> ParseResult<IndexAccessedPath> {
        let mut iap = IndexAccessedPath::default();
        if matches!(self.current(), TokenKind::Identifier(_)) {
            iap.path
                .push(Expression::Identifier(self.parse_identifier_node()?));
            while self.check(&TokenKind::Period) {
                self.advance();
                iap.path
                    .push(Expression::Identifier(self.parse_identifier_node()?));
            }
        } else {
            let TokenKind::Elementary(elem) = self.current().clone() else {
                return Err(self.fatal(6933, "Expected primary expression."));
            };
            let type_span = self.current_span();
            let (type_id, type_span) = self.fresh_node(type_span);
            let elementary = ElementaryTypeName {
                id: type_id,
                span: type_span,
                name: elem,
                state_mutability: None,
            };
            let (expr_id, expr_span) = self.fresh_node(type_span);
            iap.path.push(Expression::ElementaryTypeNameExpression(
                ElementaryTypeNameExpression {
                    id: expr_id,
                    span: expr_span,
                    type_name: elementary,
                },
            ));
            self.advance();
        }

        while self.check(&TokenKind::LBrack) {
            self.expect_token(&TokenKind::LBrack)?;
            let mut index = None;
            if !self.check(&TokenKind::RBrack) && !self.check(&TokenKind::Colon) {
                index = Some(self.parse_expression()?);
            }
            let path_start = iap
                .path
                .first()
                .expect("the path is parsed before its indices")
                .span()
                .start();
            if self.check(&TokenKind::Colon) {
                self.expect_token(&TokenKind::Colon)?;
                let mut end = None;
                if !self.check(&TokenKind::RBrack) {
                    end = Some(self.parse_expression()?);
                }
                let span = Span::new(path_start, self.current_span().end());
                iap.indices.push(IapIndex {
                    index,
                    end,
                    is_slice: true,
                    span,
                });
                self.expect_token(&TokenKind::RBrack)?;
            } else {
                let span = Span::new(path_start, self.current_span().end());
                iap.indices.push(IapIndex {
                    index,
                    end: None,
                    is_slice: false,
                    span,
                });
                self.expect_token(&TokenKind::RBrack)?;
            }
        }
        Ok(iap)
    }

    /// Rebuilds an index accessed path as a type name: the identifier path
    /// becomes a user-defined type (or the elementary type is kept), and
    /// every index segment wraps it in an array type. A slice segment
    /// cannot be an array length (error 5464).
    fn type_name_from_index_access_structure(
        &mut self,
        iap: IndexAccessedPath,
    ) -> Option<TypeName> {
        if iap.is_empty() {
            return None;
        }
        let first_span = iap.path.first()?.span();
        let last_span = iap.path.last()?.span();
        let path_span = Span::new(first_span.start(), last_span.end());

        let mut type_name = match iap.path.first() {
            Some(Expression::ElementaryTypeNameExpression(elem)) if iap.path.len() == 1 => {
                let (id, span) = self.fresh_node(path_span);
                TypeName::Elementary(ElementaryTypeName {
                    id,
                    span,
                    name: elem.type_name.name,
                    state_mutability: None,
                })
            }
            _ => {
                let path = iap
                    .path
                    .iter()
                    .filter_map(|expr| match expr {
                        Expression::Identifier(identifier) => Some(identifier.name.clone()),
                        _ => None,
                    })
                    .collect();
                let (id, span) = self.fresh_node(path_span);
                TypeName::UserDefined(UserDefinedTypeName { id, span, path })
            }
        };
        for segment in iap.indices {
            if segment.is_slice {
                self.error_at(5464, segment.span, "Expected array length expression.");
            }
            let (id, span) = self.fresh_node(segment.span);
            type_name = TypeName::Array(Box::new(ArrayTypeName {
                id,
                span,
                base_type: type_name,
                length: segment.index,
            }));
        }
        Some(type_name)
    }

    /// Rebuilds an index accessed path as an expression: the path becomes a
    /// member-access chain and every segment an index or index-range
    /// access.
    fn expression_from_index_access_structure(
        &mut self,
        iap: IndexAccessedPath,
    ) -> Option<Expression> {
        if iap.is_empty() {
            return None;
        }
        let mut parts = iap.path.into_iter();
        let mut expression = parts.next()?;
        let start = expression.span().start();
        for part in parts {
            let member_name = match &part {
                Expression::Identifier(identifier) => identifier.name.clone(),
                _ => continue,
            };
            let (id, span) = self.fresh_node(Span::new(start, part.span().end()));
            expression = Expression::MemberAccess(Box::new(MemberAccess {
                id,
                span,
                expression,
                member_name,
            }));
        }
        for segment in iap.indices {
            let (id, span) = self.fresh_node(segment.span);
            expression = if segment.is_slice {
                Expression::IndexRangeAccess(Box::new(IndexRangeAccess {
                    id,
                    span,
                    base: expression,
                    start: segment.index,
                    end: segment.end,
                }))
            } else {
                Expression::IndexAccess(Box::new(IndexAccess {
                    id,
                    span,
                    base: expression,
                    index: segment.index,
                }))
            };
        }
        Some(expression)
    }
}
