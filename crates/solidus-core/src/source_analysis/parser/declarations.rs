// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for Solidity.
//!
//! This module handles the source-unit level dispatch and everything that
//! can appear in a contract body:
//!
//! - Pragma and import directives (including the version-pragma check)
//! - Contract / interface / library definitions with inheritance
//! - Struct, enum, event, modifier, and using-for declarations
//! - Function definitions and the shared function header
//! - Variable declarations with their specifier loop
//!
//! The contract body is a recovery point: with `error_recovery` enabled, a
//! fatal error inside it resynchronizes to the closing `}`.

use ecow::EcoString;

use crate::ast::{
    ContractDefinition, ContractKind, ContractPart, DataLocation, EnumDefinition, EnumValue,
    EventDefinition, FunctionDefinition, FunctionKind, ImportDirective, InheritanceSpecifier,
    ModifierDefinition, ModifierInvocation, Mutability, OverrideSpecifier, ParameterList,
    PragmaDirective, SourceUnit, SourceUnitPart, StateMutability, StructDefinition,
    StructuredDocumentation, SymbolAlias, TypeName, UsingForDirective, VariableDeclaration,
    Visibility,
};
use crate::source_analysis::version::{pragma_matches, InvalidVersionPragma};
use crate::source_analysis::{ParseResult, Span, TokenKind};

use super::Parser;

/// Options controlling which pieces a variable declaration may carry.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct VarDeclOptions {
    /// Allow the `indexed` specifier (event parameters).
    pub(super) allow_indexed: bool,
    /// Allow the name to be omitted (parameters).
    pub(super) allow_empty_name: bool,
    /// Allow `= <expr>` initializers (state variables, locals).
    pub(super) allow_initial_value: bool,
    /// Allow `storage` / `memory` / `calldata`.
    pub(super) allow_location: bool,
    /// The declaration is a state variable.
    pub(super) is_state_variable: bool,
}

/// The pieces shared between function definitions and function types.
pub(super) struct FunctionHeader {
    pub(super) visibility: Visibility,
    pub(super) state_mutability: StateMutability,
    pub(super) parameters: ParameterList,
    pub(super) modifiers: Vec<ModifierInvocation>,
    pub(super) overrides: Option<OverrideSpecifier>,
    pub(super) is_virtual: bool,
    pub(super) return_parameters: ParameterList,
}

impl Parser {
    // ========================================================================
    // Source Unit
    // ========================================================================

    /// Parses a full source unit: directives and top-level definitions until
    /// end of source, then the license scan over the unparsed regions.
    pub(super) fn parse_unit(&mut self) -> ParseResult<SourceUnit> {
        debug_assert!(!self.inside_modifier);
        let tracker = self.start_node();
        let mut nodes = Vec::new();
        while !self.current().is_eof() {
            match self.current() {
                TokenKind::Pragma => {
                    nodes.push(SourceUnitPart::Pragma(self.parse_pragma_directive()?));
                }
                TokenKind::Import => {
                    nodes.push(SourceUnitPart::Import(self.parse_import_directive()?));
                }
                TokenKind::Abstract
                | TokenKind::Interface
                | TokenKind::Contract
                | TokenKind::Library => {
                    nodes.push(SourceUnitPart::Contract(self.parse_contract_definition()?));
                }
                TokenKind::Struct => {
                    nodes.push(SourceUnitPart::Struct(self.parse_struct_definition()?));
                }
                TokenKind::Enum => {
                    nodes.push(SourceUnitPart::Enum(self.parse_enum_definition()?));
                }
                TokenKind::Function => {
                    nodes.push(SourceUnitPart::Function(self.parse_function_definition(true)?));
                }
                _ => {
                    return Err(self.fatal(
                        7858,
                        "Expected pragma, import directive or contract/interface/library/\
                         struct/enum/function definition.",
                    ));
                }
            }
        }
        debug_assert_eq!(self.recursion_depth, 0);
        let license = self.find_license_string(&nodes);
        let (id, span) = tracker.finish(self);
        Ok(SourceUnit {
            id,
            span,
            license,
            nodes,
        })
    }

    // ========================================================================
    // Directives
    // ========================================================================

    /// Parses `pragma anything* ;`, recording `(kind, literal)` pairs.
    ///
    /// A `pragma solidity …;` directive additionally has its version match
    /// expression checked against the configured compiler version.
    fn parse_pragma_directive(&mut self) -> ParseResult<PragmaDirective> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Pragma)?;
            let mut tokens = Vec::new();
            let mut literals = Vec::new();
            loop {
                let token = parser.current().clone();
                if matches!(token, TokenKind::Illegal(_)) {
                    parser.error(
                        6281,
                        "Token incompatible with Solidity parser as part of pragma directive.",
                    );
                } else {
                    let mut literal = parser.scanner.current_literal();
                    if literal.is_empty() {
                        literal = EcoString::from(token.to_string());
                    }
                    literals.push(literal);
                    tokens.push(token);
                }
                parser.advance();
                if parser.check(&TokenKind::Semicolon) || parser.current().is_eof() {
                    break;
                }
            }
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::Semicolon)?;

            if literals.len() >= 2 && literals[0] == "solidity" {
                parser.parse_pragma_version(tracker.span(), &literals[1..])?;
            }

            let (id, span) = tracker.finish(parser);
            Ok(PragmaDirective {
                id,
                span,
                tokens,
                literals,
            })
        })
    }

    /// Checks the version match expression of a `pragma solidity` directive.
    ///
    /// A mismatch is fatal unless recovery is engaged, in which case a later
    /// pass rediscovers it.
    fn parse_pragma_version(&mut self, span: Span, literals: &[EcoString]) -> ParseResult<()> {
        match pragma_matches(literals, &self.config.compiler_version) {
            Ok(true) => Ok(()),
            Ok(false) => {
                if self.config.error_recovery {
                    Ok(())
                } else {
                    Err(self.fatal_at(
                        5333,
                        span,
                        format!(
                            "Source file requires different compiler version (current \
                             compiler is {}) - note that nightly builds are considered to be \
                             strictly less than the released version",
                            self.config.compiler_version
                        ),
                    ))
                }
            }
            Err(InvalidVersionPragma) => {
                self.error_at(1684, span, "Found version pragma, but failed to parse it.");
                Ok(())
            }
        }
    }

    /// Parses an import directive in any of its three forms:
    ///
    /// ```text
    /// import "path" [as x];
    /// import {a [as b], c} from "path";
    /// import * as x from "path";
    /// ```
    fn parse_import_directive(&mut self) -> ParseResult<ImportDirective> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Import)?;
            let path;
            let mut unit_alias = EcoString::new();
            let mut symbol_aliases = Vec::new();

            if matches!(parser.current(), TokenKind::StringLiteral(_)) {
                path = parser.literal_and_advance();
                if parser.check(&TokenKind::As) {
                    parser.advance();
                    let (alias, _) = parser.expect_identifier()?;
                    unit_alias = alias;
                }
            } else {
                if parser.check(&TokenKind::LBrace) {
                    parser.advance();
                    loop {
                        let symbol = parser.parse_identifier_node()?;
                        let mut alias = None;
                        let mut alias_span = symbol.span;
                        if parser.check(&TokenKind::As) {
                            parser.expect_token(&TokenKind::As)?;
                            alias_span = parser.current_span();
                            let (name, _) = parser.expect_identifier()?;
                            alias = Some(name);
                        }
                        symbol_aliases.push(SymbolAlias {
                            symbol,
                            alias,
                            alias_span,
                        });
                        if !parser.check(&TokenKind::Comma) {
                            break;
                        }
                        parser.advance();
                    }
                    parser.expect_token(&TokenKind::RBrace)?;
                } else if parser.check(&TokenKind::Mul) {
                    parser.advance();
                    parser.expect_token(&TokenKind::As)?;
                    let (alias, _) = parser.expect_identifier()?;
                    unit_alias = alias;
                } else {
                    return Err(parser.fatal(
                        9478,
                        "Expected string literal (path), \"*\" or alias list.",
                    ));
                }
                // "from" is not a keyword but parsed as an identifier because
                // it is a really common word.
                if !matches!(parser.current(), TokenKind::Identifier(name) if name == "from") {
                    return Err(parser.fatal(8208, "Expected \"from\"."));
                }
                parser.advance();
                if !matches!(parser.current(), TokenKind::StringLiteral(_)) {
                    return Err(parser.fatal(6845, "Expected import path."));
                }
                path = parser.literal_and_advance();
            }
            if path.is_empty() {
                return Err(parser.fatal(6326, "Import path cannot be empty."));
            }
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::Semicolon)?;
            let (id, span) = tracker.finish(parser);
            Ok(ImportDirective {
                id,
                span,
                path,
                unit_alias,
                symbol_aliases,
            })
        })
    }

    // ========================================================================
    // Contract Definitions
    // ========================================================================

    /// Parses the optional `abstract` flag and the contract kind keyword.
    fn parse_contract_kind(&mut self) -> (ContractKind, bool) {
        let mut is_abstract = false;
        if self.check(&TokenKind::Abstract) {
            is_abstract = true;
            self.advance();
        }
        let kind = match self.current() {
            TokenKind::Interface => ContractKind::Interface,
            TokenKind::Contract => ContractKind::Contract,
            TokenKind::Library => ContractKind::Library,
            _ => {
                self.error(
                    3515,
                    "Expected keyword \"contract\", \"interface\" or \"library\".",
                );
                return (ContractKind::Contract, is_abstract);
            }
        };
        self.advance();
        (kind, is_abstract)
    }

    /// Parses a contract, interface, or library definition.
    ///
    /// The body is a recovery point: a fatal error inside it sets the
    /// in-recovery state and resynchronizes to `}` when recovery is enabled.
    pub(super) fn parse_contract_definition(&mut self) -> ParseResult<ContractDefinition> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let mut documentation = None;
            let mut kind = (ContractKind::Contract, false);
            let mut name = EcoString::new();
            let mut base_contracts = Vec::new();
            let mut nodes = Vec::new();

            let body = parser.parse_contract_header_and_body(
                &mut documentation,
                &mut kind,
                &mut name,
                &mut base_contracts,
                &mut nodes,
            );
            if let Err(fatal) = body {
                parser.enter_recovery(fatal)?;
            }
            tracker.mark_end(parser);
            if parser.in_recovery {
                parser.expect_token_or_consume_until(&TokenKind::RBrace, "ContractDefinition")?;
            } else {
                parser.expect_token(&TokenKind::RBrace)?;
            }
            let (id, span) = tracker.finish(parser);
            Ok(ContractDefinition {
                id,
                span,
                name,
                kind: kind.0,
                is_abstract: kind.1,
                documentation,
                base_contracts,
                nodes,
            })
        })
    }

    /// The fallible section of a contract definition. Progress is written
    /// through the out-parameters so a recovered parse keeps what was built.
    fn parse_contract_header_and_body(
        &mut self,
        documentation: &mut Option<StructuredDocumentation>,
        kind: &mut (ContractKind, bool),
        name: &mut EcoString,
        base_contracts: &mut Vec<InheritanceSpecifier>,
        nodes: &mut Vec<ContractPart>,
    ) -> ParseResult<()> {
        *documentation = self.parse_structured_documentation();
        *kind = self.parse_contract_kind();
        let (parsed_name, _) = self.expect_identifier()?;
        *name = parsed_name;

        if self.check(&TokenKind::Is) {
            loop {
                self.advance(); // `is` or `,`
                base_contracts.push(self.parse_inheritance_specifier()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_token(&TokenKind::LBrace)?;
        loop {
            let token = self.current().clone();
            match token {
                TokenKind::RBrace => break,
                // `function (` is a state variable of function type, handled
                // below with the other variable declarations.
                TokenKind::Function if !matches!(self.scanner.peek(), TokenKind::LParen) => {
                    nodes.push(ContractPart::Function(self.parse_function_definition(false)?));
                }
                TokenKind::Constructor | TokenKind::Receive | TokenKind::Fallback => {
                    nodes.push(ContractPart::Function(self.parse_function_definition(false)?));
                }
                TokenKind::Struct => {
                    nodes.push(ContractPart::Struct(self.parse_struct_definition()?));
                }
                TokenKind::Enum => {
                    nodes.push(ContractPart::Enum(self.parse_enum_definition()?));
                }
                TokenKind::Identifier(_)
                | TokenKind::Mapping
                | TokenKind::Elementary(_)
                | TokenKind::Function => {
                    let options = VarDeclOptions {
                        is_state_variable: true,
                        allow_initial_value: true,
                        ..VarDeclOptions::default()
                    };
                    nodes.push(ContractPart::Variable(
                        self.parse_variable_declaration(options, None)?,
                    ));
                    self.expect_token(&TokenKind::Semicolon)?;
                }
                TokenKind::Modifier => {
                    nodes.push(ContractPart::Modifier(self.parse_modifier_definition()?));
                }
                TokenKind::Event => {
                    nodes.push(ContractPart::Event(self.parse_event_definition()?));
                }
                TokenKind::Using => {
                    nodes.push(ContractPart::Using(self.parse_using_directive()?));
                }
                _ => {
                    return Err(self.fatal(
                        9182,
                        "Function, variable, struct or modifier declaration expected.",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parses one base of an `is` list, with optional constructor arguments.
    fn parse_inheritance_specifier(&mut self) -> ParseResult<InheritanceSpecifier> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let name = parser.parse_user_defined_type_name()?;
            let mut arguments = None;
            if parser.check(&TokenKind::LParen) {
                parser.advance();
                arguments = Some(parser.parse_function_call_list_arguments()?);
                tracker.mark_end(parser);
                parser.expect_token(&TokenKind::RParen)?;
            } else {
                tracker.set_end_from(name.span);
            }
            let (id, span) = tracker.finish(parser);
            Ok(InheritanceSpecifier {
                id,
                span,
                name,
                arguments,
            })
        })
    }

    // ========================================================================
    // Specifiers
    // ========================================================================

    /// Consumes the current visibility token. Callers check
    /// [`TokenKind::is_visibility_specifier`] first.
    pub(super) fn parse_visibility_specifier(&mut self) -> Visibility {
        let visibility = match self.current() {
            TokenKind::Public => Visibility::Public,
            TokenKind::Internal => Visibility::Internal,
            TokenKind::Private => Visibility::Private,
            TokenKind::External => Visibility::External,
            _ => {
                debug_assert!(false, "caller checks for a visibility specifier");
                Visibility::Default
            }
        };
        self.advance();
        visibility
    }

    /// Consumes the current state-mutability token. Callers check
    /// [`TokenKind::is_state_mutability_specifier`] first.
    pub(super) fn parse_state_mutability(&mut self) -> StateMutability {
        let mutability = match self.current() {
            TokenKind::Payable => StateMutability::Payable,
            TokenKind::View => StateMutability::View,
            TokenKind::Pure => StateMutability::Pure,
            _ => {
                debug_assert!(false, "caller checks for a state mutability specifier");
                StateMutability::NonPayable
            }
        };
        self.advance();
        mutability
    }

    /// Parses `override` or `override(Base1, Base2)`.
    fn parse_override_specifier(&mut self) -> ParseResult<OverrideSpecifier> {
        debug_assert!(self.check(&TokenKind::Override));
        let mut tracker = self.start_node();
        let mut overrides = Vec::new();

        tracker.mark_end(self);
        self.advance();

        if self.check(&TokenKind::LParen) {
            self.advance();
            loop {
                overrides.push(self.parse_user_defined_type_name()?);
                if self.check(&TokenKind::RParen) {
                    break;
                }
                self.expect_token(&TokenKind::Comma)?;
            }
            tracker.mark_end(self);
            self.expect_token(&TokenKind::RParen)?;
        }

        let (id, span) = tracker.finish(self);
        Ok(OverrideSpecifier {
            id,
            span,
            overrides,
        })
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parses the function header shared by function definitions and
    /// function types: parameters, then any of modifier invocations,
    /// visibility, state mutability, `override`, `virtual` (each at most
    /// once), then the optional `returns` list.
    pub(super) fn parse_function_header(
        &mut self,
        is_state_variable: bool,
    ) -> ParseResult<FunctionHeader> {
        self.with_recursion_guard(|parser| {
            let options = VarDeclOptions {
                allow_location: true,
                ..VarDeclOptions::default()
            };
            let parameters = parser.parse_parameter_list(options, true)?;

            let mut visibility = Visibility::Default;
            let mut state_mutability = StateMutability::NonPayable;
            let mut modifiers = Vec::new();
            let mut overrides: Option<OverrideSpecifier> = None;
            let mut is_virtual = false;

            loop {
                let token = self_token(parser);
                if !is_state_variable && matches!(token, TokenKind::Identifier(_)) {
                    modifiers.push(parser.parse_modifier_invocation()?);
                } else if token.is_visibility_specifier() {
                    if visibility != Visibility::Default {
                        // A public state variable of function type ends its
                        // type at `external` / `internal`; the trailing
                        // visibility belongs to the variable.
                        if is_state_variable
                            && (visibility == Visibility::External
                                || visibility == Visibility::Internal)
                        {
                            break;
                        }
                        parser.error(
                            9439,
                            format!(
                                "Visibility already specified as \"{}\".",
                                visibility.as_str()
                            ),
                        );
                        parser.advance();
                    } else {
                        visibility = parser.parse_visibility_specifier();
                    }
                } else if token.is_state_mutability_specifier() {
                    if state_mutability != StateMutability::NonPayable {
                        parser.error(
                            9680,
                            format!(
                                "State mutability already specified as \"{}\".",
                                state_mutability.as_str()
                            ),
                        );
                        parser.advance();
                    } else {
                        state_mutability = parser.parse_state_mutability();
                    }
                } else if !is_state_variable && token == TokenKind::Override {
                    if overrides.is_some() {
                        parser.error(1827, "Override already specified.");
                    }
                    overrides = Some(parser.parse_override_specifier()?);
                } else if !is_state_variable && token == TokenKind::Virtual {
                    if is_virtual {
                        parser.error(6879, "Virtual already specified.");
                    }
                    is_virtual = true;
                    parser.advance();
                } else {
                    break;
                }
            }

            let return_parameters = if parser.check(&TokenKind::Returns) {
                parser.advance();
                let permit_empty = false;
                parser.parse_parameter_list(options, permit_empty)?
            } else {
                parser.create_empty_parameter_list()
            };

            Ok(FunctionHeader {
                visibility,
                state_mutability,
                parameters,
                modifiers,
                overrides,
                is_virtual,
                return_parameters,
            })
        })
    }

    /// Parses a function, constructor, fallback, or receive definition.
    ///
    /// Naming a `function` with one of the reserved kind identifiers still
    /// produces a function node (best effort), with error 3323 for
    /// `constructor` and warning 3445 for `fallback` / `receive`.
    pub(super) fn parse_function_definition(
        &mut self,
        free_function: bool,
    ) -> ParseResult<FunctionDefinition> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let documentation = parser.parse_structured_documentation();

            let mut name = EcoString::new();
            let kind = match parser.current() {
                TokenKind::Constructor => {
                    parser.advance();
                    FunctionKind::Constructor
                }
                TokenKind::Fallback => {
                    parser.advance();
                    FunctionKind::Fallback
                }
                TokenKind::Receive => {
                    parser.advance();
                    FunctionKind::Receive
                }
                _ => {
                    parser.expect_token(&TokenKind::Function)?;
                    if matches!(
                        parser.current(),
                        TokenKind::Constructor | TokenKind::Fallback | TokenKind::Receive
                    ) {
                        let keyword = parser.current().clone();
                        let expected = match keyword {
                            TokenKind::Constructor => "constructor",
                            TokenKind::Fallback => "fallback function",
                            _ => "receive function",
                        };
                        name = EcoString::from(keyword.to_string());
                        let message = format!(
                            "This function is named \"{name}\" but is not the {expected} of \
                             the contract. If you intend this to be a {expected}, use \
                             \"{name}(...) {{ ... }}\" without the \"function\" keyword to \
                             define it."
                        );
                        if matches!(keyword, TokenKind::Constructor) {
                            parser.error(3323, message);
                        } else {
                            parser.warning(3445, message);
                        }
                        parser.advance();
                    } else {
                        let (parsed_name, _) = parser.expect_identifier()?;
                        name = parsed_name;
                    }
                    FunctionKind::Function
                }
            };

            let header = parser.parse_function_header(false)?;

            tracker.mark_end(parser);
            let body = if parser.check(&TokenKind::Semicolon) {
                parser.advance();
                None
            } else {
                let block = parser.parse_block(None)?;
                tracker.set_end_from(block.span);
                Some(block)
            };

            let (id, span) = tracker.finish(parser);
            Ok(FunctionDefinition {
                id,
                span,
                name,
                kind,
                is_free_function: free_function,
                visibility: header.visibility,
                state_mutability: header.state_mutability,
                is_virtual: header.is_virtual,
                overrides: header.overrides,
                documentation,
                parameters: header.parameters,
                modifiers: header.modifiers,
                return_parameters: header.return_parameters,
                body,
            })
        })
    }

    // ========================================================================
    // Structs & Enums
    // ========================================================================

    fn parse_struct_definition(&mut self) -> ParseResult<StructDefinition> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Struct)?;
            let (name, _) = parser.expect_identifier()?;
            let mut members = Vec::new();
            parser.expect_token(&TokenKind::LBrace)?;
            while !parser.check(&TokenKind::RBrace) {
                members.push(parser.parse_variable_declaration(VarDeclOptions::default(), None)?);
                parser.expect_token(&TokenKind::Semicolon)?;
            }
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::RBrace)?;
            let (id, span) = tracker.finish(parser);
            Ok(StructDefinition {
                id,
                span,
                name,
                members,
            })
        })
    }

    fn parse_enum_value(&mut self) -> ParseResult<EnumValue> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            tracker.mark_end(parser);
            let (name, _) = parser.expect_identifier()?;
            let (id, span) = tracker.finish(parser);
            Ok(EnumValue { id, span, name })
        })
    }

    /// Parses an enum definition. An enum with zero members is error 3147
    /// but still builds a node.
    fn parse_enum_definition(&mut self) -> ParseResult<EnumDefinition> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Enum)?;
            let (name, _) = parser.expect_identifier()?;
            let mut members = Vec::new();
            parser.expect_token(&TokenKind::LBrace)?;

            while !parser.check(&TokenKind::RBrace) {
                members.push(parser.parse_enum_value()?);
                if parser.check(&TokenKind::RBrace) {
                    break;
                }
                parser.expect_token(&TokenKind::Comma)?;
                if !matches!(parser.current(), TokenKind::Identifier(_)) {
                    return Err(parser.fatal(1612, "Expected identifier after ','"));
                }
            }
            if members.is_empty() {
                parser.error(3147, "enum with no members is not allowed.");
            }

            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::RBrace)?;
            let (id, span) = tracker.finish(parser);
            Ok(EnumDefinition {
                id,
                span,
                name,
                members,
            })
        })
    }

    // ========================================================================
    // Variable Declarations
    // ========================================================================

    /// Parses a variable declaration, optionally seeded with a type the
    /// ambiguity resolver already consumed.
    ///
    /// The specifier loop accepts visibility, `override`, `indexed`,
    /// `constant` / `immutable`, and a data location, each at most once and
    /// only where the options allow it.
    pub(super) fn parse_variable_declaration(
        &mut self,
        options: VarDeclOptions,
        lookahead_type: Option<TypeName>,
    ) -> ParseResult<VariableDeclaration> {
        self.with_recursion_guard(|parser| {
            let mut tracker = match &lookahead_type {
                Some(type_name) => parser.node_from_span(type_name.span()),
                None => parser.start_node(),
            };
            let documentation = parser.parse_structured_documentation();
            let type_name = match lookahead_type {
                Some(type_name) => type_name,
                None => parser.parse_type_name()?,
            };
            tracker.set_end_from(type_name.span());

            if !options.is_state_variable && documentation.is_some() {
                parser.error(2837, "Only state variables can have a docstring.");
            }

            if matches!(type_name, TypeName::Function(_))
                && options.is_state_variable
                && parser.check(&TokenKind::LBrace)
            {
                return Err(parser.fatal(
                    2915,
                    "Expected a state variable declaration. If you intended this as a \
                     fallback function or a function to handle plain ether transactions, \
                     use the \"fallback\" keyword or the \"receive\" keyword instead.",
                ));
            }

            let mut is_indexed = false;
            let mut mutability = Mutability::Mutable;
            let mut overrides: Option<OverrideSpecifier> = None;
            let mut visibility = Visibility::Default;
            let mut location = DataLocation::Unspecified;

            loop {
                let token = self_token(parser);
                if options.is_state_variable && token.is_variable_visibility_specifier() {
                    tracker.mark_end(parser);
                    if visibility != Visibility::Default {
                        parser.error(
                            4110,
                            format!(
                                "Visibility already specified as \"{}\".",
                                visibility.as_str()
                            ),
                        );
                        parser.advance();
                    } else {
                        visibility = parser.parse_visibility_specifier();
                    }
                } else if options.is_state_variable && token == TokenKind::Override {
                    if overrides.is_some() {
                        parser.error(9125, "Override already specified.");
                    }
                    overrides = Some(parser.parse_override_specifier()?);
                } else {
                    if options.allow_indexed && token == TokenKind::Indexed {
                        is_indexed = true;
                    } else if token == TokenKind::Constant || token == TokenKind::Immutable {
                        if mutability != Mutability::Mutable {
                            parser.error(
                                3109,
                                format!(
                                    "Mutability already set to \"{}\"",
                                    if mutability == Mutability::Constant {
                                        "constant"
                                    } else {
                                        "immutable"
                                    }
                                ),
                            );
                        } else if token == TokenKind::Constant {
                            mutability = Mutability::Constant;
                        } else {
                            mutability = Mutability::Immutable;
                        }
                    } else if options.allow_location && token.is_location_specifier() {
                        if location != DataLocation::Unspecified {
                            parser.error(3548, "Location already specified.");
                        } else {
                            location = match token {
                                TokenKind::Storage => DataLocation::Storage,
                                TokenKind::Memory => DataLocation::Memory,
                                _ => DataLocation::CallData,
                            };
                        }
                    } else {
                        break;
                    }
                    tracker.mark_end(parser);
                    parser.advance();
                }
            }

            let name = if options.allow_empty_name
                && !matches!(parser.current(), TokenKind::Identifier(_))
            {
                EcoString::new()
            } else {
                let (name, name_span) = parser.expect_identifier()?;
                tracker.set_end_from(name_span);
                name
            };

            let mut value = None;
            if options.allow_initial_value && parser.check(&TokenKind::Assign) {
                parser.advance();
                let expression = parser.parse_expression()?;
                tracker.set_end_from(expression.span());
                value = Some(expression);
            }

            let (id, span) = tracker.finish(parser);
            Ok(VariableDeclaration {
                id,
                span,
                type_name,
                name,
                value,
                visibility,
                documentation,
                is_state_variable: options.is_state_variable,
                is_indexed,
                mutability,
                overrides,
                location,
            })
        })
    }

    // ========================================================================
    // Modifiers, Events, Using
    // ========================================================================

    /// Parses a modifier definition. The `inside_modifier` flag is set for
    /// the duration (the `_` placeholder is only legal there) and cleared
    /// on every exit path.
    fn parse_modifier_definition(&mut self) -> ParseResult<ModifierDefinition> {
        self.with_recursion_guard(|parser| {
            parser.inside_modifier = true;
            let result = parser.parse_modifier_definition_inner();
            parser.inside_modifier = false;
            result
        })
    }

    fn parse_modifier_definition_inner(&mut self) -> ParseResult<ModifierDefinition> {
        let mut tracker = self.start_node();
        let documentation = self.parse_structured_documentation();

        self.expect_token(&TokenKind::Modifier)?;
        let (name, _) = self.expect_identifier()?;
        let parameters = if self.check(&TokenKind::LParen) {
            let options = VarDeclOptions {
                allow_indexed: true,
                allow_location: true,
                ..VarDeclOptions::default()
            };
            self.parse_parameter_list(options, true)?
        } else {
            self.create_empty_parameter_list()
        };

        let mut overrides: Option<OverrideSpecifier> = None;
        let mut is_virtual = false;
        loop {
            if self.check(&TokenKind::Override) {
                if overrides.is_some() {
                    self.error(9102, "Override already specified.");
                }
                overrides = Some(self.parse_override_specifier()?);
            } else if self.check(&TokenKind::Virtual) {
                if is_virtual {
                    self.error(2662, "Virtual already specified.");
                }
                is_virtual = true;
                self.advance();
            } else {
                break;
            }
        }

        tracker.mark_end(self);
        let body = if self.check(&TokenKind::Semicolon) {
            self.advance();
            None
        } else {
            let block = self.parse_block(None)?;
            tracker.set_end_from(block.span);
            Some(block)
        };

        let (id, span) = tracker.finish(self);
        Ok(ModifierDefinition {
            id,
            span,
            name,
            documentation,
            parameters,
            is_virtual,
            overrides,
            body,
        })
    }

    fn parse_event_definition(&mut self) -> ParseResult<EventDefinition> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let documentation = parser.parse_structured_documentation();

            parser.expect_token(&TokenKind::Event)?;
            let (name, _) = parser.expect_identifier()?;

            let options = VarDeclOptions {
                allow_indexed: true,
                ..VarDeclOptions::default()
            };
            let parameters = parser.parse_parameter_list(options, true)?;

            let mut is_anonymous = false;
            if parser.check(&TokenKind::Anonymous) {
                is_anonymous = true;
                parser.advance();
            }
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::Semicolon)?;
            let (id, span) = tracker.finish(parser);
            Ok(EventDefinition {
                id,
                span,
                name,
                documentation,
                parameters,
                is_anonymous,
            })
        })
    }

    /// Parses `using L for T;` / `using L for *;`. The wildcard is kept as
    /// an absent type name, never as an empty one.
    fn parse_using_directive(&mut self) -> ParseResult<UsingForDirective> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Using)?;
            let library = parser.parse_user_defined_type_name()?;
            parser.expect_token(&TokenKind::For)?;
            let type_name = if parser.check(&TokenKind::Mul) {
                parser.advance();
                None
            } else {
                Some(parser.parse_type_name()?)
            };
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::Semicolon)?;
            let (id, span) = tracker.finish(parser);
            Ok(UsingForDirective {
                id,
                span,
                library,
                type_name,
            })
        })
    }

    /// Parses a modifier invocation (or base-constructor call): an
    /// identifier with an optional argument list.
    pub(super) fn parse_modifier_invocation(&mut self) -> ParseResult<ModifierInvocation> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let name = parser.parse_identifier_node()?;
            let mut arguments = None;
            if parser.check(&TokenKind::LParen) {
                parser.advance();
                arguments = Some(parser.parse_function_call_list_arguments()?);
                tracker.mark_end(parser);
                parser.expect_token(&TokenKind::RParen)?;
            } else {
                tracker.set_end_from(name.span);
            }
            let (id, span) = tracker.finish(parser);
            Ok(ModifierInvocation {
                id,
                span,
                name,
                arguments,
            })
        })
    }

    // ========================================================================
    // Parameter Lists
    // ========================================================================

    /// Parses `( … )`. A trailing comma is fatal error 7591; an empty list
    /// is only allowed when `allow_empty` is set (the `returns` list is
    /// not).
    pub(super) fn parse_parameter_list(
        &mut self,
        options: VarDeclOptions,
        allow_empty: bool,
    ) -> ParseResult<ParameterList> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let mut parameters = Vec::new();
            let options = VarDeclOptions {
                allow_empty_name: true,
                ..options
            };
            parser.expect_token(&TokenKind::LParen)?;
            if !allow_empty || !parser.check(&TokenKind::RParen) {
                parameters.push(parser.parse_variable_declaration(options, None)?);
                while !parser.check(&TokenKind::RParen) {
                    if parser.check(&TokenKind::Comma)
                        && matches!(parser.scanner.peek(), TokenKind::RParen)
                    {
                        return Err(
                            parser.fatal(7591, "Unexpected trailing comma in parameter list.")
                        );
                    }
                    parser.expect_token(&TokenKind::Comma)?;
                    parameters.push(parser.parse_variable_declaration(options, None)?);
                }
            }
            tracker.mark_end(parser);
            parser.advance(); // the `)`
            let (id, span) = tracker.finish(parser);
            Ok(ParameterList {
                id,
                span,
                parameters,
            })
        })
    }

    /// Synthesizes an empty parameter list with an empty span.
    pub(super) fn create_empty_parameter_list(&mut self) -> ParameterList {
        let mut tracker = self.start_node();
        tracker.set_empty();
        let (id, span) = tracker.finish(self);
        ParameterList {
            id,
            span,
            parameters: Vec::new(),
        }
    }
}

/// Clones the current token kind so match arms can freely take `&mut`
/// borrows of the parser.
fn self_token(parser: &Parser) -> TokenKind {
    parser.current().clone()
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{parse_err, parse_ok};
    use super::super::{parse_source_unit, ParserConfig};
    use super::*;
    use crate::ast::{Expression, Statement};

    fn first_contract(unit: &SourceUnit) -> &ContractDefinition {
        for part in &unit.nodes {
            if let SourceUnitPart::Contract(contract) = part {
                return contract;
            }
        }
        panic!("Expected a contract definition");
    }

    #[test]
    fn library_with_internal_pure_function() {
        // Library with one internal pure function, one return parameter, and
        // a single return statement.
        let unit = parse_ok(
            "library L { function add(uint x, uint y) internal pure returns (uint) { return x + y; } }",
        );
        let contract = first_contract(&unit);
        assert_eq!(contract.kind, ContractKind::Library);
        assert_eq!(contract.name, "L");

        let ContractPart::Function(function) = &contract.nodes[0] else {
            panic!("Expected function");
        };
        assert_eq!(function.name, "add");
        assert_eq!(function.kind, FunctionKind::Function);
        assert_eq!(function.visibility, Visibility::Internal);
        assert_eq!(function.state_mutability, StateMutability::Pure);
        assert_eq!(function.parameters.parameters.len(), 2);
        assert_eq!(function.parameters.parameters[0].name, "x");
        assert_eq!(function.parameters.parameters[1].name, "y");
        assert_eq!(function.return_parameters.parameters.len(), 1);
        assert_eq!(function.return_parameters.parameters[0].name, "");

        let body = function.body.as_ref().expect("function has a body");
        assert_eq!(body.statements.len(), 1);
        let Statement::Return(ret) = &body.statements[0] else {
            panic!("Expected return statement");
        };
        assert!(matches!(
            ret.expression.as_ref(),
            Some(Expression::Binary(_))
        ));
    }

    #[test]
    fn import_forms() {
        let unit = parse_ok(
            "import \"./a.sol\";\n\
             import \"./b.sol\" as B;\n\
             import {x as y, z} from \"./c.sol\";\n\
             import * as All from \"./d.sol\";\n",
        );
        let imports: Vec<&ImportDirective> = unit
            .nodes
            .iter()
            .filter_map(|part| match part {
                SourceUnitPart::Import(import) => Some(import),
                _ => None,
            })
            .collect();
        assert_eq!(imports.len(), 4);
        assert_eq!(imports[0].path, "./a.sol");
        assert_eq!(imports[0].unit_alias, "");
        assert_eq!(imports[1].unit_alias, "B");
        assert_eq!(imports[2].symbol_aliases.len(), 2);
        assert_eq!(imports[2].symbol_aliases[0].symbol.name, "x");
        assert_eq!(imports[2].symbol_aliases[0].alias.as_deref(), Some("y"));
        assert_eq!(imports[2].symbol_aliases[1].alias, None);
        assert_eq!(imports[3].unit_alias, "All");
    }

    #[test]
    fn empty_import_path_is_fatal_6326() {
        let (unit, diagnostics) = parse_err("import \"\";");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 6326));
    }

    #[test]
    fn import_without_from_is_fatal_8208() {
        let (unit, diagnostics) = parse_err("import {a} \"./x.sol\";");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 8208));
    }

    #[test]
    fn abstract_contract_with_bases() {
        let unit = parse_ok("abstract contract C is A, B(1, 2) {}");
        let contract = first_contract(&unit);
        assert!(contract.is_abstract);
        assert_eq!(contract.base_contracts.len(), 2);
        assert_eq!(contract.base_contracts[0].name.path, vec!["A"]);
        assert!(contract.base_contracts[0].arguments.is_none());
        let args = contract.base_contracts[1]
            .arguments
            .as_ref()
            .expect("B has constructor arguments");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn enum_with_no_members_errors_but_builds_node() {
        let (unit, diagnostics) = parse_err("contract C { enum E {} }");
        let unit = unit.expect("node is still built");
        assert!(diagnostics.iter().any(|d| d.code == 3147));
        let contract = first_contract(&unit);
        let ContractPart::Enum(enumeration) = &contract.nodes[0] else {
            panic!("Expected enum");
        };
        assert_eq!(enumeration.name, "E");
        assert!(enumeration.members.is_empty());
    }

    #[test]
    fn enum_trailing_comma_is_fatal_1612() {
        let (_, diagnostics) = parse_err("contract C { enum E { A, } }");
        assert!(diagnostics.iter().any(|d| d.code == 1612));
    }

    #[test]
    fn trailing_comma_in_parameter_list_is_fatal_7591() {
        let (unit, diagnostics) = parse_err("contract C { function f(uint a,) public {} }");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 7591));
    }

    #[test]
    fn function_named_constructor_is_error_3323() {
        let (unit, diagnostics) = parse_err("contract C { function constructor() public {} }");
        let unit = unit.expect("best-effort node is still produced");
        assert!(diagnostics.iter().any(|d| d.code == 3323));
        let contract = first_contract(&unit);
        let ContractPart::Function(function) = &contract.nodes[0] else {
            panic!("Expected function");
        };
        // Best effort: the node keeps the written name and stays a Function.
        assert_eq!(function.name, "constructor");
        assert_eq!(function.kind, FunctionKind::Function);
    }

    #[test]
    fn function_named_fallback_is_warning_3445() {
        let (unit, diagnostics) = parse_err("contract C { function fallback() external {} }");
        assert!(unit.is_some());
        let warning = diagnostics
            .iter()
            .find(|d| d.code == 3445)
            .expect("warning 3445");
        assert_eq!(warning.severity, crate::source_analysis::Severity::Warning);
    }

    #[test]
    fn constructor_and_receive_have_empty_names() {
        let unit = parse_ok(
            "contract C { constructor() {} receive() external payable {} fallback() external {} }",
        );
        let contract = first_contract(&unit);
        for (index, kind) in [
            FunctionKind::Constructor,
            FunctionKind::Receive,
            FunctionKind::Fallback,
        ]
        .into_iter()
        .enumerate()
        {
            let ContractPart::Function(function) = &contract.nodes[index] else {
                panic!("Expected function");
            };
            assert_eq!(function.kind, kind);
            assert_eq!(function.name, "");
        }
    }

    #[test]
    fn free_function_flag() {
        let unit = parse_ok("function helper(uint x) pure returns (uint) { return x; }");
        let SourceUnitPart::Function(function) = &unit.nodes[0] else {
            panic!("Expected free function");
        };
        assert!(function.is_free_function);
    }

    #[test]
    fn duplicate_visibility_is_error_9439() {
        let (_, diagnostics) = parse_err("contract C { function f() public internal {} }");
        assert!(diagnostics.iter().any(|d| d.code == 9439));
    }

    #[test]
    fn duplicate_mutability_is_error_9680() {
        let (_, diagnostics) = parse_err("contract C { function f() pure view {} }");
        assert!(diagnostics.iter().any(|d| d.code == 9680));
    }

    #[test]
    fn duplicate_override_and_virtual() {
        let (_, diagnostics) =
            parse_err("contract C { function f() public override override virtual virtual {} }");
        let codes: Vec<u32> = diagnostics.iter().map(|d| d.code).collect();
        assert!(codes.contains(&1827));
        assert!(codes.contains(&6879));
    }

    #[test]
    fn state_variable_with_specifiers() {
        let unit = parse_ok("contract C { uint public constant X = 1; }");
        let contract = first_contract(&unit);
        let ContractPart::Variable(variable) = &contract.nodes[0] else {
            panic!("Expected state variable");
        };
        assert_eq!(variable.visibility, Visibility::Public);
        assert_eq!(variable.mutability, Mutability::Constant);
        assert!(variable.value.is_some());
        assert!(variable.is_state_variable);
    }

    #[test]
    fn immutable_and_constant_conflict_is_3109() {
        let (_, diagnostics) = parse_err("contract C { uint constant immutable x = 1; }");
        assert!(diagnostics.iter().any(|d| d.code == 3109));
    }

    #[test]
    fn state_variable_of_function_type() {
        let unit = parse_ok("contract C { function (uint) external returns (uint) public op; }");
        let contract = first_contract(&unit);
        let ContractPart::Variable(variable) = &contract.nodes[0] else {
            panic!("Expected state variable of function type");
        };
        assert_eq!(variable.name, "op");
        assert_eq!(variable.visibility, Visibility::Public);
        assert!(matches!(variable.type_name, TypeName::Function(_)));
    }

    #[test]
    fn function_type_state_variable_with_block_is_fatal_2915() {
        let (unit, diagnostics) = parse_err("contract C { function () external { } }");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 2915));
    }

    #[test]
    fn modifier_definition_and_placeholder() {
        let unit = parse_ok("contract C { modifier onlyOwner() { _; } }");
        let contract = first_contract(&unit);
        let ContractPart::Modifier(modifier) = &contract.nodes[0] else {
            panic!("Expected modifier");
        };
        assert_eq!(modifier.name, "onlyOwner");
        let body = modifier.body.as_ref().expect("modifier has a body");
        assert!(matches!(body.statements[0], Statement::Placeholder(_)));
    }

    #[test]
    fn modifier_duplicate_override_is_9102() {
        let (_, diagnostics) = parse_err("contract C { modifier m() override override { _; } }");
        assert!(diagnostics.iter().any(|d| d.code == 9102));
    }

    #[test]
    fn event_with_indexed_and_anonymous() {
        let unit = parse_ok("contract C { event Transfer(address indexed from, uint value) anonymous; }");
        let contract = first_contract(&unit);
        let ContractPart::Event(event) = &contract.nodes[0] else {
            panic!("Expected event");
        };
        assert!(event.is_anonymous);
        assert!(event.parameters.parameters[0].is_indexed);
        assert!(!event.parameters.parameters[1].is_indexed);
    }

    #[test]
    fn using_for_type_and_wildcard() {
        let unit = parse_ok("contract C { using SafeMath for uint; using Lib for *; }");
        let contract = first_contract(&unit);
        let ContractPart::Using(typed) = &contract.nodes[0] else {
            panic!("Expected using directive");
        };
        assert!(typed.type_name.is_some());
        let ContractPart::Using(wildcard) = &contract.nodes[1] else {
            panic!("Expected using directive");
        };
        // `for *` is an absent type name, distinct from any written type.
        assert!(wildcard.type_name.is_none());
    }

    #[test]
    fn struct_definition() {
        let unit = parse_ok("contract C { struct S { uint a; address b; } }");
        let contract = first_contract(&unit);
        let ContractPart::Struct(structure) = &contract.nodes[0] else {
            panic!("Expected struct");
        };
        assert_eq!(structure.name, "S");
        assert_eq!(structure.members.len(), 2);
    }

    #[test]
    fn docstring_attaches_to_state_variable() {
        let unit = parse_ok("contract C { /// the total supply\n uint public total; }");
        let contract = first_contract(&unit);
        let ContractPart::Variable(variable) = &contract.nodes[0] else {
            panic!("Expected state variable");
        };
        let documentation = variable.documentation.as_ref().expect("docstring attached");
        assert_eq!(documentation.text, "the total supply");
    }

    #[test]
    fn docstring_on_local_variable_is_error_2837() {
        let (_, diagnostics) =
            parse_err("contract C { function f() public { /// nope\n uint x; x = 1; } }");
        assert!(diagnostics.iter().any(|d| d.code == 2837));
    }

    #[test]
    fn garbage_in_contract_body_is_fatal_9182() {
        let (unit, diagnostics) = parse_err("contract C { return; }");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 9182));
    }

    #[test]
    fn contract_body_recovers_to_closing_brace() {
        let config = ParserConfig {
            error_recovery: true,
            ..ParserConfig::default()
        };
        let source = "contract C { uint a; return; uint b; }\ncontract D {}";
        let (unit, diagnostics) = parse_source_unit(source, &config);
        let unit = unit.expect("recovery produces a unit");
        // Both contracts survive; the recovery is reported.
        assert_eq!(unit.nodes.len(), 2);
        assert!(diagnostics.iter().any(|d| d.code == 9182));
        assert!(diagnostics.iter().any(|d| d.code == 6635 || d.code == 4796));
    }

    #[test]
    fn pragma_tokens_and_literals_align() {
        let unit = parse_ok("pragma experimental ABIEncoderV2;");
        let SourceUnitPart::Pragma(pragma) = &unit.nodes[0] else {
            panic!("Expected pragma");
        };
        assert_eq!(pragma.tokens.len(), pragma.literals.len());
        assert_eq!(pragma.literals[0], "experimental");
    }
}
