// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Specification-expression parsing.
//!
//! Pre/postcondition annotations use the expression grammar with optional
//! leading quantifier groups:
//!
//! ```text
//! property(arr) (uint i) arr[i] >= 0
//! forall (uint i) exists (uint j) a[i] == b[j]
//! ```
//!
//! The `property(arr)` form produces one implicit `forall` over unsigned
//! variables tied to the given array identifier. A specification case list
//! has the form `[case P1 : Q1; case P2 : Q2; …]`.
//!
//! Quantified variables accept only elementary types, mappings, or array
//! types; mappings and arrays are flagged as storage.

use crate::ast::{
    DataLocation, ElementaryTypeName, Expression, Mutability, ParameterList, SpecificationCase,
    SpecificationExpressionInfo, TypeName, VariableDeclaration, Visibility,
};
use crate::source_analysis::{ElementaryKind, ElementaryTypeToken, ParseResult, Span, TokenKind};

use super::Parser;

impl Parser {
    /// Parses a specification expression: either the `property(arr)` form
    /// or any number of leading `forall` / `exists` quantifier groups,
    /// followed by the predicate expression.
    pub(super) fn parse_specification_expression_inner(
        &mut self,
        info: &mut SpecificationExpressionInfo,
    ) -> ParseResult<Expression> {
        if matches!(self.current(), TokenKind::Identifier(name) if name == "property") {
            // The implicit quantifier variables of an array property are
            // unsigned integers.
            let uint = ElementaryTypeToken::new(ElementaryKind::UInt);
            let uint_span = self.current_span();
            self.advance();

            self.expect_token(&TokenKind::LParen)?;
            info.array_id = Some(self.parse_identifier_node()?);
            self.expect_token(&TokenKind::RParen)?;

            let variables = self.parse_specification_parameter_list(Some((uint, uint_span)))?;
            info.quantifiers.push(variables);
            info.is_forall.push(true);
        } else {
            while let TokenKind::Identifier(name) = self.current() {
                match name.as_str() {
                    "forall" => info.is_forall.push(true),
                    "exists" => info.is_forall.push(false),
                    _ => break,
                }
                self.advance();
                let variables = self.parse_specification_parameter_list(None)?;
                info.quantifiers.push(variables);
            }
        }

        self.parse_expression()
    }

    /// Parses `[case P1 : Q1; case P2 : Q2; …]` into `cases`.
    pub(super) fn parse_specification_case_list(
        &mut self,
        cases: &mut Vec<SpecificationCase>,
    ) -> ParseResult<()> {
        self.expect_token(&TokenKind::LBrack)?;
        while self.check(&TokenKind::Case) {
            self.advance();
            let mut precondition_info = SpecificationExpressionInfo::default();
            let precondition = self.parse_specification_expression_inner(&mut precondition_info)?;
            self.expect_token(&TokenKind::Colon)?;
            let mut postcondition_info = SpecificationExpressionInfo::default();
            let postcondition =
                self.parse_specification_expression_inner(&mut postcondition_info)?;
            self.expect_token(&TokenKind::Semicolon)?;
            cases.push(SpecificationCase {
                precondition,
                precondition_info,
                postcondition,
                postcondition_info,
            });
        }
        self.expect_token(&TokenKind::RBrack)?;
        debug_assert_eq!(self.recursion_depth, 0);
        Ok(())
    }

    /// Parses one quantified variable list `( … )`. A trailing comma is
    /// fatal error 6155.
    fn parse_specification_parameter_list(
        &mut self,
        given_type: Option<(ElementaryTypeToken, Span)>,
    ) -> ParseResult<ParameterList> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let mut parameters = Vec::new();
            parser.expect_token(&TokenKind::LParen)?;
            parameters.push(parser.parse_specification_variable_declaration(given_type)?);
            while !parser.check(&TokenKind::RParen) {
                if parser.check(&TokenKind::Comma)
                    && matches!(parser.scanner.peek(), TokenKind::RParen)
                {
                    return Err(parser.fatal(
                        6155,
                        "Unexpected trailing comma in quantifier variable list.",
                    ));
                }
                parser.expect_token(&TokenKind::Comma)?;
                parameters.push(parser.parse_specification_variable_declaration(given_type)?);
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

    /// Parses one quantified variable. Elementary types are accepted as-is;
    /// mappings and arrays are flagged as storage; anything else is
    /// diagnostic 5674.
    fn parse_specification_variable_declaration(
        &mut self,
        given_type: Option<(ElementaryTypeToken, Span)>,
    ) -> ParseResult<VariableDeclaration> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let type_name = match given_type {
                Some((token, span)) => {
                    let (id, span) = parser.fresh_node(span);
                    TypeName::Elementary(ElementaryTypeName {
                        id,
                        span,
                        name: token,
                        state_mutability: None,
                    })
                }
                None => {
                    let type_name = parser.parse_type_name()?;
                    tracker.set_end_from(type_name.span());
                    type_name
                }
            };

            let is_state_variable = match &type_name {
                TypeName::Elementary(_) => false,
                TypeName::Mapping(_) | TypeName::Array(_) => true,
                _ => {
                    parser.error(5674, "Unsupported type for quantifier variable.");
                    false
                }
            };

            let (name, name_span) = parser.expect_identifier()?;
            tracker.set_end_from(name_span);
            let (id, span) = tracker.finish(parser);
            Ok(VariableDeclaration {
                id,
                span,
                type_name,
                name,
                value: None,
                visibility: Visibility::Default,
                documentation: None,
                is_state_variable,
                is_indexed: false,
                mutability: Mutability::Mutable,
                overrides: None,
                location: DataLocation::Unspecified,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        parse_specification_cases, parse_specification_expression, ParserConfig,
    };
    use super::*;

    fn parse_spec(source: &str) -> (Expression, SpecificationExpressionInfo) {
        let (result, diagnostics) =
            parse_specification_expression(source, &ParserConfig::default());
        assert!(
            diagnostics.is_empty(),
            "Expected no diagnostics, got: {diagnostics:?}"
        );
        result.expect("specification expression parses")
    }

    #[test]
    fn bare_expression_has_no_quantifiers() {
        let (expression, info) = parse_spec("x > 0");
        assert!(matches!(expression, Expression::Binary(_)));
        assert!(info.is_forall.is_empty());
        assert!(info.array_id.is_none());
    }

    #[test]
    fn property_form_is_implicit_forall() {
        let (_, info) = parse_spec("property(arr) (i, j) arr[i] <= arr[j]");
        assert_eq!(info.array_id.as_ref().map(|id| id.name.as_str()), Some("arr"));
        assert_eq!(info.is_forall, vec![true]);
        assert_eq!(info.quantifiers.len(), 1);
        let variables = &info.quantifiers[0].parameters;
        assert_eq!(variables.len(), 2);
        assert_eq!(variables[0].name, "i");
        assert_eq!(variables[1].name, "j");
        // The implicit variables are unsigned integers.
        let TypeName::Elementary(elementary) = &variables[0].type_name else {
            panic!("Expected elementary type");
        };
        assert_eq!(elementary.name.kind, ElementaryKind::UInt);
    }

    #[test]
    fn quantifier_groups_in_order() {
        let (_, info) = parse_spec("forall (uint i) exists (uint j) a[i] == b[j]");
        assert_eq!(info.is_forall, vec![true, false]);
        assert_eq!(info.quantifiers.len(), 2);
        assert!(!info.quantifiers[0].parameters[0].is_state_variable);
    }

    #[test]
    fn mapping_and_array_quantifier_variables_are_storage() {
        let (_, info) = parse_spec("forall (mapping(uint => uint) m, uint[] a, uint i) m[i] == a[i]");
        let variables = &info.quantifiers[0].parameters;
        assert!(variables[0].is_state_variable);
        assert!(variables[1].is_state_variable);
        assert!(!variables[2].is_state_variable);
    }

    #[test]
    fn unsupported_quantifier_type_is_5674() {
        let (_, diagnostics) = parse_specification_expression(
            "forall (function (uint) external returns (uint) f) f(0) == 0",
            &ParserConfig::default(),
        );
        assert!(diagnostics.iter().any(|d| d.code == 5674));
    }

    #[test]
    fn trailing_comma_in_quantifier_list_is_fatal_6155() {
        let (result, diagnostics) =
            parse_specification_expression("forall (uint i,) a[i] == 0", &ParserConfig::default());
        assert!(result.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 6155));
    }

    #[test]
    fn trailing_tokens_after_specification_are_1553() {
        let (result, diagnostics) =
            parse_specification_expression("x > 0 )", &ParserConfig::default());
        assert!(result.is_some());
        assert!(diagnostics.iter().any(|d| d.code == 1553));
    }

    #[test]
    fn case_list() {
        let (cases, diagnostics) = parse_specification_cases(
            "[case x > 0 : y > 0; case x == 0 : forall (uint i) a[i] == 0;]",
            &ParserConfig::default(),
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(cases.len(), 2);
        assert!(matches!(cases[0].precondition, Expression::Binary(_)));
        assert_eq!(cases[1].postcondition_info.is_forall, vec![true]);
    }

    #[test]
    fn empty_case_list() {
        let (cases, diagnostics) =
            parse_specification_cases("[]", &ParserConfig::default());
        assert!(diagnostics.is_empty());
        assert!(cases.is_empty());
    }

    #[test]
    fn case_list_trailing_tokens_are_2180() {
        let (cases, diagnostics) =
            parse_specification_cases("[] x", &ParserConfig::default());
        assert!(cases.is_empty());
        assert!(diagnostics.iter().any(|d| d.code == 2180));
    }
}
