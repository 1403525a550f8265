// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Type-name parsing for Solidity.
//!
//! Elementary types (with the `address payable` special case), user-defined
//! dotted paths, function types, mappings, and `[…]` array suffix stacking.

use crate::ast::{
    ArrayTypeName, ElementaryTypeName, FunctionTypeName, Mapping, StateMutability, TypeName,
    UserDefinedTypeName,
};
use crate::source_analysis::{ElementaryKind, ParseResult, TokenKind};

use super::NodeTracker;
use super::Parser;

impl Parser {
    /// Parses a type name, including any `[…]` array suffixes.
    pub(super) fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let type_name = match parser.current().clone() {
                TokenKind::Elementary(elem) => {
                    let mut inner = parser.start_node();
                    inner.mark_end(parser);
                    parser.advance();
                    // `address` carries non-payable mutability by default;
                    // a mutability specifier is only accepted there.
                    let mut state_mutability = (elem.kind == ElementaryKind::Address)
                        .then_some(StateMutability::NonPayable);
                    if parser.current().is_state_mutability_specifier() {
                        if elem.kind == ElementaryKind::Address {
                            inner.mark_end(parser);
                            state_mutability = Some(parser.parse_state_mutability());
                        } else {
                            parser.error(
                                9106,
                                "State mutability can only be specified for address types.",
                            );
                            parser.advance();
                        }
                    }
                    let (id, span) = inner.finish(parser);
                    TypeName::Elementary(ElementaryTypeName {
                        id,
                        span,
                        name: elem,
                        state_mutability,
                    })
                }
                TokenKind::Function => TypeName::Function(Box::new(parser.parse_function_type()?)),
                TokenKind::Mapping => TypeName::Mapping(Box::new(parser.parse_mapping()?)),
                TokenKind::Identifier(_) => {
                    TypeName::UserDefined(parser.parse_user_defined_type_name()?)
                }
                _ => return Err(parser.fatal(3546, "Expected type name")),
            };
            parser.parse_type_name_suffix(type_name, &mut tracker)
        })
    }

    /// Parses zero or more `[ expr? ]` suffixes, each wrapping the current
    /// type in an array type (a missing expression denotes a dynamic
    /// array).
    fn parse_type_name_suffix(
        &mut self,
        mut type_name: TypeName,
        tracker: &mut NodeTracker,
    ) -> ParseResult<TypeName> {
        self.with_recursion_guard(|parser| {
            while parser.check(&TokenKind::LBrack) {
                parser.advance();
                let mut length = None;
                if !parser.check(&TokenKind::RBrack) {
                    length = Some(parser.parse_expression()?);
                }
                tracker.mark_end(parser);
                parser.expect_token(&TokenKind::RBrack)?;
                let (id, span) = tracker.finish(parser);
                type_name = TypeName::Array(Box::new(ArrayTypeName {
                    id,
                    span,
                    base_type: type_name,
                    length,
                }));
            }
            Ok(type_name)
        })
    }

    /// Parses a dotted user-defined type name: `Identifier ("." Identifier)*`.
    pub(super) fn parse_user_defined_type_name(&mut self) -> ParseResult<UserDefinedTypeName> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            tracker.mark_end(parser);
            let (first, _) = parser.expect_identifier()?;
            let mut path = vec![first];
            while parser.check(&TokenKind::Period) {
                parser.advance();
                tracker.mark_end(parser);
                let (next, _) = parser.expect_identifier()?;
                path.push(next);
            }
            let (id, span) = tracker.finish(parser);
            Ok(UserDefinedTypeName { id, span, path })
        })
    }

    /// Parses `function (…) <specifiers> [returns (…)]` as a type, reusing
    /// the function header in state-variable mode.
    fn parse_function_type(&mut self) -> ParseResult<FunctionTypeName> {
        self.with_recursion_guard(|parser| {
            let tracker = parser.start_node();
            parser.expect_token(&TokenKind::Function)?;
            let header = parser.parse_function_header(true)?;
            let (id, span) = tracker.finish(parser);
            Ok(FunctionTypeName {
                id,
                span,
                parameters: header.parameters,
                return_parameters: header.return_parameters,
                visibility: header.visibility,
                state_mutability: header.state_mutability,
            })
        })
    }

    /// Parses `mapping(<keyType> => <valueType>)`. The key type is an
    /// elementary type or a user-defined name; the value type is arbitrary.
    fn parse_mapping(&mut self) -> ParseResult<Mapping> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            parser.expect_token(&TokenKind::Mapping)?;
            parser.expect_token(&TokenKind::LParen)?;
            let key_type = match parser.current().clone() {
                TokenKind::Identifier(_) => {
                    TypeName::UserDefined(parser.parse_user_defined_type_name()?)
                }
                TokenKind::Elementary(elem) => {
                    let mut inner = parser.start_node();
                    inner.mark_end(parser);
                    parser.advance();
                    let (id, span) = inner.finish(parser);
                    TypeName::Elementary(ElementaryTypeName {
                        id,
                        span,
                        name: elem,
                        state_mutability: None,
                    })
                }
                _ => {
                    return Err(parser.fatal(
                        1005,
                        "Expected elementary type name or identifier for mapping key type",
                    ));
                }
            };
            parser.expect_token(&TokenKind::DoubleArrow)?;
            let value_type = parser.parse_type_name()?;
            tracker.mark_end(parser);
            parser.expect_token(&TokenKind::RParen)?;
            let (id, span) = tracker.finish(parser);
            Ok(Mapping {
                id,
                span,
                key_type,
                value_type,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{parse_err, parse_ok};
    use super::*;
    use crate::ast::{ContractPart, SourceUnitPart};

    /// Extracts the type of the first state variable in the source.
    fn state_variable_type(source: &str) -> TypeName {
        let unit = parse_ok(source);
        for part in &unit.nodes {
            if let SourceUnitPart::Contract(contract) = part {
                for node in &contract.nodes {
                    if let ContractPart::Variable(variable) = node {
                        return variable.type_name.clone();
                    }
                }
            }
        }
        panic!("Expected a contract with a state variable");
    }

    #[test]
    fn elementary_types() {
        let TypeName::Elementary(uint) = state_variable_type("contract C { uint256 x; }") else {
            panic!("Expected elementary type");
        };
        assert_eq!(uint.name.kind, ElementaryKind::UInt);
        assert_eq!(uint.name.first_size, 256);
        assert_eq!(uint.state_mutability, None);
    }

    #[test]
    fn address_carries_default_mutability() {
        let TypeName::Elementary(address) = state_variable_type("contract C { address a; }")
        else {
            panic!("Expected elementary type");
        };
        assert_eq!(address.state_mutability, Some(StateMutability::NonPayable));
    }

    #[test]
    fn address_payable() {
        let TypeName::Elementary(address) =
            state_variable_type("contract C { address payable a; }")
        else {
            panic!("Expected elementary type");
        };
        assert_eq!(address.state_mutability, Some(StateMutability::Payable));
    }

    #[test]
    fn mutability_on_non_address_is_error_9106() {
        let (_, diagnostics) = parse_err("contract C { uint payable x; }");
        assert!(diagnostics.iter().any(|d| d.code == 9106));
    }

    #[test]
    fn dotted_user_defined_type() {
        let TypeName::UserDefined(name) = state_variable_type("contract C { A.B.C x; }") else {
            panic!("Expected user-defined type");
        };
        assert_eq!(name.path, vec!["A", "B", "C"]);
    }

    #[test]
    fn array_suffix_stacking() {
        // uint[3][] reads inside-out: dynamic array of uint[3].
        let TypeName::Array(outer) = state_variable_type("contract C { uint[3][] x; }") else {
            panic!("Expected array type");
        };
        assert!(outer.length.is_none());
        let TypeName::Array(inner) = &outer.base_type else {
            panic!("Expected inner array type");
        };
        assert!(inner.length.is_some());
        assert!(matches!(inner.base_type, TypeName::Elementary(_)));
    }

    #[test]
    fn mapping_types() {
        let TypeName::Mapping(mapping) =
            state_variable_type("contract C { mapping(address => mapping(uint => Entry)) m; }")
        else {
            panic!("Expected mapping type");
        };
        assert!(matches!(mapping.key_type, TypeName::Elementary(_)));
        let TypeName::Mapping(inner) = &mapping.value_type else {
            panic!("Expected nested mapping");
        };
        assert!(matches!(inner.value_type, TypeName::UserDefined(_)));
    }

    #[test]
    fn mapping_key_cannot_be_mapping() {
        let (unit, diagnostics) =
            parse_err("contract C { mapping(mapping(uint => uint) => uint) m; }");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 1005));
    }

    #[test]
    fn function_type() {
        let TypeName::Function(function) = state_variable_type(
            "contract C { function (uint) external view returns (bool) predicate; }",
        ) else {
            panic!("Expected function type");
        };
        assert_eq!(function.parameters.parameters.len(), 1);
        assert_eq!(function.return_parameters.parameters.len(), 1);
        assert_eq!(function.state_mutability, StateMutability::View);
    }

    #[test]
    fn missing_type_name_is_fatal_3546() {
        let (unit, diagnostics) = parse_err("contract C { using L for +; }");
        assert!(unit.is_none());
        assert!(diagnostics.iter().any(|d| d.code == 3546));
    }
}
