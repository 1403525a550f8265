// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Solidity.
//!
//! A precedence-climbing binary parser layered under assignment and the
//! conditional operator, prefix/postfix unary operators, the left-hand-side
//! suffix chain (index, slice, member, call, call options), and the
//! primaries (literals, identifiers, tuples, inline arrays,
//! type-names-as-expressions).
//!
//! Several entry points accept a *partial expression*: a previously-built
//! left operand supplied by the statement parser's ambiguity resolver when
//! it has already consumed a prefix of the expression.

use ecow::EcoString;

use crate::ast::{
    Assignment, BinaryOperation, ConditionalExpression, ElementaryTypeName,
    ElementaryTypeNameExpression, Expression, FunctionCall, FunctionCallOptions, Identifier,
    IndexAccess, IndexRangeAccess, Literal, LiteralKind, MemberAccess, NewExpression,
    StateMutability, SubDenomination, TupleExpression, UnaryOperation,
};
use crate::source_analysis::{
    ElementaryKind, ElementaryTypeToken, ParseResult, Span, TokenKind,
};

use super::Parser;

/// Maps a sub-denomination keyword to its AST value.
fn sub_denomination_from(token: &TokenKind) -> Option<SubDenomination> {
    match token {
        TokenKind::SubWei => Some(SubDenomination::Wei),
        TokenKind::SubGwei => Some(SubDenomination::Gwei),
        TokenKind::SubEther => Some(SubDenomination::Ether),
        TokenKind::SubSecond => Some(SubDenomination::Second),
        TokenKind::SubMinute => Some(SubDenomination::Minute),
        TokenKind::SubHour => Some(SubDenomination::Hour),
        TokenKind::SubDay => Some(SubDenomination::Day),
        TokenKind::SubWeek => Some(SubDenomination::Week),
        _ => None,
    }
}

impl Parser {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses an expression from scratch (no pre-parsed left operand).
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_expression_with(None)
    }

    /// Parses an expression, optionally seeded with a pre-parsed left
    /// operand.
    ///
    /// Grows the stack on the heap when remaining space is low; combined
    /// with the recursion-depth guard this keeps deeply nested input from
    /// overflowing the stack.
    pub(super) fn parse_expression_with(
        &mut self,
        partial: Option<Expression>,
    ) -> ParseResult<Expression> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.with_recursion_guard(|parser| {
                let expression = parser.parse_binary_expression(4, partial)?;
                if parser.current().is_assignment_op() {
                    let operator = parser.current().clone();
                    parser.advance();
                    let right = parser.parse_expression()?;
                    let (id, span) = parser
                        .fresh_node(Span::new(expression.span().start(), right.span().end()));
                    return Ok(Expression::Assignment(Box::new(Assignment {
                        id,
                        span,
                        left: expression,
                        operator,
                        right,
                    })));
                }
                if parser.check(&TokenKind::Conditional) {
                    parser.advance();
                    let true_expression = parser.parse_expression()?;
                    parser.expect_token(&TokenKind::Colon)?;
                    let false_expression = parser.parse_expression()?;
                    let (id, span) = parser.fresh_node(Span::new(
                        expression.span().start(),
                        false_expression.span().end(),
                    ));
                    return Ok(Expression::Conditional(Box::new(ConditionalExpression {
                        id,
                        span,
                        condition: expression,
                        true_expression,
                        false_expression,
                    })));
                }
                Ok(expression)
            })
        })
    }

    /// Classical precedence climb: for each precedence level from the
    /// current token's down to `min_precedence`, fold operators of exactly
    /// that level, recursing one level tighter for the right operand.
    fn parse_binary_expression(
        &mut self,
        min_precedence: u8,
        partial: Option<Expression>,
    ) -> ParseResult<Expression> {
        self.with_recursion_guard(|parser| {
            let mut expression = parser.parse_unary_expression(partial)?;
            let start = expression.span().start();
            let mut precedence = parser.current().precedence();
            while precedence >= min_precedence {
                while parser.current().precedence() == precedence {
                    let operator = parser.current().clone();
                    parser.advance();
                    let right = parser.parse_binary_expression(precedence + 1, None)?;
                    let (id, span) = parser.fresh_node(Span::new(start, right.span().end()));
                    expression = Expression::Binary(Box::new(BinaryOperation {
                        id,
                        span,
                        left: expression,
                        operator,
                        right,
                    }));
                }
                precedence -= 1;
            }
            Ok(expression)
        })
    }

    /// Parses prefix unary operators (only when no partial expression was
    /// supplied) and postfix `++` / `--`.
    fn parse_unary_expression(
        &mut self,
        partial: Option<Expression>,
    ) -> ParseResult<Expression> {
        self.with_recursion_guard(|parser| {
            let token = parser.current().clone();
            if partial.is_none() && (token.is_unary_op() || token.is_count_op()) {
                // prefix expression
                let start = parser.current_span().start();
                parser.advance();
                let sub_expression = parser.parse_unary_expression(None)?;
                let (id, span) =
                    parser.fresh_node(Span::new(start, sub_expression.span().end()));
                return Ok(Expression::Unary(Box::new(UnaryOperation {
                    id,
                    span,
                    operator: token,
                    sub_expression,
                    is_prefix: true,
                })));
            }
            // potential postfix expression
            let sub_expression = parser.parse_left_hand_side_expression(partial)?;
            let token = parser.current().clone();
            if !token.is_count_op() {
                return Ok(sub_expression);
            }
            let (id, span) = parser.fresh_node(Span::new(
                sub_expression.span().start(),
                parser.current_span().end(),
            ));
            parser.advance();
            Ok(Expression::Unary(Box::new(UnaryOperation {
                id,
                span,
                operator: token,
                sub_expression,
                is_prefix: false,
            })))
        })
    }

    /// Parses a left-hand-side expression: `new <type>`, `payable(…)`, or a
    /// primary, followed by any chain of index, slice, member, call, and
    /// call-options suffixes.
    fn parse_left_hand_side_expression(
        &mut self,
        partial: Option<Expression>,
    ) -> ParseResult<Expression> {
        self.with_recursion_guard(|parser| {
            let mut expression = if let Some(partial) = partial {
                partial
            } else if parser.check(&TokenKind::New) {
                let mut tracker = parser.start_node();
                parser.expect_token(&TokenKind::New)?;
                let type_name = parser.parse_type_name()?;
                tracker.set_end_from(type_name.span());
                let (id, span) = tracker.finish(parser);
                Expression::New(Box::new(NewExpression {
                    id,
                    span,
                    type_name,
                }))
            } else if parser.check(&TokenKind::Payable) {
                // `payable(…)` is an elementary-type-name expression of type
                // `address payable`; the call suffix is mandatory.
                let payable_span = parser.current_span();
                parser.expect_token(&TokenKind::Payable)?;
                let (type_id, type_span) = parser.fresh_node(payable_span);
                let type_name = ElementaryTypeName {
                    id: type_id,
                    span: type_span,
                    name: ElementaryTypeToken::new(ElementaryKind::Address),
                    state_mutability: Some(StateMutability::Payable),
                };
                let (id, span) = parser.fresh_node(payable_span);
                parser.check_token(&TokenKind::LParen)?;
                Expression::ElementaryTypeNameExpression(ElementaryTypeNameExpression {
                    id,
                    span,
                    type_name,
                })
            } else {
                parser.parse_primary_expression()?
            };

            let lhs_start = expression.span().start();
            loop {
                let token = parser.current().clone();
                match token {
                    TokenKind::LBrack => {
                        parser.advance();
                        let mut index = None;
                        if !parser.check(&TokenKind::RBrack) && !parser.check(&TokenKind::Colon) {
                            index = Some(parser.parse_expression()?);
                        }
                        if parser.check(&TokenKind::Colon) {
                            parser.expect_token(&TokenKind::Colon)?;
                            let mut end = None;
                            if !parser.check(&TokenKind::RBrack) {
                                end = Some(parser.parse_expression()?);
                            }
                            let (id, span) = parser
                                .fresh_node(Span::new(lhs_start, parser.current_span().end()));
                            parser.expect_token(&TokenKind::RBrack)?;
                            expression = Expression::IndexRangeAccess(Box::new(IndexRangeAccess {
                                id,
                                span,
                                base: expression,
                                start: index,
                                end,
                            }));
                        } else {
                            let (id, span) = parser
                                .fresh_node(Span::new(lhs_start, parser.current_span().end()));
                            parser.expect_token(&TokenKind::RBrack)?;
                            expression = Expression::IndexAccess(Box::new(IndexAccess {
                                id,
                                span,
                                base: expression,
                                index,
                            }));
                        }
                    }
                    TokenKind::Period => {
                        parser.advance();
                        let member_span = parser.current_span();
                        // `address` is permitted as a member name and keeps
                        // exactly that spelling.
                        let member_name = if matches!(
                            parser.current(),
                            TokenKind::Elementary(elem) if elem.kind == ElementaryKind::Address
                        ) {
                            parser.advance();
                            EcoString::from("address")
                        } else {
                            let (name, _) = parser.expect_identifier()?;
                            name
                        };
                        let (id, span) =
                            parser.fresh_node(Span::new(lhs_start, member_span.end()));
                        expression = Expression::MemberAccess(Box::new(MemberAccess {
                            id,
                            span,
                            expression,
                            member_name,
                        }));
                    }
                    TokenKind::LParen => {
                        parser.advance();
                        let (arguments, names) = parser.parse_function_call_arguments()?;
                        let (id, span) =
                            parser.fresh_node(Span::new(lhs_start, parser.current_span().end()));
                        parser.expect_token(&TokenKind::RParen)?;
                        expression = Expression::FunctionCall(Box::new(FunctionCall {
                            id,
                            span,
                            expression,
                            arguments,
                            names,
                        }));
                    }
                    TokenKind::LBrace => {
                        // Call options only when `{` is followed by
                        // `identifier :`; otherwise this brace opens a block
                        // (e.g. of a try statement).
                        if !matches!(parser.scanner.peek(), TokenKind::Identifier(_))
                            || !matches!(parser.scanner.peek_next_next(), TokenKind::Colon)
                        {
                            return Ok(expression);
                        }
                        parser.expect_token(&TokenKind::LBrace)?;
                        let (options, names) = parser.parse_named_arguments()?;
                        let (id, span) =
                            parser.fresh_node(Span::new(lhs_start, parser.current_span().end()));
                        parser.expect_token(&TokenKind::RBrace)?;
                        expression = Expression::FunctionCallOptions(Box::new(
                            FunctionCallOptions {
                                id,
                                span,
                                expression,
                                options,
                                names,
                            },
                        ));
                    }
                    _ => return Ok(expression),
                }
            }
        })
    }

    /// Parses a primary expression.
    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        self.with_recursion_guard(|parser| {
            let mut tracker = parser.start_node();
            let token = parser.current().clone();
            match token {
                TokenKind::True | TokenKind::False => {
                    tracker.mark_end(parser);
                    let value =
                        EcoString::from(if matches!(token, TokenKind::True) { "true" } else { "false" });
                    parser.advance();
                    let (id, span) = tracker.finish(parser);
                    Ok(Expression::Literal(Literal {
                        id,
                        span,
                        kind: LiteralKind::Bool,
                        value,
                        sub_denomination: None,
                    }))
                }
                TokenKind::Number(_) => {
                    let next = parser.scanner.peek();
                    if next.is_ether_subdenomination() || next.is_time_subdenomination() {
                        let value = parser.literal_and_advance();
                        tracker.mark_end(parser);
                        let sub_denomination = sub_denomination_from(parser.current());
                        parser.advance();
                        let (id, span) = tracker.finish(parser);
                        Ok(Expression::Literal(Literal {
                            id,
                            span,
                            kind: LiteralKind::Number,
                            value,
                            sub_denomination,
                        }))
                    } else {
                        tracker.mark_end(parser);
                        let value = parser.literal_and_advance();
                        let (id, span) = tracker.finish(parser);
                        Ok(Expression::Literal(Literal {
                            id,
                            span,
                            kind: LiteralKind::Number,
                            value,
                            sub_denomination: None,
                        }))
                    }
                }
                TokenKind::StringLiteral(_)
                | TokenKind::UnicodeStringLiteral(_)
                | TokenKind::HexStringLiteral(_) => {
                    let kind = match token {
                        TokenKind::StringLiteral(_) => LiteralKind::Str,
                        TokenKind::UnicodeStringLiteral(_) => LiteralKind::UnicodeStr,
                        _ => LiteralKind::HexStr,
                    };
                    // Adjacent literals of the same kind concatenate.
                    let mut value = parser.scanner.current_literal();
                    while std::mem::discriminant(parser.scanner.peek())
                        == std::mem::discriminant(&token)
                    {
                        parser.advance();
                        value.push_str(&parser.scanner.current_literal());
                    }
                    tracker.mark_end(parser);
                    parser.advance();
                    if matches!(parser.current(), TokenKind::Illegal(_)) {
                        let message = parser.scanner.current_literal();
                        return Err(parser.fatal(5428, message));
                    }
                    let (id, span) = tracker.finish(parser);
                    Ok(Expression::Literal(Literal {
                        id,
                        span,
                        kind,
                        value,
                        sub_denomination: None,
                    }))
                }
                TokenKind::Identifier(name) => {
                    tracker.mark_end(parser);
                    parser.advance();
                    let (id, span) = tracker.finish(parser);
                    Ok(Expression::Identifier(Identifier { id, span, name }))
                }
                TokenKind::Type => {
                    // Inside expressions, `type` is the name of a special,
                    // globally-available function.
                    tracker.mark_end(parser);
                    parser.advance();
                    let (id, span) = tracker.finish(parser);
                    Ok(Expression::Identifier(Identifier {
                        id,
                        span,
                        name: EcoString::from("type"),
                    }))
                }
                TokenKind::LParen | TokenKind::LBrack => {
                    // Tuple/parenthesized expression or inline array.
                    // () is the empty tuple, (x) is not a real tuple, (x,) is
                    // one-dimensional; elements of arrays cannot be omitted,
                    // components of tuples may be.
                    parser.advance();
                    let is_array = matches!(token, TokenKind::LBrack);
                    let closing = if is_array {
                        TokenKind::RBrack
                    } else {
                        TokenKind::RParen
                    };
                    let mut components: Vec<Option<Expression>> = Vec::new();
                    if !parser.check(&closing) {
                        loop {
                            if !parser.check(&TokenKind::Comma) && !parser.check(&closing) {
                                components.push(Some(parser.parse_expression()?));
                            } else if is_array {
                                parser.error(
                                    4799,
                                    "Expected expression (inline array elements cannot be omitted).",
                                );
                            } else {
                                components.push(None);
                            }
                            if parser.check(&closing) {
                                break;
                            }
                            parser.expect_token(&TokenKind::Comma)?;
                        }
                    }
                    tracker.mark_end(parser);
                    parser.expect_token(&closing)?;
                    let (id, span) = tracker.finish(parser);
                    Ok(Expression::Tuple(TupleExpression {
                        id,
                        span,
                        components,
                        is_array,
                    }))
                }
                TokenKind::Elementary(elem) => {
                    // Used for casts: `uint(x)`, `bytes32(y)`.
                    let elem_span = parser.current_span();
                    let (type_id, type_span) = parser.fresh_node(elem_span);
                    let type_name = ElementaryTypeName {
                        id: type_id,
                        span: type_span,
                        name: elem,
                        state_mutability: None,
                    };
                    let (id, span) = parser.fresh_node(elem_span);
                    parser.advance();
                    Ok(Expression::ElementaryTypeNameExpression(
                        ElementaryTypeNameExpression {
                            id,
                            span,
                            type_name,
                        },
                    ))
                }
                TokenKind::Illegal(message) => Err(parser.fatal(8936, message)),
                _ => Err(parser.fatal(6933, "Expected primary expression.")),
            }
        })
    }

    // ========================================================================
    // Call Arguments
    // ========================================================================

    /// Parses comma-separated positional arguments up to `)`.
    pub(super) fn parse_function_call_list_arguments(
        &mut self,
    ) -> ParseResult<Vec<Expression>> {
        self.with_recursion_guard(|parser| {
            let mut arguments = Vec::new();
            if !parser.check(&TokenKind::RParen) {
                arguments.push(parser.parse_expression()?);
                while !parser.check(&TokenKind::RParen) {
                    parser.expect_token(&TokenKind::Comma)?;
                    arguments.push(parser.parse_expression()?);
                }
            }
            Ok(arguments)
        })
    }

    /// Parses call arguments: either positional or `{name: expr, …}`.
    pub(super) fn parse_function_call_arguments(
        &mut self,
    ) -> ParseResult<(Vec<Expression>, Vec<EcoString>)> {
        self.with_recursion_guard(|parser| {
            if parser.check(&TokenKind::LBrace) {
                parser.expect_token(&TokenKind::LBrace)?;
                let result = parser.parse_named_arguments()?;
                parser.expect_token(&TokenKind::RBrace)?;
                Ok(result)
            } else {
                Ok((parser.parse_function_call_list_arguments()?, Vec::new()))
            }
        })
    }

    /// Parses `name: expr (, name: expr)*` up to `}`. A trailing comma is
    /// error 2074 but parsing continues.
    pub(super) fn parse_named_arguments(
        &mut self,
    ) -> ParseResult<(Vec<Expression>, Vec<EcoString>)> {
        let mut arguments = Vec::new();
        let mut names = Vec::new();
        let mut first = true;
        while !self.check(&TokenKind::RBrace) {
            if !first {
                self.expect_token(&TokenKind::Comma)?;
            }
            let (name, _) = self.expect_identifier()?;
            names.push(name);
            self.expect_token(&TokenKind::Colon)?;
            arguments.push(self.parse_expression()?);

            if self.check(&TokenKind::Comma) && matches!(self.scanner.peek(), TokenKind::RBrace) {
                self.error(2074, "Unexpected trailing comma.");
                self.advance();
            }
            first = false;
        }
        Ok((arguments, names))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{parse_standalone_expression, ParserConfig};
    use super::*;

    fn parse_expr(source: &str) -> Expression {
        let (expression, diagnostics) =
            parse_standalone_expression(source, &ParserConfig::default());
        assert!(
            diagnostics.is_empty(),
            "Expected no diagnostics, got: {diagnostics:?}"
        );
        expression.expect("expression parses")
    }

    fn expr_codes(source: &str) -> Vec<u32> {
        let (_, diagnostics) = parse_standalone_expression(source, &ParserConfig::default());
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn precedence_multiplication_binds_tighter() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let Expression::Binary(add) = parse_expr("1 + 2 * 3") else {
            panic!("Expected binary expression");
        };
        assert_eq!(add.operator, TokenKind::Add);
        assert!(matches!(add.left, Expression::Literal(_)));
        let Expression::Binary(mul) = &add.right else {
            panic!("Expected nested multiplication");
        };
        assert_eq!(mul.operator, TokenKind::Mul);
    }

    #[test]
    fn same_precedence_folds_left() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let Expression::Binary(outer) = parse_expr("1 - 2 - 3") else {
            panic!("Expected binary expression");
        };
        assert!(matches!(outer.left, Expression::Binary(_)));
        assert!(matches!(outer.right, Expression::Literal(_)));
    }

    #[test]
    fn logical_operators_bind_loosest() {
        // a || b && c parses as a || (b && c)
        let Expression::Binary(or) = parse_expr("a || b && c") else {
            panic!("Expected binary expression");
        };
        assert_eq!(or.operator, TokenKind::Or);
        let Expression::Binary(and) = &or.right else {
            panic!("Expected nested &&");
        };
        assert_eq!(and.operator, TokenKind::And);
    }

    #[test]
    fn assignment_is_right_associative() {
        // a = b = 1 parses as a = (b = 1)
        let Expression::Assignment(outer) = parse_expr("a = b = 1") else {
            panic!("Expected assignment");
        };
        assert_eq!(outer.operator, TokenKind::Assign);
        assert!(matches!(outer.right, Expression::Assignment(_)));
    }

    #[test]
    fn compound_assignment_operator_is_kept() {
        let Expression::Assignment(assignment) = parse_expr("a += 1") else {
            panic!("Expected assignment");
        };
        assert_eq!(assignment.operator, TokenKind::AssignAdd);
    }

    #[test]
    fn conditional_expression() {
        let Expression::Conditional(conditional) = parse_expr("a ? b : c") else {
            panic!("Expected conditional");
        };
        assert!(matches!(conditional.condition, Expression::Identifier(_)));
    }

    #[test]
    fn prefix_and_postfix_unary() {
        let Expression::Unary(prefix) = parse_expr("!x") else {
            panic!("Expected unary");
        };
        assert!(prefix.is_prefix);
        assert_eq!(prefix.operator, TokenKind::Not);

        let Expression::Unary(negate) = parse_expr("-x") else {
            panic!("Expected unary minus");
        };
        assert_eq!(negate.operator, TokenKind::Sub);

        let Expression::Unary(postfix) = parse_expr("x++") else {
            panic!("Expected unary");
        };
        assert!(!postfix.is_prefix);
        assert_eq!(postfix.operator, TokenKind::Inc);

        let Expression::Unary(delete) = parse_expr("delete x") else {
            panic!("Expected delete");
        };
        assert_eq!(delete.operator, TokenKind::Delete);
    }

    #[test]
    fn suffix_chain() {
        // a.b[1](2).c
        let Expression::MemberAccess(outer) = parse_expr("a.b[1](2).c") else {
            panic!("Expected member access");
        };
        assert_eq!(outer.member_name, "c");
        let Expression::FunctionCall(call) = &outer.expression else {
            panic!("Expected call");
        };
        assert_eq!(call.arguments.len(), 1);
        let Expression::IndexAccess(index) = &call.expression else {
            panic!("Expected index access");
        };
        assert!(matches!(index.base, Expression::MemberAccess(_)));
    }

    #[test]
    fn address_as_member_name() {
        let Expression::MemberAccess(access) = parse_expr("this.address") else {
            panic!("Expected member access");
        };
        assert_eq!(access.member_name, "address");
    }

    #[test]
    fn index_range_access() {
        let Expression::IndexRangeAccess(slice) = parse_expr("data[1:4]") else {
            panic!("Expected slice");
        };
        assert!(slice.start.is_some());
        assert!(slice.end.is_some());

        let Expression::IndexRangeAccess(open) = parse_expr("data[:]") else {
            panic!("Expected slice");
        };
        assert!(open.start.is_none());
        assert!(open.end.is_none());
    }

    #[test]
    fn call_options() {
        let Expression::FunctionCall(call) = parse_expr("f{value: 1, gas: g}(x)") else {
            panic!("Expected call");
        };
        let Expression::FunctionCallOptions(options) = &call.expression else {
            panic!("Expected call options");
        };
        assert_eq!(options.names, vec!["value", "gas"]);
    }

    #[test]
    fn named_arguments() {
        let Expression::FunctionCall(call) = parse_expr("f({a: 1, b: 2})") else {
            panic!("Expected call");
        };
        assert_eq!(call.names, vec!["a", "b"]);
        assert_eq!(call.arguments.len(), 2);
    }

    #[test]
    fn trailing_comma_in_named_arguments_is_2074() {
        assert!(expr_codes("f({a: 1,})").contains(&2074));
    }

    #[test]
    fn new_expression() {
        let Expression::FunctionCall(call) = parse_expr("new uint[](3)") else {
            panic!("Expected call");
        };
        let Expression::New(new_expression) = &call.expression else {
            panic!("Expected new expression");
        };
        assert!(matches!(
            new_expression.type_name,
            crate::ast::TypeName::Array(_)
        ));
    }

    #[test]
    fn payable_cast() {
        let Expression::FunctionCall(call) = parse_expr("payable(a)") else {
            panic!("Expected call");
        };
        let Expression::ElementaryTypeNameExpression(cast) = &call.expression else {
            panic!("Expected elementary type expression");
        };
        assert_eq!(
            cast.type_name.state_mutability,
            Some(StateMutability::Payable)
        );
    }

    #[test]
    fn elementary_cast() {
        let Expression::FunctionCall(call) = parse_expr("uint256(x)") else {
            panic!("Expected call");
        };
        assert!(matches!(
            call.expression,
            Expression::ElementaryTypeNameExpression(_)
        ));
    }

    #[test]
    fn type_pseudo_identifier() {
        let Expression::FunctionCall(call) = parse_expr("type(C)") else {
            panic!("Expected call");
        };
        let Expression::Identifier(identifier) = &call.expression else {
            panic!("Expected identifier");
        };
        assert_eq!(identifier.name, "type");
    }

    #[test]
    fn number_with_sub_denomination() {
        let Expression::Literal(literal) = parse_expr("3 ether") else {
            panic!("Expected literal");
        };
        assert_eq!(literal.value, "3");
        assert_eq!(literal.sub_denomination, Some(SubDenomination::Ether));

        let Expression::Literal(days) = parse_expr("2 days") else {
            panic!("Expected literal");
        };
        assert_eq!(days.sub_denomination, Some(SubDenomination::Day));
    }

    #[test]
    fn adjacent_string_literals_concatenate() {
        let Expression::Literal(literal) = parse_expr("\"foo\" \"bar\"") else {
            panic!("Expected literal");
        };
        assert_eq!(literal.kind, LiteralKind::Str);
        assert_eq!(literal.value, "foobar");
    }

    #[test]
    fn hex_string_literal() {
        let Expression::Literal(literal) = parse_expr("hex\"deadbeef\"") else {
            panic!("Expected literal");
        };
        assert_eq!(literal.kind, LiteralKind::HexStr);
        assert_eq!(literal.value, "deadbeef");
    }

    #[test]
    fn tuples_allow_holes_arrays_do_not() {
        let Expression::Tuple(tuple) = parse_expr("(1, , 3)") else {
            panic!("Expected tuple");
        };
        assert!(!tuple.is_array);
        assert_eq!(tuple.components.len(), 3);
        assert!(tuple.components[1].is_none());

        let codes = expr_codes("[1, , 2]");
        assert!(codes.contains(&4799));
    }

    #[test]
    fn inline_array() {
        let Expression::Tuple(array) = parse_expr("[1, 2, 3]") else {
            panic!("Expected inline array");
        };
        assert!(array.is_array);
        assert_eq!(array.components.len(), 3);
        assert!(array.components.iter().all(Option::is_some));
    }

    #[test]
    fn empty_tuple() {
        let Expression::Tuple(tuple) = parse_expr("()") else {
            panic!("Expected tuple");
        };
        assert!(tuple.components.is_empty());
    }

    #[test]
    fn missing_primary_is_fatal_6933() {
        assert!(expr_codes("1 + ;").contains(&6933));
    }

    #[test]
    fn exponent_binds_tightest() {
        // 2 * 3 ** 4 parses as 2 * (3 ** 4)
        let Expression::Binary(mul) = parse_expr("2 * 3 ** 4") else {
            panic!("Expected binary expression");
        };
        assert_eq!(mul.operator, TokenKind::Mul);
        let Expression::Binary(exp) = &mul.right else {
            panic!("Expected exponentiation");
        };
        assert_eq!(exp.operator, TokenKind::Exp);
    }
}
