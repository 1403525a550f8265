// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! The token source consumed by the parser.
//!
//! A [`Scanner`] wraps a lexed token stream and exposes the operations the
//! parser needs: the current token, one- and two-token lookahead, the
//! current literal text, elementary-type size info, the doc comment
//! preceding the current token, and the underlying source text.
//!
//! The scanner never mutates the source; it only moves a cursor forward.

use ecow::EcoString;

use super::{lex_with_eof, DocComment, Span, Token, TokenKind};

/// A forward-only cursor over a lexed token stream.
#[derive(Debug)]
pub struct Scanner {
    source: String,
    tokens: Vec<Token>,
    index: usize,
}

impl Scanner {
    /// Lexes the given source and positions the cursor at the first token.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            tokens: lex_with_eof(source),
            index: 0,
        }
    }

    /// The token under the cursor.
    #[must_use]
    pub fn current_token(&self) -> &Token {
        // lex_with_eof guarantees a trailing Eof token and advance() never
        // moves past it.
        &self.tokens[self.index]
    }

    /// The kind of the token under the cursor.
    #[must_use]
    pub fn current(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Where the token under the cursor sits in the source.
    #[must_use]
    pub fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// One token of lookahead, cursor untouched.
    #[must_use]
    pub fn peek(&self) -> &TokenKind {
        self.kind_at(self.index + 1)
    }

    /// Two tokens of lookahead; the call-options check (`{ ident :`)
    /// needs it.
    #[must_use]
    pub fn peek_next_next(&self) -> &TokenKind {
        self.kind_at(self.index + 2)
    }

    fn kind_at(&self, index: usize) -> &TokenKind {
        self.tokens
            .get(index)
            .map_or(&TokenKind::Eof, Token::kind)
    }

    /// Moves forward one token and returns the new current kind.
    pub fn advance(&mut self) -> &TokenKind {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Returns the raw text of the current token: the literal payload for
    /// identifiers and literals, the empty string otherwise.
    #[must_use]
    pub fn current_literal(&self) -> EcoString {
        self.current().as_literal().cloned().unwrap_or_default()
    }

    /// Returns `(first_size, second_size)` for the current token if it is a
    /// sized elementary type, `(0, 0)` otherwise.
    #[must_use]
    pub fn current_token_info(&self) -> (u32, u32) {
        match self.current() {
            TokenKind::Elementary(elem) => (elem.first_size, elem.second_size),
            _ => (0, 0),
        }
    }

    /// Returns the doc comment directly preceding the current token, if any.
    #[must_use]
    pub fn current_doc_comment(&self) -> Option<&DocComment> {
        self.current_token().doc()
    }

    /// Returns the full underlying source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead() {
        let scanner = Scanner::new("a b c");
        assert_eq!(scanner.current(), &TokenKind::Identifier("a".into()));
        assert_eq!(scanner.peek(), &TokenKind::Identifier("b".into()));
        assert_eq!(scanner.peek_next_next(), &TokenKind::Identifier("c".into()));
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut scanner = Scanner::new("a");
        assert_eq!(scanner.advance(), &TokenKind::Eof);
        assert_eq!(scanner.advance(), &TokenKind::Eof);
        assert_eq!(scanner.peek(), &TokenKind::Eof);
    }

    #[test]
    fn literal_and_info() {
        let mut scanner = Scanner::new("foo uint128 ;");
        assert_eq!(scanner.current_literal(), "foo");
        scanner.advance();
        assert_eq!(scanner.current_token_info(), (128, 0));
        scanner.advance();
        assert_eq!(scanner.current_literal(), "");
    }

    #[test]
    fn doc_comment_visible_at_current() {
        let scanner = Scanner::new("/// doc\ncontract C {}");
        let doc = scanner.current_doc_comment().expect("doc attached");
        assert_eq!(doc.text, "doc");
    }
}
