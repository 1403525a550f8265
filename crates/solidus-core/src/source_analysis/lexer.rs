// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Solidity source code.
//!
//! A hand-written single-pass tokenizer over the raw source bytes. Writing
//! it by hand (rather than generating it) keeps three things easy that the
//! parser depends on:
//!
//! - Malformed input never stops the stream — an unterminated string or a
//!   stray byte becomes a [`TokenKind::Illegal`] token and lexing continues
//!   at the next sensible position
//! - `///` runs and `/** */` blocks ride along on the token they precede
//!   (the parser turns them into docstrings); every other comment vanishes
//! - Each token records the exact byte range it was read from
//!
//! # Example
//!
//! ```
//! use solidus_core::source_analysis::{Lexer, TokenKind};
//!
//! let tokens: Vec<_> = Lexer::new("a + 1").collect();
//! assert_eq!(tokens.len(), 3); // a, +, 1 (EOF excluded from iterator)
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{DocComment, Span, Token, TokenKind};

/// A lexer that tokenizes Solidity source code.
///
/// Implements [`Iterator`] for easy consumption; the iterator ends before
/// the end-of-source marker (use [`lex_with_eof`] when the parser needs it).
pub struct Lexer<'src> {
    /// The full input; tokens borrow their spelling from it.
    source: &'src str,
    /// Cursor over `source`, yielding each char with its byte offset.
    chars: Peekable<CharIndices<'src>>,
    /// Byte offset one past the last consumed char.
    position: usize,
    /// Doc comment waiting to be attached to the next token.
    pending_doc: Option<DocComment>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Sets up a lexer at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            pending_doc: None,
        }
    }

    /// The upcoming character, left in place.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Looks `n+1` characters ahead without moving the cursor (n=0 is the
    /// same as `peek_char`). Comment and operator disambiguation needs up
    /// to four characters of lookahead (`////`, `>>>=`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Takes one character off the input.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Keeps taking characters as long as `predicate` holds.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// The cursor's byte offset, narrowed to span width.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "spans store u32 offsets; a contract source approaching 4GB is rejected far earlier"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// The span reaching from `start` to the cursor.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// The source bytes a span covers.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and comments; doc comments become the pending doc
    /// attachment for the next token.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    let start = self.current_position();
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    let text = self.text_for(self.span_from(start));
                    // A blank line breaks doc attachment.
                    if text.chars().filter(|&c| c == '\n').count() > 1 {
                        self.pending_doc = None;
                    }
                }
                Some('/')
                    if self.peek_char_n(1) == Some('/')
                        && self.peek_char_n(2) == Some('/')
                        && self.peek_char_n(3) != Some('/') =>
                {
                    self.lex_doc_line();
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.lex_line_comment();
                }
                Some('/')
                    if self.peek_char_n(1) == Some('*')
                        && self.peek_char_n(2) == Some('*')
                        && self.peek_char_n(3) != Some('/') =>
                {
                    self.lex_doc_block();
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.lex_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Lexes a regular line comment: `// ...` (also `//// ...`).
    fn lex_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
        self.pending_doc = None;
    }

    /// Lexes one `/// ...` line, appending to the pending doc comment.
    fn lex_doc_line(&mut self) {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // /
        self.advance(); // /
        let content_start = self.current_position();
        self.advance_while(|c| c != '\n');
        let line = self.text_for(self.span_from(content_start));
        let line = line.strip_prefix(' ').unwrap_or(line);
        let span = self.span_from(start);

        match &mut self.pending_doc {
            Some(doc) => {
                doc.text.push('\n');
                doc.text.push_str(line);
                doc.span = doc.span.merge(span);
            }
            None => {
                self.pending_doc = Some(DocComment {
                    text: EcoString::from(line),
                    span,
                });
            }
        }
    }

    /// Lexes a `/** ... */` doc block, replacing the pending doc comment.
    fn lex_doc_block(&mut self) {
        let start = self.current_position();
        self.advance(); // /
        self.advance(); // *
        self.advance(); // *
        let content_start = self.current_position();
        let content_end = loop {
            match self.peek_char() {
                None => break self.current_position(), // Unterminated - recover gracefully
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    let end = self.current_position();
                    self.advance(); // *
                    self.advance(); // /
                    break end;
                }
                _ => {
                    self.advance();
                }
            }
        };

        let content = &self.source[content_start as usize..content_end as usize];
        self.pending_doc = Some(DocComment {
            text: EcoString::from(content.trim()),
            span: self.span_from(start),
        });
    }

    /// Lexes a regular block comment: `/* ... */` (also `/**/`).
    fn lex_block_comment(&mut self) {
        self.advance(); // /
        self.advance(); // *

        loop {
            match self.peek_char() {
                None => break, // Unterminated - recover gracefully
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance(); // *
                    self.advance(); // /
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.pending_doc = None;
    }

    /// Produces the next token, attaching any doc comment collected while
    /// skipping the trivia in front of it.
    fn lex_token(&mut self) -> Token {
        self.skip_trivia();
        let doc = self.pending_doc.take();

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c),
        };
        let span = self.span_from(start);

        Token::with_doc(kind, span, doc)
    }

    /// Dispatches on the first character of the token.
    fn lex_token_kind(&mut self, c: char) -> TokenKind {
        match c {
            'a'..='z' | 'A'..='Z' | '_' | '$' => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(),
            '"' | '\'' => self.lex_string(c, StringFlavor::Plain),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBrack),
            ']' => self.single(TokenKind::RBrack),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Period),
            ':' => self.single(TokenKind::Colon),
            '?' => self.single(TokenKind::Conditional),
            '~' => self.single(TokenKind::BitNot),
            '=' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::Equal),
                    Some('>') => self.single(TokenKind::DoubleArrow),
                    _ => TokenKind::Assign,
                }
            }
            '+' => {
                self.advance();
                match self.peek_char() {
                    Some('+') => self.single(TokenKind::Inc),
                    Some('=') => self.single(TokenKind::AssignAdd),
                    _ => TokenKind::Add,
                }
            }
            '-' => {
                self.advance();
                match self.peek_char() {
                    Some('-') => self.single(TokenKind::Dec),
                    Some('=') => self.single(TokenKind::AssignSub),
                    _ => TokenKind::Sub,
                }
            }
            '*' => {
                self.advance();
                match self.peek_char() {
                    Some('*') => self.single(TokenKind::Exp),
                    Some('=') => self.single(TokenKind::AssignMul),
                    _ => TokenKind::Mul,
                }
            }
            '/' => {
                // Comments were consumed as trivia, so this is division.
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::AssignDiv),
                    _ => TokenKind::Div,
                }
            }
            '%' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::AssignMod),
                    _ => TokenKind::Mod,
                }
            }
            '!' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::NotEqual),
                    _ => TokenKind::Not,
                }
            }
            '&' => {
                self.advance();
                match self.peek_char() {
                    Some('&') => self.single(TokenKind::And),
                    Some('=') => self.single(TokenKind::AssignBitAnd),
                    _ => TokenKind::BitAnd,
                }
            }
            '|' => {
                self.advance();
                match self.peek_char() {
                    Some('|') => self.single(TokenKind::Or),
                    Some('=') => self.single(TokenKind::AssignBitOr),
                    _ => TokenKind::BitOr,
                }
            }
            '^' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::AssignBitXor),
                    _ => TokenKind::BitXor,
                }
            }
            '<' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::LessThanOrEqual),
                    Some('<') => {
                        self.advance();
                        match self.peek_char() {
                            Some('=') => self.single(TokenKind::AssignShl),
                            _ => TokenKind::Shl,
                        }
                    }
                    _ => TokenKind::LessThan,
                }
            }
            '>' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(TokenKind::GreaterThanOrEqual),
                    Some('>') => {
                        self.advance();
                        match self.peek_char() {
                            Some('=') => self.single(TokenKind::AssignSar),
                            Some('>') => {
                                self.advance();
                                match self.peek_char() {
                                    Some('=') => self.single(TokenKind::AssignShr),
                                    _ => TokenKind::Shr,
                                }
                            }
                            _ => TokenKind::Sar,
                        }
                    }
                    _ => TokenKind::GreaterThan,
                }
            }
            _ => {
                self.advance();
                TokenKind::Illegal(EcoString::from("unexpected character"))
            }
        }
    }

    /// Consumes one character and returns the given kind.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Lexes an identifier, keyword, or prefixed string literal
    /// (`hex"…"`, `unicode"…"`).
    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        let word = self.text_for(self.span_from(start));

        match self.peek_char() {
            Some(quote @ ('"' | '\'')) if word == "hex" => self.lex_hex_string(quote),
            Some(quote @ ('"' | '\'')) if word == "unicode" => {
                self.lex_string(quote, StringFlavor::Unicode)
            }
            _ => TokenKind::from_keyword(word)
                .unwrap_or_else(|| TokenKind::Identifier(EcoString::from(word))),
        }
    }

    /// Lexes a number literal: decimal (with underscores, fraction groups,
    /// and exponent) or hexadecimal.
    ///
    /// Fraction groups may repeat (`0.8.0`) so that version pragmas carry
    /// the full version as one literal.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.current_position();

        if self.peek_char() == Some('0') && matches!(self.peek_char_n(1), Some('x' | 'X')) {
            self.advance(); // 0
            self.advance(); // x
            let digits_start = self.current_position();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            if self.current_position() == digits_start {
                return TokenKind::Illegal(EcoString::from("hex number without digits"));
            }
            return TokenKind::Number(EcoString::from(self.text_for(self.span_from(start))));
        }

        self.advance_while(|c| c.is_ascii_digit() || c == '_');

        // Fraction groups: `.` must be followed by a digit to belong to the
        // number, otherwise it is a member access.
        while self.peek_char() == Some('.')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
        }

        // Exponent.
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let after_sign = match self.peek_char_n(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_char_n(after_sign).is_some_and(|c| c.is_ascii_digit()) {
                self.advance(); // e
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit() || c == '_');
            }
        }

        TokenKind::Number(EcoString::from(self.text_for(self.span_from(start))))
    }

    /// Lexes a string literal, processing escape sequences.
    fn lex_string(&mut self, quote: char, flavor: StringFlavor) -> TokenKind {
        self.advance(); // opening quote
        let mut value = EcoString::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Illegal(EcoString::from("unterminated string literal"));
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('\'') => value.push('\''),
                        Some('"') => value.push('"'),
                        Some('0') => value.push('\0'),
                        Some('\n') => {} // line continuation
                        Some('x') => match self.lex_hex_escape(2) {
                            Some(c) => value.push(c),
                            None => {
                                self.recover_string(quote);
                                return TokenKind::Illegal(EcoString::from(
                                    "invalid escape sequence",
                                ));
                            }
                        },
                        Some('u') => match self.lex_hex_escape(4) {
                            Some(c) => value.push(c),
                            None => {
                                self.recover_string(quote);
                                return TokenKind::Illegal(EcoString::from(
                                    "invalid escape sequence",
                                ));
                            }
                        },
                        _ => {
                            self.recover_string(quote);
                            return TokenKind::Illegal(EcoString::from("invalid escape sequence"));
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        match flavor {
            StringFlavor::Plain => TokenKind::StringLiteral(value),
            StringFlavor::Unicode => TokenKind::UnicodeStringLiteral(value),
        }
    }

    /// Lexes `digits` hex digits of a `\x`/`\u` escape into a char.
    fn lex_hex_escape(&mut self, digits: u32) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let c = self.peek_char()?;
            let digit = c.to_digit(16)?;
            self.advance();
            code = code * 16 + digit;
        }
        char::from_u32(code)
    }

    /// Skips to the closing quote (or line end) after a string error.
    fn recover_string(&mut self, quote: char) {
        self.advance_while(|c| c != quote && c != '\n');
        if self.peek_char() == Some(quote) {
            self.advance();
        }
    }

    /// Lexes a `hex"…"` literal: pairs of hex digits, underscores allowed.
    fn lex_hex_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // opening quote
        let mut value = EcoString::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return TokenKind::Illegal(EcoString::from("unterminated hex string literal"));
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('_') => {
                    self.advance();
                }
                Some(c) if c.is_ascii_hexdigit() => {
                    self.advance();
                    value.push(c);
                }
                Some(_) => {
                    self.recover_string(quote);
                    return TokenKind::Illegal(EcoString::from("invalid hex string literal"));
                }
            }
        }

        if value.chars().count() % 2 != 0 {
            return TokenKind::Illegal(EcoString::from("odd number of digits in hex string"));
        }
        TokenKind::HexStringLiteral(value)
    }
}

/// Which kind of quoted literal is being lexed.
#[derive(Clone, Copy)]
enum StringFlavor {
    Plain,
    Unicode,
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.lex_token();
        if token.kind().is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenizes source text, excluding the end-of-source marker.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenizes source text including the trailing end-of-source token,
/// which the parser relies on.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token();
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{ElementaryKind, ElementaryTypeToken};

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind().clone()).collect()
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        assert_eq!(
            kinds("contract C is B"),
            vec![
                TokenKind::Contract,
                TokenKind::Identifier("C".into()),
                TokenKind::Is,
                TokenKind::Identifier("B".into()),
            ]
        );
    }

    #[test]
    fn lex_sized_types() {
        let tokens = kinds("uint256 bytes32 uint7");
        assert!(matches!(
            &tokens[0],
            TokenKind::Elementary(t) if t.kind == ElementaryKind::UInt && t.first_size == 256
        ));
        assert!(matches!(
            &tokens[1],
            TokenKind::Elementary(t) if t.kind == ElementaryKind::Bytes && t.first_size == 32
        ));
        // uint7 is not a valid width, so it stays an identifier
        assert_eq!(tokens[2], TokenKind::Identifier("uint7".into()));
    }

    #[test]
    fn lex_operators_maximal_munch() {
        assert_eq!(
            kinds("a >>= b >> c >= d > e"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::AssignSar,
                TokenKind::Identifier("b".into()),
                TokenKind::Sar,
                TokenKind::Identifier("c".into()),
                TokenKind::GreaterThanOrEqual,
                TokenKind::Identifier("d".into()),
                TokenKind::GreaterThan,
                TokenKind::Identifier("e".into()),
            ]
        );
        assert_eq!(
            kinds("x ** y *= z"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Exp,
                TokenKind::Identifier("y".into()),
                TokenKind::AssignMul,
                TokenKind::Identifier("z".into()),
            ]
        );
    }

    #[test]
    fn lex_double_arrow() {
        assert_eq!(
            kinds("mapping(address => uint)"),
            vec![
                TokenKind::Mapping,
                TokenKind::LParen,
                TokenKind::Elementary(ElementaryTypeToken::new(ElementaryKind::Address)),
                TokenKind::DoubleArrow,
                TokenKind::Elementary(ElementaryTypeToken::new(ElementaryKind::UInt)),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Number("42".into())]);
        assert_eq!(kinds("0x2a_ff"), vec![TokenKind::Number("0x2a_ff".into())]);
        assert_eq!(kinds("1_000e10"), vec![TokenKind::Number("1_000e10".into())]);
        // Version-style literals stay in one piece.
        assert_eq!(kinds("0.8.0"), vec![TokenKind::Number("0.8.0".into())]);
        // A trailing period is member access, not part of the number.
        assert_eq!(
            kinds("1.x"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::Period,
                TokenKind::Identifier("x".into()),
            ]
        );
    }

    #[test]
    fn lex_strings() {
        assert_eq!(
            kinds(r#""hello" 'world'"#),
            vec![
                TokenKind::StringLiteral("hello".into()),
                TokenKind::StringLiteral("world".into()),
            ]
        );
        assert_eq!(
            kinds(r#""a\nb""#),
            vec![TokenKind::StringLiteral("a\nb".into())]
        );
        assert!(matches!(
            kinds("\"unterminated")[0],
            TokenKind::Illegal(_)
        ));
    }

    #[test]
    fn lex_prefixed_strings() {
        assert_eq!(
            kinds(r#"hex"dead_beef""#),
            vec![TokenKind::HexStringLiteral("deadbeef".into())]
        );
        assert!(matches!(kinds(r#"hex"abc""#)[0], TokenKind::Illegal(_)));
        assert_eq!(
            kinds(r#"unicode"héllo""#),
            vec![TokenKind::UnicodeStringLiteral("héllo".into())]
        );
        // `hex` not followed by a quote is an ordinary identifier.
        assert_eq!(
            kinds("hex x"),
            vec![
                TokenKind::Identifier("hex".into()),
                TokenKind::Identifier("x".into()),
            ]
        );
    }

    #[test]
    fn doc_comment_attaches_to_next_token() {
        let tokens = lex("/// the counter\n/// second line\nuint x;");
        let doc = tokens[0].doc().expect("doc comment attached");
        assert_eq!(doc.text, "the counter\nsecond line");
        assert!(tokens[1].doc().is_none());
    }

    #[test]
    fn doc_block_attaches_to_next_token() {
        let tokens = lex("/** block doc */ contract C {}");
        let doc = tokens[0].doc().expect("doc comment attached");
        assert_eq!(doc.text, "block doc");
    }

    #[test]
    fn regular_comments_are_skipped() {
        assert_eq!(
            kinds("a // comment\n/* block */ b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Identifier("b".into()),
            ]
        );
        let tokens = lex("// not a doc\nx");
        assert!(tokens[0].doc().is_none());
    }

    #[test]
    fn blank_line_breaks_doc_attachment() {
        let tokens = lex("/// orphaned\n\n\nx");
        assert!(tokens[0].doc().is_none());
    }

    #[test]
    fn spans_are_exact() {
        let tokens = lex("ab  cd");
        assert_eq!(tokens[0].span(), Span::new(0, 2));
        assert_eq!(tokens[1].span(), Span::new(4, 6));
    }

    #[test]
    fn eof_token_span() {
        let tokens = lex_with_eof("ab");
        assert_eq!(tokens.last().map(Token::kind), Some(&TokenKind::Eof));
        assert_eq!(tokens.last().map(|t| t.span()), Some(Span::new(2, 2)));
    }
}
