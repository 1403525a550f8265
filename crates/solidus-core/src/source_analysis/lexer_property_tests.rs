// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Solidity lexer.
//!
//! 1. **Lexer never panics** — arbitrary string input always tokenizes
//! 2. **Spans are ordered and in bounds** — token spans never overlap, never
//!    run backwards, and stay within the input
//! 3. **Termination** — `lex_with_eof` always ends with exactly one `Eof`
//!    token positioned at the end of input

use proptest::prelude::*;

use super::{lex_with_eof, TokenKind};

proptest! {
    /// Property 1: the lexer never panics on arbitrary input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,400}") {
        let _ = lex_with_eof(&input);
    }

    /// Property 2: token spans are ordered, non-overlapping, and within
    /// the input.
    #[test]
    fn token_spans_are_ordered(input in "\\PC{0,400}") {
        let tokens = lex_with_eof(&input);
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        let mut previous_end = 0u32;
        for token in &tokens {
            let span = token.span();
            prop_assert!(span.start() <= span.end(), "backwards span in {input:?}");
            prop_assert!(span.end() <= input_len, "span out of bounds in {input:?}");
            prop_assert!(span.start() >= previous_end, "overlapping tokens in {input:?}");
            previous_end = span.end();
        }
    }

    /// Property 3: the stream ends with exactly one Eof at the end of
    /// input.
    #[test]
    fn stream_terminates_with_eof(input in "\\PC{0,400}") {
        let tokens = lex_with_eof(&input);
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
        let last = tokens.last().expect("stream is never empty");
        prop_assert!(matches!(last.kind(), TokenKind::Eof));
        prop_assert_eq!(last.span().end() as usize, input.len());
    }
}
