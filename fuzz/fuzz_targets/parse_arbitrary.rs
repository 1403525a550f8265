// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Parses arbitrary bytes twice: once with the default configuration and
//! once with error recovery enabled, so the resynchronization paths
//! (contract bodies, blocks, statements) get mutated input too.
//!
//! Input bytes go through `String::from_utf8_lossy` first — invalid UTF-8
//! turns into U+FFFD replacement characters instead of being dropped, so
//! the lexer still sees something at those positions.
//!
//! Beyond not panicking, the one invariant checked here is the driver
//! firewall's contract: whenever no source unit comes back, at least one
//! diagnostic must explain why.

#![no_main]

use libfuzzer_sys::fuzz_target;
use solidus_core::source_analysis::{parse_source_unit, ParserConfig};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let (unit, diagnostics) = parse_source_unit(&source, &ParserConfig::default());
    if unit.is_none() {
        assert!(!diagnostics.is_empty(), "missing unit without diagnostics");
    }

    let recovery = ParserConfig {
        error_recovery: true,
        ..ParserConfig::default()
    };
    let _ = parse_source_unit(&source, &recovery);
});
