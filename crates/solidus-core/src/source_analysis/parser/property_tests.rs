// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Solidity parser.
//!
//! These tests use `proptest` to verify parser invariants over generated
//! inputs:
//!
//! 1. **Parser never panics** — arbitrary string input always returns a
//!    result, with and without error recovery
//! 2. **Spans within input** — every diagnostic and AST node span satisfies
//!    `start <= end <= input.len()`
//! 3. **Node ids pairwise distinct** — within one parse
//! 4. **Fatal implies null unit** — a fatal diagnostic (without recovery)
//!    means no unit, and a missing unit always comes with diagnostics
//! 5. **Placeholders only in modifiers** — `_;` nodes never appear under a
//!    function body

use proptest::prelude::*;

use crate::ast::{
    visit_unit_nodes, Block, ContractPart, SourceUnit, SourceUnitPart, Statement,
};
use crate::source_analysis::{parse_source_unit, ParserConfig, Severity};

// ============================================================================
// Near-valid Solidity generators
// ============================================================================

/// Solidity fragments for composing near-valid inputs.
///
/// Most are valid; a few are intentionally broken to exercise error
/// recovery paths when mutated by the generators.
const FRAGMENTS: &[&str] = &[
    "pragma solidity ^0.8.0;",
    "// SPDX-License-Identifier: MIT\ncontract C {}",
    "contract C { uint x; }",
    "contract C { uint[] a; function f() public { a.push(1); } }",
    "contract C { mapping(address => uint) balances; }",
    "library L { function add(uint a, uint b) internal pure returns (uint) { return a + b; } }",
    "interface I { function f() external; }",
    "abstract contract A is B, C(1) {}",
    "contract C { modifier m() { _; } function f() public m {} }",
    "contract C { event E(address indexed a); function f() public { emit E(msg.sender); } }",
    "contract C { function f() public { x.y.z[1][2] a; a = 3; } }",
    "contract C { function f() public { (uint a, , uint c) = g(); } }",
    "contract C { function f() public { for (uint i = 0; i < 10; i++) { s += i; } } }",
    "contract C { function f() public { if (a) b = 1; else b = 2; } }",
    "contract C { function f() public { try o.c() returns (uint v) { x = v; } catch { x = 0; } } }",
    "contract C { function f() public { assembly { let x := 1 } } }",
    "contract C { constructor() { owner = msg.sender; } receive() external payable {} }",
    "struct S { uint a; }",
    "enum E { A, B }",
    "import {a as b} from \"./x.sol\";",
    "using L for uint;",
    "contract C { uint constant X = 3 ether; }",
    "contract C { function f() public { delete a[1]; } }",
    "contract C { enum E {} }",
    "contract C { function f(uint a,) public {} }",
];

/// Generates a fragment from the seed corpus.
fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// Generates a truncated fragment (cut at a random char boundary).
fn truncated_fragment() -> impl Strategy<Value = String> {
    valid_fragment().prop_flat_map(|s| {
        let len = s.len();
        if len <= 1 {
            Just(s).boxed()
        } else {
            (1..len)
                .prop_map(move |cut| {
                    let mut cut = cut;
                    while cut > 0 && !s.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    s[..cut].to_string()
                })
                .boxed()
        }
    })
}

/// Generates input with swapped delimiters.
fn mismatched_delimiters() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| {
        s.chars()
            .map(|c| match c {
                '{' => '(',
                '}' => ']',
                '(' => '{',
                _ => c,
            })
            .collect()
    })
}

/// Generates input with semicolons removed.
fn missing_semicolons() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| s.replace(';', " "))
}

/// Doubles every `+` and `=`, forcing the expression parser onto its
/// missing-operand error paths.
fn duplicated_operators() -> impl Strategy<Value = String> {
    valid_fragment().prop_map(|s| s.replace('+', "+ +").replace('=', "= ="))
}

/// A near-valid Solidity input using one of several mutation strategies.
fn near_valid_solidity() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_fragment(),
        truncated_fragment(),
        mismatched_delimiters(),
        missing_semicolons(),
        duplicated_operators(),
    ]
}

// ============================================================================
// Placeholder search
// ============================================================================

fn block_has_placeholder(block: &Block) -> bool {
    block.statements.iter().any(statement_has_placeholder)
}

fn statement_has_placeholder(statement: &Statement) -> bool {
    match statement {
        Statement::Placeholder(_) => true,
        Statement::Block(block) => block_has_placeholder(block),
        Statement::If(node) => {
            statement_has_placeholder(&node.true_body)
                || node
                    .false_body
                    .as_ref()
                    .is_some_and(statement_has_placeholder)
        }
        Statement::While(node) => statement_has_placeholder(&node.body),
        Statement::For(node) => {
            node.init.as_ref().is_some_and(statement_has_placeholder)
                || statement_has_placeholder(&node.body)
        }
        Statement::Try(node) => node
            .clauses
            .iter()
            .any(|clause| block_has_placeholder(&clause.block)),
        _ => false,
    }
}

/// True if a `_;` placeholder appears outside a modifier body.
fn placeholder_outside_modifier(unit: &SourceUnit) -> bool {
    for part in &unit.nodes {
        let contract = match part {
            SourceUnitPart::Contract(contract) => contract,
            SourceUnitPart::Function(function) => {
                if function.body.as_ref().is_some_and(block_has_placeholder) {
                    return true;
                }
                continue;
            }
            _ => continue,
        };
        for node in &contract.nodes {
            if let ContractPart::Function(function) = node {
                if function.body.as_ref().is_some_and(block_has_placeholder) {
                    return true;
                }
            }
        }
    }
    false
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the parser never panics on arbitrary string input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,400}") {
        let _ = parse_source_unit(&input, &ParserConfig::default());
    }

    /// Property 1b: nor with error recovery enabled.
    #[test]
    fn parser_never_panics_with_recovery(input in near_valid_solidity()) {
        let config = ParserConfig { error_recovery: true, ..ParserConfig::default() };
        let _ = parse_source_unit(&input, &config);
    }

    /// Property 2: every diagnostic span lies within the input.
    #[test]
    fn diagnostic_spans_within_input(input in near_valid_solidity()) {
        let (_, diagnostics) = parse_source_unit(&input, &ParserConfig::default());
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for diagnostic in &diagnostics {
            prop_assert!(
                diagnostic.span.start() <= diagnostic.span.end(),
                "span start {} > end {} for input {:?}: {}",
                diagnostic.span.start(),
                diagnostic.span.end(),
                input,
                diagnostic.message,
            );
            prop_assert!(
                diagnostic.span.end() <= input_len,
                "span end {} exceeds input length {} for input {:?}: {}",
                diagnostic.span.end(),
                input_len,
                input,
                diagnostic.message,
            );
        }
    }

    /// Properties 2b and 3: node spans lie within the input and node ids
    /// are pairwise distinct.
    #[test]
    fn node_spans_and_ids(input in near_valid_solidity()) {
        let (unit, _) = parse_source_unit(&input, &ParserConfig::default());
        if let Some(unit) = unit {
            let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
            let mut seen = std::collections::HashSet::new();
            let mut duplicate = None;
            let mut bad_span = None;
            visit_unit_nodes(&unit, &mut |id, span| {
                if !seen.insert(id) {
                    duplicate = Some(id);
                }
                if span.start() > span.end() || span.end() > input_len {
                    bad_span = Some(span);
                }
            });
            prop_assert!(duplicate.is_none(), "duplicate node id {duplicate:?} for input {input:?}");
            prop_assert!(bad_span.is_none(), "span {bad_span:?} out of bounds for input {input:?}");
        }
    }

    /// Property 4: without recovery, a fatal diagnostic means no unit, and
    /// a missing unit always comes with at least one diagnostic.
    #[test]
    fn fatal_means_null_unit(input in near_valid_solidity()) {
        let (unit, diagnostics) = parse_source_unit(&input, &ParserConfig::default());
        let has_fatal = diagnostics.iter().any(|d| d.severity == Severity::Fatal);
        if has_fatal {
            prop_assert!(unit.is_none(), "fatal diagnostic but unit produced for {input:?}");
        } else {
            prop_assert!(unit.is_some(), "no fatal diagnostic but unit missing for {input:?}");
        }
        if unit.is_none() {
            prop_assert!(!diagnostics.is_empty(), "unit missing without diagnostics for {input:?}");
        }
    }

    /// Structural idempotence: parsing the same source twice yields the
    /// same tree (node ids are drawn from a parser-local counter, so even
    /// they coincide) and the same diagnostics.
    #[test]
    fn reparse_is_deterministic(input in near_valid_solidity()) {
        let first = parse_source_unit(&input, &ParserConfig::default());
        let second = parse_source_unit(&input, &ParserConfig::default());
        prop_assert_eq!(first, second);
    }

    /// Property 5: `_;` placeholders only ever appear inside modifier
    /// bodies.
    #[test]
    fn placeholders_only_inside_modifiers(input in near_valid_solidity()) {
        let config = ParserConfig { error_recovery: true, ..ParserConfig::default() };
        let (unit, _) = parse_source_unit(&input, &config);
        if let Some(unit) = unit {
            prop_assert!(
                !placeholder_outside_modifier(&unit),
                "placeholder outside a modifier body for input {input:?}",
            );
        }
    }
}
