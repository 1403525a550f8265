// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Version-pragma interpretation.
//!
//! A `pragma solidity …;` directive carries a version match expression such
//! as `^0.8.0`, `>=0.7.0 <0.9.0`, or `^0.7.0 || ^0.8.0`. This module
//! rebuilds that expression from the pragma's literal spellings and
//! evaluates it against the compiler version configured for the parse.
//!
//! Alternatives separated by `||` are OR-combined; comparators within one
//! alternative are AND-combined. A bare version with no operator means an
//! exact match.

use ecow::EcoString;
use semver::{Version, VersionReq};

/// The pragma's version expression could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidVersionPragma;

/// Operators that attach to the version chunk following them.
const OPERATORS: [&str; 7] = ["^", "~", "<", "<=", ">", ">=", "="];

/// Evaluates the version match expression given by the pragma literals
/// (everything after the `solidity` keyword) against `current_version`.
pub fn pragma_matches(
    literals: &[EcoString],
    current_version: &Version,
) -> Result<bool, InvalidVersionPragma> {
    let mut alternatives: Vec<Vec<String>> = vec![Vec::new()];
    let mut pending_op: Option<&str> = None;

    for literal in literals {
        let text = literal.as_str();
        if text == "||" {
            if pending_op.is_some() || alternatives.last().map_or(true, Vec::is_empty) {
                return Err(InvalidVersionPragma);
            }
            alternatives.push(Vec::new());
            continue;
        }
        if OPERATORS.contains(&text) {
            if pending_op.is_some() {
                return Err(InvalidVersionPragma);
            }
            pending_op = Some(text);
            continue;
        }
        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{text}"),
            None if text == "*" => "*".to_owned(),
            None => format!("={text}"),
        };
        alternatives
            .last_mut()
            .expect("alternatives is never empty")
            .push(comparator);
    }

    if pending_op.is_some() || alternatives.iter().any(Vec::is_empty) {
        return Err(InvalidVersionPragma);
    }

    for alternative in &alternatives {
        let req =
            VersionReq::parse(&alternative.join(", ")).map_err(|_| InvalidVersionPragma)?;
        if req.matches(current_version) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(parts: &[&str]) -> Vec<EcoString> {
        parts.iter().map(|p| EcoString::from(*p)).collect()
    }

    fn version(text: &str) -> Version {
        Version::parse(text).expect("valid version")
    }

    #[test]
    fn caret_range() {
        let lits = literals(&["^", "0.8.0"]);
        assert_eq!(pragma_matches(&lits, &version("0.8.4")), Ok(true));
        assert_eq!(pragma_matches(&lits, &version("0.9.0")), Ok(false));
        assert_eq!(pragma_matches(&lits, &version("0.7.6")), Ok(false));
    }

    #[test]
    fn bare_version_is_exact() {
        let lits = literals(&["0.8.4"]);
        assert_eq!(pragma_matches(&lits, &version("0.8.4")), Ok(true));
        assert_eq!(pragma_matches(&lits, &version("0.8.5")), Ok(false));
    }

    #[test]
    fn anded_comparators() {
        let lits = literals(&[">=", "0.7.0", "<", "0.9.0"]);
        assert_eq!(pragma_matches(&lits, &version("0.8.4")), Ok(true));
        assert_eq!(pragma_matches(&lits, &version("0.9.1")), Ok(false));
    }

    #[test]
    fn or_alternatives() {
        let lits = literals(&["^", "0.7.0", "||", "^", "0.8.0"]);
        assert_eq!(pragma_matches(&lits, &version("0.7.3")), Ok(true));
        assert_eq!(pragma_matches(&lits, &version("0.8.1")), Ok(true));
        assert_eq!(pragma_matches(&lits, &version("0.6.12")), Ok(false));
    }

    #[test]
    fn wildcard() {
        let lits = literals(&["*"]);
        assert_eq!(pragma_matches(&lits, &version("0.8.4")), Ok(true));
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(
            pragma_matches(&literals(&["^"]), &version("0.8.4")),
            Err(InvalidVersionPragma)
        );
        assert_eq!(
            pragma_matches(&literals(&["^", "^", "0.8.0"]), &version("0.8.4")),
            Err(InvalidVersionPragma)
        );
        assert_eq!(
            pragma_matches(&literals(&["||", "0.8.0"]), &version("0.8.4")),
            Err(InvalidVersionPragma)
        );
        assert_eq!(
            pragma_matches(&literals(&["oops"]), &version("0.8.4")),
            Err(InvalidVersionPragma)
        );
    }
}
