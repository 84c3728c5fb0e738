// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Typed errors for function construction and evaluation

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The body expression reads a variable that the argument list does not
    /// declare. Rejected at construction time.
    #[error("expression uses variable `{0}` which is not in the argument list")]
    UndeclaredVariable(String),

    #[error("wrong number of input values: expected {expected}, got {got}")]
    ArgCount { expected: usize, got: usize },

    #[error("input {index} ({name}) is a {got} value, but the argument is declared {expected}")]
    ArgKind {
        index: usize,
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("input {index} ({name}) has {got} components, declared size is {expected}")]
    ArgSize {
        index: usize,
        name: String,
        expected: usize,
        got: usize,
    },

    /// Composition site received expressions whose shapes do not match the
    /// declared arguments of the called function.
    #[error("composition argument {index} has shape {got_rows}x{got_cols}, expected {expected_rows}x{expected_cols}")]
    CompositionShape {
        index: usize,
        expected_rows: usize,
        expected_cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
}
