// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Expression graphs
//!
//! Shared directed acyclic graphs of interval operations. Nodes carry a
//! unique id; evaluation state lives outside the graph in a per-call
//! [`ValueMap`], so one graph can serve any number of calls with different
//! bindings.

mod args;
mod build;
mod error;
mod id;
mod node;
mod value;

pub use args::{ArgKind, ArgValue, ArgsList, VarDecl};
pub use build::{
    abs, acos, asin, atan, atan2, ceil, chi, cos, cosh, exp, floor, log, max, min, pow, sign, sin,
    sinh, sqr, sqrt, tan, tanh, vec, ScalarVar, VectorVar,
};
pub use error::ExprError;
pub use id::ExprId;
pub use node::{MatrixExpr, ScalarExpr, VectorExpr};
pub use value::{MatrixValue, ScalarValue, Value, ValueMap, VectorValue};

pub(crate) use node::{CopyMemo, Substitution};
