// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Boxprop
//!
//! Interval-sound constraint propagation over shared expression DAGs.
//! Expressions are authored with operator overloads, bound to an argument
//! list as an [`AnalyticFunction`], then evaluated forward (natural and
//! centered interval forms) or contracted backward against an output
//! constraint. Every enclosure the engine returns is a guaranteed superset
//! of the true image; inconsistency shows up as empty intervals, domain
//! violations as a cleared definition flag, never as panics.
//!
//! ```
//! use boxprop::{AnalyticFunction, ArgValue, Interval, ScalarVar, sqr, sqrt};
//!
//! let x = ScalarVar::new("x");
//! let y = ScalarVar::new("y");
//! let dist = sqrt(sqr(&x) + sqr(&y));
//! let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &dist)?;
//!
//! let hull = f.eval(&[
//!     ArgValue::from(Interval::new(3.0, 3.0)),
//!     ArgValue::from(Interval::new(4.0, 4.0)),
//! ])?;
//! assert!(hull.contains(5.0));
//! # Ok::<(), boxprop::ExprError>(())
//! ```

pub mod expr;
pub mod function;
pub mod interval;
pub mod ops;

pub use expr::{
    abs, acos, asin, atan, atan2, ceil, chi, cos, cosh, exp, floor, log, max, min, pow, sign, sin,
    sinh, sqr, sqrt, tan, tanh, vec, ArgKind, ArgValue, ArgsList, ExprError, MatrixExpr,
    ScalarExpr, ScalarVar, VarDecl, VectorExpr, VectorVar,
};
pub use function::{
    AnalyticFunction, ArgExpr, EvalMode, FunctionBody, ScalarFunction, VectorFunction,
};
pub use interval::{Interval, IntervalMatrix, IntervalVector};
