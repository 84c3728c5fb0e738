// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Operator policies
//!
//! One policy struct per graph operation, each bundling the four functions
//! the evaluator dispatches on: `fwd` (domain-level image), `fwd_natural`
//! (value-level natural evaluation), `fwd_centered` (value-level evaluation
//! carrying midpoint enclosures and interval Jacobians through the chain
//! rule), and `bwd` (preimage narrowing). Policies are stateless; all
//! interval kernels live in [`crate::interval`].

pub mod arith;
pub mod explog;
pub mod hyper;
pub mod piecewise;
pub mod power;
pub mod structure;
pub mod trig;

pub use arith::{AddOp, DivOp, MulOp, NegOp, SubOp};
pub use explog::{ExpOp, LogOp};
pub use hyper::{CoshOp, SinhOp, TanhOp};
pub use piecewise::{AbsOp, CeilOp, ChiOp, FloorOp, MaxOp, MinOp, SignOp};
pub use power::{PowOp, SqrOp, SqrtOp};
pub use structure::{ComponentOp, SubvectorOp, VectorOp};
pub use trig::{AcosOp, AsinOp, Atan2Op, AtanOp, CosOp, SinOp, TanOp};

use crate::interval::{Interval, IntervalMatrix};

/// Chain rule for a scalar unary operation: multiplies the `1xn` Jacobian
/// row of the operand by an enclosure of the derivative on the operand's
/// range.
pub(crate) fn chain_row(da: &IntervalMatrix, deriv: &Interval) -> IntervalMatrix {
    debug_assert_eq!(da.nrows(), 1);
    let mut d = da.clone();
    for e in d.iter_mut() {
        *e *= *deriv;
    }
    d
}
