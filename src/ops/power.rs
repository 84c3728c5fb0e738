// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Square, square root and power operations

use super::chain_row;
use crate::expr::ScalarValue;
use crate::interval::{bwd, Interval, IntervalMatrix};

pub struct SqrOp;

impl SqrOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.sqr()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = Interval::point(2.0) * x1.a;
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::sqr(y, x1);
    }
}

pub struct SqrtOp;

impl SqrtOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.sqrt()
    }

    // def_domain also excludes {0}, where the derivative is unbounded
    fn def(x1: &ScalarValue) -> bool {
        x1.a.is_subset(&Interval::POSITIVE) && x1.a != Interval::point(0.0) && x1.def_domain
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = (Interval::point(2.0) * x1.a.sqrt()).recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::sqrt(y, x1);
    }
}

pub struct PowOp;

impl PowOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        x1.pow(x2)
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        // d(x1^x2)/dxi with the exponent treated as locally constant
        let n = x1.da.ncols();
        let mut d = IntervalMatrix::zeros(1, n);
        let factor = x2.a * x1.a.pow(&(x2.a - Interval::point(1.0)));
        for i in 0..n {
            d[(0, i)] = x1.da[(0, i)] * factor;
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            d,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::pow(y, x1, x2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_def_domain() {
        let ok = ScalarValue::natural(Interval::new(1.0, 4.0), true);
        assert!(SqrtOp::fwd_natural(&ok).def_domain);
        let touching = ScalarValue::natural(Interval::new(0.0, 4.0), true);
        // includes zero but is not {0}: still defined, derivative handled upstream
        assert!(SqrtOp::fwd_natural(&touching).def_domain);
        let neg = ScalarValue::natural(Interval::new(-1.0, 4.0), true);
        assert!(!SqrtOp::fwd_natural(&neg).def_domain);
    }

    #[test]
    fn test_sqr_centered_derivative() {
        let mut da = IntervalMatrix::zeros(1, 1);
        da[(0, 0)] = Interval::point(1.0);
        let x = ScalarValue::centered(Interval::point(1.5), Interval::new(1.0, 2.0), da, true);
        let y = SqrOp::fwd_centered(&x);
        assert_eq!(y.da[(0, 0)], Interval::new(2.0, 4.0));
        assert!(y.m.contains(2.25));
    }
}
