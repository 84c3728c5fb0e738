// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Piecewise and selection operations
//!
//! These operations are continuous but not differentiable everywhere, so
//! most of them refuse to carry a Jacobian: their centered form keeps the
//! midpoint enclosure and leaves `da` empty, which makes parents fall back
//! to the natural form.

use super::chain_row;
use crate::expr::ScalarValue;
use crate::interval::{bwd, chi, Interval, IntervalMatrix};

pub struct AbsOp;

impl AbsOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.abs()
    }

    fn def(x1: &ScalarValue) -> bool {
        x1.def_domain && x1.a != Interval::point(0.0)
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        // a / |a| encloses the slope (+/-1, or [-1,1] across zero)
        let deriv = x1.a / x1.a.abs();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::abs(y, x1);
    }
}

pub struct SignOp;

impl SignOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.sign()
    }

    fn def(x1: &ScalarValue) -> bool {
        x1.def_domain && x1.a != Interval::point(0.0)
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    // piecewise constant: zero slope wherever the sign is defined
    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            IntervalMatrix::zeros(1, x1.da.ncols()),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::sign(y, x1);
    }
}

pub struct FloorOp;

impl FloorOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.floor()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::floor(y, x1);
    }
}

pub struct CeilOp;

impl CeilOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.ceil()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::ceil(y, x1);
    }
}

pub struct MinOp;

impl MinOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        x1.min_i(x2)
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::min(y, x1, x2);
    }
}

pub struct MaxOp;

impl MaxOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        x1.max_i(x2)
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::max(y, x1, x2);
    }
}

/// `chi(x1, x2, x3)` selects `x2` where `x1 <= 0`, `x3` where `x1 > 0`,
/// and hulls both branches when the guard straddles zero.
pub struct ChiOp;

impl ChiOp {
    pub fn fwd(x1: &Interval, x2: &Interval, x3: &Interval) -> Interval {
        chi(x1, x2, x3)
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue, x3: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(
            Self::fwd(&x1.a, &x2.a, &x3.a),
            x1.def_domain && x2.def_domain && x3.def_domain,
        )
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue, x3: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() || !x3.has_jacobian() {
            return Self::fwd_natural(x1, x2, x3);
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m, &x3.m),
            Self::fwd(&x1.a, &x2.a, &x3.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain && x2.def_domain && x3.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval, x3: &mut Interval) {
        bwd::chi(y, x1, x2, x3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi_selects_branches() {
        let neg = Interval::new(-2.0, -1.0);
        let pos = Interval::new(1.0, 2.0);
        let straddle = Interval::new(-1.0, 1.0);
        let b1 = Interval::new(10.0, 11.0);
        let b2 = Interval::new(20.0, 21.0);
        assert_eq!(ChiOp::fwd(&neg, &b1, &b2), b1);
        assert_eq!(ChiOp::fwd(&pos, &b1, &b2), b2);
        let hulled = ChiOp::fwd(&straddle, &b1, &b2);
        assert!(hulled.contains(10.0) && hulled.contains(21.0));
    }

    #[test]
    fn test_min_bwd_narrows_the_only_possible_branch() {
        // y = [0,1], x1 = [5,6] cannot achieve the min, so x2 must
        let mut x1 = Interval::new(5.0, 6.0);
        let mut x2 = Interval::new(-3.0, 8.0);
        MinOp::bwd(&Interval::new(0.0, 1.0), &mut x1, &mut x2);
        assert_eq!(x2, Interval::new(0.0, 1.0));
        assert_eq!(x1, Interval::new(5.0, 6.0));
    }

    #[test]
    fn test_sign_centered_has_zero_slope() {
        let mut da = IntervalMatrix::zeros(1, 2);
        da[(0, 0)] = Interval::point(1.0);
        let x = ScalarValue::centered(Interval::point(2.0), Interval::new(1.0, 3.0), da, true);
        let y = SignOp::fwd_centered(&x);
        assert!(y.has_jacobian());
        assert_eq!(y.da[(0, 0)], Interval::point(0.0));
        assert_eq!(y.a, Interval::point(1.0));
    }
}
