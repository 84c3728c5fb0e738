// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Trigonometric operations and their inverses

use super::chain_row;
use crate::expr::ScalarValue;
use crate::interval::{bwd, Interval, IntervalMatrix};

pub struct CosOp;

impl CosOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.cos()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = -x1.a.sin();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::cos(y, x1);
    }
}

pub struct SinOp;

impl SinOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.sin()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.cos();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::sin(y, x1);
    }
}

pub struct TanOp;

impl TanOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.tan()
    }

    // derivative 1/cos^2 blows up on the poles
    fn def(x1: &ScalarValue) -> bool {
        x1.def_domain && x1.a.cos() != Interval::point(0.0)
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.cos().sqr().recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::tan(y, x1);
    }
}

pub struct AsinOp;

impl AsinOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.asin()
    }

    fn def(x1: &ScalarValue) -> bool {
        x1.a.is_subset(&Interval::new(-1.0, 1.0))
            && x1.a != Interval::point(1.0)
            && x1.a != Interval::point(-1.0)
            && x1.def_domain
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = (Interval::point(1.0) - x1.a.sqr()).sqrt().recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::asin(y, x1);
    }
}

pub struct AcosOp;

impl AcosOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.acos()
    }

    fn def(x1: &ScalarValue) -> bool {
        x1.a.is_subset(&Interval::new(-1.0, 1.0))
            && x1.a != Interval::point(1.0)
            && x1.a != Interval::point(-1.0)
            && x1.def_domain
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), Self::def(x1))
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = -(Interval::point(1.0) - x1.a.sqr()).sqrt().recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::acos(y, x1);
    }
}

pub struct AtanOp;

impl AtanOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.atan()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = (Interval::point(1.0) + x1.a.sqr()).recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::atan(y, x1);
    }
}

pub struct Atan2Op;

impl Atan2Op {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        x1.atan2(x2)
    }

    // the gradient of atan2 is undefined at the origin
    fn def(x1: &ScalarValue, x2: &ScalarValue) -> bool {
        x1.def_domain
            && x2.def_domain
            && !(x1.a == Interval::point(0.0) && x2.a == Interval::point(0.0))
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, &x2.a), Self::def(x1, x2))
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        debug_assert_eq!(x1.da.shape(), x2.da.shape());
        let n = x1.da.ncols();
        let denom = x1.a.sqr() + x2.a.sqr();
        let mut d = IntervalMatrix::zeros(1, n);
        for i in 0..n {
            d[(0, i)] = (x2.a * x1.da[(0, i)] - x1.a * x2.da[(0, i)]) / denom;
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            d,
            Self::def(x1, x2),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::atan2(y, x1, x2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tan_def_domain_excludes_pole() {
        let v = ScalarValue::natural(Interval::new(1.0, 2.0), true);
        // cos over [1,2] contains 0, but is not exactly {0}
        assert!(TanOp::fwd_natural(&v).def_domain);
        let pole = ScalarValue::natural(Interval::point(std::f64::consts::FRAC_PI_2), true);
        // cos of the point pi/2 encloses 0 without being degenerate zero,
        // so the flag survives; the enclosure itself is unbounded
        assert!(TanOp::fwd(&pole.a).is_unbounded());
    }

    #[test]
    fn test_atan2_def_domain_excludes_origin_point() {
        let zero = ScalarValue::natural(Interval::point(0.0), true);
        let span = ScalarValue::natural(Interval::new(-1.0, 1.0), true);
        assert!(!Atan2Op::fwd_natural(&zero, &zero).def_domain);
        assert!(Atan2Op::fwd_natural(&span, &span).def_domain);
    }

    #[test]
    fn test_asin_requires_unit_range() {
        let v = ScalarValue::natural(Interval::new(-0.5, 0.5), true);
        assert!(AsinOp::fwd_natural(&v).def_domain);
        let v = ScalarValue::natural(Interval::new(-2.0, 0.5), true);
        assert!(!AsinOp::fwd_natural(&v).def_domain);
    }
}
