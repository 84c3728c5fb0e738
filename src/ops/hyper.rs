// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Hyperbolic operations

use super::chain_row;
use crate::expr::ScalarValue;
use crate::interval::{bwd, Interval};

pub struct SinhOp;

impl SinhOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.sinh()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.cosh();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::sinh(y, x1);
    }
}

pub struct CoshOp;

impl CoshOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.cosh()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.sinh();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::cosh(y, x1);
    }
}

pub struct TanhOp;

impl TanhOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.tanh()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.cosh().sqr().recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::tanh(y, x1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosh_image_is_at_least_one() {
        let v = ScalarValue::natural(Interval::new(-1.0, 1.0), true);
        let y = CoshOp::fwd_natural(&v);
        assert!(y.a.lb() >= 1.0 - 1e-12);
        assert!(y.a.contains(1.0));
    }

    #[test]
    fn test_sinh_bwd_is_bijective() {
        let mut x = Interval::new(-100.0, 100.0);
        SinhOp::bwd(&Interval::point(0.0), &mut x);
        assert!(x.contains(0.0));
        assert!(x.diam() < 1e-9);
    }
}
