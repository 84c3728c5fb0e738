// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Exponential and natural logarithm

use super::chain_row;
use crate::expr::ScalarValue;
use crate::interval::{bwd, Interval};

pub struct ExpOp;

impl ExpOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.exp()
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        let deriv = x1.a.exp();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            x1.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::exp(y, x1);
    }
}

pub struct LogOp;

impl LogOp {
    pub fn fwd(x1: &Interval) -> Interval {
        x1.ln()
    }

    // def_domain also excludes {0}, where neither log nor its derivative exist
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
        let deriv = x1.a.recip();
        ScalarValue::centered(
            Self::fwd(&x1.m),
            Self::fwd(&x1.a),
            chain_row(&x1.da, &deriv),
            Self::def(x1),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::log(y, x1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalMatrix;

    #[test]
    fn test_exp_log_roundtrip_bwd() {
        let mut x = Interval::new(-10.0, 10.0);
        ExpOp::bwd(&Interval::new(1.0, std::f64::consts::E), &mut x);
        assert!(x.is_subset(&Interval::new(-1e-9, 1.0 + 1e-9)));
        assert!(x.contains(0.0) && x.contains(1.0));
    }

    #[test]
    fn test_log_def_domain() {
        let v = ScalarValue::natural(Interval::new(-1.0, 2.0), true);
        assert!(!LogOp::fwd_natural(&v).def_domain);
        let v = ScalarValue::natural(Interval::new(0.5, 2.0), true);
        assert!(LogOp::fwd_natural(&v).def_domain);
    }

    #[test]
    fn test_exp_centered_derivative_is_range_of_exp() {
        let mut da = IntervalMatrix::zeros(1, 1);
        da[(0, 0)] = Interval::point(1.0);
        let x = ScalarValue::centered(Interval::point(0.5), Interval::new(0.0, 1.0), da, true);
        let y = ExpOp::fwd_centered(&x);
        assert!(y.da[(0, 0)].contains(1.0));
        assert!(y.da[(0, 0)].contains(std::f64::consts::E));
    }
}
