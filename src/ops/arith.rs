// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Addition, subtraction, negation, multiplication, division

use crate::expr::{MatrixValue, ScalarValue, VectorValue};
use crate::interval::{
    bwd, set_empty_matrix, set_empty_vector, vec_is_empty, Interval, IntervalMatrix, IntervalVector,
};

pub struct AddOp;

impl AddOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        *x1 + *x2
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
            &x1.da + &x2.da,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::add(y, x1, x2);
    }

    pub fn fwd_vec(x1: &IntervalVector, x2: &IntervalVector) -> IntervalVector {
        x1 + x2
    }

    pub fn fwd_natural_vec(x1: &VectorValue, x2: &VectorValue) -> VectorValue {
        VectorValue::natural(Self::fwd_vec(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered_vec(x1: &VectorValue, x2: &VectorValue) -> VectorValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural_vec(x1, x2);
        }
        VectorValue::centered(
            Self::fwd_vec(&x1.m, &x2.m),
            Self::fwd_vec(&x1.a, &x2.a),
            &x1.da + &x2.da,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd_vec(y: &IntervalVector, x1: &mut IntervalVector, x2: &mut IntervalVector) {
        debug_assert!(y.len() == x1.len() && y.len() == x2.len());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i], &mut x2[i]);
        }
    }

    pub fn fwd_mat(x1: &IntervalMatrix, x2: &IntervalMatrix) -> IntervalMatrix {
        x1 + x2
    }

    pub fn fwd_natural_mat(x1: &MatrixValue, x2: &MatrixValue) -> MatrixValue {
        MatrixValue::natural(Self::fwd_mat(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered_mat(x1: &MatrixValue, x2: &MatrixValue) -> MatrixValue {
        MatrixValue::centered(
            Self::fwd_mat(&x1.m, &x2.m),
            Self::fwd_mat(&x1.a, &x2.a),
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd_mat(y: &IntervalMatrix, x1: &mut IntervalMatrix, x2: &mut IntervalMatrix) {
        debug_assert!(y.shape() == x1.shape() && y.shape() == x2.shape());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i], &mut x2[i]);
        }
    }
}

pub struct SubOp;

impl SubOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        *x1 - *x2
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
            &x1.da - &x2.da,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::sub(y, x1, x2);
    }

    pub fn fwd_vec(x1: &IntervalVector, x2: &IntervalVector) -> IntervalVector {
        x1 - x2
    }

    pub fn fwd_natural_vec(x1: &VectorValue, x2: &VectorValue) -> VectorValue {
        VectorValue::natural(Self::fwd_vec(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered_vec(x1: &VectorValue, x2: &VectorValue) -> VectorValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural_vec(x1, x2);
        }
        VectorValue::centered(
            Self::fwd_vec(&x1.m, &x2.m),
            Self::fwd_vec(&x1.a, &x2.a),
            &x1.da - &x2.da,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd_vec(y: &IntervalVector, x1: &mut IntervalVector, x2: &mut IntervalVector) {
        debug_assert!(y.len() == x1.len() && y.len() == x2.len());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i], &mut x2[i]);
        }
    }

    pub fn fwd_mat(x1: &IntervalMatrix, x2: &IntervalMatrix) -> IntervalMatrix {
        x1 - x2
    }

    pub fn fwd_natural_mat(x1: &MatrixValue, x2: &MatrixValue) -> MatrixValue {
        MatrixValue::natural(Self::fwd_mat(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered_mat(x1: &MatrixValue, x2: &MatrixValue) -> MatrixValue {
        MatrixValue::centered(
            Self::fwd_mat(&x1.m, &x2.m),
            Self::fwd_mat(&x1.a, &x2.a),
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd_mat(y: &IntervalMatrix, x1: &mut IntervalMatrix, x2: &mut IntervalMatrix) {
        debug_assert!(y.shape() == x1.shape() && y.shape() == x2.shape());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i], &mut x2[i]);
        }
    }
}

pub struct NegOp;

impl NegOp {
    pub fn fwd(x1: &Interval) -> Interval {
        -*x1
    }

    pub fn fwd_natural(x1: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1);
        }
        ScalarValue::centered(Self::fwd(&x1.m), Self::fwd(&x1.a), -&x1.da, x1.def_domain)
    }

    pub fn bwd(y: &Interval, x1: &mut Interval) {
        bwd::neg(y, x1);
    }

    pub fn fwd_vec(x1: &IntervalVector) -> IntervalVector {
        -x1
    }

    pub fn fwd_natural_vec(x1: &VectorValue) -> VectorValue {
        VectorValue::natural(Self::fwd_vec(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered_vec(x1: &VectorValue) -> VectorValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural_vec(x1);
        }
        VectorValue::centered(Self::fwd_vec(&x1.m), Self::fwd_vec(&x1.a), -&x1.da, x1.def_domain)
    }

    pub fn bwd_vec(y: &IntervalVector, x1: &mut IntervalVector) {
        debug_assert_eq!(y.len(), x1.len());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i]);
        }
    }

    pub fn fwd_mat(x1: &IntervalMatrix) -> IntervalMatrix {
        -x1
    }

    pub fn fwd_natural_mat(x1: &MatrixValue) -> MatrixValue {
        MatrixValue::natural(Self::fwd_mat(&x1.a), x1.def_domain)
    }

    pub fn fwd_centered_mat(x1: &MatrixValue) -> MatrixValue {
        MatrixValue::centered(Self::fwd_mat(&x1.m), Self::fwd_mat(&x1.a), x1.def_domain)
    }

    pub fn bwd_mat(y: &IntervalMatrix, x1: &mut IntervalMatrix) {
        debug_assert_eq!(y.shape(), x1.shape());
        for i in 0..y.len() {
            Self::bwd(&y[i], &mut x1[i]);
        }
    }
}

pub struct MulOp;

impl MulOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        *x1 * *x2
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        debug_assert_eq!(x1.da.shape(), x2.da.shape());
        let n = x1.da.ncols();
        let mut d = IntervalMatrix::zeros(1, n);
        for i in 0..n {
            d[(0, i)] = x1.da[(0, i)] * x2.a + x1.a * x2.da[(0, i)];
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            d,
            x1.def_domain && x2.def_domain,
        )
    }

    /// Relational narrowing on both factors; no contraction happens on a
    /// factor whose cofactor and image both contain zero.
    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::mul(y, x1, x2);
    }

    pub fn fwd_sv(x1: &Interval, x2: &IntervalVector) -> IntervalVector {
        x2.map(|c| *x1 * c)
    }

    pub fn fwd_natural_sv(x1: &ScalarValue, x2: &VectorValue) -> VectorValue {
        VectorValue::natural(Self::fwd_sv(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    pub fn fwd_centered_sv(x1: &ScalarValue, x2: &VectorValue) -> VectorValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural_sv(x1, x2);
        }
        debug_assert_eq!(x1.da.ncols(), x2.da.ncols());
        debug_assert_eq!(x2.a.len(), x2.da.nrows());
        let (rows, cols) = x2.da.shape();
        let mut d = IntervalMatrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                d[(i, j)] = x1.da[(0, j)] * x2.a[i] + x1.a * x2.da[(i, j)];
            }
        }
        VectorValue::centered(
            Self::fwd_sv(&x1.m, &x2.m),
            Self::fwd_sv(&x1.a, &x2.a),
            d,
            x1.def_domain && x2.def_domain,
        )
    }

    pub fn bwd_sv(y: &IntervalVector, x1: &mut Interval, x2: &mut IntervalVector) {
        debug_assert_eq!(y.len(), x2.len());
        for i in 0..x2.len() {
            Self::bwd(&y[i], x1, &mut x2[i]);
        }
    }

    pub fn fwd_vs(x1: &IntervalVector, x2: &Interval) -> IntervalVector {
        Self::fwd_sv(x2, x1)
    }

    pub fn fwd_natural_vs(x1: &VectorValue, x2: &ScalarValue) -> VectorValue {
        Self::fwd_natural_sv(x2, x1)
    }

    pub fn fwd_centered_vs(x1: &VectorValue, x2: &ScalarValue) -> VectorValue {
        Self::fwd_centered_sv(x2, x1)
    }

    pub fn bwd_vs(y: &IntervalVector, x1: &mut IntervalVector, x2: &mut Interval) {
        Self::bwd_sv(y, x2, x1);
    }

    pub fn fwd_mv(x1: &IntervalMatrix, x2: &IntervalVector) -> IntervalVector {
        debug_assert_eq!(x1.ncols(), x2.len());
        x1 * x2
    }

    pub fn fwd_natural_mv(x1: &MatrixValue, x2: &VectorValue) -> VectorValue {
        VectorValue::natural(Self::fwd_mv(&x1.a, &x2.a), x1.def_domain && x2.def_domain)
    }

    /// Matrix values carry no Jacobian, so the product cannot either; the
    /// midpoint enclosure still composes through the matrix range.
    pub fn fwd_centered_mv(x1: &MatrixValue, x2: &VectorValue) -> VectorValue {
        if !x2.has_jacobian() {
            return Self::fwd_natural_mv(x1, x2);
        }
        VectorValue::centered(
            Self::fwd_mv(&x1.a, &x2.m),
            Self::fwd_mv(&x1.a, &x2.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain && x2.def_domain,
        )
    }

    /// Dot-product kernel: forward partial sums, then backward through the
    /// additions and the products.
    pub fn bwd_dot(y: &Interval, x1: &mut [Interval], x2: &mut IntervalVector) {
        debug_assert_eq!(x1.len(), x2.len());
        let n = x1.len();
        if n == 0 {
            return;
        }

        let mut prods = vec![Interval::ALL; n];
        let mut sums = vec![Interval::ALL; n];
        for i in 0..n {
            prods[i] = x1[i] * x2[i];
            sums[i] = prods[i];
            if i > 0 {
                sums[i] = sums[i] + sums[i - 1];
            }
        }

        sums[n - 1] &= *y;
        for i in (0..n).rev() {
            if i > 0 {
                let (lo, hi) = sums.split_at_mut(i);
                AddOp::bwd(&hi[0], &mut lo[i - 1], &mut prods[i]);
            } else {
                prods[0] &= sums[0];
            }
            let p = prods[i];
            Self::bwd(&p, &mut x1[i], &mut x2[i]);
        }
    }

    /// Row-sweeping contraction of a matrix-vector product, cycling over
    /// rows until one full cycle no longer shrinks the volume of `x2`.
    pub fn bwd_mv(y: &IntervalVector, x1: &mut IntervalMatrix, x2: &mut IntervalVector) {
        debug_assert_eq!(x1.nrows(), y.len());
        debug_assert_eq!(x1.ncols(), x2.len());
        if y.len() == 0 {
            return;
        }

        let mut last_row = 0;
        let mut i = 0;
        loop {
            let vol_before = vector_volume(x2);
            let mut row: Vec<Interval> = x1.row(i).iter().copied().collect();
            Self::bwd_dot(&y[i], &mut row, x2);

            if row.iter().any(|c| c.is_empty()) || vec_is_empty(x2) {
                set_empty_matrix(x1);
                set_empty_vector(x2);
                return;
            }
            for (j, c) in row.iter().enumerate() {
                x1[(i, j)] = *c;
            }

            if vector_volume(x2) / vol_before < 0.98 {
                last_row = i;
            }
            i = (i + 1) % y.len();
            if i == last_row {
                break;
            }
        }
    }
}

fn vector_volume(v: &IntervalVector) -> f64 {
    v.iter().map(|c| c.diam()).product()
}

pub struct DivOp;

impl DivOp {
    pub fn fwd(x1: &Interval, x2: &Interval) -> Interval {
        *x1 / *x2
    }

    pub fn fwd_natural(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        ScalarValue::natural(
            Self::fwd(&x1.a, &x2.a),
            x1.def_domain && x2.def_domain && x2.a != Interval::point(0.0),
        )
    }

    pub fn fwd_centered(x1: &ScalarValue, x2: &ScalarValue) -> ScalarValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural(x1, x2);
        }
        debug_assert_eq!(x1.da.shape(), x2.da.shape());
        let n = x1.da.ncols();
        let mut d = IntervalMatrix::zeros(1, n);
        for i in 0..n {
            d[(0, i)] = (x1.da[(0, i)] * x2.a - x1.a * x2.da[(0, i)]) / x2.a.sqr();
        }
        ScalarValue::centered(
            Self::fwd(&x1.m, &x2.m),
            Self::fwd(&x1.a, &x2.a),
            d,
            x1.def_domain && x2.def_domain && x2.a != Interval::point(0.0),
        )
    }

    pub fn bwd(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
        bwd::div(y, x1, x2);
    }

    pub fn fwd_vs(x1: &IntervalVector, x2: &Interval) -> IntervalVector {
        x1.map(|c| c / *x2)
    }

    pub fn fwd_natural_vs(x1: &VectorValue, x2: &ScalarValue) -> VectorValue {
        VectorValue::natural(
            Self::fwd_vs(&x1.a, &x2.a),
            x1.def_domain && x2.def_domain && x2.a != Interval::point(0.0),
        )
    }

    /// First-order form of a vector-by-scalar division is not carried;
    /// callers get the natural enclosure with the composed midpoint.
    pub fn fwd_centered_vs(x1: &VectorValue, x2: &ScalarValue) -> VectorValue {
        if !x1.has_jacobian() || !x2.has_jacobian() {
            return Self::fwd_natural_vs(x1, x2);
        }
        VectorValue::centered(
            Self::fwd_vs(&x1.m, &x2.m),
            Self::fwd_vs(&x1.a, &x2.a),
            IntervalMatrix::zeros(0, 0),
            x1.def_domain && x2.def_domain && x2.a != Interval::point(0.0),
        )
    }

    pub fn bwd_vs(y: &IntervalVector, x1: &mut IntervalVector, x2: &mut Interval) {
        debug_assert_eq!(y.len(), x1.len());
        for i in 0..x1.len() {
            Self::bwd(&y[i], &mut x1[i], x2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ScalarValue;

    fn seeded(a: Interval, da: &[f64]) -> ScalarValue {
        let n = da.len();
        let mut m = IntervalMatrix::zeros(1, n);
        for (i, &d) in da.iter().enumerate() {
            m[(0, i)] = Interval::point(d);
        }
        ScalarValue::centered(Interval::point(a.mid()), a, m, true)
    }

    #[test]
    fn test_mul_centered_chains_jacobians() {
        let x1 = seeded(Interval::new(1.0, 2.0), &[1.0, 0.0]);
        let x2 = seeded(Interval::new(3.0, 4.0), &[0.0, 1.0]);
        let y = MulOp::fwd_centered(&x1, &x2);
        // d(x1*x2)/dx1 = x2.a, d/dx2 = x1.a
        assert_eq!(y.da[(0, 0)], Interval::new(3.0, 4.0));
        assert_eq!(y.da[(0, 1)], Interval::new(1.0, 2.0));
        assert!(y.a.contains(3.0) && y.a.contains(8.0));
    }

    #[test]
    fn test_centered_falls_back_without_jacobian() {
        let x1 = seeded(Interval::new(1.0, 2.0), &[1.0]);
        let x2 = ScalarValue::natural(Interval::new(3.0, 4.0), true);
        let y = AddOp::fwd_centered(&x1, &x2);
        assert!(!y.has_jacobian());
        assert_eq!(y.a, Interval::new(4.0, 6.0));
    }

    #[test]
    fn test_div_def_domain_needs_nonzero_divisor() {
        let x1 = ScalarValue::natural(Interval::new(1.0, 2.0), true);
        let x2 = ScalarValue::natural(Interval::new(-1.0, 1.0), true);
        // containing zero without being exactly {0} keeps def_domain true
        assert!(DivOp::fwd_natural(&x1, &x2).def_domain);
        let zero = ScalarValue::natural(Interval::point(0.0), true);
        assert!(!DivOp::fwd_natural(&x1, &zero).def_domain);
    }

    #[test]
    fn test_bwd_dot_contracts_factors() {
        // y = x1 . x2 with x1 = ([1,1],[1,1]), y = [5,5]
        let mut x1 = [Interval::point(1.0), Interval::point(1.0)];
        let mut x2 = IntervalVector::from_vec(vec![Interval::new(0.0, 4.0), Interval::new(2.0, 10.0)]);
        MulOp::bwd_dot(&Interval::point(5.0), &mut x1, &mut x2);
        // partial sum [0,4] first narrows to [0,3], then x2[1] = 5 - [0,3]
        assert_eq!(x2[0], Interval::new(0.0, 3.0));
        assert_eq!(x2[1], Interval::new(2.0, 5.0));
    }

    #[test]
    fn test_bwd_mv_row_sweep() {
        // identity system: x2 must meet y
        let mut m = IntervalMatrix::from_row_slice(
            2,
            2,
            &[
                Interval::point(1.0),
                Interval::point(0.0),
                Interval::point(0.0),
                Interval::point(1.0),
            ],
        );
        let y = IntervalVector::from_vec(vec![Interval::new(1.0, 2.0), Interval::new(3.0, 4.0)]);
        let mut x2 = IntervalVector::from_vec(vec![Interval::new(0.0, 10.0), Interval::new(0.0, 10.0)]);
        MulOp::bwd_mv(&y, &mut m, &mut x2);
        assert_eq!(x2[0], Interval::new(1.0, 2.0));
        assert_eq!(x2[1], Interval::new(3.0, 4.0));
    }
}
