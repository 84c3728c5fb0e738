// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Structural operations: component access, subvector slices, vector build

use crate::expr::{ScalarValue, VectorValue};
use crate::interval::{Interval, IntervalMatrix, IntervalVector};

pub struct ComponentOp;

impl ComponentOp {
    pub fn fwd(x1: &IntervalVector, i: usize) -> Interval {
        debug_assert!(i < x1.len());
        x1[i]
    }

    pub fn fwd_natural(x1: &VectorValue, i: usize) -> ScalarValue {
        ScalarValue::natural(Self::fwd(&x1.a, i), x1.def_domain)
    }

    pub fn fwd_centered(x1: &VectorValue, i: usize) -> ScalarValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1, i);
        }
        let mut da = IntervalMatrix::zeros(1, x1.da.ncols());
        for j in 0..x1.da.ncols() {
            da[(0, j)] = x1.da[(i, j)];
        }
        ScalarValue::centered(Self::fwd(&x1.m, i), Self::fwd(&x1.a, i), da, x1.def_domain)
    }

    pub fn bwd(y: &Interval, x1: &mut IntervalVector, i: usize) {
        debug_assert!(i < x1.len());
        x1[i] &= *y;
    }
}

pub struct SubvectorOp;

impl SubvectorOp {
    /// Components `i..=j`, bounds included.
    pub fn fwd(x1: &IntervalVector, i: usize, j: usize) -> IntervalVector {
        debug_assert!(i <= j && j < x1.len());
        IntervalVector::from_iterator(j - i + 1, (i..=j).map(|k| x1[k]))
    }

    pub fn fwd_natural(x1: &VectorValue, i: usize, j: usize) -> VectorValue {
        VectorValue::natural(Self::fwd(&x1.a, i, j), x1.def_domain)
    }

    pub fn fwd_centered(x1: &VectorValue, i: usize, j: usize) -> VectorValue {
        if !x1.has_jacobian() {
            return Self::fwd_natural(x1, i, j);
        }
        let cols = x1.da.ncols();
        let mut da = IntervalMatrix::zeros(j - i + 1, cols);
        for r in i..=j {
            for c in 0..cols {
                da[(r - i, c)] = x1.da[(r, c)];
            }
        }
        VectorValue::centered(Self::fwd(&x1.m, i, j), Self::fwd(&x1.a, i, j), da, x1.def_domain)
    }

    pub fn bwd(y: &IntervalVector, x1: &mut IntervalVector, i: usize, j: usize) {
        debug_assert!(i <= j && j < x1.len());
        debug_assert_eq!(y.len(), j - i + 1);
        for k in i..=j {
            x1[k] &= y[k - i];
        }
    }
}

/// Builds a vector from scalar components.
pub struct VectorOp;

impl VectorOp {
    pub fn fwd(xs: &[Interval]) -> IntervalVector {
        IntervalVector::from_iterator(xs.len(), xs.iter().copied())
    }

    pub fn fwd_natural(xs: &[ScalarValue]) -> VectorValue {
        let a = Self::fwd(&xs.iter().map(|x| x.a).collect::<Vec<_>>());
        VectorValue::natural(a, xs.iter().all(|x| x.def_domain))
    }

    pub fn fwd_centered(xs: &[ScalarValue]) -> VectorValue {
        if xs.iter().any(|x| !x.has_jacobian()) {
            return Self::fwd_natural(xs);
        }
        let cols = xs[0].da.ncols();
        let mut da = IntervalMatrix::zeros(xs.len(), cols);
        for (r, x) in xs.iter().enumerate() {
            debug_assert_eq!(x.da.ncols(), cols);
            for c in 0..cols {
                da[(r, c)] = x.da[(0, c)];
            }
        }
        let m = Self::fwd(&xs.iter().map(|x| x.m).collect::<Vec<_>>());
        let a = Self::fwd(&xs.iter().map(|x| x.a).collect::<Vec<_>>());
        VectorValue::centered(m, a, da, xs.iter().all(|x| x.def_domain))
    }

    pub fn bwd(y: &IntervalVector, xs: &mut [Interval]) {
        debug_assert_eq!(y.len(), xs.len());
        for (i, x) in xs.iter_mut().enumerate() {
            *x &= y[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_centered_extracts_jacobian_row() {
        let mut da = IntervalMatrix::zeros(2, 3);
        da[(1, 2)] = Interval::point(7.0);
        let v = VectorValue::centered(
            IntervalVector::from_element(2, Interval::point(0.0)),
            IntervalVector::from_element(2, Interval::new(-1.0, 1.0)),
            da,
            true,
        );
        let c = ComponentOp::fwd_centered(&v, 1);
        assert_eq!(c.da.shape(), (1, 3));
        assert_eq!(c.da[(0, 2)], Interval::point(7.0));
    }

    #[test]
    fn test_subvector_bounds_are_inclusive() {
        let v = IntervalVector::from_vec(vec![
            Interval::point(0.0),
            Interval::point(1.0),
            Interval::point(2.0),
            Interval::point(3.0),
        ]);
        let s = SubvectorOp::fwd(&v, 1, 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], Interval::point(1.0));
        assert_eq!(s[1], Interval::point(2.0));
    }

    #[test]
    fn test_vector_bwd_narrows_components() {
        let mut xs = [Interval::new(0.0, 10.0), Interval::new(-5.0, 5.0)];
        let y = IntervalVector::from_vec(vec![Interval::new(2.0, 3.0), Interval::new(0.0, 20.0)]);
        VectorOp::bwd(&y, &mut xs);
        assert_eq!(xs[0], Interval::new(2.0, 3.0));
        assert_eq!(xs[1], Interval::new(0.0, 5.0));
    }
}
