// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Interval vectors and matrices
//!
//! Thin aliases over nalgebra's dynamic types, plus the elementwise helpers
//! the engine needs (midpoints, intersection, emptiness). `Interval`
//! implements the scalar traits nalgebra requires, so interval-matrix
//! products go through nalgebra's own kernels using outward-rounded
//! arithmetic.

use super::Interval;
use nalgebra::{DMatrix, DVector};

pub type IntervalVector = DVector<Interval>;
pub type IntervalMatrix = DMatrix<Interval>;

/// Componentwise midpoint of a vector enclosure.
pub fn mid_vector(v: &IntervalVector) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().map(|x| x.mid()))
}

/// Componentwise midpoint of a matrix enclosure.
pub fn mid_matrix(m: &IntervalMatrix) -> DMatrix<f64> {
    DMatrix::from_iterator(m.nrows(), m.ncols(), m.iter().map(|x| x.mid()))
}

/// In-place componentwise intersection.
pub fn meet_vector(a: &mut IntervalVector, b: &IntervalVector) {
    debug_assert_eq!(a.len(), b.len());
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x &= *y;
    }
}

/// In-place componentwise intersection.
pub fn meet_matrix(a: &mut IntervalMatrix, b: &IntervalMatrix) {
    debug_assert_eq!(a.shape(), b.shape());
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x &= *y;
    }
}

/// Componentwise hull of two vector enclosures.
pub fn hull_vector(a: &IntervalVector, b: &IntervalVector) -> IntervalVector {
    debug_assert_eq!(a.len(), b.len());
    IntervalVector::from_iterator(a.len(), a.iter().zip(b.iter()).map(|(x, y)| x.join(y)))
}

/// A vector enclosure is empty as soon as one component is.
pub fn vec_is_empty(v: &IntervalVector) -> bool {
    v.iter().any(|x| x.is_empty())
}

/// A matrix enclosure is empty as soon as one entry is.
pub fn mat_is_empty(m: &IntervalMatrix) -> bool {
    m.iter().any(|x| x.is_empty())
}

/// Empties every component; emptiness of one component of a composite
/// value propagates to the whole value.
pub fn set_empty_vector(v: &mut IntervalVector) {
    for x in v.iter_mut() {
        x.set_empty();
    }
}

pub fn set_empty_matrix(m: &mut IntervalMatrix) {
    for x in m.iter_mut() {
        x.set_empty();
    }
}

/// `[-inf, inf]^n`, the dry-run input used for static shape probing.
pub fn unbounded_vector(n: usize) -> IntervalVector {
    IntervalVector::from_element(n, Interval::ALL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_vector_product_encloses() {
        let m = IntervalMatrix::from_row_slice(
            2,
            2,
            &[
                Interval::new(1.0, 2.0),
                Interval::point(0.0),
                Interval::point(1.0),
                Interval::new(-1.0, 1.0),
            ],
        );
        let v = IntervalVector::from_vec(vec![Interval::point(3.0), Interval::new(0.0, 1.0)]);
        let p = &m * &v;
        // row 0: [1,2]*3 + 0*[0,1] = [3,6]
        assert!(p[0].contains(3.0) && p[0].contains(6.0));
        // row 1: 3 + [-1,1]*[0,1] = [2,4]
        assert!(p[1].contains(2.0) && p[1].contains(4.0));
    }

    #[test]
    fn test_meet_and_emptiness() {
        let mut a = IntervalVector::from_vec(vec![Interval::new(0.0, 2.0), Interval::new(1.0, 3.0)]);
        let b = IntervalVector::from_vec(vec![Interval::new(1.0, 5.0), Interval::new(4.0, 6.0)]);
        meet_vector(&mut a, &b);
        assert_eq!(a[0], Interval::new(1.0, 2.0));
        assert!(vec_is_empty(&a));
    }

    #[test]
    fn test_mid_vector() {
        let v = IntervalVector::from_vec(vec![Interval::new(0.0, 2.0), Interval::point(5.0)]);
        let m = mid_vector(&v);
        assert_eq!(m[0], 1.0);
        assert_eq!(m[1], 5.0);
    }
}
