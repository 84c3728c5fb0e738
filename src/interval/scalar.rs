// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Closed real interval with outward-rounded arithmetic
//!
//! The empty interval is canonicalized as `[+inf, -inf]`, which keeps the
//! representation NaN-free and `PartialEq` total. Unbounded endpoints are
//! plain `±inf`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Rounds a finite lower bound downward by one ulp.
///
/// IEEE basic operations are correctly rounded, so one ulp is enough to
/// guarantee an outward enclosure of the exact result.
pub(crate) fn prev_f(x: f64) -> f64 {
    if x.is_finite() {
        x.next_down()
    } else {
        x
    }
}

/// Rounds a finite upper bound upward by one ulp.
pub(crate) fn next_f(x: f64) -> f64 {
    if x.is_finite() {
        x.next_up()
    } else {
        x
    }
}

/// Two-ulp downward bump, used after library transcendentals, which are
/// faithful but not guaranteed correctly rounded.
pub(crate) fn prev_f2(x: f64) -> f64 {
    prev_f(prev_f(x))
}

/// Two-ulp upward bump for transcendental upper bounds.
pub(crate) fn next_f2(x: f64) -> f64 {
    next_f(next_f(x))
}

// The four basic operations are correctly rounded, so the sign of the
// rounding error decides whether an endpoint needs a one-ulp bump. The
// error term comes from an error-free transformation (Dekker's FastTwoSum
// for sums, an FMA residual for products and quotients), which keeps
// exactly representable results exact instead of widening every endpoint.

/// Largest double not exceeding the exact sum `a + b`.
pub(crate) fn sum_down(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s.is_infinite() {
        return if s > 0.0 { f64::MAX } else { s };
    }
    let (hi, lo) = if a.abs() >= b.abs() { (a, b) } else { (b, a) };
    let err = lo - (s - hi);
    if err < 0.0 {
        s.next_down()
    } else {
        s
    }
}

/// Smallest double not below the exact sum `a + b`.
pub(crate) fn sum_up(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s.is_infinite() {
        return if s < 0.0 { f64::MIN } else { s };
    }
    let (hi, lo) = if a.abs() >= b.abs() { (a, b) } else { (b, a) };
    let err = lo - (s - hi);
    if err > 0.0 {
        s.next_up()
    } else {
        s
    }
}

/// Largest double not exceeding the exact product, under the interval
/// convention `0 * inf = 0`.
pub(crate) fn mul_down(a: f64, b: f64) -> f64 {
    let p = mul_ep(a, b);
    if p.is_infinite() {
        return if p > 0.0 { f64::MAX } else { p };
    }
    if a.is_infinite() || b.is_infinite() {
        // finite result with an infinite factor only via the 0 * inf rule
        return p;
    }
    if p == 0.0 {
        // an underflowed negative product still needs a negative bound
        return if a != 0.0 && b != 0.0 && (a > 0.0) != (b > 0.0) {
            0.0f64.next_down()
        } else {
            0.0
        };
    }
    if !p.is_normal() {
        return p.next_down();
    }
    if a.mul_add(b, -p) < 0.0 {
        p.next_down()
    } else {
        p
    }
}

/// Smallest double not below the exact product.
pub(crate) fn mul_up(a: f64, b: f64) -> f64 {
    let p = mul_ep(a, b);
    if p.is_infinite() {
        return if p < 0.0 { f64::MIN } else { p };
    }
    if a.is_infinite() || b.is_infinite() {
        return p;
    }
    if p == 0.0 {
        return if a != 0.0 && b != 0.0 && (a > 0.0) == (b > 0.0) {
            0.0f64.next_up()
        } else {
            0.0
        };
    }
    if !p.is_normal() {
        return p.next_up();
    }
    if a.mul_add(b, -p) > 0.0 {
        p.next_up()
    } else {
        p
    }
}

/// Largest double not exceeding the exact quotient. The divisor must be
/// nonzero and sign-definite contexts are the caller's responsibility.
pub(crate) fn div_down(a: f64, b: f64) -> f64 {
    let q = a / b;
    if q.is_infinite() {
        return if q > 0.0 { f64::MAX } else { q };
    }
    if a.is_infinite() || b.is_infinite() {
        // inf / finite was caught above; finite / inf is an exact zero
        return q;
    }
    if q == 0.0 {
        return if a != 0.0 && (a > 0.0) != (b > 0.0) {
            0.0f64.next_down()
        } else {
            0.0
        };
    }
    if !q.is_normal() {
        return q.next_down();
    }
    // sign of q*b - a, exact through the fused multiply-add
    let err = q.mul_add(b, -a);
    let q_too_big = if b > 0.0 { err > 0.0 } else { err < 0.0 };
    if q_too_big {
        q.next_down()
    } else {
        q
    }
}

/// Smallest double not below the exact quotient.
pub(crate) fn div_up(a: f64, b: f64) -> f64 {
    let q = a / b;
    if q.is_infinite() {
        return if q < 0.0 { f64::MIN } else { q };
    }
    if a.is_infinite() || b.is_infinite() {
        return q;
    }
    if q == 0.0 {
        return if a != 0.0 && (a > 0.0) == (b > 0.0) {
            0.0f64.next_up()
        } else {
            0.0
        };
    }
    if !q.is_normal() {
        return q.next_up();
    }
    let err = q.mul_add(b, -a);
    let q_too_small = if b > 0.0 { err < 0.0 } else { err > 0.0 };
    if q_too_small {
        q.next_up()
    } else {
        q
    }
}

/// A closed real interval `[lb, ub]`, possibly empty or unbounded.
///
/// Every arithmetic operation rounds outward, so the result always encloses
/// the exact real image. Intersection (`&`) and hull (`|`) are total and
/// never fail; emptiness and unboundedness are observable states, not
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lb: f64,
    ub: f64,
}

impl Interval {
    /// The empty set.
    pub const EMPTY: Interval = Interval {
        lb: f64::INFINITY,
        ub: f64::NEG_INFINITY,
    };

    /// The whole real line `(-inf, inf)`.
    pub const ALL: Interval = Interval {
        lb: f64::NEG_INFINITY,
        ub: f64::INFINITY,
    };

    /// `[0, inf)`.
    pub const POSITIVE: Interval = Interval {
        lb: 0.0,
        ub: f64::INFINITY,
    };

    /// `(-inf, 0]`.
    pub const NEGATIVE: Interval = Interval {
        lb: f64::NEG_INFINITY,
        ub: 0.0,
    };

    /// Builds `[lb, ub]`; any invalid ordering or NaN endpoint collapses to
    /// the empty interval.
    pub fn new(lb: f64, ub: f64) -> Self {
        if lb.is_nan() || ub.is_nan() || lb > ub {
            Self::EMPTY
        } else {
            Self { lb, ub }
        }
    }

    /// The degenerate interval `[x, x]`.
    pub fn point(x: f64) -> Self {
        Self::new(x, x)
    }

    /// An enclosure of pi.
    pub fn pi() -> Self {
        Self::new(prev_f(std::f64::consts::PI), next_f(std::f64::consts::PI))
    }

    /// An enclosure of pi/2.
    pub fn half_pi() -> Self {
        Self::new(
            prev_f(std::f64::consts::FRAC_PI_2),
            next_f(std::f64::consts::FRAC_PI_2),
        )
    }

    /// An enclosure of 2*pi.
    pub fn two_pi() -> Self {
        Self::new(prev_f(std::f64::consts::TAU), next_f(std::f64::consts::TAU))
    }

    pub fn lb(&self) -> f64 {
        self.lb
    }

    pub fn ub(&self) -> f64 {
        self.ub
    }

    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }

    pub fn is_unbounded(&self) -> bool {
        !self.is_empty() && (self.lb.is_infinite() || self.ub.is_infinite())
    }

    pub fn is_degenerated(&self) -> bool {
        !self.is_empty() && self.lb == self.ub
    }

    /// Midpoint; finite whenever the interval is non-empty (an unbounded
    /// side is clamped to the finite one, both sides unbounded give 0).
    pub fn mid(&self) -> f64 {
        debug_assert!(!self.is_empty());
        if self.lb == f64::NEG_INFINITY {
            if self.ub == f64::INFINITY {
                0.0
            } else {
                self.ub
            }
        } else if self.ub == f64::INFINITY {
            self.lb
        } else {
            let m = 0.5 * (self.lb + self.ub);
            if m.is_finite() {
                m
            } else {
                0.5 * self.lb + 0.5 * self.ub
            }
        }
    }

    /// Diameter `ub - lb`; 0 for the empty interval.
    pub fn diam(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            next_f(self.ub - self.lb)
        }
    }

    /// Radius of the interval around its midpoint.
    pub fn rad(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            let m = self.mid();
            next_f((m - self.lb).max(self.ub - m))
        }
    }

    /// Largest absolute value of the interval.
    pub fn mag(&self) -> f64 {
        debug_assert!(!self.is_empty());
        self.lb.abs().max(self.ub.abs())
    }

    /// Smallest absolute value of the interval.
    pub fn mig(&self) -> f64 {
        debug_assert!(!self.is_empty());
        if self.lb <= 0.0 && self.ub >= 0.0 {
            0.0
        } else {
            self.lb.abs().min(self.ub.abs())
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        !self.is_empty() && x >= self.lb && x <= self.ub
    }

    pub fn is_subset(&self, other: &Interval) -> bool {
        self.is_empty() || (!other.is_empty() && self.lb >= other.lb && self.ub <= other.ub)
    }

    pub fn is_superset(&self, other: &Interval) -> bool {
        other.is_subset(self)
    }

    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.is_empty() || other.is_empty() || self.lb > other.ub || other.lb > self.ub
    }

    /// Intersection; total, never fails.
    pub fn meet(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            Interval::EMPTY
        } else {
            Interval::new(self.lb.max(other.lb), self.ub.min(other.ub))
        }
    }

    /// Convex hull of the union; total, never fails.
    pub fn join(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            Interval {
                lb: self.lb.min(other.lb),
                ub: self.ub.max(other.ub),
            }
        }
    }

    pub fn set_empty(&mut self) {
        *self = Interval::EMPTY;
    }

    /// `[max(lb, 0), ub]` — the non-negative part.
    pub fn nonneg(&self) -> Interval {
        self.meet(&Interval::POSITIVE)
    }

    /// Inflates both bounds outward by `eps`.
    pub fn inflate(&self, eps: f64) -> Interval {
        debug_assert!(eps >= 0.0);
        if self.is_empty() {
            *self
        } else {
            Interval::new(prev_f(self.lb - eps), next_f(self.ub + eps))
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::ALL
    }
}

impl From<f64> for Interval {
    fn from(x: f64) -> Self {
        Interval::point(x)
    }
}

impl From<i32> for Interval {
    fn from(x: i32) -> Self {
        Interval::point(x as f64)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[empty]")
        } else {
            write!(f, "[{}, {}]", self.lb, self.ub)
        }
    }
}

impl Neg for Interval {
    type Output = Interval;
    fn neg(self) -> Interval {
        if self.is_empty() {
            self
        } else {
            Interval {
                lb: -self.ub,
                ub: -self.lb,
            }
        }
    }
}

impl Add for Interval {
    type Output = Interval;
    fn add(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            Interval::EMPTY
        } else {
            Interval {
                lb: sum_down(self.lb, rhs.lb),
                ub: sum_up(self.ub, rhs.ub),
            }
        }
    }
}

impl Sub for Interval {
    type Output = Interval;
    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

/// Product of two endpoint values with the interval convention `0 * inf = 0`.
fn mul_ep(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

impl Mul for Interval {
    type Output = Interval;
    fn mul(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }
        let pairs = [
            (self.lb, rhs.lb),
            (self.lb, rhs.ub),
            (self.ub, rhs.lb),
            (self.ub, rhs.ub),
        ];
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &(a, b) in &pairs {
            lo = lo.min(mul_down(a, b));
            hi = hi.max(mul_up(a, b));
        }
        Interval { lb: lo, ub: hi }
    }
}

impl Div for Interval {
    type Output = Interval;

    /// Hull of the set-extension of division. `x / [0,0]` is empty; when the
    /// divisor straddles zero the result may be unbounded or the whole line.
    fn div(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }
        if rhs.lb == 0.0 && rhs.ub == 0.0 {
            return Interval::EMPTY;
        }
        if rhs.lb > 0.0 || rhs.ub < 0.0 {
            let pairs = [
                (self.lb, rhs.lb),
                (self.lb, rhs.ub),
                (self.ub, rhs.lb),
                (self.ub, rhs.ub),
            ];
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &(a, b) in &pairs {
                lo = lo.min(div_down(a, b));
                hi = hi.max(div_up(a, b));
            }
            return Interval { lb: lo, ub: hi };
        }
        // 0 is an endpoint or interior point of the divisor
        if self.lb <= 0.0 && self.ub >= 0.0 {
            return Interval::ALL;
        }
        if self.lb > 0.0 {
            if rhs.ub == 0.0 {
                Interval {
                    lb: f64::NEG_INFINITY,
                    ub: div_up(self.lb, rhs.lb),
                }
            } else if rhs.lb == 0.0 {
                Interval {
                    lb: div_down(self.lb, rhs.ub),
                    ub: f64::INFINITY,
                }
            } else {
                Interval::ALL
            }
        } else {
            // self.ub < 0
            if rhs.ub == 0.0 {
                Interval {
                    lb: div_down(self.ub, rhs.lb),
                    ub: f64::INFINITY,
                }
            } else if rhs.lb == 0.0 {
                Interval {
                    lb: f64::NEG_INFINITY,
                    ub: div_up(self.ub, rhs.ub),
                }
            } else {
                Interval::ALL
            }
        }
    }
}

macro_rules! scalar_mixed_ops {
    ($($t:ty)*) => {$(
        impl Add<$t> for Interval {
            type Output = Interval;
            fn add(self, rhs: $t) -> Interval { self + Interval::point(rhs as f64) }
        }
        impl Add<Interval> for $t {
            type Output = Interval;
            fn add(self, rhs: Interval) -> Interval { Interval::point(self as f64) + rhs }
        }
        impl Sub<$t> for Interval {
            type Output = Interval;
            fn sub(self, rhs: $t) -> Interval { self - Interval::point(rhs as f64) }
        }
        impl Sub<Interval> for $t {
            type Output = Interval;
            fn sub(self, rhs: Interval) -> Interval { Interval::point(self as f64) - rhs }
        }
        impl Mul<$t> for Interval {
            type Output = Interval;
            fn mul(self, rhs: $t) -> Interval { self * Interval::point(rhs as f64) }
        }
        impl Mul<Interval> for $t {
            type Output = Interval;
            fn mul(self, rhs: Interval) -> Interval { Interval::point(self as f64) * rhs }
        }
        impl Div<$t> for Interval {
            type Output = Interval;
            fn div(self, rhs: $t) -> Interval { self / Interval::point(rhs as f64) }
        }
        impl Div<Interval> for $t {
            type Output = Interval;
            fn div(self, rhs: Interval) -> Interval { Interval::point(self as f64) / rhs }
        }
    )*};
}

scalar_mixed_ops!(f64 i32);

impl AddAssign for Interval {
    fn add_assign(&mut self, rhs: Interval) {
        *self = *self + rhs;
    }
}

impl SubAssign for Interval {
    fn sub_assign(&mut self, rhs: Interval) {
        *self = *self - rhs;
    }
}

impl MulAssign for Interval {
    fn mul_assign(&mut self, rhs: Interval) {
        *self = *self * rhs;
    }
}

impl DivAssign for Interval {
    fn div_assign(&mut self, rhs: Interval) {
        *self = *self / rhs;
    }
}

impl BitAnd for Interval {
    type Output = Interval;
    fn bitand(self, rhs: Interval) -> Interval {
        self.meet(&rhs)
    }
}

impl BitAndAssign for Interval {
    fn bitand_assign(&mut self, rhs: Interval) {
        *self = self.meet(&rhs);
    }
}

impl BitOr for Interval {
    type Output = Interval;
    fn bitor(self, rhs: Interval) -> Interval {
        self.join(&rhs)
    }
}

impl BitOrAssign for Interval {
    fn bitor_assign(&mut self, rhs: Interval) {
        *self = self.join(&rhs);
    }
}

impl num_traits::Zero for Interval {
    fn zero() -> Self {
        Interval { lb: 0.0, ub: 0.0 }
    }
    fn is_zero(&self) -> bool {
        self.lb == 0.0 && self.ub == 0.0
    }
}

impl num_traits::One for Interval {
    fn one() -> Self {
        Interval { lb: 1.0, ub: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_canonicalization() {
        assert!(Interval::new(2.0, 1.0).is_empty());
        assert!(Interval::new(f64::NAN, 1.0).is_empty());
        assert_eq!(Interval::new(3.0, 1.0), Interval::EMPTY);
    }

    #[test]
    fn test_meet_join_total() {
        let a = Interval::new(0.0, 2.0);
        let b = Interval::new(1.0, 3.0);
        assert_eq!(a.meet(&b), Interval::new(1.0, 2.0));
        assert_eq!(a.join(&b), Interval::new(0.0, 3.0));
        assert!(a.meet(&Interval::new(5.0, 6.0)).is_empty());
        assert_eq!(Interval::EMPTY.join(&a), a);
        assert!(Interval::EMPTY.meet(&a).is_empty());
    }

    #[test]
    fn test_arithmetic_encloses() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(-3.0, 0.5);
        let s = a + b;
        assert!(s.contains(1.0 + -3.0) && s.contains(2.0 + 0.5));
        let p = a * b;
        assert!(p.contains(-6.0) && p.contains(1.0));
        let d = a / Interval::new(2.0, 4.0);
        assert!(d.contains(0.25) && d.contains(1.0));
    }

    #[test]
    fn test_division_by_zero_straddling() {
        let x = Interval::new(1.0, 2.0);
        assert_eq!(x / Interval::new(-1.0, 1.0), Interval::ALL);
        let up = x / Interval::new(0.0, 1.0);
        assert_eq!(up.ub(), f64::INFINITY);
        assert!(up.lb() <= 1.0);
        assert!((x / Interval::point(0.0)).is_empty());
    }

    #[test]
    fn test_zero_times_unbounded() {
        let z = Interval::point(0.0);
        assert_eq!(z * Interval::ALL, z);
    }

    #[test]
    fn test_predicates() {
        assert!(Interval::ALL.is_unbounded());
        assert!(Interval::point(4.0).is_degenerated());
        assert!(!Interval::EMPTY.is_unbounded());
        assert!(Interval::new(1.0, 2.0).is_subset(&Interval::new(0.0, 3.0)));
        assert!(Interval::new(-1.0, 1.0).contains(0.0));
    }

    #[test]
    fn test_mid_mag_mig() {
        let x = Interval::new(-2.0, 6.0);
        assert_eq!(x.mid(), 2.0);
        assert_eq!(x.mag(), 6.0);
        assert_eq!(x.mig(), 0.0);
        assert_eq!(Interval::new(3.0, 5.0).mig(), 3.0);
        assert_eq!(Interval::new(0.0, f64::INFINITY).mid(), 0.0);
    }
}
