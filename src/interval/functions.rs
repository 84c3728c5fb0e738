// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Elementary forward functions over intervals
//!
//! Each function returns an outward-rounded enclosure of the exact image of
//! its input set, restricted to the function's real domain. Domain
//! bookkeeping (the `def_domain` flag) is handled one level up, by the
//! operator policies; here an out-of-domain input simply yields the image
//! over the in-domain part, down to the empty interval.

use super::scalar::{mul_down, mul_up, next_f2, prev_f2};
use super::Interval;

/// Period-scan cap: how many candidate multiples of pi around an interval
/// are examined before giving up on tightness.
const MAX_PERIOD_SCAN: i64 = 64;

impl Interval {
    /// `x^2`, tight through the mignitude/magnitude pair.
    pub fn sqr(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        let lo = self.mig();
        let hi = self.mag();
        Interval::new(mul_down(lo, lo).max(0.0), mul_up(hi, hi))
    }

    /// Principal square root over the non-negative part of the input.
    /// IEEE `sqrt` is correctly rounded, so the residual `r*r - x` decides
    /// whether an endpoint needs a one-ulp bump; exact roots stay exact.
    pub fn sqrt(&self) -> Interval {
        fn sqrt_down(x: f64) -> f64 {
            let r = x.sqrt();
            if !r.is_finite() {
                return r;
            }
            if r.mul_add(r, -x) > 0.0 {
                r.next_down().max(0.0)
            } else {
                r
            }
        }
        fn sqrt_up(x: f64) -> f64 {
            let r = x.sqrt();
            if !r.is_finite() {
                return r;
            }
            if r.mul_add(r, -x) < 0.0 {
                r.next_up()
            } else {
                r
            }
        }
        let t = self.nonneg();
        if t.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(sqrt_down(t.lb()), sqrt_up(t.ub()))
    }

    /// `1 / x`.
    pub fn recip(&self) -> Interval {
        Interval::point(1.0) / *self
    }

    pub fn exp(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(prev_f2(self.lb().exp()).max(0.0), next_f2(self.ub().exp()))
    }

    /// Natural logarithm over the positive part of the input. `ln([0,0])` is
    /// empty; `ln([0,b])` is `[-inf, ln b]`.
    pub fn ln(&self) -> Interval {
        let t = self.nonneg();
        if t.is_empty() || t.ub() <= 0.0 {
            return Interval::EMPTY;
        }
        let lo = if t.lb() <= 0.0 {
            f64::NEG_INFINITY
        } else {
            prev_f2(t.lb().ln())
        };
        Interval::new(lo, next_f2(t.ub().ln()))
    }

    /// `x^n` for an integer exponent, defined over the whole line.
    pub fn pow_i(&self, n: i32) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if n == 0 {
            return Interval::point(1.0);
        }
        if n < 0 {
            return self.pow_i(-n).recip();
        }
        if n % 2 == 0 {
            let lo = self.mig().powi(n);
            let hi = self.mag().powi(n);
            Interval::new(prev_f2(lo).max(0.0), next_f2(hi))
        } else {
            Interval::new(prev_f2(self.lb().powi(n)), next_f2(self.ub().powi(n)))
        }
    }

    /// `x^y` for an interval exponent. Degenerate integer exponents take the
    /// integer path (whole-line domain); real exponents are evaluated as
    /// `exp(y ln x)` over the non-negative part of the base.
    pub fn pow(&self, y: &Interval) -> Interval {
        if self.is_empty() || y.is_empty() {
            return Interval::EMPTY;
        }
        if y.is_degenerated() && y.lb().fract() == 0.0 && y.lb().abs() <= i32::MAX as f64 {
            return self.pow_i(y.lb() as i32);
        }
        (*y * self.ln()).exp()
    }

    /// Real `n`-th root: sign-preserving for odd `n`, restricted to the
    /// non-negative part for even `n`.
    pub fn root(&self, n: i32) -> Interval {
        debug_assert!(n != 0);
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if n < 0 {
            return self.root(-n).recip();
        }
        let inv = 1.0 / n as f64;
        if n % 2 == 1 {
            let r = |v: f64| v.signum() * v.abs().powf(inv);
            Interval::new(prev_f2(r(self.lb())), next_f2(r(self.ub())))
        } else {
            let t = self.nonneg();
            if t.is_empty() {
                return Interval::EMPTY;
            }
            Interval::new(prev_f2(t.lb().powf(inv)).max(0.0), next_f2(t.ub().powf(inv)))
        }
    }

    /// Whether some multiple `k*pi` with `parity(k)` lies in the interval.
    /// The containment test is inflated, so a multiple can only be counted
    /// in excess, which widens the trig range and stays sound.
    fn contains_pi_multiple(&self, even: bool) -> bool {
        let k_lo = (self.lb() / std::f64::consts::PI).floor() as i64 - 1;
        let k_hi = (self.ub() / std::f64::consts::PI).ceil() as i64 + 1;
        if k_hi - k_lo > MAX_PERIOD_SCAN {
            return true;
        }
        for k in k_lo..=k_hi {
            if (k.rem_euclid(2) == 0) == even {
                let m = k as f64 * std::f64::consts::PI;
                let tol = 1e-9 * (1.0 + m.abs());
                if !self.is_empty() && m >= self.lb() - tol && m <= self.ub() + tol {
                    return true;
                }
            }
        }
        false
    }

    pub fn cos(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if !self.lb().is_finite() || !self.ub().is_finite() || self.diam() >= std::f64::consts::TAU
        {
            return Interval::new(-1.0, 1.0);
        }
        let mut r = Interval::new(
            prev_f2(self.lb().cos()).min(prev_f2(self.ub().cos())),
            next_f2(self.lb().cos()).max(next_f2(self.ub().cos())),
        );
        if self.contains_pi_multiple(true) {
            r = r.join(&Interval::point(1.0));
        }
        if self.contains_pi_multiple(false) {
            r = r.join(&Interval::point(-1.0));
        }
        r.meet(&Interval::new(-1.0, 1.0))
    }

    pub fn sin(&self) -> Interval {
        (*self - Interval::half_pi()).cos()
    }

    pub fn tan(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        if !self.lb().is_finite() || !self.ub().is_finite() || self.diam() >= std::f64::consts::PI
        {
            return Interval::ALL;
        }
        // an asymptote (k + 1/2) pi inside the interval makes the image the
        // whole line
        let shifted = *self + Interval::half_pi();
        if shifted.contains_pi_multiple(true) || shifted.contains_pi_multiple(false) {
            return Interval::ALL;
        }
        Interval::new(prev_f2(self.lb().tan()), next_f2(self.ub().tan()))
    }

    /// Arcsine over the `[-1, 1]` part of the input.
    pub fn asin(&self) -> Interval {
        let t = self.meet(&Interval::new(-1.0, 1.0));
        if t.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(prev_f2(t.lb().asin()), next_f2(t.ub().asin()))
    }

    /// Arccosine over the `[-1, 1]` part of the input.
    pub fn acos(&self) -> Interval {
        let t = self.meet(&Interval::new(-1.0, 1.0));
        if t.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(prev_f2(t.ub().acos()).max(0.0), next_f2(t.lb().acos()))
    }

    pub fn atan(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(prev_f2(self.lb().atan()), next_f2(self.ub().atan()))
    }

    /// `atan2(self, x)` with `self` the ordinate. The image lies in
    /// `[-pi, pi]`; a box crossing the negative real axis hulls to the full
    /// range.
    pub fn atan2(&self, x: &Interval) -> Interval {
        let y = *self;
        if y.is_empty() || x.is_empty() {
            return Interval::EMPTY;
        }
        if x.lb() > 0.0 {
            return (y / *x).atan();
        }
        if y.lb() >= 0.0 || y.ub() <= 0.0 {
            // the box avoids the branch cut's interior: extrema at corners
            let corners = [
                y.lb().atan2(x.lb()),
                y.lb().atan2(x.ub()),
                y.ub().atan2(x.lb()),
                y.ub().atan2(x.ub()),
            ];
            let mut lo = corners[0];
            let mut hi = corners[0];
            for &c in &corners[1..] {
                lo = lo.min(c);
                hi = hi.max(c);
            }
            // atan2(-0.0, x<0) is -pi in IEEE; widen across the cut when the
            // box touches the negative axis from below
            if y.ub() == 0.0 && x.lb() < 0.0 {
                lo = -std::f64::consts::PI;
            }
            return Interval::new(prev_f2(lo), next_f2(hi))
                .meet(&Interval::new(-next_f2(std::f64::consts::PI), next_f2(std::f64::consts::PI)));
        }
        // y straddles zero with a non-positive abscissa part: branch cut
        Interval::new(
            -next_f2(std::f64::consts::PI),
            next_f2(std::f64::consts::PI),
        )
    }

    pub fn sinh(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(prev_f2(self.lb().sinh()), next_f2(self.ub().sinh()))
    }

    pub fn cosh(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(
            prev_f2(self.mig().cosh()).max(1.0),
            next_f2(self.mag().cosh()),
        )
    }

    pub fn tanh(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(
            prev_f2(self.lb().tanh()).max(-1.0),
            next_f2(self.ub().tanh()).min(1.0),
        )
    }

    pub fn abs(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.mig(), self.mag())
    }

    /// Set extension of the sign function, with values in `{-1, 0, 1}`.
    pub fn sign(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        let s = |v: f64| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        };
        Interval::new(s(self.lb()), s(self.ub()))
    }

    pub fn min_i(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.lb().min(other.lb()), self.ub().min(other.ub()))
    }

    pub fn max_i(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.lb().max(other.lb()), self.ub().max(other.ub()))
    }

    pub fn floor(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.lb().floor(), self.ub().floor())
    }

    pub fn ceil(&self) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.lb().ceil(), self.ub().ceil())
    }
}

/// Selection kernel: `x2` when the condition is certainly non-positive,
/// `x3` when certainly positive, the hull of both branches otherwise.
pub fn chi(x1: &Interval, x2: &Interval, x3: &Interval) -> Interval {
    if x1.is_empty() {
        return Interval::EMPTY;
    }
    if x1.ub() <= 0.0 {
        *x2
    } else if x1.lb() > 0.0 {
        *x3
    } else {
        x2.join(x3)
    }
}
