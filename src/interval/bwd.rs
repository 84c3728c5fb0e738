// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Elementary backward (preimage) narrowing functions
//!
//! Each function narrows its operand intervals in place so that every point
//! consistent with `y = op(x...)` is preserved. When one operand becomes
//! empty, the others are emptied too: an unsatisfiable constraint has no
//! solution in any of its operands.
//!
//! Multi-branch inverses (even powers, abs, atan2, min/max) intersect each
//! branch with the current enclosure separately and union the results;
//! collapsing branches to their hull before intersecting would lose the gap
//! and, worse, dropping a branch would lose solutions.

use super::Interval;

/// Relational division `{a in x1 : exists b in x2, a*b in y}`, returned as
/// the union of its (at most two) branch intersections with `x1`.
fn div_rel(y: &Interval, x2: &Interval, x1: &Interval) -> Interval {
    if y.is_empty() || x2.is_empty() || x1.is_empty() {
        return Interval::EMPTY;
    }
    if x2.contains(0.0) && y.contains(0.0) {
        // 0 * anything covers y's zero: no information on x1
        return *x1;
    }
    let (b1, b2) = div2(y, x2);
    b1.meet(x1).join(&b2.meet(x1))
}

/// Set-extension division split into its two branches when the divisor
/// straddles zero. The second branch is empty in the single-piece cases.
fn div2(x: &Interval, y: &Interval) -> (Interval, Interval) {
    if x.is_empty() || y.is_empty() || (y.lb() == 0.0 && y.ub() == 0.0) {
        return (Interval::EMPTY, Interval::EMPTY);
    }
    if !y.contains(0.0) {
        return (*x / *y, Interval::EMPTY);
    }
    if x.contains(0.0) {
        return (Interval::ALL, Interval::EMPTY);
    }
    if x.lb() > 0.0 {
        if y.lb() == 0.0 {
            (
                Interval::new((x.lb() / y.ub()).next_down(), f64::INFINITY),
                Interval::EMPTY,
            )
        } else if y.ub() == 0.0 {
            (
                Interval::new(f64::NEG_INFINITY, (x.lb() / y.lb()).next_up()),
                Interval::EMPTY,
            )
        } else {
            (
                Interval::new(f64::NEG_INFINITY, (x.lb() / y.lb()).next_up()),
                Interval::new((x.lb() / y.ub()).next_down(), f64::INFINITY),
            )
        }
    } else {
        // x.ub() < 0
        if y.lb() == 0.0 {
            (
                Interval::new(f64::NEG_INFINITY, (x.ub() / y.ub()).next_up()),
                Interval::EMPTY,
            )
        } else if y.ub() == 0.0 {
            (
                Interval::new((x.ub() / y.lb()).next_down(), f64::INFINITY),
                Interval::EMPTY,
            )
        } else {
            (
                Interval::new(f64::NEG_INFINITY, (x.ub() / y.ub()).next_up()),
                Interval::new((x.ub() / y.lb()).next_down(), f64::INFINITY),
            )
        }
    }
}

fn empty_both(x1: &mut Interval, x2: &mut Interval) {
    x1.set_empty();
    x2.set_empty();
}

/// `y = x1 + x2`. The two-step order (narrow `x1` from `x2`, then `x2` from
/// the narrowed `x1`) reproduces standard hull-consistency tightness.
pub fn add(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    *x1 &= *y - *x2;
    if x1.is_empty() {
        x2.set_empty();
        return;
    }
    *x2 &= *y - *x1;
    if x2.is_empty() {
        x1.set_empty();
    }
}

/// `y = x1 - x2`.
pub fn sub(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    *x1 &= *y + *x2;
    if x1.is_empty() {
        x2.set_empty();
        return;
    }
    *x2 &= *x1 - *y;
    if x2.is_empty() {
        x1.set_empty();
    }
}

/// `y = -x`.
pub fn neg(y: &Interval, x: &mut Interval) {
    *x &= -*y;
}

/// `y = x1 * x2`, via relational division on each operand.
pub fn mul(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    *x1 = div_rel(y, x2, x1);
    if x1.is_empty() {
        x2.set_empty();
        return;
    }
    *x2 = div_rel(y, x1, x2);
    if x2.is_empty() {
        x1.set_empty();
    }
}

/// `y = x1 / x2`, derived by rewriting `x1 = y * x2` and reusing the
/// multiplication backward: backward contracts compose like forwards do.
pub fn div(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    *x1 &= *y * *x2;
    if x1.is_empty() {
        x2.set_empty();
        return;
    }
    let mut y_op = *y;
    mul(x1, &mut y_op, x2);
    if x2.is_empty() {
        x1.set_empty();
    }
}

/// `y = x^2`: the preimage is the union of both signed square-root branches.
pub fn sqr(y: &Interval, x: &mut Interval) {
    let r = y.sqrt();
    if r.is_empty() {
        x.set_empty();
        return;
    }
    *x = (-r).meet(x).join(&r.meet(x));
}

/// `y = sqrt(x)`.
pub fn sqrt(y: &Interval, x: &mut Interval) {
    if y.is_empty() || y.ub() < 0.0 {
        x.set_empty();
    } else if y.lb() < 0.0 {
        *x &= Interval::new(0.0, y.ub()).sqr();
    } else {
        *x &= y.sqr();
    }
}

/// `y = x^n` for an integer exponent. Even exponents union both real-root
/// branches; omitting either would be unsound.
pub fn pow_i(y: &Interval, x: &mut Interval, n: i32) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    if n == 0 {
        if !y.contains(1.0) {
            x.set_empty();
        }
        return;
    }
    if n < 0 {
        pow_i(&y.recip(), x, -n);
        return;
    }
    if n % 2 == 0 {
        let r = y.root(n);
        if r.is_empty() {
            x.set_empty();
            return;
        }
        *x = (-r).meet(x).join(&r.meet(x));
    } else {
        *x &= y.root(n);
    }
}

/// `y = x1 ^ x2`. Degenerate integer exponents take the integer path; for a
/// certainly-positive base and a zero-free exponent the base is narrowed
/// through `exp(ln y / x2)`; any other configuration is left unchanged
/// (sound no-op).
pub fn pow(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    if y.is_empty() {
        empty_both(x1, x2);
        return;
    }
    if x2.is_degenerated() && x2.lb().fract() == 0.0 && x2.lb().abs() <= i32::MAX as f64 {
        pow_i(y, x1, x2.lb() as i32);
        if x1.is_empty() {
            x2.set_empty();
        }
        return;
    }
    if y.lb() > 0.0 && x1.lb() > 0.0 && !x2.contains(0.0) {
        *x1 &= (y.ln() / *x2).exp();
        if x1.is_empty() {
            x2.set_empty();
        }
    }
}

/// `y = exp(x)`.
pub fn exp(y: &Interval, x: &mut Interval) {
    *x &= y.ln();
}

/// `y = ln(x)`.
pub fn log(y: &Interval, x: &mut Interval) {
    *x &= y.exp();
}

/// Periodic preimage scan cap; beyond it the operand is left unchanged.
const MAX_PERIODS: i64 = 64;

/// Narrows `x` to the union of the preimage pieces produced by `piece` at
/// every whole period covering `x`. `piece(k)` must enclose the k-th
/// preimage branch.
fn periodic_bwd(x: &mut Interval, period: f64, pieces: &dyn Fn(i64) -> Vec<Interval>) {
    if x.is_empty() {
        return;
    }
    if !x.lb().is_finite() || !x.ub().is_finite() {
        return; // unbounded operand: keep as is (sound)
    }
    let k_lo = (x.lb() / period).floor() as i64 - 1;
    let k_hi = (x.ub() / period).ceil() as i64 + 1;
    if k_hi - k_lo > MAX_PERIODS {
        return;
    }
    let mut res = Interval::EMPTY;
    for k in k_lo..=k_hi {
        for piece in pieces(k) {
            res = res.join(&piece.meet(x));
        }
    }
    *x = res;
}

/// `y = cos(x)`: preimage is `2k*pi ± acos(y)`.
pub fn cos(y: &Interval, x: &mut Interval) {
    let t = y.meet(&Interval::new(-1.0, 1.0));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    let ay = t.acos();
    periodic_bwd(x, std::f64::consts::TAU, &|k| {
        let base = Interval::two_pi() * k as f64;
        vec![base + ay, base - ay]
    });
}

/// `y = sin(x)`: preimage is `2k*pi + asin(y)` and `2k*pi + pi - asin(y)`.
pub fn sin(y: &Interval, x: &mut Interval) {
    let t = y.meet(&Interval::new(-1.0, 1.0));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    let ay = t.asin();
    periodic_bwd(x, std::f64::consts::TAU, &|k| {
        let base = Interval::two_pi() * k as f64;
        vec![base + ay, base + (Interval::pi() - ay)]
    });
}

/// `y = tan(x)`: preimage is `atan(y) + k*pi`.
pub fn tan(y: &Interval, x: &mut Interval) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    let ay = y.atan();
    periodic_bwd(x, std::f64::consts::PI, &|k| vec![Interval::pi() * k as f64 + ay]);
}

/// `y = asin(x)`.
pub fn asin(y: &Interval, x: &mut Interval) {
    let t = y.meet(&(Interval::half_pi() | -Interval::half_pi()));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    *x &= t.sin();
}

/// `y = acos(x)`.
pub fn acos(y: &Interval, x: &mut Interval) {
    let t = y.meet(&(Interval::point(0.0) | Interval::pi()));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    *x &= t.cos();
}

/// `y = atan(x)`.
pub fn atan(y: &Interval, x: &mut Interval) {
    let t = y.meet(&(Interval::half_pi() | -Interval::half_pi()));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    *x &= t.tan();
}

/// One atan2 quadrant: restricts the operands to the quadrant's closed
/// half-lines and `y` to the quadrant's angular range, rewrites the
/// constraint as `x1 = tan(theta) * x2` in that range, and narrows through
/// the division backward. Returns the narrowed `(x1, x2)` piece.
fn atan2_branch(
    y: &Interval,
    x1: &Interval,
    x2: &Interval,
    q1: Interval,
    q2: Interval,
    yr: Interval,
    shift: f64,
) -> (Interval, Interval) {
    let q1 = x1.meet(&q1);
    let q2 = x2.meet(&q2);
    let yq = y.meet(&yr);
    if q1.is_empty() || q2.is_empty() || yq.is_empty() {
        return (Interval::EMPTY, Interval::EMPTY);
    }
    let ratio = (yq + Interval::point(shift)).tan();
    let mut a = q1;
    let mut b = q2;
    a &= ratio * b;
    if a.is_empty() {
        return (Interval::EMPTY, Interval::EMPTY);
    }
    let mut r = ratio;
    mul(&a, &mut r, &mut b);
    if b.is_empty() {
        return (Interval::EMPTY, Interval::EMPTY);
    }
    (a, b)
}

/// `y = atan2(x1, x2)`: case-split over the four closed quadrants, each
/// solved through the tan/div rewrite, results unioned. Keeping all four
/// branches (rather than the minimal half-plane split) trades a little
/// tightness for robustness at the axes.
pub fn atan2(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    if y.is_empty() {
        empty_both(x1, x2);
        return;
    }
    let hp = std::f64::consts::FRAC_PI_2;
    let pi = std::f64::consts::PI;
    let branches = [
        // (x1 sign, x2 sign, angular range, shift to principal branch)
        (
            Interval::POSITIVE,
            Interval::POSITIVE,
            Interval::new(0.0, hp),
            0.0,
        ),
        (
            Interval::POSITIVE,
            Interval::NEGATIVE,
            Interval::new(hp, pi),
            -pi,
        ),
        (
            Interval::NEGATIVE,
            Interval::NEGATIVE,
            Interval::new(-pi, -hp),
            pi,
        ),
        (
            Interval::NEGATIVE,
            Interval::POSITIVE,
            Interval::new(-hp, 0.0),
            0.0,
        ),
    ];
    let mut r1 = Interval::EMPTY;
    let mut r2 = Interval::EMPTY;
    for (s1, s2, yr, shift) in branches {
        let (a, b) = atan2_branch(y, x1, x2, s1, s2, yr.inflate(1e-12), shift);
        r1 = r1.join(&a);
        r2 = r2.join(&b);
    }
    // degenerate origin: atan2 carries no information there
    if x1.contains(0.0) && x2.contains(0.0) {
        r1 = r1.join(&Interval::point(0.0));
        r2 = r2.join(&Interval::point(0.0));
    }
    *x1 = r1;
    *x2 = r2;
    if x1.is_empty() || x2.is_empty() {
        empty_both(x1, x2);
    }
}

/// `y = sinh(x)`.
pub fn sinh(y: &Interval, x: &mut Interval) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    let asinh = |v: f64| v.asinh();
    *x &= Interval::new(
        super::scalar::prev_f2(asinh(y.lb())),
        super::scalar::next_f2(asinh(y.ub())),
    );
}

/// `y = cosh(x)`: two-branch preimage, like even powers.
pub fn cosh(y: &Interval, x: &mut Interval) {
    let t = y.meet(&Interval::new(1.0, f64::INFINITY));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    let r = Interval::new(
        super::scalar::prev_f2(t.lb().acosh()).max(0.0),
        super::scalar::next_f2(t.ub().acosh()),
    );
    *x = (-r).meet(x).join(&r.meet(x));
}

/// `y = tanh(x)`.
pub fn tanh(y: &Interval, x: &mut Interval) {
    let t = y.meet(&Interval::new(-1.0, 1.0));
    if t.is_empty() {
        x.set_empty();
        return;
    }
    let lo = if t.lb() <= -1.0 {
        f64::NEG_INFINITY
    } else {
        super::scalar::prev_f2(t.lb().atanh())
    };
    let hi = if t.ub() >= 1.0 {
        f64::INFINITY
    } else {
        super::scalar::next_f2(t.ub().atanh())
    };
    *x &= Interval::new(lo, hi);
}

/// `y = |x|`: union of the positive and mirrored negative branches.
pub fn abs(y: &Interval, x: &mut Interval) {
    let t = y.nonneg();
    if t.is_empty() {
        x.set_empty();
        return;
    }
    *x = (-t).meet(x).join(&t.meet(x));
}

/// `y = sign(x)`.
pub fn sign(y: &Interval, x: &mut Interval) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    if y.lb() > 0.0 {
        *x &= Interval::POSITIVE;
    } else if y.ub() < 0.0 {
        *x &= Interval::NEGATIVE;
    }
}

/// `y = max(x1, x2)`. Case analysis ported from the hull-consistency
/// literature: disjoint-operand and certainly-dominated cases first, then
/// the mutually-overlapping trim.
pub fn max(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    if y.is_empty() {
        empty_both(x1, x2);
    } else if x2.lb() > x1.ub() || y.lb() > x1.ub() {
        // max(x1, x2) is necessarily x2
        *x2 &= *y;
        if x2.is_empty() {
            x1.set_empty();
        }
    } else if x1.lb() > x2.ub() || y.lb() > x2.ub() {
        *x1 &= *y;
        if x1.is_empty() {
            x2.set_empty();
        }
    } else if y.ub() < x1.lb() || y.ub() < x2.lb() {
        empty_both(x1, x2);
    } else {
        // x1, x2 and y all mutually intersect
        if x1.ub() > y.ub() {
            *x1 = Interval::new(x1.lb(), y.ub());
        }
        if x2.ub() > y.ub() {
            *x2 = Interval::new(x2.lb(), y.ub());
        }
    }
}

/// `y = min(x1, x2)`, through negation of the max backward.
pub fn min(y: &Interval, x1: &mut Interval, x2: &mut Interval) {
    let mut mx1 = -*x1;
    let mut mx2 = -*x2;
    max(&-*y, &mut mx1, &mut mx2);
    if mx1.is_empty() || mx2.is_empty() {
        empty_both(x1, x2);
    } else {
        *x1 = -mx1;
        *x2 = -mx2;
    }
}

/// `y = floor(x)`: `x` must lie in `[k, k+1)` for some integer `k` in `y`.
pub fn floor(y: &Interval, x: &mut Interval) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    let lo = y.lb().ceil();
    let hi = y.ub().floor();
    if lo > hi {
        x.set_empty();
    } else {
        *x &= Interval::new(lo, if hi.is_finite() { hi + 1.0 } else { hi });
    }
}

/// `y = ceil(x)`.
pub fn ceil(y: &Interval, x: &mut Interval) {
    if y.is_empty() {
        x.set_empty();
        return;
    }
    let lo = y.lb().ceil();
    let hi = y.ub().floor();
    if lo > hi {
        x.set_empty();
    } else {
        *x &= Interval::new(if lo.is_finite() { lo - 1.0 } else { lo }, hi);
    }
}

/// `y = chi(x1, x2, x3)` selection backward. Ported case analysis: the
/// determined-sign cases push `y` into the selected branch; a branch
/// disjoint from `y` forces the condition's sign and pushes `y` into the
/// other branch. Emptiness always reaches every sibling.
pub fn chi(y: &Interval, x1: &mut Interval, x2: &mut Interval, x3: &mut Interval) {
    if x1.ub() <= 0.0 {
        *x2 &= *y;
        if x2.is_empty() {
            x1.set_empty();
            x3.set_empty();
        }
    } else if x1.lb() > 0.0 {
        *x3 &= *y;
        if x3.is_empty() {
            x1.set_empty();
            x2.set_empty();
        }
    }

    if y.is_disjoint(x2) {
        *x1 &= Interval::POSITIVE;
        if x1.is_empty() {
            x2.set_empty();
            x3.set_empty();
        }
        *x3 &= *y;
        if x3.is_empty() {
            x1.set_empty();
            x2.set_empty();
        }
    }

    if y.is_disjoint(x3) {
        *x1 &= Interval::NEGATIVE;
        if x1.is_empty() {
            x2.set_empty();
            x3.set_empty();
        }
        *x2 &= *y;
        if x2.is_empty() {
            x1.set_empty();
            x3.set_empty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_bwd_narrows_sibling() {
        let y = Interval::point(5.0);
        let mut x1 = Interval::new(10.0, 20.0);
        let mut x2 = Interval::new(-100.0, -1.0);
        add(&y, &mut x1, &mut x2);
        assert!((x2.lb() - -15.0).abs() < 1e-9, "x2 = {}", x2);
        assert!((x2.ub() - -5.0).abs() < 1e-9, "x2 = {}", x2);
        assert!((x1.lb() - 10.0).abs() < 1e-9 && (x1.ub() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_bwd_empties_both_when_inconsistent() {
        let y = Interval::point(100.0);
        let mut x1 = Interval::new(0.0, 1.0);
        let mut x2 = Interval::new(0.0, 1.0);
        add(&y, &mut x1, &mut x2);
        assert!(x1.is_empty() && x2.is_empty());
    }

    #[test]
    fn test_add_bwd_idempotent_on_superset() {
        let mut x1 = Interval::new(1.0, 2.0);
        let mut x2 = Interval::new(3.0, 4.0);
        let y = (x1 + x2).inflate(1.0);
        let (o1, o2) = (x1, x2);
        add(&y, &mut x1, &mut x2);
        assert_eq!(x1, o1);
        assert_eq!(x2, o2);
    }

    #[test]
    fn test_mul_bwd_keeps_branch_gap() {
        // y = x1 * x2, y = [1, 2], x2 = [-1, 1]: x1 can be anything outside
        // (-1, 1) only; intersecting with [0.2, 5] must keep [1, 5]
        let y = Interval::new(1.0, 2.0);
        let mut x1 = Interval::new(0.2, 5.0);
        let mut x2 = Interval::new(-1.0, 1.0);
        mul(&y, &mut x1, &mut x2);
        assert!(x1.lb() >= 1.0 - 1e-9, "x1 = {}", x1);
        assert!(x1.ub() <= 5.0 + 1e-9);
    }

    #[test]
    fn test_div_bwd_composes_from_mul() {
        // y = x1 / x2 with y = [2, 2], x2 = [1, 3] narrows x1 to [2, 6]
        let y = Interval::point(2.0);
        let mut x1 = Interval::new(-10.0, 10.0);
        let mut x2 = Interval::new(1.0, 3.0);
        div(&y, &mut x1, &mut x2);
        assert!((x1.lb() - 2.0).abs() < 1e-9 && (x1.ub() - 6.0).abs() < 1e-9, "x1 = {}", x1);
    }

    #[test]
    fn test_sqr_bwd_unions_branches() {
        let y = Interval::new(4.0, 9.0);
        let mut x = Interval::new(-10.0, 10.0);
        sqr(&y, &mut x);
        assert!(x.contains(-3.0) && x.contains(2.5) && x.contains(3.0));
        assert!(x.lb() >= -3.0 - 1e-9 && x.ub() <= 3.0 + 1e-9);

        let mut xn = Interval::new(-10.0, -1.0);
        sqr(&y, &mut xn);
        assert!(xn.lb() >= -3.0 - 1e-9 && xn.ub() <= -2.0 + 1e-9, "xn = {}", xn);
    }

    #[test]
    fn test_pow_even_bwd_unions_branches() {
        let y = Interval::new(16.0, 81.0);
        let mut x = Interval::new(-5.0, 0.0);
        pow_i(&y, &mut x, 4);
        assert!(x.contains(-3.0) && x.contains(-2.0));
        assert!(x.ub() <= -2.0 + 1e-9);
    }

    #[test]
    fn test_trig_bwd_preimage() {
        // cos(x) = 1 near x in [5, 8] forces x toward 2*pi
        let mut x = Interval::new(5.0, 8.0);
        cos(&Interval::new(0.9, 1.0), &mut x);
        assert!(x.contains(std::f64::consts::TAU));
        assert!(x.diam() < 1.0, "x = {}", x);

        let mut x2 = Interval::new(0.0, 7.0);
        sin(&Interval::point(1.0), &mut x2);
        assert!(x2.contains(std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_minmax_bwd() {
        // max(x1, x2) = [5, 5] with x1 = [0, 3]: x2 must be 5
        let mut x1 = Interval::new(0.0, 3.0);
        let mut x2 = Interval::new(0.0, 10.0);
        max(&Interval::point(5.0), &mut x1, &mut x2);
        assert!((x2.lb() - 5.0).abs() < 1e-9 && (x2.ub() - 5.0).abs() < 1e-9);

        let mut m1 = Interval::new(2.0, 8.0);
        let mut m2 = Interval::new(4.0, 9.0);
        min(&Interval::new(3.0, 5.0), &mut m1, &mut m2);
        assert!(m1.lb() >= 3.0 - 1e-9);
        assert!(m2.lb() >= 4.0 - 1e-9);
    }

    #[test]
    fn test_abs_bwd() {
        let mut x = Interval::new(-10.0, 1.0);
        abs(&Interval::new(2.0, 3.0), &mut x);
        assert!(x.lb() >= -3.0 - 1e-9 && x.ub() <= -2.0 + 1e-9, "x = {}", x);
    }

    #[test]
    fn test_chi_bwd_selects() {
        // condition certainly negative: y flows into the second operand
        let y = Interval::new(1.0, 2.0);
        let mut c = Interval::new(-5.0, -1.0);
        let mut a = Interval::new(0.0, 10.0);
        let mut b = Interval::new(0.0, 10.0);
        chi(&y, &mut c, &mut a, &mut b);
        assert!(a.is_subset(&y));
    }

    #[test]
    fn test_floor_ceil_bwd() {
        let mut x = Interval::new(-10.0, 10.0);
        floor(&Interval::point(2.0), &mut x);
        assert!(x.lb() >= 2.0 - 1e-9 && x.ub() <= 3.0 + 1e-9);

        let mut x2 = Interval::new(-10.0, 10.0);
        floor(&Interval::new(2.3, 2.7), &mut x2);
        assert!(x2.is_empty());
    }

    #[test]
    fn test_atan2_bwd_first_quadrant() {
        // y = pi/4 with both operands positive pins x1 ~ x2
        let y = Interval::point(std::f64::consts::FRAC_PI_4).inflate(1e-3);
        let mut x1 = Interval::new(0.0, 10.0);
        let mut x2 = Interval::new(1.0, 2.0);
        atan2(&y, &mut x1, &mut x2);
        assert!(x1.ub() <= 2.1, "x1 = {}", x1);
        assert!(x1.lb() >= 0.9, "x1 = {}", x1);
    }
}
