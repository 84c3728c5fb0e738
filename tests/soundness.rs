// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Soundness tests: every enclosure must contain the true image
//!
//! Random boxes are evaluated, then random points inside each box are
//! pushed through the same formula in plain f64 arithmetic. The point
//! image must land inside the interval enclosure (up to one ulp-scale
//! inflation, since the f64 reference itself rounds).

use anyhow::Result;
use boxprop::{
    atan2, exp, sin, sqr, sqrt, AnalyticFunction, ArgValue, EvalMode, Interval, ScalarVar,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-9;

fn sample(rng: &mut StdRng, x: &Interval) -> f64 {
    rng.gen_range(x.lb()..=x.ub())
}

#[test]
fn test_enclosures_contain_sampled_images() -> Result<()> {
    let x = ScalarVar::new("x");
    let y = ScalarVar::new("y");
    let body = &x * &y + sin(&x) - sqrt(sqr(&y) + 1.0) + exp(0.1 * &x);
    let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &body)?;

    let mut rng = StdRng::seed_from_u64(7);
    for trial in 0..200 {
        let xl = rng.gen_range(-5.0..5.0);
        let yl = rng.gen_range(-5.0..5.0);
        let bx = Interval::new(xl, xl + rng.gen_range(0.0..2.0));
        let by = Interval::new(yl, yl + rng.gen_range(0.0..2.0));

        let hull = f.eval(&[ArgValue::from(bx), ArgValue::from(by)])?;
        for _ in 0..20 {
            let px = sample(&mut rng, &bx);
            let py = sample(&mut rng, &by);
            let image = px * py + px.sin() - (py * py + 1.0).sqrt() + (0.1 * px).exp();
            assert!(
                hull.inflate(TOL).contains(image),
                "trial {trial}: image {image} escapes enclosure {hull}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_centered_is_tighter_than_natural() -> Result<()> {
    // the dependency problem: x appears three times, so the natural form
    // overestimates and the centered form should claw part of that back
    let x = ScalarVar::new("x");
    let body = sqr(&x) - &x * &x + &x;
    let f = AnalyticFunction::new(vec![x.decl()], &body)?;

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let lo = rng.gen_range(-3.0..3.0);
        let bx = Interval::new(lo, lo + rng.gen_range(0.0..0.5));
        let inputs = [ArgValue::from(bx)];

        let natural = f.eval_mode(EvalMode::Natural, &inputs)?;
        let centered = f.eval_mode(EvalMode::Centered, &inputs)?;
        let combined = f.eval(&inputs)?;

        assert!(
            centered.is_subset(&natural),
            "centered {centered} not inside natural {natural} on {bx}"
        );
        assert!(combined.is_subset(&centered));
        assert!(combined.is_subset(&natural));
    }
    Ok(())
}

#[test]
fn test_centered_vector_output_is_sound() -> Result<()> {
    use boxprop::{vec as vec_expr, VectorVar};

    let p = VectorVar::new("p", 2);
    let body = vec_expr(vec![
        p.elem(0) + p.elem(1),
        p.elem(0) * p.elem(1) - p.elem(0),
    ]);
    let f = AnalyticFunction::new(vec![p.decl()], &body)?;

    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let a = rng.gen_range(-2.0..2.0);
        let b = rng.gen_range(-2.0..2.0);
        let box0 = Interval::new(a, a + 0.25);
        let box1 = Interval::new(b, b + 0.25);
        let input = boxprop::IntervalVector::from_vec(vec![box0, box1]);
        let hull = f.eval(&[ArgValue::from(input)])?;

        for _ in 0..10 {
            let p0 = sample(&mut rng, &box0);
            let p1 = sample(&mut rng, &box1);
            assert!(hull[0].inflate(TOL).contains(p0 + p1));
            assert!(hull[1].inflate(TOL).contains(p0 * p1 - p0));
        }
    }
    Ok(())
}

#[test]
fn test_atan2_backward_covers_all_branches() -> Result<()> {
    let y = ScalarVar::new("y");
    let x = ScalarVar::new("x");
    let body = atan2(&y, &x);
    let f = AnalyticFunction::new(vec![y.decl(), x.decl()], &body)?;

    // boxes straddling quadrant boundaries, targets straddling the branch cut
    let cases = [
        (
            Interval::new(-2.0, 2.0),
            Interval::new(-2.0, 2.0),
            Interval::new(-0.5, 0.5),
        ),
        (
            Interval::new(-2.0, 2.0),
            Interval::new(-2.0, -0.5),
            Interval::new(2.5, 3.2),
        ),
        (
            Interval::new(0.5, 3.0),
            Interval::new(-2.0, 2.0),
            Interval::new(0.3, 2.8),
        ),
        (
            Interval::new(-3.0, -0.5),
            Interval::new(-2.0, 2.0),
            Interval::new(-2.8, -0.3),
        ),
    ];

    const N: usize = 120;
    for (by, bx, theta) in cases {
        let mut inputs = [ArgValue::from(by), ArgValue::from(bx)];
        f.contract(&theta, &mut inputs)?;
        let ArgValue::Scalar(ny) = &inputs[0] else { panic!() };
        let ArgValue::Scalar(nx) = &inputs[1] else { panic!() };

        // every grid point consistent with the constraint must survive
        for i in 0..=N {
            for j in 0..=N {
                let py = by.lb() + by.diam() * i as f64 / N as f64;
                let px = bx.lb() + bx.diam() * j as f64 / N as f64;
                if (py == 0.0 && px == 0.0) || !theta.contains(py.atan2(px)) {
                    continue;
                }
                assert!(
                    ny.inflate(TOL).contains(py) && nx.inflate(TOL).contains(px),
                    "consistent point ({py},{px}) lost: y -> {ny}, x -> {nx}"
                );
            }
        }
    }
    Ok(())
}
