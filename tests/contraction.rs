// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Backward contraction tests
//!
//! End-to-end narrowing through bound functions, including the distance
//! constraint scenario, idempotence, and emptiness propagation.

use anyhow::Result;
use approx::assert_relative_eq;
use boxprop::ops::AddOp;
use boxprop::{sin, sqr, AnalyticFunction, ArgValue, Interval, ScalarVar};

fn scalar(v: &ArgValue) -> Interval {
    match v {
        ArgValue::Scalar(x) => *x,
        ArgValue::Vector(_) => panic!("expected a scalar input"),
    }
}

#[test]
fn test_distance_constraint_golden_scenario() -> Result<()> {
    // d^2 = (a1-b1)^2 + (a2-b2)^2 with the beacon pinned at the origin
    let a1 = ScalarVar::new("a1");
    let a2 = ScalarVar::new("a2");
    let b1 = ScalarVar::new("b1");
    let b2 = ScalarVar::new("b2");
    let d = ScalarVar::new("d");
    let body = sqr(&d) - (sqr(&a1 - &b1) + sqr(&a2 - &b2));
    let f = AnalyticFunction::new(
        vec![a1.decl(), a2.decl(), b1.decl(), b2.decl(), d.decl()],
        &body,
    )?;

    let mut inputs = [
        ArgValue::from(Interval::new(2.0, 5.0)),
        ArgValue::from(Interval::new(2.0, 6.0)),
        ArgValue::from(0.0),
        ArgValue::from(0.0),
        ArgValue::from(Interval::new(1.0, 3.0)),
    ];
    f.contract(&Interval::point(0.0), &mut inputs)?;

    let na1 = scalar(&inputs[0]);
    let na2 = scalar(&inputs[1]);
    let nd = scalar(&inputs[4]);
    println!("a1 -> {na1}, a2 -> {na2}, d -> {nd}");

    // a1, a2 in [2, sqrt(5)], d in [2 sqrt(2), 3]
    for a in [na1, na2] {
        assert_eq!(a.lb(), 2.0);
        assert!(a.ub() >= 5.0f64.sqrt(), "upper bound {} unsound", a.ub());
        assert_relative_eq!(a.ub(), 5.0f64.sqrt(), epsilon = 1e-9);
    }
    assert_eq!(nd.ub(), 3.0);
    assert!(nd.lb() <= 8.0f64.sqrt());
    assert_relative_eq!(nd.lb(), 8.0f64.sqrt(), epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_contract_is_a_no_op_when_already_consistent() -> Result<()> {
    let x = ScalarVar::new("x");
    let f = AnalyticFunction::new(vec![x.decl()], &sin(&x))?;

    // the target already covers the whole image, nothing may change
    let before = Interval::new(0.0, 1.0);
    let mut inputs = [ArgValue::from(before)];
    f.contract(&Interval::new(-10.0, 10.0), &mut inputs)?;
    assert_eq!(scalar(&inputs[0]), before);
    Ok(())
}

#[test]
fn test_contract_reaches_a_fixpoint() -> Result<()> {
    let x = ScalarVar::new("x");
    let y = ScalarVar::new("y");
    let body = &x * &y;
    let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &body)?;

    let mut inputs = [
        ArgValue::from(Interval::new(0.5, 10.0)),
        ArgValue::from(Interval::new(0.5, 10.0)),
    ];
    let target = Interval::new(4.0, 4.0);
    f.contract(&target, &mut inputs)?;
    let first = (scalar(&inputs[0]), scalar(&inputs[1]));

    f.contract(&target, &mut inputs)?;
    let second = (scalar(&inputs[0]), scalar(&inputs[1]));

    assert!(second.0.is_subset(&first.0) && second.1.is_subset(&first.1));
    // x*y = 4 over [0.5,10]^2 forces both factors into [0.5, 8]
    assert_eq!(first.0, Interval::new(0.5, 8.0));
    assert_eq!(first.1, first.0);
    Ok(())
}

#[test]
fn test_shared_subexpression_contracts_consistently() -> Result<()> {
    // s = x + y feeds both sides of s + s; the shared slot must meet the
    // narrowing coming from each parent
    let x = ScalarVar::new("x");
    let y = ScalarVar::new("y");
    let s = &x + &y;
    let body = &s + &s;
    let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &body)?;

    let mut inputs = [
        ArgValue::from(Interval::new(0.0, 10.0)),
        ArgValue::from(Interval::new(0.0, 10.0)),
    ];
    f.contract(&Interval::point(8.0), &mut inputs)?;

    let nx = scalar(&inputs[0]);
    let ny = scalar(&inputs[1]);
    assert_eq!(nx, ny, "symmetric arguments must narrow identically");
    // s narrows to [0,8] through both parents, then x &= s - y
    assert_eq!(nx, Interval::new(0.0, 8.0));
    Ok(())
}

#[test]
fn test_add_bwd_sibling_narrowing_and_emptiness() {
    let y = Interval::point(5.0);
    let mut x1 = Interval::new(10.0, 20.0);
    let mut x2 = Interval::new(-100.0, -1.0);
    AddOp::bwd(&y, &mut x1, &mut x2);
    assert_eq!(x1, Interval::new(10.0, 20.0));
    assert_eq!(x2, Interval::new(-15.0, -5.0));

    // disjoint target empties both operands
    let mut x1 = Interval::new(0.0, 1.0);
    let mut x2 = Interval::new(0.0, 1.0);
    AddOp::bwd(&Interval::point(100.0), &mut x1, &mut x2);
    assert!(x1.is_empty() && x2.is_empty());
}

#[test]
fn test_inconsistent_constraint_empties_the_inputs() -> Result<()> {
    let x = ScalarVar::new("x");
    let f = AnalyticFunction::new(vec![x.decl()], &sqr(&x))?;

    let mut inputs = [ArgValue::from(Interval::new(1.0, 2.0))];
    f.contract(&Interval::new(-3.0, -2.0), &mut inputs)?;
    assert!(scalar(&inputs[0]).is_empty());
    Ok(())
}
