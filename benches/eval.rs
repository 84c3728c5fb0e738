// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Evaluation and contraction benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use boxprop::{
    exp, sin, sqr, sqrt, AnalyticFunction, ArgValue, EvalMode, Interval, ScalarFunction, ScalarVar,
};

fn distance_function() -> ScalarFunction {
    let a1 = ScalarVar::new("a1");
    let a2 = ScalarVar::new("a2");
    let b1 = ScalarVar::new("b1");
    let b2 = ScalarVar::new("b2");
    let body = sqrt(sqr(&a1 - &b1) + sqr(&a2 - &b2));
    AnalyticFunction::new(vec![a1.decl(), a2.decl(), b1.decl(), b2.decl()], &body)
        .unwrap()
}

fn mixed_function() -> ScalarFunction {
    let x = ScalarVar::new("x");
    let y = ScalarVar::new("y");
    let body = &x * &y + sin(&x) - sqrt(sqr(&y) + 1.0) + exp(0.1 * &x);
    AnalyticFunction::new(vec![x.decl(), y.decl()], &body).unwrap()
}

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");

    let f = mixed_function();
    let inputs = [
        ArgValue::from(Interval::new(-1.0, 1.0)),
        ArgValue::from(Interval::new(2.0, 3.0)),
    ];

    for mode in [EvalMode::Natural, EvalMode::Centered, EvalMode::Default] {
        group.bench_with_input(
            BenchmarkId::new("mixed", format!("{mode:?}")),
            &mode,
            |b, &mode| {
                b.iter(|| f.eval_mode(mode, black_box(&inputs)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    let f = mixed_function();
    let inputs = [
        ArgValue::from(Interval::new(-1.0, 1.0)),
        ArgValue::from(Interval::new(2.0, 3.0)),
    ];

    group.bench_function("mixed", |b| {
        b.iter(|| f.diff(black_box(&inputs)).unwrap());
    });

    group.finish();
}

fn bench_contract(c: &mut Criterion) {
    let mut group = c.benchmark_group("contract");

    let f = distance_function();
    let target = Interval::new(1.0, 3.0);
    let seed = [
        ArgValue::from(Interval::new(2.0, 5.0)),
        ArgValue::from(Interval::new(2.0, 6.0)),
        ArgValue::from(0.0),
        ArgValue::from(0.0),
    ];

    group.bench_function("distance", |b| {
        b.iter(|| {
            let mut inputs = seed.clone();
            f.contract(black_box(&target), &mut inputs).unwrap();
            inputs
        });
    });

    group.finish();
}

criterion_group!(benches, bench_forward, bench_diff, bench_contract);
criterion_main!(benches);
