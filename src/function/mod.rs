// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Bound analytic functions
//!
//! An [`AnalyticFunction`] ties an expression graph to an ordered argument
//! list. It is the consumer-facing surface of the engine: interval
//! evaluation in natural, centered or combined mode, interval Jacobians,
//! backward contraction of the input box against an output constraint, and
//! composition of one function into another expression.
//!
//! A bound function is immutable. Every call builds its own value map, so
//! one function can serve many calls without interference.

use std::fmt;

use crate::expr::{
    ArgKind, ArgValue, ArgsList, ExprError, ScalarExpr, ScalarVar, ValueMap, VectorExpr, VectorVar,
};
use crate::interval::{
    meet_vector, mid_vector, Interval, IntervalMatrix, IntervalVector,
};
use nalgebra::DVector;

/// Forward evaluation strategy.
///
/// `Natural` propagates plain interval arithmetic through the graph.
/// `Centered` additionally chains first-order enclosures and intersects
/// `a` with `m + J * (x - mid x)`; it wins on small boxes, the natural
/// form wins on large ones. `Default` runs both and meets the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    Natural,
    Centered,
    Default,
}

mod private {
    pub trait Sealed {}
    impl Sealed for crate::expr::ScalarExpr {}
    impl Sealed for crate::expr::VectorExpr {}
}

/// Expression shapes that can serve as the body of a bound function.
///
/// Implemented by [`ScalarExpr`] and [`VectorExpr`]. The methods are
/// plumbing for [`AnalyticFunction`] and not meant to be called directly.
pub trait FunctionBody: private::Sealed + Clone + fmt::Display {
    /// Interval enclosure of the function output.
    type Enclosure: Clone;
    /// Midpoint image type, for point evaluation.
    type Real;

    #[doc(hidden)]
    fn free_variable(&self, args: &ArgsList) -> Option<String>;
    #[doc(hidden)]
    fn forward(&self, v: &mut ValueMap, total: usize, natural: bool);
    #[doc(hidden)]
    fn backward(&self, v: &mut ValueMap);
    #[doc(hidden)]
    fn output(&self, v: &ValueMap) -> Self::Enclosure;
    #[doc(hidden)]
    fn centered_output(&self, v: &ValueMap, delta: &IntervalVector) -> Self::Enclosure;
    #[doc(hidden)]
    fn meet_output(&self, v: &mut ValueMap, y: &Self::Enclosure);
    #[doc(hidden)]
    fn meet(a: &mut Self::Enclosure, b: &Self::Enclosure);
    #[doc(hidden)]
    fn jacobian(&self, v: &ValueMap, total: usize) -> IntervalMatrix;
    #[doc(hidden)]
    fn real_of(e: &Self::Enclosure) -> Self::Real;
    #[doc(hidden)]
    fn compose_with(&self, args: &ArgsList, with: &[ArgExpr]) -> Self;
    #[doc(hidden)]
    fn shape(&self) -> (usize, usize);
}

impl FunctionBody for ScalarExpr {
    type Enclosure = Interval;
    type Real = f64;

    fn free_variable(&self, args: &ArgsList) -> Option<String> {
        self.undeclared_var(args)
    }

    fn forward(&self, v: &mut ValueMap, total: usize, natural: bool) {
        self.fwd_eval(v, total, natural);
    }

    fn backward(&self, v: &mut ValueMap) {
        self.bwd_eval(v);
    }

    fn output(&self, v: &ValueMap) -> Interval {
        v.scalar(self.id()).a
    }

    fn centered_output(&self, v: &ValueMap, delta: &IntervalVector) -> Interval {
        let val = v.scalar(self.id());
        if !val.has_jacobian() {
            return val.a;
        }
        let mut e = val.m;
        for j in 0..delta.len() {
            e += val.da[(0, j)] * delta[j];
        }
        val.a & e
    }

    fn meet_output(&self, v: &mut ValueMap, y: &Interval) {
        v.scalar_mut(self.id()).a &= *y;
    }

    fn meet(a: &mut Interval, b: &Interval) {
        *a &= *b;
    }

    fn jacobian(&self, v: &ValueMap, total: usize) -> IntervalMatrix {
        let val = v.scalar(self.id());
        if val.has_jacobian() {
            val.da.clone()
        } else {
            IntervalMatrix::from_element(1, total, Interval::ALL)
        }
    }

    fn real_of(e: &Interval) -> f64 {
        e.mid()
    }

    fn compose_with(&self, args: &ArgsList, with: &[ArgExpr]) -> ScalarExpr {
        let mut memo = crate::expr::CopyMemo::default();
        let copy = self.copy_fresh(&mut memo);
        copy.substitute(&mut bindings(args, with))
    }

    fn shape(&self) -> (usize, usize) {
        (1, 1)
    }
}

impl FunctionBody for VectorExpr {
    type Enclosure = IntervalVector;
    type Real = DVector<f64>;

    fn free_variable(&self, args: &ArgsList) -> Option<String> {
        self.undeclared_var(args)
    }

    fn forward(&self, v: &mut ValueMap, total: usize, natural: bool) {
        self.fwd_eval(v, total, natural);
    }

    fn backward(&self, v: &mut ValueMap) {
        self.bwd_eval(v);
    }

    fn output(&self, v: &ValueMap) -> IntervalVector {
        v.vector(self.id()).a.clone()
    }

    fn centered_output(&self, v: &ValueMap, delta: &IntervalVector) -> IntervalVector {
        let val = v.vector(self.id());
        if !val.has_jacobian() {
            return val.a.clone();
        }
        let mut out = val.a.clone();
        for i in 0..out.len() {
            let mut e = val.m[i];
            for j in 0..delta.len() {
                e += val.da[(i, j)] * delta[j];
            }
            out[i] &= e;
        }
        out
    }

    fn meet_output(&self, v: &mut ValueMap, y: &IntervalVector) {
        meet_vector(&mut v.vector_mut(self.id()).a, y);
    }

    fn meet(a: &mut IntervalVector, b: &IntervalVector) {
        meet_vector(a, b);
    }

    fn jacobian(&self, v: &ValueMap, total: usize) -> IntervalMatrix {
        let val = v.vector(self.id());
        if val.has_jacobian() {
            val.da.clone()
        } else {
            IntervalMatrix::from_element(self.size(), total, Interval::ALL)
        }
    }

    fn real_of(e: &IntervalVector) -> DVector<f64> {
        mid_vector(e)
    }

    fn compose_with(&self, args: &ArgsList, with: &[ArgExpr]) -> VectorExpr {
        let mut memo = crate::expr::CopyMemo::default();
        let copy = self.copy_fresh(&mut memo);
        copy.substitute(&mut bindings(args, with))
    }

    fn shape(&self) -> (usize, usize) {
        (self.size(), 1)
    }
}

fn bindings(args: &ArgsList, with: &[ArgExpr]) -> crate::expr::Substitution {
    let mut subs = crate::expr::Substitution::default();
    for (decl, arg) in args.iter().zip(with.iter()) {
        match arg {
            ArgExpr::Scalar(e) => {
                subs.scalars.insert(decl.id, e.clone());
            }
            ArgExpr::Vector(e) => {
                subs.vectors.insert(decl.id, e.clone());
            }
        }
    }
    subs
}

/// One expression handed to a composition site.
#[derive(Debug, Clone)]
pub enum ArgExpr {
    Scalar(ScalarExpr),
    Vector(VectorExpr),
}

impl ArgExpr {
    fn kind_label(&self) -> &'static str {
        match self {
            ArgExpr::Scalar(_) => "scalar",
            ArgExpr::Vector(_) => "vector",
        }
    }
}

impl From<ScalarExpr> for ArgExpr {
    fn from(e: ScalarExpr) -> Self {
        ArgExpr::Scalar(e)
    }
}

impl From<&ScalarExpr> for ArgExpr {
    fn from(e: &ScalarExpr) -> Self {
        ArgExpr::Scalar(e.clone())
    }
}

impl From<&ScalarVar> for ArgExpr {
    fn from(v: &ScalarVar) -> Self {
        ArgExpr::Scalar(v.expr())
    }
}

impl From<VectorExpr> for ArgExpr {
    fn from(e: VectorExpr) -> Self {
        ArgExpr::Vector(e)
    }
}

impl From<&VectorExpr> for ArgExpr {
    fn from(e: &VectorExpr) -> Self {
        ArgExpr::Vector(e.clone())
    }
}

impl From<&VectorVar> for ArgExpr {
    fn from(v: &VectorVar) -> Self {
        ArgExpr::Vector(v.expr())
    }
}

/// An expression graph bound to an ordered argument list.
#[derive(Debug, Clone)]
pub struct AnalyticFunction<B: FunctionBody> {
    args: ArgsList,
    body: B,
}

pub type ScalarFunction = AnalyticFunction<ScalarExpr>;
pub type VectorFunction = AnalyticFunction<VectorExpr>;

impl<B: FunctionBody> AnalyticFunction<B> {
    /// Binds `body` to `args`. Fails if the body reads a variable that the
    /// argument list does not declare.
    pub fn new(args: impl Into<ArgsList>, body: &B) -> Result<Self, ExprError> {
        let args = args.into();
        if let Some(name) = body.free_variable(&args) {
            return Err(ExprError::UndeclaredVariable(name));
        }
        Ok(AnalyticFunction {
            args,
            body: body.clone(),
        })
    }

    pub fn args(&self) -> &ArgsList {
        &self.args
    }

    /// Output shape as rows x columns; scalar functions are 1x1.
    pub fn output_shape(&self) -> (usize, usize) {
        self.body.shape()
    }

    /// Evaluates with [`EvalMode::Default`].
    pub fn eval(&self, inputs: &[ArgValue]) -> Result<B::Enclosure, ExprError> {
        self.eval_mode(EvalMode::Default, inputs)
    }

    /// Evaluates the function over an input box.
    ///
    /// Domain violations and inconsistencies surface in the enclosure
    /// itself (possibly empty), never as errors; errors only report
    /// ill-formed input bindings.
    pub fn eval_mode(&self, mode: EvalMode, inputs: &[ArgValue]) -> Result<B::Enclosure, ExprError> {
        let total = self.args.total_size();
        match mode {
            EvalMode::Natural => self.natural_pass(inputs),
            EvalMode::Centered => match self.delta(inputs, total) {
                Some(delta) => self.centered_pass(inputs, total, &delta),
                // degenerate box, the centered form has nothing to offer
                None => self.natural_pass(inputs),
            },
            EvalMode::Default => {
                let mut out = self.natural_pass(inputs)?;
                if let Some(delta) = self.delta(inputs, total) {
                    let centered = self.centered_pass(inputs, total, &delta)?;
                    B::meet(&mut out, &centered);
                }
                Ok(out)
            }
        }
    }

    /// Interval Jacobian of the function over an input box, with respect to
    /// the flattened inputs. Rows without first-order information come back
    /// unbounded.
    pub fn diff(&self, inputs: &[ArgValue]) -> Result<IntervalMatrix, ExprError> {
        let total = self.args.total_size();
        let mut map = ValueMap::new();
        self.args.seed(inputs, &mut map)?;
        self.body.forward(&mut map, total, false);
        Ok(self.body.jacobian(&map, total))
    }

    /// Midpoint image: evaluates naturally at the midpoint of the input box
    /// and returns the midpoint of the result.
    pub fn real_eval(&self, inputs: &[ArgValue]) -> Result<B::Real, ExprError> {
        let points: Vec<ArgValue> = inputs
            .iter()
            .map(|x| match x {
                ArgValue::Scalar(s) => ArgValue::Scalar(Interval::point(s.mid())),
                ArgValue::Vector(v) => ArgValue::Vector(IntervalVector::from_iterator(
                    v.len(),
                    v.iter().map(|c| Interval::point(c.mid())),
                )),
            })
            .collect();
        let out = self.natural_pass(&points)?;
        Ok(B::real_of(&out))
    }

    /// Narrows `inputs` to the part consistent with `f(inputs) ∈ y`.
    ///
    /// One forward natural sweep, intersection of the root enclosure with
    /// `y`, one backward sweep, then the argument domains are read back.
    /// Inconsistency leaves empty intervals in `inputs`.
    pub fn contract(&self, y: &B::Enclosure, inputs: &mut [ArgValue]) -> Result<(), ExprError> {
        let total = self.args.total_size();
        let mut map = ValueMap::new();
        self.args.seed(inputs, &mut map)?;
        self.body.forward(&mut map, total, true);
        self.body.meet_output(&mut map, y);
        self.body.backward(&mut map);
        self.args.read_back(&map, inputs);
        Ok(())
    }

    /// Composition: builds the expression `f(with...)`, with the body
    /// copied under fresh ids and the declared variables substituted by the
    /// given expressions.
    pub fn call(&self, with: &[ArgExpr]) -> Result<B, ExprError> {
        if with.len() != self.args.len() {
            return Err(ExprError::ArgCount {
                expected: self.args.len(),
                got: with.len(),
            });
        }
        for (index, (decl, arg)) in self.args.iter().zip(with.iter()).enumerate() {
            match (decl.kind(), arg) {
                (ArgKind::Scalar, ArgExpr::Scalar(_)) => {}
                (ArgKind::Vector(n), ArgExpr::Vector(e)) => {
                    if e.size() != *n {
                        return Err(ExprError::CompositionShape {
                            index,
                            expected_rows: *n,
                            expected_cols: 1,
                            got_rows: e.size(),
                            got_cols: 1,
                        });
                    }
                }
                (kind, arg) => {
                    return Err(ExprError::ArgKind {
                        index,
                        name: decl.name().to_string(),
                        expected: kind.label(),
                        got: arg.kind_label(),
                    });
                }
            }
        }
        Ok(self.body.compose_with(&self.args, with))
    }

    fn natural_pass(&self, inputs: &[ArgValue]) -> Result<B::Enclosure, ExprError> {
        let mut map = ValueMap::new();
        self.args.seed(inputs, &mut map)?;
        self.body.forward(&mut map, self.args.total_size(), true);
        Ok(self.body.output(&map))
    }

    fn centered_pass(
        &self,
        inputs: &[ArgValue],
        total: usize,
        delta: &IntervalVector,
    ) -> Result<B::Enclosure, ExprError> {
        let mut map = ValueMap::new();
        self.args.seed(inputs, &mut map)?;
        self.body.forward(&mut map, total, false);
        Ok(self.body.centered_output(&map, delta))
    }

    /// `x - mid x` over the flattened input box, or `None` when a component
    /// is empty or unbounded and midpoints are meaningless.
    fn delta(&self, inputs: &[ArgValue], total: usize) -> Option<IntervalVector> {
        let mut flat = Vec::with_capacity(total);
        for x in inputs {
            match x {
                ArgValue::Scalar(s) => flat.push(*s),
                ArgValue::Vector(v) => flat.extend(v.iter().copied()),
            }
        }
        if flat.iter().any(|x| x.is_empty() || x.is_unbounded()) {
            return None;
        }
        Some(IntervalVector::from_iterator(
            flat.len(),
            flat.iter().map(|x| *x - Interval::point(x.mid())),
        ))
    }
}

impl<B: FunctionBody> fmt::Display for AnalyticFunction<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, decl) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", decl.name())?;
        }
        write!(f, ") -> {}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{sqr, vec, ArgsList, ScalarVar, VectorVar};

    #[test]
    fn test_new_rejects_free_variables() {
        let x = ScalarVar::new("x");
        let y = ScalarVar::new("y");
        let body = x.expr() + y.expr();
        let err = AnalyticFunction::new(ArgsList::new(vec![x.decl()]), &body).unwrap_err();
        assert_eq!(err, ExprError::UndeclaredVariable("y".into()));
    }

    #[test]
    fn test_centered_beats_natural_on_dependency() {
        // x - x is identically zero, but natural evaluation cannot see it
        let x = ScalarVar::new("x");
        let body = x.expr() - x.expr();
        let f = AnalyticFunction::new(vec![x.decl()], &body).unwrap();

        let inputs = [ArgValue::from(Interval::new(-1.0, 1.0))];
        let natural = f.eval_mode(EvalMode::Natural, &inputs).unwrap();
        let centered = f.eval_mode(EvalMode::Centered, &inputs).unwrap();
        let both = f.eval(&inputs).unwrap();

        assert_eq!(natural, Interval::new(-2.0, 2.0));
        assert_eq!(centered, Interval::point(0.0));
        assert_eq!(both, Interval::point(0.0));
    }

    #[test]
    fn test_diff_of_square() {
        let x = ScalarVar::new("x");
        let body = sqr(&x);
        let f = AnalyticFunction::new(vec![x.decl()], &body).unwrap();
        let j = f.diff(&[ArgValue::from(Interval::new(1.0, 2.0))]).unwrap();
        assert_eq!(j.shape(), (1, 1));
        assert_eq!(j[(0, 0)], Interval::new(2.0, 4.0));
    }

    #[test]
    fn test_contract_narrows_both_arguments() {
        let x = ScalarVar::new("x");
        let y = ScalarVar::new("y");
        let body = x.expr() + y.expr();
        let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &body).unwrap();

        let mut inputs = [
            ArgValue::from(Interval::new(0.0, 10.0)),
            ArgValue::from(Interval::new(2.0, 3.0)),
        ];
        f.contract(&Interval::point(5.0), &mut inputs).unwrap();
        let ArgValue::Scalar(nx) = &inputs[0] else { panic!() };
        let ArgValue::Scalar(ny) = &inputs[1] else { panic!() };
        assert_eq!(*nx, Interval::new(2.0, 3.0));
        assert_eq!(*ny, Interval::new(2.0, 3.0));
    }

    #[test]
    fn test_composition_substitutes_the_body() {
        let x = ScalarVar::new("x");
        let g = AnalyticFunction::new(vec![x.decl()], &(x.expr() + 1.0)).unwrap();

        let t = ScalarVar::new("t");
        let composed = g.call(&[ArgExpr::from(sqr(&t))]).unwrap();
        let f = AnalyticFunction::new(vec![t.decl()], &composed).unwrap();
        let out = f.eval(&[ArgValue::from(2.0)]).unwrap();
        assert_eq!(out, Interval::point(5.0));
    }

    #[test]
    fn test_composition_shape_errors() {
        let p = VectorVar::new("p", 3);
        let body = p.elem(0) + p.elem(2);
        let f = AnalyticFunction::new(vec![p.decl()], &body).unwrap();

        let q = VectorVar::new("q", 2);
        let err = f.call(&[ArgExpr::from(&q)]).unwrap_err();
        assert!(matches!(
            err,
            ExprError::CompositionShape {
                expected_rows: 3,
                got_rows: 2,
                ..
            }
        ));

        let s = ScalarVar::new("s");
        let err = f.call(&[ArgExpr::from(&s)]).unwrap_err();
        assert!(matches!(err, ExprError::ArgKind { .. }));
    }

    #[test]
    fn test_vector_function_eval_and_shape() {
        let p = VectorVar::new("p", 2);
        let body = vec(vec![p.elem(0) + p.elem(1), p.elem(0) * p.elem(1)]);
        let f = AnalyticFunction::new(vec![p.decl()], &body).unwrap();
        assert_eq!(f.output_shape(), (2, 1));

        let input = IntervalVector::from_vec(vec![Interval::new(1.0, 2.0), Interval::point(3.0)]);
        let out = f.eval(&[ArgValue::from(input)]).unwrap();
        assert_eq!(out[0], Interval::new(4.0, 5.0));
        assert_eq!(out[1], Interval::new(3.0, 6.0));
    }

    #[test]
    fn test_real_eval_takes_midpoints() {
        let x = ScalarVar::new("x");
        let f = AnalyticFunction::new(vec![x.decl()], &sqr(&x)).unwrap();
        let r = f.real_eval(&[ArgValue::from(Interval::new(1.0, 3.0))]).unwrap();
        assert_eq!(r, 4.0);
    }

    #[test]
    fn test_display() {
        let x = ScalarVar::new("x");
        let y = ScalarVar::new("y");
        let f = AnalyticFunction::new(vec![x.decl(), y.decl()], &(x.expr() * y.expr())).unwrap();
        assert_eq!(format!("{f}"), "(x,y) -> (x*y)");
    }
}
