// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Expression graph nodes
//!
//! Expressions are immutable DAGs of reference-counted nodes, one node type
//! per value shape. Shared subexpressions keep a single node and therefore
//! a single slot in the value map, which is what makes backward narrowing
//! meet information coming from several parents. All evaluation passes live
//! here; the numeric work is delegated to the policies in [`crate::ops`].

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use super::args::ArgsList;
use super::id::ExprId;
use super::value::{MatrixValue, ScalarValue, Value, ValueMap, VectorValue};
use crate::interval::{Interval, IntervalMatrix, IntervalVector};
use crate::ops::{
    AbsOp, AcosOp, AddOp, AsinOp, Atan2Op, AtanOp, CeilOp, ChiOp, ComponentOp, CosOp, CoshOp, DivOp,
    ExpOp, FloorOp, LogOp, MaxOp, MinOp, MulOp, NegOp, PowOp, SignOp, SinOp, SinhOp, SqrOp, SqrtOp,
    SubOp, SubvectorOp, TanOp, TanhOp, VectorOp,
};

/// Scalar-valued expression handle. Cloning shares the node.
#[derive(Debug, Clone)]
pub struct ScalarExpr(pub(crate) Rc<ScalarNode>);

#[derive(Debug)]
pub(crate) struct ScalarNode {
    pub(crate) id: ExprId,
    pub(crate) op: ScalarOp,
}

#[derive(Debug)]
pub(crate) enum ScalarOp {
    Var { name: String },
    Const(Interval),
    Add(ScalarExpr, ScalarExpr),
    Sub(ScalarExpr, ScalarExpr),
    Neg(ScalarExpr),
    Mul(ScalarExpr, ScalarExpr),
    Div(ScalarExpr, ScalarExpr),
    Pow(ScalarExpr, ScalarExpr),
    Sqr(ScalarExpr),
    Sqrt(ScalarExpr),
    Exp(ScalarExpr),
    Log(ScalarExpr),
    Cos(ScalarExpr),
    Sin(ScalarExpr),
    Tan(ScalarExpr),
    Acos(ScalarExpr),
    Asin(ScalarExpr),
    Atan(ScalarExpr),
    Atan2(ScalarExpr, ScalarExpr),
    Cosh(ScalarExpr),
    Sinh(ScalarExpr),
    Tanh(ScalarExpr),
    Abs(ScalarExpr),
    Sign(ScalarExpr),
    Floor(ScalarExpr),
    Ceil(ScalarExpr),
    Min(ScalarExpr, ScalarExpr),
    Max(ScalarExpr, ScalarExpr),
    Chi(ScalarExpr, ScalarExpr, ScalarExpr),
    Component(VectorExpr, usize),
}

/// Vector-valued expression handle.
#[derive(Debug, Clone)]
pub struct VectorExpr(pub(crate) Rc<VectorNode>);

#[derive(Debug)]
pub(crate) struct VectorNode {
    pub(crate) id: ExprId,
    pub(crate) op: VectorOpNode,
}

#[derive(Debug)]
pub(crate) enum VectorOpNode {
    Var { name: String, size: usize },
    Const(IntervalVector),
    Add(VectorExpr, VectorExpr),
    Sub(VectorExpr, VectorExpr),
    Neg(VectorExpr),
    MulSv(ScalarExpr, VectorExpr),
    MulMv(MatrixExpr, VectorExpr),
    DivVs(VectorExpr, ScalarExpr),
    Vec(std::vec::Vec<ScalarExpr>),
    Subvector(VectorExpr, usize, usize),
}

/// Matrix-valued expression handle.
#[derive(Debug, Clone)]
pub struct MatrixExpr(pub(crate) Rc<MatrixNode>);

#[derive(Debug)]
pub(crate) struct MatrixNode {
    pub(crate) id: ExprId,
    pub(crate) op: MatrixOpNode,
}

#[derive(Debug)]
pub(crate) enum MatrixOpNode {
    Const(IntervalMatrix),
    Add(MatrixExpr, MatrixExpr),
    Sub(MatrixExpr, MatrixExpr),
    Neg(MatrixExpr),
}

/// Memo shared by one copy pass so that DAG sharing survives the copy.
#[derive(Default)]
pub(crate) struct CopyMemo {
    scalars: AHashMap<ExprId, ScalarExpr>,
    vectors: AHashMap<ExprId, VectorExpr>,
    matrices: AHashMap<ExprId, MatrixExpr>,
}

/// Variable-to-expression bindings applied by one substitution pass.
#[derive(Default)]
pub(crate) struct Substitution {
    pub(crate) scalars: AHashMap<ExprId, ScalarExpr>,
    pub(crate) vectors: AHashMap<ExprId, VectorExpr>,
    memo_s: AHashMap<ExprId, ScalarExpr>,
    memo_v: AHashMap<ExprId, VectorExpr>,
    memo_m: AHashMap<ExprId, MatrixExpr>,
}

impl ScalarExpr {
    pub(crate) fn new(op: ScalarOp) -> Self {
        ScalarExpr(Rc::new(ScalarNode {
            id: ExprId::fresh(),
            op,
        }))
    }

    pub(crate) fn id(&self) -> ExprId {
        self.0.id
    }

    /// Post-order forward sweep. Revisits through other parents recompute
    /// and overwrite the slot, so forward results never depend on
    /// evaluation order.
    pub(crate) fn fwd_eval(&self, v: &mut ValueMap, total: usize, natural: bool) {
        macro_rules! un {
            ($op:ty, $x1:expr) => {{
                $x1.fwd_eval(v, total, natural);
                let a = v.scalar($x1.id()).clone();
                let val = if natural {
                    <$op>::fwd_natural(&a)
                } else {
                    <$op>::fwd_centered(&a)
                };
                v.insert(self.id(), Value::Scalar(val));
            }};
        }
        macro_rules! bin {
            ($op:ty, $x1:expr, $x2:expr) => {{
                $x1.fwd_eval(v, total, natural);
                $x2.fwd_eval(v, total, natural);
                let a = v.scalar($x1.id()).clone();
                let b = v.scalar($x2.id()).clone();
                let val = if natural {
                    <$op>::fwd_natural(&a, &b)
                } else {
                    <$op>::fwd_centered(&a, &b)
                };
                v.insert(self.id(), Value::Scalar(val));
            }};
        }

        match &self.0.op {
            ScalarOp::Var { .. } => {
                assert!(
                    v.contains(self.id()),
                    "scalar variable was not bound before evaluation"
                );
            }
            ScalarOp::Const(c) => {
                let val = if natural {
                    ScalarValue::natural(*c, true)
                } else {
                    ScalarValue::centered(*c, *c, IntervalMatrix::zeros(1, total), true)
                };
                v.insert(self.id(), Value::Scalar(val));
            }
            ScalarOp::Add(x1, x2) => bin!(AddOp, x1, x2),
            ScalarOp::Sub(x1, x2) => bin!(SubOp, x1, x2),
            ScalarOp::Neg(x1) => un!(NegOp, x1),
            ScalarOp::Mul(x1, x2) => bin!(MulOp, x1, x2),
            ScalarOp::Div(x1, x2) => bin!(DivOp, x1, x2),
            ScalarOp::Pow(x1, x2) => bin!(PowOp, x1, x2),
            ScalarOp::Sqr(x1) => un!(SqrOp, x1),
            ScalarOp::Sqrt(x1) => un!(SqrtOp, x1),
            ScalarOp::Exp(x1) => un!(ExpOp, x1),
            ScalarOp::Log(x1) => un!(LogOp, x1),
            ScalarOp::Cos(x1) => un!(CosOp, x1),
            ScalarOp::Sin(x1) => un!(SinOp, x1),
            ScalarOp::Tan(x1) => un!(TanOp, x1),
            ScalarOp::Acos(x1) => un!(AcosOp, x1),
            ScalarOp::Asin(x1) => un!(AsinOp, x1),
            ScalarOp::Atan(x1) => un!(AtanOp, x1),
            ScalarOp::Atan2(x1, x2) => bin!(Atan2Op, x1, x2),
            ScalarOp::Cosh(x1) => un!(CoshOp, x1),
            ScalarOp::Sinh(x1) => un!(SinhOp, x1),
            ScalarOp::Tanh(x1) => un!(TanhOp, x1),
            ScalarOp::Abs(x1) => un!(AbsOp, x1),
            ScalarOp::Sign(x1) => un!(SignOp, x1),
            ScalarOp::Floor(x1) => un!(FloorOp, x1),
            ScalarOp::Ceil(x1) => un!(CeilOp, x1),
            ScalarOp::Min(x1, x2) => bin!(MinOp, x1, x2),
            ScalarOp::Max(x1, x2) => bin!(MaxOp, x1, x2),
            ScalarOp::Chi(x1, x2, x3) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                x3.fwd_eval(v, total, natural);
                let a = v.scalar(x1.id()).clone();
                let b = v.scalar(x2.id()).clone();
                let c = v.scalar(x3.id()).clone();
                let val = if natural {
                    ChiOp::fwd_natural(&a, &b, &c)
                } else {
                    ChiOp::fwd_centered(&a, &b, &c)
                };
                v.insert(self.id(), Value::Scalar(val));
            }
            ScalarOp::Component(x1, i) => {
                x1.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let val = if natural {
                    ComponentOp::fwd_natural(&a, *i)
                } else {
                    ComponentOp::fwd_centered(&a, *i)
                };
                v.insert(self.id(), Value::Scalar(val));
            }
        }
    }

    /// Pre-order backward sweep: narrows the operand slots from this node's
    /// enclosure, then recurses. Narrowing always meets the stored value,
    /// which keeps the pass contractive when a node is reached through
    /// several parents.
    pub(crate) fn bwd_eval(&self, v: &mut ValueMap) {
        macro_rules! bwd_un {
            ($op:ty, $x1:expr) => {{
                let y = v.scalar(self.id()).a;
                let mut a1 = v.scalar($x1.id()).a;
                <$op>::bwd(&y, &mut a1);
                v.scalar_mut($x1.id()).a &= a1;
                $x1.bwd_eval(v);
            }};
        }
        macro_rules! bwd_bin {
            ($op:ty, $x1:expr, $x2:expr) => {{
                let y = v.scalar(self.id()).a;
                let mut a1 = v.scalar($x1.id()).a;
                let mut a2 = v.scalar($x2.id()).a;
                <$op>::bwd(&y, &mut a1, &mut a2);
                v.scalar_mut($x1.id()).a &= a1;
                v.scalar_mut($x2.id()).a &= a2;
                $x1.bwd_eval(v);
                $x2.bwd_eval(v);
            }};
        }

        match &self.0.op {
            ScalarOp::Var { .. } | ScalarOp::Const(_) => {}
            ScalarOp::Add(x1, x2) => bwd_bin!(AddOp, x1, x2),
            ScalarOp::Sub(x1, x2) => bwd_bin!(SubOp, x1, x2),
            ScalarOp::Neg(x1) => bwd_un!(NegOp, x1),
            ScalarOp::Mul(x1, x2) => bwd_bin!(MulOp, x1, x2),
            ScalarOp::Div(x1, x2) => bwd_bin!(DivOp, x1, x2),
            ScalarOp::Pow(x1, x2) => bwd_bin!(PowOp, x1, x2),
            ScalarOp::Sqr(x1) => bwd_un!(SqrOp, x1),
            ScalarOp::Sqrt(x1) => bwd_un!(SqrtOp, x1),
            ScalarOp::Exp(x1) => bwd_un!(ExpOp, x1),
            ScalarOp::Log(x1) => bwd_un!(LogOp, x1),
            ScalarOp::Cos(x1) => bwd_un!(CosOp, x1),
            ScalarOp::Sin(x1) => bwd_un!(SinOp, x1),
            ScalarOp::Tan(x1) => bwd_un!(TanOp, x1),
            ScalarOp::Acos(x1) => bwd_un!(AcosOp, x1),
            ScalarOp::Asin(x1) => bwd_un!(AsinOp, x1),
            ScalarOp::Atan(x1) => bwd_un!(AtanOp, x1),
            ScalarOp::Atan2(x1, x2) => bwd_bin!(Atan2Op, x1, x2),
            ScalarOp::Cosh(x1) => bwd_un!(CoshOp, x1),
            ScalarOp::Sinh(x1) => bwd_un!(SinhOp, x1),
            ScalarOp::Tanh(x1) => bwd_un!(TanhOp, x1),
            ScalarOp::Abs(x1) => bwd_un!(AbsOp, x1),
            ScalarOp::Sign(x1) => bwd_un!(SignOp, x1),
            ScalarOp::Floor(x1) => bwd_un!(FloorOp, x1),
            ScalarOp::Ceil(x1) => bwd_un!(CeilOp, x1),
            ScalarOp::Min(x1, x2) => bwd_bin!(MinOp, x1, x2),
            ScalarOp::Max(x1, x2) => bwd_bin!(MaxOp, x1, x2),
            ScalarOp::Chi(x1, x2, x3) => {
                let y = v.scalar(self.id()).a;
                let mut a1 = v.scalar(x1.id()).a;
                let mut a2 = v.scalar(x2.id()).a;
                let mut a3 = v.scalar(x3.id()).a;
                ChiOp::bwd(&y, &mut a1, &mut a2, &mut a3);
                v.scalar_mut(x1.id()).a &= a1;
                v.scalar_mut(x2.id()).a &= a2;
                v.scalar_mut(x3.id()).a &= a3;
                x1.bwd_eval(v);
                x2.bwd_eval(v);
                x3.bwd_eval(v);
            }
            ScalarOp::Component(x1, i) => {
                let y = v.scalar(self.id()).a;
                let mut a1 = v.vector(x1.id()).a.clone();
                ComponentOp::bwd(&y, &mut a1, *i);
                crate::interval::meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                x1.bwd_eval(v);
            }
        }
    }

    /// First variable of this subtree that is not in `args`, if any.
    pub(crate) fn undeclared_var(&self, args: &ArgsList) -> Option<String> {
        match &self.0.op {
            ScalarOp::Var { name } => {
                if args.contains(self.id()) {
                    None
                } else {
                    Some(name.clone())
                }
            }
            ScalarOp::Const(_) => None,
            ScalarOp::Add(x1, x2)
            | ScalarOp::Sub(x1, x2)
            | ScalarOp::Mul(x1, x2)
            | ScalarOp::Div(x1, x2)
            | ScalarOp::Pow(x1, x2)
            | ScalarOp::Atan2(x1, x2)
            | ScalarOp::Min(x1, x2)
            | ScalarOp::Max(x1, x2) => x1.undeclared_var(args).or_else(|| x2.undeclared_var(args)),
            ScalarOp::Neg(x1)
            | ScalarOp::Sqr(x1)
            | ScalarOp::Sqrt(x1)
            | ScalarOp::Exp(x1)
            | ScalarOp::Log(x1)
            | ScalarOp::Cos(x1)
            | ScalarOp::Sin(x1)
            | ScalarOp::Tan(x1)
            | ScalarOp::Acos(x1)
            | ScalarOp::Asin(x1)
            | ScalarOp::Atan(x1)
            | ScalarOp::Cosh(x1)
            | ScalarOp::Sinh(x1)
            | ScalarOp::Tanh(x1)
            | ScalarOp::Abs(x1)
            | ScalarOp::Sign(x1)
            | ScalarOp::Floor(x1)
            | ScalarOp::Ceil(x1) => x1.undeclared_var(args),
            ScalarOp::Chi(x1, x2, x3) => x1
                .undeclared_var(args)
                .or_else(|| x2.undeclared_var(args))
                .or_else(|| x3.undeclared_var(args)),
            ScalarOp::Component(x1, _) => x1.undeclared_var(args),
        }
    }

    /// Structural copy with fresh ids on every non-variable node. Variable
    /// leaves keep their identity so they can still be bound or substituted;
    /// fresh ids everywhere else let two copies of the same body coexist in
    /// one graph without sharing value slots.
    pub(crate) fn copy_fresh(&self, memo: &mut CopyMemo) -> ScalarExpr {
        if let Some(c) = memo.scalars.get(&self.id()) {
            return c.clone();
        }
        let op = match &self.0.op {
            ScalarOp::Var { .. } => return self.clone(),
            ScalarOp::Const(c) => ScalarOp::Const(*c),
            ScalarOp::Add(x1, x2) => ScalarOp::Add(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Sub(x1, x2) => ScalarOp::Sub(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Neg(x1) => ScalarOp::Neg(x1.copy_fresh(memo)),
            ScalarOp::Mul(x1, x2) => ScalarOp::Mul(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Div(x1, x2) => ScalarOp::Div(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Pow(x1, x2) => ScalarOp::Pow(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Sqr(x1) => ScalarOp::Sqr(x1.copy_fresh(memo)),
            ScalarOp::Sqrt(x1) => ScalarOp::Sqrt(x1.copy_fresh(memo)),
            ScalarOp::Exp(x1) => ScalarOp::Exp(x1.copy_fresh(memo)),
            ScalarOp::Log(x1) => ScalarOp::Log(x1.copy_fresh(memo)),
            ScalarOp::Cos(x1) => ScalarOp::Cos(x1.copy_fresh(memo)),
            ScalarOp::Sin(x1) => ScalarOp::Sin(x1.copy_fresh(memo)),
            ScalarOp::Tan(x1) => ScalarOp::Tan(x1.copy_fresh(memo)),
            ScalarOp::Acos(x1) => ScalarOp::Acos(x1.copy_fresh(memo)),
            ScalarOp::Asin(x1) => ScalarOp::Asin(x1.copy_fresh(memo)),
            ScalarOp::Atan(x1) => ScalarOp::Atan(x1.copy_fresh(memo)),
            ScalarOp::Atan2(x1, x2) => ScalarOp::Atan2(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Cosh(x1) => ScalarOp::Cosh(x1.copy_fresh(memo)),
            ScalarOp::Sinh(x1) => ScalarOp::Sinh(x1.copy_fresh(memo)),
            ScalarOp::Tanh(x1) => ScalarOp::Tanh(x1.copy_fresh(memo)),
            ScalarOp::Abs(x1) => ScalarOp::Abs(x1.copy_fresh(memo)),
            ScalarOp::Sign(x1) => ScalarOp::Sign(x1.copy_fresh(memo)),
            ScalarOp::Floor(x1) => ScalarOp::Floor(x1.copy_fresh(memo)),
            ScalarOp::Ceil(x1) => ScalarOp::Ceil(x1.copy_fresh(memo)),
            ScalarOp::Min(x1, x2) => ScalarOp::Min(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Max(x1, x2) => ScalarOp::Max(x1.copy_fresh(memo), x2.copy_fresh(memo)),
            ScalarOp::Chi(x1, x2, x3) => ScalarOp::Chi(
                x1.copy_fresh(memo),
                x2.copy_fresh(memo),
                x3.copy_fresh(memo),
            ),
            ScalarOp::Component(x1, i) => ScalarOp::Component(x1.copy_fresh(memo), *i),
        };
        let copy = ScalarExpr::new(op);
        memo.scalars.insert(self.id(), copy.clone());
        copy
    }

    /// Persistent substitution of variable leaves. Untouched subtrees are
    /// shared with the original graph; rebuilt nodes take fresh ids.
    pub(crate) fn substitute(&self, subs: &mut Substitution) -> ScalarExpr {
        if let Some(s) = subs.memo_s.get(&self.id()) {
            return s.clone();
        }
        let out = match &self.0.op {
            ScalarOp::Var { .. } => match subs.scalars.get(&self.id()) {
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
            ScalarOp::Const(_) => self.clone(),
            ScalarOp::Add(x1, x2) => {
                rebuild2(self, x1, x2, subs, ScalarOp::Add)
            }
            ScalarOp::Sub(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Sub),
            ScalarOp::Neg(x1) => rebuild1(self, x1, subs, ScalarOp::Neg),
            ScalarOp::Mul(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Mul),
            ScalarOp::Div(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Div),
            ScalarOp::Pow(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Pow),
            ScalarOp::Sqr(x1) => rebuild1(self, x1, subs, ScalarOp::Sqr),
            ScalarOp::Sqrt(x1) => rebuild1(self, x1, subs, ScalarOp::Sqrt),
            ScalarOp::Exp(x1) => rebuild1(self, x1, subs, ScalarOp::Exp),
            ScalarOp::Log(x1) => rebuild1(self, x1, subs, ScalarOp::Log),
            ScalarOp::Cos(x1) => rebuild1(self, x1, subs, ScalarOp::Cos),
            ScalarOp::Sin(x1) => rebuild1(self, x1, subs, ScalarOp::Sin),
            ScalarOp::Tan(x1) => rebuild1(self, x1, subs, ScalarOp::Tan),
            ScalarOp::Acos(x1) => rebuild1(self, x1, subs, ScalarOp::Acos),
            ScalarOp::Asin(x1) => rebuild1(self, x1, subs, ScalarOp::Asin),
            ScalarOp::Atan(x1) => rebuild1(self, x1, subs, ScalarOp::Atan),
            ScalarOp::Atan2(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Atan2),
            ScalarOp::Cosh(x1) => rebuild1(self, x1, subs, ScalarOp::Cosh),
            ScalarOp::Sinh(x1) => rebuild1(self, x1, subs, ScalarOp::Sinh),
            ScalarOp::Tanh(x1) => rebuild1(self, x1, subs, ScalarOp::Tanh),
            ScalarOp::Abs(x1) => rebuild1(self, x1, subs, ScalarOp::Abs),
            ScalarOp::Sign(x1) => rebuild1(self, x1, subs, ScalarOp::Sign),
            ScalarOp::Floor(x1) => rebuild1(self, x1, subs, ScalarOp::Floor),
            ScalarOp::Ceil(x1) => rebuild1(self, x1, subs, ScalarOp::Ceil),
            ScalarOp::Min(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Min),
            ScalarOp::Max(x1, x2) => rebuild2(self, x1, x2, subs, ScalarOp::Max),
            ScalarOp::Chi(x1, x2, x3) => {
                let s1 = x1.substitute(subs);
                let s2 = x2.substitute(subs);
                let s3 = x3.substitute(subs);
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) && Rc::ptr_eq(&s3.0, &x3.0) {
                    self.clone()
                } else {
                    ScalarExpr::new(ScalarOp::Chi(s1, s2, s3))
                }
            }
            ScalarOp::Component(x1, i) => {
                let s1 = x1.substitute(subs);
                if Rc::ptr_eq(&s1.0, &x1.0) {
                    self.clone()
                } else {
                    ScalarExpr::new(ScalarOp::Component(s1, *i))
                }
            }
        };
        subs.memo_s.insert(self.id(), out.clone());
        out
    }
}

fn rebuild1(
    orig: &ScalarExpr,
    x1: &ScalarExpr,
    subs: &mut Substitution,
    make: fn(ScalarExpr) -> ScalarOp,
) -> ScalarExpr {
    let s1 = x1.substitute(subs);
    if Rc::ptr_eq(&s1.0, &x1.0) {
        orig.clone()
    } else {
        ScalarExpr::new(make(s1))
    }
}

fn rebuild2(
    orig: &ScalarExpr,
    x1: &ScalarExpr,
    x2: &ScalarExpr,
    subs: &mut Substitution,
    make: fn(ScalarExpr, ScalarExpr) -> ScalarOp,
) -> ScalarExpr {
    let s1 = x1.substitute(subs);
    let s2 = x2.substitute(subs);
    if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
        orig.clone()
    } else {
        ScalarExpr::new(make(s1, s2))
    }
}

impl VectorExpr {
    pub(crate) fn new(op: VectorOpNode) -> Self {
        VectorExpr(Rc::new(VectorNode {
            id: ExprId::fresh(),
            op,
        }))
    }

    pub(crate) fn id(&self) -> ExprId {
        self.0.id
    }

    /// Number of components, derived statically from the graph.
    pub fn size(&self) -> usize {
        match &self.0.op {
            VectorOpNode::Var { size, .. } => *size,
            VectorOpNode::Const(c) => c.len(),
            VectorOpNode::Add(x1, _) | VectorOpNode::Sub(x1, _) => x1.size(),
            VectorOpNode::Neg(x1) => x1.size(),
            VectorOpNode::MulSv(_, x2) => x2.size(),
            VectorOpNode::MulMv(x1, _) => x1.shape().0,
            VectorOpNode::DivVs(x1, _) => x1.size(),
            VectorOpNode::Vec(xs) => xs.len(),
            VectorOpNode::Subvector(_, i, j) => j - i + 1,
        }
    }

    pub(crate) fn fwd_eval(&self, v: &mut ValueMap, total: usize, natural: bool) {
        match &self.0.op {
            VectorOpNode::Var { .. } => {
                assert!(
                    v.contains(self.id()),
                    "vector variable was not bound before evaluation"
                );
            }
            VectorOpNode::Const(c) => {
                let val = if natural {
                    VectorValue::natural(c.clone(), true)
                } else {
                    VectorValue::centered(
                        c.clone(),
                        c.clone(),
                        IntervalMatrix::zeros(c.len(), total),
                        true,
                    )
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::Add(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let b = v.vector(x2.id()).clone();
                let val = if natural {
                    AddOp::fwd_natural_vec(&a, &b)
                } else {
                    AddOp::fwd_centered_vec(&a, &b)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::Sub(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let b = v.vector(x2.id()).clone();
                let val = if natural {
                    SubOp::fwd_natural_vec(&a, &b)
                } else {
                    SubOp::fwd_centered_vec(&a, &b)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::Neg(x1) => {
                x1.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let val = if natural {
                    NegOp::fwd_natural_vec(&a)
                } else {
                    NegOp::fwd_centered_vec(&a)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::MulSv(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.scalar(x1.id()).clone();
                let b = v.vector(x2.id()).clone();
                let val = if natural {
                    MulOp::fwd_natural_sv(&a, &b)
                } else {
                    MulOp::fwd_centered_sv(&a, &b)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::MulMv(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.matrix(x1.id()).clone();
                let b = v.vector(x2.id()).clone();
                let val = if natural {
                    MulOp::fwd_natural_mv(&a, &b)
                } else {
                    MulOp::fwd_centered_mv(&a, &b)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::DivVs(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let b = v.scalar(x2.id()).clone();
                let val = if natural {
                    DivOp::fwd_natural_vs(&a, &b)
                } else {
                    DivOp::fwd_centered_vs(&a, &b)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::Vec(xs) => {
                for x in xs {
                    x.fwd_eval(v, total, natural);
                }
                let vals: std::vec::Vec<ScalarValue> =
                    xs.iter().map(|x| v.scalar(x.id()).clone()).collect();
                let val = if natural {
                    VectorOp::fwd_natural(&vals)
                } else {
                    VectorOp::fwd_centered(&vals)
                };
                v.insert(self.id(), Value::Vector(val));
            }
            VectorOpNode::Subvector(x1, i, j) => {
                x1.fwd_eval(v, total, natural);
                let a = v.vector(x1.id()).clone();
                let val = if natural {
                    SubvectorOp::fwd_natural(&a, *i, *j)
                } else {
                    SubvectorOp::fwd_centered(&a, *i, *j)
                };
                v.insert(self.id(), Value::Vector(val));
            }
        }
    }

    pub(crate) fn bwd_eval(&self, v: &mut ValueMap) {
        use crate::interval::{meet_matrix, meet_vector};
        match &self.0.op {
            VectorOpNode::Var { .. } | VectorOpNode::Const(_) => {}
            VectorOpNode::Add(x1, x2) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.vector(x1.id()).a.clone();
                let mut a2 = v.vector(x2.id()).a.clone();
                AddOp::bwd_vec(&y, &mut a1, &mut a2);
                meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                meet_vector(&mut v.vector_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            VectorOpNode::Sub(x1, x2) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.vector(x1.id()).a.clone();
                let mut a2 = v.vector(x2.id()).a.clone();
                SubOp::bwd_vec(&y, &mut a1, &mut a2);
                meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                meet_vector(&mut v.vector_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            VectorOpNode::Neg(x1) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.vector(x1.id()).a.clone();
                NegOp::bwd_vec(&y, &mut a1);
                meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                x1.bwd_eval(v);
            }
            VectorOpNode::MulSv(x1, x2) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.scalar(x1.id()).a;
                let mut a2 = v.vector(x2.id()).a.clone();
                MulOp::bwd_sv(&y, &mut a1, &mut a2);
                v.scalar_mut(x1.id()).a &= a1;
                meet_vector(&mut v.vector_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            VectorOpNode::MulMv(x1, x2) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.matrix(x1.id()).a.clone();
                let mut a2 = v.vector(x2.id()).a.clone();
                MulOp::bwd_mv(&y, &mut a1, &mut a2);
                meet_matrix(&mut v.matrix_mut(x1.id()).a, &a1);
                meet_vector(&mut v.vector_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            VectorOpNode::DivVs(x1, x2) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.vector(x1.id()).a.clone();
                let mut a2 = v.scalar(x2.id()).a;
                DivOp::bwd_vs(&y, &mut a1, &mut a2);
                meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                v.scalar_mut(x2.id()).a &= a2;
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            VectorOpNode::Vec(xs) => {
                let y = v.vector(self.id()).a.clone();
                let mut comps: std::vec::Vec<Interval> =
                    xs.iter().map(|x| v.scalar(x.id()).a).collect();
                VectorOp::bwd(&y, &mut comps);
                for (x, c) in xs.iter().zip(comps.iter()) {
                    v.scalar_mut(x.id()).a &= *c;
                }
                for x in xs {
                    x.bwd_eval(v);
                }
            }
            VectorOpNode::Subvector(x1, i, j) => {
                let y = v.vector(self.id()).a.clone();
                let mut a1 = v.vector(x1.id()).a.clone();
                SubvectorOp::bwd(&y, &mut a1, *i, *j);
                meet_vector(&mut v.vector_mut(x1.id()).a, &a1);
                x1.bwd_eval(v);
            }
        }
    }

    pub(crate) fn undeclared_var(&self, args: &ArgsList) -> Option<String> {
        match &self.0.op {
            VectorOpNode::Var { name, .. } => {
                if args.contains(self.id()) {
                    None
                } else {
                    Some(name.clone())
                }
            }
            VectorOpNode::Const(_) => None,
            VectorOpNode::Add(x1, x2) | VectorOpNode::Sub(x1, x2) => {
                x1.undeclared_var(args).or_else(|| x2.undeclared_var(args))
            }
            VectorOpNode::Neg(x1) => x1.undeclared_var(args),
            VectorOpNode::MulSv(x1, x2) => {
                x1.undeclared_var(args).or_else(|| x2.undeclared_var(args))
            }
            VectorOpNode::MulMv(x1, x2) => {
                x1.undeclared_var(args).or_else(|| x2.undeclared_var(args))
            }
            VectorOpNode::DivVs(x1, x2) => {
                x1.undeclared_var(args).or_else(|| x2.undeclared_var(args))
            }
            VectorOpNode::Vec(xs) => xs.iter().find_map(|x| x.undeclared_var(args)),
            VectorOpNode::Subvector(x1, _, _) => x1.undeclared_var(args),
        }
    }

    pub(crate) fn copy_fresh(&self, memo: &mut CopyMemo) -> VectorExpr {
        if let Some(c) = memo.vectors.get(&self.id()) {
            return c.clone();
        }
        let op = match &self.0.op {
            VectorOpNode::Var { .. } => return self.clone(),
            VectorOpNode::Const(c) => VectorOpNode::Const(c.clone()),
            VectorOpNode::Add(x1, x2) => {
                VectorOpNode::Add(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            VectorOpNode::Sub(x1, x2) => {
                VectorOpNode::Sub(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            VectorOpNode::Neg(x1) => VectorOpNode::Neg(x1.copy_fresh(memo)),
            VectorOpNode::MulSv(x1, x2) => {
                VectorOpNode::MulSv(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            VectorOpNode::MulMv(x1, x2) => {
                VectorOpNode::MulMv(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            VectorOpNode::DivVs(x1, x2) => {
                VectorOpNode::DivVs(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            VectorOpNode::Vec(xs) => {
                VectorOpNode::Vec(xs.iter().map(|x| x.copy_fresh(memo)).collect())
            }
            VectorOpNode::Subvector(x1, i, j) => {
                VectorOpNode::Subvector(x1.copy_fresh(memo), *i, *j)
            }
        };
        let copy = VectorExpr::new(op);
        memo.vectors.insert(self.id(), copy.clone());
        copy
    }

    pub(crate) fn substitute(&self, subs: &mut Substitution) -> VectorExpr {
        if let Some(s) = subs.memo_v.get(&self.id()) {
            return s.clone();
        }
        let out = match &self.0.op {
            VectorOpNode::Var { .. } => match subs.vectors.get(&self.id()) {
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
            VectorOpNode::Const(_) => self.clone(),
            VectorOpNode::Add(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::Add(s1, s2))
                }
            }
            VectorOpNode::Sub(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::Sub(s1, s2))
                }
            }
            VectorOpNode::Neg(x1) => {
                let s1 = x1.substitute(subs);
                if Rc::ptr_eq(&s1.0, &x1.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::Neg(s1))
                }
            }
            VectorOpNode::MulSv(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::MulSv(s1, s2))
                }
            }
            VectorOpNode::MulMv(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::MulMv(s1, s2))
                }
            }
            VectorOpNode::DivVs(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::DivVs(s1, s2))
                }
            }
            VectorOpNode::Vec(xs) => {
                let ss: std::vec::Vec<ScalarExpr> = xs.iter().map(|x| x.substitute(subs)).collect();
                if ss.iter().zip(xs.iter()).all(|(s, x)| Rc::ptr_eq(&s.0, &x.0)) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::Vec(ss))
                }
            }
            VectorOpNode::Subvector(x1, i, j) => {
                let s1 = x1.substitute(subs);
                if Rc::ptr_eq(&s1.0, &x1.0) {
                    self.clone()
                } else {
                    VectorExpr::new(VectorOpNode::Subvector(s1, *i, *j))
                }
            }
        };
        subs.memo_v.insert(self.id(), out.clone());
        out
    }
}

impl MatrixExpr {
    pub(crate) fn new(op: MatrixOpNode) -> Self {
        MatrixExpr(Rc::new(MatrixNode {
            id: ExprId::fresh(),
            op,
        }))
    }

    pub(crate) fn id(&self) -> ExprId {
        self.0.id
    }

    pub fn shape(&self) -> (usize, usize) {
        match &self.0.op {
            MatrixOpNode::Const(c) => c.shape(),
            MatrixOpNode::Add(x1, _) | MatrixOpNode::Sub(x1, _) => x1.shape(),
            MatrixOpNode::Neg(x1) => x1.shape(),
        }
    }

    pub(crate) fn fwd_eval(&self, v: &mut ValueMap, total: usize, natural: bool) {
        match &self.0.op {
            MatrixOpNode::Const(c) => {
                let val = if natural {
                    MatrixValue::natural(c.clone(), true)
                } else {
                    MatrixValue::centered(c.clone(), c.clone(), true)
                };
                v.insert(self.id(), Value::Matrix(val));
            }
            MatrixOpNode::Add(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.matrix(x1.id()).clone();
                let b = v.matrix(x2.id()).clone();
                let val = if natural {
                    AddOp::fwd_natural_mat(&a, &b)
                } else {
                    AddOp::fwd_centered_mat(&a, &b)
                };
                v.insert(self.id(), Value::Matrix(val));
            }
            MatrixOpNode::Sub(x1, x2) => {
                x1.fwd_eval(v, total, natural);
                x2.fwd_eval(v, total, natural);
                let a = v.matrix(x1.id()).clone();
                let b = v.matrix(x2.id()).clone();
                let val = if natural {
                    SubOp::fwd_natural_mat(&a, &b)
                } else {
                    SubOp::fwd_centered_mat(&a, &b)
                };
                v.insert(self.id(), Value::Matrix(val));
            }
            MatrixOpNode::Neg(x1) => {
                x1.fwd_eval(v, total, natural);
                let a = v.matrix(x1.id()).clone();
                let val = if natural {
                    NegOp::fwd_natural_mat(&a)
                } else {
                    NegOp::fwd_centered_mat(&a)
                };
                v.insert(self.id(), Value::Matrix(val));
            }
        }
    }

    pub(crate) fn bwd_eval(&self, v: &mut ValueMap) {
        use crate::interval::meet_matrix;
        match &self.0.op {
            MatrixOpNode::Const(_) => {}
            MatrixOpNode::Add(x1, x2) => {
                let y = v.matrix(self.id()).a.clone();
                let mut a1 = v.matrix(x1.id()).a.clone();
                let mut a2 = v.matrix(x2.id()).a.clone();
                AddOp::bwd_mat(&y, &mut a1, &mut a2);
                meet_matrix(&mut v.matrix_mut(x1.id()).a, &a1);
                meet_matrix(&mut v.matrix_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            MatrixOpNode::Sub(x1, x2) => {
                let y = v.matrix(self.id()).a.clone();
                let mut a1 = v.matrix(x1.id()).a.clone();
                let mut a2 = v.matrix(x2.id()).a.clone();
                SubOp::bwd_mat(&y, &mut a1, &mut a2);
                meet_matrix(&mut v.matrix_mut(x1.id()).a, &a1);
                meet_matrix(&mut v.matrix_mut(x2.id()).a, &a2);
                x1.bwd_eval(v);
                x2.bwd_eval(v);
            }
            MatrixOpNode::Neg(x1) => {
                let y = v.matrix(self.id()).a.clone();
                let mut a1 = v.matrix(x1.id()).a.clone();
                NegOp::bwd_mat(&y, &mut a1);
                meet_matrix(&mut v.matrix_mut(x1.id()).a, &a1);
                x1.bwd_eval(v);
            }
        }
    }

    pub(crate) fn undeclared_var(&self, args: &ArgsList) -> Option<String> {
        match &self.0.op {
            MatrixOpNode::Const(_) => None,
            MatrixOpNode::Add(x1, x2) | MatrixOpNode::Sub(x1, x2) => {
                x1.undeclared_var(args).or_else(|| x2.undeclared_var(args))
            }
            MatrixOpNode::Neg(x1) => x1.undeclared_var(args),
        }
    }

    pub(crate) fn copy_fresh(&self, memo: &mut CopyMemo) -> MatrixExpr {
        if let Some(c) = memo.matrices.get(&self.id()) {
            return c.clone();
        }
        let op = match &self.0.op {
            MatrixOpNode::Const(c) => MatrixOpNode::Const(c.clone()),
            MatrixOpNode::Add(x1, x2) => {
                MatrixOpNode::Add(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            MatrixOpNode::Sub(x1, x2) => {
                MatrixOpNode::Sub(x1.copy_fresh(memo), x2.copy_fresh(memo))
            }
            MatrixOpNode::Neg(x1) => MatrixOpNode::Neg(x1.copy_fresh(memo)),
        };
        let copy = MatrixExpr::new(op);
        memo.matrices.insert(self.id(), copy.clone());
        copy
    }

    pub(crate) fn substitute(&self, subs: &mut Substitution) -> MatrixExpr {
        if let Some(s) = subs.memo_m.get(&self.id()) {
            return s.clone();
        }
        let out = match &self.0.op {
            MatrixOpNode::Const(_) => self.clone(),
            MatrixOpNode::Add(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    MatrixExpr::new(MatrixOpNode::Add(s1, s2))
                }
            }
            MatrixOpNode::Sub(x1, x2) => {
                let (s1, s2) = (x1.substitute(subs), x2.substitute(subs));
                if Rc::ptr_eq(&s1.0, &x1.0) && Rc::ptr_eq(&s2.0, &x2.0) {
                    self.clone()
                } else {
                    MatrixExpr::new(MatrixOpNode::Sub(s1, s2))
                }
            }
            MatrixOpNode::Neg(x1) => {
                let s1 = x1.substitute(subs);
                if Rc::ptr_eq(&s1.0, &x1.0) {
                    self.clone()
                } else {
                    MatrixExpr::new(MatrixOpNode::Neg(s1))
                }
            }
        };
        subs.memo_m.insert(self.id(), out.clone());
        out
    }
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.op {
            ScalarOp::Var { name } => write!(f, "{name}"),
            ScalarOp::Const(c) => {
                if c.is_degenerated() {
                    write!(f, "{}", c.lb())
                } else {
                    write!(f, "{c}")
                }
            }
            ScalarOp::Add(x1, x2) => write!(f, "({x1}+{x2})"),
            ScalarOp::Sub(x1, x2) => write!(f, "({x1}-{x2})"),
            ScalarOp::Neg(x1) => write!(f, "(-{x1})"),
            ScalarOp::Mul(x1, x2) => write!(f, "({x1}*{x2})"),
            ScalarOp::Div(x1, x2) => write!(f, "({x1}/{x2})"),
            ScalarOp::Pow(x1, x2) => write!(f, "({x1}^{x2})"),
            ScalarOp::Sqr(x1) => write!(f, "({x1})^2"),
            ScalarOp::Sqrt(x1) => write!(f, "sqrt({x1})"),
            ScalarOp::Exp(x1) => write!(f, "exp({x1})"),
            ScalarOp::Log(x1) => write!(f, "log({x1})"),
            ScalarOp::Cos(x1) => write!(f, "cos({x1})"),
            ScalarOp::Sin(x1) => write!(f, "sin({x1})"),
            ScalarOp::Tan(x1) => write!(f, "tan({x1})"),
            ScalarOp::Acos(x1) => write!(f, "acos({x1})"),
            ScalarOp::Asin(x1) => write!(f, "asin({x1})"),
            ScalarOp::Atan(x1) => write!(f, "atan({x1})"),
            ScalarOp::Atan2(x1, x2) => write!(f, "atan2({x1},{x2})"),
            ScalarOp::Cosh(x1) => write!(f, "cosh({x1})"),
            ScalarOp::Sinh(x1) => write!(f, "sinh({x1})"),
            ScalarOp::Tanh(x1) => write!(f, "tanh({x1})"),
            ScalarOp::Abs(x1) => write!(f, "|{x1}|"),
            ScalarOp::Sign(x1) => write!(f, "sign({x1})"),
            ScalarOp::Floor(x1) => write!(f, "floor({x1})"),
            ScalarOp::Ceil(x1) => write!(f, "ceil({x1})"),
            ScalarOp::Min(x1, x2) => write!(f, "min({x1},{x2})"),
            ScalarOp::Max(x1, x2) => write!(f, "max({x1},{x2})"),
            ScalarOp::Chi(x1, x2, x3) => write!(f, "chi({x1},{x2},{x3})"),
            ScalarOp::Component(x1, i) => write!(f, "{x1}[{i}]"),
        }
    }
}

impl fmt::Display for VectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.op {
            VectorOpNode::Var { name, .. } => write!(f, "{name}"),
            VectorOpNode::Const(c) => {
                write!(f, "(")?;
                for (i, x) in c.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, ")")
            }
            VectorOpNode::Add(x1, x2) => write!(f, "({x1}+{x2})"),
            VectorOpNode::Sub(x1, x2) => write!(f, "({x1}-{x2})"),
            VectorOpNode::Neg(x1) => write!(f, "(-{x1})"),
            VectorOpNode::MulSv(x1, x2) => write!(f, "({x1}*{x2})"),
            VectorOpNode::MulMv(x1, x2) => write!(f, "({x1}*{x2})"),
            VectorOpNode::DivVs(x1, x2) => write!(f, "({x1}/{x2})"),
            VectorOpNode::Vec(xs) => {
                write!(f, "(")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, ")")
            }
            VectorOpNode::Subvector(x1, i, j) => write!(f, "{x1}[{i}..={j}]"),
        }
    }
}

impl fmt::Display for MatrixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.op {
            MatrixOpNode::Const(c) => write!(f, "<{}x{} matrix>", c.nrows(), c.ncols()),
            MatrixOpNode::Add(x1, x2) => write!(f, "({x1}+{x2})"),
            MatrixOpNode::Sub(x1, x2) => write!(f, "({x1}-{x2})"),
            MatrixOpNode::Neg(x1) => write!(f, "(-{x1})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ArgKind, ArgValue, VarDecl};

    fn scalar_var(name: &str) -> (ScalarExpr, VarDecl) {
        let e = ScalarExpr::new(ScalarOp::Var { name: name.into() });
        let d = VarDecl {
            id: e.id(),
            name: name.into(),
            kind: ArgKind::Scalar,
        };
        (e, d)
    }

    #[test]
    fn test_forward_natural_add_mul() {
        let (x, dx) = scalar_var("x");
        let (y, dy) = scalar_var("y");
        let e = ScalarExpr::new(ScalarOp::Mul(
            ScalarExpr::new(ScalarOp::Add(x.clone(), y.clone())),
            x.clone(),
        ));
        let args = ArgsList::new(vec![dx, dy]);
        let mut v = ValueMap::new();
        args.seed(
            &[
                ArgValue::Scalar(Interval::new(1.0, 2.0)),
                ArgValue::Scalar(Interval::new(3.0, 4.0)),
            ],
            &mut v,
        )
        .unwrap();
        e.fwd_eval(&mut v, args.total_size(), true);
        let out = v.scalar(e.id()).a;
        // (x+y)*x over [1,2],[3,4] = [4,6]*[1,2] = [4,12]
        assert_eq!(out, Interval::new(4.0, 12.0));
    }

    #[test]
    fn test_shared_node_slot_meets_both_parents() {
        // y = s + s with s shared: one pass narrows s (and x) to [-8,10],
        // the meet of what each side of the addition allows
        let (x, dx) = scalar_var("x");
        let s = ScalarExpr::new(ScalarOp::Add(
            x.clone(),
            ScalarExpr::new(ScalarOp::Const(Interval::point(0.0))),
        ));
        let e = ScalarExpr::new(ScalarOp::Add(s.clone(), s.clone()));
        let args = ArgsList::new(vec![dx]);
        let mut v = ValueMap::new();
        args.seed(&[ArgValue::Scalar(Interval::new(-10.0, 10.0))], &mut v)
            .unwrap();
        e.fwd_eval(&mut v, 1, true);
        v.scalar_mut(e.id()).a &= Interval::point(2.0);
        e.bwd_eval(&mut v);
        let sx = v.scalar(x.id()).a;
        assert!(sx.contains(1.0));
        assert_eq!(sx, Interval::new(-8.0, 10.0));
    }

    #[test]
    fn test_copy_fresh_keeps_variable_identity() {
        let (x, _) = scalar_var("x");
        let e = ScalarExpr::new(ScalarOp::Sqr(x.clone()));
        let mut memo = CopyMemo::default();
        let c = e.copy_fresh(&mut memo);
        assert_ne!(c.id(), e.id());
        match (&c.0.op, &e.0.op) {
            (ScalarOp::Sqr(cx), ScalarOp::Sqr(ex)) => assert_eq!(cx.id(), ex.id()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_copy_fresh_preserves_sharing() {
        let (x, _) = scalar_var("x");
        let s = ScalarExpr::new(ScalarOp::Sqr(x.clone()));
        let e = ScalarExpr::new(ScalarOp::Add(s.clone(), s.clone()));
        let mut memo = CopyMemo::default();
        let c = e.copy_fresh(&mut memo);
        match &c.0.op {
            ScalarOp::Add(a, b) => assert!(Rc::ptr_eq(&a.0, &b.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_substitute_replaces_variable() {
        let (x, _) = scalar_var("x");
        let e = ScalarExpr::new(ScalarOp::Sqr(x.clone()));
        let replacement = ScalarExpr::new(ScalarOp::Const(Interval::point(3.0)));
        let mut subs = Substitution::default();
        subs.scalars.insert(x.id(), replacement);
        let s = e.substitute(&mut subs);
        let mut v = ValueMap::new();
        s.fwd_eval(&mut v, 0, true);
        assert_eq!(v.scalar(s.id()).a, Interval::point(9.0));
    }

    #[test]
    fn test_display() {
        let (x, _) = scalar_var("x");
        let e = ScalarExpr::new(ScalarOp::Sqrt(ScalarExpr::new(ScalarOp::Add(
            x.clone(),
            ScalarExpr::new(ScalarOp::Const(Interval::point(1.0))),
        ))));
        assert_eq!(format!("{e}"), "sqrt((x+1))");
    }
}
