// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Expression authoring
//!
//! Declared variables, conversions from plain numbers and interval values
//! into constant nodes, the arithmetic operator overloads, and the free
//! functions (`sqrt`, `sin`, `vec`, ...) used to assemble graphs.

use std::ops;

use super::args::{ArgKind, VarDecl};
use super::node::{MatrixExpr, MatrixOpNode, ScalarExpr, ScalarOp, VectorExpr, VectorOpNode};
use crate::interval::{Interval, IntervalMatrix, IntervalVector};

/// A declared scalar argument. Holds the unique variable leaf that both the
/// function body and the argument list refer to.
#[derive(Debug, Clone)]
pub struct ScalarVar {
    expr: ScalarExpr,
    name: String,
}

impl ScalarVar {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let expr = ScalarExpr::new(ScalarOp::Var { name: name.clone() });
        ScalarVar { expr, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> ScalarExpr {
        self.expr.clone()
    }

    pub fn decl(&self) -> VarDecl {
        VarDecl {
            id: self.expr.id(),
            name: self.name.clone(),
            kind: ArgKind::Scalar,
        }
    }
}

/// A declared vector argument of fixed size.
#[derive(Debug, Clone)]
pub struct VectorVar {
    expr: VectorExpr,
    name: String,
    size: usize,
}

impl VectorVar {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        let name = name.into();
        let expr = VectorExpr::new(VectorOpNode::Var {
            name: name.clone(),
            size,
        });
        VectorVar { expr, name, size }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn expr(&self) -> VectorExpr {
        self.expr.clone()
    }

    /// i-th component as a scalar expression.
    pub fn elem(&self, i: usize) -> ScalarExpr {
        self.expr.elem(i)
    }

    pub fn subvector(&self, i: usize, j: usize) -> VectorExpr {
        self.expr.subvector(i, j)
    }

    pub fn decl(&self) -> VarDecl {
        VarDecl {
            id: self.expr.id(),
            name: self.name.clone(),
            kind: ArgKind::Vector(self.size),
        }
    }
}

impl VectorExpr {
    pub fn elem(&self, i: usize) -> ScalarExpr {
        assert!(i < self.size(), "component index out of range");
        ScalarExpr::new(ScalarOp::Component(self.clone(), i))
    }

    /// Components `i..=j`, bounds included.
    pub fn subvector(&self, i: usize, j: usize) -> VectorExpr {
        assert!(i <= j && j < self.size(), "subvector range out of range");
        VectorExpr::new(VectorOpNode::Subvector(self.clone(), i, j))
    }
}

// constants

impl From<f64> for ScalarExpr {
    fn from(x: f64) -> Self {
        ScalarExpr::new(ScalarOp::Const(Interval::point(x)))
    }
}

impl From<i32> for ScalarExpr {
    fn from(x: i32) -> Self {
        ScalarExpr::new(ScalarOp::Const(Interval::point(x as f64)))
    }
}

impl From<Interval> for ScalarExpr {
    fn from(x: Interval) -> Self {
        ScalarExpr::new(ScalarOp::Const(x))
    }
}

impl From<&ScalarExpr> for ScalarExpr {
    fn from(x: &ScalarExpr) -> Self {
        x.clone()
    }
}

impl From<&ScalarVar> for ScalarExpr {
    fn from(x: &ScalarVar) -> Self {
        x.expr()
    }
}

impl From<IntervalVector> for VectorExpr {
    fn from(x: IntervalVector) -> Self {
        VectorExpr::new(VectorOpNode::Const(x))
    }
}

impl From<&VectorExpr> for VectorExpr {
    fn from(x: &VectorExpr) -> Self {
        x.clone()
    }
}

impl From<&VectorVar> for VectorExpr {
    fn from(x: &VectorVar) -> Self {
        x.expr()
    }
}

impl From<IntervalMatrix> for MatrixExpr {
    fn from(x: IntervalMatrix) -> Self {
        MatrixExpr::new(MatrixOpNode::Const(x))
    }
}

impl From<&MatrixExpr> for MatrixExpr {
    fn from(x: &MatrixExpr) -> Self {
        x.clone()
    }
}

// scalar operators, enumerated over the operand types users actually mix

macro_rules! sbin {
    ($trait:ident, $method:ident, $variant:ident, $lhs:ty, $rhs:ty) => {
        impl ops::$trait<$rhs> for $lhs {
            type Output = ScalarExpr;
            fn $method(self, rhs: $rhs) -> ScalarExpr {
                ScalarExpr::new(ScalarOp::$variant(
                    ScalarExpr::from(self),
                    ScalarExpr::from(rhs),
                ))
            }
        }
    };
}

macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $variant:ident) => {
        sbin!($trait, $method, $variant, ScalarExpr, ScalarExpr);
        sbin!($trait, $method, $variant, ScalarExpr, &ScalarExpr);
        sbin!($trait, $method, $variant, ScalarExpr, &ScalarVar);
        sbin!($trait, $method, $variant, ScalarExpr, f64);
        sbin!($trait, $method, $variant, &ScalarExpr, ScalarExpr);
        sbin!($trait, $method, $variant, &ScalarExpr, &ScalarExpr);
        sbin!($trait, $method, $variant, &ScalarExpr, &ScalarVar);
        sbin!($trait, $method, $variant, &ScalarExpr, f64);
        sbin!($trait, $method, $variant, &ScalarVar, ScalarExpr);
        sbin!($trait, $method, $variant, &ScalarVar, &ScalarExpr);
        sbin!($trait, $method, $variant, &ScalarVar, &ScalarVar);
        sbin!($trait, $method, $variant, &ScalarVar, f64);
        sbin!($trait, $method, $variant, f64, ScalarExpr);
        sbin!($trait, $method, $variant, f64, &ScalarExpr);
        sbin!($trait, $method, $variant, f64, &ScalarVar);
    };
}

scalar_binop!(Add, add, Add);
scalar_binop!(Sub, sub, Sub);
scalar_binop!(Mul, mul, Mul);
scalar_binop!(Div, div, Div);

impl ops::Neg for ScalarExpr {
    type Output = ScalarExpr;
    fn neg(self) -> ScalarExpr {
        ScalarExpr::new(ScalarOp::Neg(self))
    }
}

impl ops::Neg for &ScalarExpr {
    type Output = ScalarExpr;
    fn neg(self) -> ScalarExpr {
        ScalarExpr::new(ScalarOp::Neg(self.clone()))
    }
}

impl ops::Neg for &ScalarVar {
    type Output = ScalarExpr;
    fn neg(self) -> ScalarExpr {
        ScalarExpr::new(ScalarOp::Neg(self.expr()))
    }
}

// vector operators

macro_rules! vbin {
    ($trait:ident, $method:ident, $variant:ident, $lhs:ty, $rhs:ty) => {
        impl ops::$trait<$rhs> for $lhs {
            type Output = VectorExpr;
            fn $method(self, rhs: $rhs) -> VectorExpr {
                VectorExpr::new(VectorOpNode::$variant(
                    VectorExpr::from(self),
                    VectorExpr::from(rhs),
                ))
            }
        }
    };
}

macro_rules! vector_addsub {
    ($trait:ident, $method:ident, $variant:ident) => {
        vbin!($trait, $method, $variant, VectorExpr, VectorExpr);
        vbin!($trait, $method, $variant, VectorExpr, &VectorExpr);
        vbin!($trait, $method, $variant, VectorExpr, &VectorVar);
        vbin!($trait, $method, $variant, &VectorExpr, VectorExpr);
        vbin!($trait, $method, $variant, &VectorExpr, &VectorExpr);
        vbin!($trait, $method, $variant, &VectorExpr, &VectorVar);
        vbin!($trait, $method, $variant, &VectorVar, VectorExpr);
        vbin!($trait, $method, $variant, &VectorVar, &VectorExpr);
        vbin!($trait, $method, $variant, &VectorVar, &VectorVar);
    };
}

vector_addsub!(Add, add, Add);
vector_addsub!(Sub, sub, Sub);

impl ops::Neg for VectorExpr {
    type Output = VectorExpr;
    fn neg(self) -> VectorExpr {
        VectorExpr::new(VectorOpNode::Neg(self))
    }
}

impl ops::Neg for &VectorExpr {
    type Output = VectorExpr;
    fn neg(self) -> VectorExpr {
        VectorExpr::new(VectorOpNode::Neg(self.clone()))
    }
}

impl ops::Neg for &VectorVar {
    type Output = VectorExpr;
    fn neg(self) -> VectorExpr {
        VectorExpr::new(VectorOpNode::Neg(self.expr()))
    }
}

macro_rules! mul_sv {
    ($lhs:ty, $rhs:ty) => {
        impl ops::Mul<$rhs> for $lhs {
            type Output = VectorExpr;
            fn mul(self, rhs: $rhs) -> VectorExpr {
                VectorExpr::new(VectorOpNode::MulSv(
                    ScalarExpr::from(self),
                    VectorExpr::from(rhs),
                ))
            }
        }
    };
}

mul_sv!(ScalarExpr, VectorExpr);
mul_sv!(ScalarExpr, &VectorExpr);
mul_sv!(ScalarExpr, &VectorVar);
mul_sv!(&ScalarExpr, VectorExpr);
mul_sv!(&ScalarExpr, &VectorExpr);
mul_sv!(&ScalarExpr, &VectorVar);
mul_sv!(&ScalarVar, VectorExpr);
mul_sv!(&ScalarVar, &VectorExpr);
mul_sv!(&ScalarVar, &VectorVar);
mul_sv!(f64, VectorExpr);
mul_sv!(f64, &VectorExpr);
mul_sv!(f64, &VectorVar);

macro_rules! mul_vs {
    ($lhs:ty, $rhs:ty) => {
        impl ops::Mul<$rhs> for $lhs {
            type Output = VectorExpr;
            fn mul(self, rhs: $rhs) -> VectorExpr {
                VectorExpr::new(VectorOpNode::MulSv(
                    ScalarExpr::from(rhs),
                    VectorExpr::from(self),
                ))
            }
        }
    };
}

mul_vs!(VectorExpr, ScalarExpr);
mul_vs!(VectorExpr, &ScalarExpr);
mul_vs!(VectorExpr, &ScalarVar);
mul_vs!(VectorExpr, f64);
mul_vs!(&VectorExpr, ScalarExpr);
mul_vs!(&VectorExpr, &ScalarExpr);
mul_vs!(&VectorExpr, &ScalarVar);
mul_vs!(&VectorExpr, f64);
mul_vs!(&VectorVar, ScalarExpr);
mul_vs!(&VectorVar, &ScalarExpr);
mul_vs!(&VectorVar, f64);

macro_rules! mul_mv {
    ($lhs:ty, $rhs:ty) => {
        impl ops::Mul<$rhs> for $lhs {
            type Output = VectorExpr;
            fn mul(self, rhs: $rhs) -> VectorExpr {
                VectorExpr::new(VectorOpNode::MulMv(
                    MatrixExpr::from(self),
                    VectorExpr::from(rhs),
                ))
            }
        }
    };
}

mul_mv!(MatrixExpr, VectorExpr);
mul_mv!(MatrixExpr, &VectorExpr);
mul_mv!(MatrixExpr, &VectorVar);
mul_mv!(&MatrixExpr, VectorExpr);
mul_mv!(&MatrixExpr, &VectorExpr);
mul_mv!(&MatrixExpr, &VectorVar);

macro_rules! div_vs {
    ($lhs:ty, $rhs:ty) => {
        impl ops::Div<$rhs> for $lhs {
            type Output = VectorExpr;
            fn div(self, rhs: $rhs) -> VectorExpr {
                VectorExpr::new(VectorOpNode::DivVs(
                    VectorExpr::from(self),
                    ScalarExpr::from(rhs),
                ))
            }
        }
    };
}

div_vs!(VectorExpr, ScalarExpr);
div_vs!(VectorExpr, &ScalarExpr);
div_vs!(VectorExpr, &ScalarVar);
div_vs!(VectorExpr, f64);
div_vs!(&VectorExpr, ScalarExpr);
div_vs!(&VectorExpr, &ScalarExpr);
div_vs!(&VectorExpr, &ScalarVar);
div_vs!(&VectorExpr, f64);
div_vs!(&VectorVar, ScalarExpr);
div_vs!(&VectorVar, &ScalarExpr);
div_vs!(&VectorVar, f64);

// matrix operators

macro_rules! mbin {
    ($trait:ident, $method:ident, $variant:ident, $lhs:ty, $rhs:ty) => {
        impl ops::$trait<$rhs> for $lhs {
            type Output = MatrixExpr;
            fn $method(self, rhs: $rhs) -> MatrixExpr {
                MatrixExpr::new(MatrixOpNode::$variant(
                    MatrixExpr::from(self),
                    MatrixExpr::from(rhs),
                ))
            }
        }
    };
}

macro_rules! matrix_addsub {
    ($trait:ident, $method:ident, $variant:ident) => {
        mbin!($trait, $method, $variant, MatrixExpr, MatrixExpr);
        mbin!($trait, $method, $variant, MatrixExpr, &MatrixExpr);
        mbin!($trait, $method, $variant, &MatrixExpr, MatrixExpr);
        mbin!($trait, $method, $variant, &MatrixExpr, &MatrixExpr);
    };
}

matrix_addsub!(Add, add, Add);
matrix_addsub!(Sub, sub, Sub);

impl ops::Neg for MatrixExpr {
    type Output = MatrixExpr;
    fn neg(self) -> MatrixExpr {
        MatrixExpr::new(MatrixOpNode::Neg(self))
    }
}

impl ops::Neg for &MatrixExpr {
    type Output = MatrixExpr;
    fn neg(self) -> MatrixExpr {
        MatrixExpr::new(MatrixOpNode::Neg(self.clone()))
    }
}

// free functions

macro_rules! scalar_fn {
    ($(#[$doc:meta])* $name:ident, $variant:ident) => {
        $(#[$doc])*
        pub fn $name(x: impl Into<ScalarExpr>) -> ScalarExpr {
            ScalarExpr::new(ScalarOp::$variant(x.into()))
        }
    };
}

scalar_fn!(sqr, Sqr);
scalar_fn!(sqrt, Sqrt);
scalar_fn!(exp, Exp);
scalar_fn!(
    /// Natural logarithm.
    log,
    Log
);
scalar_fn!(cos, Cos);
scalar_fn!(sin, Sin);
scalar_fn!(tan, Tan);
scalar_fn!(acos, Acos);
scalar_fn!(asin, Asin);
scalar_fn!(atan, Atan);
scalar_fn!(cosh, Cosh);
scalar_fn!(sinh, Sinh);
scalar_fn!(tanh, Tanh);
scalar_fn!(abs, Abs);
scalar_fn!(sign, Sign);
scalar_fn!(floor, Floor);
scalar_fn!(ceil, Ceil);

pub fn pow(x: impl Into<ScalarExpr>, p: impl Into<ScalarExpr>) -> ScalarExpr {
    ScalarExpr::new(ScalarOp::Pow(x.into(), p.into()))
}

pub fn atan2(y: impl Into<ScalarExpr>, x: impl Into<ScalarExpr>) -> ScalarExpr {
    ScalarExpr::new(ScalarOp::Atan2(y.into(), x.into()))
}

pub fn min(x1: impl Into<ScalarExpr>, x2: impl Into<ScalarExpr>) -> ScalarExpr {
    ScalarExpr::new(ScalarOp::Min(x1.into(), x2.into()))
}

pub fn max(x1: impl Into<ScalarExpr>, x2: impl Into<ScalarExpr>) -> ScalarExpr {
    ScalarExpr::new(ScalarOp::Max(x1.into(), x2.into()))
}

/// `chi(guard, then, other)`: `then` where the guard is nonpositive,
/// `other` where it is positive, the hull of both across zero.
pub fn chi(
    x1: impl Into<ScalarExpr>,
    x2: impl Into<ScalarExpr>,
    x3: impl Into<ScalarExpr>,
) -> ScalarExpr {
    ScalarExpr::new(ScalarOp::Chi(x1.into(), x2.into(), x3.into()))
}

/// Builds a vector expression from scalar components.
pub fn vec(components: Vec<ScalarExpr>) -> VectorExpr {
    assert!(
        !components.is_empty(),
        "a vector expression needs at least one component"
    );
    VectorExpr::new(VectorOpNode::Vec(components))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ValueMap;

    #[test]
    fn test_operator_sugar_builds_the_expected_graph() {
        let x = ScalarVar::new("x");
        let e = sqrt(sqr(&x - 1.0) + 1.0);
        assert_eq!(format!("{e}"), "sqrt((((x-1))^2+1))");
    }

    #[test]
    fn test_mixed_number_operands() {
        let e: ScalarExpr = 2.0 * ScalarExpr::from(3.0) + 1.0;
        let mut v = ValueMap::new();
        e.fwd_eval(&mut v, 0, true);
        assert_eq!(v.scalar(e.id()).a, crate::interval::Interval::point(7.0));
    }

    #[test]
    fn test_vector_var_components() {
        let p = VectorVar::new("p", 3);
        let e = vec(vec![p.elem(0), p.elem(2)]);
        assert_eq!(e.size(), 2);
        assert_eq!(format!("{e}"), "(p[0];p[2])");
    }
}
