// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Function argument lists and input binding
//!
//! An [`ArgsList`] is the ordered sequence of declared variables of a bound
//! function. Arguments are flattened into one input space (scalars take one
//! component, vectors take as many as their declared size), which fixes the
//! column layout of every Jacobian produced during centered evaluation.

use nalgebra::DVector;

use super::error::ExprError;
use super::id::ExprId;
use super::value::{ScalarValue, Value, ValueMap, VectorValue};
use crate::interval::{Interval, IntervalMatrix, IntervalVector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    Scalar,
    Vector(usize),
}

impl ArgKind {
    pub fn size(&self) -> usize {
        match self {
            ArgKind::Scalar => 1,
            ArgKind::Vector(n) => *n,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            ArgKind::Scalar => "scalar",
            ArgKind::Vector(_) => "vector",
        }
    }
}

/// One declared argument: the identity of its variable leaf plus its shape.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub(crate) id: ExprId,
    pub(crate) name: String,
    pub(crate) kind: ArgKind,
}

impl VarDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ArgKind {
        &self.kind
    }
}

/// Ordered argument list of a bound function.
#[derive(Debug, Clone, Default)]
pub struct ArgsList {
    vars: Vec<VarDecl>,
}

impl From<Vec<VarDecl>> for ArgsList {
    fn from(vars: Vec<VarDecl>) -> Self {
        ArgsList { vars }
    }
}

impl ArgsList {
    pub fn new(vars: Vec<VarDecl>) -> Self {
        ArgsList { vars }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VarDecl> {
        self.vars.iter()
    }

    /// Number of components of the flattened input space.
    pub fn total_size(&self) -> usize {
        self.vars.iter().map(|v| v.kind.size()).sum()
    }

    pub(crate) fn contains(&self, id: ExprId) -> bool {
        self.vars.iter().any(|v| v.id == id)
    }

    /// Binds one input box to the variable leaves, seeding the value map
    /// with midpoints and identity Jacobian blocks so that centered
    /// evaluation can chain from the leaves up.
    pub(crate) fn seed(&self, inputs: &[ArgValue], map: &mut ValueMap) -> Result<(), ExprError> {
        if inputs.len() != self.vars.len() {
            return Err(ExprError::ArgCount {
                expected: self.vars.len(),
                got: inputs.len(),
            });
        }
        let total = self.total_size();
        let mut offset = 0;
        for (index, (decl, input)) in self.vars.iter().zip(inputs.iter()).enumerate() {
            match (&decl.kind, input) {
                (ArgKind::Scalar, ArgValue::Scalar(x)) => {
                    let mut da = IntervalMatrix::zeros(1, total);
                    da[(0, offset)] = Interval::point(1.0);
                    let m = Interval::point(x.mid());
                    map.insert(decl.id, Value::Scalar(ScalarValue::centered(m, *x, da, true)));
                    offset += 1;
                }
                (ArgKind::Vector(n), ArgValue::Vector(x)) => {
                    if x.len() != *n {
                        return Err(ExprError::ArgSize {
                            index,
                            name: decl.name.clone(),
                            expected: *n,
                            got: x.len(),
                        });
                    }
                    let mut da = IntervalMatrix::zeros(*n, total);
                    for k in 0..*n {
                        da[(k, offset + k)] = Interval::point(1.0);
                    }
                    let m = IntervalVector::from_iterator(*n, x.iter().map(|c| Interval::point(c.mid())));
                    map.insert(decl.id, Value::Vector(VectorValue::centered(m, x.clone(), da, true)));
                    offset += n;
                }
                (kind, value) => {
                    return Err(ExprError::ArgKind {
                        index,
                        name: decl.name.clone(),
                        expected: kind.label(),
                        got: value.kind_label(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Reads the (possibly narrowed) variable enclosures back out of a value
    /// map, in declaration order.
    pub(crate) fn read_back(&self, map: &ValueMap, inputs: &mut [ArgValue]) {
        for (decl, slot) in self.vars.iter().zip(inputs.iter_mut()) {
            match slot {
                ArgValue::Scalar(x) => *x = map.scalar(decl.id).a,
                ArgValue::Vector(x) => x.clone_from(&map.vector(decl.id).a),
            }
        }
    }
}

/// One input value of a function call. Scalar inputs accept plain numbers
/// or intervals; vector inputs accept point vectors or interval vectors.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Scalar(Interval),
    Vector(IntervalVector),
}

impl ArgValue {
    pub fn size(&self) -> usize {
        match self {
            ArgValue::Scalar(_) => 1,
            ArgValue::Vector(v) => v.len(),
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            ArgValue::Scalar(_) => "scalar",
            ArgValue::Vector(_) => "vector",
        }
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Scalar(Interval::point(x))
    }
}

impl From<Interval> for ArgValue {
    fn from(x: Interval) -> Self {
        ArgValue::Scalar(x)
    }
}

impl From<IntervalVector> for ArgValue {
    fn from(x: IntervalVector) -> Self {
        ArgValue::Vector(x)
    }
}

impl From<DVector<f64>> for ArgValue {
    fn from(x: DVector<f64>) -> Self {
        ArgValue::Vector(IntervalVector::from_iterator(x.len(), x.iter().map(|&c| Interval::point(c))))
    }
}

impl From<&IntervalVector> for ArgValue {
    fn from(x: &IntervalVector) -> Self {
        ArgValue::Vector(x.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(kind: ArgKind) -> VarDecl {
        VarDecl {
            id: ExprId::fresh(),
            name: "x".into(),
            kind,
        }
    }

    #[test]
    fn test_flattened_offsets() {
        let args = ArgsList::new(vec![decl(ArgKind::Scalar), decl(ArgKind::Vector(3)), decl(ArgKind::Scalar)]);
        assert_eq!(args.total_size(), 5);

        let mut map = ValueMap::new();
        let inputs = vec![
            ArgValue::from(1.0),
            ArgValue::Vector(IntervalVector::from_element(3, Interval::new(0.0, 2.0))),
            ArgValue::from(Interval::new(-1.0, 1.0)),
        ];
        args.seed(&inputs, &mut map).unwrap();

        let v = map.vector(args.vars[1].id);
        assert_eq!(v.da.shape(), (3, 5));
        assert_eq!(v.da[(0, 1)], Interval::point(1.0));
        assert_eq!(v.da[(2, 3)], Interval::point(1.0));
        assert_eq!(v.da[(0, 0)], Interval::point(0.0));
        assert_eq!(v.m[1], Interval::point(1.0));

        let s = map.scalar(args.vars[2].id);
        assert_eq!(s.da[(0, 4)], Interval::point(1.0));
        assert_eq!(s.m, Interval::point(0.0));
    }

    #[test]
    fn test_binding_errors() {
        let args = ArgsList::new(vec![decl(ArgKind::Vector(2))]);
        let mut map = ValueMap::new();

        let err = args.seed(&[], &mut map).unwrap_err();
        assert_eq!(err, ExprError::ArgCount { expected: 1, got: 0 });

        let err = args.seed(&[ArgValue::from(3.0)], &mut map).unwrap_err();
        assert!(matches!(err, ExprError::ArgKind { index: 0, .. }));

        let bad = ArgValue::Vector(IntervalVector::from_element(3, Interval::ALL));
        let err = args.seed(&[bad], &mut map).unwrap_err();
        assert!(matches!(err, ExprError::ArgSize { expected: 2, got: 3, .. }));
    }
}
