// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Per-node evaluation values
//!
//! Every node of an evaluated graph carries one of these records in a
//! per-call [`ValueMap`]. A record holds the natural enclosure `a`, the
//! centered-form support (`m` an enclosure of the value at the input
//! midpoint, `da` the interval Jacobian with respect to the flattened
//! function inputs), and a definition-domain flag. `da` is `0x0` whenever
//! the node cannot offer first-order information; consumers must fall back
//! to the natural form in that case.

use ahash::AHashMap;

use super::ExprId;
use crate::interval::{mat_is_empty, vec_is_empty, Interval, IntervalMatrix, IntervalVector};

#[derive(Debug, Clone)]
pub struct ScalarValue {
    pub m: Interval,
    pub a: Interval,
    pub da: IntervalMatrix,
    pub def_domain: bool,
}

impl ScalarValue {
    /// Natural-only value, no derivative information.
    pub fn natural(a: Interval, def_domain: bool) -> Self {
        ScalarValue {
            m: Interval::ALL,
            a,
            da: IntervalMatrix::zeros(0, 0),
            def_domain,
        }
    }

    pub fn centered(m: Interval, a: Interval, da: IntervalMatrix, def_domain: bool) -> Self {
        ScalarValue { m, a, da, def_domain }
    }

    pub fn has_jacobian(&self) -> bool {
        self.da.len() != 0
    }
}

#[derive(Debug, Clone)]
pub struct VectorValue {
    pub m: IntervalVector,
    pub a: IntervalVector,
    pub da: IntervalMatrix,
    pub def_domain: bool,
}

impl VectorValue {
    pub fn natural(a: IntervalVector, def_domain: bool) -> Self {
        VectorValue {
            m: IntervalVector::from_element(a.len(), Interval::ALL),
            a,
            da: IntervalMatrix::zeros(0, 0),
            def_domain,
        }
    }

    pub fn centered(m: IntervalVector, a: IntervalVector, da: IntervalMatrix, def_domain: bool) -> Self {
        VectorValue { m, a, da, def_domain }
    }

    pub fn has_jacobian(&self) -> bool {
        self.da.len() != 0
    }
}

/// Matrix values never carry a Jacobian; centered evaluation of matrix
/// subexpressions degrades to the natural form.
#[derive(Debug, Clone)]
pub struct MatrixValue {
    pub m: IntervalMatrix,
    pub a: IntervalMatrix,
    pub def_domain: bool,
}

impl MatrixValue {
    pub fn natural(a: IntervalMatrix, def_domain: bool) -> Self {
        MatrixValue {
            m: IntervalMatrix::from_element(a.nrows(), a.ncols(), Interval::ALL),
            a,
            def_domain,
        }
    }

    pub fn centered(m: IntervalMatrix, a: IntervalMatrix, def_domain: bool) -> Self {
        MatrixValue { m, a, def_domain }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Scalar(ScalarValue),
    Vector(VectorValue),
    Matrix(MatrixValue),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(v) => v.a.is_empty(),
            Value::Vector(v) => vec_is_empty(&v.a),
            Value::Matrix(v) => mat_is_empty(&v.a),
        }
    }

    pub fn def_domain(&self) -> bool {
        match self {
            Value::Scalar(v) => v.def_domain,
            Value::Vector(v) => v.def_domain,
            Value::Matrix(v) => v.def_domain,
        }
    }
}

/// Per-evaluation store mapping node ids to their current values.
///
/// A fresh map is built for every call, so a bound function owns no
/// evaluation state and concurrent calls never interfere.
#[derive(Debug, Default)]
pub struct ValueMap {
    slots: AHashMap<ExprId, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        ValueMap::default()
    }

    pub fn insert(&mut self, id: ExprId, value: Value) {
        self.slots.insert(id, value);
    }

    pub fn contains(&self, id: ExprId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: ExprId) -> Option<&Value> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: ExprId) -> Option<&mut Value> {
        self.slots.get_mut(&id)
    }

    /// Panics if the slot is absent or holds a non-scalar value. Slots are
    /// populated by the forward pass before anyone reads them, so a miss
    /// here is a graph-construction bug, not a user error.
    pub fn scalar(&self, id: ExprId) -> &ScalarValue {
        match self.slots.get(&id) {
            Some(Value::Scalar(v)) => v,
            _ => panic!("value map holds no scalar slot for this node"),
        }
    }

    pub fn scalar_mut(&mut self, id: ExprId) -> &mut ScalarValue {
        match self.slots.get_mut(&id) {
            Some(Value::Scalar(v)) => v,
            _ => panic!("value map holds no scalar slot for this node"),
        }
    }

    pub fn vector(&self, id: ExprId) -> &VectorValue {
        match self.slots.get(&id) {
            Some(Value::Vector(v)) => v,
            _ => panic!("value map holds no vector slot for this node"),
        }
    }

    pub fn vector_mut(&mut self, id: ExprId) -> &mut VectorValue {
        match self.slots.get_mut(&id) {
            Some(Value::Vector(v)) => v,
            _ => panic!("value map holds no vector slot for this node"),
        }
    }

    pub fn matrix(&self, id: ExprId) -> &MatrixValue {
        match self.slots.get(&id) {
            Some(Value::Matrix(v)) => v,
            _ => panic!("value map holds no matrix slot for this node"),
        }
    }

    pub fn matrix_mut(&mut self, id: ExprId) -> &mut MatrixValue {
        match self.slots.get_mut(&id) {
            Some(Value::Matrix(v)) => v,
            _ => panic!("value map holds no matrix slot for this node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_value_has_no_jacobian() {
        let v = ScalarValue::natural(Interval::new(1.0, 2.0), true);
        assert!(!v.has_jacobian());
        let c = ScalarValue::centered(
            Interval::point(1.5),
            Interval::new(1.0, 2.0),
            IntervalMatrix::zeros(1, 3),
            true,
        );
        assert!(c.has_jacobian());
    }

    #[test]
    fn test_map_roundtrip() {
        let mut map = ValueMap::new();
        let id = ExprId::fresh();
        map.insert(id, Value::Scalar(ScalarValue::natural(Interval::point(4.0), true)));
        assert!(map.contains(id));
        map.scalar_mut(id).a &= Interval::new(0.0, 1.0);
        assert!(map.scalar(id).a.is_empty());
        assert!(map.get(id).is_some_and(Value::is_empty));
    }
}
