// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Interval arithmetic primitives
//!
//! Closed real intervals with outward-rounded arithmetic, their elementary
//! forward functions, and the elementary backward (preimage) narrowing
//! functions the operator policies build on.

mod scalar;
mod functions;
pub mod bwd;
mod matrices;

pub use scalar::Interval;
pub use functions::chi;
pub use matrices::{
    hull_vector, mat_is_empty, meet_matrix, meet_vector, mid_matrix, mid_vector, set_empty_matrix,
    set_empty_vector, unbounded_vector, vec_is_empty, IntervalMatrix, IntervalVector,
};
