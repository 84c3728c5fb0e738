// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Boxprop Contributors

//! Node identity

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide unique identifier of an expression node.
///
/// Identity is structural, not content-based: two nodes with the same id
/// are (possibly independently owned) clones of the same structural node,
/// and share one slot in a per-evaluation value map. The generator is an
/// atomic counter, so graphs may be authored from several threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl ExprId {
    pub(crate) fn fresh() -> Self {
        ExprId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ExprId::fresh();
        let b = ExprId::fresh();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
