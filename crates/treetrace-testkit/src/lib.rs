use treetrace_avl::AvlTree;
use treetrace_rbtree::RedBlackTree;
use treetrace_trace::{Snapshot, Trace};

pub mod proptest;

/// Small helpers for building fixture trees in tests.
///
/// Keeping these in a microcrate avoids copy-paste across engine, render and
/// validation tests.
pub fn build_avl(keys: &[i64]) -> AvlTree<i64> {
    AvlTree::from_keys(keys.iter().copied())
}

pub fn build_rb(keys: &[i64]) -> RedBlackTree<i64> {
    RedBlackTree::from_keys(keys.iter().copied())
}

/// Insert `keys` one at a time, keeping every trace.
pub fn avl_traces(keys: &[i64]) -> (AvlTree<i64>, Vec<Trace<i64>>) {
    let mut tree = AvlTree::new();
    let traces = keys.iter().map(|&k| tree.insert(k)).collect();
    (tree, traces)
}

pub fn rb_traces(keys: &[i64]) -> (RedBlackTree<i64>, Vec<Trace<i64>>) {
    let mut tree = RedBlackTree::new();
    let traces = keys.iter().map(|&k| tree.insert(k)).collect();
    (tree, traces)
}

/// Every snapshot carried by every step, in recording order.
pub fn all_snapshots(traces: &[Trace<i64>]) -> impl Iterator<Item = &Snapshot<i64>> {
    traces.iter().flat_map(|t| t.iter().map(|s| s.snapshot()))
}

/// Canonical insertion sequences for the rotation and recolor cases.
pub mod scenarios {
    /// Ascending run: one RR rotation at the root for AVL.
    pub const ASCENDING: [i64; 3] = [10, 20, 30];
    /// Descending run: one LL rotation at the root for AVL.
    pub const DESCENDING: [i64; 3] = [30, 20, 10];
    /// Left zig-zag: LR double rotation.
    pub const ZIGZAG_LEFT: [i64; 3] = [30, 10, 20];
    /// Right zig-zag: RL double rotation.
    pub const ZIGZAG_RIGHT: [i64; 3] = [10, 30, 20];
    /// Red uncle at 5 forces a recolor that propagates to the root.
    pub const RED_UNCLE: [i64; 4] = [20, 10, 30, 5];
    /// Absent uncle with the new node on the inner side: triangle then line.
    pub const TRIANGLE: [i64; 3] = [20, 10, 15];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_insert_in_order() {
        assert_eq!(build_avl(&scenarios::ASCENDING).in_order(), vec![&10, &20, &30]);
        assert_eq!(build_rb(&scenarios::RED_UNCLE).len(), 4);
    }

    #[test]
    fn trace_helpers_keep_one_trace_per_key() {
        let (tree, traces) = avl_traces(&[5, 3, 5]);
        assert_eq!(traces.len(), 3);
        assert!(traces[2].is_duplicate());
        assert_eq!(tree.len(), 2);

        let (_, traces) = rb_traces(&[1, 2]);
        let count = all_snapshots(&traces).count();
        assert_eq!(count, traces.iter().map(Trace::len).sum::<usize>());
    }
}
