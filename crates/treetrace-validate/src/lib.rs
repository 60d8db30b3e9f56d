//! Invariant checks over tree snapshots.
//!
//! Checks run on [`Snapshot`]s rather than live trees so the same code
//! validates both a tree after insertion and every payload inside a trace.
//! A failure is always a defect in the engine, reported as an
//! [`ErrorCategory::Invariant`](treetrace_error::ErrorCategory::Invariant) error.

use itertools::Itertools;
use std::collections::HashSet;
use std::fmt::Display;
use treetrace_error::{Result, invariant_error};
use treetrace_trace::{Annotation, Color, Snapshot, SnapshotNode};

/// In-order keys are strictly increasing.
pub fn check_bst_order<K: Ord + Display>(snapshot: &Snapshot<K>) -> Result<()> {
    for (a, b) in snapshot.nodes_in_order().into_iter().tuple_windows() {
        if a.key >= b.key {
            return Err(invariant_error("keys out of order")
                .with_context("node", a.id)
                .with_context("key", &a.key)
                .with_context("next_key", &b.key));
        }
    }
    Ok(())
}

/// No identity appears twice.
pub fn check_unique_ids<K>(snapshot: &Snapshot<K>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in snapshot.ids() {
        if !seen.insert(id) {
            return Err(invariant_error("node identity repeated").with_context("node", id));
        }
    }
    Ok(())
}

/// Stored heights and balance factors agree with the structure, and every
/// balance factor lies in `[-1, 1]`.
pub fn check_avl<K: Display>(snapshot: &Snapshot<K>) -> Result<()> {
    snapshot.root().map_or(Ok(0), avl_height).map(|_| ())
}

fn avl_height<K: Display>(node: &SnapshotNode<K>) -> Result<u32> {
    let left = node.left.as_deref().map_or(Ok(0), avl_height)?;
    let right = node.right.as_deref().map_or(Ok(0), avl_height)?;
    let Annotation::Avl { height, balance } = node.annotation else {
        return Err(invariant_error("expected AVL metadata")
            .with_context("node", node.id)
            .with_context("key", &node.key));
    };
    let actual_height = 1 + left.max(right);
    let actual_balance = left as i32 - right as i32;
    if height != actual_height {
        return Err(invariant_error("stored height is stale")
            .with_context("node", node.id)
            .with_context("key", &node.key)
            .with_context("stored", height)
            .with_context("actual", actual_height));
    }
    if balance != actual_balance {
        return Err(invariant_error("stored balance factor is stale")
            .with_context("node", node.id)
            .with_context("key", &node.key)
            .with_context("stored", balance)
            .with_context("actual", actual_balance));
    }
    if !(-1..=1).contains(&balance) {
        return Err(invariant_error("balance factor out of range")
            .with_context("node", node.id)
            .with_context("key", &node.key)
            .with_context("balance", balance));
    }
    Ok(actual_height)
}

/// Root is black, no red node has a red child, and every path to an empty
/// subtree crosses the same number of black nodes. Returns that black height.
pub fn check_red_black<K: Display>(snapshot: &Snapshot<K>) -> Result<usize> {
    let Some(root) = snapshot.root() else {
        return Ok(0);
    };
    if color_of(root)? != Color::Black {
        return Err(invariant_error("root is not black")
            .with_context("node", root.id)
            .with_context("key", &root.key));
    }
    black_height(root)
}

fn color_of<K: Display>(node: &SnapshotNode<K>) -> Result<Color> {
    node.annotation.color().ok_or_else(|| {
        invariant_error("expected red-black metadata")
            .with_context("node", node.id)
            .with_context("key", &node.key)
    })
}

fn black_height<K: Display>(node: &SnapshotNode<K>) -> Result<usize> {
    let color = color_of(node)?;
    let mut heights = [0usize; 2];
    for (slot, child) in [node.left.as_deref(), node.right.as_deref()].into_iter().enumerate() {
        let Some(child) = child else {
            continue;
        };
        if color == Color::Red && color_of(child)? == Color::Red {
            return Err(invariant_error("red node has a red child")
                .with_context("node", node.id)
                .with_context("key", &node.key)
                .with_context("child", &child.key));
        }
        heights[slot] = black_height(child)?;
    }
    if heights[0] != heights[1] {
        return Err(invariant_error("black height differs between subtrees")
            .with_context("node", node.id)
            .with_context("key", &node.key)
            .with_context("left", heights[0])
            .with_context("right", heights[1]));
    }
    Ok(heights[0] + usize::from(color == Color::Black))
}

/// Run every check that applies to the snapshot's variant, judged by its root.
pub fn validate<K: Ord + Display>(snapshot: &Snapshot<K>) -> Result<()> {
    check_unique_ids(snapshot)?;
    check_bst_order(snapshot)?;
    match snapshot.root().map(|r| r.annotation) {
        Some(Annotation::Avl { .. }) => check_avl(snapshot),
        Some(Annotation::RedBlack { .. }) => check_red_black(snapshot).map(|_| ()),
        None => Ok(()),
    }
}
