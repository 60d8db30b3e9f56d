//! Binary search tree primitives shared by the balanced trees.
//!
//! Nodes live in an [`Arena`] and refer to each other by [`NodeId`]. Ownership
//! stays a strict tree: the arena owns every node, `left`/`right` links form
//! the tree, and any upward links a variant keeps are plain ids.

mod arena;
mod insert;

pub use arena::{Arena, ArenaNode, Rotation, Slot};
pub use insert::{Descent, Insertion, descend, insert};

use std::fmt;
use treetrace_trace::Trace;

pub use treetrace_ids::NodeId;
pub use treetrace_trace::Side;

/// Keys need a total order, must be copyable into snapshots, and printable in messages.
pub trait TreeKey: Ord + Clone + fmt::Display {}

impl<T: Ord + Clone + fmt::Display> TreeKey for T {}

/// Result of a pure insertion call: the tree after the call and the trace that got it there.
#[derive(Debug, Clone)]
pub struct InsertOutcome<T, K> {
    pub tree: T,
    pub trace: Trace<K>,
}
