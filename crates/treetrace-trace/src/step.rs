//! A single recorded moment of an insertion.

use crate::snapshot::Snapshot;
use crate::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use treetrace_ids::NodeId;

/// What happened at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Compare,
    DescendLeft,
    DescendRight,
    Insert,
    /// The key is already present; the tree is left untouched.
    Duplicate,
    CheckBalance,
    /// Emitted just before a rotation.
    Rotate,
    /// Emitted just after a rotation.
    Rotated,
    Violation,
    CheckUncle,
    Recolor,
    Complete,
}

impl StepKind {
    pub fn descend(side: Side) -> Self {
        match side {
            Side::Left => StepKind::DescendLeft,
            Side::Right => StepKind::DescendRight,
        }
    }

    /// Terminal kinds close a trace.
    pub fn is_terminal(self) -> bool {
        matches!(self, StepKind::Complete | StepKind::Duplicate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Compare => "compare",
            StepKind::DescendLeft => "descend-left",
            StepKind::DescendRight => "descend-right",
            StepKind::Insert => "insert",
            StepKind::Duplicate => "duplicate",
            StepKind::CheckBalance => "check-balance",
            StepKind::Rotate => "rotate",
            StepKind::Rotated => "rotated",
            StepKind::Violation => "violation",
            StepKind::CheckUncle => "check-uncle",
            StepKind::Recolor => "recolor",
            StepKind::Complete => "complete",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named rebalancing case that triggered a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationCase {
    /// AVL: left-heavy node with a left-leaning (or even) left child.
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
    /// Red-Black: the new node is an inner grandchild; straightened by rotating the parent.
    Triangle,
    /// Red-Black: the new node is an outer grandchild; resolved by rotating the grandparent.
    Line,
}

impl RotationCase {
    pub fn label(self) -> &'static str {
        match self {
            RotationCase::LeftLeft => "LL",
            RotationCase::RightRight => "RR",
            RotationCase::LeftRight => "LR",
            RotationCase::RightLeft => "RL",
            RotationCase::Triangle => "triangle",
            RotationCase::Line => "line",
        }
    }

    /// AVL case for a node heavy on `heavy`; `double` when the child leans the other way.
    pub fn avl(heavy: Side, double: bool) -> Self {
        match (heavy, double) {
            (Side::Left, false) => RotationCase::LeftLeft,
            (Side::Right, false) => RotationCase::RightRight,
            (Side::Left, true) => RotationCase::LeftRight,
            (Side::Right, true) => RotationCase::RightLeft,
        }
    }
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rotation metadata attached to `rotate`/`rotated` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationInfo {
    /// Node the rotation is applied at.
    pub pivot: NodeId,
    /// The pivot's child that rises into the pivot's place.
    pub child: NodeId,
    /// `Left` rotation lifts the right child; `Right` lifts the left child.
    pub direction: Side,
    pub case: RotationCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep<K> {
    index: usize,
    kind: StepKind,
    message: String,
    highlighted: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<RotationInfo>,
    snapshot: Snapshot<K>,
}

impl<K> TraceStep<K> {
    /// Draft a step; its index is assigned when a recorder appends it.
    pub fn new(kind: StepKind, message: impl Into<String>, snapshot: Snapshot<K>) -> Self {
        Self {
            index: 0,
            kind,
            message: message.into(),
            highlighted: Vec::new(),
            rotation: None,
            snapshot,
        }
    }

    pub fn with_highlight(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        for id in ids {
            if !self.highlighted.contains(&id) {
                self.highlighted.push(id);
            }
        }
        self
    }

    pub fn with_rotation(mut self, rotation: RotationInfo) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn highlighted(&self) -> &[NodeId] {
        &self.highlighted
    }

    pub fn rotation(&self) -> Option<&RotationInfo> {
        self.rotation.as_ref()
    }

    pub fn snapshot(&self) -> &Snapshot<K> {
        &self.snapshot
    }
}
