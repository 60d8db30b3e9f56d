//! Deep, owned copies of a tree at one instant.

use crate::{Color, Side};
use serde::{Deserialize, Serialize};
use treetrace_ids::NodeId;

/// Per-variant node metadata captured in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum Annotation {
    Avl { height: u32, balance: i32 },
    RedBlack { color: Color },
}

impl Annotation {
    pub fn color(&self) -> Option<Color> {
        match self {
            Annotation::RedBlack { color } => Some(*color),
            Annotation::Avl { .. } => None,
        }
    }

    pub fn height(&self) -> Option<u32> {
        match self {
            Annotation::Avl { height, .. } => Some(*height),
            Annotation::RedBlack { .. } => None,
        }
    }

    pub fn balance(&self) -> Option<i32> {
        match self {
            Annotation::Avl { balance, .. } => Some(*balance),
            Annotation::RedBlack { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode<K> {
    pub id: NodeId,
    pub key: K,
    pub annotation: Annotation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<SnapshotNode<K>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<SnapshotNode<K>>>,
}

impl<K> SnapshotNode<K> {
    pub fn leaf(id: NodeId, key: K, annotation: Annotation) -> Self {
        Self {
            id,
            key,
            annotation,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<&SnapshotNode<K>> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    /// Structural height: an absent subtree is 0, a leaf is 1.
    pub fn height(&self) -> u32 {
        let left = self.left.as_ref().map_or(0, |n| n.height());
        let right = self.right.as_ref().map_or(0, |n| n.height());
        1 + left.max(right)
    }

    pub fn len(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.len()) + self.right.as_ref().map_or(0, |n| n.len())
    }
}

/// A tree frozen at one step of an insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<K> {
    root: Option<Box<SnapshotNode<K>>>,
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> Snapshot<K> {
    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn new(root: Option<SnapshotNode<K>>) -> Self {
        Self {
            root: root.map(Box::new),
        }
    }

    pub fn root(&self) -> Option<&SnapshotNode<K>> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.root().map_or(0, SnapshotNode::len)
    }

    pub fn height(&self) -> u32 {
        self.root().map_or(0, SnapshotNode::height)
    }

    /// Nodes in key order.
    pub fn nodes_in_order(&self) -> Vec<&SnapshotNode<K>> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<&SnapshotNode<K>> = Vec::new();
        let mut cursor = self.root();
        while cursor.is_some() || !stack.is_empty() {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(node);
                cursor = node.right.as_deref();
            }
        }
        out
    }

    pub fn in_order(&self) -> Vec<&K> {
        self.nodes_in_order().into_iter().map(|n| &n.key).collect()
    }

    /// Node identities in pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<&SnapshotNode<K>> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node.id);
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        out
    }

    pub fn find(&self, id: NodeId) -> Option<&SnapshotNode<K>> {
        let mut stack: Vec<&SnapshotNode<K>> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        None
    }
}

impl<K: Ord> Snapshot<K> {
    pub fn find_key(&self, key: &K) -> Option<&SnapshotNode<K>> {
        let mut cursor = self.root();
        while let Some(node) = cursor {
            cursor = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(node),
            };
        }
        None
    }
}
