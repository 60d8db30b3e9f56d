use std::cmp::Ordering;
use treetrace_ids::NodeId;
use treetrace_trace::{Annotation, Side, Snapshot, SnapshotNode};

/// What a tree variant must expose for the shared primitives to walk it.
pub trait ArenaNode {
    type Key;

    fn id(&self) -> NodeId;
    fn key(&self) -> &Self::Key;
    fn child(&self, side: Side) -> Option<NodeId>;
    fn set_child(&mut self, side: Side, child: Option<NodeId>);
    fn annotation(&self) -> Annotation;
}

/// Where a subtree hangs: the tree's root pointer or a parent's child link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Root,
    Child(NodeId, Side),
}

/// The three links a rotation rewired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub pivot: NodeId,
    /// Former child of the pivot, now in the pivot's slot.
    pub risen: NodeId,
    /// Inner subtree handed from `risen` to `pivot`, if any.
    pub moved: Option<NodeId>,
}

/// Node storage. Ids are dense and equal to slot indices; nodes are never removed.
#[derive(Debug, Clone)]
pub struct Arena<N> {
    nodes: Vec<N>,
    root: Option<NodeId>,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn alloc(&mut self, make: impl FnOnce(NodeId) -> N) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(make(id));
        id
    }

    pub fn get(&self, id: NodeId) -> &N {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut N {
        &mut self.nodes[id.index()]
    }
}

impl<N: ArenaNode> Arena<N> {
    pub fn key(&self, id: NodeId) -> &N::Key {
        self.get(id).key()
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.get(id).child(side)
    }

    /// Which side of `parent` holds `child`, if it is a direct child.
    pub fn side_of(&self, parent: NodeId, child: NodeId) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|&side| self.child(parent, side) == Some(child))
    }

    pub fn slot_target(&self, slot: Slot) -> Option<NodeId> {
        match slot {
            Slot::Root => self.root,
            Slot::Child(parent, side) => self.child(parent, side),
        }
    }

    pub fn set_slot(&mut self, slot: Slot, node: Option<NodeId>) {
        match slot {
            Slot::Root => self.root = node,
            Slot::Child(parent, side) => self.get_mut(parent).set_child(side, node),
        }
    }

    /// Rotate the subtree at `pivot` (which hangs in `slot`) toward `direction`.
    ///
    /// Rewires exactly three links: the slot, the risen child's inner link and
    /// the pivot's outer link. Returns `None` and changes nothing when the
    /// child that would rise is absent. Variant metadata is left to the caller.
    pub fn rotate(&mut self, pivot: NodeId, direction: Side, slot: Slot) -> Option<Rotation> {
        let risen = self.child(pivot, direction.opposite())?;
        let moved = self.child(risen, direction);
        self.get_mut(pivot).set_child(direction.opposite(), moved);
        self.get_mut(risen).set_child(direction, Some(pivot));
        self.set_slot(slot, Some(risen));
        Some(Rotation { pivot, risen, moved })
    }

    /// Structural height; an empty tree is 0.
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            best = best.max(depth);
            for side in [Side::Left, Side::Right] {
                if let Some(child) = self.child(id, side) {
                    stack.push((child, depth + 1));
                }
            }
        }
        best
    }

    pub fn in_order(&self) -> Vec<&N::Key> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = Vec::new();
        let mut cursor = self.root;
        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.child(id, Side::Left);
            }
            if let Some(id) = stack.pop() {
                out.push(self.key(id));
                cursor = self.child(id, Side::Right);
            }
        }
        out
    }
}

impl<N> Arena<N>
where
    N: ArenaNode,
    N::Key: Ord,
{
    pub fn find(&self, key: &N::Key) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            cursor = match key.cmp(self.key(id)) {
                Ordering::Less => self.child(id, Side::Left),
                Ordering::Greater => self.child(id, Side::Right),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }
}

impl<N> Arena<N>
where
    N: ArenaNode,
    N::Key: Clone,
{
    /// Deep copy of the reachable tree.
    pub fn snapshot(&self) -> Snapshot<N::Key> {
        Snapshot::new(self.root.map(|root| self.snapshot_node(root)))
    }

    fn snapshot_node(&self, id: NodeId) -> SnapshotNode<N::Key> {
        let node = self.get(id);
        let mut out = SnapshotNode::leaf(node.id(), node.key().clone(), node.annotation());
        out.left = node
            .child(Side::Left)
            .map(|c| Box::new(self.snapshot_node(c)));
        out.right = node
            .child(Side::Right)
            .map(|c| Box::new(self.snapshot_node(c)));
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct PlainNode {
        pub id: NodeId,
        pub key: i64,
        pub left: Option<NodeId>,
        pub right: Option<NodeId>,
    }

    impl PlainNode {
        pub fn new(id: NodeId, key: i64) -> Self {
            Self {
                id,
                key,
                left: None,
                right: None,
            }
        }
    }

    impl ArenaNode for PlainNode {
        type Key = i64;

        fn id(&self) -> NodeId {
            self.id
        }

        fn key(&self) -> &i64 {
            &self.key
        }

        fn child(&self, side: Side) -> Option<NodeId> {
            match side {
                Side::Left => self.left,
                Side::Right => self.right,
            }
        }

        fn set_child(&mut self, side: Side, child: Option<NodeId>) {
            match side {
                Side::Left => self.left = child,
                Side::Right => self.right = child,
            }
        }

        fn annotation(&self) -> Annotation {
            Annotation::Avl { height: 0, balance: 0 }
        }
    }

    /// 10 -> right 20 -> right 30
    fn chain() -> Arena<PlainNode> {
        let mut arena = Arena::new();
        let a = arena.alloc(|id| PlainNode::new(id, 10));
        let b = arena.alloc(|id| PlainNode::new(id, 20));
        let c = arena.alloc(|id| PlainNode::new(id, 30));
        arena.set_slot(Slot::Root, Some(a));
        arena.set_slot(Slot::Child(a, Side::Right), Some(b));
        arena.set_slot(Slot::Child(b, Side::Right), Some(c));
        arena
    }

    #[test]
    fn rotate_left_lifts_right_child() {
        let mut arena = chain();
        let rotation = arena.rotate(NodeId(0), Side::Left, Slot::Root).unwrap();
        assert_eq!(rotation.risen, NodeId(1));
        assert_eq!(rotation.moved, None);
        assert_eq!(arena.root(), Some(NodeId(1)));
        assert_eq!(arena.child(NodeId(1), Side::Left), Some(NodeId(0)));
        assert_eq!(arena.child(NodeId(1), Side::Right), Some(NodeId(2)));
        assert_eq!(arena.child(NodeId(0), Side::Right), None);
        assert_eq!(arena.height(), 2);
    }

    #[test]
    fn rotate_without_child_is_a_no_op() {
        let mut arena = chain();
        assert!(arena.rotate(NodeId(0), Side::Right, Slot::Root).is_none());
        assert_eq!(arena.root(), Some(NodeId(0)));
    }

    #[test]
    fn in_order_and_find() {
        let arena = chain();
        assert_eq!(arena.in_order(), vec![&10, &20, &30]);
        assert_eq!(arena.find(&20), Some(NodeId(1)));
        assert_eq!(arena.find(&25), None);
        assert_eq!(arena.side_of(NodeId(0), NodeId(1)), Some(Side::Right));
        assert_eq!(arena.side_of(NodeId(0), NodeId(2)), None);
    }

    #[test]
    fn snapshot_is_a_deep_copy() {
        let mut arena = chain();
        let before = arena.snapshot();
        arena.rotate(NodeId(0), Side::Left, Slot::Root);
        assert_eq!(before.root().map(|n| n.key), Some(10));
        assert_eq!(arena.snapshot().root().map(|n| n.key), Some(20));
    }
}
