//! AVL tree with traced insertion.
//!
//! Insertion descends with the shared BST primitive, then walks the recorded
//! ancestor path bottom-up. At each ancestor the height and balance factor
//! are recomputed and, when the factor leaves `[-1, 1]`, one of the four
//! rotation cases repairs it. Left and right heavy cases are the same code
//! run with the [`Side`] swapped.

use treetrace_bst::{Arena, ArenaNode, InsertOutcome, Insertion, Slot, TreeKey};
use treetrace_ids::NodeId;
use treetrace_trace::{
    Annotation, RotationCase, RotationInfo, Side, Snapshot, StepKind, Trace, TraceRecorder,
    TraceStep,
};

#[derive(Debug, Clone)]
pub struct AvlNode<K> {
    id: NodeId,
    key: K,
    height: u32,
    balance: i32,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K> AvlNode<K> {
    fn leaf(id: NodeId, key: K) -> Self {
        Self {
            id,
            key,
            height: 1,
            balance: 0,
            left: None,
            right: None,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `height(left) - height(right)` as of the last structural change.
    pub fn balance(&self) -> i32 {
        self.balance
    }
}

impl<K> ArenaNode for AvlNode<K> {
    type Key = K;

    fn id(&self) -> NodeId {
        self.id
    }

    fn key(&self) -> &K {
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
        Annotation::Avl {
            height: self.height,
            balance: self.balance,
        }
    }
}

/// Balance factor seen from `side`: positive means leaning toward `side`.
fn lean(balance: i32, side: Side) -> i32 {
    match side {
        Side::Left => balance,
        Side::Right => -balance,
    }
}

#[derive(Debug, Clone)]
pub struct AvlTree<K> {
    arena: Arena<AvlNode<K>>,
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
}

impl<K: TreeKey> AvlTree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting `keys` in order, discarding the traces.
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        let mut tree = Self::new();
        for key in keys {
            tree.insert(key);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.arena.find(key).is_some()
    }

    pub fn height(&self) -> u32 {
        self.height_of(self.arena.root())
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.arena.root()
    }

    pub fn node(&self, key: &K) -> Option<&AvlNode<K>> {
        self.arena.find(key).map(|id| self.arena.get(id))
    }

    pub fn in_order(&self) -> Vec<&K> {
        self.arena.in_order()
    }

    pub fn snapshot(&self) -> Snapshot<K> {
        self.arena.snapshot()
    }

    /// Insert `key`, rebalance, and return the trace of every decision.
    ///
    /// A duplicate key leaves the tree untouched and the trace ends in a
    /// [`StepKind::Duplicate`] step.
    pub fn insert(&mut self, key: K) -> Trace<K> {
        let mut recorder = TraceRecorder::new();
        let inserted = treetrace_bst::insert(
            &mut self.arena,
            key,
            |id, key, _| AvlNode::leaf(id, key),
            &mut recorder,
        );
        let (id, path) = match inserted {
            Insertion::Duplicate(_) => return recorder.finish(),
            Insertion::Inserted { id, path } => (id, path),
        };

        for depth in (0..path.len()).rev() {
            let (node, _) = path[depth];
            let slot = match depth.checked_sub(1) {
                Some(up) => Slot::Child(path[up].0, path[up].1),
                None => Slot::Root,
            };
            self.rebalance(node, slot, &mut recorder);
        }

        let key = self.arena.key(id);
        recorder.push(
            TraceStep::new(
                StepKind::Complete,
                format!("{key} inserted; every balance factor is within [-1, 1]"),
                self.arena.snapshot(),
            )
            .with_highlight([id]),
        );
        recorder.finish()
    }

    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.arena.get(id).height)
    }

    fn update_metrics(&mut self, id: NodeId) {
        let left = self.height_of(self.arena.child(id, Side::Left));
        let right = self.height_of(self.arena.child(id, Side::Right));
        let node = self.arena.get_mut(id);
        node.height = 1 + left.max(right);
        node.balance = left as i32 - right as i32;
    }

    /// Recompute `node` and repair it if needed. Returns the subtree root now in `slot`.
    fn rebalance(&mut self, node: NodeId, slot: Slot, recorder: &mut TraceRecorder<K>) -> NodeId {
        self.update_metrics(node);
        let (height, balance) = {
            let n = self.arena.get(node);
            (n.height, n.balance)
        };
        let key = self.arena.key(node);
        let verdict = if balance.abs() > 1 { "out of balance" } else { "balanced" };
        recorder.push(
            TraceStep::new(
                StepKind::CheckBalance,
                format!("{key}: height {height}, balance factor {balance} ({verdict})"),
                self.arena.snapshot(),
            )
            .with_highlight([node]),
        );

        let heavy = match balance {
            b if b > 1 => Side::Left,
            b if b < -1 => Side::Right,
            _ => return node,
        };
        let Some(child) = self.arena.child(node, heavy) else {
            return node;
        };
        let double = lean(self.arena.get(child).balance, heavy) < 0;
        let case = RotationCase::avl(heavy, double);
        if double {
            self.rotate(child, heavy, Slot::Child(node, heavy), case, recorder);
        }
        self.rotate(node, heavy.opposite(), slot, case, recorder)
    }

    fn rotate(
        &mut self,
        pivot: NodeId,
        direction: Side,
        slot: Slot,
        case: RotationCase,
        recorder: &mut TraceRecorder<K>,
    ) -> NodeId {
        let Some(child) = self.arena.child(pivot, direction.opposite()) else {
            return pivot;
        };
        let info = RotationInfo {
            pivot,
            child,
            direction,
            case,
        };
        recorder.push(
            TraceStep::new(
                StepKind::Rotate,
                format!(
                    "{case} case: rotate {direction} at {}, lifting {}",
                    self.arena.key(pivot),
                    self.arena.key(child)
                ),
                self.arena.snapshot(),
            )
            .with_highlight([pivot, child])
            .with_rotation(info),
        );

        let Some(rotation) = self.arena.rotate(pivot, direction, slot) else {
            return pivot;
        };
        self.update_metrics(rotation.pivot);
        self.update_metrics(rotation.risen);

        let risen = self.arena.get(rotation.risen);
        recorder.push(
            TraceStep::new(
                StepKind::Rotated,
                format!(
                    "{} now roots this subtree (height {}), {} is its {} child (height {})",
                    risen.key,
                    risen.height,
                    self.arena.key(pivot),
                    direction,
                    self.arena.get(pivot).height
                ),
                self.arena.snapshot(),
            )
            .with_highlight([rotation.risen, pivot])
            .with_rotation(info),
        );
        rotation.risen
    }
}

/// Insert `key` into `tree`, returning the resulting tree and its trace.
pub fn avl_insert<K: TreeKey>(mut tree: AvlTree<K>, key: K) -> InsertOutcome<AvlTree<K>, K> {
    let trace = tree.insert(key);
    InsertOutcome { tree, trace }
}
