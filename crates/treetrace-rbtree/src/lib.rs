//! Red-Black tree with traced insertion.
//!
//! New nodes start red. The fixup walks upward through parent ids while a
//! node and its parent are both red, choosing between recoloring (red uncle)
//! and rotation (black or absent uncle). Each case is written once against
//! the side the parent hangs on; the mirror orientation swaps that side.

use treetrace_bst::{Arena, ArenaNode, InsertOutcome, Insertion, Slot, TreeKey};
use treetrace_ids::NodeId;
use treetrace_trace::{
    Annotation, Color, RotationCase, RotationInfo, Side, Snapshot, StepKind, Trace,
    TraceRecorder, TraceStep,
};

#[derive(Debug, Clone)]
pub struct RbNode<K> {
    id: NodeId,
    key: K,
    color: Color,
    /// Non-owning upward link; `None` at the root.
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K> RbNode<K> {
    fn red(id: NodeId, key: K, parent: Option<NodeId>) -> Self {
        Self {
            id,
            key,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl<K> ArenaNode for RbNode<K> {
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
        Annotation::RedBlack { color: self.color }
    }
}

#[derive(Debug, Clone)]
pub struct RedBlackTree<K> {
    arena: Arena<RbNode<K>>,
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
}

impl<K: TreeKey> RedBlackTree<K> {
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
        u32::try_from(self.arena.height()).unwrap_or(u32::MAX)
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.arena.root()
    }

    pub fn node(&self, key: &K) -> Option<&RbNode<K>> {
        self.arena.find(key).map(|id| self.arena.get(id))
    }

    /// Black nodes on the leftmost root-to-empty path.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.arena.root();
        while let Some(id) = cursor {
            if self.arena.get(id).color == Color::Black {
                count += 1;
            }
            cursor = self.arena.child(id, Side::Left);
        }
        count
    }

    pub fn in_order(&self) -> Vec<&K> {
        self.arena.in_order()
    }

    pub fn snapshot(&self) -> Snapshot<K> {
        self.arena.snapshot()
    }

    /// Insert `key` as a red node, repair red-red violations, and return the trace.
    ///
    /// A duplicate key leaves the tree untouched and the trace ends in a
    /// [`StepKind::Duplicate`] step.
    pub fn insert(&mut self, key: K) -> Trace<K> {
        let mut recorder = TraceRecorder::new();
        let inserted = treetrace_bst::insert(&mut self.arena, key, RbNode::red, &mut recorder);
        let Insertion::Inserted { id, .. } = inserted else {
            return recorder.finish();
        };

        self.fix_red_red(id, &mut recorder);
        self.blacken_root(&mut recorder);

        recorder.push(
            TraceStep::new(
                StepKind::Complete,
                format!("{} inserted; red-black rules hold", self.arena.key(id)),
                self.arena.snapshot(),
            )
            .with_highlight([id]),
        );
        recorder.finish()
    }

    /// Absent nodes are black.
    fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.arena.get(id).color)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).parent
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena.get_mut(id).color = color;
    }

    fn slot_of(&self, id: NodeId) -> Slot {
        match self.parent(id) {
            Some(parent) => match self.arena.side_of(parent, id) {
                Some(side) => Slot::Child(parent, side),
                None => Slot::Root,
            },
            None => Slot::Root,
        }
    }

    fn fix_red_red(&mut self, inserted: NodeId, recorder: &mut TraceRecorder<K>) {
        let mut current = inserted;
        while let Some(parent) = self.parent(current) {
            if self.color(Some(parent)) != Color::Red {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.parent(parent) else {
                break;
            };
            recorder.push(
                TraceStep::new(
                    StepKind::Violation,
                    format!(
                        "red-red violation: {} and its parent {} are both red",
                        self.arena.key(current),
                        self.arena.key(parent)
                    ),
                    self.arena.snapshot(),
                )
                .with_highlight([current, parent]),
            );

            let Some(side) = self.arena.side_of(grand, parent) else {
                break;
            };
            let uncle = self.arena.child(grand, side.opposite());
            let uncle_color = self.color(uncle);
            let message = match uncle {
                Some(u) => format!(
                    "uncle of {} is {} ({uncle_color}); parent is the {side} child of {}",
                    self.arena.key(current),
                    self.arena.key(u),
                    self.arena.key(grand)
                ),
                None => format!(
                    "uncle of {} is absent (black); parent is the {side} child of {}",
                    self.arena.key(current),
                    self.arena.key(grand)
                ),
            };
            recorder.push(
                TraceStep::new(StepKind::CheckUncle, message, self.arena.snapshot())
                    .with_highlight(uncle.into_iter().chain([grand])),
            );

            if let Some(uncle) = uncle.filter(|_| uncle_color == Color::Red) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                recorder.push(
                    TraceStep::new(
                        StepKind::Recolor,
                        format!(
                            "red uncle: recolor {} and {} black, {} red",
                            self.arena.key(parent),
                            self.arena.key(uncle),
                            self.arena.key(grand)
                        ),
                        self.arena.snapshot(),
                    )
                    .with_highlight([parent, uncle, grand]),
                );
                current = grand;
                continue;
            }

            let mut parent = parent;
            if self.arena.child(parent, side.opposite()) == Some(current) {
                self.rotate(parent, side, RotationCase::Triangle, recorder);
                std::mem::swap(&mut current, &mut parent);
            }

            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            recorder.push(
                TraceStep::new(
                    StepKind::Recolor,
                    format!(
                        "black uncle: recolor {} black and {} red",
                        self.arena.key(parent),
                        self.arena.key(grand)
                    ),
                    self.arena.snapshot(),
                )
                .with_highlight([parent, grand]),
            );
            self.rotate(grand, side.opposite(), RotationCase::Line, recorder);
            break;
        }
    }

    fn blacken_root(&mut self, recorder: &mut TraceRecorder<K>) {
        let Some(root) = self.arena.root() else {
            return;
        };
        if self.color(Some(root)) == Color::Black {
            return;
        }
        self.set_color(root, Color::Black);
        recorder.push(
            TraceStep::new(
                StepKind::Recolor,
                format!("root {} recolored black", self.arena.key(root)),
                self.arena.snapshot(),
            )
            .with_highlight([root]),
        );
    }

    /// Rotate at `pivot`, then repair the parent links of the three nodes
    /// whose position changed. Updates the root when `pivot` was the root.
    fn rotate(
        &mut self,
        pivot: NodeId,
        direction: Side,
        case: RotationCase,
        recorder: &mut TraceRecorder<K>,
    ) {
        let Some(child) = self.arena.child(pivot, direction.opposite()) else {
            return;
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

        let above = self.parent(pivot);
        let slot = self.slot_of(pivot);
        let Some(rotation) = self.arena.rotate(pivot, direction, slot) else {
            return;
        };
        self.arena.get_mut(rotation.risen).parent = above;
        self.arena.get_mut(pivot).parent = Some(rotation.risen);
        if let Some(moved) = rotation.moved {
            self.arena.get_mut(moved).parent = Some(pivot);
        }

        recorder.push(
            TraceStep::new(
                StepKind::Rotated,
                format!(
                    "{} moved up; {} is now its {direction} child",
                    self.arena.key(rotation.risen),
                    self.arena.key(pivot)
                ),
                self.arena.snapshot(),
            )
            .with_highlight([rotation.risen, pivot])
            .with_rotation(info),
        );
    }
}

/// Insert `key` into `tree`, returning the resulting tree and its trace.
pub fn rb_insert<K: TreeKey>(mut tree: RedBlackTree<K>, key: K) -> InsertOutcome<RedBlackTree<K>, K> {
    let trace = tree.insert(key);
    InsertOutcome { tree, trace }
}
