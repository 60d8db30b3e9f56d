use crate::TreeKey;
use crate::arena::{Arena, ArenaNode, Slot};
use std::cmp::Ordering;
use treetrace_ids::NodeId;
use treetrace_trace::{Side, StepKind, TraceRecorder, TraceStep};

/// Outcome of the ordered-insertion primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// A node was created. `path` lists every ancestor, root first, with the
    /// side taken below it; the last entry is the new node's parent.
    Inserted {
        id: NodeId,
        path: Vec<(NodeId, Side)>,
    },
    /// The key was already present at this node; nothing changed.
    Duplicate(NodeId),
}

impl Insertion {
    pub fn inserted(&self) -> Option<NodeId> {
        match self {
            Insertion::Inserted { id, .. } => Some(*id),
            Insertion::Duplicate(_) => None,
        }
    }
}

/// Where a descent for a key stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub path: Vec<(NodeId, Side)>,
    pub found: Option<NodeId>,
}

impl Descent {
    /// The empty slot a new node for the key would fill.
    pub fn vacancy(&self) -> Slot {
        match self.path.last() {
            Some(&(parent, side)) => Slot::Child(parent, side),
            None => Slot::Root,
        }
    }
}

/// Walk from the root toward `key`, recording a compare step per visited
/// node and a descend step per edge taken. Stops at an equal key (recording
/// the duplicate no-op) or at an empty subtree. Never mutates the arena.
pub fn descend<N>(arena: &Arena<N>, key: &N::Key, recorder: &mut TraceRecorder<N::Key>) -> Descent
where
    N: ArenaNode,
    N::Key: TreeKey,
{
    let snapshot = arena.snapshot();
    let mut path = Vec::new();
    let mut cursor = arena.root();
    while let Some(id) = cursor {
        let here = arena.key(id);
        recorder.push(
            TraceStep::new(
                StepKind::Compare,
                format!("compare {key} with {here}"),
                snapshot.clone(),
            )
            .with_highlight([id]),
        );
        let side = match key.cmp(here) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                recorder.push(
                    TraceStep::new(
                        StepKind::Duplicate,
                        format!("{key} is already in the tree; nothing inserted"),
                        snapshot,
                    )
                    .with_highlight([id]),
                );
                return Descent {
                    path,
                    found: Some(id),
                };
            }
        };
        let next = arena.child(id, side);
        let message = match (side, next) {
            (Side::Left, Some(_)) => format!("{key} < {here}: go left"),
            (Side::Right, Some(_)) => format!("{key} > {here}: go right"),
            (Side::Left, None) => format!("{key} < {here}: left subtree is empty"),
            (Side::Right, None) => format!("{key} > {here}: right subtree is empty"),
        };
        recorder.push(
            TraceStep::new(StepKind::descend(side), message, snapshot.clone())
                .with_highlight(std::iter::once(id).chain(next)),
        );
        path.push((id, side));
        cursor = next;
    }
    Descent { path, found: None }
}

/// Ordered insertion: descend, then hang a fresh node in the empty slot.
///
/// `make` receives the new node's id, its key and its parent. Duplicates end
/// the walk with no structural change.
pub fn insert<N>(
    arena: &mut Arena<N>,
    key: N::Key,
    make: impl FnOnce(NodeId, N::Key, Option<NodeId>) -> N,
    recorder: &mut TraceRecorder<N::Key>,
) -> Insertion
where
    N: ArenaNode,
    N::Key: TreeKey,
{
    let descent = descend(arena, &key, recorder);
    if let Some(found) = descent.found {
        return Insertion::Duplicate(found);
    }

    let slot = descent.vacancy();
    let parent = descent.path.last().map(|&(p, _)| p);
    let message = match slot {
        Slot::Root => format!("insert {key} as the root"),
        Slot::Child(p, side) => format!("insert {key} as the {side} child of {}", arena.key(p)),
    };
    let id = arena.alloc(|id| make(id, key, parent));
    arena.set_slot(slot, Some(id));
    recorder.push(
        TraceStep::new(StepKind::Insert, message, arena.snapshot())
            .with_highlight(std::iter::once(id).chain(parent)),
    );

    Insertion::Inserted {
        id,
        path: descent.path,
    }
}
