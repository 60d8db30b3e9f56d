//! Plain-text rendering for snapshots and traces.
//!
//! Trees are drawn top-down with box-drawing connectors, left child first.
//! Highlighted nodes carry a trailing `*`.

use std::fmt::Display;
use treetrace_trace::{Annotation, NodeId, Snapshot, SnapshotNode, Trace, TraceStep};

fn label<K: Display>(node: &SnapshotNode<K>, highlighted: &[NodeId]) -> String {
    let mut out = match node.annotation {
        Annotation::Avl { height, balance } => format!("{} (h={height}, bf={balance})", node.key),
        Annotation::RedBlack { color } => format!("{} ({color})", node.key),
    };
    if highlighted.contains(&node.id) {
        out.push_str(" *");
    }
    out
}

fn write_children<K: Display>(
    out: &mut String,
    node: &SnapshotNode<K>,
    prefix: &str,
    highlighted: &[NodeId],
) {
    let children: Vec<(&str, &SnapshotNode<K>)> = [("L", node.left.as_deref()), ("R", node.right.as_deref())]
        .into_iter()
        .filter_map(|(tag, child)| child.map(|c| (tag, c)))
        .collect();
    let count = children.len();
    for (i, (tag, child)) in children.into_iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        out.push_str(&format!("{prefix}{connector}{tag}: {}\n", label(child, highlighted)));
        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
        write_children(out, child, &nested, highlighted);
    }
}

/// Draw a snapshot, marking `highlighted` nodes.
pub fn render_snapshot_highlighted<K: Display>(
    snapshot: &Snapshot<K>,
    highlighted: &[NodeId],
) -> String {
    let Some(root) = snapshot.root() else {
        return "(empty)\n".to_string();
    };
    let mut out = String::new();
    out.push_str(&format!("{}\n", label(root, highlighted)));
    write_children(&mut out, root, "", highlighted);
    out
}

pub fn render_snapshot<K: Display>(snapshot: &Snapshot<K>) -> String {
    render_snapshot_highlighted(snapshot, &[])
}

/// Header line plus the step's tree with its highlights.
pub fn render_step<K: Display>(step: &TraceStep<K>) -> String {
    let mut out = format!("#{} {}: {}\n", step.index(), step.kind(), step.message());
    out.push_str(&render_snapshot_highlighted(step.snapshot(), step.highlighted()));
    out
}

/// Every step, separated by blank lines.
pub fn render_trace<K: Display>(trace: &Trace<K>) -> String {
    trace
        .iter()
        .map(render_step)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per step without trees.
pub fn render_summary<K>(trace: &Trace<K>) -> String {
    let mut out = String::new();
    for step in trace {
        out.push_str(&format!("#{} {}: {}\n", step.index(), step.kind(), step.message()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use treetrace_avl::AvlTree;
    use treetrace_rbtree::RedBlackTree;

    #[test]
    fn empty_tree() {
        let snap: Snapshot<i64> = Snapshot::empty();
        assert_eq!(render_snapshot(&snap), "(empty)\n");
    }

    #[test]
    fn avl_after_rr_rotation() {
        let tree = AvlTree::from_keys([10_i64, 20, 30]);
        insta::assert_snapshot!(render_snapshot(&tree.snapshot()), @r"
        20 (h=2, bf=0)
        ├── L: 10 (h=1, bf=0)
        └── R: 30 (h=1, bf=0)
        ");
    }

    #[test]
    fn red_black_nested_prefixes() {
        let tree = RedBlackTree::from_keys([20_i64, 10, 30, 5, 25]);
        insta::assert_snapshot!(render_snapshot(&tree.snapshot()), @r"
        20 (black)
        ├── L: 10 (black)
        │   └── L: 5 (red)
        └── R: 30 (black)
            └── L: 25 (red)
        ");
    }

    #[test]
    fn lone_right_child_under_last_branch() {
        let tree = RedBlackTree::from_keys([1_i64, 2, 3, 4]);
        insta::assert_snapshot!(render_snapshot(&tree.snapshot()), @r"
        2 (black)
        ├── L: 1 (black)
        └── R: 3 (black)
            └── R: 4 (red)
        ");
    }

    #[test]
    fn step_marks_highlighted_nodes() {
        let mut tree = RedBlackTree::new();
        let trace = tree.insert(7_i64);
        let text = render_step(&trace.steps()[0]);
        assert_eq!(text, "#0 insert: insert 7 as the root\n7 (red) *\n");
    }

    #[test]
    fn summary_lists_every_step() {
        let mut tree = AvlTree::from_keys([30_i64, 10]);
        let trace = tree.insert(20);
        let summary = render_summary(&trace);
        assert_eq!(summary.lines().count(), trace.len());
        assert!(summary.contains("LR case: rotate left at 10, lifting 20"));
        assert!(summary.ends_with("every balance factor is within [-1, 1]\n"));
    }

    #[test]
    fn summary_terminates_every_line() {
        let mut tree = AvlTree::new();
        let trace = tree.insert(1_i64);
        assert_eq!(
            render_summary(&trace),
            "#0 insert: insert 1 as the root\n#1 complete: 1 inserted; every balance factor is within [-1, 1]\n"
        );
    }

    #[test]
    fn full_trace_separates_steps() {
        let mut tree = AvlTree::new();
        let trace = tree.insert(1_i64);
        assert_eq!(
            render_trace(&trace),
            "#0 insert: insert 1 as the root\n1 (h=1, bf=0) *\n\n#1 complete: 1 inserted; every balance factor is within [-1, 1]\n1 (h=1, bf=0) *\n"
        );
    }
}
