//! Named rotation scenarios for treetrace-avl

use treetrace_avl::AvlTree;
use treetrace_testkit::{all_snapshots, avl_traces, build_avl, scenarios};
use treetrace_trace::{RotationCase, Side, StepKind, Trace};
use treetrace_validate::{check_bst_order, check_unique_ids, validate};

fn last_rotations(traces: &[Trace<i64>]) -> Vec<(RotationCase, Side)> {
    traces
        .last()
        .into_iter()
        .flat_map(|t| t.iter())
        .filter(|s| s.kind() == StepKind::Rotate)
        .filter_map(|s| s.rotation().map(|r| (r.case, r.direction)))
        .collect()
}

fn root_key(tree: &AvlTree<i64>) -> Option<i64> {
    tree.snapshot().root().map(|n| n.key)
}

#[test]
fn three_key_scenarios_rotate_once_into_a_perfect_tree() {
    let cases = [
        (scenarios::ASCENDING, vec![(RotationCase::RightRight, Side::Left)]),
        (scenarios::DESCENDING, vec![(RotationCase::LeftLeft, Side::Right)]),
        (
            scenarios::ZIGZAG_LEFT,
            vec![
                (RotationCase::LeftRight, Side::Left),
                (RotationCase::LeftRight, Side::Right),
            ],
        ),
        (
            scenarios::ZIGZAG_RIGHT,
            vec![
                (RotationCase::RightLeft, Side::Right),
                (RotationCase::RightLeft, Side::Left),
            ],
        ),
    ];

    for (keys, expected) in cases {
        let (tree, traces) = avl_traces(&keys);
        assert_eq!(last_rotations(&traces), expected, "keys {keys:?}");
        assert_eq!(root_key(&tree), Some(20), "keys {keys:?}");
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.in_order(), vec![&10, &20, &30]);
        assert!(validate(&tree.snapshot()).is_ok());
    }
}

#[test]
fn only_the_third_insert_rotates() {
    let (_, traces) = avl_traces(&scenarios::ZIGZAG_RIGHT);
    let rotations: Vec<usize> = traces.iter().map(|t| t.count(StepKind::Rotate)).collect();
    assert_eq!(rotations, vec![0, 0, 2]);
}

#[test]
fn every_scenario_snapshot_is_ordered() {
    let all: [&[i64]; 6] = [
        &scenarios::ASCENDING,
        &scenarios::DESCENDING,
        &scenarios::ZIGZAG_LEFT,
        &scenarios::ZIGZAG_RIGHT,
        &scenarios::RED_UNCLE,
        &scenarios::TRIANGLE,
    ];
    for keys in all {
        let (_, traces) = avl_traces(keys);
        for snapshot in all_snapshots(&traces) {
            assert!(check_bst_order(snapshot).is_ok(), "keys {keys:?}");
            assert!(check_unique_ids(snapshot).is_ok(), "keys {keys:?}");
        }
    }
}

#[test]
fn builder_matches_traced_insertion() {
    let (traced, _) = avl_traces(&scenarios::RED_UNCLE);
    let built = build_avl(&scenarios::RED_UNCLE);
    assert_eq!(built.snapshot(), traced.snapshot());
    assert_eq!(built.len(), 4);
}
