//! Property tests for treetrace-engine

use proptest::prelude::*;
use treetrace_config::{SessionConfig, TreeKind};
use treetrace_engine::{InsertStats, Session};
use treetrace_logging::LogLevel;
use treetrace_testkit::all_snapshots;
use treetrace_testkit::proptest::{strategy_distinct_keys, strategy_key_sequence_with_duplicates};
use treetrace_validate::{check_bst_order, check_unique_ids};

fn strategy_tree_kind() -> impl Strategy<Value = TreeKind> {
    prop_oneof![Just(TreeKind::Avl), Just(TreeKind::RedBlack)]
}

proptest! {
    /// One trace per requested key, whether or not the key was new
    #[test]
    fn prop_one_trace_per_key(kind in strategy_tree_kind(), keys in strategy_key_sequence_with_duplicates(60)) {
        let mut session = Session::new(SessionConfig::for_tree(kind));
        let inserted = session.insert_all(keys.iter().copied()).unwrap();
        prop_assert_eq!(session.traces().len(), keys.len());
        prop_assert_eq!(inserted, session.len());
        let duplicates = session.traces().iter().filter(|t| t.is_duplicate()).count();
        prop_assert_eq!(duplicates + inserted, keys.len());
    }

    /// Every snapshot the session recorded is an ordered tree with unique ids
    #[test]
    fn prop_recorded_snapshots_are_ordered(kind in strategy_tree_kind(), keys in strategy_distinct_keys(30)) {
        let mut session = Session::new(SessionConfig::for_tree(kind));
        session.insert_all(keys).unwrap();
        for snapshot in all_snapshots(session.traces()) {
            prop_assert!(check_bst_order(snapshot).is_ok());
            prop_assert!(check_unique_ids(snapshot).is_ok());
        }
    }

    /// Traces chain: each one opens where the previous one closed
    #[test]
    fn prop_traces_chain(kind in strategy_tree_kind(), keys in strategy_distinct_keys(30)) {
        let mut session = Session::new(SessionConfig::for_tree(kind));
        session.insert_all(keys).unwrap();
        for pair in session.traces().windows(2) {
            prop_assert_eq!(pair[0].final_snapshot(), pair[1].initial_snapshot());
        }
        prop_assert_eq!(
            session.last_trace().and_then(|t| t.final_snapshot()).cloned(),
            (!session.is_empty()).then(|| session.snapshot())
        );
    }

    /// Info and warn logs account for every insertion
    #[test]
    fn prop_logs_account_for_every_key(kind in strategy_tree_kind(), keys in strategy_key_sequence_with_duplicates(40)) {
        let mut session = Session::new(SessionConfig::for_tree(kind));
        session.insert_all(keys.iter().copied()).unwrap();
        let stats: Vec<InsertStats> = session.traces().iter().map(InsertStats::from_trace).collect();
        let warns = session.logs().filter_by_level(LogLevel::Warn).len();
        prop_assert_eq!(warns, stats.iter().filter(|s| s.duplicate).count());
        prop_assert!(session.logs().filter_by_level(LogLevel::Error).is_empty());
    }
}
