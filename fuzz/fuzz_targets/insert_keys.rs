//! Fuzz harness for traced insertion
//!
//! Every pair of input bytes is one key. Both trees must hold their
//! invariants after each insertion, and every trace must open on the input
//! tree and close on the output tree.

#![no_main]

use libfuzzer_sys::fuzz_target;
use treetrace_avl::AvlTree;
use treetrace_rbtree::RedBlackTree;
use treetrace_trace::{Snapshot, Trace};
use treetrace_validate::validate;

fn check(before: &Snapshot<i16>, after: &Snapshot<i16>, trace: &Trace<i16>) {
    validate(after).unwrap();
    if !before.is_empty() {
        assert_eq!(trace.initial_snapshot(), Some(before));
    }
    assert_eq!(trace.final_snapshot(), Some(after));
    if trace.is_duplicate() {
        assert_eq!(before, after);
    }
}

fuzz_target!(|data: &[u8]| {
    let keys = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]));

    let mut avl = AvlTree::new();
    let mut rb = RedBlackTree::new();
    for key in keys {
        let before = avl.snapshot();
        let trace = avl.insert(key);
        check(&before, &avl.snapshot(), &trace);

        let before = rb.snapshot();
        let trace = rb.insert(key);
        check(&before, &rb.snapshot(), &trace);
    }
    assert_eq!(avl.in_order(), rb.in_order());
});
