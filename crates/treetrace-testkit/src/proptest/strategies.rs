use proptest::prelude::*;

/// Keys drawn from a range wide enough that collisions are rare.
pub fn strategy_key() -> impl Strategy<Value = i64> {
    -10_000i64..10_000
}

/// Up to `max` distinct keys in random insertion order.
pub fn strategy_distinct_keys(max: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(strategy_key(), 0..=max)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Up to `max` keys from a narrow range, so repeats are common.
pub fn strategy_key_sequence_with_duplicates(max: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-20i64..20, 0..=max)
}

/// Sorted distinct keys; the worst case for an unbalanced tree.
pub fn strategy_ascending_keys(max: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(strategy_key(), 0..=max).prop_map(|set| set.into_iter().collect())
}
