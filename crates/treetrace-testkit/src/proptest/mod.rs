//! Proptest strategies for treetrace property-based testing.

pub mod strategies;

pub use strategies::{
    strategy_ascending_keys, strategy_distinct_keys, strategy_key, strategy_key_sequence_with_duplicates,
};
