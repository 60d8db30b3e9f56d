use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a tree node.
///
/// The rule is simple:
/// - an id is assigned once, when the node is created, and never changes.
/// - ids are only used to correlate nodes across trace snapshots, never for ordering keys.
///
/// Ids are dense per tree (`0, 1, 2, ...` in creation order), which makes them
/// double as arena slots inside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed() {
        assert_eq!(NodeId(7).to_string(), "n7");
    }

    #[test]
    fn index_round_trips() {
        assert_eq!(NodeId::from_index(42).index(), 42);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&NodeId(3)).unwrap();
        assert_eq!(json, "3");
    }
}
