//! Trace model for treetrace.
//!
//! An insertion produces a [`Trace`]: an ordered list of [`TraceStep`]s, each
//! carrying a deep [`Snapshot`] of the tree at that instant. Steps are built
//! once, appended through a [`TraceRecorder`], and never mutated afterwards,
//! so a renderer can replay them in any order.

pub mod recorder;
pub mod snapshot;
pub mod step;

pub use recorder::{Outcome, Trace, TraceRecorder};
pub use snapshot::{Annotation, Snapshot, SnapshotNode};
pub use step::{RotationCase, RotationInfo, StepKind, TraceStep};
pub use treetrace_ids::NodeId;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which child of a node. Mirror cases are expressed once in terms of a side
/// and its [`Side::opposite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Red-Black node color. An absent child counts as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite().opposite(), Side::Right);
    }

    #[test]
    fn side_and_color_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
        assert_eq!(serde_json::to_string(&Color::Black).unwrap(), "\"black\"");
    }
}
