//! Append-only step collection and the finished trace.

use crate::snapshot::Snapshot;
use crate::step::{StepKind, TraceStep};
use serde::{Deserialize, Serialize};

/// Collects the steps of exactly one insertion.
#[derive(Debug)]
pub struct TraceRecorder<K> {
    steps: Vec<TraceStep<K>>,
}

impl<K> Default for TraceRecorder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TraceRecorder<K> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a drafted step, stamping its position.
    pub fn push(&mut self, step: TraceStep<K>) {
        let index = self.steps.len();
        self.steps.push(step.with_index(index));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_kind(&self) -> Option<StepKind> {
        self.steps.last().map(TraceStep::kind)
    }

    pub fn finish(self) -> Trace<K> {
        Trace { steps: self.steps }
    }
}

/// How an insertion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Inserted,
    Duplicate,
}

/// The finished, read-only record of one insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace<K> {
    steps: Vec<TraceStep<K>>,
}

impl<K> Trace<K> {
    pub fn steps(&self) -> &[TraceStep<K>] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceStep<K>> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<&TraceStep<K>> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&TraceStep<K>> {
        self.steps.last()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(TraceStep::kind).collect()
    }

    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind() == kind).count()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.last().map(TraceStep::kind) {
            Some(StepKind::Complete) => Some(Outcome::Inserted),
            Some(StepKind::Duplicate) => Some(Outcome::Duplicate),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.outcome() == Some(Outcome::Duplicate)
    }

    pub fn is_complete(&self) -> bool {
        self.outcome() == Some(Outcome::Inserted)
    }

    pub fn initial_snapshot(&self) -> Option<&Snapshot<K>> {
        self.first().map(TraceStep::snapshot)
    }

    pub fn final_snapshot(&self) -> Option<&Snapshot<K>> {
        self.last().map(TraceStep::snapshot)
    }
}

impl<'a, K> IntoIterator for &'a Trace<K> {
    type Item = &'a TraceStep<K>;
    type IntoIter = std::slice::Iter<'a, TraceStep<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
