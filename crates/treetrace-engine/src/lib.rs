//! Tree sessions for treetrace.
//!
//! A [`Session`] owns exactly one in-memory tree of the configured kind and
//! is its only writer. Every insertion produces a fresh [`Trace`] that is
//! appended to the session history; traces from different insertions are
//! never merged.

use treetrace_avl::AvlTree;
use treetrace_config::{SessionConfig, TreeKind, validate_config};
use treetrace_error::{Result, TreeError, invariant_error};
use treetrace_logging::{LogCollector, LogEntry, LogLevel};
use treetrace_rbtree::RedBlackTree;
use treetrace_trace::{Snapshot, StepKind, Trace};

/// Keys accepted by sessions.
pub type Key = i64;

/// Either balanced tree behind one interface.
#[derive(Debug, Clone)]
pub enum AnyTree {
    Avl(AvlTree<Key>),
    RedBlack(RedBlackTree<Key>),
}

impl AnyTree {
    pub fn new(kind: TreeKind) -> Self {
        match kind {
            TreeKind::Avl => AnyTree::Avl(AvlTree::new()),
            TreeKind::RedBlack => AnyTree::RedBlack(RedBlackTree::new()),
        }
    }

    pub fn kind(&self) -> TreeKind {
        match self {
            AnyTree::Avl(_) => TreeKind::Avl,
            AnyTree::RedBlack(_) => TreeKind::RedBlack,
        }
    }

    pub fn insert(&mut self, key: Key) -> Trace<Key> {
        match self {
            AnyTree::Avl(tree) => tree.insert(key),
            AnyTree::RedBlack(tree) => tree.insert(key),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Key> {
        match self {
            AnyTree::Avl(tree) => tree.snapshot(),
            AnyTree::RedBlack(tree) => tree.snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyTree::Avl(tree) => tree.len(),
            AnyTree::RedBlack(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: Key) -> bool {
        match self {
            AnyTree::Avl(tree) => tree.contains(&key),
            AnyTree::RedBlack(tree) => tree.contains(&key),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            AnyTree::Avl(tree) => tree.height(),
            AnyTree::RedBlack(tree) => tree.height(),
        }
    }

    pub fn in_order(&self) -> Vec<Key> {
        match self {
            AnyTree::Avl(tree) => tree.in_order().into_iter().copied().collect(),
            AnyTree::RedBlack(tree) => tree.in_order().into_iter().copied().collect(),
        }
    }
}

/// Counts summarizing one trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertStats {
    pub steps: usize,
    pub comparisons: usize,
    pub rotations: usize,
    pub recolors: usize,
    pub duplicate: bool,
}

impl InsertStats {
    pub fn from_trace<K>(trace: &Trace<K>) -> Self {
        Self {
            steps: trace.len(),
            comparisons: trace.count(StepKind::Compare),
            rotations: trace.count(StepKind::Rotate),
            recolors: trace.count(StepKind::Recolor),
            duplicate: trace.is_duplicate(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    tree: AnyTree,
    traces: Vec<Trace<Key>>,
    log: LogCollector,
}

impl Session {
    /// An empty session; `config.keys` are not inserted.
    pub fn new(config: SessionConfig) -> Self {
        let log = LogCollector::with_config(config.logging.clone());
        Self {
            tree: AnyTree::new(config.tree),
            config,
            traces: Vec::new(),
            log,
        }
    }

    /// A session seeded with `config.keys`, inserted in order.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        validate_config(&config)?;
        let keys = config.keys.clone();
        let mut session = Self::new(config);
        session.insert_all(keys)?;
        Ok(session)
    }

    pub fn kind(&self) -> TreeKind {
        self.tree.kind()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tree(&self) -> &AnyTree {
        &self.tree
    }

    /// Insert one key and keep its trace.
    ///
    /// With `verify` enabled, the finished trace is checked against the tree
    /// before it is returned; a failure means the engine is broken.
    pub fn insert(&mut self, key: Key) -> Result<&Trace<Key>> {
        let component = self.kind().component();
        let before = self.config.verify.then(|| self.tree.snapshot());
        let trace = self.tree.insert(key);

        for step in &trace {
            self.log.log(
                LogLevel::Trace,
                component,
                format!("#{} {}: {}", step.index(), step.kind(), step.message()),
            );
        }

        if let Some(before) = before {
            if let Err(err) = self.verify(&before, &trace) {
                let err = err
                    .with_context("tree", self.kind())
                    .with_context("inserted", key);
                self.log.log(LogLevel::Error, component, err.to_string());
                return Err(err);
            }
        }

        let stats = InsertStats::from_trace(&trace);
        if stats.duplicate {
            self.log.log(
                LogLevel::Warn,
                component,
                format!("duplicate key {key} ignored"),
            );
        } else {
            self.log.log(
                LogLevel::Info,
                component,
                format!(
                    "inserted {key} in {} steps ({} rotations, {} recolors), size {}",
                    stats.steps,
                    stats.rotations,
                    stats.recolors,
                    self.tree.len()
                ),
            );
        }
        self.log.log(
            LogLevel::Debug,
            component,
            format!("tree height {} after {key}", self.tree.height()),
        );

        let index = self.traces.len();
        self.traces.push(trace);
        Ok(&self.traces[index])
    }

    /// Insert keys in order. Returns how many were new.
    pub fn insert_all(&mut self, keys: impl IntoIterator<Item = Key>) -> Result<usize> {
        let mut inserted = 0;
        for key in keys {
            if !self.insert(key)?.is_duplicate() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn verify(&self, before: &Snapshot<Key>, trace: &Trace<Key>) -> Result<()> {
        let after = self.tree.snapshot();
        let Some(last) = trace.last() else {
            return Err(invariant_error("insertion produced an empty trace"));
        };
        if last.snapshot() != &after {
            return Err(invariant_error("final trace snapshot differs from the tree")
                .with_context("step", last.index()));
        }
        if !before.is_empty() && trace.initial_snapshot() != Some(before) {
            return Err(invariant_error("first trace snapshot differs from the input tree"));
        }
        match last.kind() {
            StepKind::Duplicate => {
                if &after != before {
                    return Err(invariant_error("duplicate insertion changed the tree"));
                }
                Ok(())
            }
            StepKind::Complete => treetrace_validate::validate(&after),
            other => Err(invariant_error("trace ended without a terminal step")
                .with_context("kind", other)),
        }
    }

    pub fn snapshot(&self) -> Snapshot<Key> {
        self.tree.snapshot()
    }

    pub fn traces(&self) -> &[Trace<Key>] {
        &self.traces
    }

    pub fn last_trace(&self) -> Option<&Trace<Key>> {
        self.traces.last()
    }

    pub fn logs(&self) -> &LogCollector {
        &self.log
    }

    /// Take the log entries gathered so far.
    pub fn drain_logs(&mut self) -> Vec<LogEntry> {
        self.log.drain()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.tree.contains(key)
    }

    pub fn in_order(&self) -> Vec<Key> {
        self.tree.in_order()
    }
}

impl From<Session> for AnyTree {
    fn from(session: Session) -> Self {
        session.tree
    }
}

/// Verify a standalone snapshot, attaching the tree kind on failure.
pub fn verify_snapshot(kind: TreeKind, snapshot: &Snapshot<Key>) -> Result<()> {
    treetrace_validate::validate(snapshot).map_err(|e: TreeError| e.with_context("tree", kind))
}
