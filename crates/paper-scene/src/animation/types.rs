//! Core sequencing types: identifiers, run status, cancellation and errors.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique identifier for a sequencer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a sequencer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    /// Steps are still in flight (or the run has not been ticked yet).
    #[default]
    Running,
    /// Every entry settled.
    Finished,
    /// The run was stopped before it settled.
    Stopped,
}

impl SequenceStatus {
    pub fn is_done(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Shared cancellation flag for one sequencer run.
///
/// Clones observe the same flag, so a token handed to a run can be cancelled
/// by whoever else holds a clone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Malformed sequences, rejected before anything is applied.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AnimationError {
    #[error("entry {entry}: animation step has no target element")]
    MissingTarget { entry: usize },
    #[error("entry {entry}: target element '{target}' does not exist")]
    UnknownTarget { entry: usize, target: String },
    #[error("entry {entry}: element '{target}' appears more than once in a parallel group")]
    OverlappingTargets { entry: usize, target: String },
}
