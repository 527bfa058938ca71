//! Sequenced style animations for surface elements.
//!
//! ```text
//! AnimationSequence
//!   ├── SequenceEntry::Single(AnimationStep)
//!   └── SequenceEntry::Parallel(Vec<AnimationStep>)
//!
//! AnimationSequencer
//!   └── runs one sequence against a Surface, one update(dt) per frame
//! ```

pub mod easing;
pub mod sequencer;
pub mod step;
pub mod types;

pub use easing::EasingFunction;
pub use sequencer::AnimationSequencer;
pub use step::{AnimationSequence, AnimationStep, Completion, SequenceEntry, StyleValue};
pub use types::{AnimationError, AnimationId, CancelToken, SequenceStatus};
