//! paper-scene: the interactive half of the paper viewer.
//!
//! Everything here is frame driven. The host owns the clock and calls
//! `update(delta_ms, surface)` once per frame; nothing spawns threads or
//! sleeps.

pub mod animation;
pub mod navigation;
pub mod pagination;
pub mod paper;
pub mod timers;
pub mod toolbar;

pub use animation::{
    AnimationError, AnimationId, AnimationSequence, AnimationSequencer, AnimationStep,
    CancelToken, EasingFunction, SequenceEntry, SequenceStatus, StyleValue,
};
pub use navigation::{BottomNavSide, TabShown};
pub use pagination::{
    DisplayHook, DisplayHooks, PageContent, PageOptions, PageSequencer, PaginationError, paginate,
};
pub use paper::{PageSpec, Paper, PaperError, PaperOptions};
pub use timers::Timers;
pub use toolbar::{
    ButtonName, ButtonTransition, ButtonUniverse, ToolbarController, ToolbarElements,
    ToolbarError, ToolbarTimings,
};
