//! Greedy maximization engine
//!
//! - [`kernel`]: parallel dense gain pass and masked argmax
//! - [`queue`]: indexed max-heap of stale gain bounds
//! - [`scheduler`]: the two-phase dense/lazy driver
//! - [`observer`]: progress and timing hooks

pub mod kernel;
pub mod observer;
pub mod queue;
pub mod scheduler;

pub use observer::{
    NoopObserver, PhaseReport, PhaseTimingObserver, ProgressCallback, RecordingObserver,
    SelectionEvent, SelectionObserver,
};
pub use queue::LazyMaxHeap;
pub use scheduler::{GreedySelector, SelectionState};
