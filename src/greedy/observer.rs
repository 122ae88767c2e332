//! Selection observer: hooks for progress reporting, profiling and debugging.
//!
//! Observers are notified at phase boundaries and after every committed
//! selection. They only ever see finished results: nothing an observer does
//! can change which items are selected.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Dense warm-start phase: every unselected gain recomputed each round.
pub const PHASE_DENSE: &str = "dense";
/// Lazy phase: priority-queue driven, recomputing only promising items.
pub const PHASE_LAZY: &str = "lazy";

/// One committed selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionEvent {
    /// Zero-based position in the ranking.
    pub round: usize,
    /// Selected item index.
    pub item: usize,
    /// Marginal gain at the time of selection.
    pub gain: f64,
    /// Phase that picked the item.
    pub phase: &'static str,
    /// Gain evaluations spent on this round.
    pub evaluations: usize,
}

/// Wall-clock timer for a phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseClock(Instant);

impl PhaseClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Summary of one finished phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseReport {
    elapsed: Duration,
    selections: usize,
    evaluations: usize,
}

impl PhaseReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Items committed during the phase.
    pub fn selections(&self) -> usize {
        self.selections
    }

    /// Marginal gains computed during the phase.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Fluent construction of a [`PhaseReport`].
#[derive(Debug, Clone)]
pub struct PhaseReportBuilder {
    report: PhaseReport,
}

impl PhaseReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: PhaseReport::new(elapsed),
        }
    }

    pub fn selections(mut self, selections: usize) -> Self {
        self.report.selections = selections;
        self
    }

    pub fn evaluations(mut self, evaluations: usize) -> Self {
        self.report.evaluations = evaluations;
        self
    }

    pub fn build(self) -> PhaseReport {
        self.report
    }
}

/// Receives callbacks while a selection runs.
///
/// Every method has an empty default, so observers implement only what they
/// need.
pub trait SelectionObserver {
    fn on_phase_start(&mut self, _phase: &'static str) {}

    fn on_phase_end(&mut self, _phase: &'static str, _report: &PhaseReport) {}

    /// Called once per committed selection, in ranking order.
    fn on_select(&mut self, _event: &SelectionEvent) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}

/// Collects a [`PhaseReport`] per phase, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimingObserver {
    reports: Vec<(&'static str, PhaseReport)>,
}

impl PhaseTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, PhaseReport)] {
        &self.reports
    }

    /// Sum of evaluations across phases.
    pub fn total_evaluations(&self) -> usize {
        self.reports.iter().map(|(_, r)| r.evaluations()).sum()
    }
}

impl SelectionObserver for PhaseTimingObserver {
    fn on_phase_end(&mut self, phase: &'static str, report: &PhaseReport) {
        self.reports.push((phase, report.clone()));
    }
}

/// Records every [`SelectionEvent`].
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Vec<SelectionEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SelectionEvent] {
        &self.events
    }
}

impl SelectionObserver for RecordingObserver {
    fn on_select(&mut self, event: &SelectionEvent) {
        self.events.push(event.clone());
    }
}

/// Adapts a closure into a progress reporter.
///
/// ```
/// # use rapid_subset::greedy::observer::*;
/// let mut done = 0;
/// let mut progress = ProgressCallback(|_: &SelectionEvent| done += 1);
/// progress.on_select(&SelectionEvent {
///     round: 0,
///     item: 4,
///     gain: 1.5,
///     phase: PHASE_DENSE,
///     evaluations: 10,
/// });
/// drop(progress);
/// assert_eq!(done, 1);
/// ```
pub struct ProgressCallback<F>(pub F);

impl<F: FnMut(&SelectionEvent)> SelectionObserver for ProgressCallback<F> {
    fn on_select(&mut self, event: &SelectionEvent) {
        (self.0)(event)
    }
}
