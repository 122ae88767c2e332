//! Two-phase greedy scheduler
//!
//! Rounds `0..n_greedy_samples` run densely: every unselected gain is
//! recomputed against the current aggregate and the argmax is committed.
//! The remaining rounds run lazily off a [`LazyMaxHeap`] seeded with the
//! last dense gains. Because gains only shrink as the selection grows, a
//! stale heap key is an upper bound on the true gain, and a round can stop
//! as soon as its best refreshed gain beats every remaining bound.
//!
//! Both phases break ties toward the lower item index, so for any split
//! point the ranking is the one a fully dense run would produce.

use crate::errors::{Error, Result};
use crate::greedy::kernel::{argmax_unselected, compute_gains, find_non_finite};
use crate::greedy::observer::{
    PhaseClock, PhaseReportBuilder, SelectionEvent, SelectionObserver, PHASE_DENSE, PHASE_LAZY,
};
use crate::greedy::queue::LazyMaxHeap;
use crate::objective::Objective;
use crate::types::Selection;

/// Everything that changes as items are committed.
///
/// `mask[i]` is true exactly when `i` appears in `ranking`, and `aggregate`
/// always describes the items in `ranking`.
#[derive(Debug, Clone)]
pub struct SelectionState<S> {
    mask: Vec<bool>,
    ranking: Vec<usize>,
    gains: Vec<f64>,
    aggregate: S,
}

impl<S: Clone> SelectionState<S> {
    pub fn new<O: Objective<State = S>>(objective: &O) -> Self {
        Self {
            mask: vec![false; objective.num_items()],
            ranking: Vec::new(),
            gains: Vec::new(),
            aggregate: objective.initial_state(),
        }
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    pub fn aggregate(&self) -> &S {
        &self.aggregate
    }

    pub fn is_selected(&self, item: usize) -> bool {
        self.mask.get(item).copied().unwrap_or(false)
    }

    /// Append `item` to the ranking and fold it into the aggregate.
    pub(crate) fn commit<O: Objective<State = S>>(&mut self, objective: &O, item: usize, gain: f64) {
        debug_assert!(!self.mask[item], "item {item} committed twice");
        objective.commit(item, &mut self.aggregate);
        self.mask[item] = true;
        self.ranking.push(item);
        self.gains.push(gain);
    }

    fn into_selection<O: Objective<State = S>>(self, objective: &O, evaluations: usize) -> Selection {
        Selection {
            objective_value: objective.value(&self.aggregate),
            ranking: self.ranking,
            gains: self.gains,
            evaluations,
        }
    }
}

/// Error for a NaN or infinite gain.
fn non_finite_gain<O: Objective>(objective: &O, item: usize, gain: f64) -> Error {
    Error::config(format!(
        "{} produced a non-finite gain ({gain}) for item {item}",
        objective.name()
    ))
}

/// Greedy maximizer for `k` items with a dense warm-start of
/// `n_greedy_samples` rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedySelector {
    k: usize,
    n_greedy_samples: usize,
}

impl GreedySelector {
    /// Fully dense selector for `k` items.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_greedy_samples: k,
        }
    }

    /// Number of dense rounds; values above `k` behave like `k`.
    pub fn with_greedy_samples(mut self, n: usize) -> Self {
        self.n_greedy_samples = n;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn greedy_samples(&self) -> usize {
        self.n_greedy_samples.min(self.k)
    }

    /// Select `k` items maximizing `objective`.
    ///
    /// Fails with [`Error::Configuration`] when `k` exceeds the number of
    /// items, before any gain is evaluated.
    pub fn run<O: Objective>(
        &self,
        objective: &O,
        observer: &mut impl SelectionObserver,
    ) -> Result<Selection> {
        let n = objective.num_items();
        if self.k > n {
            return Err(Error::config(format!(
                "cannot select {} items from a universe of {n}",
                self.k
            )));
        }

        let mut state = SelectionState::new(objective);
        if self.k == 0 {
            return Ok(state.into_selection(objective, 0));
        }

        let warm = self.greedy_samples();
        let mut gains = vec![0.0; n];
        let mut evaluations = 0;

        if warm > 0 {
            evaluations += self.dense_phase(objective, &mut state, &mut gains, warm, observer)?;
        }
        if warm < self.k {
            evaluations += self.lazy_phase(objective, &mut state, &mut gains, observer)?;
        }

        debug_event!(
            objective = objective.name(),
            k = self.k,
            evaluations,
            "selection complete"
        );
        Ok(state.into_selection(objective, evaluations))
    }

    fn dense_phase<O: Objective>(
        &self,
        objective: &O,
        state: &mut SelectionState<O::State>,
        gains: &mut [f64],
        rounds: usize,
        observer: &mut impl SelectionObserver,
    ) -> Result<usize> {
        trace_phase!(PHASE_DENSE);
        observer.on_phase_start(PHASE_DENSE);
        let clock = PhaseClock::start();
        let mut evaluations = 0;

        for round in 0..rounds {
            let round_evals = compute_gains(objective, &state.aggregate, &state.mask, gains);
            evaluations += round_evals;
            if let Some(bad) = find_non_finite(gains, &state.mask) {
                return Err(non_finite_gain(objective, bad, gains[bad]));
            }

            let item = argmax_unselected(gains, &state.mask).ok_or(Error::EmptyQueue {
                round,
                requested: self.k,
                available: objective.num_items(),
            })?;
            let gain = gains[item];
            state.commit(objective, item, gain);

            debug_event!(round, item, gain, phase = PHASE_DENSE, "selected");
            observer.on_select(&SelectionEvent {
                round,
                item,
                gain,
                phase: PHASE_DENSE,
                evaluations: round_evals,
            });
        }

        let report = PhaseReportBuilder::new(clock.elapsed())
            .selections(rounds)
            .evaluations(evaluations)
            .build();
        debug_event!(phase = PHASE_DENSE, rounds, evaluations, "phase complete");
        observer.on_phase_end(PHASE_DENSE, &report);
        Ok(evaluations)
    }

    /// Finish the rounds left after the dense phase.
    ///
    /// `gains` holds the last dense pass, computed before that round's
    /// commit, so every unselected entry is an upper bound on the current
    /// gain. With no dense rounds the buffer is seeded with one exact pass.
    fn lazy_phase<O: Objective>(
        &self,
        objective: &O,
        state: &mut SelectionState<O::State>,
        gains: &mut [f64],
        observer: &mut impl SelectionObserver,
    ) -> Result<usize> {
        trace_phase!(PHASE_LAZY);
        observer.on_phase_start(PHASE_LAZY);
        let clock = PhaseClock::start();
        let start = state.ranking.len();
        let mut evaluations = 0;

        if start == 0 {
            evaluations += compute_gains(objective, &state.aggregate, &state.mask, gains);
            if let Some(bad) = find_non_finite(gains, &state.mask) {
                return Err(non_finite_gain(objective, bad, gains[bad]));
            }
        }

        let mut queue: LazyMaxHeap<usize> = LazyMaxHeap::with_capacity(gains.len() - start);
        queue.extend(
            gains
                .iter()
                .enumerate()
                .filter(|&(item, _)| !state.mask[item])
                .map(|(item, &gain)| (item, gain)),
        );

        for round in start..self.k {
            let mut round_evals = 0;
            // Best exactly-evaluated candidate this round.
            let mut best: Option<(usize, f64)> = None;

            let (item, gain) = loop {
                let (candidate, bound) = queue.pop_max().ok_or(Error::EmptyQueue {
                    round,
                    requested: self.k,
                    available: objective.num_items(),
                })?;

                if let Some((best_item, best_gain)) = best {
                    // its key was refreshed this round, so it is exact
                    if candidate == best_item {
                        break (best_item, best_gain);
                    }
                    if best_gain > bound || (best_gain == bound && best_item <= candidate) {
                        queue.insert_or_update(candidate, bound);
                        queue.remove(&best_item);
                        break (best_item, best_gain);
                    }
                }

                let gain = objective.marginal_gain(candidate, &state.aggregate);
                round_evals += 1;
                if !gain.is_finite() {
                    return Err(non_finite_gain(objective, candidate, gain));
                }
                queue.insert_or_update(candidate, gain);

                let improves = match best {
                    None => true,
                    Some((best_item, best_gain)) => {
                        gain > best_gain || (gain == best_gain && candidate < best_item)
                    }
                };
                if improves {
                    best = Some((candidate, gain));
                }
            };

            evaluations += round_evals;
            state.commit(objective, item, gain);

            debug_event!(round, item, gain, phase = PHASE_LAZY, round_evals, "selected");
            observer.on_select(&SelectionEvent {
                round,
                item,
                gain,
                phase: PHASE_LAZY,
                evaluations: round_evals,
            });
        }

        let report = PhaseReportBuilder::new(clock.elapsed())
            .selections(self.k - start)
            .evaluations(evaluations)
            .build();
        debug_event!(phase = PHASE_LAZY, rounds = self.k - start, evaluations, "phase complete");
        observer.on_phase_end(PHASE_LAZY, &report);
        Ok(evaluations)
    }
}
