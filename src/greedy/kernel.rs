//! Dense gain kernel
//!
//! Evaluates the marginal gain of every unselected item against one fixed
//! aggregate. Each slot of the output is written by exactly one worker and
//! every worker only reads the objective and the aggregate, so the pass
//! needs no synchronization.

use rayon::prelude::*;

use crate::objective::Objective;

/// Below this many items the pass runs on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 512;

/// Fill `gains[i]` with the marginal gain of item `i` for every `i` not in
/// `mask`; selected slots are set to 0.
///
/// The iteration space is always the full universe, so slot `i` always
/// belongs to item `i`. Returns the number of gains evaluated.
pub fn compute_gains<O: Objective>(
    objective: &O,
    state: &O::State,
    mask: &[bool],
    gains: &mut [f64],
) -> usize {
    debug_assert_eq!(mask.len(), gains.len());

    let eval = |(item, slot): (usize, &mut f64)| {
        *slot = if mask[item] {
            0.0
        } else {
            objective.marginal_gain(item, state)
        };
    };

    if gains.len() < PARALLEL_THRESHOLD {
        gains.iter_mut().enumerate().for_each(eval);
    } else {
        gains.par_iter_mut().enumerate().for_each(eval);
    }

    mask.iter().filter(|&&selected| !selected).count()
}

/// Index of the largest gain among unselected items.
///
/// Ties go to the lowest index; a later item only wins with a strictly
/// greater gain, so incomparable values never displace the incumbent.
/// Returns `None` when every item is selected.
pub fn argmax_unselected(gains: &[f64], mask: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (item, (&gain, &selected)) in gains.iter().zip(mask).enumerate() {
        if selected {
            continue;
        }
        match best {
            Some((_, best_gain)) if !(gain > best_gain) => {}
            _ => best = Some((item, gain)),
        }
    }
    best.map(|(item, _)| item)
}

/// First unselected item whose gain is NaN or infinite.
pub fn find_non_finite(gains: &[f64], mask: &[bool]) -> Option<usize> {
    gains
        .iter()
        .zip(mask)
        .position(|(gain, &selected)| !selected && !gain.is_finite())
}
