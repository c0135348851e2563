//! Ordering rules: the final result order and the per-round candidate order.
//!
//! Contract:
//! - Final order is `(seats ↓, votes ↓, name ↑)`. It is part of the result,
//!   not presentation: downstream ties depend on it.
//! - Candidate order is `(metric ↓, votes ↓, name ↑)` and is applied on every
//!   round, so the outcome never depends on input order.
//! - Floats are compared with `total_cmp`; the order is total.

use core::cmp::Ordering;

use crate::entities::{Entity, SeatRow};

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// A total, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

#[inline]
fn final_cmp(a: (u32, f64, &str), b: (u32, f64, &str)) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| b.1.total_cmp(&a.1))
        .then_with(|| a.2.cmp(b.2))
}

impl StableOrd for SeatRow {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        final_cmp(
            (self.seats, self.votes, &self.name),
            (other.seats, other.votes, &other.name),
        )
    }
}

impl StableOrd for Entity {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        final_cmp(
            (self.seats, self.votes, &self.name),
            (other.seats, other.votes, &other.name),
        )
    }
}

/// Sort in place into final order.
#[inline]
pub fn sort_final<T: StableOrd>(xs: &mut [T]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}

/* -------------------------------------------------------------------------- */
/*                              Candidate ordering                            */
/* -------------------------------------------------------------------------- */

/// `Less` means `a` is the stronger candidate: metric ↓, votes ↓, name ↑.
#[inline]
pub fn cmp_by_metric(a: &Entity, b: &Entity) -> Ordering {
    b.metric
        .total_cmp(&a.metric)
        .then_with(|| b.votes.total_cmp(&a.votes))
        .then_with(|| a.name.cmp(&b.name))
}

/// Index of the strongest unforced entity, if any.
pub fn best_free(entities: &[Entity]) -> Option<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_free())
        .min_by(|(_, a), (_, b)| cmp_by_metric(a, b))
        .map(|(i, _)| i)
}

/// Indices of the unforced entities, strongest first.
pub fn rank_free(entities: &[Entity]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..entities.len()).filter(|&i| entities[i].is_free()).collect();
    idx.sort_by(|&a, &b| cmp_by_metric(&entities[a], &entities[b]));
    idx
}

/* ---------------------------------- Tests --------------------------------- */
