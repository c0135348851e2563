//! Bounds loop shared by largest remainder and the rounded-down seed.
//!
//! Contract:
//! - Each pass recomputes a quota over the *free* entities only:
//!   `quota = Σ free votes / (N − Σ forced seats + adjust)`.
//! - Free entities get `floor(votes / quota)`. A pass pins one side only:
//!   entities above `max` first, and entities below `min` only in a pass with
//!   nobody above `max`. Max pins release seats and shrink the quota; min pins
//!   claim seats and grow it, so no max violator appears after a min pass.
//!   A pinned entity is never revisited.
//! - A pass that pins nobody is the fixed point. Every other pass pins at least
//!   one entity, so the loop ends within `len + 1` passes.
//! - `settle_total` moves single seats afterwards when the two bounds together
//!   still leave the total off target although `len·min ≤ N ≤ len·max`.
//! - A non-positive denominator or zero free votes yields an unbounded quota:
//!   floors are 0 and the remainder is the raw vote count.

use core::cmp::Ordering;

use ap_core::{BoundaryDirection, Entity, SeatBounds};
use tracing::{debug, trace};

/// Run the loop to its fixed point. Free entities end with their floor seats
/// and `metric = votes − quota·seats`. Returns the seat budget left for free
/// entities (`N − Σ forced seats`), which is negative when pinned minimums
/// already exceed `N`.
pub fn enforce_bounds(
    entities: &mut [Entity],
    num_seats: u32,
    adjust: i64,
    bounds: &SeatBounds,
) -> i64 {
    let mut budget = i64::from(num_seats);

    for pass in 0..=entities.len() {
        let forced: i64 = entities
            .iter()
            .filter(|e| !e.is_free())
            .map(|e| i64::from(e.seats))
            .sum();
        budget = i64::from(num_seats) - forced;

        if !entities.iter().any(Entity::is_free) {
            break;
        }
        let free_votes: f64 = entities.iter().filter(|e| e.is_free()).map(|e| e.votes).sum();

        let denom = budget + adjust;
        let quota = if denom > 0 && free_votes > 0.0 {
            Some(free_votes / denom as f64)
        } else {
            None
        };

        let floor_of = |votes: f64| match quota {
            Some(q) => (votes / q).floor() as u32,
            None => 0,
        };
        let over_max = entities
            .iter()
            .any(|e| e.is_free() && floor_of(e.votes) > bounds.max_seats());
        let side = if over_max {
            BoundaryDirection::ForcedMax
        } else {
            BoundaryDirection::ForcedMin
        };

        let mut newly_pinned = 0usize;
        for e in entities.iter_mut().filter(|e| e.is_free()) {
            let floor = floor_of(e.votes);
            match bounds.clamp(floor) {
                (s, dir) if dir == side => {
                    e.pin(s, dir);
                    newly_pinned += 1;
                }
                // In range, or a min violator waiting for the max side to settle.
                _ => {
                    e.seats = floor;
                    e.metric = match quota {
                        Some(q) => e.votes - q * f64::from(floor),
                        None => e.votes,
                    };
                }
            }
        }

        trace!(pass, budget, ?quota, ?side, newly_pinned, "bounds pass");
        if newly_pinned == 0 {
            break;
        }
    }

    budget
}

/// Σ seats over the free entities.
pub fn free_seats(entities: &[Entity]) -> i64 {
    entities.iter().filter(|e| e.is_free()).map(|e| i64::from(e.seats)).sum()
}

/// Bring Σ seats to `num_seats` one seat at a time when the bounds allow it
/// (`len·min ≤ N ≤ len·max`). A missing seat goes to the entity with the
/// highest `votes / (seats + 1)` below `max`; a surplus seat leaves the entity
/// with the lowest `votes / seats` above `min`. Ties: votes, then name.
/// A gaining entity that reaches `max` is marked `ForcedMax`; any other moved
/// entity becomes `Unforced`. Returns the number of seats moved.
pub fn settle_total(entities: &mut [Entity], num_seats: u32, bounds: &SeatBounds) -> u64 {
    let target = u64::from(num_seats);
    let len = entities.len() as u64;
    let (lo, hi) = (bounds.min_seats(), bounds.max_seats());
    if len * u64::from(lo) > target || len.saturating_mul(u64::from(hi)) < target {
        return 0;
    }

    let mut total: u64 = entities.iter().map(|e| u64::from(e.seats)).sum();
    let mut moved = 0u64;

    while total < target {
        let Some(i) = pick(entities, |e| e.seats < hi, |e| e.votes / f64::from(e.seats + 1), true)
        else {
            break;
        };
        let e = &mut entities[i];
        e.seats += 1;
        e.direction = if e.seats >= hi {
            BoundaryDirection::ForcedMax
        } else {
            BoundaryDirection::Unforced
        };
        trace!(name = %e.name, seats = e.seats, "settle: seat added");
        total += 1;
        moved += 1;
    }

    while total > target {
        let Some(i) = pick(entities, |e| e.seats > lo, |e| e.votes / f64::from(e.seats), false)
        else {
            break;
        };
        let e = &mut entities[i];
        e.seats -= 1;
        e.direction = BoundaryDirection::Unforced;
        trace!(name = %e.name, seats = e.seats, "settle: seat removed");
        total -= 1;
        moved += 1;
    }

    if moved > 0 {
        debug!(moved, target_seats = num_seats, "bounds settled by single-seat moves");
    }
    moved
}

/// Strongest (`strongest = true`) or weakest eligible entity by `claim`,
/// then votes, then name.
fn pick(
    entities: &[Entity],
    eligible: impl Fn(&Entity) -> bool,
    claim: impl Fn(&Entity) -> f64,
    strongest: bool,
) -> Option<usize> {
    let order = |a: &Entity, b: &Entity| -> Ordering {
        claim(b)
            .total_cmp(&claim(a))
            .then_with(|| b.votes.total_cmp(&a.votes))
            .then_with(|| a.name.cmp(&b.name))
    };
    let candidates = entities.iter().enumerate().filter(|(_, e)| eligible(*e));
    let found = if strongest {
        candidates.min_by(|(_, a), (_, b)| order(*a, *b))
    } else {
        candidates.max_by(|(_, a), (_, b)| order(*a, *b))
    };
    found.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ents(v: &[(&str, f64)]) -> Vec<Entity> {
        v.iter().map(|&(n, x)| Entity::new(n, x, 0)).collect()
    }

    #[test]
    fn unbounded_pass_gives_hare_floors_and_remainders() {
        let mut es = ents(&[("A", 60.0), ("B", 30.0), ("C", 10.0)]);
        let budget = enforce_bounds(&mut es, 4, 0, &SeatBounds::NONE);
        assert_eq!(budget, 4);
        let seats: Vec<u32> = es.iter().map(|e| e.seats).collect();
        assert_eq!(seats, vec![2, 1, 0]);
        assert!((es[0].metric - 10.0).abs() < 1e-9);
        assert!((es[2].metric - 10.0).abs() < 1e-9);
        assert!(es.iter().all(Entity::is_free));
    }

    #[test]
    fn minimum_pins_and_shrinks_budget() {
        let mut es = ents(&[("A", 90.0), ("B", 5.0), ("C", 5.0)]);
        let budget = enforce_bounds(&mut es, 10, 0, &SeatBounds::with_min(1));
        assert_eq!(es[1].direction, BoundaryDirection::ForcedMin);
        assert_eq!(es[2].direction, BoundaryDirection::ForcedMin);
        assert_eq!(budget, 8);
        assert_eq!(es[0].seats, 8);
    }

    #[test]
    fn maximum_cascades_over_passes() {
        // A is capped first; the redistributed budget then pushes B over the cap.
        let mut es = ents(&[("A", 70.0), ("B", 25.0), ("C", 5.0)]);
        let budget = enforce_bounds(&mut es, 10, 0, &SeatBounds::with_max(4));
        assert_eq!(es[0].direction, BoundaryDirection::ForcedMax);
        assert_eq!(es[1].direction, BoundaryDirection::ForcedMax);
        assert_eq!(es[2].seats, 2);
        assert_eq!(budget, 2);
    }

    #[test]
    fn overcommitted_minimums_give_negative_budget() {
        let mut es = ents(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
        let budget = enforce_bounds(&mut es, 2, 0, &SeatBounds::with_min(1));
        // floor(1 / (3/2)) = 0 < 1 for everyone
        assert!(es.iter().all(|e| e.direction == BoundaryDirection::ForcedMin));
        assert_eq!(budget, -1);
    }

    #[test]
    fn max_side_settles_before_minimums_are_pinned() {
        // Pinning both sides in one pass would pin all six with seats to spare.
        let mut es = ents(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0), ("E", 1.0), ("F", 9.0)]);
        let bounds = SeatBounds { min: Some(1), max: Some(2) };
        let budget = enforce_bounds(&mut es, 8, 0, &bounds);
        assert_eq!(es[5].direction, BoundaryDirection::ForcedMax);
        assert_eq!(es[5].seats, 2);
        assert!(es[..5].iter().all(|e| e.is_free() && e.seats == 1));
        assert_eq!(budget, 6);
        assert_eq!(free_seats(&es), 5);
    }

    #[test]
    fn settle_takes_back_from_capped_entity() {
        // A is capped first; the voteless pair then claims its minimums, one seat too many.
        let mut es = ents(&[("A", 100.0), ("C", 0.0), ("D", 0.0)]);
        let bounds = SeatBounds { min: Some(1), max: Some(2) };
        let budget = enforce_bounds(&mut es, 3, 0, &bounds);
        assert_eq!(budget, -1);
        assert_eq!(settle_total(&mut es, 3, &bounds), 1);
        let seats: Vec<u32> = es.iter().map(|e| e.seats).collect();
        assert_eq!(seats, vec![1, 1, 1]);
        assert_eq!(es[0].direction, BoundaryDirection::Unforced);
        assert_eq!(es[1].direction, BoundaryDirection::ForcedMin);
    }

    #[test]
    fn settle_leaves_infeasible_bounds_alone() {
        let mut es = ents(&[("A", 60.0), ("B", 40.0)]);
        for e in es.iter_mut() {
            e.pin(2, BoundaryDirection::ForcedMax);
        }
        assert_eq!(settle_total(&mut es, 5, &SeatBounds::with_max(2)), 0);
        assert!(es.iter().all(|e| e.seats == 2));
    }

    #[test]
    fn zero_free_votes_mean_unbounded_quota() {
        let mut es = ents(&[("A", 0.0), ("B", 0.0)]);
        let budget = enforce_bounds(&mut es, 3, 0, &SeatBounds::NONE);
        assert_eq!(budget, 3);
        assert_eq!(free_seats(&es), 0);
    }
}
