//! Highest averages (divisor) allocation: sequential seat awards.
//!
//! Contract:
//! - Each entity starts from its seed seats with `metric = votes / d(seats)`;
//!   a seed already at or above `max_seats` is pinned `ForcedMax`, metric 0.
//! - Every round awards one seat to the strongest unforced entity
//!   (metric ↓, votes ↓, name ↑), then recomputes its metric, pinning it
//!   `ForcedMax` when it reaches the cap.
//! - The loop stops when the target is met or nobody is left unforced.
//! - Zero-vote entities carry metric 0.
//!
//! Determinism:
//! - The tie-break is applied on every round, so input order never matters.
//!
//! Failure:
//! - `SingularDivisor` when `d(seats) == 0` for an unforced entity with votes.

use ap_core::determinism::best_free;
use ap_core::{AllocError, Apportionment, BoundaryDirection, Completion, Divisor, Entity, Seeded};
use tracing::{debug, trace, warn};

use crate::validate;

/// Allocate `num_seats` with the divisor `divisor`, starting from seeded seats.
pub fn allocate_highest_averages(
    divisor: Divisor,
    seeded: &[Seeded],
    num_seats: u32,
    max_seats: Option<u32>,
) -> Result<Apportionment, AllocError> {
    validate::check_weights(seeded.iter().map(|s| (s.name.as_str(), s.votes)))?;
    validate::check_seats(num_seats)?;

    let cap = max_seats.unwrap_or(u32::MAX);
    let mut entities: Vec<Entity> = seeded.iter().map(Entity::from).collect();

    for e in entities.iter_mut() {
        if e.seats >= cap {
            e.pin(cap, BoundaryDirection::ForcedMax);
        } else if e.votes > 0.0 && divisor.value(e.seats) <= 0.0 {
            return Err(AllocError::SingularDivisor { divisor, entity: e.name.clone() });
        } else {
            e.metric = average(divisor, e);
        }
    }

    let seeded_total: u64 = entities.iter().map(|e| u64::from(e.seats)).sum();
    let mut remaining = u64::from(num_seats).saturating_sub(seeded_total);
    debug!(%divisor, num_seats, seeded_total, entities = entities.len(), "highest averages");

    while remaining > 0 {
        let Some(i) = best_free(&entities) else {
            break;
        };
        let e = &mut entities[i];
        e.seats += 1;
        remaining -= 1;
        trace!(name = %e.name, seats = e.seats, metric = e.metric, "award");
        if e.seats >= cap {
            e.pin(cap, BoundaryDirection::ForcedMax);
        } else {
            e.metric = average(divisor, e);
        }
    }

    let out = finish(&entities, num_seats);
    if !out.is_exact() {
        warn!(%divisor, target_seats = num_seats, awarded = out.awarded(), "highest averages infeasible under bounds");
    }
    Ok(out)
}

/// Look the divisor up by name, then allocate.
pub fn highest_averages(
    divisor_name: &str,
    seeded: &[Seeded],
    num_seats: u32,
    max_seats: Option<u32>,
) -> Result<Apportionment, AllocError> {
    let divisor: Divisor = divisor_name.parse()?;
    allocate_highest_averages(divisor, seeded, num_seats, max_seats)
}

#[inline]
fn average(divisor: Divisor, e: &Entity) -> f64 {
    if e.votes == 0.0 {
        0.0
    } else {
        e.votes / divisor.value(e.seats)
    }
}

fn finish(entities: &[Entity], num_seats: u32) -> Apportionment {
    let awarded: u64 = entities.iter().map(|e| u64::from(e.seats)).sum();
    let completion = if awarded == u64::from(num_seats) {
        Completion::Exact
    } else {
        Completion::Infeasible
    };
    Apportionment::from_entities(entities, num_seats, completion)
}
