//! Largest remainder (quota) allocation with uniform seat bounds.
//!
//! Contract:
//! - Quota kinds by denominator offset: Hare `N`, Droop `N + 1`, Imperiali `N + 2`.
//! - Floors and bound pinning come from the shared bounds loop
//!   (`constraints::enforce_bounds`).
//! - Leftover seats go to free entities by remainder ↓, votes ↓, name ↑; the
//!   ranking is reused cyclically, skipping entities that reach the cap.
//! - If floors exceed the free budget the whole attempt is redone with the
//!   offset lowered by one. Attempts are bounded by `Limits::max_quota_attempts`.
//! - When the pins leave the total off target although `len·min ≤ N ≤ len·max`,
//!   single seats are moved within `[min, max]` (`constraints::settle_total`).
//! - Minimums that over-commit the target, or a state with no free entity
//!   left, end the call as `Completion::Infeasible` with every pin marked.

use ap_core::determinism::rank_free;
use ap_core::{
    AllocError, Apportionment, BoundaryDirection, Completion, Contender, Entity, Limits,
    QuotaAdjust, SeatBounds,
};
use tracing::{debug, trace, warn};

use super::constraints::{enforce_bounds, free_seats, settle_total};
use crate::validate;

/// Allocate with default [`Limits`].
pub fn allocate_largest_remainder(
    quota: QuotaAdjust,
    contenders: &[Contender],
    num_seats: u32,
    bounds: SeatBounds,
) -> Result<Apportionment, AllocError> {
    allocate_largest_remainder_with_limits(quota, contenders, num_seats, bounds, &Limits::default())
}

/// Variant taking explicit engine limits (retry bound).
pub fn allocate_largest_remainder_with_limits(
    quota: QuotaAdjust,
    contenders: &[Contender],
    num_seats: u32,
    bounds: SeatBounds,
    limits: &Limits,
) -> Result<Apportionment, AllocError> {
    validate::check_call(
        contenders.iter().map(|c| (c.name.as_str(), c.votes)),
        num_seats,
        &bounds,
        limits,
    )?;
    debug!(%quota, num_seats, ?bounds, entities = contenders.len(), "largest remainder");

    let mut adjust = quota.offset();
    for attempt in 1..=limits.max_quota_attempts {
        let mut entities: Vec<Entity> = contenders.iter().map(Entity::from).collect();
        let budget = enforce_bounds(&mut entities, num_seats, adjust, &bounds);

        if budget < 0 || !entities.iter().any(Entity::is_free) {
            return Ok(finish(&mut entities, num_seats, &bounds));
        }

        let floors = free_seats(&entities);
        if floors > budget {
            warn!(attempt, adjust, floors, budget, "quota over-allocates; lowering quota offset");
            adjust -= 1;
            continue;
        }

        award_remainders(&mut entities, (budget - floors) as u64, &bounds);
        return Ok(finish(&mut entities, num_seats, &bounds));
    }

    Err(AllocError::RetryBoundExceeded { attempts: limits.max_quota_attempts })
}

/// Look the quota up by name, then allocate.
pub fn largest_remainder(
    quota_name: &str,
    contenders: &[Contender],
    num_seats: u32,
    min_seats: Option<u32>,
    max_seats: Option<u32>,
) -> Result<Apportionment, AllocError> {
    let quota: QuotaAdjust = quota_name.parse()?;
    let bounds = SeatBounds::new(min_seats, max_seats)?;
    allocate_largest_remainder(quota, contenders, num_seats, bounds)
}

/// Hand out `extra` seats by remainder rank, cycling when seats outnumber
/// candidates. A pass that places nothing (everyone capped) stops the award.
fn award_remainders(entities: &mut [Entity], mut extra: u64, bounds: &SeatBounds) {
    let ranking = rank_free(entities);
    let cap = bounds.max_seats();

    while extra > 0 {
        let mut placed = false;
        for &i in &ranking {
            if extra == 0 {
                break;
            }
            let e = &mut entities[i];
            if !e.is_free() {
                continue;
            }
            // A floor equal to the cap is within bounds but cannot grow.
            if e.seats >= cap {
                e.direction = BoundaryDirection::ForcedMax;
                continue;
            }
            e.seats += 1;
            extra -= 1;
            placed = true;
            trace!(name = %e.name, seats = e.seats, remainder = e.metric, "remainder seat");
            if e.seats >= cap {
                e.direction = BoundaryDirection::ForcedMax;
            }
        }
        if !placed {
            break;
        }
    }
}

fn finish(entities: &mut [Entity], num_seats: u32, bounds: &SeatBounds) -> Apportionment {
    settle_total(entities, num_seats, bounds);
    let awarded: u64 = entities.iter().map(|e| u64::from(e.seats)).sum();
    let completion = if awarded == u64::from(num_seats) {
        Completion::Exact
    } else {
        warn!(target_seats = num_seats, awarded, "largest remainder infeasible under bounds");
        Completion::Infeasible
    };
    Apportionment::from_entities(entities, num_seats, completion)
}
