//! Adjusted divisor allocation: search for one global divisor whose rounded
//! quotients sum to the target.
//!
//! Contract:
//! - `count(d)`: every entity gets `round(votes / d)` under the chosen
//!   rounding, clamped into `[min, max]` with the side recorded.
//! - Start at `d₀ = Σ votes / N`; an exact count returns at once.
//! - Bracket: double `d` while the count is over target, halve it while under.
//!   If every entity is stuck (at its minimum while over, at its maximum or
//!   voteless while under) the call ends `Infeasible` with that allocation.
//! - Search: false position between the bracket ends, falling back to the
//!   midpoint once the same end has moved twice in a row. Ends `Approximate`
//!   (last computed allocation) when the relative bracket width drops to the
//!   tolerance or a step bound in `Limits` runs out.
//! - `metric` is unused and stays 0.

use ap_core::{
    AllocError, Apportionment, BoundaryDirection, Completion, Contender, Entity, Limits, Rounding,
    SeatBounds,
};
use tracing::{debug, trace, warn};

use crate::validate;

/// One evaluation of the seat count at a divisor.
struct Probe {
    divisor: f64,
    entities: Vec<Entity>,
    total: u64,
}

impl Probe {
    fn at(rounding: Rounding, contenders: &[Contender], divisor: f64, bounds: &SeatBounds) -> Self {
        let entities: Vec<Entity> = contenders
            .iter()
            .map(|c| {
                let raw = rounding.apply(c.votes / divisor) as u32;
                let (seats, dir) = bounds.clamp(raw);
                let mut e = Entity::new(c.name.clone(), c.votes, seats);
                e.direction = dir;
                e
            })
            .collect();
        let total = entities.iter().map(|e| u64::from(e.seats)).sum();
        trace!(divisor, total, "probe");
        Self { divisor, entities, total }
    }

    /// Over target and no entity can lose a seat.
    fn stuck_over(&self, rounding: Rounding) -> bool {
        self.entities.iter().all(|e| {
            e.direction == BoundaryDirection::ForcedMin || e.seats <= rounding.least_seats(e.votes)
        })
    }

    /// Under target and no entity can gain a seat.
    fn stuck_under(&self) -> bool {
        self.entities
            .iter()
            .all(|e| e.direction == BoundaryDirection::ForcedMax || e.votes == 0.0)
    }
}

/// Allocate with default [`Limits`].
pub fn allocate_adjusted_divisor(
    rounding: Rounding,
    contenders: &[Contender],
    num_seats: u32,
    bounds: SeatBounds,
) -> Result<Apportionment, AllocError> {
    allocate_adjusted_divisor_with_limits(rounding, contenders, num_seats, bounds, &Limits::default())
}

/// Variant taking explicit engine limits (step bounds and tolerance).
pub fn allocate_adjusted_divisor_with_limits(
    rounding: Rounding,
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
    validate::check_positive_total(contenders.iter().map(|c| c.votes))?;

    let target = u64::from(num_seats);
    let total_votes: f64 = contenders.iter().map(|c| c.votes).sum();
    let d0 = total_votes / f64::from(num_seats);
    debug!(%rounding, num_seats, ?bounds, d0, "adjusted divisor");

    let first = Probe::at(rounding, contenders, d0, &bounds);
    if first.total == target {
        return Ok(conclude(rounding, num_seats, first, Completion::Exact));
    }

    // ---- bracket ----
    // over: count > target (divisor too small); under: count < target.
    let (mut over, mut under, mut last) = if first.total > target {
        let mut over = first;
        let mut found = None;
        for _ in 0..limits.max_bracket_steps {
            let p = Probe::at(rounding, contenders, over.divisor * 2.0, &bounds);
            if p.total == target {
                return Ok(conclude(rounding, num_seats, p, Completion::Exact));
            }
            if p.total < target {
                found = Some(p);
                break;
            }
            over = p;
            if over.stuck_over(rounding) {
                return Ok(conclude(rounding, num_seats, over, Completion::Infeasible));
            }
        }
        match found {
            Some(under) => (over, under, Side::Under),
            None => return Ok(conclude(rounding, num_seats, over, Completion::Approximate)),
        }
    } else {
        let mut under = first;
        let mut found = None;
        for _ in 0..limits.max_bracket_steps {
            let p = Probe::at(rounding, contenders, under.divisor / 2.0, &bounds);
            if p.total == target {
                return Ok(conclude(rounding, num_seats, p, Completion::Exact));
            }
            if p.total > target {
                found = Some(p);
                break;
            }
            under = p;
            if under.stuck_under() {
                return Ok(conclude(rounding, num_seats, under, Completion::Infeasible));
            }
        }
        match found {
            Some(over) => (over, under, Side::Over),
            None => return Ok(conclude(rounding, num_seats, under, Completion::Approximate)),
        }
    };

    // ---- false position ----
    let mut streak = 0u32;

    for step in 0..limits.max_search_steps {
        let width = (under.divisor - over.divisor).abs();
        let scale = under.divisor.abs().max(over.divisor.abs());
        if width <= limits.relative_tolerance * scale {
            debug!(step, width, "bracket closed without exact count");
            break;
        }

        let d = if streak >= 2 {
            0.5 * (over.divisor + under.divisor)
        } else {
            let (oc, uc, t) = (over.total as f64, under.total as f64, target as f64);
            over.divisor + (under.divisor - over.divisor) * (oc - t) / (oc - uc)
        };

        let p = Probe::at(rounding, contenders, d, &bounds);
        if p.total == target {
            debug!(step, divisor = d, "exact divisor found");
            return Ok(conclude(rounding, num_seats, p, Completion::Exact));
        }
        let side = if p.total > target { Side::Over } else { Side::Under };
        // Only count repeats after the bracket phase hand-off.
        streak = if step > 0 && side == last { streak + 1 } else { 1 };
        last = side;
        match side {
            Side::Over => over = p,
            Side::Under => under = p,
        }
    }

    let latest = match last {
        Side::Over => over,
        Side::Under => under,
    };
    Ok(conclude(rounding, num_seats, latest, Completion::Approximate))
}

fn conclude(rounding: Rounding, num_seats: u32, p: Probe, completion: Completion) -> Apportionment {
    if completion != Completion::Exact {
        warn!(
            %rounding,
            ?completion,
            divisor = p.divisor,
            target_seats = num_seats,
            awarded = p.total,
            "adjusted divisor inexact"
        );
    }
    Apportionment::from_entities(&p.entities, num_seats, completion)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Over,
    Under,
}

/// Look the rounding up by name, then allocate.
pub fn adjusted_divisor(
    rounding_name: &str,
    contenders: &[Contender],
    num_seats: u32,
    min_seats: Option<u32>,
    max_seats: Option<u32>,
) -> Result<Apportionment, AllocError> {
    let rounding: Rounding = rounding_name.parse()?;
    let bounds = SeatBounds::new(min_seats, max_seats)?;
    allocate_adjusted_divisor(rounding, contenders, num_seats, bounds)
}
