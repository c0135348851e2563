//! Initial seats for highest-averages runs.

use ap_core::{AllocError, Contender, Entity, SeatBounds, Seeded};
use tracing::debug;

use crate::allocation::constraints::enforce_bounds;
use crate::validate;

/// Give every contender the same starting seat count.
pub fn seed(contenders: &[Contender], initial: u32) -> Vec<Seeded> {
    contenders
        .iter()
        .map(|c| Seeded { name: c.name.clone(), votes: c.votes, seats: initial })
        .collect()
}

/// Rounded-down seed: `floor(votes / Hare quota)` per contender, with entities
/// outside `[min, max]` pinned by the bounds loop. Input order is kept.
pub fn seed_rounded_down(
    contenders: &[Contender],
    num_seats: u32,
    bounds: SeatBounds,
) -> Result<Vec<Seeded>, AllocError> {
    validate::check_weights(contenders.iter().map(|c| (c.name.as_str(), c.votes)))?;
    validate::check_seats(num_seats)?;
    bounds.check()?;

    let mut entities: Vec<Entity> = contenders.iter().map(Entity::from).collect();
    let budget = enforce_bounds(&mut entities, num_seats, 0, &bounds);
    debug!(num_seats, budget, "rounded-down seed");

    Ok(entities
        .into_iter()
        .map(|e| Seeded { name: e.name, votes: e.votes, seats: e.seats })
        .collect())
}
