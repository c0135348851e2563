//! Input checks run before any seat is awarded.
//!
//! Feasibility of the bounds (`Σ min ≤ N ≤ Σ max`) is deliberately absent:
//! infeasible bounds are an outcome (`Completion::Infeasible`), not an input error.

use std::collections::BTreeSet;

use ap_core::{InputError, Limits, SeatBounds};

/// Names unique, votes finite and non-negative, list non-empty.
pub fn check_weights<'a, I>(items: I) -> Result<(), InputError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (name, votes) in items {
        if !votes.is_finite() {
            return Err(InputError::NonFiniteVotes(name.to_string()));
        }
        if votes < 0.0 {
            return Err(InputError::NegativeVotes(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(InputError::DuplicateName(name.to_string()));
        }
    }
    if seen.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(())
}

pub fn check_seats(num_seats: u32) -> Result<(), InputError> {
    if num_seats == 0 {
        return Err(InputError::NoSeats);
    }
    Ok(())
}

/// Shared preamble for the bounded allocators.
pub fn check_call<'a, I>(
    items: I,
    num_seats: u32,
    bounds: &SeatBounds,
    limits: &Limits,
) -> Result<(), InputError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    check_weights(items)?;
    check_seats(num_seats)?;
    bounds.check()?;
    limits.validate()
}

pub fn check_positive_total<I: IntoIterator<Item = f64>>(votes: I) -> Result<(), InputError> {
    if votes.into_iter().sum::<f64>() > 0.0 {
        Ok(())
    } else {
        Err(InputError::NoVotes)
    }
}
