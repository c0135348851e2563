//! Entity records shared by every allocator and collaborator.
//!
//! - `Contender`: caller input `(name, votes)`.
//! - `Seeded`: a contender carrying initial seats.
//! - `Entity`: the working record an allocator mutates in place.
//! - `SeatRow` / `Apportionment`: the result, always in final order.
//! - `SeatBounds`: uniform per-entity minimum / maximum.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::determinism::sort_final;
use crate::errors::InputError;

/// A named weight (votes or population) competing for seats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contender {
    pub name: String,
    pub votes: f64,
}

impl Contender {
    pub fn new(name: impl Into<String>, votes: f64) -> Self {
        Self { name: name.into(), votes }
    }
}

/// A contender with a starting seat count.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Seeded {
    pub name: String,
    pub votes: f64,
    pub seats: u32,
}

impl From<&Contender> for Seeded {
    fn from(c: &Contender) -> Self {
        Self { name: c.name.clone(), votes: c.votes, seats: 0 }
    }
}

/// Whether an entity's seat count was pinned to a bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryDirection {
    ForcedMin,
    #[default]
    Unforced,
    ForcedMax,
}

impl BoundaryDirection {
    #[inline]
    pub fn is_forced(self) -> bool {
        self != BoundaryDirection::Unforced
    }

    /// One-character marker used in tables: `<` min, `>` max, blank otherwise.
    pub fn marker(self) -> &'static str {
        match self {
            BoundaryDirection::ForcedMin => "<",
            BoundaryDirection::Unforced => "",
            BoundaryDirection::ForcedMax => ">",
        }
    }
}

/// Working record. Once `direction` is forced, `seats` is final for the call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    pub name: String,
    pub votes: f64,
    pub seats: u32,
    pub direction: BoundaryDirection,
    /// Current average (highest averages) or remainder (largest remainder).
    pub metric: f64,
}

impl Entity {
    pub fn new(name: impl Into<String>, votes: f64, seats: u32) -> Self {
        Self {
            name: name.into(),
            votes,
            seats,
            direction: BoundaryDirection::Unforced,
            metric: 0.0,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        !self.direction.is_forced()
    }

    /// Fix the seat count at a bound; the entity leaves the candidate pool.
    pub fn pin(&mut self, seats: u32, direction: BoundaryDirection) {
        self.seats = seats;
        self.direction = direction;
        self.metric = 0.0;
    }

    /// Back to the unforced state with no seats.
    pub fn reset(&mut self) {
        self.seats = 0;
        self.direction = BoundaryDirection::Unforced;
        self.metric = 0.0;
    }

    pub fn to_row(&self) -> SeatRow {
        SeatRow {
            name: self.name.clone(),
            votes: self.votes,
            seats: self.seats,
            direction: self.direction,
        }
    }
}

impl From<&Seeded> for Entity {
    fn from(s: &Seeded) -> Self {
        Entity::new(s.name.clone(), s.votes, s.seats)
    }
}

impl From<&Contender> for Entity {
    fn from(c: &Contender) -> Self {
        Entity::new(c.name.clone(), c.votes, 0)
    }
}

/// One result row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatRow {
    pub name: String,
    pub votes: f64,
    pub seats: u32,
    pub direction: BoundaryDirection,
}

/// Uniform seat bounds applied to every entity. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl SeatBounds {
    pub const NONE: SeatBounds = SeatBounds { min: None, max: None };

    pub fn new(min: Option<u32>, max: Option<u32>) -> Result<Self, InputError> {
        let b = SeatBounds { min, max };
        b.check()?;
        Ok(b)
    }

    pub fn with_min(min: u32) -> Self {
        SeatBounds { min: Some(min), max: None }
    }

    pub fn with_max(max: u32) -> Self {
        SeatBounds { min: None, max: Some(max) }
    }

    pub fn check(&self) -> Result<(), InputError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(InputError::BoundsInverted { min, max }),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn min_seats(&self) -> u32 {
        self.min.unwrap_or(0)
    }

    #[inline]
    pub fn max_seats(&self) -> u32 {
        self.max.unwrap_or(u32::MAX)
    }

    /// Clamp a seat count into `[min, max]`, reporting which side (if any) bit.
    pub fn clamp(&self, seats: u32) -> (u32, BoundaryDirection) {
        if seats < self.min_seats() {
            (self.min_seats(), BoundaryDirection::ForcedMin)
        } else if seats > self.max_seats() {
            (self.max_seats(), BoundaryDirection::ForcedMax)
        } else {
            (seats, BoundaryDirection::Unforced)
        }
    }
}

/// How an allocation call ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Completion {
    /// Seats awarded equal the target.
    #[default]
    Exact,
    /// Bounds made the target unreachable; rows are the best-effort allocation.
    Infeasible,
    /// Divisor search stopped without an exact match; rows are the last near-match.
    Approximate,
}

/// Result of one allocation call. Rows are in final order (seats ↓, votes ↓, name ↑).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Apportionment {
    pub rows: Vec<SeatRow>,
    pub target: u32,
    pub completion: Completion,
}

impl Apportionment {
    pub fn new(mut rows: Vec<SeatRow>, target: u32, completion: Completion) -> Self {
        sort_final(&mut rows);
        Self { rows, target, completion }
    }

    pub fn from_entities(entities: &[Entity], target: u32, completion: Completion) -> Self {
        Self::new(entities.iter().map(Entity::to_row).collect(), target, completion)
    }

    /// Total seats actually awarded.
    pub fn awarded(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.seats)).sum()
    }

    /// `target - awarded`; non-zero only for inexact outcomes.
    pub fn gap(&self) -> i64 {
        i64::from(self.target) - self.awarded() as i64
    }

    pub fn is_exact(&self) -> bool {
        self.completion == Completion::Exact
    }

    pub fn seats_of(&self, name: &str) -> Option<u32> {
        self.rows.iter().find(|r| r.name == name).map(|r| r.seats)
    }

    pub fn row(&self, name: &str) -> Option<&SeatRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}
