//! ap_core: core types, method catalogs, ordering rules, limits and errors.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`ap_algo`, `ap_io`, `ap_report`, `ap_cli`).
//!
//! - Entity records: `Contender`, `Seeded`, `Entity`, `SeatRow`, `Apportionment`
//! - Catalogs: `Divisor`, `QuotaAdjust`, `Rounding` (closed enums, immutable name tables)
//! - Deterministic ordering helpers (final order and per-round metric order)
//! - Engine `Limits` (iteration bounds and tolerance)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod determinism;
pub mod entities;
pub mod limits;

pub use catalog::{Divisor, QuotaAdjust, Rounding};
pub use entities::{
    Apportionment, BoundaryDirection, Completion, Contender, Entity, SeatBounds, SeatRow, Seeded,
};
pub use errors::{AllocError, InputError};
pub use limits::Limits;

pub mod errors {
    use thiserror::Error;

    use crate::catalog::Divisor;

    /// Why an input set was rejected before any seat was awarded.
    #[derive(Clone, Debug, PartialEq, Error)]
    pub enum InputError {
        #[error("no entities supplied")]
        Empty,
        #[error("number of seats must be at least 1")]
        NoSeats,
        #[error("entity {0:?} has negative votes")]
        NegativeVotes(String),
        #[error("entity {0:?} has a non-finite vote count")]
        NonFiniteVotes(String),
        #[error("entity name {0:?} appears more than once")]
        DuplicateName(String),
        #[error("minimum seats {min} exceeds maximum seats {max}")]
        BoundsInverted { min: u32, max: u32 },
        #[error("total votes must be positive")]
        NoVotes,
        #[error("unknown {catalog} name {name:?}")]
        UnknownName { catalog: &'static str, name: String },
        #[error("invalid limits: {0}")]
        BadLimits(&'static str),
    }

    /// Failures surfaced by an allocation call. Infeasible bounds and search
    /// non-convergence are *not* errors; they are reported through
    /// [`crate::Completion`] on the returned allocation.
    #[derive(Clone, Debug, PartialEq, Error)]
    pub enum AllocError {
        #[error("invalid input: {0}")]
        InvalidInput(#[from] InputError),

        #[error("divisor {divisor} is zero at 0 seats; entity {entity:?} needs an initial seat")]
        SingularDivisor { divisor: Divisor, entity: String },

        #[error("quota escalation gave up after {attempts} attempts")]
        RetryBoundExceeded { attempts: u32 },
    }
}
