// crates/ap_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Allocation layer. Every call is a pure, synchronous function of its inputs:
//! a fresh entity set is built, mutated by one allocator, and returned sorted.

pub use ap_core::{
    AllocError, Apportionment, BoundaryDirection, Completion, Contender, Divisor, InputError,
    Limits, QuotaAdjust, Rounding, SeatBounds, SeatRow, Seeded,
};

pub mod method;
pub mod seeding;
pub mod validate;

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    // File modules (actual implementations)
    pub mod constraints;
    pub mod highest_averages;
    pub mod largest_remainder;
    pub mod adjusted_divisor;

    // Typed entry points.
    pub use adjusted_divisor::{allocate_adjusted_divisor, allocate_adjusted_divisor_with_limits};
    pub use highest_averages::allocate_highest_averages;
    pub use largest_remainder::{
        allocate_largest_remainder, allocate_largest_remainder_with_limits,
    };

    // Name-based entry points (catalog names resolved here):
    pub use adjusted_divisor::adjusted_divisor;
    pub use highest_averages::highest_averages;
    pub use largest_remainder::largest_remainder;

    pub use constraints::enforce_bounds;
}

// Convenience re-exports (reports and the CLI import these from crate root)
pub use allocation::{
    adjusted_divisor, allocate_adjusted_divisor, allocate_highest_averages,
    allocate_largest_remainder, highest_averages, largest_remainder,
};
pub use method::{Initial, Method};
pub use seeding::{seed, seed_rounded_down};
