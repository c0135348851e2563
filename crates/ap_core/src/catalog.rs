//! Method catalogs: divisor functions, quota adjustments, rounding directions.
//!
//! Each catalog is a closed enum with an explicit wire token per variant and an
//! immutable alias table used by `FromStr`. Lookup ignores case, punctuation,
//! whitespace and the diacritics found in method names ("Sainte-Laguë").

use core::fmt;
use core::str::FromStr;

use crate::errors::InputError;

/// Define a catalog enum with explicit wire tokens and an `ALL` table.
macro_rules! catalog_enum {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in catalog order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable lowercase token (also accepted by `FromStr`).
            pub fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }
    };
}

/// Fold a user-supplied method name into its lookup key.
fn normalize(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            'ë' | 'é' | 'è' | 'Ë' | 'É' | 'È' => Some('e'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

fn lookup<T: Copy>(table: &[(&str, T)], catalog: &'static str, name: &str) -> Result<T, InputError> {
    let key = normalize(name);
    table
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|&(_, v)| v)
        .ok_or_else(|| InputError::UnknownName { catalog, name: name.to_string() })
}

// ----------------------------- Divisors (highest averages) -----------------------------

catalog_enum!(
    /// Divisor function `d(k)` for an entity already holding `k` seats.
    Divisor => {
        Adams = "adams",
        Danish = "danish",
        SainteLague = "sainte-lague",
        ModifiedSainteLague = "modified-sainte-lague",
        HuntingtonHill = "huntington-hill",
        SquareMean = "square-mean",
        Dean = "dean",
        DHondt = "dhondt",
        Imperiali = "imperiali",
    }
);

/// First Modified Sainte-Laguë divisor on the `k + 1/2` scale
/// (1.4 on the classic 1, 3, 5, … scale).
pub const MODIFIED_SAINTE_LAGUE_FIRST: f64 = 0.7;

const DIVISOR_NAMES: &[(&str, Divisor)] = &[
    ("adams", Divisor::Adams),
    ("danish", Divisor::Danish),
    ("saintelague", Divisor::SainteLague),
    ("webster", Divisor::SainteLague),
    ("sl", Divisor::SainteLague),
    ("modifiedsaintelague", Divisor::ModifiedSainteLague),
    ("msl", Divisor::ModifiedSainteLague),
    ("huntingtonhill", Divisor::HuntingtonHill),
    ("hill", Divisor::HuntingtonHill),
    ("hh", Divisor::HuntingtonHill),
    ("squaremean", Divisor::SquareMean),
    ("dean", Divisor::Dean),
    ("dhondt", Divisor::DHondt),
    ("jefferson", Divisor::DHondt),
    ("dh", Divisor::DHondt),
    ("imperiali", Divisor::Imperiali),
];

impl Divisor {
    /// `d(k)`; ranks entities by `votes / d(seats)`.
    pub fn value(self, seats: u32) -> f64 {
        let k = f64::from(seats);
        match self {
            Divisor::Adams => k,
            Divisor::Danish => k + 1.0 / 3.0,
            Divisor::SainteLague => k + 0.5,
            Divisor::ModifiedSainteLague => {
                if seats == 0 {
                    MODIFIED_SAINTE_LAGUE_FIRST
                } else {
                    k + 0.5
                }
            }
            Divisor::HuntingtonHill => (k * (k + 1.0)).sqrt(),
            Divisor::SquareMean => (k * (k + 1.0) + 0.5).sqrt(),
            Divisor::Dean => k * (k + 1.0) / (k + 0.5),
            Divisor::DHondt => k + 1.0,
            Divisor::Imperiali => k + 2.0,
        }
    }

    /// `d(0) == 0`: every entity with votes must start with at least one seat.
    pub fn is_singular_at_zero(self) -> bool {
        matches!(self, Divisor::Adams | Divisor::HuntingtonHill | Divisor::Dean)
    }

    /// Human-readable method name.
    pub fn name(self) -> &'static str {
        match self {
            Divisor::Adams => "Adams",
            Divisor::Danish => "Danish",
            Divisor::SainteLague => "Sainte-Laguë",
            Divisor::ModifiedSainteLague => "Modified Sainte-Laguë",
            Divisor::HuntingtonHill => "Huntington-Hill",
            Divisor::SquareMean => "Square-Mean",
            Divisor::Dean => "Dean",
            Divisor::DHondt => "D'Hondt",
            Divisor::Imperiali => "Imperiali",
        }
    }
}

impl fmt::Display for Divisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Divisor {
    type Err = InputError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(DIVISOR_NAMES, "divisor", s)
    }
}

// ----------------------------- Quota adjustments (largest remainder) -------------------

catalog_enum!(
    /// Offset added to the seat count in the quota denominator.
    QuotaAdjust => {
        Hare = "hare",
        Droop = "droop",
        Imperiali = "imperiali",
    }
);

const QUOTA_NAMES: &[(&str, QuotaAdjust)] = &[
    ("hare", QuotaAdjust::Hare),
    ("hamilton", QuotaAdjust::Hare),
    ("droop", QuotaAdjust::Droop),
    ("imperiali", QuotaAdjust::Imperiali),
];

impl QuotaAdjust {
    /// `quota = votes / (seats + offset)`.
    pub fn offset(self) -> i64 {
        match self {
            QuotaAdjust::Hare => 0,
            QuotaAdjust::Droop => 1,
            QuotaAdjust::Imperiali => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuotaAdjust::Hare => "Hare",
            QuotaAdjust::Droop => "Droop",
            QuotaAdjust::Imperiali => "Imperiali",
        }
    }
}

impl fmt::Display for QuotaAdjust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuotaAdjust {
    type Err = InputError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(QUOTA_NAMES, "quota", s)
    }
}

// ----------------------------- Rounding directions (adjusted divisor) ------------------

catalog_enum!(
    /// How `votes / divisor` is turned into a seat count.
    Rounding => {
        Down = "down",
        Nearest = "nearest",
        Up = "up",
    }
);

const ROUNDING_NAMES: &[(&str, Rounding)] = &[
    ("down", Rounding::Down),
    ("downward", Rounding::Down),
    ("jefferson", Rounding::Down),
    ("nearest", Rounding::Nearest),
    ("webster", Rounding::Nearest),
    ("up", Rounding::Up),
    ("upward", Rounding::Up),
    ("adams", Rounding::Up),
];

impl Rounding {
    /// Round a non-negative quotient; `Nearest` rounds halves up.
    pub fn apply(self, quotient: f64) -> f64 {
        match self {
            Rounding::Down => quotient.floor(),
            Rounding::Nearest => (quotient + 0.5).floor(),
            Rounding::Up => quotient.ceil(),
        }
    }

    /// Smallest seat count this rounding can produce for `votes`, however large the divisor.
    pub fn least_seats(self, votes: f64) -> u32 {
        match self {
            Rounding::Up if votes > 0.0 => 1,
            _ => 0,
        }
    }

    /// Name of the classical method this rounding reproduces.
    pub fn name(self) -> &'static str {
        match self {
            Rounding::Down => "Jefferson",
            Rounding::Nearest => "Webster",
            Rounding::Up => "Adams",
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rounding {
    type Err = InputError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(ROUNDING_NAMES, "rounding", s)
    }
}
