//! Method selection: one parsed allocator choice plus its catalog entry.
//!
//! Token grammar (family prefixes are matched like catalog names):
//! - `ha:<divisor>[@<k>|@rd]` / `highest-averages:…`
//! - `lr:<quota>` / `largest-remainder:…`
//! - `ad:<rounding>` / `adjusted-divisor:…`

use core::fmt;
use core::str::FromStr;

use ap_core::{
    AllocError, Apportionment, Contender, Divisor, InputError, Limits, QuotaAdjust, Rounding,
    SeatBounds,
};

use crate::allocation::{
    adjusted_divisor::allocate_adjusted_divisor_with_limits,
    highest_averages::allocate_highest_averages,
    largest_remainder::allocate_largest_remainder_with_limits,
};
use crate::seeding::{seed, seed_rounded_down};
use crate::validate;

/// Starting seats for a highest-averages run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Initial {
    /// Same seed for everyone.
    Uniform(u32),
    /// `floor(votes / Hare quota)` through the bounds loop.
    RoundedDown,
}

impl Initial {
    /// `1` where `d(0) == 0`, else `0`.
    pub fn default_for(divisor: Divisor) -> Self {
        Initial::Uniform(u32::from(divisor.is_singular_at_zero()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    HighestAverages { divisor: Divisor, initial: Initial },
    LargestRemainder { quota: QuotaAdjust },
    AdjustedDivisor { rounding: Rounding },
}

impl Method {
    pub fn highest_averages(divisor: Divisor) -> Self {
        Method::HighestAverages { divisor, initial: Initial::default_for(divisor) }
    }

    pub fn largest_remainder(quota: QuotaAdjust) -> Self {
        Method::LargestRemainder { quota }
    }

    pub fn adjusted_divisor(rounding: Rounding) -> Self {
        Method::AdjustedDivisor { rounding }
    }

    /// Comparison set used when the caller names none.
    pub fn standard_set() -> Vec<Method> {
        vec![
            Method::highest_averages(Divisor::HuntingtonHill),
            Method::highest_averages(Divisor::Imperiali),
            Method::highest_averages(Divisor::DHondt),
            Method::highest_averages(Divisor::SainteLague),
            Method::highest_averages(Divisor::Danish),
            Method::highest_averages(Divisor::ModifiedSainteLague),
            Method::largest_remainder(QuotaAdjust::Hare),
            Method::largest_remainder(QuotaAdjust::Droop),
            Method::largest_remainder(QuotaAdjust::Imperiali),
        ]
    }

    /// Every catalog entry with its default seed.
    pub fn all() -> Vec<Method> {
        let ha = Divisor::ALL.iter().map(|&d| Method::highest_averages(d));
        let lr = QuotaAdjust::ALL.iter().map(|&q| Method::largest_remainder(q));
        let ad = Rounding::ALL.iter().map(|&r| Method::adjusted_divisor(r));
        ha.chain(lr).chain(ad).collect()
    }

    /// Short column label.
    pub fn label(&self) -> String {
        match *self {
            Method::HighestAverages { divisor, initial } => {
                let base = match divisor {
                    Divisor::HuntingtonHill => "Hunt-Hill",
                    Divisor::ModifiedSainteLague => "Mod S-L",
                    d => d.name(),
                };
                match initial {
                    Initial::RoundedDown => format!("RD+{base}"),
                    i if i == Initial::default_for(divisor) => base.to_string(),
                    Initial::Uniform(k) => format!("{base}@{k}"),
                }
            }
            Method::LargestRemainder { quota } => format!("LR {}", quota.name()),
            Method::AdjustedDivisor { rounding } => format!("AD {}", rounding.name()),
        }
    }

    /// Canonical token; parses back to the same method.
    pub fn token(&self) -> String {
        match *self {
            Method::HighestAverages { divisor, initial } => match initial {
                Initial::RoundedDown => format!("ha:{}@rd", divisor.token()),
                i if i == Initial::default_for(divisor) => format!("ha:{}", divisor.token()),
                Initial::Uniform(k) => format!("ha:{}@{k}", divisor.token()),
            },
            Method::LargestRemainder { quota } => format!("lr:{}", quota.token()),
            Method::AdjustedDivisor { rounding } => format!("ad:{}", rounding.token()),
        }
    }

    /// Run this method. For highest averages, `bounds.min` raises every seed to
    /// at least `min` and `bounds.max` is the uniform cap.
    pub fn apportion(
        &self,
        contenders: &[Contender],
        num_seats: u32,
        bounds: SeatBounds,
        limits: &Limits,
    ) -> Result<Apportionment, AllocError> {
        match *self {
            Method::HighestAverages { divisor, initial } => {
                validate::check_call(
                    contenders.iter().map(|c| (c.name.as_str(), c.votes)),
                    num_seats,
                    &bounds,
                    limits,
                )?;
                let floor = bounds.min_seats();
                let mut seeded = match initial {
                    Initial::Uniform(k) => seed(contenders, k),
                    Initial::RoundedDown => seed_rounded_down(contenders, num_seats, bounds)?,
                };
                for s in seeded.iter_mut() {
                    s.seats = s.seats.max(floor);
                }
                allocate_highest_averages(divisor, &seeded, num_seats, bounds.max)
            }
            Method::LargestRemainder { quota } => {
                allocate_largest_remainder_with_limits(quota, contenders, num_seats, bounds, limits)
            }
            Method::AdjustedDivisor { rounding } => {
                allocate_adjusted_divisor_with_limits(rounding, contenders, num_seats, bounds, limits)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

fn family_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Method {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || InputError::UnknownName { catalog: "method", name: s.to_string() };
        let (family, rest) = s.trim().split_once(':').ok_or_else(unknown)?;

        match family_key(family).as_str() {
            "ha" | "highestaverages" => {
                let (name, seed_part) = match rest.split_once('@') {
                    Some((n, k)) => (n, Some(k.trim())),
                    None => (rest, None),
                };
                let divisor: Divisor = name.parse()?;
                let initial = match seed_part {
                    None => Initial::default_for(divisor),
                    Some(k) if k.eq_ignore_ascii_case("rd") => Initial::RoundedDown,
                    Some(k) => Initial::Uniform(k.parse::<u32>().map_err(|_| unknown())?),
                };
                Ok(Method::HighestAverages { divisor, initial })
            }
            "lr" | "largestremainder" => Ok(Method::LargestRemainder { quota: rest.parse()? }),
            "ad" | "adjusteddivisor" => Ok(Method::AdjustedDivisor { rounding: rest.parse()? }),
            _ => Err(unknown()),
        }
    }
}
