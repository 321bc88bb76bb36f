//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of money in whole won.
pub type Won = i64;

/// A repayment length in months.
pub type Months = u32;

/// Household size counted in half-person steps.
///
/// A minor child may count as half a person, so sizes such as 1.5 or
/// 2.5 are legal. The value is stored as a number of halves to keep
/// comparisons exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct HouseholdSize {
    halves: u32,
}

impl HouseholdSize {
    pub const ONE: HouseholdSize = HouseholdSize { halves: 2 };
    /// Largest household the engine accepts.
    pub const MAX: HouseholdSize = HouseholdSize { halves: 40 };

    pub fn from_halves(halves: u32) -> Self {
        Self { halves }
    }

    pub fn persons(persons: u32) -> Self {
        Self { halves: persons * 2 }
    }

    pub fn halves(&self) -> u32 {
        self.halves
    }

    /// Whole persons, rounding a trailing half down.
    pub fn whole(&self) -> u32 {
        self.halves / 2
    }

    pub fn is_whole(&self) -> bool {
        self.halves % 2 == 0
    }

    pub fn as_f64(&self) -> f64 {
        self.halves as f64 / 2.0
    }

    /// The next smaller size, half a person down. None once at one person.
    pub fn step_down(&self) -> Option<Self> {
        if *self <= Self::ONE {
            None
        } else {
            Some(Self { halves: self.halves - 1 })
        }
    }
}

/// `part / whole * 100` rounded half up, in exact integer arithmetic.
/// A rate of exactly -0.5 rounds to 0, not -1. `whole` must be positive.
pub fn percent_rounded(part: Won, whole: Won) -> i64 {
    let (part, whole) = (part as i128, whole as i128);
    (part * 200 + whole).div_euclid(2 * whole) as i64
}

impl Default for HouseholdSize {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<f64> for HouseholdSize {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled < 0.0 || doubled.fract() != 0.0 {
            return Err(format!("household size {value} is not a multiple of 0.5"));
        }
        Ok(Self { halves: doubled as u32 })
    }
}

impl From<HouseholdSize> for f64 {
    fn from(value: HouseholdSize) -> Self {
        value.as_f64()
    }
}

impl fmt::Display for HouseholdSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.whole())
        } else {
            write!(f, "{}.5", self.whole())
        }
    }
}
