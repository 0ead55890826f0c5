//! Nightly cost stored as integer minor currency units.
//!
//! Callers speak dollars, possibly fractional; the database stores and
//! compares whole cents so that monetary comparisons never touch floating
//! point.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Number of cents in one dollar.
pub const CENTS_PER_DOLLAR: i64 = 100;

/// An amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Wrap a raw cents value as read from the database.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Scale a dollar amount to cents, rounding half away from zero.
    ///
    /// NaN, infinities and amounts whose cents do not fit in an `i64` are
    /// rejected.
    pub fn from_dollars(dollars: f64) -> Result<Self> {
        let cents = (dollars * CENTS_PER_DOLLAR as f64).round();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
            Ok(Self(cents as i64))
        } else {
            Err(Error::Validation(format!("amount ${dollars} is out of range")))
        }
    }

    /// Return the raw cents value for binding.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = CENTS_PER_DOLLAR as u64;
        write!(f, "{sign}${}.{:02}", abs / per, abs % per)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_scale_by_one_hundred() {
        assert_eq!(Cents::from_dollars(50.0).unwrap().get(), 5000);
        assert_eq!(Cents::from_dollars(0.0).unwrap().get(), 0);
    }

    #[test]
    fn fractional_dollars_round_to_nearest_cent() {
        assert_eq!(Cents::from_dollars(49.5).unwrap().get(), 4950);
        assert_eq!(Cents::from_dollars(19.99).unwrap().get(), 1999);
        assert_eq!(Cents::from_dollars(0.005).unwrap().get(), 1);
        assert_eq!(Cents::from_dollars(-2.5).unwrap().get(), -250);
    }

    #[test]
    fn out_of_range_is_a_validation_error() {
        for bad in [f64::MAX, f64::MIN, f64::NAN, f64::INFINITY, 1e17] {
            let err = Cents::from_dollars(bad).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Cents::new(15_005).to_string(), "$150.05");
        assert_eq!(Cents::new(-250).to_string(), "-$2.50");
    }
}
