//! Fixed-precision money arithmetic.
//!
//! All monetary values are decimal (`rust_decimal`), never binary floats, so
//! tax/total math carries no representation error. Intermediate sums keep
//! full precision; rounding happens once, at the output boundary
//! (`rounded`/`Display`), to two fractional digits.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits in the output currency format.
const CURRENCY_SCALE: u32 = 2;

/// A currency amount (value object).
///
/// Equality and ordering are by exact decimal value, so `1.5 == 1.50`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole currency units (e.g. `from_major(100)` is 100.00).
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money addition overflow"))
    }

    pub fn checked_sub(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money subtraction overflow"))
    }

    /// Multiply by a plain number (`quantity × unit rate`).
    pub fn mul_decimal(self, factor: Decimal) -> DomainResult<Money> {
        self.0
            .checked_mul(factor)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money multiplication overflow"))
    }

    /// `rate` percent of this amount, at full precision.
    pub fn percent_of(self, rate: Decimal) -> DomainResult<Money> {
        let scaled = self
            .0
            .checked_mul(rate)
            .ok_or_else(|| DomainError::invariant("money percentage overflow"))?;
        // Dividing a decimal by 100 only shifts scale; it is exact.
        let value = scaled
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| DomainError::invariant("money percentage overflow"))?;
        Ok(Money(value))
    }

    /// Proportional allocation: `self × numerator / denominator`.
    ///
    /// A zero denominator yields zero (e.g. distributing billed hours when
    /// no hours were worked).
    pub fn ratio(self, numerator: Decimal, denominator: Decimal) -> DomainResult<Money> {
        if denominator.is_zero() {
            return Ok(Money::ZERO);
        }
        let scaled = self
            .0
            .checked_mul(numerator)
            .ok_or_else(|| DomainError::invariant("money allocation overflow"))?;
        let value = scaled
            .checked_div(denominator)
            .ok_or_else(|| DomainError::invariant("money allocation overflow"))?;
        Ok(Money(value))
    }

    /// Round to currency precision, half away from zero.
    pub fn rounded(self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl ValueObject for Money {}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)
            .map_err(|e| DomainError::validation(format!("money: {e}")))?;
        Ok(Money(value))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}
