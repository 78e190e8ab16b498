//! Fixed-point money using decimal arithmetic.
//!
//! All amounts are `NUMERIC(10, 2)` in the database and [`Decimal`] in memory.
//! Floating point never touches a price: `unit_price * qty` and cart totals
//! are exact.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative amount of money with two decimal places.
///
/// # Examples
///
/// ```
/// use football_shop_core::Price;
///
/// let unit = Price::parse_lenient("4990,50");
/// assert_eq!(unit.to_string(), "4990.50");
/// assert_eq!(unit.times(3).to_string(), "14971.50");
///
/// // Unparseable input is coerced to zero rather than rejected.
/// assert_eq!(Price::parse_lenient("free"), Price::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero, with two decimal places.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Number of decimal places stored.
    pub const SCALE: u32 = 2;

    /// Largest amount a `NUMERIC(10, 2)` column can hold.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Create a price from a decimal amount, rounding half-up to two places.
    ///
    /// Returns `None` for negative amounts or amounts above [`Price::MAX`].
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        let mut rounded =
            amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            return None;
        }
        if rounded > Self::MAX.0 {
            return None;
        }
        // Normalize -0.00 to 0.00
        Some(Self(rounded.abs()))
    }

    /// Create a price from an integer number of cents.
    ///
    /// Negative input is clamped to zero.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents.max(0), Self::SCALE)).unwrap_or(Self::MAX)
    }

    /// Parse user input, silently coercing anything unusable to zero.
    ///
    /// Accepts a comma as decimal separator. Blank, malformed, negative and
    /// out-of-range input all become [`Price::ZERO`].
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let normalized = input.trim().replace(',', ".");
        Decimal::from_str(&normalized)
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::ZERO)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `self * qty`, computed in decimal.
    ///
    /// Line totals may exceed [`Price::MAX`]; only stored unit prices are
    /// bounded by the column type.
    #[must_use]
    pub fn times(&self, qty: u32) -> Self {
        let mut total = self.0 * Decimal::from(qty);
        total.rescale(Self::SCALE);
        Self(total)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error for amounts a [`Price`] cannot hold.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("price out of range: {0}")]
pub struct PriceRangeError(Decimal);

impl TryFrom<Decimal> for Price {
    type Error = PriceRangeError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount).ok_or(PriceRangeError(amount))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Self::try_from(amount).map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
