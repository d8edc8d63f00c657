//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that category sums are exact.
//! Per-person shares are derived in floating point from these amounts (see
//! [`Money::as_f64`]).
//!
//! This is also where receipt tokens become amounts: [`Money::parse`] accepts
//! exactly the currency pattern, and [`currency_pattern`] exposes the same
//! pattern, unanchored, for scanning whole lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;
use thiserror::Error;

/// Optional leading `$`, a digit, then digits or group separators, then an
/// optional 1-2 digit fraction. No sign.
const CURRENCY_PATTERN: &str = r"\$?\d[\d,]*(?:\.\d{1,2})?";

/// Unanchored currency pattern used to find amounts inside a line
pub fn currency_pattern() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(CURRENCY_PATTERN).expect("invalid currency regex"))
}

fn currency_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(&format!("^{}$", CURRENCY_PATTERN)).expect("invalid currency regex")
    })
}

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from user or receipt input ($1,000,000,000.00)
    ///
    /// Sums of fewer than ~92 million such amounts cannot overflow `i64`.
    pub const MAX_INPUT: Money = Money(100_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use vegsplit::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The amount in currency units, for share arithmetic
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Convert a decimal currency value to Money, rounding to the nearest cent
    ///
    /// Negative and non-finite values are rejected, as are values above
    /// [`Money::MAX_INPUT`].
    pub fn try_from_f64(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MoneyParseError::InvalidFormat(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents > Self::MAX_INPUT.0 as f64 {
            return Err(MoneyParseError::Overflow(value.to_string()));
        }
        Ok(Self(cents as i64))
    }

    /// Parse a currency token
    ///
    /// Accepts "10", "10.5", "10.50", "$10.50", "1,234.56". Anything else,
    /// including signed values, is not a currency amount. Amounts above
    /// [`Money::MAX_INPUT`] are out of range.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let token = s.trim();
        if !currency_token().is_match(token) {
            return Err(MoneyParseError::InvalidFormat(token.to_string()));
        }

        let digits: String = token.chars().filter(|c| *c != '$' && *c != ',').collect();
        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let overflow = || MoneyParseError::Overflow(token.to_string());
        let whole: i64 = whole.parse().map_err(|_| overflow())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| overflow())? * 10,
            _ => frac.parse().map_err(|_| overflow())?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Self)
            .filter(|m| *m <= Self::MAX_INPUT)
            .ok_or_else(overflow)
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),

    #[error("Amount out of range: {0}")]
    Overflow(String),
}
