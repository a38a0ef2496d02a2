//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64) to avoid floating-point
//! precision issues. Ratios and percentages are derived as `f64` only at the
//! point of computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored in minor units (hundredths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

/// How thousands are grouped when formatting amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// 12,34,567.00
    #[default]
    Indian,
    /// 1,234,567.00
    Western,
}

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use fifty_thirty_twenty::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.cents(), 1050);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The minor-unit portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount in major units as a float, for ratios and thresholds
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Multiply by a ratio, rounding to the nearest minor unit
    pub fn scale(&self, ratio: f64) -> Self {
        Self((self.0 as f64 * ratio).round() as i64)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "₹10.50", "-₹10.50", "$1,234.5",
    /// "Rs. 500", "10". Digits past the second decimal place are dropped.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let overflow = || MoneyParseError::OutOfRange(s.to_string());

        let rest = s.trim();
        let (mut negative, rest) = match rest.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, rest),
        };
        let rest = strip_currency_symbol(rest).trim_start();
        let rest = match rest.strip_prefix('-') {
            Some(stripped) if !negative => {
                negative = true;
                stripped
            }
            Some(_) => return Err(invalid()),
            None => rest,
        };

        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest, ""),
        };
        let whole_ok = whole.chars().all(|c| c.is_ascii_digit() || c == ',');
        let frac_ok = frac.chars().all(|c| c.is_ascii_digit());
        if !whole_ok || !frac_ok || !whole.chars().chain(frac.chars()).any(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut units: i64 = 0;
        for digit in whole.chars().filter_map(|c| c.to_digit(10)) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i64::from(digit)))
                .ok_or_else(overflow)?;
        }

        // Pad or truncate to 2 digits
        let mut digits = frac.chars().filter_map(|c| c.to_digit(10));
        let tens = i64::from(digits.next().unwrap_or(0));
        let ones = i64::from(digits.next().unwrap_or(0));

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(tens * 10 + ones))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Sum that reports overflow instead of saturating
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Format with a currency symbol and digit grouping
    pub fn format_with(&self, symbol: &str, grouping: DigitGrouping) -> String {
        let whole = group_digits(self.major().unsigned_abs(), grouping);
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}{}.{:02}", sign, symbol, whole, self.cents_part())
    }
}

/// Symbols accepted in front of an amount
const CURRENCY_SYMBOLS: [&str; 4] = ["₹", "$", "Rs.", "Rs"];

fn strip_currency_symbol(s: &str) -> &str {
    CURRENCY_SYMBOLS
        .iter()
        .find_map(|symbol| s.strip_prefix(symbol))
        .unwrap_or(s)
}

fn group_digits(value: u64, grouping: DigitGrouping) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let head: Vec<char> = head.chars().collect();
    let mut parts: Vec<String> = head
        .rchunks(group)
        .map(|chunk| chunk.iter().collect())
        .collect();
    parts.reverse();
    parts.push(tail.to_string());
    parts.join(",")
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.format_with("₹", DigitGrouping::Indian);
        f.pad(&rendered)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount is too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.major(), 10);
        assert_eq!(m.cents_part(), 50);
        assert_eq!(Money::from_major(100000).cents(), 10_000_000);
    }

    #[test]
    fn test_display_uses_indian_grouping() {
        assert_eq!(Money::from_cents(1050).to_string(), "₹10.50");
        assert_eq!(Money::from_major(750000).to_string(), "₹7,50,000.00");
        assert_eq!(Money::from_cents(-123456789).to_string(), "-₹12,34,567.89");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_western_grouping() {
        let m = Money::from_major(1234567);
        assert_eq!(m.format_with("$", DigitGrouping::Western), "$1,234,567.00");
        assert_eq!(
            Money::from_major(999).format_with("$", DigitGrouping::Western),
            "$999.00"
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(a.scale(0.3).cents(), 300);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("₹10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$1,234.5").unwrap().cents(), 123450);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("7,50,000").unwrap().cents(), 75_000_000);
        assert_eq!(Money::parse(".05").unwrap().cents(), 5);
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert_eq!(Money::parse("-₹10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("Rs. 500").unwrap().cents(), 50_000);
        assert_eq!(Money::parse("10.567").unwrap().cents(), 1056);
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("-").is_err());
    }

    #[test]
    fn test_parse_keeps_sign_after_symbol() {
        assert_eq!(Money::parse("₹-10").unwrap().cents(), -1000);
        assert!(Money::parse("-₹-10").is_err());
    }

    #[test]
    fn test_parse_rejects_stray_characters() {
        assert!(Money::parse("abc10").is_err());
        assert!(Money::parse("1.5é").is_err());
        assert!(Money::parse("é.5").is_err());
        assert!(Money::parse("1.٥").is_err());
        assert!(Money::parse("10 apples").is_err());
        assert!(Money::parse("1.0,5").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(
            Money::parse("100000000000000000"),
            Err(MoneyParseError::OutOfRange("100000000000000000".into()))
        );
        assert!(Money::parse("99999999999999999999999.5").is_err());
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_arithmetic_does_not_wrap() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(5).checked_sub(Money::from_cents(7)),
            Some(Money::from_cents(-2))
        );
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
