//! Amount helpers and currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO 4217 currency codes supported for journal entries.
///
/// An entry carries exactly one implicit currency; lines never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Indian Rupee
    Inr,
    /// Indonesian Rupiah
    Idr,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Number of minor-unit digits.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }

    /// Rounds an amount to the currency's minor unit (banker's rounding).
    #[must_use]
    pub fn round(self, amount: Decimal) -> Decimal {
        amount.round_dp(self.minor_units())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Inr => write!(f, "INR"),
            Self::Idr => write!(f, "IDR"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "INR" => Ok(Self::Inr),
            "IDR" => Ok(Self::Idr),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Largest amount a single journal line may carry (one quadrillion).
///
/// Keeps every sum over an entry far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Returns true if `amount` does not exceed [`MAX_AMOUNT`].
#[must_use]
pub fn within_limit(amount: Decimal) -> bool {
    amount <= MAX_AMOUNT
}

/// Clamps an amount to zero from below.
#[must_use]
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Parses user-typed amount text.
///
/// Blank or unparseable input yields zero, and negative values are clamped
/// to zero. Thousands separators (`,` and `_`) and surrounding whitespace
/// are ignored.
#[must_use]
pub fn parse_amount(input: &str) -> Decimal {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_or(Decimal::ZERO, non_negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1000", dec!(1000))]
    #[case("  250.75 ", dec!(250.75))]
    #[case("1,234.50", dec!(1234.50))]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("-500", dec!(0))]
    #[case("1e3", dec!(1000))]
    fn test_parse_amount(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input), expected);
    }

    #[test]
    fn test_max_amount() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert!(within_limit(MAX_AMOUNT));
        assert!(!within_limit(MAX_AMOUNT + dec!(0.01)));
        assert!(!within_limit(parse_amount("79228162514264337593543950335")));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(dec!(-0.01)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
    }

    #[test]
    fn test_currency_round() {
        assert_eq!(Currency::Usd.round(dec!(10.005)), dec!(10.00));
        assert_eq!(Currency::Usd.round(dec!(10.015)), dec!(10.02));
        assert_eq!(Currency::Jpy.round(dec!(10.5)), dec!(10));
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Inr.to_string(), "INR");
        assert_eq!(Currency::Jpy.to_string(), "JPY");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("GBP").unwrap(), Currency::Gbp);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
