//! Amount type for parsing and displaying monetary values.
//!
//! Source files are exported by different tools, so a cell may or may not carry a currency symbol
//! or thousands separators. `Amount` wraps a `Decimal` and accepts all of those spellings. No
//! currency conversion happens here: `R$ 10.00` and `$10.00` are both the value `10.00`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency prefixes that are stripped before parsing. Longest first.
const CURRENCY_PREFIXES: &[&str] = &["R$", "$"];

/// Represents a currency-agnostic monetary amount.
///
/// # Examples
///
/// ```
/// # use expense_compare::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-R$ 1,250.00").unwrap();
/// let b = Amount::from_str("-1250").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "-1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Empty,
    Decimal(String, rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "An amount cannot be empty"),
            AmountError::Decimal(s, e) => write!(f, "Unable to parse '{s}' as an amount: {e}"),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Empty => None,
            AmountError::Decimal(_, e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        // The sign may come before or after the currency symbol: "-R$ 5.00" or "R$ -5.00"
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let without_currency = CURRENCY_PREFIXES
            .iter()
            .find_map(|prefix| unsigned.strip_prefix(prefix))
            .unwrap_or(unsigned)
            .trim_start();

        // Remove commas (thousand separators)
        let without_commas = without_currency.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError::Decimal(s.to_string(), e))?;

        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs();
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), dec!(50));
    }

    #[test]
    fn test_parse_with_real_sign_and_space() {
        let amount = Amount::from_str("R$ 1,234.56").unwrap();
        assert_eq!(amount.value(), dec!(1234.56));
    }

    #[test]
    fn test_parse_negative_before_symbol() {
        let amount = Amount::from_str("-R$50.00").unwrap();
        assert_eq!(amount.value(), dec!(-50));
    }

    #[test]
    fn test_parse_negative_after_symbol() {
        let amount = Amount::from_str("$-50.00").unwrap();
        assert_eq!(amount.value(), dec!(-50));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  $50.00  ").unwrap();
        assert_eq!(amount.value(), dec!(50));
    }

    #[test]
    fn test_parse_empty_string_is_an_error() {
        assert!(matches!(Amount::from_str("   "), Err(AmountError::Empty)));
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        let err = Amount::from_str("twelve").unwrap_err();
        assert!(err.to_string().contains("twelve"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec!(60000)).to_string(), "60,000.00");
        assert_eq!(Amount::new(dec!(-5.5)).to_string(), "-5.50");
        assert_eq!(Amount::new(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn test_zero_is_not_negative() {
        let zero = Amount::from_str("-0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }
}
