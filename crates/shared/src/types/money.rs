//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Number of fractional digits stored for every amount and balance.
pub const MONEY_SCALE: u32 = 2;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units with up to [`MONEY_SCALE`] fractional digits.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount fits the stored precision without rounding.
    #[must_use]
    pub fn fits_scale(amount: Decimal) -> bool {
        amount.normalize().scale() <= MONEY_SCALE
    }

    /// Returns `amount` carrying exactly [`MONEY_SCALE`] fractional digits.
    ///
    /// Stores that hand decimals back through a float (SQLite) lose trailing
    /// zeros; this restores them.
    #[must_use]
    pub fn scaled(amount: Decimal) -> Decimal {
        let mut amount = amount;
        amount.rescale(MONEY_SCALE);
        amount
    }
}

/// Serializes an amount as a string with exactly [`MONEY_SCALE`] digits.
///
/// For `#[serde(serialize_with = "...")]` on stored money columns.
pub fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&Money::scaled(*amount))
}

/// Three-letter ISO 4217 currency code, stored upper-case.
///
/// Conversion between currencies is out of scope; the code is a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(format!("Unknown currency: {s}"))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_zero() {
        let rub = CurrencyCode::from_str("RUB").unwrap();
        let money = Money::zero(rub.clone());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, rub);
    }

    #[test]
    fn test_fits_scale() {
        assert!(Money::fits_scale(dec!(100)));
        assert!(Money::fits_scale(dec!(100.5)));
        assert!(Money::fits_scale(dec!(100.25)));
        assert!(Money::fits_scale(dec!(100.2500)));
        assert!(!Money::fits_scale(dec!(100.255)));
    }

    #[test]
    fn test_scaled_restores_two_digits() {
        assert_eq!(Money::scaled(dec!(0.5)).to_string(), "0.50");
        assert_eq!(Money::scaled(dec!(100000)).to_string(), "100000.00");
        assert_eq!(Money::scaled(dec!(12.3400)).to_string(), "12.34");
    }

    #[test]
    fn test_serialize_amount() {
        #[derive(Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_amount")]
            amount: Decimal,
        }
        let json = serde_json::to_string(&Row { amount: dec!(0.5) }).unwrap();
        assert_eq!(json, r#"{"amount":"0.50"}"#);
    }

    #[test]
    fn test_currency_code_parsing() {
        assert_eq!(CurrencyCode::from_str("rub").unwrap().as_str(), "RUB");
        assert_eq!(CurrencyCode::from_str(" usd ").unwrap().to_string(), "USD");
        assert!(CurrencyCode::from_str("RUBL").is_err());
        assert!(CurrencyCode::from_str("R1B").is_err());
        assert!(CurrencyCode::from_str("").is_err());
    }

    #[test]
    fn test_currency_code_serde() {
        let code: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(code.as_str(), "EUR");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"euro\"").is_err());
    }
}
