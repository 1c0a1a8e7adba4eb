//! Money types for the balance API
//!
//! - [`Amount`]: format-validated transfer amount, checked at the Serde layer
//! - [`round2`]: canonical 2-decimal-place rounding for all balance arithmetic

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Smallest transferable unit: one cent.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round a balance to 2 decimal places, half away from zero.
///
/// Every write to an account balance goes through this function so that
/// stored values never carry more than 2 fractional digits.
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Strict transfer amount - validates format during deserialization
///
/// Accepts a JSON string or number and rejects:
/// - `.5` (must be `0.5`) and `5.` (must be `5.0` or `5`)
/// - zero, negative, and sub-cent amounts (minimum 0.01)
/// - more than 2 decimal places (`33.335` fails here, it is never truncated)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(Decimal);

impl Amount {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    /// Validate a raw Decimal as a transfer amount
    pub fn try_from_decimal(d: Decimal) -> Result<Self, &'static str> {
        if d.scale() > 2 {
            return Err("Amount must have at most 2 decimal places");
        }
        if d < MIN_AMOUNT {
            return Err("Amount must be at least 0.01");
        }
        Ok(Amount(d.normalize()))
    }
}

impl std::ops::Deref for Amount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", round2(self.0))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Support both JSON number and JSON string
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            String(String),
            Number(Decimal),
        }

        let value = DecimalOrString::deserialize(deserializer)?;

        let d = match value {
            DecimalOrString::String(s) => {
                if s.is_empty() {
                    return Err(D::Error::custom("Amount cannot be empty"));
                }
                if s.starts_with('.') {
                    return Err(D::Error::custom("Invalid format: use 0.5 not .5"));
                }
                if s.ends_with('.') {
                    return Err(D::Error::custom("Invalid format: use 5.0 not 5."));
                }
                Decimal::from_str(&s)
                    .map_err(|e| D::Error::custom(format!("Invalid decimal: {}", e)))?
            }
            DecimalOrString::Number(d) => d,
        };

        if d.is_sign_negative() {
            return Err(D::Error::custom("Amount cannot be negative"));
        }

        Amount::try_from_decimal(d).map_err(D::Error::custom)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_amount_valid_string() {
        let a: Amount = serde_json::from_str(r#""25.50""#).unwrap();
        assert_eq!(*a, Decimal::from_str("25.5").unwrap());
    }

    #[test]
    fn test_amount_valid_number() {
        let a: Amount = serde_json::from_str("10.01").unwrap();
        assert_eq!(*a, Decimal::from_str("10.01").unwrap());
    }

    #[test]
    fn test_amount_rejects_three_decimal_places() {
        // Sub-cent precision must fail at input validation, never be truncated
        let result: Result<Amount, _> = serde_json::from_str(r#""33.335""#);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("at most 2 decimal places")
        );
    }

    #[test]
    fn test_amount_rejects_below_minimum() {
        let result: Result<Amount, _> = serde_json::from_str(r#""0.00""#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least 0.01"));
    }

    #[test]
    fn test_amount_rejects_negative() {
        let result: Result<Amount, _> = serde_json::from_str(r#""-5.00""#);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("cannot be negative")
        );
    }

    #[test]
    fn test_amount_rejects_dot_prefix() {
        let result: Result<Amount, _> = serde_json::from_str(r#"".5""#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("use 0.5 not .5"));
    }

    #[test]
    fn test_amount_rejects_dot_suffix() {
        let result: Result<Amount, _> = serde_json::from_str(r#""5.""#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("use 5.0 not 5."));
    }

    #[test]
    fn test_amount_rejects_empty() {
        let result: Result<Amount, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_min_amount_accepted() {
        let a: Amount = serde_json::from_str(r#""0.01""#).unwrap();
        assert_eq!(*a, MIN_AMOUNT);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(
            round2(Decimal::from_str("10.005").unwrap()),
            Decimal::from_str("10.01").unwrap()
        );
        assert_eq!(
            round2(Decimal::from_str("-10.005").unwrap()),
            Decimal::from_str("-10.01").unwrap()
        );
        assert_eq!(
            round2(Decimal::from_str("10.004").unwrap()),
            Decimal::from_str("10.00").unwrap()
        );
    }
}
