use std::fmt;
use std::ops::Add;

use super::error::DomainError;

/// Fixed-point price representation using i64 cents (multiply by 100).
/// Prices are always non-negative with two decimal places of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(i64);

impl Price {
    const SCALE: i64 = 100;

    /// Create from a raw cent count, rejecting negative values
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::NegativePrice);
        }
        Ok(Self(cents))
    }

    /// Raw cent count
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Zero price
    pub fn zero() -> Self {
        Self(0)
    }

    /// Parse from a decimal string (e.g. "19.99")
    pub fn from_decimal_str(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();

        if s.starts_with('-') {
            return Err(DomainError::NegativePrice);
        }

        // Split on decimal point
        let parts: Vec<&str> = s.split('.').collect();

        let (integer_part, decimal_part) = match parts.len() {
            1 => (parts[0], ""),
            2 => (parts[0], parts[1]),
            _ => return Err(DomainError::InvalidPrice),
        };

        // Validate decimal places (max 2)
        if decimal_part.len() > 2 {
            return Err(DomainError::InvalidPrice);
        }

        let integer: i64 = integer_part.parse().map_err(|_| DomainError::InvalidPrice)?;

        // Pad the decimal part to 2 digits before parsing
        let decimal_str = format!("{:0<2}", decimal_part);
        let decimal: i64 = decimal_str.parse().map_err(|_| DomainError::InvalidPrice)?;

        let cents = integer
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(decimal))
            .ok_or(DomainError::Overflow)?;

        Ok(Self(cents))
    }

    /// Checked addition, None on overflow
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Total for a line item quantity, None on overflow
    pub fn checked_mul_quantity(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_number() {
        assert_eq!(Price::from_decimal_str("5"), Price::from_cents(500));
    }

    #[test]
    fn parse_two_decimals() {
        assert_eq!(Price::from_decimal_str("19.99"), Price::from_cents(1999));
    }

    #[test]
    fn parse_one_decimal_pads() {
        assert_eq!(Price::from_decimal_str("1.5"), Price::from_cents(150));
    }

    #[test]
    fn parse_rejects_negative() {
        assert_eq!(
            Price::from_decimal_str("-1.00"),
            Err(DomainError::NegativePrice)
        );
    }

    #[test]
    fn parse_rejects_three_decimals() {
        assert_eq!(
            Price::from_decimal_str("1.234"),
            Err(DomainError::InvalidPrice)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            Price::from_decimal_str("abc"),
            Err(DomainError::InvalidPrice)
        );
    }

    #[test]
    fn from_cents_rejects_negative() {
        assert_eq!(Price::from_cents(-1), Err(DomainError::NegativePrice));
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Price::from_cents(1999).unwrap().to_string(), "19.99");
        assert_eq!(Price::from_cents(5).unwrap().to_string(), "0.05");
        assert_eq!(Price::from_cents(0).unwrap().to_string(), "0.00");
    }

    #[test]
    fn display_round_trips_through_parse() {
        let price = Price::from_cents(12_345).unwrap();
        assert_eq!(Price::from_decimal_str(&price.to_string()), Ok(price));
    }

    #[test]
    fn checked_mul_quantity() {
        let price = Price::from_cents(250).unwrap();
        assert_eq!(price.checked_mul_quantity(4), Price::from_cents(1000).ok());
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Price::from_cents(i64::MAX).unwrap();
        assert_eq!(max.checked_add(Price::from_cents(1).unwrap()), None);
    }
}
