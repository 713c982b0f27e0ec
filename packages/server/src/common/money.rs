//! Gateway amount conventions.
//!
//! Bookings and payments store major-unit `Decimal`s (rupees). The gateway
//! speaks integer minor units (paise).

use anyhow::{bail, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest accepted difference between the booked and the paid amount.
pub fn cent_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// `499.00` -> `49900`. Rejects negative amounts and sub-cent precision.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        bail!("amount must not be negative: {}", amount);
    }
    if amount.normalize().scale() > 2 {
        bail!("amount has more than two decimal places: {}", amount);
    }
    match (amount * Decimal::ONE_HUNDRED).to_i64() {
        Some(minor) => Ok(minor),
        None => bail!("amount out of range: {}", amount),
    }
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// True when the gateway-reported amount equals the expected amount within
/// one cent.
pub fn amounts_match(expected: Decimal, paid_minor: i64) -> bool {
    (from_minor_units(paid_minor) - expected).abs() <= cent_tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec("499.00")).unwrap(), 49900);
        assert_eq!(to_minor_units(dec("0.5")).unwrap(), 50);
        assert_eq!(to_minor_units(dec("1250")).unwrap(), 125000);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_to_minor_units_rejects_sub_cent() {
        assert!(to_minor_units(dec("10.005")).is_err());
        // trailing zeros are fine
        assert_eq!(to_minor_units(dec("10.5000")).unwrap(), 1050);
    }

    #[test]
    fn test_to_minor_units_rejects_negative() {
        assert!(to_minor_units(dec("-1.00")).is_err());
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(49900), dec("499.00"));
        assert_eq!(from_minor_units(1), dec("0.01"));
    }

    #[test]
    fn test_amounts_match_within_a_cent() {
        let expected = dec("499.00");
        assert!(amounts_match(expected, 49900));
        assert!(amounts_match(expected, 49901));
        assert!(amounts_match(expected, 49899));
        assert!(!amounts_match(expected, 49902));
        assert!(!amounts_match(expected, 4990));
    }
}
