//! Money calculation utilities using rust_decimal for precision
//!
//! This module provides precise decimal arithmetic for monetary calculations.
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 999;

/// Convert an f64 amount to Decimal (storage boundary -> arithmetic domain)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round a Decimal to 2dp half-up and convert back to f64
pub fn round2(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Discounted unit price: `price * (100 - percent) / 100`, rounded to 2dp
pub fn discounted_unit_price(price: f64, percent: f64) -> f64 {
    let price = to_decimal(price);
    let percent = to_decimal(percent);
    let hundred = Decimal::ONE_HUNDRED;
    round2(price * (hundred - percent) / hundred)
}

/// Line total: `unit_price * quantity`, rounded to 2dp
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    round2(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!(
            "{} must be a finite number, got {}",
            field_name, value
        ));
    }
    Ok(())
}

/// Validate a unit price before it enters any calculation
pub fn validate_price(price: f64) -> Result<(), String> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(format!("price must be non-negative, got {}", price));
    }
    if price > MAX_PRICE {
        return Err(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        ));
    }
    Ok(())
}

/// Validate a line quantity
pub fn validate_quantity(quantity: i32) -> Result<(), String> {
    if quantity <= 0 {
        return Err(format!("quantity must be positive, got {}", quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(Decimal::new(12345, 3)), 12.35); // 12.345 -> 12.35
        assert_eq!(round2(Decimal::new(12344, 3)), 12.34);
    }

    #[test]
    fn test_discounted_unit_price() {
        assert_eq!(discounted_unit_price(100.0, 30.0), 70.0);
        assert_eq!(discounted_unit_price(19.99, 10.0), 17.99); // 17.991 -> 17.99
        assert_eq!(discounted_unit_price(50.0, 0.0), 50.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(17.99, 3), 53.97);
        assert_eq!(line_total(0.1, 3), 0.3);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(19.99).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(2_000_000.0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(1000).is_err());
    }
}
