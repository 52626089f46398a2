//! Money and stock arithmetic using rust_decimal
//!
//! All calculations are done with `Decimal`, then converted to `f64` for
//! storage/serialization: money at 2 decimal places, stock at 3.

use rust_decimal::prelude::*;
use shared::models::OrderItemInput;

use super::error::OrderError;

/// Rounding for monetary values (2 decimal places, half away from zero)
const MONEY_DECIMAL_PLACES: u32 = 2;

/// Stock levels keep gram / millilitre precision
const STOCK_DECIMAL_PLACES: u32 = 3;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum accepted cash amount
const MAX_CASH_RECEIVED: f64 = 1_000_000.0;

/// Convert f64 to Decimal, non-finite values become zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal → f64 rounded to cents
#[inline]
pub fn to_money(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Decimal → f64 rounded to stock precision
#[inline]
pub fn to_stock(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(STOCK_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// quantity × unit price
#[inline]
pub fn line_subtotal(unit_price: f64, quantity: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Cart must be non-empty with every quantity in 1..=MAX_QUANTITY
pub fn validate_items(items: &[OrderItemInput]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    for item in items {
        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
    }
    Ok(())
}

/// Validate the tendered cash amount
pub fn validate_cash_received(cash: f64) -> Result<Decimal, OrderError> {
    if !cash.is_finite() || cash < 0.0 || cash > MAX_CASH_RECEIVED {
        return Err(OrderError::InvalidCashReceived(cash));
    }
    Ok(to_decimal(cash))
}

/// Change owed for a cash payment, `None` when underpaid
pub fn change_due(cash_received: Decimal, total: Decimal) -> Option<Decimal> {
    (cash_received >= total).then(|| cash_received - total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_decimal_avoids_float_drift() {
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_money(sum), 0.3);

        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_money(total), 10.0);
    }

    #[test]
    fn test_line_subtotal() {
        assert_eq!(to_money(line_subtotal(3.5, 4)), 14.0);
        assert_eq!(to_money(line_subtotal(2.99, 3)), 8.97);
    }

    #[test]
    fn test_stock_rounding() {
        assert_eq!(to_stock(to_decimal(0.0125) * Decimal::from(3)), 0.038);
        assert_eq!(to_stock(Decimal::from(12)), 12.0);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_validate_items() {
        assert!(matches!(validate_items(&[]), Err(OrderError::EmptyOrder)));
        assert!(matches!(
            validate_items(&[line(1, 0)]),
            Err(OrderError::InvalidQuantity { quantity: 0, .. })
        ));
        assert!(matches!(
            validate_items(&[line(1, 2), line(2, -1)]),
            Err(OrderError::InvalidQuantity { product_id: 2, .. })
        ));
        assert!(matches!(
            validate_items(&[line(1, MAX_QUANTITY + 1)]),
            Err(OrderError::InvalidQuantity { .. })
        ));
        assert!(validate_items(&[line(1, 1), line(2, MAX_QUANTITY)]).is_ok());
    }

    #[test]
    fn test_validate_cash_received() {
        assert!(validate_cash_received(10.0).is_ok());
        assert!(validate_cash_received(0.0).is_ok());
        assert!(validate_cash_received(-1.0).is_err());
        assert!(validate_cash_received(f64::NAN).is_err());
        assert!(validate_cash_received(2_000_000.0).is_err());
    }

    #[test]
    fn test_change_due() {
        let total = to_decimal(9.0);
        assert_eq!(change_due(to_decimal(10.0), total).map(to_money), Some(1.0));
        assert_eq!(change_due(to_decimal(9.0), total).map(to_money), Some(0.0));
        assert_eq!(change_due(to_decimal(8.0), total), None);
    }
}
