//! Points redemption quoting.
//!
//! Converts a requested point quantity into a currency discount, enforcing
//! the redemption floor and the available balance. The quote is advisory:
//! capping the discount against the order total is the checkout flow's
//! responsibility, not the ledger's.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::PointsError;
use crate::settings::ProgramSettings;

/// A successful redemption quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionQuote {
    /// Points the customer asked to redeem.
    pub points_to_redeem: i64,
    /// Currency value of the redemption.
    pub discount_value: Decimal,
    /// Upper bound on a redemption right now (the full balance).
    pub max_redeemable: i64,
}

/// Quotes a redemption of `points_to_redeem` against `current_balance`.
///
/// Checks, in order: the amount is strictly positive, the balance meets the
/// configured minimum, and the request does not exceed the balance.
///
/// # Errors
///
/// Returns `InvalidAmount`, `BelowMinimum`, or `InsufficientBalance` per the
/// checks above.
pub fn redemption_quote(
    current_balance: i64,
    points_to_redeem: i64,
    settings: &ProgramSettings,
) -> Result<RedemptionQuote, PointsError> {
    if points_to_redeem <= 0 {
        return Err(PointsError::InvalidAmount);
    }
    if current_balance < settings.points_redemption_minimum {
        return Err(PointsError::BelowMinimum {
            minimum: settings.points_redemption_minimum,
            balance: current_balance,
        });
    }
    if points_to_redeem > current_balance {
        return Err(PointsError::InsufficientBalance {
            requested: points_to_redeem,
            available: current_balance,
        });
    }

    Ok(RedemptionQuote {
        points_to_redeem,
        discount_value: Decimal::from(points_to_redeem) * settings.points_redemption_value,
        max_redeemable: current_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn settings() -> ProgramSettings {
        ProgramSettings::default()
    }

    #[test]
    fn test_quote_computes_discount_value() {
        let quote = redemption_quote(200, 60, &settings()).unwrap();
        assert_eq!(quote.points_to_redeem, 60);
        // 60 points at a value of 100 each
        assert_eq!(quote.discount_value, dec!(6000));
        assert_eq!(quote.max_redeemable, 200);
    }

    #[rstest]
    #[case(0)]
    #[case(-10)]
    fn test_quote_rejects_non_positive(#[case] points: i64) {
        assert_eq!(
            redemption_quote(200, points, &settings()),
            Err(PointsError::InvalidAmount)
        );
    }

    #[test]
    fn test_below_minimum_regardless_of_request_size() {
        // Balance 5 with a floor of 50: even a 10-point request fails on the
        // floor, not on the balance.
        let result = redemption_quote(5, 10, &settings());
        assert_eq!(
            result,
            Err(PointsError::BelowMinimum {
                minimum: 50,
                balance: 5,
            })
        );
    }

    #[test]
    fn test_request_above_balance_is_insufficient() {
        let result = redemption_quote(80, 90, &settings());
        assert_eq!(
            result,
            Err(PointsError::InsufficientBalance {
                requested: 90,
                available: 80,
            })
        );
    }

    #[test]
    fn test_full_balance_is_redeemable() {
        let quote = redemption_quote(50, 50, &settings()).unwrap();
        assert_eq!(quote.discount_value, dec!(5000));
    }
}
