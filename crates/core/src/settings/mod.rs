//! Referral program settings.
//!
//! A snapshot of the parameters every other operation depends on: the
//! discount granted to a referred customer, the points credited to the
//! referrer, and the redemption floor/conversion rate. Exactly one settings
//! record is active at a time; when none can be resolved, the defaults here
//! are used as a read-time fallback (never persisted) so a settings outage
//! cannot block a paying customer's checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Referral program parameters in effect at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSettings {
    /// Currency amount granted to the referred customer.
    pub referral_discount_amount: Decimal,
    /// Points credited to the referrer per successful referral.
    pub referrer_points_earned: i64,
    /// Minimum point balance required before any redemption is allowed.
    pub points_redemption_minimum: i64,
    /// Currency value of one point.
    pub points_redemption_value: Decimal,
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            referral_discount_amount: Decimal::new(5000, 0),
            referrer_points_earned: 10,
            points_redemption_minimum: 50,
            points_redemption_value: Decimal::new(100, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_fallback_values() {
        let settings = ProgramSettings::default();
        assert_eq!(settings.referral_discount_amount, dec!(5000));
        assert_eq!(settings.referrer_points_earned, 10);
        assert_eq!(settings.points_redemption_minimum, 50);
        assert_eq!(settings.points_redemption_value, dec!(100));
    }
}
