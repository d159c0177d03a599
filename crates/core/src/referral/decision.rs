//! Referral code eligibility decision.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::error::ReferralRejection;
use crate::settings::ProgramSettings;

/// The outcome of a successful referral validation.
///
/// Purely advisory: nothing has been credited or recorded yet. The amounts
/// are the settings snapshot at decision time and are what a subsequent
/// recording fixes onto the usage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralApproval {
    /// Customer who owns the code and will earn the points.
    pub referrer_customer_id: Uuid,
    /// Discount granted to the referred customer.
    pub discount_amount: Decimal,
    /// Points the referrer will earn when the order completes.
    pub points_awarded: i64,
}

/// Decides whether a referral code may be applied for `customer_id`.
///
/// Checks in order, short-circuiting on the first failure:
/// 1. the code resolves to a referrer (`code_owner`)
/// 2. the referrer is not the customer themselves
/// 3. this customer has not used this code before
///
/// The caller pre-fetches the facts; this function performs no I/O.
///
/// # Errors
///
/// Returns the first applicable `ReferralRejection`.
pub fn evaluate_referral(
    code_owner: Option<Uuid>,
    customer_id: Uuid,
    already_used: bool,
    settings: &ProgramSettings,
) -> Result<ReferralApproval, ReferralRejection> {
    let referrer_customer_id = code_owner.ok_or(ReferralRejection::CodeNotFound)?;

    if referrer_customer_id == customer_id {
        return Err(ReferralRejection::SelfReferral);
    }
    if already_used {
        return Err(ReferralRejection::AlreadyUsed);
    }

    Ok(ReferralApproval {
        referrer_customer_id,
        discount_amount: settings.referral_discount_amount,
        points_awarded: settings.referrer_points_earned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn settings() -> ProgramSettings {
        ProgramSettings::default()
    }

    #[test]
    fn test_valid_referral_returns_settings_amounts() {
        let referrer = Uuid::new_v4();
        let customer = Uuid::new_v4();

        let approval = evaluate_referral(Some(referrer), customer, false, &settings()).unwrap();
        assert_eq!(approval.referrer_customer_id, referrer);
        assert_eq!(approval.discount_amount, dec!(5000));
        assert_eq!(approval.points_awarded, 10);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let result = evaluate_referral(None, Uuid::new_v4(), false, &settings());
        assert_eq!(result, Err(ReferralRejection::CodeNotFound));
    }

    #[test]
    fn test_self_referral_is_rejected() {
        let customer = Uuid::new_v4();
        let result = evaluate_referral(Some(customer), customer, false, &settings());
        assert_eq!(result, Err(ReferralRejection::SelfReferral));
    }

    #[test]
    fn test_reused_code_is_rejected() {
        let result = evaluate_referral(Some(Uuid::new_v4()), Uuid::new_v4(), true, &settings());
        assert_eq!(result, Err(ReferralRejection::AlreadyUsed));
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // Self-referral wins over already-used: the ownership check comes
        // first in the documented order.
        let customer = Uuid::new_v4();
        let result = evaluate_referral(Some(customer), customer, true, &settings());
        assert_eq!(result, Err(ReferralRejection::SelfReferral));
    }
}
