//! Referral rejection reasons.

use thiserror::Error;

/// Why a referral code was rejected.
///
/// Rejections are expected, frequent outcomes, not system failures: callers
/// surface `reason()` to the customer and skip the discount. Keeping them as
/// a closed enum lets callers match exhaustively instead of sniffing
/// message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReferralRejection {
    /// The code does not resolve to any customer.
    #[error("Referral code not found")]
    CodeNotFound,

    /// A customer cannot use their own referral code.
    #[error("You cannot use your own referral code")]
    SelfReferral,

    /// This customer has already used this referral code.
    #[error("Referral code already used")]
    AlreadyUsed,
}

impl ReferralRejection {
    /// Stable machine-readable reason string for API responses.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::CodeNotFound => "code_not_found",
            Self::SelfReferral => "self_referral",
            Self::AlreadyUsed => "already_used",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(ReferralRejection::CodeNotFound.reason(), "code_not_found");
        assert_eq!(ReferralRejection::SelfReferral.reason(), "self_referral");
        assert_eq!(ReferralRejection::AlreadyUsed.reason(), "already_used");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ReferralRejection::SelfReferral.to_string(),
            "You cannot use your own referral code"
        );
    }
}
