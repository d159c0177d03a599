//! Referral eligibility logic.
//!
//! The decision of whether a referral code may be applied is a pure
//! function over pre-fetched facts; the repository layer gathers those
//! facts and commits the side effects.

pub mod decision;
pub mod error;

pub use decision::{ReferralApproval, evaluate_referral};
pub use error::ReferralRejection;
