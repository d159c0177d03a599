//! Core business logic for the Kiloan referral/points ledger.
//!
//! This crate contains pure domain logic with no web or database
//! dependencies:
//! - Balance transitions for customer point accounts
//! - Referral code eligibility decisions
//! - Points redemption quoting
//! - Referral program settings and their defaults
//!
//! Storage orchestration (transactions, row locks, the append-only log)
//! lives in `kiloan-db`; everything here is deterministic and unit-testable.

pub mod points;
pub mod referral;
pub mod settings;

pub use points::{BalanceState, PointsError};
pub use referral::{ReferralApproval, ReferralRejection};
pub use settings::ProgramSettings;
