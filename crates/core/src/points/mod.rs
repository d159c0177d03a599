//! Customer points accounting logic.
//!
//! This module implements the pure side of the points ledger:
//! - Balance state and the credit/debit/adjustment transitions
//! - The non-negative balance invariant
//! - Redemption quoting against program settings
//! - Error types for points operations

pub mod balance;
pub mod error;
pub mod redemption;

#[cfg(test)]
mod balance_props;

pub use balance::BalanceState;
pub use error::PointsError;
pub use redemption::{RedemptionQuote, redemption_quote};
