//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod points;
pub mod referral;
pub mod settings;

pub use points::{
    LedgerMutation, PointsRepoError, PointsRepository, TransactionReference,
};
pub use referral::{RecordedReferral, ReferralError, ReferralRepository};
pub use settings::{SettingsRepository, UpdateSettingsInput};
