//! `SeaORM` entity definitions.

pub mod customer_points_accounts;
pub mod customers;
pub mod points_transactions;
pub mod referral_settings;
pub mod referral_usages;
pub mod sea_orm_active_enums;
