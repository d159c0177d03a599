//! Active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of point-changing event in the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "points_transaction_type"
)]
#[serde(rename_all = "snake_case")]
pub enum PointsTransactionType {
    /// Points credited to the account.
    #[sea_orm(string_value = "earned")]
    Earned,
    /// Points debited from the account.
    #[sea_orm(string_value = "redeemed")]
    Redeemed,
    /// Administrative correction, either sign.
    #[sea_orm(string_value = "manual_adjustment")]
    ManualAdjustment,
}

/// What caused a points transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "points_reference_type"
)]
#[serde(rename_all = "snake_case")]
pub enum PointsReferenceType {
    /// A recorded referral usage.
    #[sea_orm(string_value = "referral")]
    Referral,
    /// An administrative adjustment.
    #[sea_orm(string_value = "manual_adjustment")]
    ManualAdjustment,
    /// Points spent as a discount on an order.
    #[sea_orm(string_value = "order_redemption")]
    OrderRedemption,
    /// Test/debug entries, never produced by the core operations.
    #[sea_orm(string_value = "debug")]
    Debug,
}
