//! `SeaORM` Entity for the referral usages table.
//!
//! One row per successful referral, written exactly once when the order
//! completes. The unique `(referred_customer_id, order_invoice_id)` index is
//! the idempotency guard against duplicate submission and the unique
//! `(referred_customer_id, referral_code)` index enforces one rewarded
//! relationship per customer per code. `discount_applied` and
//! `points_awarded` are fixed at creation from the settings active then.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_usages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub referrer_customer_id: Uuid,
    pub referred_customer_id: Uuid,
    pub referral_code: String,
    pub order_invoice_id: String,
    pub discount_applied: Decimal,
    pub points_awarded: i64,
    pub used_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::ReferrerCustomerId",
        to = "super::customers::Column::Id"
    )]
    Referrer,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::ReferredCustomerId",
        to = "super::customers::Column::Id"
    )]
    Referred,
}

impl ActiveModelBehavior for ActiveModel {}
