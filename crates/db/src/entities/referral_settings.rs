//! `SeaORM` Entity for the referral settings table.
//!
//! A singleton versioned by `is_active`: at most one row is active at a
//! time, enforced by a partial unique index.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub referral_discount_amount: Decimal,
    pub referrer_points_earned: i64,
    pub points_redemption_minimum: i64,
    pub points_redemption_value: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
