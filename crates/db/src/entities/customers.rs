//! `SeaORM` Entity for the customers table.
//!
//! The customer record proper is owned by the intake system; this is the
//! minimal projection the ledger needs so referral codes resolve to an
//! owner and the foreign keys hold.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub referral_code: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::customer_points_accounts::Entity")]
    CustomerPointsAccounts,
    #[sea_orm(has_many = "super::points_transactions::Entity")]
    PointsTransactions,
}

impl Related<super::customer_points_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerPointsAccounts.def()
    }
}

impl Related<super::points_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointsTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
