//! `SeaORM` Entity for the points transactions table.
//!
//! The append-only audit log. Rows are never updated or deleted; the
//! `BIGSERIAL` id gives the log its creation order and `balance_after`
//! checkpoints the account balance for reconciliation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PointsReferenceType, PointsTransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "points_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub customer_id: Uuid,
    pub transaction_type: PointsTransactionType,
    pub points_change: i64,
    pub balance_after: i64,
    pub reference_type: PointsReferenceType,
    pub reference_id: Option<String>,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
