//! Points repository: the single choke point for balance mutations.
//!
//! Every mutation runs inside one database transaction that locks the
//! account row (`SELECT ... FOR UPDATE`), applies the pure balance
//! transition, and appends the matching log entry before committing. Two
//! concurrent debits against the same account therefore serialize: the
//! loser re-reads the committed balance and fails `InsufficientBalance` at
//! commit time, never after the fact.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use kiloan_core::points::{BalanceState, PointsError};
use kiloan_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    customer_points_accounts, customers, points_transactions,
    sea_orm_active_enums::{PointsReferenceType, PointsTransactionType},
};

/// Error types for points ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum PointsRepoError {
    /// Domain-level rejection (invalid amount, insufficient balance, floor).
    #[error(transparent)]
    Points(#[from] PointsError),

    /// Customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// What caused a ledger mutation, carried onto the log entry.
#[derive(Debug, Clone)]
pub struct TransactionReference {
    /// Category of the cause.
    pub reference_type: PointsReferenceType,
    /// Pointer to the causing entity (order invoice, referral code, ...).
    pub reference_id: Option<String>,
    /// Human-readable free text.
    pub description: String,
}

impl TransactionReference {
    /// Reference for a referral reward credit.
    #[must_use]
    pub fn referral(order_invoice_id: &str) -> Self {
        Self {
            reference_type: PointsReferenceType::Referral,
            reference_id: Some(order_invoice_id.to_string()),
            description: format!("Referral reward for order {order_invoice_id}"),
        }
    }

    /// Reference for points spent as an order discount.
    #[must_use]
    pub fn order_redemption(order_invoice_id: &str) -> Self {
        Self {
            reference_type: PointsReferenceType::OrderRedemption,
            reference_id: Some(order_invoice_id.to_string()),
            description: format!("Points redeemed for order {order_invoice_id}"),
        }
    }

    /// Reference for an administrative adjustment.
    #[must_use]
    pub fn manual(description: Option<String>) -> Self {
        Self {
            reference_type: PointsReferenceType::ManualAdjustment,
            reference_id: None,
            description: description.unwrap_or_else(|| "Manual adjustment".to_string()),
        }
    }
}

/// The result of an applied mutation: the new balance plus the log entry
/// written for it.
#[derive(Debug, Clone)]
pub struct LedgerMutation {
    /// Balance state after the mutation.
    pub balance: BalanceState,
    /// The appended transaction log entry.
    pub entry: points_transactions::Model,
}

/// Points repository for balance reads and ledger mutations.
#[derive(Debug, Clone)]
pub struct PointsRepository {
    db: DatabaseConnection,
}

impl PointsRepository {
    /// Creates a new points repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the customer's balance, or the zero-valued default when no
    /// account exists yet.
    ///
    /// Never fails the caller: on a storage error the zero default is
    /// returned and the failure goes to the log only, so a points outage
    /// cannot block checkout.
    pub async fn get_balance(&self, customer_id: Uuid) -> BalanceState {
        match customer_points_accounts::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
        {
            Ok(Some(account)) => state_of(&account),
            Ok(None) => BalanceState::zero(),
            Err(e) => {
                tracing::error!(
                    customer_id = %customer_id,
                    error = %e,
                    "Balance lookup failed, degrading to zero"
                );
                BalanceState::zero()
            }
        }
    }

    /// Credits `points` (> 0) to the customer, creating the account on
    /// first use, and appends an `earned` log entry atomically.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive points, `CustomerNotFound`,
    /// or a database error.
    pub async fn credit(
        &self,
        customer_id: Uuid,
        points: i64,
        reference: TransactionReference,
    ) -> Result<LedgerMutation, PointsRepoError> {
        let txn = self.db.begin().await?;
        let applied = credit_within(&txn, customer_id, points, reference).await?;
        txn.commit().await?;
        Ok(applied)
    }

    /// Debits `points` (> 0) from the customer and appends a `redeemed` log
    /// entry atomically. Never drives the balance negative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount`, `InsufficientBalance` (decided under the row
    /// lock), or a database error.
    pub async fn debit(
        &self,
        customer_id: Uuid,
        points: i64,
        reference: TransactionReference,
    ) -> Result<LedgerMutation, PointsRepoError> {
        let txn = self.db.begin().await?;
        let applied = debit_within(&txn, customer_id, points, reference).await?;
        txn.commit().await?;
        Ok(applied)
    }

    /// Applies a signed administrative adjustment with a
    /// `manual_adjustment` log entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero delta, `InsufficientBalance` if
    /// the result would go below zero, or a database error.
    pub async fn adjust(
        &self,
        customer_id: Uuid,
        delta: i64,
        description: Option<String>,
    ) -> Result<LedgerMutation, PointsRepoError> {
        let txn = self.db.begin().await?;
        let applied = adjust_within(&txn, customer_id, delta, description).await?;
        txn.commit().await?;
        Ok(applied)
    }

    /// Lists the customer's transaction log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        customer_id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<points_transactions::Model>, PointsRepoError> {
        let paginator = points_transactions::Entity::find()
            .filter(points_transactions::Column::CustomerId.eq(customer_id))
            .order_by_desc(points_transactions::Column::Id)
            .paginate(&self.db, page.limit().max(1));

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok(PageResponse::new(items, page.page, page.per_page, total))
    }
}

/// Credits within an existing transaction, so callers (e.g. referral
/// recording) can combine the credit with their own writes atomically.
pub(crate) async fn credit_within(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
    points: i64,
    reference: TransactionReference,
) -> Result<LedgerMutation, PointsRepoError> {
    if points <= 0 {
        return Err(PointsError::InvalidAmount.into());
    }

    ensure_customer(txn, customer_id).await?;
    let account = lock_or_create_account(txn, customer_id).await?;
    let next = state_of(&account).apply_credit(points)?;

    persist_mutation(
        txn,
        account,
        next,
        PointsTransactionType::Earned,
        points,
        reference,
    )
    .await
}

/// Debits within an existing transaction. An absent account is an empty
/// balance, so any positive debit against it is insufficient.
pub(crate) async fn debit_within(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
    points: i64,
    reference: TransactionReference,
) -> Result<LedgerMutation, PointsRepoError> {
    if points <= 0 {
        return Err(PointsError::InvalidAmount.into());
    }

    let Some(account) = lock_account(txn, customer_id).await? else {
        return Err(PointsError::InsufficientBalance {
            requested: points,
            available: 0,
        }
        .into());
    };
    let next = state_of(&account).apply_debit(points)?;

    persist_mutation(
        txn,
        account,
        next,
        PointsTransactionType::Redeemed,
        -points,
        reference,
    )
    .await
}

/// Adjusts within an existing transaction.
pub(crate) async fn adjust_within(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
    delta: i64,
    description: Option<String>,
) -> Result<LedgerMutation, PointsRepoError> {
    if delta == 0 {
        return Err(PointsError::InvalidAmount.into());
    }

    let account = if delta > 0 {
        ensure_customer(txn, customer_id).await?;
        lock_or_create_account(txn, customer_id).await?
    } else {
        lock_account(txn, customer_id)
            .await?
            .ok_or(PointsError::InsufficientBalance {
                requested: delta.saturating_neg(),
                available: 0,
            })?
    };
    let next = state_of(&account).apply_adjustment(delta)?;

    persist_mutation(
        txn,
        account,
        next,
        PointsTransactionType::ManualAdjustment,
        delta,
        TransactionReference::manual(description),
    )
    .await
}

/// Converts an account row into its pure balance state.
fn state_of(account: &customer_points_accounts::Model) -> BalanceState {
    BalanceState {
        current_balance: account.current_balance,
        total_earned: account.total_earned,
        total_redeemed: account.total_redeemed,
    }
}

async fn ensure_customer(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
) -> Result<(), PointsRepoError> {
    customers::Entity::find_by_id(customer_id)
        .one(txn)
        .await?
        .ok_or(PointsRepoError::CustomerNotFound(customer_id))?;
    Ok(())
}

/// Locks the account row for the duration of the enclosing transaction.
async fn lock_account(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
) -> Result<Option<customer_points_accounts::Model>, DbErr> {
    customer_points_accounts::Entity::find_by_id(customer_id)
        .lock_exclusive()
        .one(txn)
        .await
}

/// Creates the account with a zero baseline if absent, then locks it.
///
/// The insert is `ON CONFLICT DO NOTHING`, so two first-time credits for
/// the same new customer cannot race past each other: whichever loses the
/// insert still locks the row the winner created.
async fn lock_or_create_account(
    txn: &DatabaseTransaction,
    customer_id: Uuid,
) -> Result<customer_points_accounts::Model, PointsRepoError> {
    let baseline = customer_points_accounts::ActiveModel {
        customer_id: Set(customer_id),
        current_balance: Set(0),
        total_earned: Set(0),
        total_redeemed: Set(0),
        updated_at: Set(Utc::now().into()),
    };

    customer_points_accounts::Entity::insert(baseline)
        .on_conflict(
            OnConflict::column(customer_points_accounts::Column::CustomerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    lock_account(txn, customer_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("points account {customer_id}")).into())
}

/// Writes the account update and the log append as one unit. The caller's
/// transaction makes them atomic: either both are visible or neither is.
async fn persist_mutation(
    txn: &DatabaseTransaction,
    account: customer_points_accounts::Model,
    next: BalanceState,
    transaction_type: PointsTransactionType,
    points_change: i64,
    reference: TransactionReference,
) -> Result<LedgerMutation, PointsRepoError> {
    let now = Utc::now().into();
    let customer_id = account.customer_id;

    let mut active: customer_points_accounts::ActiveModel = account.into();
    active.current_balance = Set(next.current_balance);
    active.total_earned = Set(next.total_earned);
    active.total_redeemed = Set(next.total_redeemed);
    active.updated_at = Set(now);
    active.update(txn).await?;

    let entry = points_transactions::ActiveModel {
        customer_id: Set(customer_id),
        transaction_type: Set(transaction_type),
        points_change: Set(points_change),
        balance_after: Set(next.current_balance),
        reference_type: Set(reference.reference_type),
        reference_id: Set(reference.reference_id),
        description: Set(reference.description),
        created_at: Set(now),
        ..Default::default()
    };
    let entry = entry.insert(txn).await?;

    Ok(LedgerMutation {
        balance: next,
        entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_reference_shape() {
        let reference = TransactionReference::referral("INV001");
        assert_eq!(reference.reference_type, PointsReferenceType::Referral);
        assert_eq!(reference.reference_id.as_deref(), Some("INV001"));
        assert!(reference.description.contains("INV001"));
    }

    #[test]
    fn test_order_redemption_reference_shape() {
        let reference = TransactionReference::order_redemption("INV002");
        assert_eq!(
            reference.reference_type,
            PointsReferenceType::OrderRedemption
        );
        assert_eq!(reference.reference_id.as_deref(), Some("INV002"));
    }

    #[test]
    fn test_manual_reference_defaults_description() {
        let reference = TransactionReference::manual(None);
        assert_eq!(
            reference.reference_type,
            PointsReferenceType::ManualAdjustment
        );
        assert_eq!(reference.reference_id, None);
        assert_eq!(reference.description, "Manual adjustment");

        let reference = TransactionReference::manual(Some("Goodwill credit".to_string()));
        assert_eq!(reference.description, "Goodwill credit");
    }
}
