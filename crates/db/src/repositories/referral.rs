//! Referral repository: code validation, usage recording, redemption.
//!
//! Validation is a dry run over pre-fetched facts (the decision itself is
//! pure, in `kiloan-core`). Recording re-validates and then commits the
//! usage row and the referrer's credit in the SAME database transaction;
//! the unique `(referred_customer_id, order_invoice_id)` and
//! `(referred_customer_id, referral_code)` indexes backstop the duplicate
//! checks so concurrent or retried submissions credit exactly once.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use kiloan_core::points::{PointsError, RedemptionQuote, redemption_quote};
use kiloan_core::referral::{ReferralApproval, ReferralRejection, evaluate_referral};

use crate::entities::{customers, referral_usages};
use crate::repositories::points::{
    LedgerMutation, PointsRepoError, PointsRepository, TransactionReference, credit_within,
};
use crate::repositories::settings::resolve_settings;

/// Error types for referral operations.
#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    /// The code was rejected (not found, self-referral, already used).
    /// Expected outcome, surfaced to the customer as a plain message.
    #[error(transparent)]
    Rejected(#[from] ReferralRejection),

    /// A usage already exists for this customer and order.
    #[error("Referral already recorded for order {0}")]
    AlreadyRecorded(String),

    /// Points-level rejection (invalid amount, insufficient balance, floor).
    #[error(transparent)]
    Points(PointsError),

    /// Customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PointsError> for ReferralError {
    fn from(e: PointsError) -> Self {
        Self::Points(e)
    }
}

impl From<PointsRepoError> for ReferralError {
    fn from(e: PointsRepoError) -> Self {
        match e {
            PointsRepoError::Points(p) => Self::Points(p),
            PointsRepoError::CustomerNotFound(id) => Self::CustomerNotFound(id),
            PointsRepoError::Database(d) => Self::Database(d),
        }
    }
}

/// The result of recording a referral usage.
#[derive(Debug, Clone)]
pub struct RecordedReferral {
    /// The usage row written.
    pub usage: referral_usages::Model,
    /// Points credited to the referrer.
    pub points_awarded: i64,
    /// The referrer's balance after the credit.
    pub referrer_balance: i64,
}

/// Referral repository for validation, recording, and redemption.
#[derive(Debug, Clone)]
pub struct ReferralRepository {
    db: DatabaseConnection,
}

impl ReferralRepository {
    /// Creates a new referral repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates a referral code for a customer without mutating anything.
    ///
    /// Checks in order: code resolves, not a self-referral, not already
    /// used by this customer. A settings outage falls back to the default
    /// program parameters rather than blocking checkout.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with the reason, or a database error.
    pub async fn validate_referral_code(
        &self,
        code: &str,
        customer_id: Uuid,
    ) -> Result<ReferralApproval, ReferralError> {
        let owner = find_code_owner(&self.db, code).await?;
        let already_used = code_used_by(&self.db, customer_id, code).await?;
        let settings = resolve_settings(&self.db).await;

        Ok(evaluate_referral(owner, customer_id, already_used, &settings)?)
    }

    /// Records a referral usage for a completed order and credits the
    /// referrer, atomically.
    ///
    /// Re-validates first: codes can go stale between validation and order
    /// completion. Exactly one usage may exist per
    /// `(customer, order_invoice)` pair; a duplicate submission fails with
    /// `AlreadyRecorded` and credits nothing.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRecorded`, `Rejected`, or a database error.
    pub async fn record_referral_usage(
        &self,
        code: &str,
        customer_id: Uuid,
        order_invoice_id: &str,
    ) -> Result<RecordedReferral, ReferralError> {
        let txn = self.db.begin().await?;

        if order_usage_exists(&txn, customer_id, order_invoice_id).await? {
            return Err(ReferralError::AlreadyRecorded(order_invoice_id.to_string()));
        }

        let owner = find_code_owner(&txn, code).await?;
        let already_used = code_used_by(&txn, customer_id, code).await?;
        let settings = resolve_settings(&txn).await;
        let approval = evaluate_referral(owner, customer_id, already_used, &settings)?;

        let usage = referral_usages::ActiveModel {
            id: Set(Uuid::new_v4()),
            referrer_customer_id: Set(approval.referrer_customer_id),
            referred_customer_id: Set(customer_id),
            referral_code: Set(code.to_string()),
            order_invoice_id: Set(order_invoice_id.to_string()),
            discount_applied: Set(approval.discount_amount),
            points_awarded: Set(approval.points_awarded),
            used_at: Set(Utc::now().into()),
        };
        let usage = match usage.insert(&txn).await {
            Ok(usage) => usage,
            // Lost a race to a concurrent submission. The code-pair index
            // means this relationship was already rewarded on another
            // order; the order-pair index means this exact order was
            // already recorded.
            Err(e) => {
                return Err(match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(msg))
                        if msg.contains("uq_referral_usages_code") =>
                    {
                        ReferralRejection::AlreadyUsed.into()
                    }
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ReferralError::AlreadyRecorded(order_invoice_id.to_string())
                    }
                    _ => e.into(),
                });
            }
        };

        let mutation = credit_within(
            &txn,
            approval.referrer_customer_id,
            approval.points_awarded,
            TransactionReference::referral(order_invoice_id),
        )
        .await?;

        txn.commit().await?;

        Ok(RecordedReferral {
            usage,
            points_awarded: approval.points_awarded,
            referrer_balance: mutation.balance.current_balance,
        })
    }

    /// Quotes a points redemption against the customer's current balance
    /// and the active program settings. Advisory only; nothing is debited.
    ///
    /// # Errors
    ///
    /// Returns `Points` with `InvalidAmount`, `BelowMinimum`, or
    /// `InsufficientBalance`.
    pub async fn validate_points_redemption(
        &self,
        customer_id: Uuid,
        points_to_redeem: i64,
    ) -> Result<RedemptionQuote, ReferralError> {
        let balance = PointsRepository::new(self.db.clone())
            .get_balance(customer_id)
            .await;
        let settings = resolve_settings(&self.db).await;

        Ok(redemption_quote(
            balance.current_balance,
            points_to_redeem,
            &settings,
        )?)
    }

    /// Debits points spent as a discount on an order.
    ///
    /// # Errors
    ///
    /// Returns `Points` with `InvalidAmount` or `InsufficientBalance`, or a
    /// database error.
    pub async fn deduct_points(
        &self,
        customer_id: Uuid,
        points: i64,
        order_invoice_id: &str,
    ) -> Result<LedgerMutation, ReferralError> {
        let mutation = PointsRepository::new(self.db.clone())
            .debit(
                customer_id,
                points,
                TransactionReference::order_redemption(order_invoice_id),
            )
            .await?;
        Ok(mutation)
    }
}

/// Resolves a referral code to its owning customer, if any.
async fn find_code_owner<C: ConnectionTrait>(conn: &C, code: &str) -> Result<Option<Uuid>, DbErr> {
    Ok(customers::Entity::find()
        .filter(customers::Column::ReferralCode.eq(code))
        .one(conn)
        .await?
        .map(|c| c.id))
}

/// Whether this customer has already used this referral code.
async fn code_used_by<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    code: &str,
) -> Result<bool, DbErr> {
    Ok(referral_usages::Entity::find()
        .filter(referral_usages::Column::ReferredCustomerId.eq(customer_id))
        .filter(referral_usages::Column::ReferralCode.eq(code))
        .one(conn)
        .await?
        .is_some())
}

/// Whether a usage already exists for this customer and order.
async fn order_usage_exists<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    order_invoice_id: &str,
) -> Result<bool, DbErr> {
    Ok(referral_usages::Entity::find()
        .filter(referral_usages::Column::ReferredCustomerId.eq(customer_id))
        .filter(referral_usages::Column::OrderInvoiceId.eq(order_invoice_id))
        .one(conn)
        .await?
        .is_some())
}
