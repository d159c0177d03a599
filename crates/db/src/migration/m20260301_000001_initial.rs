//! Initial database migration.
//!
//! Creates the points ledger schema: enums, tables, indexes, the
//! `updated_at` trigger, and the seed settings row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CUSTOMERS (ledger projection of the intake system)
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: POINTS LEDGER
        // ============================================================
        db.execute_unprepared(CUSTOMER_POINTS_ACCOUNTS_SQL).await?;
        db.execute_unprepared(POINTS_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: REFERRAL PROGRAM
        // ============================================================
        db.execute_unprepared(REFERRAL_USAGES_SQL).await?;
        db.execute_unprepared(REFERRAL_SETTINGS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Kind of point-changing event
CREATE TYPE points_transaction_type AS ENUM (
    'earned',
    'redeemed',
    'manual_adjustment'
);

-- What caused a points transaction
CREATE TYPE points_reference_type AS ENUM (
    'referral',
    'manual_adjustment',
    'order_redemption',
    'debug'
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name TEXT NOT NULL,
    referral_code TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CUSTOMER_POINTS_ACCOUNTS_SQL: &str = r"
CREATE TABLE customer_points_accounts (
    customer_id UUID PRIMARY KEY REFERENCES customers(id),
    current_balance BIGINT NOT NULL DEFAULT 0 CHECK (current_balance >= 0),
    total_earned BIGINT NOT NULL DEFAULT 0 CHECK (total_earned >= 0),
    total_redeemed BIGINT NOT NULL DEFAULT 0 CHECK (total_redeemed >= 0),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const POINTS_TRANSACTIONS_SQL: &str = r"
-- Append-only audit log. BIGSERIAL id gives the log its creation order.
CREATE TABLE points_transactions (
    id BIGSERIAL PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id),
    transaction_type points_transaction_type NOT NULL,
    points_change BIGINT NOT NULL,
    balance_after BIGINT NOT NULL CHECK (balance_after >= 0),
    reference_type points_reference_type NOT NULL,
    reference_id TEXT,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_points_transactions_customer
    ON points_transactions(customer_id, id DESC);
";

const REFERRAL_USAGES_SQL: &str = r"
CREATE TABLE referral_usages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    referrer_customer_id UUID NOT NULL REFERENCES customers(id),
    referred_customer_id UUID NOT NULL REFERENCES customers(id),
    referral_code TEXT NOT NULL,
    order_invoice_id TEXT NOT NULL,
    discount_applied NUMERIC(15, 2) NOT NULL,
    points_awarded BIGINT NOT NULL,
    used_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_no_self_referral
        CHECK (referrer_customer_id <> referred_customer_id)
);

-- Idempotency guard: at most one usage per customer per order
CREATE UNIQUE INDEX uq_referral_usages_order
    ON referral_usages(referred_customer_id, order_invoice_id);

-- Once-per-code guard: one rewarded relationship per customer per code
CREATE UNIQUE INDEX uq_referral_usages_code
    ON referral_usages(referred_customer_id, referral_code);
";

const REFERRAL_SETTINGS_SQL: &str = r"
CREATE TABLE referral_settings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    referral_discount_amount NUMERIC(15, 2) NOT NULL,
    referrer_points_earned BIGINT NOT NULL,
    points_redemption_minimum BIGINT NOT NULL,
    points_redemption_value NUMERIC(15, 2) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Exactly one active settings row at a time
CREATE UNIQUE INDEX uq_referral_settings_active
    ON referral_settings(is_active) WHERE is_active;
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_customer_points_accounts_updated_at
    BEFORE UPDATE ON customer_points_accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_referral_settings_updated_at
    BEFORE UPDATE ON referral_settings
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_SETTINGS_SQL: &str = r"
INSERT INTO referral_settings (
    referral_discount_amount,
    referrer_points_earned,
    points_redemption_minimum,
    points_redemption_value,
    is_active
) VALUES (5000, 10, 50, 100, true);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS referral_usages;
DROP TABLE IF EXISTS points_transactions;
DROP TABLE IF EXISTS customer_points_accounts;
DROP TABLE IF EXISTS referral_settings;
DROP TABLE IF EXISTS customers;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS points_reference_type;
DROP TYPE IF EXISTS points_transaction_type;
";
