//! Settings repository: the single active referral settings row.
//!
//! Reads synthesize the default program parameters when no active row
//! exists or the lookup fails (a read-time fallback, never persisted; a
//! settings outage must not block checkout). Updates modify the
//! active row in place, creating it when absent. The settings record is
//! not versioned: past referral usages keep their realized amounts, but
//! the rules that produced them are not archived.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use kiloan_core::settings::ProgramSettings;

use crate::entities::referral_settings;

/// Partial update for the active settings row. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsInput {
    /// Currency amount granted to the referred customer.
    pub referral_discount_amount: Option<Decimal>,
    /// Points credited to the referrer per referral.
    pub referrer_points_earned: Option<i64>,
    /// Minimum balance required before redemption.
    pub points_redemption_minimum: Option<i64>,
    /// Currency value of one point.
    pub points_redemption_value: Option<Decimal>,
}

/// Settings repository for the referral program parameters.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the active settings, degrading to the defaults when no row
    /// is active or the lookup fails.
    ///
    /// Never fails the caller: a settings outage reads as the default
    /// program parameters, with the failure going to the log only.
    pub async fn get_settings(&self) -> ProgramSettings {
        resolve_settings(&self.db).await
    }

    /// Updates the active settings row in place, creating it when none
    /// exists. Returns the resulting row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update_settings(
        &self,
        input: UpdateSettingsInput,
    ) -> Result<referral_settings::Model, DbErr> {
        let now = Utc::now().into();

        if let Some(existing) = find_active(&self.db).await? {
            let mut active: referral_settings::ActiveModel = existing.into();
            if let Some(amount) = input.referral_discount_amount {
                active.referral_discount_amount = Set(amount);
            }
            if let Some(points) = input.referrer_points_earned {
                active.referrer_points_earned = Set(points);
            }
            if let Some(minimum) = input.points_redemption_minimum {
                active.points_redemption_minimum = Set(minimum);
            }
            if let Some(value) = input.points_redemption_value {
                active.points_redemption_value = Set(value);
            }
            active.updated_at = Set(now);
            return active.update(&self.db).await;
        }

        let defaults = ProgramSettings::default();
        let row = referral_settings::ActiveModel {
            id: Set(Uuid::new_v4()),
            referral_discount_amount: Set(input
                .referral_discount_amount
                .unwrap_or(defaults.referral_discount_amount)),
            referrer_points_earned: Set(input
                .referrer_points_earned
                .unwrap_or(defaults.referrer_points_earned)),
            points_redemption_minimum: Set(input
                .points_redemption_minimum
                .unwrap_or(defaults.points_redemption_minimum)),
            points_redemption_value: Set(input
                .points_redemption_value
                .unwrap_or(defaults.points_redemption_value)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        row.insert(&self.db).await
    }
}

/// Resolves the active settings, degrading to the defaults on any failure.
///
/// Referral and redemption flows use this: a settings outage must not
/// block a paying customer's checkout, so the failure goes to the log and
/// the defaults apply.
pub(crate) async fn resolve_settings<C: ConnectionTrait>(conn: &C) -> ProgramSettings {
    match find_active(conn).await {
        Ok(Some(row)) => settings_of(row),
        Ok(None) => ProgramSettings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Settings lookup failed, using defaults");
            ProgramSettings::default()
        }
    }
}

async fn find_active<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<referral_settings::Model>, DbErr> {
    referral_settings::Entity::find()
        .filter(referral_settings::Column::IsActive.eq(true))
        .one(conn)
        .await
}

fn settings_of(row: referral_settings::Model) -> ProgramSettings {
    ProgramSettings {
        referral_discount_amount: row.referral_discount_amount,
        referrer_points_earned: row.referrer_points_earned,
        points_redemption_minimum: row.points_redemption_minimum,
        points_redemption_value: row.points_redemption_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A disconnected handle makes every query fail, which is exactly the
    // outage the read path must absorb.
    #[tokio::test]
    async fn test_get_settings_degrades_to_defaults_without_storage() {
        let repo = SettingsRepository::new(DatabaseConnection::default());
        assert_eq!(repo.get_settings().await, ProgramSettings::default());
    }

    #[tokio::test]
    async fn test_resolve_settings_degrades_to_defaults_without_storage() {
        let conn = DatabaseConnection::default();
        assert_eq!(resolve_settings(&conn).await, ProgramSettings::default());
    }
}
