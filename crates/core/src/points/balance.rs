//! Balance state and transition functions.
//!
//! A `BalanceState` mirrors one customer points account: the spendable
//! balance plus lifetime earned/redeemed totals. Transitions are pure and
//! return the next state; the repository layer is responsible for applying
//! them under a row lock and appending the matching log entry in the same
//! database transaction.

use super::error::PointsError;

/// A customer's point balance with lifetime aggregates.
///
/// Invariants maintained by the transitions:
/// - `current_balance >= 0` always
/// - `current_balance == total_earned - total_redeemed` (starting from zero)
/// - `total_earned` and `total_redeemed` are monotonically non-decreasing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceState {
    /// Points currently spendable.
    pub current_balance: i64,
    /// Lifetime sum of positive point changes.
    pub total_earned: i64,
    /// Lifetime sum of magnitudes of negative point changes.
    pub total_redeemed: i64,
}

impl BalanceState {
    /// Creates a zero-valued state, the implicit balance of a customer with
    /// no account yet.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            current_balance: 0,
            total_earned: 0,
            total_redeemed: 0,
        }
    }

    /// Applies a credit of `points` (> 0) and returns the next state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if `points` is not strictly positive or the
    /// addition would overflow.
    pub fn apply_credit(self, points: i64) -> Result<Self, PointsError> {
        if points <= 0 {
            return Err(PointsError::InvalidAmount);
        }

        let current_balance = self
            .current_balance
            .checked_add(points)
            .ok_or(PointsError::InvalidAmount)?;
        let total_earned = self
            .total_earned
            .checked_add(points)
            .ok_or(PointsError::InvalidAmount)?;

        Ok(Self {
            current_balance,
            total_earned,
            total_redeemed: self.total_redeemed,
        })
    }

    /// Applies a debit of `points` (> 0) and returns the next state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if `points` is not strictly positive, or
    /// `InsufficientBalance` if the debit would drive the balance negative.
    pub fn apply_debit(self, points: i64) -> Result<Self, PointsError> {
        if points <= 0 {
            return Err(PointsError::InvalidAmount);
        }
        if points > self.current_balance {
            return Err(PointsError::InsufficientBalance {
                requested: points,
                available: self.current_balance,
            });
        }

        Ok(Self {
            current_balance: self.current_balance - points,
            total_earned: self.total_earned,
            total_redeemed: self.total_redeemed.saturating_add(points),
        })
    }

    /// Applies a signed administrative adjustment and returns the next state.
    ///
    /// A positive delta counts toward `total_earned`, a negative one toward
    /// `total_redeemed`. The non-negative balance invariant still applies.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a zero delta (a no-op has no audit value)
    /// and `InsufficientBalance` if the result would go below zero.
    pub fn apply_adjustment(self, delta: i64) -> Result<Self, PointsError> {
        match delta {
            0 => Err(PointsError::InvalidAmount),
            d if d > 0 => self.apply_credit(d),
            d => self.apply_debit(d.checked_neg().ok_or(PointsError::InvalidAmount)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_zero() {
        let state = BalanceState::zero();
        assert_eq!(state.current_balance, 0);
        assert_eq!(state.total_earned, 0);
        assert_eq!(state.total_redeemed, 0);
        assert_eq!(state, BalanceState::default());
    }

    #[test]
    fn test_credit_updates_balance_and_earned() {
        let state = BalanceState::zero().apply_credit(50).unwrap();
        assert_eq!(state.current_balance, 50);
        assert_eq!(state.total_earned, 50);
        assert_eq!(state.total_redeemed, 0);
    }

    #[test]
    fn test_credit_rejects_non_positive() {
        assert_eq!(
            BalanceState::zero().apply_credit(0),
            Err(PointsError::InvalidAmount)
        );
        assert_eq!(
            BalanceState::zero().apply_credit(-10),
            Err(PointsError::InvalidAmount)
        );
    }

    #[test]
    fn test_debit_updates_balance_and_redeemed() {
        let state = BalanceState::zero()
            .apply_credit(50)
            .unwrap()
            .apply_debit(30)
            .unwrap();
        assert_eq!(state.current_balance, 20);
        assert_eq!(state.total_earned, 50);
        assert_eq!(state.total_redeemed, 30);
    }

    #[test]
    fn test_debit_never_drives_balance_negative() {
        let state = BalanceState {
            current_balance: 20,
            total_earned: 50,
            total_redeemed: 30,
        };
        let result = state.apply_debit(25);
        assert_eq!(
            result,
            Err(PointsError::InsufficientBalance {
                requested: 25,
                available: 20,
            })
        );
    }

    #[test]
    fn test_debit_rejects_non_positive() {
        let state = BalanceState::zero().apply_credit(100).unwrap();
        assert_eq!(state.apply_debit(0), Err(PointsError::InvalidAmount));
        assert_eq!(state.apply_debit(-5), Err(PointsError::InvalidAmount));
    }

    #[test]
    fn test_credit_then_debit_round_trips() {
        let before = BalanceState {
            current_balance: 10,
            total_earned: 10,
            total_redeemed: 0,
        };
        let after = before
            .apply_credit(100)
            .unwrap()
            .apply_debit(100)
            .unwrap();
        assert_eq!(after.current_balance, before.current_balance);
        assert_eq!(after.total_earned, 110);
        assert_eq!(after.total_redeemed, 100);
    }

    #[test]
    fn test_adjustment_positive_counts_as_earned() {
        let state = BalanceState::zero().apply_adjustment(15).unwrap();
        assert_eq!(state.current_balance, 15);
        assert_eq!(state.total_earned, 15);
    }

    #[test]
    fn test_adjustment_negative_counts_as_redeemed() {
        let state = BalanceState::zero()
            .apply_credit(40)
            .unwrap()
            .apply_adjustment(-15)
            .unwrap();
        assert_eq!(state.current_balance, 25);
        assert_eq!(state.total_redeemed, 15);
    }

    #[test]
    fn test_adjustment_rejects_zero_and_overdraft() {
        assert_eq!(
            BalanceState::zero().apply_adjustment(0),
            Err(PointsError::InvalidAmount)
        );
        assert_eq!(
            BalanceState::zero().apply_adjustment(-1),
            Err(PointsError::InsufficientBalance {
                requested: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let state = BalanceState {
            current_balance: i64::MAX,
            total_earned: i64::MAX,
            total_redeemed: 0,
        };
        assert_eq!(state.apply_credit(1), Err(PointsError::InvalidAmount));
    }
}
