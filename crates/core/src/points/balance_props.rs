//! Property-based tests for balance transitions.
//!
//! - The balance is never negative after any sequence of operations
//! - Lifetime totals are monotonically non-decreasing
//! - `current_balance == total_earned - total_redeemed` from a zero start

use proptest::prelude::*;

use super::balance::BalanceState;

/// One ledger operation, as generated input.
#[derive(Debug, Clone, Copy)]
enum Op {
    Credit(i64),
    Debit(i64),
    Adjust(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..10_000).prop_map(Op::Credit),
        (1i64..10_000).prop_map(Op::Debit),
        (-10_000i64..10_000).prop_map(Op::Adjust),
    ]
}

fn apply(state: BalanceState, op: Op) -> Result<BalanceState, super::error::PointsError> {
    match op {
        Op::Credit(p) => state.apply_credit(p),
        Op::Debit(p) => state.apply_debit(p),
        Op::Adjust(d) => state.apply_adjustment(d),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The balance never goes negative, and a failed operation leaves the
    /// state untouched.
    #[test]
    fn prop_balance_never_negative(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut state = BalanceState::zero();
        for op in ops {
            match apply(state, op) {
                Ok(next) => {
                    prop_assert!(next.current_balance >= 0);
                    state = next;
                }
                Err(_) => {
                    // rejected operations must not be partially applied
                }
            }
            prop_assert!(state.current_balance >= 0);
        }
    }

    /// Lifetime totals only ever grow.
    #[test]
    fn prop_totals_monotone(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut state = BalanceState::zero();
        for op in ops {
            if let Ok(next) = apply(state, op) {
                prop_assert!(next.total_earned >= state.total_earned);
                prop_assert!(next.total_redeemed >= state.total_redeemed);
                state = next;
            }
        }
    }

    /// Starting from zero, the balance always equals earned minus redeemed —
    /// the same identity the transaction log's signed changes must sum to.
    #[test]
    fn prop_balance_equals_earned_minus_redeemed(
        ops in prop::collection::vec(op_strategy(), 1..64),
    ) {
        let mut state = BalanceState::zero();
        for op in ops {
            if let Ok(next) = apply(state, op) {
                state = next;
            }
            prop_assert_eq!(
                state.current_balance,
                state.total_earned - state.total_redeemed
            );
        }
    }

    /// A credit followed by an equal debit restores the spendable balance.
    #[test]
    fn prop_credit_debit_round_trip(start in 0i64..100_000, points in 1i64..10_000) {
        let state = BalanceState {
            current_balance: start,
            total_earned: start,
            total_redeemed: 0,
        };
        let after = state.apply_credit(points).unwrap().apply_debit(points).unwrap();
        prop_assert_eq!(after.current_balance, start);
    }
}
