//! Error types for points operations.

use thiserror::Error;

/// Errors that can occur when mutating or quoting a points balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PointsError {
    /// Point quantity is zero, negative, or otherwise malformed.
    #[error("Point amount must be positive")]
    InvalidAmount,

    /// The operation would drive the balance below zero.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Points requested by the operation.
        requested: i64,
        /// Points actually available.
        available: i64,
    },

    /// Balance is below the redemption minimum.
    #[error("Balance {balance} is below the redemption minimum of {minimum}")]
    BelowMinimum {
        /// The configured redemption floor.
        minimum: i64,
        /// The customer's current balance.
        balance: i64,
    },
}

impl PointsError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BelowMinimum { .. } => "BELOW_MINIMUM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PointsError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(
            PointsError::InsufficientBalance {
                requested: 25,
                available: 20,
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
        assert_eq!(
            PointsError::BelowMinimum {
                minimum: 50,
                balance: 5,
            }
            .error_code(),
            "BELOW_MINIMUM"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PointsError::InsufficientBalance {
            requested: 25,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: requested 25, available 20"
        );

        let err = PointsError::BelowMinimum {
            minimum: 50,
            balance: 5,
        };
        assert_eq!(
            err.to_string(),
            "Balance 5 is below the redemption minimum of 50"
        );
    }
}
