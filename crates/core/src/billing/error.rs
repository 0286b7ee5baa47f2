//! Billing error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::PaymentStatus;

/// Errors that can occur during billing operations.
#[derive(Debug, Error)]
pub enum BillingError {
    // ========== Validation Errors ==========
    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Promo override must be positive when present.
    #[error("Promo override must be positive, got {0}")]
    NonPositiveOverride(Decimal),

    // ========== State Errors ==========
    /// Illegal payment status transition.
    #[error("Cannot transition payment from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: PaymentStatus,
        /// Requested status.
        to: PaymentStatus,
    },

    /// Refunded payments are immutable.
    #[error("Cannot modify a refunded payment")]
    CannotModifyRefunded,

    /// Refunded payments are kept for audit and cannot be deleted.
    #[error("Cannot delete a refunded payment")]
    CannotDeleteRefunded,

    /// Only completed payments can be refunded.
    #[error("Only completed payments can be refunded")]
    RefundRequiresCompleted,
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveOverride(_) => "NON_POSITIVE_OVERRIDE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyRefunded => "CANNOT_MODIFY_REFUNDED",
            Self::CannotDeleteRefunded => "CANNOT_DELETE_REFUNDED",
            Self::RefundRequiresCompleted => "REFUND_REQUIRES_COMPLETED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveAmount(_) | Self::NonPositiveOverride(_) => 400,

            // 422 Unprocessable - state machine violations
            Self::InvalidTransition { .. }
            | Self::CannotModifyRefunded
            | Self::CannotDeleteRefunded
            | Self::RefundRequiresCompleted => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BillingError::NonPositiveAmount(dec!(0)).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            BillingError::InvalidTransition {
                from: PaymentStatus::Refunded,
                to: PaymentStatus::Completed,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            BillingError::RefundRequiresCompleted.error_code(),
            "REFUND_REQUIRES_COMPLETED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            BillingError::NonPositiveAmount(dec!(-5)).http_status_code(),
            400
        );
        assert_eq!(BillingError::CannotModifyRefunded.http_status_code(), 422);
    }

    #[test]
    fn test_error_display() {
        let err = BillingError::InvalidTransition {
            from: PaymentStatus::Pending,
            to: PaymentStatus::Refunded,
        };
        assert_eq!(
            err.to_string(),
            "Cannot transition payment from pending to refunded"
        );
    }
}
