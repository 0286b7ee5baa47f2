//! Payment lifecycle state machine.
//!
//! Legal transitions:
//!
//! ```text
//! pending -> completed -> refunded
//!            completed -> pending    (administrative correction)
//! ```
//!
//! `refunded` is terminal for a row; collecting the same obligation again
//! requires a brand-new payment. Every transition is followed by a
//! reconciliation pass, no exceptions.

use super::error::BillingError;
use super::types::PaymentStatus;

/// Checks whether a payment status transition is legal.
pub const fn can_transition(from: PaymentStatus, to: PaymentStatus) -> Result<(), BillingError> {
    match (from, to) {
        (PaymentStatus::Pending, PaymentStatus::Completed)
        | (PaymentStatus::Completed, PaymentStatus::Refunded | PaymentStatus::Pending) => Ok(()),
        (PaymentStatus::Pending, PaymentStatus::Refunded) => {
            Err(BillingError::RefundRequiresCompleted)
        }
        (PaymentStatus::Refunded, _) => Err(BillingError::CannotModifyRefunded),
        (from, to) => Err(BillingError::InvalidTransition { from, to }),
    }
}

/// Checks whether a payment row allows field updates (amount, override,
/// method, reference).
pub const fn can_update_payment(status: PaymentStatus) -> Result<(), BillingError> {
    match status {
        PaymentStatus::Pending | PaymentStatus::Completed => Ok(()),
        PaymentStatus::Refunded => Err(BillingError::CannotModifyRefunded),
    }
}

/// Checks whether a payment row can be deleted (administrative reversal).
///
/// Refunded rows stay on the books for audit.
pub const fn can_delete_payment(status: PaymentStatus) -> Result<(), BillingError> {
    match status {
        PaymentStatus::Pending | PaymentStatus::Completed => Ok(()),
        PaymentStatus::Refunded => Err(BillingError::CannotDeleteRefunded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(PaymentStatus::Pending, PaymentStatus::Completed, true)]
    #[case(PaymentStatus::Completed, PaymentStatus::Refunded, true)]
    #[case(PaymentStatus::Completed, PaymentStatus::Pending, true)]
    #[case(PaymentStatus::Pending, PaymentStatus::Refunded, false)]
    #[case(PaymentStatus::Refunded, PaymentStatus::Pending, false)]
    #[case(PaymentStatus::Refunded, PaymentStatus::Completed, false)]
    fn test_transition_matrix(
        #[case] from: PaymentStatus,
        #[case] to: PaymentStatus,
        #[case] legal: bool,
    ) {
        assert_eq!(can_transition(from, to).is_ok(), legal);
    }

    #[test]
    fn test_cannot_refund_pending() {
        let result = can_transition(PaymentStatus::Pending, PaymentStatus::Refunded);
        assert!(matches!(result, Err(BillingError::RefundRequiresCompleted)));
    }

    #[test]
    fn test_refunded_is_terminal() {
        assert!(matches!(
            can_transition(PaymentStatus::Refunded, PaymentStatus::Pending),
            Err(BillingError::CannotModifyRefunded)
        ));
        assert!(matches!(
            can_transition(PaymentStatus::Refunded, PaymentStatus::Completed),
            Err(BillingError::CannotModifyRefunded)
        ));
    }

    #[test]
    fn test_update_rules() {
        assert!(can_update_payment(PaymentStatus::Pending).is_ok());
        assert!(can_update_payment(PaymentStatus::Completed).is_ok());
        assert!(can_update_payment(PaymentStatus::Refunded).is_err());
    }

    #[test]
    fn test_delete_rules() {
        assert!(can_delete_payment(PaymentStatus::Pending).is_ok());
        assert!(can_delete_payment(PaymentStatus::Completed).is_ok());
        assert!(matches!(
            can_delete_payment(PaymentStatus::Refunded),
            Err(BillingError::CannotDeleteRefunded)
        ));
    }

    fn status_strategy() -> impl Strategy<Value = PaymentStatus> {
        prop_oneof![
            Just(PaymentStatus::Pending),
            Just(PaymentStatus::Completed),
            Just(PaymentStatus::Refunded),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Nothing leaves the refunded state.
        #[test]
        fn prop_refunded_rejects_all_transitions(to in status_strategy()) {
            prop_assert!(can_transition(PaymentStatus::Refunded, to).is_err());
        }

        /// Self-transitions are never legal; callers must treat them as no-ops
        /// before reaching the state machine.
        #[test]
        fn prop_self_transition_rejected(status in status_strategy()) {
            prop_assert!(can_transition(status, status).is_err());
        }

        /// Update and delete permissions agree: a row is immutable exactly
        /// when it is refunded.
        #[test]
        fn prop_update_delete_agree(status in status_strategy()) {
            prop_assert_eq!(
                can_update_payment(status).is_ok(),
                can_delete_payment(status).is_ok()
            );
        }
    }
}
