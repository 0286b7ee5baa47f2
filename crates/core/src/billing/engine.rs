//! Balance snapshot computation.
//!
//! Pure functions that derive an enrollment's aggregate financial state from
//! its payment rows. The transactional wrapper in the db crate calls
//! [`compute_balance`] inside the same transaction as the triggering payment
//! mutation and persists the snapshot it returns.

use rust_decimal::Decimal;

use super::types::{BalanceSnapshot, BalanceStatus, PaymentRecord, PaymentStatus};

/// Resolves the effective total value for an enrollment.
///
/// The nominal total stands unless some payment row carries a positive promo
/// override; then the override on the payment with the lowest id wins.
/// Payment ids are UUIDv7, so the lowest id is also the oldest row.
#[must_use]
pub fn effective_total_value(nominal_total: Decimal, payments: &[PaymentRecord]) -> Decimal {
    payments
        .iter()
        .filter(|p| p.promo_override.is_some_and(|o| o > Decimal::ZERO))
        .min_by_key(|p| p.id)
        .and_then(|p| p.promo_override)
        .unwrap_or(nominal_total)
}

/// Derives the settlement status from the reconciled pair of totals.
#[must_use]
pub fn derive_balance_status(total_paid: Decimal, remaining_balance: Decimal) -> BalanceStatus {
    if remaining_balance.is_zero() {
        BalanceStatus::Paid
    } else if total_paid > Decimal::ZERO {
        BalanceStatus::Partial
    } else {
        BalanceStatus::Pending
    }
}

/// Computes the reconciled balance snapshot for an enrollment.
///
/// * `total_paid` sums the amounts of `completed` rows only; `pending` and
///   `refunded` rows contribute nothing.
/// * The effective total replaces the nominal total when a promo override is
///   present, and is returned in `total_value` so the caller writes it back.
/// * `remaining_balance` is clamped at zero (overpayment is a defined edge
///   case, not an error).
/// * An empty payment set yields zero paid, the full effective total owing,
///   and `pending` status.
///
/// Deterministic in the set of rows: the result does not depend on slice
/// order.
#[must_use]
pub fn compute_balance(nominal_total: Decimal, payments: &[PaymentRecord]) -> BalanceSnapshot {
    let total_paid: Decimal = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount)
        .sum();

    let total_value = effective_total_value(nominal_total, payments);
    let remaining_balance = (total_value - total_paid).max(Decimal::ZERO);
    let payment_status = derive_balance_status(total_paid, remaining_balance);

    BalanceSnapshot {
        total_value,
        total_paid,
        remaining_balance,
        payment_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academe_shared::types::PaymentId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment(amount: Decimal, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(),
            amount,
            status,
            promo_override: None,
        }
    }

    fn payment_with_override(
        amount: Decimal,
        status: PaymentStatus,
        promo_override: Decimal,
    ) -> PaymentRecord {
        PaymentRecord {
            id: PaymentId::new(),
            amount,
            status,
            promo_override: Some(promo_override),
        }
    }

    // ========================================================================
    // Literal end-to-end scenarios
    // ========================================================================

    #[test]
    fn test_exact_payment_settles() {
        let payments = vec![payment(dec!(15000), PaymentStatus::Completed)];
        let snap = compute_balance(dec!(15000), &payments);

        assert_eq!(snap.total_paid, dec!(15000));
        assert_eq!(snap.remaining_balance, dec!(0));
        assert_eq!(snap.payment_status, BalanceStatus::Paid);
    }

    #[test]
    fn test_overpayment_clamps_to_zero() {
        let payments = vec![
            payment(dec!(15000), PaymentStatus::Completed),
            payment(dec!(5000), PaymentStatus::Completed),
        ];
        let snap = compute_balance(dec!(15000), &payments);

        assert_eq!(snap.total_paid, dec!(20000));
        assert_eq!(snap.remaining_balance, dec!(0));
        assert_eq!(snap.payment_status, BalanceStatus::Paid);
    }

    #[test]
    fn test_partial_payment() {
        let payments = vec![payment(dec!(4000), PaymentStatus::Completed)];
        let snap = compute_balance(dec!(10000), &payments);

        assert_eq!(snap.total_paid, dec!(4000));
        assert_eq!(snap.remaining_balance, dec!(6000));
        assert_eq!(snap.payment_status, BalanceStatus::Partial);
    }

    #[test]
    fn test_refund_reverts_to_pending() {
        // The partial payment above, refunded.
        let payments = vec![payment(dec!(4000), PaymentStatus::Refunded)];
        let snap = compute_balance(dec!(10000), &payments);

        assert_eq!(snap.total_paid, dec!(0));
        assert_eq!(snap.remaining_balance, dec!(10000));
        assert_eq!(snap.payment_status, BalanceStatus::Pending);
    }

    #[test]
    fn test_promo_override_replaces_total() {
        let payments = vec![payment_with_override(
            dec!(3000),
            PaymentStatus::Completed,
            dec!(9000),
        )];
        let snap = compute_balance(dec!(12000), &payments);

        assert_eq!(snap.total_value, dec!(9000));
        assert_eq!(snap.total_paid, dec!(3000));
        assert_eq!(snap.remaining_balance, dec!(6000));
        assert_eq!(snap.payment_status, BalanceStatus::Partial);
    }

    #[test]
    fn test_last_payment_deleted() {
        // Deleting the only completed payment leaves no rows at all.
        let snap = compute_balance(dec!(10000), &[]);

        assert_eq!(snap.total_paid, dec!(0));
        assert_eq!(snap.remaining_balance, dec!(10000));
        assert_eq!(snap.payment_status, BalanceStatus::Pending);
    }

    #[test]
    fn test_pending_rows_do_not_count() {
        let payments = vec![
            payment(dec!(2000), PaymentStatus::Completed),
            payment(dec!(3000), PaymentStatus::Pending),
        ];
        let snap = compute_balance(dec!(10000), &payments);

        assert_eq!(snap.total_paid, dec!(2000));
        assert_eq!(snap.remaining_balance, dec!(8000));
    }

    #[test]
    fn test_lowest_id_override_wins() {
        // UUIDv7 ids are time-ordered; construct two fixed ids so the
        // tie-break is explicit regardless of slice order.
        let low =
            PaymentId::from_uuid(Uuid::parse_str("018f0000-0000-7000-8000-000000000001").unwrap());
        let high =
            PaymentId::from_uuid(Uuid::parse_str("018f0000-0000-7000-8000-000000000002").unwrap());

        let a = PaymentRecord {
            id: low,
            amount: dec!(1000),
            status: PaymentStatus::Completed,
            promo_override: Some(dec!(8000)),
        };
        let b = PaymentRecord {
            id: high,
            amount: dec!(1000),
            status: PaymentStatus::Completed,
            promo_override: Some(dec!(5000)),
        };

        let forward = compute_balance(dec!(12000), &[a.clone(), b.clone()]);
        let reversed = compute_balance(dec!(12000), &[b, a]);

        assert_eq!(forward.total_value, dec!(8000));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_zero_override_ignored() {
        let payments = vec![payment_with_override(
            dec!(1000),
            PaymentStatus::Completed,
            dec!(0),
        )];
        let snap = compute_balance(dec!(5000), &payments);

        assert_eq!(snap.total_value, dec!(5000));
    }

    #[test]
    fn test_override_on_refunded_row_still_applies() {
        // The override rides on the row, not on its status.
        let payments = vec![payment_with_override(
            dec!(3000),
            PaymentStatus::Refunded,
            dec!(7000),
        )];
        let snap = compute_balance(dec!(12000), &payments);

        assert_eq!(snap.total_value, dec!(7000));
        assert_eq!(snap.total_paid, dec!(0));
        assert_eq!(snap.remaining_balance, dec!(7000));
    }

    // ========================================================================
    // Property suites
    // ========================================================================

    /// Strategy for generating positive decimal amounts
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating payment statuses
    fn status_strategy() -> impl Strategy<Value = PaymentStatus> {
        prop_oneof![
            Just(PaymentStatus::Pending),
            Just(PaymentStatus::Completed),
            Just(PaymentStatus::Refunded),
        ]
    }

    /// Strategy for generating a payment record
    fn payment_strategy() -> impl Strategy<Value = PaymentRecord> {
        (
            amount_strategy(),
            status_strategy(),
            prop::option::of(amount_strategy()),
        )
            .prop_map(|(amount, status, promo_override)| PaymentRecord {
                id: PaymentId::new(),
                amount,
                status,
                promo_override,
            })
    }

    /// Strategy for generating a set of payments for one enrollment
    fn payments_strategy(max_len: usize) -> impl Strategy<Value = Vec<PaymentRecord>> {
        prop::collection::vec(payment_strategy(), 0..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Recomputing with unchanged inputs yields an identical snapshot.
        #[test]
        fn prop_reconcile_is_idempotent(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let first = compute_balance(nominal, &payments);
            let second = compute_balance(nominal, &payments);
            prop_assert_eq!(first, second);
        }

        /// `total_paid` always equals the sum over completed rows.
        #[test]
        fn prop_total_paid_sums_completed(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let snap = compute_balance(nominal, &payments);
            let expected: Decimal = payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Completed)
                .map(|p| p.amount)
                .sum();
            prop_assert_eq!(snap.total_paid, expected);
        }

        /// `remaining_balance` is never negative, no matter the overpayment.
        #[test]
        fn prop_remaining_balance_non_negative(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let snap = compute_balance(nominal, &payments);
            prop_assert!(snap.remaining_balance >= Decimal::ZERO);
        }

        /// The status table is exact: never `paid` with a balance owing,
        /// never `pending` once something has been collected.
        #[test]
        fn prop_status_matches_table(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let snap = compute_balance(nominal, &payments);
            let expected = if snap.remaining_balance.is_zero() {
                BalanceStatus::Paid
            } else if snap.total_paid > Decimal::ZERO {
                BalanceStatus::Partial
            } else {
                BalanceStatus::Pending
            };
            prop_assert_eq!(snap.payment_status, expected);
        }

        /// A positive override on any row replaces the nominal total.
        #[test]
        fn prop_override_takes_precedence(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let snap = compute_balance(nominal, &payments);
            let has_override = payments
                .iter()
                .any(|p| p.promo_override.is_some_and(|o| o > Decimal::ZERO));

            if has_override {
                prop_assert!(
                    payments.iter().any(|p| p.promo_override == Some(snap.total_value)),
                    "total_value must come from some payment's override"
                );
            } else {
                prop_assert_eq!(snap.total_value, nominal);
            }
        }

        /// The snapshot does not depend on the order rows were loaded in.
        #[test]
        fn prop_order_independent(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let forward = compute_balance(nominal, &payments);
            let mut reversed = payments.clone();
            reversed.reverse();
            prop_assert_eq!(forward, compute_balance(nominal, &reversed));
        }

        /// remaining = max(0, total_value - total_paid), always.
        #[test]
        fn prop_balance_formula(
            nominal in amount_strategy(),
            payments in payments_strategy(12),
        ) {
            let snap = compute_balance(nominal, &payments);
            prop_assert_eq!(
                snap.remaining_balance,
                (snap.total_value - snap.total_paid).max(Decimal::ZERO)
            );
        }
    }
}
