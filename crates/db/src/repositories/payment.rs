//! Payment repository and the transactional half of balance reconciliation.
//!
//! Every mutation here (create, update, delete, refund) stages the payment
//! write and then reconciles the owning enrollment's aggregate fields inside
//! the same database transaction. The aggregates are never written from any
//! other path.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use academe_core::billing::{
    self, BalanceSnapshot, BillingError, PaymentRecord, can_delete_payment, can_transition,
    can_update_payment,
};
use academe_shared::types::PaymentId;

use crate::entities::{
    enrollments, payments,
    sea_orm_active_enums::{BalanceStatus, PaymentStatus},
};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// Enrollment not found (caller-facing, validated before mutating).
    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(Uuid),

    /// Enrollment vanished between validation and reconciliation. This is a
    /// caller bug, not a user error.
    #[error("Enrollment {0} missing during reconciliation")]
    EnrollmentMissing(Uuid),

    /// Billing rule violation (validation or state machine).
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a payment against an enrollment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Owning enrollment.
    pub enrollment_id: Uuid,
    /// Amount collected. Must be positive.
    pub amount: Decimal,
    /// Initial status; `completed` for over-the-counter collection,
    /// `pending` for staged collection.
    pub status: PaymentStatus,
    /// Optional promotional total override.
    pub promo_override: Option<Decimal>,
    /// Payment method label (cash, gcash, bank transfer, ...).
    pub method: String,
    /// Optional receipt or bank reference number.
    pub reference_number: Option<String>,
    /// Cashier recording the payment.
    pub received_by: Uuid,
}

/// Input for correcting a payment row.
///
/// `None` fields are left unchanged. A status change must be a legal
/// transition of the payment state machine.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentInput {
    /// Corrected amount. Must be positive when present.
    pub amount: Option<Decimal>,
    /// Corrected status.
    pub status: Option<PaymentStatus>,
    /// Corrected promo override. `Some(None)` clears it.
    pub promo_override: Option<Option<Decimal>>,
    /// Corrected method label.
    pub method: Option<String>,
    /// Corrected reference number.
    pub reference_number: Option<Option<String>>,
}

/// Result of a payment mutation: the affected payment row and the
/// enrollment snapshot reconciled in the same transaction.
#[derive(Debug, Clone)]
pub struct PaymentMutation {
    /// The payment row after the mutation (the pre-delete row for deletes).
    pub payment: payments::Model,
    /// Reconciled aggregate state of the owning enrollment.
    pub snapshot: BalanceSnapshot,
}

/// Payment repository for payment mutations and reconciliation.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and reconciles the enrollment atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The enrollment does not exist
    /// - The amount or override is not positive
    /// - The database operation fails (the payment write rolls back too)
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
    ) -> Result<PaymentMutation, PaymentError> {
        validate_amount(input.amount)?;
        validate_override(input.promo_override)?;

        let txn = self.db.begin().await?;

        // Lock the enrollment up front: concurrent payments against the same
        // enrollment serialize here, so neither reconciliation reads a stale
        // payment set.
        let enrollment = lock_enrollment(&txn, input.enrollment_id)
            .await?
            .ok_or(PaymentError::EnrollmentNotFound(input.enrollment_id))?;

        let now = Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            enrollment_id: Set(enrollment.id),
            amount: Set(input.amount),
            status: Set(input.status),
            promo_override: Set(input.promo_override),
            method: Set(input.method),
            reference_number: Set(input.reference_number),
            received_by: Set(input.received_by),
            paid_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let snapshot = reconcile_locked(&txn, enrollment).await?;
        txn.commit().await?;

        Ok(PaymentMutation { payment, snapshot })
    }

    /// Corrects a payment row and reconciles the enrollment atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payment does not exist
    /// - The row is refunded (immutable)
    /// - A requested status change is not a legal transition
    /// - The corrected amount or override is not positive
    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        input: UpdatePaymentInput,
    ) -> Result<PaymentMutation, PaymentError> {
        if let Some(amount) = input.amount {
            validate_amount(amount)?;
        }
        if let Some(promo_override) = input.promo_override {
            validate_override(promo_override)?;
        }

        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;

        can_update_payment(payment.status.clone().into())?;
        if let Some(ref status) = input.status {
            if *status != payment.status {
                can_transition(payment.status.clone().into(), status.clone().into())?;
            }
        }

        let enrollment = lock_enrollment(&txn, payment.enrollment_id)
            .await?
            .ok_or(PaymentError::EnrollmentMissing(payment.enrollment_id))?;

        let mut active: payments::ActiveModel = payment.into();
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(promo_override) = input.promo_override {
            active.promo_override = Set(promo_override);
        }
        if let Some(method) = input.method {
            active.method = Set(method);
        }
        if let Some(reference_number) = input.reference_number {
            active.reference_number = Set(reference_number);
        }
        active.updated_at = Set(Utc::now().into());

        let payment = active.update(&txn).await?;

        let snapshot = reconcile_locked(&txn, enrollment).await?;
        txn.commit().await?;

        Ok(PaymentMutation { payment, snapshot })
    }

    /// Deletes a payment row (administrative reversal) and reconciles the
    /// enrollment atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist or is refunded.
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<PaymentMutation, PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;

        can_delete_payment(payment.status.clone().into())?;

        let enrollment = lock_enrollment(&txn, payment.enrollment_id)
            .await?
            .ok_or(PaymentError::EnrollmentMissing(payment.enrollment_id))?;

        payments::Entity::delete_by_id(payment_id).exec(&txn).await?;

        let snapshot = reconcile_locked(&txn, enrollment).await?;
        txn.commit().await?;

        Ok(PaymentMutation { payment, snapshot })
    }

    /// Refunds a completed payment and reconciles the enrollment atomically.
    ///
    /// The refunded row stops counting toward `total_paid` immediately; the
    /// row itself stays on the books and becomes immutable.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist or is not `completed`.
    pub async fn refund_payment(&self, payment_id: Uuid) -> Result<PaymentMutation, PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;

        can_transition(payment.status.clone().into(), billing::PaymentStatus::Refunded)?;

        let enrollment = lock_enrollment(&txn, payment.enrollment_id)
            .await?
            .ok_or(PaymentError::EnrollmentMissing(payment.enrollment_id))?;

        let mut active: payments::ActiveModel = payment.into();
        active.status = Set(PaymentStatus::Refunded);
        active.updated_at = Set(Utc::now().into());
        let payment = active.update(&txn).await?;

        let snapshot = reconcile_locked(&txn, enrollment).await?;
        txn.commit().await?;

        Ok(PaymentMutation { payment, snapshot })
    }

    /// Gets a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is not found or the query fails.
    pub async fn get_payment(&self, payment_id: Uuid) -> Result<payments::Model, PaymentError> {
        payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))
    }

    /// Lists the payments of an enrollment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentError> {
        let payments = payments::Entity::find()
            .filter(payments::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(payments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(payments)
    }

    /// Recomputes an enrollment's aggregates from its payment rows.
    ///
    /// Exposed for callers that need a reconciliation pass outside a payment
    /// mutation (the seeder, consistency checks). Runs in its own
    /// transaction; payment mutations use the staged variant internally.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentMissing` if the enrollment does not exist - callers
    /// must have validated existence already.
    pub async fn reconcile(&self, enrollment_id: Uuid) -> Result<BalanceSnapshot, PaymentError> {
        let txn = self.db.begin().await?;
        let snapshot = reconcile_in_txn(&txn, enrollment_id).await?;
        txn.commit().await?;
        Ok(snapshot)
    }
}

/// Reconciles within an existing transaction, locking the enrollment row.
///
/// # Errors
///
/// Returns `EnrollmentMissing` if the enrollment does not exist.
pub async fn reconcile_in_txn(
    txn: &DatabaseTransaction,
    enrollment_id: Uuid,
) -> Result<BalanceSnapshot, PaymentError> {
    let enrollment = lock_enrollment(txn, enrollment_id)
        .await?
        .ok_or(PaymentError::EnrollmentMissing(enrollment_id))?;
    reconcile_locked(txn, enrollment).await
}

/// Loads an enrollment row under `FOR UPDATE`.
async fn lock_enrollment(
    txn: &DatabaseTransaction,
    enrollment_id: Uuid,
) -> Result<Option<enrollments::Model>, DbErr> {
    enrollments::Entity::find_by_id(enrollment_id)
        .lock_exclusive()
        .one(txn)
        .await
}

/// Recomputes and writes the aggregates for an already-locked enrollment.
///
/// Loads the post-mutation payment set ordered by id (the override
/// tie-break order), computes the snapshot in core, and writes all four
/// aggregate fields back in one update.
async fn reconcile_locked(
    txn: &DatabaseTransaction,
    enrollment: enrollments::Model,
) -> Result<BalanceSnapshot, PaymentError> {
    let rows = payments::Entity::find()
        .filter(payments::Column::EnrollmentId.eq(enrollment.id))
        .order_by_asc(payments::Column::Id)
        .all(txn)
        .await?;

    let records: Vec<PaymentRecord> = rows
        .into_iter()
        .map(|p| PaymentRecord {
            id: PaymentId::from_uuid(p.id),
            amount: p.amount,
            status: p.status.into(),
            promo_override: p.promo_override,
        })
        .collect();

    let snapshot = billing::compute_balance(enrollment.total_value, &records);

    let mut active: enrollments::ActiveModel = enrollment.into();
    active.total_value = Set(snapshot.total_value);
    active.total_paid = Set(snapshot.total_paid);
    active.remaining_balance = Set(snapshot.remaining_balance);
    active.payment_status = Set(BalanceStatus::from(snapshot.payment_status));
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;

    tracing::debug!(
        total_paid = %snapshot.total_paid,
        remaining = %snapshot.remaining_balance,
        status = %snapshot.payment_status,
        "Enrollment reconciled"
    );

    Ok(snapshot)
}

fn validate_amount(amount: Decimal) -> Result<(), PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::NonPositiveAmount(amount).into());
    }
    Ok(())
}

fn validate_override(promo_override: Option<Decimal>) -> Result<(), PaymentError> {
    if let Some(value) = promo_override {
        if value <= Decimal::ZERO {
            return Err(BillingError::NonPositiveOverride(value).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(100)).is_ok());
        assert!(matches!(
            validate_amount(dec!(0)),
            Err(PaymentError::Billing(BillingError::NonPositiveAmount(_)))
        ));
        assert!(validate_amount(dec!(-5)).is_err());
    }

    #[test]
    fn test_validate_override() {
        assert!(validate_override(None).is_ok());
        assert!(validate_override(Some(dec!(9000))).is_ok());
        assert!(matches!(
            validate_override(Some(dec!(0))),
            Err(PaymentError::Billing(BillingError::NonPositiveOverride(_)))
        ));
    }

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Refunded,
        ] {
            let core: billing::PaymentStatus = status.clone().into();
            assert_eq!(PaymentStatus::from(core), status);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Validation accepts exactly the positive amounts.
        #[test]
        fn prop_amount_validation(n in -1_000_000i64..1_000_000i64) {
            let amount = Decimal::new(n, 2);
            prop_assert_eq!(validate_amount(amount).is_ok(), amount > Decimal::ZERO);
            prop_assert_eq!(
                validate_override(Some(amount)).is_ok(),
                amount > Decimal::ZERO
            );
        }
    }
}
