//! Domain types for balance reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use academe_shared::types::PaymentId;

/// Lifecycle status of a single payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded but not yet collected; excluded from aggregation.
    Pending,
    /// Funds collected; the only status that counts toward `total_paid`.
    Completed,
    /// Returned to the payer; terminal, excluded from aggregation.
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

/// Derived settlement state of an enrollment.
///
/// Never stored independently; always recomputed from the payment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Nothing collected yet.
    Pending,
    /// Some amount collected, balance outstanding.
    Partial,
    /// Fully settled (remaining balance is zero).
    Paid,
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Partial => write!(f, "partial"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// The financially relevant view of one payment row, as read inside the
/// reconciliation transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment ID (UUIDv7, time-ordered; used for override tie-breaking).
    pub id: PaymentId,
    /// Amount collected or to be collected. Always positive.
    pub amount: Decimal,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// Optional promotional total override carried by this payment.
    pub promo_override: Option<Decimal>,
}

/// The reconciled aggregate state of an enrollment.
///
/// All four fields are mutually consistent: `remaining_balance` is derived
/// from `total_value` and `total_paid`, and `payment_status` from the other
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Effective total the enrollee is expected to pay.
    pub total_value: Decimal,
    /// Sum of completed payment amounts.
    pub total_paid: Decimal,
    /// Amount still owed, floored at zero.
    pub remaining_balance: Decimal,
    /// Derived settlement state.
    pub payment_status: BalanceStatus,
}
