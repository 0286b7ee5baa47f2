//! Enrollment balance reconciliation.
//!
//! This module implements the financial core of the system:
//! - Balance snapshot computation from payment rows
//! - Promo override resolution
//! - Payment status derivation
//! - The payment lifecycle state machine
//! - Error types for billing operations
//!
//! The enrollment's aggregate fields (`total_value`, `total_paid`,
//! `remaining_balance`, `payment_status`) are derived exclusively from the
//! payment rows through [`compute_balance`]; nothing else may write them.

pub mod engine;
pub mod error;
pub mod transition;
pub mod types;

pub use engine::{compute_balance, derive_balance_status, effective_total_value};
pub use error::BillingError;
pub use transition::{can_delete_payment, can_transition, can_update_payment};
pub use types::{BalanceSnapshot, BalanceStatus, PaymentRecord, PaymentStatus};
