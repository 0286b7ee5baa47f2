//! Postgres enum mappings for `SeaORM` entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role within the review center.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, manages staff accounts.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Manages student records, enrollments, and certificates.
    #[sea_orm(string_value = "registrar")]
    Registrar,
    /// Records payments and refunds.
    #[sea_orm(string_value = "cashier")]
    Cashier,
}

/// Lifecycle status of a payment row.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded but not yet collected.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Funds collected; counts toward the enrollment's totals.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Returned to the payer; terminal.
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// Derived settlement state of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "balance_status")]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Nothing collected yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Some amount collected, balance outstanding.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Attendance outcome for one review session.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Attended on time.
    #[sea_orm(string_value = "present")]
    Present,
    /// Did not attend.
    #[sea_orm(string_value = "absent")]
    Absent,
    /// Attended late.
    #[sea_orm(string_value = "late")]
    Late,
    /// Absence excused in advance.
    #[sea_orm(string_value = "excused")]
    Excused,
}

impl From<PaymentStatus> for academe_core::billing::PaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Completed => Self::Completed,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<academe_core::billing::PaymentStatus> for PaymentStatus {
    fn from(status: academe_core::billing::PaymentStatus) -> Self {
        match status {
            academe_core::billing::PaymentStatus::Pending => Self::Pending,
            academe_core::billing::PaymentStatus::Completed => Self::Completed,
            academe_core::billing::PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<academe_core::billing::BalanceStatus> for BalanceStatus {
    fn from(status: academe_core::billing::BalanceStatus) -> Self {
        match status {
            academe_core::billing::BalanceStatus::Pending => Self::Pending,
            academe_core::billing::BalanceStatus::Partial => Self::Partial,
            academe_core::billing::BalanceStatus::Paid => Self::Paid,
        }
    }
}

impl From<BalanceStatus> for academe_core::billing::BalanceStatus {
    fn from(status: BalanceStatus) -> Self {
        match status {
            BalanceStatus::Pending => Self::Pending,
            BalanceStatus::Partial => Self::Partial,
            BalanceStatus::Paid => Self::Paid,
        }
    }
}
