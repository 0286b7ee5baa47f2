//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One enrollment's line in the collections report.
///
/// All monetary fields are the persisted aggregates written by the
/// reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentCollectionRow {
    /// Enrollment ID.
    pub enrollment_id: Uuid,
    /// Student full name.
    pub student_name: String,
    /// Program name.
    pub program_name: String,
    /// Effective total the enrollee is expected to pay.
    pub total_value: Decimal,
    /// Sum of completed payments.
    pub total_paid: Decimal,
    /// Amount still owed.
    pub remaining_balance: Decimal,
    /// Derived settlement state (`pending`, `partial`, `paid`).
    pub payment_status: String,
    /// Enrollment date.
    pub enrolled_on: NaiveDate,
}

/// Totals across all rows of a collections report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionsTotals {
    /// Sum of `total_value` over all rows.
    pub total_value: Decimal,
    /// Sum of `total_paid` over all rows.
    pub total_paid: Decimal,
    /// Sum of `remaining_balance` over all rows.
    pub total_outstanding: Decimal,
    /// Number of enrollments included.
    pub enrollment_count: u64,
    /// Number of fully settled enrollments.
    pub paid_count: u64,
}

/// Collections report over a set of enrollments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsReport {
    /// Report type identifier.
    pub report_type: String,
    /// Generation date.
    pub as_of: NaiveDate,
    /// Per-enrollment rows.
    pub rows: Vec<EnrollmentCollectionRow>,
    /// Totals.
    pub totals: CollectionsTotals,
}

impl CollectionsReport {
    /// Assembles a collections report from enrollment rows.
    #[must_use]
    pub fn from_rows(as_of: NaiveDate, rows: Vec<EnrollmentCollectionRow>) -> Self {
        let totals = CollectionsTotals {
            total_value: rows.iter().map(|r| r.total_value).sum(),
            total_paid: rows.iter().map(|r| r.total_paid).sum(),
            total_outstanding: rows.iter().map(|r| r.remaining_balance).sum(),
            enrollment_count: rows.len() as u64,
            paid_count: rows.iter().filter(|r| r.payment_status == "paid").count() as u64,
        };

        Self {
            report_type: "collections".to_string(),
            as_of,
            rows,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(name: &str, value: Decimal, paid: Decimal, status: &str) -> EnrollmentCollectionRow {
        EnrollmentCollectionRow {
            enrollment_id: Uuid::now_v7(),
            student_name: name.to_string(),
            program_name: "Nursing Review".to_string(),
            total_value: value,
            total_paid: paid,
            remaining_balance: (value - paid).max(dec!(0)),
            payment_status: status.to_string(),
            enrolled_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_totals_sum_rows() {
        let rows = vec![
            row("Ana Cruz", dec!(15000), dec!(15000), "paid"),
            row("Ben Reyes", dec!(10000), dec!(4000), "partial"),
            row("Carla Tan", dec!(12000), dec!(0), "pending"),
        ];
        let report =
            CollectionsReport::from_rows(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), rows);

        assert_eq!(report.totals.total_value, dec!(37000));
        assert_eq!(report.totals.total_paid, dec!(19000));
        assert_eq!(report.totals.total_outstanding, dec!(18000));
        assert_eq!(report.totals.enrollment_count, 3);
        assert_eq!(report.totals.paid_count, 1);
    }

    #[test]
    fn test_empty_report() {
        let report =
            CollectionsReport::from_rows(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), vec![]);
        assert_eq!(report.totals.enrollment_count, 0);
        assert_eq!(report.totals.total_paid, Decimal::ZERO);
    }
}
