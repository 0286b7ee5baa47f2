//! Report repository: read-only aggregate queries for administrative
//! reporting.
//!
//! Reads the enrollments' persisted aggregate fields as written by the
//! reconciliation pass. The balance formula is deliberately not duplicated
//! here.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use academe_core::reports::EnrollmentCollectionRow;

use crate::entities::{enrollments, programs, sea_orm_active_enums::BalanceStatus, students};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for the collections report.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Filter by program.
    pub program_id: Option<Uuid>,
    /// Filter by settlement status.
    pub payment_status: Option<BalanceStatus>,
    /// Filter by enrollment date range start.
    pub from: Option<NaiveDate>,
    /// Filter by enrollment date range end.
    pub to: Option<NaiveDate>,
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads collection rows for the report, oldest enrollment first.
    ///
    /// Students and programs are batch-loaded to name the rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn collection_rows(
        &self,
        filter: ReportFilter,
    ) -> Result<Vec<EnrollmentCollectionRow>, ReportError> {
        let mut query = enrollments::Entity::find();

        if let Some(program_id) = filter.program_id {
            query = query.filter(enrollments::Column::ProgramId.eq(program_id));
        }
        if let Some(status) = filter.payment_status {
            query = query.filter(enrollments::Column::PaymentStatus.eq(status));
        }
        if let Some(from) = filter.from {
            query = query.filter(enrollments::Column::EnrolledOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(enrollments::Column::EnrolledOn.lte(to));
        }

        let enrollments = query
            .order_by_asc(enrollments::Column::EnrolledOn)
            .all(&self.db)
            .await?;

        let student_ids: Vec<Uuid> = enrollments.iter().map(|e| e.student_id).collect();
        let program_ids: Vec<Uuid> = enrollments.iter().map(|e| e.program_id).collect();

        let students: HashMap<Uuid, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let programs: HashMap<Uuid, programs::Model> = programs::Entity::find()
            .filter(programs::Column::Id.is_in(program_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let rows = enrollments
            .into_iter()
            .map(|e| EnrollmentCollectionRow {
                enrollment_id: e.id,
                student_name: students
                    .get(&e.student_id)
                    .map(students::Model::full_name)
                    .unwrap_or_default(),
                program_name: programs
                    .get(&e.program_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                total_value: e.total_value,
                total_paid: e.total_paid,
                remaining_balance: e.remaining_balance,
                payment_status: balance_status_label(&e.payment_status).to_string(),
                enrolled_on: e.enrolled_on,
            })
            .collect();

        Ok(rows)
    }
}

const fn balance_status_label(status: &BalanceStatus) -> &'static str {
    match status {
        BalanceStatus::Pending => "pending",
        BalanceStatus::Partial => "partial",
        BalanceStatus::Paid => "paid",
    }
}
