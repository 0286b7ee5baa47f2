//! Enrollment repository for enrollment database operations.
//!
//! Enrollment aggregate fields are read-only here; only the payment
//! repository's reconciliation pass writes them.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use academe_shared::types::{EnrollmentId, pagination::PageRequest};

use crate::entities::{
    enrollments, payments, programs, students,
    sea_orm_active_enums::BalanceStatus,
};

/// Error types for enrollment operations.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    /// Enrollment not found.
    #[error("Enrollment not found: {0}")]
    NotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Program not found.
    #[error("Program not found: {0}")]
    ProgramNotFound(Uuid),

    /// Program is no longer accepting enrollments.
    #[error("Program {0} is inactive")]
    ProgramInactive(Uuid),

    /// Total value must not be negative.
    #[error("Total value must not be negative, got {0}")]
    NegativeTotalValue(Decimal),

    /// Enrollments with payments on record cannot be deleted.
    #[error("Enrollment {0} has payments on record")]
    HasPayments(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an enrollment.
#[derive(Debug, Clone)]
pub struct CreateEnrollmentInput {
    /// Student enrolling.
    pub student_id: Uuid,
    /// Program enrolled into.
    pub program_id: Uuid,
    /// Enrollment date.
    pub enrolled_on: NaiveDate,
    /// Agreed total; defaults to the program fee when absent.
    pub total_value: Option<Decimal>,
}

/// Filter options for listing enrollments.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFilter {
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by program.
    pub program_id: Option<Uuid>,
    /// Filter by settlement status.
    pub payment_status: Option<BalanceStatus>,
    /// Filter by enrollment date range start.
    pub from: Option<NaiveDate>,
    /// Filter by enrollment date range end.
    pub to: Option<NaiveDate>,
}

/// Enrollment repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an enrollment with freshly derived aggregate fields.
    ///
    /// A new enrollment starts with zero paid, the full total owing, and
    /// `pending` settlement status - the same state a reconciliation pass
    /// over an empty payment set produces.
    ///
    /// # Errors
    ///
    /// Returns an error if the student or program does not exist, the
    /// program is inactive, or the total is negative.
    pub async fn create_enrollment(
        &self,
        input: CreateEnrollmentInput,
    ) -> Result<enrollments::Model, EnrollmentError> {
        students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::StudentNotFound(input.student_id))?;

        let program = programs::Entity::find_by_id(input.program_id)
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::ProgramNotFound(input.program_id))?;

        if !program.is_active {
            return Err(EnrollmentError::ProgramInactive(program.id));
        }

        let total_value = input.total_value.unwrap_or(program.fee);
        if total_value < Decimal::ZERO {
            return Err(EnrollmentError::NegativeTotalValue(total_value));
        }

        let now = Utc::now().into();
        let enrollment = enrollments::ActiveModel {
            id: Set(EnrollmentId::new().into_inner()),
            student_id: Set(input.student_id),
            program_id: Set(input.program_id),
            total_value: Set(total_value),
            total_paid: Set(Decimal::ZERO),
            remaining_balance: Set(total_value),
            payment_status: Set(BalanceStatus::Pending),
            enrolled_on: Set(input.enrolled_on),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(enrollment)
    }

    /// Gets an enrollment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not found or the query fails.
    pub async fn get_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, EnrollmentError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::NotFound(enrollment_id))
    }

    /// Lists enrollments with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_enrollments(
        &self,
        filter: EnrollmentFilter,
        page: &PageRequest,
    ) -> Result<(Vec<enrollments::Model>, u64), EnrollmentError> {
        let mut query = enrollments::Entity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(enrollments::Column::StudentId.eq(student_id));
        }
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

        let total = query.clone().count(&self.db).await?;

        let enrollments = query
            .order_by_desc(enrollments::Column::EnrolledOn)
            .order_by_desc(enrollments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((enrollments, total))
    }

    /// Deletes an enrollment that has no payments on record.
    ///
    /// Payments are the financial source of truth; an enrollment with any
    /// payment row - whatever its status - must be kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not found or has payments.
    pub async fn delete_enrollment(&self, enrollment_id: Uuid) -> Result<(), EnrollmentError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::NotFound(enrollment_id))?;

        let payment_count = payments::Entity::find()
            .filter(payments::Column::EnrollmentId.eq(enrollment_id))
            .count(&self.db)
            .await?;

        if payment_count > 0 {
            return Err(EnrollmentError::HasPayments(enrollment_id));
        }

        enrollments::Entity::delete_by_id(enrollment_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
