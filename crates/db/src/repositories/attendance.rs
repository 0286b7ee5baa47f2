//! Attendance repository for per-session attendance records.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use academe_shared::types::AttendanceRecordId;

use crate::entities::{
    attendance_records, enrollments, sea_orm_active_enums::AttendanceStatus,
};

/// Error types for attendance operations.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// Enrollment not found.
    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording attendance for one session.
#[derive(Debug, Clone)]
pub struct RecordAttendanceInput {
    /// Enrollment attending.
    pub enrollment_id: Uuid,
    /// Session date.
    pub session_date: NaiveDate,
    /// Attendance outcome.
    pub status: AttendanceStatus,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// Staff member recording.
    pub recorded_by: Uuid,
}

/// Attendance repository.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    db: DatabaseConnection,
}

impl AttendanceRepository {
    /// Creates a new attendance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records attendance for an enrollment on a session date.
    ///
    /// Recording the same date twice updates the existing row instead of
    /// creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment does not exist or the write fails.
    pub async fn record_attendance(
        &self,
        input: RecordAttendanceInput,
    ) -> Result<attendance_records::Model, AttendanceError> {
        enrollments::Entity::find_by_id(input.enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::EnrollmentNotFound(input.enrollment_id))?;

        let existing = attendance_records::Entity::find()
            .filter(attendance_records::Column::EnrollmentId.eq(input.enrollment_id))
            .filter(attendance_records::Column::SessionDate.eq(input.session_date))
            .one(&self.db)
            .await?;

        let now = Utc::now().into();
        let record = if let Some(existing) = existing {
            let mut active: attendance_records::ActiveModel = existing.into();
            active.status = Set(input.status);
            active.remarks = Set(input.remarks);
            active.recorded_by = Set(input.recorded_by);
            active.updated_at = Set(now);
            active.update(&self.db).await?
        } else {
            attendance_records::ActiveModel {
                id: Set(AttendanceRecordId::new().into_inner()),
                enrollment_id: Set(input.enrollment_id),
                session_date: Set(input.session_date),
                status: Set(input.status),
                remarks: Set(input.remarks),
                recorded_by: Set(input.recorded_by),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?
        };

        Ok(record)
    }

    /// Lists an enrollment's attendance records, oldest session first.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment does not exist or the query fails.
    pub async fn list_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Vec<attendance_records::Model>, AttendanceError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceError::EnrollmentNotFound(enrollment_id))?;

        let records = attendance_records::Entity::find()
            .filter(attendance_records::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(attendance_records::Column::SessionDate)
            .all(&self.db)
            .await?;

        Ok(records)
    }
}
