//! Program repository for review program catalog operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use academe_shared::types::ProgramId;

use crate::entities::{enrollments, lecturers, programs};

/// Error types for program operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Program not found.
    #[error("Program not found: {0}")]
    NotFound(Uuid),

    /// Assigned lecturer not found.
    #[error("Lecturer not found: {0}")]
    LecturerNotFound(Uuid),

    /// Fee must not be negative.
    #[error("Program fee must not be negative, got {0}")]
    NegativeFee(Decimal),

    /// Programs with enrollments cannot be deleted; deactivate instead.
    #[error("Program {0} has enrollments on record")]
    HasEnrollments(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a program.
#[derive(Debug, Clone)]
pub struct CreateProgramInput {
    /// Program name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Nominal enrollment fee.
    pub fee: Decimal,
    /// Schedule label (e.g. "MWF 8:00-12:00").
    pub schedule: Option<String>,
    /// Assigned lecturer.
    pub lecturer_id: Option<Uuid>,
}

/// Input for updating a program. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProgramInput {
    /// Program name.
    pub name: Option<String>,
    /// Description. `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Nominal enrollment fee.
    pub fee: Option<Decimal>,
    /// Schedule label. `Some(None)` clears it.
    pub schedule: Option<Option<String>>,
    /// Assigned lecturer. `Some(None)` clears the assignment.
    pub lecturer_id: Option<Option<Uuid>>,
    /// Whether the program accepts new enrollments.
    pub is_active: Option<bool>,
}

/// Program repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProgramRepository {
    db: DatabaseConnection,
}

impl ProgramRepository {
    /// Creates a new program repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a program.
    ///
    /// # Errors
    ///
    /// Returns an error if the fee is negative or the assigned lecturer does
    /// not exist.
    pub async fn create_program(
        &self,
        input: CreateProgramInput,
    ) -> Result<programs::Model, ProgramError> {
        if input.fee < Decimal::ZERO {
            return Err(ProgramError::NegativeFee(input.fee));
        }

        if let Some(lecturer_id) = input.lecturer_id {
            lecturers::Entity::find_by_id(lecturer_id)
                .one(&self.db)
                .await?
                .ok_or(ProgramError::LecturerNotFound(lecturer_id))?;
        }

        let now = Utc::now().into();
        let program = programs::ActiveModel {
            id: Set(ProgramId::new().into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            fee: Set(input.fee),
            schedule: Set(input.schedule),
            lecturer_id: Set(input.lecturer_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(program)
    }

    /// Gets a program by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is not found or the query fails.
    pub async fn get_program(&self, program_id: Uuid) -> Result<programs::Model, ProgramError> {
        programs::Entity::find_by_id(program_id)
            .one(&self.db)
            .await?
            .ok_or(ProgramError::NotFound(program_id))
    }

    /// Lists programs, optionally only active ones, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_programs(
        &self,
        only_active: bool,
    ) -> Result<Vec<programs::Model>, ProgramError> {
        let mut query = programs::Entity::find();
        if only_active {
            query = query.filter(programs::Column::IsActive.eq(true));
        }

        let programs = query
            .order_by_asc(programs::Column::Name)
            .all(&self.db)
            .await?;
        Ok(programs)
    }

    /// Updates a program.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is not found, the fee is negative, or
    /// a newly assigned lecturer does not exist.
    pub async fn update_program(
        &self,
        program_id: Uuid,
        input: UpdateProgramInput,
    ) -> Result<programs::Model, ProgramError> {
        let program = programs::Entity::find_by_id(program_id)
            .one(&self.db)
            .await?
            .ok_or(ProgramError::NotFound(program_id))?;

        if let Some(fee) = input.fee {
            if fee < Decimal::ZERO {
                return Err(ProgramError::NegativeFee(fee));
            }
        }

        if let Some(Some(lecturer_id)) = input.lecturer_id {
            lecturers::Entity::find_by_id(lecturer_id)
                .one(&self.db)
                .await?
                .ok_or(ProgramError::LecturerNotFound(lecturer_id))?;
        }

        let mut active: programs::ActiveModel = program.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(fee) = input.fee {
            active.fee = Set(fee);
        }
        if let Some(schedule) = input.schedule {
            active.schedule = Set(schedule);
        }
        if let Some(lecturer_id) = input.lecturer_id {
            active.lecturer_id = Set(lecturer_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a program with no enrollments on record.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is not found or has enrollments.
    pub async fn delete_program(&self, program_id: Uuid) -> Result<(), ProgramError> {
        programs::Entity::find_by_id(program_id)
            .one(&self.db)
            .await?
            .ok_or(ProgramError::NotFound(program_id))?;

        let enrollment_count = enrollments::Entity::find()
            .filter(enrollments::Column::ProgramId.eq(program_id))
            .count(&self.db)
            .await?;

        if enrollment_count > 0 {
            return Err(ProgramError::HasEnrollments(program_id));
        }

        programs::Entity::delete_by_id(program_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
